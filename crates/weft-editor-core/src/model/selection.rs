//! Selection state carried by the Model.
//!
//! A collapsed caret is one `SelectionMarker` segment; an expanded selection
//! is a run of segments (and cells, dividers, entities) with `is_selected`.

use super::block::{Block, Paragraph};
use super::path::{BlockPath, PathStep};
use super::segment::SegmentKind;
use super::BlockGroupNode;

/// Caret position: the paragraph holding the marker, the marker's index in
/// it, and the innermost table cell around it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertPoint {
    pub path: BlockPath,
    pub marker_index: usize,
    pub table_context: Option<TableContext>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableContext {
    pub table_path: BlockPath,
    pub row: usize,
    pub col: usize,
}

impl TableContext {
    /// The innermost cell around `path`, if any.
    pub fn of(path: &BlockPath) -> Option<Self> {
        path.innermost_cell()
            .map(|(table_path, row, col)| TableContext {
                table_path,
                row,
                col,
            })
    }
}

impl InsertPoint {
    pub fn new(path: BlockPath, marker_index: usize) -> Self {
        let table_context = TableContext::of(&path);
        Self {
            path,
            marker_index,
            table_context,
        }
    }
}

/// Visit every paragraph in document order, including paragraphs in table
/// cells and inside general segments.
pub(crate) fn for_each_paragraph(
    group: &dyn BlockGroupNode,
    path: &BlockPath,
    f: &mut dyn FnMut(&BlockPath, &Paragraph),
) {
    for (i, block) in group.blocks().iter().enumerate() {
        let block_path = path.block(i);
        match block {
            Block::Paragraph(p) => {
                f(&block_path, p);
                for (s, segment) in p.segments.iter().enumerate() {
                    if let SegmentKind::General(general) = &segment.kind {
                        for_each_paragraph(general, &block_path.child(PathStep::Segment(s)), f);
                    }
                }
            }
            Block::Table(table) => {
                for (row, r) in table.rows.iter().enumerate() {
                    for (col, cell) in r.cells.iter().enumerate() {
                        let cell_path = block_path.child(PathStep::Cell { row, col });
                        for_each_paragraph(cell, &cell_path, f);
                    }
                }
            }
            other => {
                if let Some(child) = other.as_group() {
                    for_each_paragraph(child, &block_path, f);
                }
            }
        }
    }
}

/// The first selection marker in document order.
pub fn find_insert_point(group: &dyn BlockGroupNode) -> Option<InsertPoint> {
    let mut found = None;
    for_each_paragraph(group, &BlockPath::root(), &mut |path: &BlockPath, para: &Paragraph| {
        if found.is_none() {
            if let Some(index) = para.marker_index() {
                found = Some(InsertPoint::new(path.clone(), index));
            }
        }
    });
    found
}

/// Paths of every selected segment, as (paragraph path, segment index).
pub fn selected_segments(group: &dyn BlockGroupNode) -> Vec<(BlockPath, usize)> {
    let mut out = Vec::new();
    for_each_paragraph(group, &BlockPath::root(), &mut |path: &BlockPath, para: &Paragraph| {
        for (i, segment) in para.segments.iter().enumerate() {
            if segment.is_selected {
                out.push((path.clone(), i));
            }
        }
    });
    out
}

pub fn has_selection_in_block_group(group: &dyn BlockGroupNode) -> bool {
    group.blocks().iter().any(|block| match block {
        Block::Paragraph(p) => p.segments.iter().any(|s| {
            s.is_selected
                || matches!(&s.kind, SegmentKind::General(g) if has_selection_in_block_group(g))
        }),
        Block::Table(t) => t
            .rows
            .iter()
            .flat_map(|r| &r.cells)
            .any(|c| c.is_selected || has_selection_in_block_group(c)),
        Block::Divider(d) => d.is_selected,
        Block::Entity(e) => e.is_selected,
        other => other.as_group().is_some_and(has_selection_in_block_group),
    })
}

/// Remove every marker and clear every selection flag.
pub fn clear_selection(group: &mut dyn BlockGroupNode) {
    for block in group.blocks_mut() {
        match block {
            Block::Paragraph(p) => {
                p.segments.retain(|s| !s.is_marker());
                for segment in &mut p.segments {
                    segment.is_selected = false;
                    match &mut segment.kind {
                        SegmentKind::Image(image) => image.is_selected_as_image_selection = false,
                        SegmentKind::General(general) => clear_selection(general),
                        _ => {}
                    }
                }
            }
            Block::Table(t) => {
                for cell in t.rows.iter_mut().flat_map(|r| &mut r.cells) {
                    cell.is_selected = false;
                    clear_selection(cell);
                }
            }
            Block::Divider(d) => d.is_selected = false,
            Block::Entity(e) => e.is_selected = false,
            other => {
                if let Some(child) = other.as_group_mut() {
                    clear_selection(child);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ContentModelDocument, ListItem, ListLevel, ListType, Segment};

    fn list_doc() -> ContentModelDocument {
        let para = Paragraph::new(true).with_segments(vec![
            Segment::text("a"),
            Segment::marker(),
            Segment::text("b"),
        ]);
        let item = ListItem {
            blocks: vec![Block::Paragraph(para)],
            levels: vec![ListLevel::new(ListType::Unordered)],
            ..Default::default()
        };
        ContentModelDocument::with_blocks(vec![
            Block::Paragraph(Paragraph::new(false).with_segments(vec![Segment::text("x")])),
            Block::ListItem(item),
        ])
    }

    #[test]
    fn test_find_insert_point() {
        let doc = list_doc();
        let point = find_insert_point(&doc).unwrap();
        assert_eq!(
            point.path,
            BlockPath::new(vec![PathStep::Block(1), PathStep::Block(0)])
        );
        assert_eq!(point.marker_index, 1);
        assert_eq!(point.table_context, None);
        assert!(has_selection_in_block_group(&doc));
    }

    #[test]
    fn test_clear_selection() {
        let mut doc = list_doc();
        clear_selection(&mut doc);
        assert!(find_insert_point(&doc).is_none());
        assert!(!has_selection_in_block_group(&doc));
        assert!(selected_segments(&doc).is_empty());
    }
}
