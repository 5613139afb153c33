use super::block::{Block, Paragraph};
use super::path::{BlockPath, PathStep};
use super::segment::SegmentKind;
use super::selection::for_each_paragraph;
use super::{BlockGroupNode, ContentModelDocument};
use crate::error::ModelError;

/// Check the structural invariants of a Model.
///
/// At most one collapsed marker when nothing is selected, list items always
/// carry a level, and spanned cells stay empty.
pub fn validate(doc: &ContentModelDocument) -> Result<(), ModelError> {
    let mut markers = 0;
    let mut selected_content = false;
    for_each_paragraph(doc, &BlockPath::root(), &mut |_: &BlockPath, para: &Paragraph| {
        for segment in &para.segments {
            if segment.is_marker() {
                markers += 1;
            } else if segment.is_selected {
                selected_content = true;
            }
        }
    });
    if markers > 1 && !selected_content {
        return Err(ModelError::MultipleCollapsedMarkers { count: markers });
    }
    validate_group(doc, &BlockPath::root())
}

fn validate_group(group: &dyn BlockGroupNode, path: &BlockPath) -> Result<(), ModelError> {
    for (i, block) in group.blocks().iter().enumerate() {
        let block_path = path.block(i);
        match block {
            Block::ListItem(item) => {
                if item.levels.is_empty() {
                    return Err(ModelError::EmptyListLevels { path: block_path });
                }
                validate_group(item, &block_path)?;
            }
            Block::Table(table) => {
                for (row, r) in table.rows.iter().enumerate() {
                    for (col, cell) in r.cells.iter().enumerate() {
                        if cell.is_spanned() && !cell.blocks.is_empty() {
                            return Err(ModelError::SpannedCellHasBlocks {
                                path: block_path,
                                row,
                                col,
                            });
                        }
                        validate_group(cell, &block_path.child(PathStep::Cell { row, col }))?;
                    }
                }
            }
            Block::Paragraph(para) => {
                for (s, segment) in para.segments.iter().enumerate() {
                    if let SegmentKind::General(general) = &segment.kind {
                        validate_group(general, &block_path.child(PathStep::Segment(s)))?;
                    }
                }
            }
            other => {
                if let Some(child) = other.as_group() {
                    validate_group(child, &block_path)?;
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ListItem, Segment, Table, TableCell, TableRow};

    #[test]
    fn test_multiple_markers() {
        let para = Paragraph::new(true).with_segments(vec![
            Segment::marker(),
            Segment::text("a"),
            Segment::marker(),
        ]);
        let doc = ContentModelDocument::with_blocks(vec![Block::Paragraph(para)]);
        assert_eq!(
            validate(&doc),
            Err(ModelError::MultipleCollapsedMarkers { count: 2 })
        );

        let para = Paragraph::new(true).with_segments(vec![
            Segment::marker(),
            Segment::text("a").with_selected(true),
            Segment::marker(),
        ]);
        let doc = ContentModelDocument::with_blocks(vec![Block::Paragraph(para)]);
        assert_eq!(validate(&doc), Ok(()));
    }

    #[test]
    fn test_list_item_without_levels() {
        let doc = ContentModelDocument::with_blocks(vec![Block::ListItem(ListItem::default())]);
        assert_eq!(
            validate(&doc),
            Err(ModelError::EmptyListLevels {
                path: BlockPath::root().block(0)
            })
        );
    }

    #[test]
    fn test_spanned_cell_with_blocks() {
        let mut spanned = TableCell::new(true, false, false);
        spanned
            .blocks
            .push(Block::Paragraph(Paragraph::new(true)));
        let table = Table {
            rows: vec![TableRow {
                cells: vec![TableCell::new(false, false, false), spanned],
                ..Default::default()
            }],
            ..Default::default()
        };
        let doc = ContentModelDocument::with_blocks(vec![Block::Table(table)]);
        assert!(matches!(
            validate(&doc),
            Err(ModelError::SpannedCellHasBlocks { row: 0, col: 1, .. })
        ));
    }
}
