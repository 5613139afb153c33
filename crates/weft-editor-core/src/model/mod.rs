//! The content Model: the markup-independent tree the editor edits.
//!
//! Block groups (the document, containers, list items, table cells, general
//! wrappers) hold blocks; paragraphs hold segments. Model nodes may remember
//! the markup element they were last rendered to (`cached_element`). That
//! handle is a non-owning association into a [`weft_dom::Dom`]; it goes stale
//! when the tree is reset and is then simply ignored.

mod block;
mod normalize;
mod path;
mod segment;
mod selection;
mod table;
mod validate;

pub use block::{
    Block, BlockKind, Divider, EntityBlock, FormatContainer, ListItem, ListLevel, ListType,
    Paragraph, ParagraphDecorator,
};
pub use normalize::{normalize_content_model, normalize_paragraph, preserves_white_space};
pub use path::{
    BlockPath, PathStep, block_at, block_at_mut, group_at, group_at_mut, paragraph_at,
    paragraph_at_mut,
};
pub use segment::{Entity, General, Image, Link, Segment, SegmentKind, SegmentKindTag};
pub use selection::{
    InsertPoint, TableContext, clear_selection, find_insert_point, has_selection_in_block_group,
    selected_segments,
};
pub use table::{Table, TableCell, TableRow};
pub use validate::validate;

use crate::format::SegmentFormat;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockGroupKind {
    Document,
    General,
    FormatContainer,
    ListItem,
    TableCell,
}

/// Anything that holds a list of blocks.
pub trait BlockGroupNode {
    fn group_kind(&self) -> BlockGroupKind;
    fn blocks(&self) -> &[Block];
    fn blocks_mut(&mut self) -> &mut Vec<Block>;
}

/// Root of the Model.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentModelDocument {
    pub blocks: Vec<Block>,
    /// Default segment format of the editing surface.
    pub format: SegmentFormat,
}

impl ContentModelDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blocks(blocks: Vec<Block>) -> Self {
        Self {
            blocks,
            ..Default::default()
        }
    }
}

impl BlockGroupNode for ContentModelDocument {
    fn group_kind(&self) -> BlockGroupKind {
        BlockGroupKind::Document
    }

    fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    fn blocks_mut(&mut self) -> &mut Vec<Block> {
        &mut self.blocks
    }
}

/// Drop every cached markup reference under `group`.
///
/// Used when loading new content and when comparing Models produced by
/// different renders.
pub fn clear_cached_elements(group: &mut dyn BlockGroupNode) {
    for block in group.blocks_mut() {
        block.clear_cached_element();
        match block {
            Block::Paragraph(p) => {
                for segment in &mut p.segments {
                    if let SegmentKind::General(general) = &mut segment.kind {
                        general.cached_element = None;
                        clear_cached_elements(general);
                    }
                }
            }
            Block::Table(table) => {
                for row in &mut table.rows {
                    row.cached_element = None;
                    for cell in &mut row.cells {
                        cell.cached_element = None;
                        clear_cached_elements(cell);
                    }
                }
            }
            other => {
                if let Some(child) = other.as_group_mut() {
                    clear_cached_elements(child);
                }
            }
        }
    }
}

/// Replace the group block at `index` of `parent` by its children.
///
/// Returns false and leaves `parent` untouched when the block is not a group.
pub fn unwrap_block(parent: &mut dyn BlockGroupNode, index: usize) -> bool {
    let blocks = parent.blocks_mut();
    if blocks.get(index).and_then(Block::as_group).is_none() {
        return false;
    }
    let block = blocks.remove(index);
    match block.into_blocks() {
        Ok(children) => {
            blocks.splice(index..index, children);
            true
        }
        Err(block) => {
            blocks.insert(index, block);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote_with(text: &str) -> Block {
        let mut quote = FormatContainer::new("blockquote");
        quote.blocks.push(Block::Paragraph(
            Paragraph::new(false).with_segments(vec![Segment::text(text)]),
        ));
        quote.cached_element = None;
        Block::FormatContainer(quote)
    }

    #[test]
    fn test_unwrap_block() {
        let mut doc = ContentModelDocument::with_blocks(vec![
            Block::Paragraph(Paragraph::new(true)),
            quote_with("inside"),
        ]);
        assert!(unwrap_block(&mut doc, 1));
        assert_eq!(doc.blocks.len(), 2);
        assert_eq!(doc.blocks[1].kind(), BlockKind::Paragraph);
        assert!(!unwrap_block(&mut doc, 0));
        assert!(!unwrap_block(&mut doc, 7));
    }

    #[test]
    fn test_clear_cached_elements_reaches_cells() {
        let mut dom = weft_dom::Dom::new();
        let node = dom.create_element("td");
        let mut cell = TableCell::new(false, false, false);
        cell.cached_element = Some(node);
        let mut para = Paragraph::new(false);
        para.cached_element = Some(node);
        cell.blocks.push(Block::Paragraph(para));
        let table = Table {
            rows: vec![TableRow {
                cells: vec![cell],
                cached_element: Some(node),
                ..Default::default()
            }],
            cached_element: Some(node),
            ..Default::default()
        };
        let mut doc = ContentModelDocument::with_blocks(vec![Block::Table(table)]);
        clear_cached_elements(&mut doc);
        let Block::Table(table) = &doc.blocks[0] else {
            panic!("expected table");
        };
        assert_eq!(table.cached_element, None);
        assert_eq!(table.rows[0].cached_element, None);
        assert_eq!(table.rows[0].cells[0].cached_element, None);
        assert_eq!(
            table.rows[0].cells[0].blocks[0]
                .as_paragraph()
                .and_then(|p| p.cached_element),
            None
        );
    }
}
