//! Index paths into the Model.
//!
//! A [`BlockPath`] addresses a block (or a block group) from the document
//! root. Paths are plain data, so an insertion point can be held across
//! mutations of unrelated parts of the tree without borrowing it.

use super::block::{Block, Paragraph};
use super::segment::SegmentKind;
use super::BlockGroupNode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathStep {
    /// Index in the current group's blocks.
    Block(usize),
    /// Cell of the table addressed by the preceding `Block` step.
    Cell { row: usize, col: usize },
    /// General segment of the paragraph addressed by the preceding step.
    Segment(usize),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct BlockPath {
    pub steps: Vec<PathStep>,
}

impl BlockPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn new(steps: Vec<PathStep>) -> Self {
        Self { steps }
    }

    pub fn child(&self, step: PathStep) -> Self {
        let mut steps = self.steps.clone();
        steps.push(step);
        Self { steps }
    }

    pub fn block(&self, index: usize) -> Self {
        self.child(PathStep::Block(index))
    }

    /// Index of the addressed block in its group.
    pub fn last_index(&self) -> Option<usize> {
        match self.steps.last()? {
            PathStep::Block(i) => Some(*i),
            _ => None,
        }
    }

    pub fn last_index_mut(&mut self) -> Option<&mut usize> {
        match self.steps.last_mut()? {
            PathStep::Block(i) => Some(i),
            _ => None,
        }
    }

    /// Path of the group holding the addressed block.
    pub fn group(&self) -> BlockPath {
        let mut steps = self.steps.clone();
        steps.pop();
        Self { steps }
    }

    pub fn is_root(&self) -> bool {
        self.steps.is_empty()
    }

    /// Number of `Block` steps: how deep the block sits.
    pub fn depth(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| matches!(s, PathStep::Block(_)))
            .count()
    }

    /// The innermost table cell on the path, as the path of the table and
    /// the cell coordinates.
    pub fn innermost_cell(&self) -> Option<(BlockPath, usize, usize)> {
        let index = self
            .steps
            .iter()
            .rposition(|s| matches!(s, PathStep::Cell { .. }))?;
        let PathStep::Cell { row, col } = self.steps[index] else {
            return None;
        };
        Some((BlockPath::new(self.steps[..index].to_vec()), row, col))
    }
}

/// Group at `path`: the root for an empty path, otherwise the block group,
/// table cell or general segment the path ends on.
pub fn group_at<'a>(
    group: &'a dyn BlockGroupNode,
    path: &BlockPath,
) -> Option<&'a dyn BlockGroupNode> {
    group_at_steps(group, &path.steps)
}

fn group_at_steps<'a>(
    group: &'a dyn BlockGroupNode,
    steps: &[PathStep],
) -> Option<&'a dyn BlockGroupNode> {
    match steps {
        [] => Some(group),
        [PathStep::Block(b), PathStep::Cell { row, col }, rest @ ..] => {
            let Block::Table(table) = group.blocks().get(*b)? else {
                return None;
            };
            group_at_steps(table.cell(*row, *col)?, rest)
        }
        [PathStep::Block(b), PathStep::Segment(s), rest @ ..] => {
            let Block::Paragraph(para) = group.blocks().get(*b)? else {
                return None;
            };
            let SegmentKind::General(general) = &para.segments.get(*s)?.kind else {
                return None;
            };
            group_at_steps(general, rest)
        }
        [PathStep::Block(b), rest @ ..] => group_at_steps(group.blocks().get(*b)?.as_group()?, rest),
        _ => None,
    }
}

pub fn group_at_mut<'a>(
    group: &'a mut dyn BlockGroupNode,
    path: &BlockPath,
) -> Option<&'a mut dyn BlockGroupNode> {
    group_at_steps_mut(group, &path.steps)
}

fn group_at_steps_mut<'a>(
    group: &'a mut dyn BlockGroupNode,
    steps: &[PathStep],
) -> Option<&'a mut dyn BlockGroupNode> {
    match steps {
        [] => Some(group),
        [PathStep::Block(b), PathStep::Cell { row, col }, rest @ ..] => {
            let Block::Table(table) = group.blocks_mut().get_mut(*b)? else {
                return None;
            };
            group_at_steps_mut(table.cell_mut(*row, *col)?, rest)
        }
        [PathStep::Block(b), PathStep::Segment(s), rest @ ..] => {
            let Block::Paragraph(para) = group.blocks_mut().get_mut(*b)? else {
                return None;
            };
            let SegmentKind::General(general) = &mut para.segments.get_mut(*s)?.kind else {
                return None;
            };
            group_at_steps_mut(general, rest)
        }
        [PathStep::Block(b), rest @ ..] => {
            group_at_steps_mut(group.blocks_mut().get_mut(*b)?.as_group_mut()?, rest)
        }
        _ => None,
    }
}

pub fn block_at<'a>(root: &'a dyn BlockGroupNode, path: &BlockPath) -> Option<&'a Block> {
    let index = path.last_index()?;
    group_at(root, &path.group())?.blocks().get(index)
}

pub fn block_at_mut<'a>(
    root: &'a mut dyn BlockGroupNode,
    path: &BlockPath,
) -> Option<&'a mut Block> {
    let index = path.last_index()?;
    group_at_mut(root, &path.group())?.blocks_mut().get_mut(index)
}

pub fn paragraph_at<'a>(root: &'a dyn BlockGroupNode, path: &BlockPath) -> Option<&'a Paragraph> {
    block_at(root, path)?.as_paragraph()
}

pub fn paragraph_at_mut<'a>(
    root: &'a mut dyn BlockGroupNode,
    path: &BlockPath,
) -> Option<&'a mut Paragraph> {
    block_at_mut(root, path)?.as_paragraph_mut()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        ContentModelDocument, FormatContainer, General, Paragraph, Segment, Table, TableCell,
        TableRow,
    };

    fn sample() -> ContentModelDocument {
        let mut cell = TableCell::new(false, false, false);
        cell.blocks.push(Block::Paragraph(
            Paragraph::new(true).with_segments(vec![Segment::text("cell")]),
        ));
        let table = Table {
            rows: vec![TableRow {
                cells: vec![TableCell::new(false, false, false), cell],
                ..Default::default()
            }],
            ..Default::default()
        };
        let mut general = General::new("span");
        general.blocks.push(Block::Paragraph(
            Paragraph::new(true).with_segments(vec![Segment::text("inner")]),
        ));
        let mut quote = FormatContainer::new("blockquote");
        quote.blocks.push(Block::Paragraph(
            Paragraph::new(false).with_segments(vec![Segment::general(general)]),
        ));
        ContentModelDocument::with_blocks(vec![Block::Table(table), Block::FormatContainer(quote)])
    }

    #[test]
    fn test_resolve_through_cell() {
        let doc = sample();
        let path = BlockPath::new(vec![
            PathStep::Block(0),
            PathStep::Cell { row: 0, col: 1 },
            PathStep::Block(0),
        ]);
        let para = paragraph_at(&doc, &path).unwrap();
        assert_eq!(para.segments[0].as_text(), Some("cell"));
        let (table_path, row, col) = path.innermost_cell().unwrap();
        assert_eq!(table_path, BlockPath::new(vec![PathStep::Block(0)]));
        assert_eq!((row, col), (0, 1));
    }

    #[test]
    fn test_resolve_through_general_segment() {
        let mut doc = sample();
        let path = BlockPath::new(vec![
            PathStep::Block(1),
            PathStep::Block(0),
            PathStep::Segment(0),
            PathStep::Block(0),
        ]);
        let para = paragraph_at_mut(&mut doc, &path).unwrap();
        para.segments.push(Segment::br());
        assert_eq!(paragraph_at(&doc, &path).unwrap().segments.len(), 2);
        assert_eq!(path.depth(), 3);
    }

    #[test]
    fn test_invalid_paths() {
        let doc = sample();
        assert!(block_at(&doc, &BlockPath::new(vec![PathStep::Block(5)])).is_none());
        assert!(
            group_at(
                &doc,
                &BlockPath::new(vec![PathStep::Block(0), PathStep::Block(0)])
            )
            .is_none()
        );
        assert!(block_at(&doc, &BlockPath::root()).is_none());
    }
}
