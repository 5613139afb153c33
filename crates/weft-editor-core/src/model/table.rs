use weft_dom::NodeId;

use super::block::Block;
use super::{BlockGroupKind, BlockGroupNode};
use crate::format::{BlockFormat, Dataset, TableCellFormat, TableFormat};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub rows: Vec<TableRow>,
    /// Column widths in pixels; 0 means unspecified.
    pub widths: Vec<f32>,
    pub format: TableFormat,
    pub dataset: Dataset,
    pub cached_element: Option<NodeId>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableRow {
    /// Row height in pixels; 0 means unspecified.
    pub height: f32,
    pub format: BlockFormat,
    pub cells: Vec<TableCell>,
    pub cached_element: Option<NodeId>,
}

/// A grid cell. Continuation cells of a spanned region carry `span_left`
/// or `span_above` and never hold blocks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableCell {
    pub blocks: Vec<Block>,
    pub format: TableCellFormat,
    pub span_left: bool,
    pub span_above: bool,
    pub is_header: bool,
    pub is_selected: bool,
    pub dataset: Dataset,
    pub cached_element: Option<NodeId>,
}

impl TableCell {
    pub fn new(span_left: bool, span_above: bool, is_header: bool) -> Self {
        Self {
            span_left,
            span_above,
            is_header,
            ..Default::default()
        }
    }

    pub fn is_spanned(&self) -> bool {
        self.span_left || self.span_above
    }
}

impl BlockGroupNode for TableCell {
    fn group_kind(&self) -> BlockGroupKind {
        BlockGroupKind::TableCell
    }

    fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    fn blocks_mut(&mut self) -> &mut Vec<Block> {
        &mut self.blocks
    }
}

impl Table {
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(|r| r.cells.len()).max().unwrap_or(0)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&TableCell> {
        self.rows.get(row)?.cells.get(col)
    }

    pub fn cell_mut(&mut self, row: usize, col: usize) -> Option<&mut TableCell> {
        self.rows.get_mut(row)?.cells.get_mut(col)
    }

    /// `(rowspan, colspan)` of the region whose top-left cell is at
    /// `(row, col)`.
    pub fn span_of(&self, row: usize, col: usize) -> (usize, usize) {
        let mut colspan = 1;
        while self
            .cell(row, col + colspan)
            .is_some_and(|c| c.span_left && !c.span_above)
        {
            colspan += 1;
        }
        let mut rowspan = 1;
        while self
            .cell(row + rowspan, col)
            .is_some_and(|c| c.span_above && !c.span_left)
        {
            rowspan += 1;
        }
        (rowspan, colspan)
    }
}
