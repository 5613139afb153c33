//! Selection as the markup side sees it.

use weft_dom::{DomPosition, NodeId};

/// A selection in a [`weft_dom::Dom`], the input of markup→Model conversion
/// and the output of Model→markup conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomSelection {
    Range {
        start: DomPosition,
        end: DomPosition,
        /// Focus comes before anchor.
        is_reverted: bool,
    },
    Image {
        image: NodeId,
    },
    /// Rectangular cell selection, coordinates in the table's grid.
    Table {
        table: NodeId,
        first_row: usize,
        first_column: usize,
        last_row: usize,
        last_column: usize,
    },
}

impl DomSelection {
    pub fn caret(position: DomPosition) -> Self {
        Self::Range {
            start: position,
            end: position,
            is_reverted: false,
        }
    }

    pub fn range(start: DomPosition, end: DomPosition) -> Self {
        Self::Range {
            start,
            end,
            is_reverted: false,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        matches!(self, Self::Range { start, end, .. } if start == end)
    }
}
