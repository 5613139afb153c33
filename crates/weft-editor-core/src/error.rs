use miette::Diagnostic;
use thiserror::Error;
use weft_dom::DomError;

use crate::model::BlockPath;

#[derive(Debug, Error, Diagnostic)]
pub enum RenderError {
    #[error(transparent)]
    #[diagnostic(code(weft::model_to_dom::dom))]
    Dom(#[from] DomError),

    #[error("no handler registered for {kind}")]
    #[diagnostic(code(weft::model_to_dom::missing_handler))]
    MissingHandler { kind: &'static str },
}

#[derive(Debug, Error, Diagnostic, Clone, PartialEq)]
pub enum ModelError {
    #[error("document holds {count} collapsed selection markers, expected at most one")]
    #[diagnostic(code(weft::model::multiple_markers))]
    MultipleCollapsedMarkers { count: usize },

    #[error("list item at {path:?} has no levels")]
    #[diagnostic(code(weft::model::empty_list_levels))]
    EmptyListLevels { path: BlockPath },

    #[error("spanned table cell at {path:?} (row {row}, column {col}) carries blocks")]
    #[diagnostic(code(weft::model::spanned_cell_has_blocks))]
    SpannedCellHasBlocks {
        path: BlockPath,
        row: usize,
        col: usize,
    },

    #[error("path {0:?} does not address a block")]
    #[diagnostic(code(weft::model::invalid_path))]
    InvalidPath(BlockPath),
}
