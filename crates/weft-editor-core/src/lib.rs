//! weft-editor-core: the content Model of the weft editor and the code that
//! keeps it in sync with the live markup.
//!
//! This crate provides:
//! - the Model: block groups, paragraphs, segments, tables and lists, with
//!   index paths and selection state
//! - format bags and the handler registry that reads them from elements and
//!   writes them back
//! - markup→Model conversion (`dom_to_content_model`)
//! - Model→markup conversion with element reuse (`content_model_to_dom`)
//!   and the optimization walk run after it
//! - the Backspace/Delete pipeline (`delete_selection`)
//!
//! Markup lives in a [`weft_dom::Dom`]. Conversions are synchronous and
//! run to completion; hosts serialize edits.

pub mod config;
pub mod delete;
pub mod dom_to_model;
pub mod entity;
pub mod error;
pub mod format;
pub mod model;
pub mod model_to_dom;
pub mod optimize;
pub mod selection;

pub use config::{DomToModelOptions, EditorConfig, ModelToDomOptions};
pub use delete::{
    DeleteContext, DeleteDirection, DeleteModifiers, DeleteResult, DeleteSelectionResult,
    DeleteSelectionStep, DeleteTrigger, FormatContext, default_delete_steps, delete_selection,
};
pub use dom_to_model::{DomToModelContext, ElementProcessorMap, dom_to_content_model};
pub use error::{ModelError, RenderError};
pub use model::{Block, BlockPath, ContentModelDocument, InsertPoint, Paragraph, Segment};
pub use model_to_dom::{ModelHandlerMap, ModelToDomContext, content_model_to_dom};
pub use selection::DomSelection;
