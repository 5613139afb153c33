//! Format handler registry.
//!
//! Every category of format has an ordered [`HandlerList`]. Parsing runs each
//! entry's `parse` against the element in order, applying runs each entry's
//! `apply`. Order matters: `text_align` resolves `left`/`right` against the
//! direction that `direction` already stored, so it is registered after it.
//!
//! Hosts customize behavior by replacing, inserting or removing entries by
//! name before building conversion contexts.

mod block;
mod common;
mod dataset;
mod entity;
mod image;
mod link;
mod list;
mod segment;
mod table;

use weft_dom::{Dom, DomError, NodeId};

use super::defaults::DefaultStyle;
use super::{
    BlockFormat, CodeFormat, ImageFormat, LinkFormat, ListLevelFormat, SegmentFormat,
    TableCellFormat, TableFormat,
};
use crate::dom_to_model::DomToModelContext;
use crate::model_to_dom::ModelToDomContext;

pub use dataset::{apply_dataset, parse_dataset};
pub use entity::{apply_entity_format, parse_entity_format};

pub type ParseFn<F> = fn(&mut F, &Dom, NodeId, &DomToModelContext<'_>, &DefaultStyle);
pub type ApplyFn<F> = fn(&F, &mut Dom, NodeId, &ModelToDomContext<'_>) -> Result<(), DomError>;

/// A named parse/apply pair for one format concern.
pub struct FormatHandler<F> {
    pub name: &'static str,
    pub parse: ParseFn<F>,
    pub apply: ApplyFn<F>,
}

impl<F> Clone for FormatHandler<F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<F> Copy for FormatHandler<F> {}

impl<F> std::fmt::Debug for FormatHandler<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormatHandler")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl<F> FormatHandler<F> {
    pub const fn new(name: &'static str, parse: ParseFn<F>, apply: ApplyFn<F>) -> Self {
        Self { name, parse, apply }
    }
}

/// Ordered handlers for one format category.
#[derive(Debug, Clone)]
pub struct HandlerList<F> {
    entries: Vec<FormatHandler<F>>,
}

impl<F> HandlerList<F> {
    pub fn new(entries: Vec<FormatHandler<F>>) -> Self {
        Self { entries }
    }

    /// Read every concern this list knows off `element` into `format`.
    pub fn parse(
        &self,
        format: &mut F,
        dom: &Dom,
        element: NodeId,
        ctx: &DomToModelContext<'_>,
        defaults: &DefaultStyle,
    ) {
        for handler in &self.entries {
            (handler.parse)(format, dom, element, ctx, defaults);
        }
    }

    /// Write `format` onto `element`.
    pub fn apply(
        &self,
        format: &F,
        dom: &mut Dom,
        element: NodeId,
        ctx: &ModelToDomContext<'_>,
    ) -> Result<(), DomError> {
        for handler in &self.entries {
            (handler.apply)(format, dom, element, ctx)?;
        }
        Ok(())
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|h| h.name)
    }

    pub fn get(&self, name: &str) -> Option<&FormatHandler<F>> {
        self.entries.iter().find(|h| h.name == name)
    }

    /// Replace the entry with the same name, keeping its position.
    /// Returns false (and changes nothing) when no entry has that name.
    pub fn replace(&mut self, handler: FormatHandler<F>) -> bool {
        match self.entries.iter_mut().find(|h| h.name == handler.name) {
            Some(slot) => {
                *slot = handler;
                true
            }
            None => false,
        }
    }

    /// Insert after the entry named `after`, or at the end if there is none.
    pub fn insert_after(&mut self, after: &str, handler: FormatHandler<F>) {
        let index = self
            .entries
            .iter()
            .position(|h| h.name == after)
            .map(|i| i + 1)
            .unwrap_or(self.entries.len());
        self.entries.insert(index, handler);
    }

    pub fn push(&mut self, handler: FormatHandler<F>) {
        self.entries.push(handler);
    }

    pub fn remove(&mut self, name: &str) -> Option<FormatHandler<F>> {
        let index = self.entries.iter().position(|h| h.name == name)?;
        Some(self.entries.remove(index))
    }
}

/// Ambient value an applier compares against before writing.
///
/// Only segment, block and list level formats have an ambient stack; every
/// other category always writes what it holds.
pub trait AmbientFormat: Sized {
    fn ambient<'c>(_ctx: &'c ModelToDomContext<'_>) -> Option<&'c Self> {
        None
    }
}

impl AmbientFormat for SegmentFormat {
    fn ambient<'c>(ctx: &'c ModelToDomContext<'_>) -> Option<&'c Self> {
        Some(&ctx.implicit_format().segment)
    }
}

impl AmbientFormat for BlockFormat {
    fn ambient<'c>(ctx: &'c ModelToDomContext<'_>) -> Option<&'c Self> {
        Some(&ctx.implicit_format().block)
    }
}

impl AmbientFormat for ListLevelFormat {
    fn ambient<'c>(ctx: &'c ModelToDomContext<'_>) -> Option<&'c Self> {
        Some(&ctx.implicit_format().list_level)
    }
}

impl AmbientFormat for TableFormat {}
impl AmbientFormat for TableCellFormat {}
impl AmbientFormat for ImageFormat {}
impl AmbientFormat for LinkFormat {}
impl AmbientFormat for CodeFormat {}

/// The default registry, one list per format category.
#[derive(Debug, Clone)]
pub struct FormatHandlers {
    pub segment: HandlerList<SegmentFormat>,
    pub block: HandlerList<BlockFormat>,
    pub list_level: HandlerList<ListLevelFormat>,
    pub table: HandlerList<TableFormat>,
    pub table_cell: HandlerList<TableCellFormat>,
    pub image: HandlerList<ImageFormat>,
    pub link: HandlerList<LinkFormat>,
    pub code: HandlerList<CodeFormat>,
}

impl Default for FormatHandlers {
    fn default() -> Self {
        Self {
            segment: segment::handlers(),
            block: block::handlers(),
            list_level: list::handlers(),
            table: table::table_handlers(),
            table_cell: table::cell_handlers(),
            image: image::handlers(),
            link: link::handlers(),
            code: segment::code_handlers(),
        }
    }
}

#[cfg(test)]
mod tests;
