//! Markup→Model conversion.
//!
//! Every element is routed through the `element` entry of the
//! [`ElementProcessorMap`]: co-authoring markers are skipped, entities and
//! their delimiters are recognized first, then the tag table is consulted,
//! then namespaced tags, then the general fallback. Processors append to the
//! block group they are handed and recurse through the `child` entry.

mod block;
mod context;
mod inline;
mod list;
mod opaque;
mod table;
mod text;

use std::collections::HashMap;
use std::fmt;

use smol_str::SmolStr;
use weft_dom::{Dom, DomPosition, NodeData, NodeId};

pub use context::DomToModelContext;

use crate::config::DomToModelOptions;
use crate::entity::{COAUTHORING_MARKER_CLASS, is_delimiter, is_entity_like};
use crate::model::{
    Block, BlockGroupNode, ContentModelDocument, Paragraph, Segment, normalize_content_model,
};
use crate::selection::DomSelection;

/// Processor for one element (or, for the `text` entry, one text node).
pub type ElementProcessor = fn(&mut dyn BlockGroupNode, &Dom, NodeId, &mut DomToModelContext<'_>);

/// Tag-keyed processors plus the named special entries.
#[derive(Clone)]
pub struct ElementProcessorMap {
    tags: HashMap<SmolStr, ElementProcessor>,
    /// Dispatcher for every element.
    pub element: ElementProcessor,
    /// Walks the children of an element.
    pub child: ElementProcessor,
    pub text: ElementProcessor,
    pub entity: ElementProcessor,
    pub delimiter: ElementProcessor,
    /// Fallback for unknown tags.
    pub general: ElementProcessor,
    /// Fallback for tags with a namespace prefix, such as `o:p`.
    pub namespaced: ElementProcessor,
}

impl fmt::Debug for ElementProcessorMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tags: Vec<_> = self.tags.keys().collect();
        tags.sort();
        f.debug_struct("ElementProcessorMap")
            .field("tags", &tags)
            .finish_non_exhaustive()
    }
}

impl Default for ElementProcessorMap {
    fn default() -> Self {
        let mut tags: HashMap<SmolStr, ElementProcessor> = HashMap::new();
        let mut register = |names: &[&str], processor: ElementProcessor| {
            for name in names {
                tags.insert(SmolStr::new(name), processor);
            }
        };
        register(&["a"], inline::process_link);
        register(
            &[
                "b", "strong", "i", "em", "u", "s", "strike", "sup", "sub", "span", "font",
            ],
            inline::process_format,
        );
        register(
            &[
                "div", "p", "h1", "h2", "h3", "h4", "h5", "h6", "section", "article", "center",
                "header", "footer", "main", "nav", "aside",
            ],
            block::process_known_block,
        );
        register(&["blockquote", "pre"], block::process_format_container);
        register(&["br"], inline::process_br);
        register(&["img"], inline::process_image);
        register(&["hr"], block::process_divider);
        register(&["ol", "ul"], list::process_list);
        register(&["li"], list::process_list_item);
        register(&["table"], table::process_table);
        register(&["code"], inline::process_code);

        Self {
            tags,
            element: process_element,
            child: process_children,
            text: text::process_text,
            entity: opaque::process_entity,
            delimiter: opaque::process_delimiter,
            general: opaque::process_general,
            namespaced: process_children,
        }
    }
}

impl ElementProcessorMap {
    pub fn get(&self, tag: &str) -> Option<ElementProcessor> {
        self.tags.get(tag).copied()
    }

    /// Register `processor` for `tag`, returning the one it replaces.
    pub fn set(&mut self, tag: &str, processor: ElementProcessor) -> Option<ElementProcessor> {
        self.tags.insert(SmolStr::new(tag.to_ascii_lowercase()), processor)
    }

    pub fn remove(&mut self, tag: &str) -> Option<ElementProcessor> {
        self.tags.remove(tag)
    }
}

/// Convert the children of `root` into a new Model.
#[tracing::instrument(skip_all)]
pub fn dom_to_content_model(
    dom: &Dom,
    root: NodeId,
    ctx: &mut DomToModelContext<'_>,
) -> ContentModelDocument {
    let mut doc = ContentModelDocument::new();
    let child = ctx.config.processors.child;
    child(&mut doc, dom, root, ctx);
    if ctx.config.dom_to_model.contains(DomToModelOptions::NORMALIZE) {
        normalize_content_model(&mut doc);
    }
    tracing::debug!(
        target: "weft::dom_to_model",
        blocks = doc.blocks.len(),
        "converted markup to model"
    );
    doc
}

/// Default `element` entry.
pub fn process_element(
    group: &mut dyn BlockGroupNode,
    dom: &Dom,
    element: NodeId,
    ctx: &mut DomToModelContext<'_>,
) {
    let processors = &ctx.config.processors;
    let Some(tag) = dom.tag_name(element) else {
        return;
    };
    let processor = if dom.has_class(element, COAUTHORING_MARKER_CLASS) {
        return;
    } else if is_entity_like(dom, element) {
        processors.entity
    } else if is_delimiter(dom, element) {
        processors.delimiter
    } else if let Some(processor) = processors.get(tag) {
        processor
    } else if tag.contains(':') {
        processors.namespaced
    } else {
        processors.general
    };
    tracing::trace!(target: "weft::dom_to_model", tag, "processing element");
    processor(group, dom, element, ctx);
}

/// Default `child` entry: process every child of `parent` in order, honoring
/// selection boundaries that sit between children.
pub fn process_children(
    group: &mut dyn BlockGroupNode,
    dom: &Dom,
    parent: NodeId,
    ctx: &mut DomToModelContext<'_>,
) {
    let processors = &ctx.config.processors;
    let (element, text) = (processors.element, processors.text);
    let children = dom.children(parent);
    for (index, &child) in children.iter().enumerate() {
        handle_boundaries_at(group, ctx, DomPosition::new(parent, index));
        match dom.data(child) {
            Some(NodeData::Element(_)) => element(group, dom, child, ctx),
            Some(NodeData::Text(_)) => text(group, dom, child, ctx),
            _ => {}
        }
    }
    handle_boundaries_at(group, ctx, DomPosition::new(parent, children.len()));
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Boundary {
    Start,
    End,
}

/// Boundaries of a range selection that fall on `position`, start first.
fn boundaries_at(ctx: &DomToModelContext<'_>, position: DomPosition) -> Vec<Boundary> {
    let Some(DomSelection::Range { start, end, .. }) = ctx.selection else {
        return Vec::new();
    };
    let mut out = Vec::new();
    if start == position {
        out.push(Boundary::Start);
    }
    if end == position {
        out.push(Boundary::End);
    }
    out
}

fn handle_boundaries_at(
    group: &mut dyn BlockGroupNode,
    ctx: &mut DomToModelContext<'_>,
    position: DomPosition,
) {
    for boundary in boundaries_at(ctx, position) {
        apply_boundary(group, ctx, boundary);
    }
}

fn apply_boundary(group: &mut dyn BlockGroupNode, ctx: &mut DomToModelContext<'_>, boundary: Boundary) {
    let collapsed = ctx.selection.is_some_and(|s| s.is_collapsed());
    match boundary {
        Boundary::Start => {
            ctx.is_in_selection = true;
            add_segment(group, ctx.marker(), ctx);
        }
        Boundary::End => {
            if !collapsed {
                add_segment(group, ctx.marker(), ctx);
            }
            ctx.is_in_selection = false;
        }
    }
}

/// An implicit paragraph carrying the ambient block format and decorator.
pub(crate) fn implicit_paragraph(ctx: &DomToModelContext<'_>) -> Paragraph {
    let mut paragraph = Paragraph::new(true).with_format(ctx.block_format.clone());
    paragraph.decorator = ctx.decorator.clone();
    paragraph
}

/// Append `segment` to the last paragraph of `group`, starting an implicit
/// paragraph when the group does not end in one.
pub(crate) fn add_segment(
    group: &mut dyn BlockGroupNode,
    segment: Segment,
    ctx: &DomToModelContext<'_>,
) {
    let blocks = group.blocks_mut();
    if !matches!(blocks.last(), Some(Block::Paragraph(_))) {
        blocks.push(Block::Paragraph(implicit_paragraph(ctx)));
    }
    if let Some(Block::Paragraph(paragraph)) = blocks.last_mut() {
        paragraph.segments.push(segment);
    }
}

/// Append a block, then open an implicit paragraph so inline content that
/// follows does not land in a paragraph that precedes the block.
pub(crate) fn add_block(group: &mut dyn BlockGroupNode, block: Block, ctx: &DomToModelContext<'_>) {
    let blocks = group.blocks_mut();
    blocks.push(block);
    blocks.push(Block::Paragraph(implicit_paragraph(ctx)));
}

#[cfg(test)]
mod tests;
