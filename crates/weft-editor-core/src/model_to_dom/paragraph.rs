//! Paragraphs and the segments inside them.
//!
//! A paragraph gets its own element unless it is implicit and nothing would
//! be lost without one. Without an element its segments are built inside a
//! scratch `div` that is unwrapped into the parent afterwards, so segment
//! handlers always have a container to append to.

use std::collections::HashSet;

use smol_str::SmolStr;
use weft_dom::{Dom, DomPosition, NodeId};

use super::{ModelToDomContext, cached_element, innermost, place_element, reuse_cached_element};
use crate::config::ModelToDomOptions;
use crate::entity::{is_delimiter, is_entity_like};
use crate::error::RenderError;
use crate::format::FormatBag;
use crate::model::{Block, Paragraph, Segment, SegmentKind};
use crate::optimize::{optimize, unwrap_with_anchors};

pub(super) fn handle_paragraph(
    dom: &mut Dom,
    parent: NodeId,
    block: &mut Block,
    ctx: &mut ModelToDomContext<'_>,
    ref_node: Option<NodeId>,
) -> Result<Option<NodeId>, RenderError> {
    let Block::Paragraph(paragraph) = block else {
        return Ok(ref_node);
    };
    let config = ctx.config;
    let tag: SmolStr = paragraph
        .decorator
        .as_ref()
        .map_or_else(|| SmolStr::new_static("div"), |d| d.tag_name.clone());
    let cached = cached_element(dom, ctx, paragraph.cached_element, parent, &tag);

    if let Some(element) = cached.filter(|_| can_reuse_whole(paragraph)) {
        for segment in &paragraph.segments {
            if let SegmentKind::Entity(entity) = &segment.kind {
                ctx.referenced_entities.insert(entity.wrapper);
            }
        }
        tracing::trace!(target: "weft::model_to_dom", tag = %tag, "reusing paragraph element");
        return Ok(reuse_cached_element(dom, parent, element, ref_node, ctx)?);
    }

    let ref_node = skip_claimed(dom, ref_node, &claimed_nodes(paragraph));
    let wrapped = needs_wrapper(paragraph, cached.is_some(), ctx);
    let (container, next_ref) = if wrapped {
        let (element, next) = place_element(dom, parent, cached, &tag, ref_node, ctx)?;
        clear_content(dom, element)?;
        (element, next)
    } else {
        (dom.create_element("div"), ref_node)
    };
    paragraph.cached_element = (wrapped && ctx.allow_cache_element).then_some(container);

    {
        let mut outer = ctx.stack_format(&tag);
        let mut wrapper_format = paragraph
            .decorator
            .as_ref()
            .map(|d| d.format.clone())
            .unwrap_or_default();
        if let Some(format) = &paragraph.segment_format {
            wrapper_format.merge_from(format);
        }
        if wrapped {
            config
                .handlers
                .block
                .apply(&paragraph.format, dom, container, &outer)?;
            config
                .handlers
                .segment
                .apply(&wrapper_format, dom, container, &outer)?;
        }

        let host = innermost(dom, container);
        let mut scope =
            outer.stack_implicit(|implicit| implicit.segment.merge_from(&wrapper_format));
        scope.selection.current = Some(DomPosition::new(host, dom.child_count(host)));
        for segment in &mut paragraph.segments {
            render_segment(dom, host, segment, &mut scope)?;
        }
        if scope.options().contains(ModelToDomOptions::OPTIMIZE) {
            scope
                .selection
                .with_anchors(|anchors| optimize(dom, container, anchors))?;
        }
    }

    if !wrapped {
        dom.insert_before(parent, container, next_ref)?;
        ctx.selection
            .with_anchors(|anchors| unwrap_with_anchors(dom, container, anchors))?;
    }
    Ok(next_ref)
}

/// Render one segment into `host`, then extend the reconstructed selection
/// when the segment is selected.
pub fn render_segment(
    dom: &mut Dom,
    host: NodeId,
    segment: &mut Segment,
    ctx: &mut ModelToDomContext<'_>,
) -> Result<(), RenderError> {
    let kind = segment.tag();
    let handler = ctx
        .config
        .model_handlers
        .segment(kind)
        .ok_or(RenderError::MissingHandler {
            kind: kind.as_str(),
        })?;

    let before = ctx.selection.current;
    handler(dom, host, segment, ctx)?;

    if segment.is_selected {
        let after = ctx.selection.current;
        if ctx.selection.start.is_none() {
            ctx.selection.start = if segment.is_marker() { after } else { before };
        }
        ctx.selection.end = after;
    }
    Ok(())
}

/// An unchanged cached element can stand in for the whole paragraph unless
/// the selection has to be rebuilt inside it or a general segment has to be
/// rendered again.
fn can_reuse_whole(paragraph: &Paragraph) -> bool {
    paragraph
        .segments
        .iter()
        .all(|s| !s.is_selected && !matches!(s.kind, SegmentKind::General(_)))
}

fn needs_wrapper(paragraph: &Paragraph, has_cached: bool, ctx: &ModelToDomContext<'_>) -> bool {
    if paragraph.decorator.is_some() || !paragraph.is_implicit {
        return true;
    }
    if paragraph.segment_format.as_ref().is_some_and(|f| !f.is_empty()) {
        return true;
    }
    // The cached element keeps node identity for content that needs it.
    if has_cached
        && paragraph
            .segments
            .iter()
            .any(|s| s.is_selected || matches!(s.kind, SegmentKind::General(_)))
    {
        return true;
    }
    let ambient = &ctx.implicit_format().block;
    let mut effective = ambient.clone();
    effective.merge_from(&paragraph.format);
    effective != *ambient && paragraph.segments.iter().any(|s| !s.is_marker())
}

/// Elements this paragraph's segments will move into its container.
fn claimed_nodes(paragraph: &Paragraph) -> HashSet<NodeId> {
    paragraph
        .segments
        .iter()
        .filter_map(|segment| match &segment.kind {
            SegmentKind::Entity(entity) => Some(entity.wrapper),
            SegmentKind::General(general) => general.cached_element,
            _ => None,
        })
        .collect()
}

/// Move the reference node past nodes that are about to be moved away, and
/// past delimiters, which are rebuilt around their entity.
fn skip_claimed(dom: &Dom, ref_node: Option<NodeId>, claimed: &HashSet<NodeId>) -> Option<NodeId> {
    let mut cursor = ref_node;
    while let Some(node) = cursor {
        if !claimed.contains(&node) && !is_delimiter(dom, node) {
            break;
        }
        cursor = dom.next_sibling(node);
    }
    cursor
}

/// Detach the old content of a reused paragraph element. Entity wrappers
/// stay until reconciliation decides about them.
fn clear_content(dom: &mut Dom, element: NodeId) -> Result<(), RenderError> {
    for child in dom.children(element).to_vec() {
        if !is_entity_like(dom, child) {
            dom.detach(child)?;
        }
    }
    Ok(())
}
