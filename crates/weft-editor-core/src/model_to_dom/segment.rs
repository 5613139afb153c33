//! Segment handlers. Each one leaves `selection.current` right after what it
//! rendered.

use weft_dom::{Dom, DomPosition, NodeId};

use super::{ModelToDomContext, adopt_element, innermost, render_block_group};
use crate::config::ModelToDomOptions;
use crate::entity::{DelimiterSide, create_delimiter};
use crate::error::RenderError;
use crate::format::FormatBag;
use crate::format::defaults::{ImplicitFormat, default_implicit_format};
use crate::format::handlers::{apply_dataset, apply_entity_format};
use crate::model::{Segment, SegmentKind};

/// Build the `span` for a segment with its format, link and code wrappers
/// and return the element its content goes into.
fn decorate(
    dom: &mut Dom,
    container: NodeId,
    segment: &Segment,
    ctx: &mut ModelToDomContext<'_>,
) -> Result<NodeId, RenderError> {
    let config = ctx.config;
    let span = dom.create_element("span");
    dom.append_child(container, span)?;

    let mut implied = ImplicitFormat::default();
    if segment.link.is_some() {
        implied.merge_from(&default_implicit_format("a"));
    }
    if segment.code.is_some() {
        implied.merge_from(&default_implicit_format("code"));
    }
    let scope = ctx.stack_implicit(|implicit| implicit.merge_from(&implied));
    config
        .handlers
        .segment
        .apply(&segment.format, dom, span, &scope)?;

    let mut host = innermost(dom, span);
    if let Some(link) = &segment.link {
        let a = dom.create_element("a");
        dom.append_child(host, a)?;
        config.handlers.link.apply(&link.format, dom, a, &scope)?;
        apply_dataset(&link.dataset, dom, a)?;
        host = a;
    }
    if let Some(code) = &segment.code {
        let element = dom.create_element("code");
        dom.append_child(host, element)?;
        config.handlers.code.apply(code, dom, element, &scope)?;
        host = element;
    }
    Ok(host)
}

pub(super) fn handle_text(
    dom: &mut Dom,
    container: NodeId,
    segment: &mut Segment,
    ctx: &mut ModelToDomContext<'_>,
) -> Result<(), RenderError> {
    let SegmentKind::Text(text) = &segment.kind else {
        return Ok(());
    };
    let host = decorate(dom, container, segment, ctx)?;
    let node = dom.create_text(text.as_str());
    dom.append_child(host, node)?;
    ctx.selection.current = Some(DomPosition::new(node, dom.text_len(node)));
    Ok(())
}

/// An empty text node, so a caret always has a text position to attach to.
pub(super) fn handle_marker(
    dom: &mut Dom,
    container: NodeId,
    _segment: &mut Segment,
    ctx: &mut ModelToDomContext<'_>,
) -> Result<(), RenderError> {
    let node = dom.create_text("");
    dom.append_child(container, node)?;
    ctx.new_nodes.push(node);
    ctx.selection.current = Some(DomPosition::new(node, 0));
    Ok(())
}

pub(super) fn handle_br(
    dom: &mut Dom,
    container: NodeId,
    segment: &mut Segment,
    ctx: &mut ModelToDomContext<'_>,
) -> Result<(), RenderError> {
    let host = decorate(dom, container, segment, ctx)?;
    let br = dom.create_element("br");
    dom.append_child(host, br)?;
    ctx.selection.current = Some(DomPosition::new(host, dom.child_count(host)));
    Ok(())
}

pub(super) fn handle_image(
    dom: &mut Dom,
    container: NodeId,
    segment: &mut Segment,
    ctx: &mut ModelToDomContext<'_>,
) -> Result<(), RenderError> {
    let SegmentKind::Image(image) = &segment.kind else {
        return Ok(());
    };
    let config = ctx.config;
    let host = decorate(dom, container, segment, ctx)?;

    let img = dom.create_element("img");
    dom.set_attribute(img, "src", image.src.as_str())?;
    config.handlers.image.apply(&image.format, dom, img, ctx)?;
    apply_dataset(&image.dataset, dom, img)?;
    dom.append_child(host, img)?;

    ctx.new_nodes.push(img);
    if image.is_selected_as_image_selection {
        ctx.selection.image = Some(img);
    }
    ctx.selection.current = Some(DomPosition::new(host, dom.child_count(host)));
    Ok(())
}

/// Inline element the Model keeps as an opaque copy; its content is a
/// block group of its own.
pub(super) fn handle_general(
    dom: &mut Dom,
    container: NodeId,
    segment: &mut Segment,
    ctx: &mut ModelToDomContext<'_>,
) -> Result<(), RenderError> {
    if !matches!(segment.kind, SegmentKind::General(_)) {
        return Ok(());
    }
    let host = decorate(dom, container, segment, ctx)?;
    let format = segment.format.clone();
    let SegmentKind::General(general) = &mut segment.kind else {
        return Ok(());
    };

    let element = adopt_element(dom, host, general.cached_element, &general.tag, ctx)?;
    for attr in &general.attributes {
        dom.set_attribute(element, &attr.name, attr.value.as_str())?;
    }
    general.cached_element = ctx.allow_cache_element.then_some(element);
    {
        let mut scope = ctx.stack_implicit(|implicit| implicit.segment.merge_from(&format));
        render_block_group(dom, element, general, &mut scope)?;
    }
    ctx.selection.current = Some(DomPosition::new(host, dom.child_count(host)));
    Ok(())
}

/// The live wrapper is moved into place, never recreated.
pub(super) fn handle_entity(
    dom: &mut Dom,
    container: NodeId,
    segment: &mut Segment,
    ctx: &mut ModelToDomContext<'_>,
) -> Result<(), RenderError> {
    let SegmentKind::Entity(entity) = &segment.kind else {
        return Ok(());
    };
    let wrapper = entity.wrapper;
    if !dom.contains(wrapper) {
        tracing::warn!(target: "weft::model_to_dom", "entity wrapper is gone, skipping segment");
        return Ok(());
    }

    let delimiters = ctx
        .options()
        .contains(ModelToDomOptions::ADD_ENTITY_DELIMITERS);
    if delimiters {
        let before = create_delimiter(dom, DelimiterSide::Before)?;
        dom.append_child(container, before)?;
    }
    dom.append_child(container, wrapper)?;
    apply_entity_format(&entity.entity_format, dom, wrapper)?;
    if delimiters {
        let after = create_delimiter(dom, DelimiterSide::After)?;
        dom.append_child(container, after)?;
    }

    ctx.referenced_entities.insert(wrapper);
    ctx.new_nodes.push(wrapper);
    ctx.selection.current = Some(DomPosition::new(container, dom.child_count(container)));
    Ok(())
}
