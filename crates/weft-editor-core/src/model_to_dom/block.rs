use weft_dom::{Dom, DomPosition, NodeId};

use super::{ModelToDomContext, place_element, render_block_group, reuse_cached_element};
use crate::error::RenderError;
use crate::format::FormatBag;
use crate::format::handlers::apply_entity_format;
use crate::model::Block;

/// `blockquote`, `pre` and other semantic containers.
pub(super) fn handle_format_container(
    dom: &mut Dom,
    parent: NodeId,
    block: &mut Block,
    ctx: &mut ModelToDomContext<'_>,
    ref_node: Option<NodeId>,
) -> Result<Option<NodeId>, RenderError> {
    let Block::FormatContainer(container) = block else {
        return Ok(ref_node);
    };
    let config = ctx.config;
    let tag = container.tag_name.clone();
    let (element, next) = place_element(dom, parent, container.cached_element, &tag, ref_node, ctx)?;
    container.cached_element = ctx.allow_cache_element.then_some(element);

    let mut outer = ctx.stack_format(&tag);
    config
        .handlers
        .block
        .apply(&container.format, dom, element, &outer)?;
    let inherited = container.format.inheritable();
    let mut scope = outer.stack_implicit(|implicit| {
        let mut block = implicit.block.inheritable();
        block.merge_from(&inherited);
        implicit.block = block;
    });
    render_block_group(dom, element, container, &mut scope)?;
    Ok(next)
}

pub(super) fn handle_general_block(
    dom: &mut Dom,
    parent: NodeId,
    block: &mut Block,
    ctx: &mut ModelToDomContext<'_>,
    ref_node: Option<NodeId>,
) -> Result<Option<NodeId>, RenderError> {
    let Block::General(general) = block else {
        return Ok(ref_node);
    };
    let tag = general.tag.clone();
    let (element, next) = place_element(dom, parent, general.cached_element, &tag, ref_node, ctx)?;
    for attr in &general.attributes {
        dom.set_attribute(element, &attr.name, attr.value.as_str())?;
    }
    general.cached_element = ctx.allow_cache_element.then_some(element);
    render_block_group(dom, element, general, ctx)?;
    Ok(next)
}

pub(super) fn handle_divider(
    dom: &mut Dom,
    parent: NodeId,
    block: &mut Block,
    ctx: &mut ModelToDomContext<'_>,
    ref_node: Option<NodeId>,
) -> Result<Option<NodeId>, RenderError> {
    let Block::Divider(divider) = block else {
        return Ok(ref_node);
    };
    let config = ctx.config;
    let tag = if divider.tag_name.is_empty() {
        "hr"
    } else {
        divider.tag_name.as_str()
    };
    let (element, next) = place_element(dom, parent, divider.cached_element, tag, ref_node, ctx)?;
    config.handlers.block.apply(&divider.format, dom, element, ctx)?;
    divider.cached_element = ctx.allow_cache_element.then_some(element);
    Ok(next)
}

/// Block entities keep their live wrapper; it is moved to the reference
/// position like any cached element.
pub(super) fn handle_entity_block(
    dom: &mut Dom,
    parent: NodeId,
    block: &mut Block,
    ctx: &mut ModelToDomContext<'_>,
    ref_node: Option<NodeId>,
) -> Result<Option<NodeId>, RenderError> {
    let Block::Entity(entity_block) = block else {
        return Ok(ref_node);
    };
    let wrapper = entity_block.entity.wrapper;
    if !dom.contains(wrapper) {
        tracing::warn!(target: "weft::model_to_dom", "entity wrapper is gone, skipping block");
        return Ok(ref_node);
    }

    let next = reuse_cached_element(dom, parent, wrapper, ref_node, ctx)?;
    apply_entity_format(&entity_block.entity.entity_format, dom, wrapper)?;
    ctx.referenced_entities.insert(wrapper);
    ctx.new_nodes.push(wrapper);

    if entity_block.is_selected {
        if let Some(index) = dom.index_of(wrapper) {
            let selection = &mut ctx.selection;
            selection.start.get_or_insert(DomPosition::new(parent, index));
            selection.end = Some(DomPosition::new(parent, index + 1));
        }
    }
    Ok(next)
}
