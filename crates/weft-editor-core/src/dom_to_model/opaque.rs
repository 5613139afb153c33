//! Entities, their delimiters, and elements the Model has no type for.

use weft_dom::{Dom, NodeId};

use super::{Boundary, DomToModelContext, add_block, add_segment, apply_boundary};
use crate::format::defaults::is_block_tag;
use crate::format::handlers::parse_entity_format;
use crate::model::{Block, BlockGroupNode, Entity, EntityBlock, General, SegmentKind};
use crate::selection::DomSelection;

fn is_block_element(dom: &Dom, element: NodeId) -> bool {
    match dom.style_property(element, "display").as_deref() {
        Some("block" | "flex" | "grid" | "table" | "list-item") => true,
        Some(_) => false,
        None => dom.tag_name(element).is_some_and(is_block_tag),
    }
}

/// Entity wrappers are kept by reference. Their content is never read.
pub fn process_entity(
    group: &mut dyn BlockGroupNode,
    dom: &Dom,
    element: NodeId,
    ctx: &mut DomToModelContext<'_>,
) {
    let entity = Entity {
        wrapper: element,
        entity_format: parse_entity_format(dom, element),
    };
    tracing::trace!(
        target: "weft::dom_to_model",
        entity_type = entity.entity_format.entity_type.as_deref(),
        "entity"
    );
    if is_block_element(dom, element) {
        let block = EntityBlock {
            entity,
            format: ctx.segment_format.clone(),
            is_selected: ctx.is_in_selection,
        };
        add_block(group, Block::Entity(block), ctx);
    } else {
        add_segment(group, ctx.segment(SegmentKind::Entity(entity)), ctx);
    }
}

/// Delimiters carry no content. A selection boundary inside one lands
/// next to the entity it belongs to.
pub fn process_delimiter(
    group: &mut dyn BlockGroupNode,
    dom: &Dom,
    element: NodeId,
    ctx: &mut DomToModelContext<'_>,
) {
    let Some(DomSelection::Range { start, end, .. }) = ctx.selection else {
        return;
    };
    if dom.contains_node(element, start.node) {
        apply_boundary(group, ctx, Boundary::Start);
    }
    if dom.contains_node(element, end.node) {
        apply_boundary(group, ctx, Boundary::End);
    }
}

/// Unknown elements are kept as a shallow copy whose content is converted
/// like any other block group.
pub fn process_general(
    group: &mut dyn BlockGroupNode,
    dom: &Dom,
    element: NodeId,
    ctx: &mut DomToModelContext<'_>,
) {
    let Some(tag) = dom.tag_name(element) else {
        return;
    };
    let mut general = General::new(tag);
    general.attributes = dom.attributes(element).to_vec();
    if ctx.allow_cache_element {
        general.cached_element = Some(element);
    }

    let child = ctx.config.processors.child;
    if is_block_element(dom, element) {
        ctx.scoped(|ctx| {
            ctx.decorator = None;
            child(&mut general, dom, element, ctx);
        });
        add_block(group, Block::General(general), ctx);
    } else {
        child(&mut general, dom, element, ctx);
        add_segment(group, ctx.segment(SegmentKind::General(general)), ctx);
    }
}
