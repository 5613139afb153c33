//! List items.
//!
//! Consecutive list items of one block group share the open `ol`/`ul`
//! elements on [`ModelToDomContext::list`]: an item reuses the leading
//! levels that match and opens list elements for the rest. An opened level
//! takes over the list element that held the item's cached `li` at that
//! depth, when no other list of this render claimed it yet.

use weft_dom::{Dom, NodeId};

use super::context::ListNode;
use super::{
    ModelToDomContext, adopt_element, cached_element, place_element, render_block_group,
    reuse_cached_element,
};
use crate::error::RenderError;
use crate::format::handlers::apply_dataset;
use crate::format::{FormatBag, SegmentFormat};
use crate::model::{Block, ListLevel};

pub(super) fn handle_list_item(
    dom: &mut Dom,
    parent: NodeId,
    block: &mut Block,
    ctx: &mut ModelToDomContext<'_>,
    ref_node: Option<NodeId>,
) -> Result<Option<NodeId>, RenderError> {
    let Block::ListItem(item) = block else {
        return Ok(ref_node);
    };
    let config = ctx.config;

    let (list, next) = open_levels(dom, parent, &item.levels, item.cached_element, ctx, ref_node)?;
    let (li, next) = match list {
        Some(list) => (adopt_element(dom, list, item.cached_element, "li", ctx)?, next),
        None => place_element(dom, parent, item.cached_element, "li", ref_node, ctx)?,
    };
    item.cached_element = ctx.allow_cache_element.then_some(li);

    // The marker only takes the font and color of the item.
    let marker = SegmentFormat {
        font_family: item.format_holder.font_family.clone(),
        font_size: item.format_holder.font_size.clone(),
        text_color: item.format_holder.text_color.clone(),
        ..Default::default()
    };
    {
        let scope = ctx.stack_format("li");
        config.handlers.block.apply(&item.format, dom, li, &scope)?;
        config.handlers.segment.apply(&marker, dom, li, &scope)?;
    }
    let dummy = item
        .levels
        .last()
        .and_then(|level| level.format.display_for_dummy_item.as_deref());
    if dummy == Some("block") {
        dom.set_style_property(li, "display", "block")?;
    }

    let inherited = item.format.inheritable();
    let mut scope = ctx.stack_implicit(|implicit| {
        let mut block = implicit.block.inheritable();
        block.merge_from(&inherited);
        implicit.block = block;
        implicit.segment.merge_from(&marker);
    });
    render_block_group(dom, li, item, &mut scope)?;
    Ok(next)
}

/// Make `ctx.list` match `levels`. Returns the innermost list element and
/// the reference node for the next block.
fn open_levels(
    dom: &mut Dom,
    parent: NodeId,
    levels: &[ListLevel],
    cached_li: Option<NodeId>,
    ctx: &mut ModelToDomContext<'_>,
    ref_node: Option<NodeId>,
) -> Result<(Option<NodeId>, Option<NodeId>), RenderError> {
    let config = ctx.config;

    // A start number always begins a new list at that level.
    let depth = levels
        .iter()
        .zip(&ctx.list)
        .take_while(|(wanted, open)| {
            wanted.list_type == open.level.list_type && wanted.format.start_number.is_none()
        })
        .count();
    ctx.list.truncate(depth);

    let mut next = ref_node;
    for (index, level) in levels.iter().enumerate().skip(depth) {
        let tag = level.list_type.tag();
        let outer = ctx.list.last().map(|open| open.node);
        let target = outer.unwrap_or(parent);
        let previous = ancestor(dom, cached_li, levels.len() - index)
            .filter(|node| !ctx.claimed_lists.contains(node));
        let element = match cached_element(dom, ctx, previous, target, tag) {
            Some(element) => {
                match outer {
                    Some(outer) => dom.append_child(outer, element)?,
                    None => next = reuse_cached_element(dom, parent, element, ref_node, ctx)?,
                }
                dom.clear_attributes(element)?;
                let released = dom.children(element).to_vec();
                dom.clear_children(element)?;
                ctx.released_list_children.extend(released);
                element
            }
            None => {
                let element = dom.create_element(tag);
                match outer {
                    Some(outer) => dom.append_child(outer, element)?,
                    None => dom.insert_before(parent, element, ref_node)?,
                }
                ctx.rewrite.added_block_elements.push(element);
                element
            }
        };
        ctx.claimed_lists.insert(element);
        {
            let scope = ctx.stack_format(tag);
            config
                .handlers
                .list_level
                .apply(&level.format, dom, element, &scope)?;
        }
        apply_dataset(&level.dataset, dom, element)?;
        tracing::trace!(target: "weft::model_to_dom", tag, depth = ctx.list.len(), "opened list");
        ctx.list.push(ListNode {
            node: element,
            level: level.clone(),
        });
    }
    Ok((ctx.list.last().map(|open| open.node), next))
}

/// The node `steps` parents above `node`.
fn ancestor(dom: &Dom, node: Option<NodeId>, steps: usize) -> Option<NodeId> {
    (0..steps).try_fold(node?, |current, _| dom.parent(current))
}
