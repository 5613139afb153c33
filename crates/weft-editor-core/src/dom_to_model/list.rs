//! Lists.
//!
//! The Model has no list container: every `li` becomes a flat [`ListItem`]
//! carrying the full stack of levels above it. Items of nested lists are
//! hoisted out of the enclosing item and follow it in the same group.

use weft_dom::{Dom, NodeId};

use super::block::process_known_block;
use super::{DomToModelContext, implicit_paragraph};
use crate::format::defaults::default_style;
use crate::format::handlers::parse_dataset;
use crate::model::{Block, BlockGroupNode, ListItem, ListLevel, ListType};

pub fn process_list(
    group: &mut dyn BlockGroupNode,
    dom: &Dom,
    element: NodeId,
    ctx: &mut DomToModelContext<'_>,
) {
    let config = ctx.config;
    let tag = dom.tag_name(element).unwrap_or("ul");
    let defaults = default_style(tag);
    let mut level = ListLevel::new(ListType::from_tag(tag).unwrap_or(ListType::Unordered));
    config
        .handlers
        .list_level
        .parse(&mut level.format, dom, element, ctx, &defaults);
    level.dataset = parse_dataset(dom, element);

    ctx.scoped(|ctx| {
        let mut segment_format = ctx.segment_format.clone();
        config
            .handlers
            .segment
            .parse(&mut segment_format, dom, element, ctx, &defaults);
        ctx.segment_format = segment_format;

        ctx.list_levels.push(level);
        let child = config.processors.child;
        child(group, dom, element, ctx);
        ctx.list_levels.pop();
    });
}

pub fn process_list_item(
    group: &mut dyn BlockGroupNode,
    dom: &Dom,
    element: NodeId,
    ctx: &mut DomToModelContext<'_>,
) {
    if ctx.list_levels.is_empty() {
        process_known_block(group, dom, element, ctx);
        return;
    }

    let config = ctx.config;
    let defaults = default_style("li");
    let mut item = ListItem {
        levels: ctx.list_levels.clone(),
        ..Default::default()
    };
    // A start number belongs to the first item of its list only.
    if let Some(level) = ctx.list_levels.last_mut() {
        level.format.start_number = None;
    }
    if dom.style_property(element, "display").as_deref() == Some("block") {
        if let Some(level) = item.levels.last_mut() {
            level.format.display_for_dummy_item = Some("block".into());
        }
    }
    if ctx.allow_cache_element {
        item.cached_element = Some(element);
    }

    let mut format = ctx.block_format.inheritable();
    config
        .handlers
        .block
        .parse(&mut format, dom, element, ctx, &defaults);
    item.format = format;

    ctx.scoped(|ctx| {
        let mut segment_format = ctx.segment_format.clone();
        config
            .handlers
            .segment
            .parse(&mut segment_format, dom, element, ctx, &defaults);
        item.format_holder = segment_format.clone();
        ctx.segment_format = segment_format;
        ctx.block_format = item.format.inheritable();
        ctx.decorator = None;

        let child = config.processors.child;
        child(&mut item, dom, element, ctx);
    });

    let (nested, own): (Vec<Block>, Vec<Block>) = std::mem::take(&mut item.blocks)
        .into_iter()
        .partition(|block| matches!(block, Block::ListItem(_)));
    item.blocks = own;

    let blocks = group.blocks_mut();
    blocks.push(Block::ListItem(item));
    blocks.extend(nested);
    blocks.push(Block::Paragraph(implicit_paragraph(ctx)));
}
