use weft_dom::{Dom, NodeId};

use super::{DomToModelContext, add_block};
use crate::format::defaults::default_style;
use crate::model::{Block, BlockGroupNode, Divider, FormatContainer, Paragraph, ParagraphDecorator};

fn is_decorator_tag(tag: &str) -> bool {
    matches!(tag, "p" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
}

/// `div`, `p`, headings and the other plain block elements.
///
/// The element's block format stacks onto the ambient one, so nested blocks
/// flatten into sibling paragraphs that each carry the combined format.
pub fn process_known_block(
    group: &mut dyn BlockGroupNode,
    dom: &Dom,
    element: NodeId,
    ctx: &mut DomToModelContext<'_>,
) {
    let config = ctx.config;
    let tag = dom.tag_name(element).unwrap_or("div").to_string();
    let defaults = default_style(&tag);

    ctx.scoped(|ctx| {
        let mut block_format = ctx.block_format.clone();
        config
            .handlers
            .block
            .parse(&mut block_format, dom, element, ctx, &defaults);
        ctx.block_format = block_format;

        let mut segment_format = ctx.segment_format.clone();
        config
            .handlers
            .segment
            .parse(&mut segment_format, dom, element, ctx, &defaults);
        ctx.segment_format = segment_format;

        if is_decorator_tag(&tag) {
            ctx.decorator = Some(ParagraphDecorator {
                tag_name: tag.as_str().into(),
                format: Default::default(),
            });
        }

        let mut paragraph = Paragraph::new(false).with_format(ctx.block_format.clone());
        paragraph.decorator = ctx.decorator.clone();
        if ctx.allow_cache_element {
            paragraph.cached_element = Some(element);
        }
        group.blocks_mut().push(Block::Paragraph(paragraph));

        let child = config.processors.child;
        child(group, dom, element, ctx);
    });

    let blocks = group.blocks_mut();
    blocks.push(Block::Paragraph(super::implicit_paragraph(ctx)));
}

/// `blockquote` and `pre`.
pub fn process_format_container(
    group: &mut dyn BlockGroupNode,
    dom: &Dom,
    element: NodeId,
    ctx: &mut DomToModelContext<'_>,
) {
    let config = ctx.config;
    let tag = dom.tag_name(element).unwrap_or("blockquote").to_string();
    let defaults = default_style(&tag);

    let mut container = FormatContainer::new(&tag);
    let mut format = ctx.block_format.inheritable();
    config
        .handlers
        .block
        .parse(&mut format, dom, element, ctx, &defaults);
    container.format = format;
    if ctx.allow_cache_element {
        container.cached_element = Some(element);
    }

    ctx.scoped(|ctx| {
        ctx.block_format = container.format.inheritable();
        ctx.decorator = None;
        let mut segment_format = ctx.segment_format.clone();
        config
            .handlers
            .segment
            .parse(&mut segment_format, dom, element, ctx, &defaults);
        ctx.segment_format = segment_format;

        let child = config.processors.child;
        child(&mut container, dom, element, ctx);
    });

    add_block(group, Block::FormatContainer(container), ctx);
}

/// `hr`.
pub fn process_divider(
    group: &mut dyn BlockGroupNode,
    dom: &Dom,
    element: NodeId,
    ctx: &mut DomToModelContext<'_>,
) {
    let tag = dom.tag_name(element).unwrap_or("hr");
    let mut divider = Divider::new(tag);
    ctx.config
        .handlers
        .block
        .parse(&mut divider.format, dom, element, ctx, &default_style(tag));
    divider.is_selected = ctx.is_in_selection;
    if ctx.allow_cache_element {
        divider.cached_element = Some(element);
    }
    add_block(group, Block::Divider(divider), ctx);
}
