use weft_dom::{Dom, NodeId};

use super::{DomToModelContext, add_segment};
use crate::format::CodeFormat;
use crate::format::defaults::default_style;
use crate::format::handlers::parse_dataset;
use crate::model::{BlockGroupNode, Image, Link, SegmentKind};
use crate::selection::DomSelection;

fn parse_segment_format(dom: &Dom, element: NodeId, ctx: &mut DomToModelContext<'_>) {
    let tag = dom.tag_name(element).unwrap_or("span");
    let mut format = ctx.segment_format.clone();
    ctx.config
        .handlers
        .segment
        .parse(&mut format, dom, element, ctx, &default_style(tag));
    ctx.segment_format = format;
}

/// Inline formatting wrappers: `b`, `i`, `span`, `font`...
pub fn process_format(
    group: &mut dyn BlockGroupNode,
    dom: &Dom,
    element: NodeId,
    ctx: &mut DomToModelContext<'_>,
) {
    ctx.scoped(|ctx| {
        parse_segment_format(dom, element, ctx);
        let child = ctx.config.processors.child;
        child(group, dom, element, ctx);
    });
}

pub fn process_link(
    group: &mut dyn BlockGroupNode,
    dom: &Dom,
    element: NodeId,
    ctx: &mut DomToModelContext<'_>,
) {
    ctx.scoped(|ctx| {
        let mut link = Link::default();
        ctx.config
            .handlers
            .link
            .parse(&mut link.format, dom, element, ctx, &default_style("a"));
        link.dataset = parse_dataset(dom, element);
        if link.format.href.is_some() || link.format.name.is_some() {
            ctx.link = Some(link);
        }
        parse_segment_format(dom, element, ctx);
        let child = ctx.config.processors.child;
        child(group, dom, element, ctx);
    });
}

pub fn process_code(
    group: &mut dyn BlockGroupNode,
    dom: &Dom,
    element: NodeId,
    ctx: &mut DomToModelContext<'_>,
) {
    ctx.scoped(|ctx| {
        let mut code = CodeFormat::default();
        ctx.config
            .handlers
            .code
            .parse(&mut code, dom, element, ctx, &default_style("code"));
        ctx.code = Some(code);
        parse_segment_format(dom, element, ctx);
        let child = ctx.config.processors.child;
        child(group, dom, element, ctx);
    });
}

pub fn process_br(
    group: &mut dyn BlockGroupNode,
    _dom: &Dom,
    _element: NodeId,
    ctx: &mut DomToModelContext<'_>,
) {
    add_segment(group, ctx.segment(SegmentKind::Br), ctx);
}

pub fn process_image(
    group: &mut dyn BlockGroupNode,
    dom: &Dom,
    element: NodeId,
    ctx: &mut DomToModelContext<'_>,
) {
    let mut image = Image {
        src: dom.attribute(element, "src").unwrap_or_default().to_string(),
        dataset: parse_dataset(dom, element),
        ..Default::default()
    };
    ctx.config
        .handlers
        .image
        .parse(&mut image.format, dom, element, ctx, &default_style("img"));

    let selected_as_image = matches!(
        ctx.selection,
        Some(DomSelection::Image { image: selected }) if selected == element
    );
    image.is_selected_as_image_selection = selected_as_image;

    let segment = ctx.segment(SegmentKind::Image(image));
    let is_selected = segment.is_selected || selected_as_image;
    add_segment(group, segment.with_selected(is_selected), ctx);
}
