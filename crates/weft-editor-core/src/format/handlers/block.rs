use smol_str::SmolStr;
use weft_dom::{Dom, DomError, NodeId};

use super::common::*;
use super::{FormatHandler, HandlerList};
use crate::dom_to_model::DomToModelContext;
use crate::format::BlockFormat;
use crate::format::defaults::DefaultStyle;
use crate::model_to_dom::ModelToDomContext;

pub(super) fn handlers() -> HandlerList<BlockFormat> {
    HandlerList::new(vec![
        FormatHandler::new("id", parse_id::<BlockFormat>, apply_id::<BlockFormat>),
        FormatHandler::new(
            "background_color",
            parse_background_color::<BlockFormat>,
            apply_background_color::<BlockFormat>,
        ),
        FormatHandler::new(
            "direction",
            parse_direction::<BlockFormat>,
            apply_direction::<BlockFormat>,
        ),
        FormatHandler::new(
            "text_align",
            parse_text_align::<BlockFormat>,
            apply_text_align::<BlockFormat>,
        ),
        FormatHandler::new("margin", parse_margin::<BlockFormat>, apply_margin::<BlockFormat>),
        FormatHandler::new(
            "padding",
            parse_padding::<BlockFormat>,
            apply_padding::<BlockFormat>,
        ),
        FormatHandler::new("border", parse_border::<BlockFormat>, apply_border::<BlockFormat>),
        FormatHandler::new("line_height", parse_line_height, apply_line_height),
        FormatHandler::new("white_space", parse_white_space, apply_white_space),
        FormatHandler::new("text_indent", parse_text_indent, apply_text_indent),
    ])
}

fn parse_line_height(
    format: &mut BlockFormat,
    dom: &Dom,
    element: NodeId,
    _ctx: &DomToModelContext<'_>,
    defaults: &DefaultStyle,
) {
    if let Some(value) = style_value(dom, element, defaults, "line-height") {
        format.line_height = Some(value);
    }
}

fn apply_line_height(
    format: &BlockFormat,
    dom: &mut Dom,
    element: NodeId,
    ctx: &ModelToDomContext<'_>,
) -> Result<(), DomError> {
    apply_if_changed(
        dom,
        element,
        "line-height",
        format.line_height.as_ref(),
        ctx.implicit_format().block.line_height.as_ref(),
    )
}

fn parse_white_space(
    format: &mut BlockFormat,
    dom: &Dom,
    element: NodeId,
    _ctx: &DomToModelContext<'_>,
    defaults: &DefaultStyle,
) {
    if let Some(value) = style_value(dom, element, defaults, "white-space") {
        format.white_space = Some(value);
    }
}

fn apply_white_space(
    format: &BlockFormat,
    dom: &mut Dom,
    element: NodeId,
    ctx: &ModelToDomContext<'_>,
) -> Result<(), DomError> {
    apply_if_changed(
        dom,
        element,
        "white-space",
        format.white_space.as_ref(),
        ctx.implicit_format().block.white_space.as_ref(),
    )
}

fn parse_text_indent(
    format: &mut BlockFormat,
    dom: &Dom,
    element: NodeId,
    _ctx: &DomToModelContext<'_>,
    defaults: &DefaultStyle,
) {
    if let Some(value) = style_value(dom, element, defaults, "text-indent") {
        format.text_indent = Some(value);
    }
}

fn apply_text_indent(
    format: &BlockFormat,
    dom: &mut Dom,
    element: NodeId,
    ctx: &ModelToDomContext<'_>,
) -> Result<(), DomError> {
    apply_if_changed(
        dom,
        element,
        "text-indent",
        format.text_indent.as_ref(),
        ctx.implicit_format().block.text_indent.as_ref(),
    )
}

fn apply_if_changed(
    dom: &mut Dom,
    element: NodeId,
    name: &str,
    value: Option<&SmolStr>,
    ambient: Option<&SmolStr>,
) -> Result<(), DomError> {
    match value {
        Some(value) if ambient != Some(value) => dom.set_style_property(element, name, value),
        _ => Ok(()),
    }
}
