use weft_dom::{Dom, DomError, NodeId};

use super::common::*;
use super::{FormatHandler, HandlerList};
use crate::dom_to_model::DomToModelContext;
use crate::format::ImageFormat;
use crate::format::defaults::DefaultStyle;
use crate::model_to_dom::ModelToDomContext;

pub(super) fn handlers() -> HandlerList<ImageFormat> {
    HandlerList::new(vec![
        FormatHandler::new("id", parse_id::<ImageFormat>, apply_id::<ImageFormat>),
        FormatHandler::new("size", parse_size::<ImageFormat>, apply_size::<ImageFormat>),
        FormatHandler::new("margin", parse_margin::<ImageFormat>, apply_margin::<ImageFormat>),
        FormatHandler::new(
            "padding",
            parse_padding::<ImageFormat>,
            apply_padding::<ImageFormat>,
        ),
        FormatHandler::new("border", parse_border::<ImageFormat>, apply_border::<ImageFormat>),
        FormatHandler::new("aria", parse_aria::<ImageFormat>, apply_aria::<ImageFormat>),
        FormatHandler::new("alt", parse_alt, apply_alt),
        FormatHandler::new("float", parse_float, apply_float),
        FormatHandler::new("vertical_align", parse_vertical_align, apply_vertical_align),
    ])
}

fn parse_alt(
    format: &mut ImageFormat,
    dom: &Dom,
    element: NodeId,
    _ctx: &DomToModelContext<'_>,
    _defaults: &DefaultStyle,
) {
    if let Some(alt) = dom.attribute(element, "alt") {
        format.alt = Some(alt.into());
    }
}

fn apply_alt(
    format: &ImageFormat,
    dom: &mut Dom,
    element: NodeId,
    _ctx: &ModelToDomContext<'_>,
) -> Result<(), DomError> {
    match &format.alt {
        Some(alt) => dom.set_attribute(element, "alt", alt.as_str()),
        None => Ok(()),
    }
}

fn parse_float(
    format: &mut ImageFormat,
    dom: &Dom,
    element: NodeId,
    _ctx: &DomToModelContext<'_>,
    _defaults: &DefaultStyle,
) {
    if let Some(float) = dom.style_property(element, "float") {
        format.float = Some(float.into());
    }
}

fn apply_float(
    format: &ImageFormat,
    dom: &mut Dom,
    element: NodeId,
    _ctx: &ModelToDomContext<'_>,
) -> Result<(), DomError> {
    match &format.float {
        Some(float) => dom.set_style_property(element, "float", float),
        None => Ok(()),
    }
}

fn parse_vertical_align(
    format: &mut ImageFormat,
    dom: &Dom,
    element: NodeId,
    _ctx: &DomToModelContext<'_>,
    _defaults: &DefaultStyle,
) {
    if let Some(align) = dom.style_property(element, "vertical-align") {
        format.vertical_align = Some(align.into());
    }
}

fn apply_vertical_align(
    format: &ImageFormat,
    dom: &mut Dom,
    element: NodeId,
    _ctx: &ModelToDomContext<'_>,
) -> Result<(), DomError> {
    match &format.vertical_align {
        Some(align) => dom.set_style_property(element, "vertical-align", align),
        None => Ok(()),
    }
}
