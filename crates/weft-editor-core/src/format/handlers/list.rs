use weft_dom::{Dom, DomError, NodeId};

use super::common::*;
use super::{FormatHandler, HandlerList};
use crate::dom_to_model::DomToModelContext;
use crate::format::ListLevelFormat;
use crate::format::defaults::DefaultStyle;
use crate::model_to_dom::ModelToDomContext;

pub(super) fn handlers() -> HandlerList<ListLevelFormat> {
    HandlerList::new(vec![
        FormatHandler::new(
            "id",
            parse_id::<ListLevelFormat>,
            apply_id::<ListLevelFormat>,
        ),
        FormatHandler::new(
            "direction",
            parse_direction::<ListLevelFormat>,
            apply_direction::<ListLevelFormat>,
        ),
        FormatHandler::new(
            "text_align",
            parse_text_align::<ListLevelFormat>,
            apply_text_align::<ListLevelFormat>,
        ),
        FormatHandler::new(
            "margin",
            parse_margin::<ListLevelFormat>,
            apply_margin::<ListLevelFormat>,
        ),
        FormatHandler::new(
            "padding",
            parse_padding::<ListLevelFormat>,
            apply_padding::<ListLevelFormat>,
        ),
        FormatHandler::new("start_number", parse_start_number, apply_start_number),
        FormatHandler::new("list_style_type", parse_list_style, apply_list_style),
    ])
}

fn parse_start_number(
    format: &mut ListLevelFormat,
    dom: &Dom,
    element: NodeId,
    _ctx: &DomToModelContext<'_>,
    _defaults: &DefaultStyle,
) {
    if let Some(start) = dom
        .attribute(element, "start")
        .and_then(|s| s.trim().parse::<u32>().ok())
    {
        format.start_number = Some(start);
    }
}

fn apply_start_number(
    format: &ListLevelFormat,
    dom: &mut Dom,
    element: NodeId,
    _ctx: &ModelToDomContext<'_>,
) -> Result<(), DomError> {
    match format.start_number {
        Some(start) if dom.is_element_with_tag(element, "ol") => {
            dom.set_attribute(element, "start", start.to_string())
        }
        _ => Ok(()),
    }
}

fn parse_list_style(
    format: &mut ListLevelFormat,
    dom: &Dom,
    element: NodeId,
    _ctx: &DomToModelContext<'_>,
    _defaults: &DefaultStyle,
) {
    if let Some(style) = dom.style_property(element, "list-style-type") {
        format.list_style_type = Some(style.into());
    }
}

fn apply_list_style(
    format: &ListLevelFormat,
    dom: &mut Dom,
    element: NodeId,
    _ctx: &ModelToDomContext<'_>,
) -> Result<(), DomError> {
    match &format.list_style_type {
        Some(style) => dom.set_style_property(element, "list-style-type", style),
        None => Ok(()),
    }
}
