use weft_dom::{Dom, DomError, NodeId};

use super::common::*;
use super::{FormatHandler, HandlerList};
use crate::dom_to_model::DomToModelContext;
use crate::format::LinkFormat;
use crate::format::defaults::DefaultStyle;
use crate::model_to_dom::ModelToDomContext;

pub(super) fn handlers() -> HandlerList<LinkFormat> {
    HandlerList::new(vec![
        FormatHandler::new("link", parse_link, apply_link),
        FormatHandler::new("id", parse_id::<LinkFormat>, apply_id::<LinkFormat>),
        FormatHandler::new("aria", parse_aria::<LinkFormat>, apply_aria::<LinkFormat>),
    ])
}

fn parse_link(
    format: &mut LinkFormat,
    dom: &Dom,
    element: NodeId,
    _ctx: &DomToModelContext<'_>,
    _defaults: &DefaultStyle,
) {
    for (name, slot) in [
        ("href", &mut format.href),
        ("target", &mut format.target),
        ("rel", &mut format.rel),
        ("name", &mut format.name),
        ("class", &mut format.class_name),
    ] {
        if let Some(value) = dom.attribute(element, name) {
            *slot = Some(value.into());
        }
    }
}

fn apply_link(
    format: &LinkFormat,
    dom: &mut Dom,
    element: NodeId,
    _ctx: &ModelToDomContext<'_>,
) -> Result<(), DomError> {
    for (name, value) in [
        ("href", &format.href),
        ("target", &format.target),
        ("rel", &format.rel),
        ("name", &format.name),
        ("class", &format.class_name),
    ] {
        if let Some(value) = value {
            dom.set_attribute(element, name, value.as_str())?;
        }
    }
    Ok(())
}
