use weft_dom::{Dom, DomError, NodeId};

use super::common::*;
use super::{FormatHandler, HandlerList};
use crate::dom_to_model::DomToModelContext;
use crate::format::defaults::DefaultStyle;
use crate::format::{TableCellFormat, TableFormat};
use crate::model_to_dom::ModelToDomContext;

pub(super) fn table_handlers() -> HandlerList<TableFormat> {
    HandlerList::new(vec![
        FormatHandler::new("id", parse_id::<TableFormat>, apply_id::<TableFormat>),
        FormatHandler::new(
            "direction",
            parse_direction::<TableFormat>,
            apply_direction::<TableFormat>,
        ),
        FormatHandler::new(
            "background_color",
            parse_background_color::<TableFormat>,
            apply_background_color::<TableFormat>,
        ),
        FormatHandler::new("margin", parse_margin::<TableFormat>, apply_margin::<TableFormat>),
        FormatHandler::new("border", parse_border::<TableFormat>, apply_border::<TableFormat>),
        FormatHandler::new("size", parse_size::<TableFormat>, apply_size::<TableFormat>),
        FormatHandler::new("aria", parse_aria::<TableFormat>, apply_aria::<TableFormat>),
        FormatHandler::new("table_layout", parse_table_layout, apply_table_layout),
        FormatHandler::new("border_collapse", parse_border_collapse, apply_border_collapse),
        FormatHandler::new("cell_spacing", parse_cell_spacing, apply_cell_spacing),
    ])
}

pub(super) fn cell_handlers() -> HandlerList<TableCellFormat> {
    HandlerList::new(vec![
        FormatHandler::new(
            "direction",
            parse_direction::<TableCellFormat>,
            apply_direction::<TableCellFormat>,
        ),
        FormatHandler::new(
            "text_align",
            parse_text_align::<TableCellFormat>,
            apply_text_align::<TableCellFormat>,
        ),
        FormatHandler::new("vertical_align", parse_vertical_align, apply_vertical_align),
        FormatHandler::new(
            "background_color",
            parse_background_color::<TableCellFormat>,
            apply_background_color::<TableCellFormat>,
        ),
        FormatHandler::new("padding", parse_padding::<TableCellFormat>, apply_cell_padding),
        FormatHandler::new(
            "border",
            parse_border::<TableCellFormat>,
            apply_border::<TableCellFormat>,
        ),
        FormatHandler::new("white_space", parse_cell_white_space, apply_cell_white_space),
    ])
}

fn parse_table_layout(
    format: &mut TableFormat,
    dom: &Dom,
    element: NodeId,
    _ctx: &DomToModelContext<'_>,
    _defaults: &DefaultStyle,
) {
    if let Some(layout) = dom.style_property(element, "table-layout") {
        format.table_layout = Some(layout.into());
    }
}

fn apply_table_layout(
    format: &TableFormat,
    dom: &mut Dom,
    element: NodeId,
    _ctx: &ModelToDomContext<'_>,
) -> Result<(), DomError> {
    match &format.table_layout {
        Some(layout) => dom.set_style_property(element, "table-layout", layout),
        None => Ok(()),
    }
}

fn parse_border_collapse(
    format: &mut TableFormat,
    dom: &Dom,
    element: NodeId,
    _ctx: &DomToModelContext<'_>,
    _defaults: &DefaultStyle,
) {
    if let Some(collapse) = dom.style_property(element, "border-collapse") {
        format.border_collapse = Some(collapse.trim() == "collapse");
    }
}

fn apply_border_collapse(
    format: &TableFormat,
    dom: &mut Dom,
    element: NodeId,
    _ctx: &ModelToDomContext<'_>,
) -> Result<(), DomError> {
    match format.border_collapse {
        Some(true) => dom.set_style_property(element, "border-collapse", "collapse"),
        Some(false) => dom.set_style_property(element, "border-collapse", "separate"),
        None => Ok(()),
    }
}

fn parse_cell_spacing(
    format: &mut TableFormat,
    dom: &Dom,
    element: NodeId,
    _ctx: &DomToModelContext<'_>,
    _defaults: &DefaultStyle,
) {
    if let Some(spacing) = dom.attribute(element, "cellspacing") {
        format.cell_spacing = Some(spacing.trim().into());
    }
}

fn apply_cell_spacing(
    format: &TableFormat,
    dom: &mut Dom,
    element: NodeId,
    _ctx: &ModelToDomContext<'_>,
) -> Result<(), DomError> {
    match &format.cell_spacing {
        Some(spacing) => dom.set_attribute(element, "cellspacing", spacing.as_str()),
        None => Ok(()),
    }
}

fn parse_vertical_align(
    format: &mut TableCellFormat,
    dom: &Dom,
    element: NodeId,
    _ctx: &DomToModelContext<'_>,
    _defaults: &DefaultStyle,
) {
    let value = dom
        .style_property(element, "vertical-align")
        .or_else(|| dom.attribute(element, "valign").map(str::to_string));
    if let Some(align) = value {
        format.vertical_align = Some(align.trim().into());
    }
}

fn apply_vertical_align(
    format: &TableCellFormat,
    dom: &mut Dom,
    element: NodeId,
    _ctx: &ModelToDomContext<'_>,
) -> Result<(), DomError> {
    match &format.vertical_align {
        Some(align) => dom.set_style_property(element, "vertical-align", align),
        None => Ok(()),
    }
}

/// Cell padding is skipped when the table already carries it as a uniform
/// `cellpadding`.
fn apply_cell_padding(
    format: &TableCellFormat,
    dom: &mut Dom,
    element: NodeId,
    ctx: &ModelToDomContext<'_>,
) -> Result<(), DomError> {
    if let Some(uniform) = ctx.table_cell_padding() {
        if format.padding.uniform() == Some(uniform) {
            return Ok(());
        }
    }
    apply_padding(format, dom, element, ctx)
}

fn parse_cell_white_space(
    format: &mut TableCellFormat,
    dom: &Dom,
    element: NodeId,
    _ctx: &DomToModelContext<'_>,
    _defaults: &DefaultStyle,
) {
    if let Some(value) = dom.style_property(element, "white-space") {
        format.white_space = Some(value.into());
    }
}

fn apply_cell_white_space(
    format: &TableCellFormat,
    dom: &mut Dom,
    element: NodeId,
    _ctx: &ModelToDomContext<'_>,
) -> Result<(), DomError> {
    match &format.white_space {
        Some(value) => dom.set_style_property(element, "white-space", value),
        None => Ok(()),
    }
}
