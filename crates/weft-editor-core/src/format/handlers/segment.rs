//! Inline segment formats.
//!
//! Bold, italic, underline, strikethrough and super/subscript are written as
//! wrapper elements inside the segment element when they differ from the
//! ambient format; everything else becomes an inline style.

use smol_str::SmolStr;
use weft_dom::{Dom, DomError, NodeId};

use super::common::{apply_background_color, parse_background_color, style_value};
use super::{FormatHandler, HandlerList};
use crate::dom_to_model::DomToModelContext;
use crate::format::defaults::DefaultStyle;
use crate::format::{CodeFormat, SegmentFormat, SuperOrSubScript};
use crate::model_to_dom::ModelToDomContext;

pub(super) fn handlers() -> HandlerList<SegmentFormat> {
    HandlerList::new(vec![
        FormatHandler::new("super_or_sub", parse_super_or_sub, apply_super_or_sub),
        FormatHandler::new("strike", parse_strike, apply_strike),
        FormatHandler::new("font_family", parse_font_family, apply_font_family),
        FormatHandler::new("font_size", parse_font_size, apply_font_size),
        FormatHandler::new("bold", parse_bold, apply_bold),
        FormatHandler::new("italic", parse_italic, apply_italic),
        FormatHandler::new("underline", parse_underline, apply_underline),
        FormatHandler::new("text_color", parse_text_color, apply_text_color),
        FormatHandler::new(
            "background_color",
            parse_background_color::<SegmentFormat>,
            apply_background_color::<SegmentFormat>,
        ),
        FormatHandler::new("letter_spacing", parse_letter_spacing, apply_letter_spacing),
        FormatHandler::new("line_height", parse_line_height, apply_line_height),
    ])
}

pub(super) fn code_handlers() -> HandlerList<CodeFormat> {
    HandlerList::new(vec![FormatHandler::new(
        "font_family",
        parse_code_font,
        apply_code_font,
    )])
}

fn ambient<'c>(ctx: &'c ModelToDomContext<'_>) -> &'c SegmentFormat {
    &ctx.implicit_format().segment
}

fn set_style_if_changed(
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

fn text_decoration(dom: &Dom, element: NodeId, defaults: &DefaultStyle) -> Option<SmolStr> {
    dom.style_property(element, "text-decoration-line")
        .map(SmolStr::from)
        .or_else(|| style_value(dom, element, defaults, "text-decoration"))
}

fn parse_font_family(
    format: &mut SegmentFormat,
    dom: &Dom,
    element: NodeId,
    _ctx: &DomToModelContext<'_>,
    defaults: &DefaultStyle,
) {
    let value = style_value(dom, element, defaults, "font-family")
        .or_else(|| dom.attribute(element, "face").map(SmolStr::from));
    if let Some(family) = value {
        format.font_family = Some(family);
    }
}

fn apply_font_family(
    format: &SegmentFormat,
    dom: &mut Dom,
    element: NodeId,
    ctx: &ModelToDomContext<'_>,
) -> Result<(), DomError> {
    set_style_if_changed(
        dom,
        element,
        "font-family",
        format.font_family.as_ref(),
        ambient(ctx).font_family.as_ref(),
    )
}

fn parse_font_size(
    format: &mut SegmentFormat,
    dom: &Dom,
    element: NodeId,
    _ctx: &DomToModelContext<'_>,
    defaults: &DefaultStyle,
) {
    if let Some(size) = style_value(dom, element, defaults, "font-size") {
        format.font_size = Some(size);
    }
}

fn apply_font_size(
    format: &SegmentFormat,
    dom: &mut Dom,
    element: NodeId,
    ctx: &ModelToDomContext<'_>,
) -> Result<(), DomError> {
    set_style_if_changed(
        dom,
        element,
        "font-size",
        format.font_size.as_ref(),
        ambient(ctx).font_size.as_ref(),
    )
}

fn parse_bold(
    format: &mut SegmentFormat,
    dom: &Dom,
    element: NodeId,
    _ctx: &DomToModelContext<'_>,
    defaults: &DefaultStyle,
) {
    if let Some(weight) = style_value(dom, element, defaults, "font-weight") {
        format.font_weight = Some(weight);
    }
}

fn apply_bold(
    format: &SegmentFormat,
    dom: &mut Dom,
    element: NodeId,
    ctx: &ModelToDomContext<'_>,
) -> Result<(), DomError> {
    let Some(weight) = &format.font_weight else {
        return Ok(());
    };
    if format.is_bold() == ambient(ctx).is_bold() {
        return Ok(());
    }
    if weight == "bold" {
        dom.wrap_children(element, "b")?;
        Ok(())
    } else {
        dom.set_style_property(element, "font-weight", weight)
    }
}

fn parse_flag(
    dom: &Dom,
    element: NodeId,
    defaults: &DefaultStyle,
    property: &str,
    on: &[&str],
) -> Option<bool> {
    let value = style_value(dom, element, defaults, property)?;
    Some(on.iter().any(|v| value.split_ascii_whitespace().any(|t| t == *v)))
}

/// Wrap in `tag` when turned on against the ambient, write `off_style`
/// when turned off under an ambient that has it on.
fn apply_flag(
    value: Option<bool>,
    ambient: Option<bool>,
    dom: &mut Dom,
    element: NodeId,
    tag: &str,
    off_style: (&str, &str),
) -> Result<(), DomError> {
    match (value, ambient == Some(true)) {
        (Some(true), false) => {
            dom.wrap_children(element, tag)?;
            Ok(())
        }
        (Some(false), true) => dom.set_style_property(element, off_style.0, off_style.1),
        _ => Ok(()),
    }
}

fn parse_italic(
    format: &mut SegmentFormat,
    dom: &Dom,
    element: NodeId,
    _ctx: &DomToModelContext<'_>,
    defaults: &DefaultStyle,
) {
    if let Some(italic) = parse_flag(dom, element, defaults, "font-style", &["italic", "oblique"]) {
        format.italic = Some(italic);
    }
}

fn apply_italic(
    format: &SegmentFormat,
    dom: &mut Dom,
    element: NodeId,
    ctx: &ModelToDomContext<'_>,
) -> Result<(), DomError> {
    apply_flag(
        format.italic,
        ambient(ctx).italic,
        dom,
        element,
        "i",
        ("font-style", "normal"),
    )
}

fn parse_underline(
    format: &mut SegmentFormat,
    dom: &Dom,
    element: NodeId,
    _ctx: &DomToModelContext<'_>,
    defaults: &DefaultStyle,
) {
    let Some(decoration) = text_decoration(dom, element, defaults) else {
        return;
    };
    if decoration.contains("underline") {
        format.underline = Some(true);
    } else if decoration.trim() == "none" {
        format.underline = Some(false);
    }
}

fn apply_underline(
    format: &SegmentFormat,
    dom: &mut Dom,
    element: NodeId,
    ctx: &ModelToDomContext<'_>,
) -> Result<(), DomError> {
    apply_flag(
        format.underline,
        ambient(ctx).underline,
        dom,
        element,
        "u",
        ("text-decoration", "none"),
    )
}

fn parse_strike(
    format: &mut SegmentFormat,
    dom: &Dom,
    element: NodeId,
    _ctx: &DomToModelContext<'_>,
    defaults: &DefaultStyle,
) {
    let Some(decoration) = text_decoration(dom, element, defaults) else {
        return;
    };
    if decoration.contains("line-through") {
        format.strikethrough = Some(true);
    } else if decoration.trim() == "none" {
        format.strikethrough = Some(false);
    }
}

fn apply_strike(
    format: &SegmentFormat,
    dom: &mut Dom,
    element: NodeId,
    ctx: &ModelToDomContext<'_>,
) -> Result<(), DomError> {
    apply_flag(
        format.strikethrough,
        ambient(ctx).strikethrough,
        dom,
        element,
        "s",
        ("text-decoration", "none"),
    )
}

fn parse_super_or_sub(
    format: &mut SegmentFormat,
    dom: &Dom,
    element: NodeId,
    _ctx: &DomToModelContext<'_>,
    defaults: &DefaultStyle,
) {
    let value = style_value(dom, element, defaults, "vertical-align");
    let parsed = match value.as_deref() {
        Some("super") => Some(SuperOrSubScript::Super),
        Some("sub") => Some(SuperOrSubScript::Sub),
        Some("baseline") => Some(SuperOrSubScript::Baseline),
        _ => None,
    };
    if parsed.is_some() {
        format.super_or_sub = parsed;
    }
}

fn apply_super_or_sub(
    format: &SegmentFormat,
    dom: &mut Dom,
    element: NodeId,
    ctx: &ModelToDomContext<'_>,
) -> Result<(), DomError> {
    let Some(value) = format.super_or_sub else {
        return Ok(());
    };
    if ambient(ctx).super_or_sub == Some(value) {
        return Ok(());
    }
    match value {
        SuperOrSubScript::Super => {
            dom.wrap_children(element, "sup")?;
        }
        SuperOrSubScript::Sub => {
            dom.wrap_children(element, "sub")?;
        }
        SuperOrSubScript::Baseline if ambient(ctx).super_or_sub.is_some() => {
            dom.set_style_property(element, "vertical-align", "baseline")?;
        }
        SuperOrSubScript::Baseline => {}
    }
    Ok(())
}

fn parse_text_color(
    format: &mut SegmentFormat,
    dom: &Dom,
    element: NodeId,
    _ctx: &DomToModelContext<'_>,
    defaults: &DefaultStyle,
) {
    let value = style_value(dom, element, defaults, "color")
        .or_else(|| dom.attribute(element, "color").map(SmolStr::from));
    if let Some(color) = value {
        format.text_color = Some(color);
    }
}

fn apply_text_color(
    format: &SegmentFormat,
    dom: &mut Dom,
    element: NodeId,
    ctx: &ModelToDomContext<'_>,
) -> Result<(), DomError> {
    set_style_if_changed(
        dom,
        element,
        "color",
        format.text_color.as_ref(),
        ambient(ctx).text_color.as_ref(),
    )
}

fn parse_letter_spacing(
    format: &mut SegmentFormat,
    dom: &Dom,
    element: NodeId,
    _ctx: &DomToModelContext<'_>,
    defaults: &DefaultStyle,
) {
    if let Some(value) = style_value(dom, element, defaults, "letter-spacing") {
        format.letter_spacing = Some(value);
    }
}

fn apply_letter_spacing(
    format: &SegmentFormat,
    dom: &mut Dom,
    element: NodeId,
    ctx: &ModelToDomContext<'_>,
) -> Result<(), DomError> {
    set_style_if_changed(
        dom,
        element,
        "letter-spacing",
        format.letter_spacing.as_ref(),
        ambient(ctx).letter_spacing.as_ref(),
    )
}

fn parse_line_height(
    format: &mut SegmentFormat,
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
    format: &SegmentFormat,
    dom: &mut Dom,
    element: NodeId,
    ctx: &ModelToDomContext<'_>,
) -> Result<(), DomError> {
    set_style_if_changed(
        dom,
        element,
        "line-height",
        format.line_height.as_ref(),
        ambient(ctx).line_height.as_ref(),
    )
}

fn parse_code_font(
    format: &mut CodeFormat,
    dom: &Dom,
    element: NodeId,
    _ctx: &DomToModelContext<'_>,
    _defaults: &DefaultStyle,
) {
    // Only an explicit font on the code element itself; the default
    // monospace is implied by the tag.
    if let Some(family) = dom.style_property(element, "font-family") {
        format.font_family = Some(family.into());
    }
}

fn apply_code_font(
    format: &CodeFormat,
    dom: &mut Dom,
    element: NodeId,
    _ctx: &ModelToDomContext<'_>,
) -> Result<(), DomError> {
    match &format.font_family {
        Some(family) if family != "monospace" => {
            dom.set_style_property(element, "font-family", family)
        }
        _ => Ok(()),
    }
}
