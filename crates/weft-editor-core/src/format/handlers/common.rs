//! Handlers shared by several format categories.

use smol_str::SmolStr;
use weft_dom::{Dom, DomError, NodeId};

use super::AmbientFormat;
use crate::dom_to_model::DomToModelContext;
use crate::format::defaults::DefaultStyle;
use crate::format::{
    BorderFormat, BoxSides, Direction, HasAria, HasBackgroundColor, HasBorder, HasDirection,
    HasId, HasMargin, HasPadding, HasSize, HasTextAlign, TextAlign,
};
use crate::model_to_dom::ModelToDomContext;

/// Inline style value of `name`, else the tag default.
pub(super) fn style_value(
    dom: &Dom,
    element: NodeId,
    defaults: &DefaultStyle,
    name: &str,
) -> Option<SmolStr> {
    dom.style_property(element, name)
        .map(SmolStr::from)
        .or_else(|| defaults.get(name).map(SmolStr::from))
}

/// Expand a 1 to 4 value box shorthand into top/right/bottom/left.
fn expand_shorthand(value: &str) -> Option<[SmolStr; 4]> {
    let parts: Vec<&str> = value.split_ascii_whitespace().collect();
    let [top, right, bottom, left] = match parts.as_slice() {
        [all] => [*all, *all, *all, *all],
        [vertical, horizontal] => [*vertical, *horizontal, *vertical, *horizontal],
        [top, horizontal, bottom] => [*top, *horizontal, *bottom, *horizontal],
        [top, right, bottom, left] => [*top, *right, *bottom, *left],
        _ => return None,
    };
    Some([top.into(), right.into(), bottom.into(), left.into()])
}

fn parse_box(dom: &Dom, element: NodeId, defaults: &DefaultStyle, prefix: &str, sides: &mut BoxSides) {
    let style = dom.style(element);
    let shorthand = style.get(prefix).and_then(expand_shorthand);
    for (i, side) in BoxSides::SIDES.iter().enumerate() {
        let name = format!("{prefix}-{side}");
        let value = style
            .get(&name)
            .map(SmolStr::from)
            .or_else(|| shorthand.as_ref().map(|s| s[i].clone()))
            .or_else(|| defaults.get(&name).map(SmolStr::from));
        if let (Some(value), Some(slot)) = (value, sides.side_mut(side)) {
            *slot = Some(value);
        }
    }
}

fn apply_box(
    sides: &BoxSides,
    ambient: Option<&BoxSides>,
    prefix: &str,
    dom: &mut Dom,
    element: NodeId,
) -> Result<(), DomError> {
    for side in BoxSides::SIDES {
        let Some(value) = sides.side(side) else {
            continue;
        };
        if ambient.and_then(|a| a.side(side)) == Some(value) {
            continue;
        }
        dom.set_style_property(element, &format!("{prefix}-{side}"), value)?;
    }
    Ok(())
}

pub(super) fn parse_direction<F: HasDirection>(
    format: &mut F,
    dom: &Dom,
    element: NodeId,
    _ctx: &DomToModelContext<'_>,
    _defaults: &DefaultStyle,
) {
    let value = dom
        .style_property(element, "direction")
        .or_else(|| dom.attribute(element, "dir").map(str::to_string));
    if let Some(direction) = value.as_deref().and_then(Direction::parse) {
        *format.direction_mut() = Some(direction);
    }
}

pub(super) fn apply_direction<F: HasDirection + AmbientFormat>(
    format: &F,
    dom: &mut Dom,
    element: NodeId,
    ctx: &ModelToDomContext<'_>,
) -> Result<(), DomError> {
    let Some(direction) = *format.direction() else {
        return Ok(());
    };
    let ambient = F::ambient(ctx).and_then(|a| *a.direction());
    if ambient != Some(direction) {
        dom.set_attribute(element, "dir", direction.as_str())?;
    }
    Ok(())
}

pub(super) fn parse_text_align<F: HasTextAlign + HasDirection>(
    format: &mut F,
    dom: &Dom,
    element: NodeId,
    ctx: &DomToModelContext<'_>,
    defaults: &DefaultStyle,
) {
    let value = dom
        .style_property(element, "text-align")
        .or_else(|| dom.attribute(element, "align").map(str::to_string))
        .or_else(|| defaults.get("text-align").map(str::to_string));
    let direction = format.direction().or(ctx.block_format.direction);
    if let Some(align) = value.and_then(|v| TextAlign::parse(&v, direction)) {
        *format.text_align_mut() = Some(align);
    }
}

pub(super) fn apply_text_align<F: HasTextAlign + HasDirection + AmbientFormat>(
    format: &F,
    dom: &mut Dom,
    element: NodeId,
    ctx: &ModelToDomContext<'_>,
) -> Result<(), DomError> {
    let Some(align) = *format.text_align() else {
        return Ok(());
    };
    let ambient = F::ambient(ctx);
    if ambient.and_then(|a| *a.text_align()) == Some(align) {
        return Ok(());
    }
    let direction = format
        .direction()
        .or_else(|| ambient.and_then(|a| *a.direction()));
    dom.set_style_property(element, "text-align", align.to_css(direction))
}

pub(super) fn parse_background_color<F: HasBackgroundColor>(
    format: &mut F,
    dom: &Dom,
    element: NodeId,
    _ctx: &DomToModelContext<'_>,
    defaults: &DefaultStyle,
) {
    if let Some(color) = style_value(dom, element, defaults, "background-color") {
        *format.background_color_mut() = Some(color);
    }
}

pub(super) fn apply_background_color<F: HasBackgroundColor + AmbientFormat>(
    format: &F,
    dom: &mut Dom,
    element: NodeId,
    ctx: &ModelToDomContext<'_>,
) -> Result<(), DomError> {
    let Some(color) = format.background_color() else {
        return Ok(());
    };
    if F::ambient(ctx).and_then(|a| a.background_color().as_ref()) == Some(color) {
        return Ok(());
    }
    dom.set_style_property(element, "background-color", color)
}

pub(super) fn parse_margin<F: HasMargin>(
    format: &mut F,
    dom: &Dom,
    element: NodeId,
    _ctx: &DomToModelContext<'_>,
    defaults: &DefaultStyle,
) {
    parse_box(dom, element, defaults, "margin", format.margin_mut());
}

pub(super) fn apply_margin<F: HasMargin + AmbientFormat>(
    format: &F,
    dom: &mut Dom,
    element: NodeId,
    ctx: &ModelToDomContext<'_>,
) -> Result<(), DomError> {
    let ambient = F::ambient(ctx).map(|a| a.margin());
    apply_box(format.margin(), ambient, "margin", dom, element)
}

pub(super) fn parse_padding<F: HasPadding>(
    format: &mut F,
    dom: &Dom,
    element: NodeId,
    _ctx: &DomToModelContext<'_>,
    defaults: &DefaultStyle,
) {
    parse_box(dom, element, defaults, "padding", format.padding_mut());
}

pub(super) fn apply_padding<F: HasPadding + AmbientFormat>(
    format: &F,
    dom: &mut Dom,
    element: NodeId,
    ctx: &ModelToDomContext<'_>,
) -> Result<(), DomError> {
    let ambient = F::ambient(ctx).map(|a| a.padding());
    apply_box(format.padding(), ambient, "padding", dom, element)
}

pub(super) fn parse_border<F: HasBorder>(
    format: &mut F,
    dom: &Dom,
    element: NodeId,
    _ctx: &DomToModelContext<'_>,
    _defaults: &DefaultStyle,
) {
    let style = dom.style(element);
    let border: &mut BorderFormat = format.border_mut();
    let shorthand = style.get("border").map(SmolStr::from);
    for side in BoxSides::SIDES {
        let value = style
            .get(&format!("border-{side}"))
            .map(SmolStr::from)
            .or_else(|| shorthand.clone());
        if let (Some(value), Some(slot)) = (value, border.side_mut(side)) {
            *slot = Some(value);
        }
    }
    if let Some(radius) = style.get("border-radius") {
        border.radius = Some(radius.into());
    }
}

pub(super) fn apply_border<F: HasBorder>(
    format: &F,
    dom: &mut Dom,
    element: NodeId,
    _ctx: &ModelToDomContext<'_>,
) -> Result<(), DomError> {
    let border = format.border();
    for side in BoxSides::SIDES {
        if let Some(value) = border.side(side) {
            dom.set_style_property(element, &format!("border-{side}"), value)?;
        }
    }
    if let Some(radius) = &border.radius {
        dom.set_style_property(element, "border-radius", radius)?;
    }
    Ok(())
}

/// A length from an HTML dimension attribute: bare numbers are pixels.
fn dimension_attribute(dom: &Dom, element: NodeId, name: &str) -> Option<SmolStr> {
    let value = dom.attribute(element, name)?.trim();
    if value.is_empty() {
        None
    } else if value.chars().all(|c| c.is_ascii_digit() || c == '.') {
        Some(smol_str::format_smolstr!("{value}px"))
    } else {
        Some(value.into())
    }
}

pub(super) fn parse_size<F: HasSize>(
    format: &mut F,
    dom: &Dom,
    element: NodeId,
    _ctx: &DomToModelContext<'_>,
    _defaults: &DefaultStyle,
) {
    let style = dom.style(element);
    let size = format.size_mut();
    if let Some(width) = style
        .get("width")
        .map(SmolStr::from)
        .or_else(|| dimension_attribute(dom, element, "width"))
    {
        size.width = Some(width);
    }
    if let Some(height) = style
        .get("height")
        .map(SmolStr::from)
        .or_else(|| dimension_attribute(dom, element, "height"))
    {
        size.height = Some(height);
    }
    for (name, slot) in [
        ("min-width", &mut size.min_width),
        ("max-width", &mut size.max_width),
        ("min-height", &mut size.min_height),
        ("max-height", &mut size.max_height),
    ] {
        if let Some(value) = style.get(name) {
            *slot = Some(value.into());
        }
    }
}

pub(super) fn apply_size<F: HasSize>(
    format: &F,
    dom: &mut Dom,
    element: NodeId,
    _ctx: &ModelToDomContext<'_>,
) -> Result<(), DomError> {
    let size = format.size();
    for (name, value) in [
        ("width", &size.width),
        ("height", &size.height),
        ("min-width", &size.min_width),
        ("max-width", &size.max_width),
        ("min-height", &size.min_height),
        ("max-height", &size.max_height),
    ] {
        if let Some(value) = value {
            dom.set_style_property(element, name, value)?;
        }
    }
    Ok(())
}

pub(super) fn parse_id<F: HasId>(
    format: &mut F,
    dom: &Dom,
    element: NodeId,
    _ctx: &DomToModelContext<'_>,
    _defaults: &DefaultStyle,
) {
    if let Some(id) = dom.attribute(element, "id").filter(|id| !id.is_empty()) {
        *format.id_mut() = Some(id.into());
    }
}

pub(super) fn apply_id<F: HasId>(
    format: &F,
    dom: &mut Dom,
    element: NodeId,
    _ctx: &ModelToDomContext<'_>,
) -> Result<(), DomError> {
    match format.id() {
        Some(id) => dom.set_attribute(element, "id", id.as_str()),
        None => Ok(()),
    }
}

pub(super) fn parse_aria<F: HasAria>(
    format: &mut F,
    dom: &Dom,
    element: NodeId,
    _ctx: &DomToModelContext<'_>,
    _defaults: &DefaultStyle,
) {
    let aria = format.aria_mut();
    for (name, slot) in [
        ("role", &mut aria.role),
        ("title", &mut aria.title),
        ("aria-describedby", &mut aria.described_by),
    ] {
        if let Some(value) = dom.attribute(element, name) {
            *slot = Some(value.into());
        }
    }
}

pub(super) fn apply_aria<F: HasAria>(
    format: &F,
    dom: &mut Dom,
    element: NodeId,
    _ctx: &ModelToDomContext<'_>,
) -> Result<(), DomError> {
    let aria = format.aria();
    for (name, value) in [
        ("role", &aria.role),
        ("title", &aria.title),
        ("aria-describedby", &aria.described_by),
    ] {
        if let Some(value) = value {
            dom.set_attribute(element, name, value.as_str())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_shorthand() {
        let sides = expand_shorthand("1px 2px").unwrap();
        assert_eq!(sides.map(|s| s.to_string()), ["1px", "2px", "1px", "2px"]);
        let sides = expand_shorthand("1px 2px 3px").unwrap();
        assert_eq!(sides.map(|s| s.to_string()), ["1px", "2px", "3px", "2px"]);
        assert!(expand_shorthand("").is_none());
    }
}
