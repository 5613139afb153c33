use weft_dom::{Dom, DomError, NodeId};

use super::*;
use crate::config::EditorConfig;
use crate::format::defaults::default_style;
use crate::format::{Direction, TextAlign};

fn parse_id_upper(
    format: &mut BlockFormat,
    dom: &Dom,
    element: NodeId,
    _ctx: &DomToModelContext<'_>,
    _defaults: &DefaultStyle,
) {
    if let Some(id) = dom.attribute(element, "id") {
        format.id = Some(id.to_ascii_uppercase().into());
    }
}

fn apply_marker(
    _format: &BlockFormat,
    dom: &mut Dom,
    element: NodeId,
    _ctx: &ModelToDomContext<'_>,
) -> Result<(), DomError> {
    dom.set_attribute(element, "data-weft", "1")
}

fn ignore_parse(
    _format: &mut BlockFormat,
    _dom: &Dom,
    _element: NodeId,
    _ctx: &DomToModelContext<'_>,
    _defaults: &DefaultStyle,
) {
}

fn element(style: &str) -> (Dom, NodeId) {
    let mut dom = Dom::new();
    let id = dom.create_element("div");
    dom.set_attribute(id, "style", style).unwrap();
    (dom, id)
}

#[test]
fn test_direction_registered_before_text_align() {
    let handlers = FormatHandlers::default();
    let names: Vec<_> = handlers.block.names().collect();
    let direction = names.iter().position(|n| *n == "direction").unwrap();
    let align = names.iter().position(|n| *n == "text_align").unwrap();
    assert!(direction < align);
}

#[test]
fn test_text_align_resolves_against_parsed_direction() {
    let config = EditorConfig::default();
    let ctx = config.dom_to_model_context();
    let (mut dom, div) = element("text-align: right");
    dom.set_attribute(div, "dir", "rtl").unwrap();

    let mut format = BlockFormat::default();
    config
        .handlers
        .block
        .parse(&mut format, &dom, div, &ctx, &default_style("div"));
    assert_eq!(format.direction, Some(Direction::Rtl));
    assert_eq!(format.text_align, Some(TextAlign::Start));
}

#[test]
fn test_segment_parse_and_apply() {
    let config = EditorConfig::default();
    let (dom, span) = element("color: red; font-size: 12pt");
    let mut format = SegmentFormat::default();
    config.handlers.segment.parse(
        &mut format,
        &dom,
        span,
        &config.dom_to_model_context(),
        &DefaultStyle::default(),
    );
    assert_eq!(format.text_color.as_deref(), Some("red"));
    assert_eq!(format.font_size.as_deref(), Some("12pt"));
    assert_eq!(format.font_weight, None);

    let mut out = Dom::new();
    let target = out.create_element("span");
    config
        .handlers
        .segment
        .apply(&format, &mut out, target, &config.model_to_dom_context())
        .unwrap();
    assert_eq!(out.style_property(target, "color").as_deref(), Some("red"));
    assert_eq!(out.style_property(target, "font-size").as_deref(), Some("12pt"));
}

#[test]
fn test_bold_wraps_children_unless_ambient() {
    let config = EditorConfig::default();
    let format = SegmentFormat {
        font_weight: Some("bold".into()),
        ..Default::default()
    };

    let mut dom = Dom::new();
    let span = dom.create_element("span");
    let text = dom.create_text("hi");
    dom.append_child(span, text).unwrap();
    let mut ctx = config.model_to_dom_context();
    config
        .handlers
        .segment
        .apply(&format, &mut dom, span, &ctx)
        .unwrap();
    assert_eq!(dom.inner_html(span), "<b>hi</b>");

    let plain = dom.create_element("span");
    let text = dom.create_text("hi");
    dom.append_child(plain, text).unwrap();
    let bold = ctx.stack_format("b");
    config
        .handlers
        .segment
        .apply(&format, &mut dom, plain, &bold)
        .unwrap();
    assert_eq!(dom.inner_html(plain), "hi");
}

#[test]
fn test_replace_keeps_position() {
    let mut list = FormatHandlers::default().block;
    let before: Vec<_> = list.names().collect();
    assert!(list.replace(FormatHandler::new("id", parse_id_upper, apply_marker)));
    assert_eq!(list.names().collect::<Vec<_>>(), before);
    assert!(!list.replace(FormatHandler::new("nope", parse_id_upper, apply_marker)));
    assert_eq!(list.names().count(), before.len());

    let config = EditorConfig::default();
    let mut dom = Dom::new();
    let div = dom.create_element("div");
    dom.set_attribute(div, "id", "intro").unwrap();
    let mut format = BlockFormat::default();
    list.parse(
        &mut format,
        &dom,
        div,
        &config.dom_to_model_context(),
        &DefaultStyle::default(),
    );
    assert_eq!(format.id.as_deref(), Some("INTRO"));
}

#[test]
fn test_insert_after_push_and_remove() {
    let mut list = HandlerList::new(Vec::new());
    list.push(FormatHandler::new("a", ignore_parse, apply_marker));
    list.push(FormatHandler::new("c", ignore_parse, apply_marker));
    list.insert_after("a", FormatHandler::new("b", ignore_parse, apply_marker));
    list.insert_after("missing", FormatHandler::new("d", ignore_parse, apply_marker));
    assert_eq!(list.names().collect::<Vec<_>>(), ["a", "b", "c", "d"]);

    assert_eq!(list.remove("b").map(|h| h.name), Some("b"));
    assert!(list.remove("b").is_none());
    assert!(list.get("c").is_some());
    assert_eq!(list.names().collect::<Vec<_>>(), ["a", "c", "d"]);
}

#[test]
fn test_removed_handler_is_not_applied() {
    let config = EditorConfig::default();
    let mut block = config.handlers.block.clone();
    block.push(FormatHandler::new("weft", ignore_parse, apply_marker));

    let mut dom = Dom::new();
    let div = dom.create_element("div");
    let ctx = config.model_to_dom_context();
    block
        .apply(&BlockFormat::default(), &mut dom, div, &ctx)
        .unwrap();
    assert_eq!(dom.attribute(div, "data-weft"), Some("1"));

    block.remove("weft");
    let other = dom.create_element("div");
    block
        .apply(&BlockFormat::default(), &mut dom, other, &ctx)
        .unwrap();
    assert!(!dom.has_attribute(other, "data-weft"));
}
