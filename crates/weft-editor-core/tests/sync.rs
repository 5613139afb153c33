//! Markup → Model → markup, the way a host drives the editor between edits.

use insta::assert_snapshot;
use weft_dom::{Dom, DomPosition, NodeId, parse_fragment};
use weft_editor_core::delete::EntityOperation;
use weft_editor_core::model::{
    SegmentKind, clear_cached_elements, find_insert_point, validate,
};
use weft_editor_core::{
    ContentModelDocument, DeleteDirection, DeleteModifiers, DeleteResult, DomSelection,
    DomToModelOptions, EditorConfig, FormatContext, content_model_to_dom, default_delete_steps,
    delete_selection, dom_to_content_model,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("weft=trace")
        .with_test_writer()
        .try_init();
}

fn read(
    config: &EditorConfig,
    dom: &Dom,
    root: NodeId,
    selection: Option<DomSelection>,
) -> ContentModelDocument {
    let mut ctx = config.dom_to_model_context().with_selection(selection);
    dom_to_content_model(dom, root, &mut ctx)
}

fn write(
    config: &EditorConfig,
    dom: &mut Dom,
    root: NodeId,
    model: &mut ContentModelDocument,
) -> Option<DomSelection> {
    let mut ctx = config.model_to_dom_context();
    content_model_to_dom(dom, root, model, &mut ctx).unwrap()
}

/// Render `model` into a fresh tree and read it back.
fn round_trip(config: &EditorConfig, model: &mut ContentModelDocument) -> ContentModelDocument {
    let mut dom = Dom::new();
    let root = dom.create_element("div");
    let selection = write(config, &mut dom, root, model);
    clear_cached_elements(model);
    read(config, &dom, root, selection)
}

fn first_text(dom: &Dom, element: NodeId) -> NodeId {
    dom.descendants(element)
        .into_iter()
        .find(|id| dom.is_text(*id))
        .unwrap()
}

#[test]
fn round_trip_preserves_model() {
    init_tracing();
    let config = EditorConfig::default();
    let (dom, root) = parse_fragment(concat!(
        "<div>hello <b>world</b></div>",
        "<blockquote><div><i>quoted</i></div></blockquote>",
        r#"<div><span style="color: red">red</span> text</div>"#,
        "<table><tr><td>a</td><td>b</td></tr></table>",
    ))
    .unwrap();
    let mut model = read(&config, &dom, root, None);
    let expected = model.clone();

    let again = round_trip(&config, &mut model);
    assert_eq!(again, expected);
}

#[test]
fn round_trip_keeps_caret_inside_merged_text() {
    let config = EditorConfig::default();
    let (dom, root) = parse_fragment("<div>hello</div>").unwrap();
    let text = first_text(&dom, root);
    let mut model = read(
        &config,
        &dom,
        root,
        Some(DomSelection::caret(DomPosition::new(text, 3))),
    );
    let caret = find_insert_point(&model).unwrap();
    let expected = model.clone();

    let again = round_trip(&config, &mut model);
    assert_eq!(again, expected);
    let restored = find_insert_point(&again).unwrap();
    assert_eq!(restored.path, caret.path);
    assert_eq!(restored.marker_index, caret.marker_index);
}

#[test]
fn rerender_with_cache_leaves_markup_untouched() {
    let config = EditorConfig::default().with_dom_to_model_options(
        DomToModelOptions::NORMALIZE | DomToModelOptions::ALLOW_CACHE_ELEMENT,
    );
    let (mut dom, root) =
        parse_fragment("<div>hello <b>world</b></div><div>second</div>").unwrap();
    let before_html = dom.inner_html(root);
    let before_children = dom.children(root).to_vec();

    let mut model = read(&config, &dom, root, None);
    write(&config, &mut dom, root, &mut model);
    assert_eq!(dom.inner_html(root), before_html);
    assert_eq!(dom.children(root), before_children.as_slice());

    write(&config, &mut dom, root, &mut model);
    assert_eq!(dom.children(root), before_children.as_slice());
}

#[test]
fn rendered_paragraph_has_one_text_node() {
    let config = EditorConfig::default();
    let (dom, root) = parse_fragment("<div>ab</div>").unwrap();
    let text = first_text(&dom, root);
    let mut model = read(
        &config,
        &dom,
        root,
        Some(DomSelection::caret(DomPosition::new(text, 1))),
    );

    let mut out = Dom::new();
    let target = out.create_element("div");
    write(&config, &mut out, target, &mut model);
    let div = out.first_child(target).unwrap();
    assert_eq!(out.child_count(div), 1);
    assert_snapshot!(out.inner_html(target), @"<div>ab</div>");
}

#[test]
fn backspace_merges_paragraphs_and_rerenders() {
    init_tracing();
    let config = EditorConfig::default();
    let (mut dom, root) = parse_fragment("<div>abc</div><div>def</div>").unwrap();
    let second = dom.child_at(root, 1).unwrap();
    let text = first_text(&dom, second);
    let mut model = read(
        &config,
        &dom,
        root,
        Some(DomSelection::caret(DomPosition::new(text, 0))),
    );

    let steps = default_delete_steps(DeleteDirection::Backward, DeleteModifiers::empty());
    let mut format_context = FormatContext::default();
    let result = delete_selection(&mut model, &steps, &mut format_context);
    assert_eq!(result.delete_result, DeleteResult::Range);
    validate(&model).unwrap();

    let selection = write(&config, &mut dom, root, &mut model);
    assert_snapshot!(dom.inner_html(root), @"<div>abcdef</div>");

    clear_cached_elements(&mut model);
    let reread = read(&config, &dom, root, selection);
    let caret = find_insert_point(&reread).unwrap();
    assert_eq!(caret.marker_index, 1);
    assert_eq!(reread.blocks.len(), 1);
}

#[test]
fn backspace_after_entity_reports_it() {
    let config = EditorConfig::default();
    let (mut dom, root) = parse_fragment(concat!(
        r#"<div>a<span class="_Entity _EType_mention _EId_1" contenteditable="false">"#,
        "@bob</span>b</div>",
    ))
    .unwrap();
    let div = dom.first_child(root).unwrap();
    let wrapper = dom.child_at(div, 1).unwrap();
    let after = dom.child_at(div, 2).unwrap();
    let mut model = read(
        &config,
        &dom,
        root,
        Some(DomSelection::caret(DomPosition::new(after, 0))),
    );

    let steps = default_delete_steps(DeleteDirection::Backward, DeleteModifiers::empty());
    let mut format_context = FormatContext::default();
    let result = delete_selection(&mut model, &steps, &mut format_context);
    assert_eq!(result.delete_result, DeleteResult::SingleChar);
    assert_eq!(format_context.deleted_entities.len(), 1);
    let deleted = &format_context.deleted_entities[0];
    assert_eq!(deleted.entity.wrapper, wrapper);
    assert_eq!(deleted.operation, EntityOperation::RemoveFromEnd);

    let paragraph = model.blocks[0].as_paragraph().unwrap();
    assert!(
        !paragraph
            .segments
            .iter()
            .any(|s| matches!(s.kind, SegmentKind::Entity(_)))
    );

    write(&config, &mut dom, root, &mut model);
    assert_snapshot!(dom.inner_html(root), @"<div>ab</div>");
}

#[test]
fn range_over_line_break_joins_lines() {
    for direction in [DeleteDirection::Backward, DeleteDirection::Forward] {
        let config = EditorConfig::default();
        let (mut dom, root) = parse_fragment("<div>abc</div><div>def</div>").unwrap();
        let first = first_text(&dom, dom.child_at(root, 0).unwrap());
        let second = first_text(&dom, dom.child_at(root, 1).unwrap());
        let mut model = read(
            &config,
            &dom,
            root,
            Some(DomSelection::range(
                DomPosition::new(first, 3),
                DomPosition::new(second, 0),
            )),
        );

        let steps = default_delete_steps(direction, DeleteModifiers::empty());
        let result = delete_selection(&mut model, &steps, &mut FormatContext::default());
        assert_eq!(result.delete_result, DeleteResult::Range);
        validate(&model).unwrap();
        assert_eq!(model.blocks.len(), 1);
        assert_eq!(result.insert_point.unwrap().marker_index, 1);

        write(&config, &mut dom, root, &mut model);
        assert_eq!(dom.inner_html(root), "<div>abcdef</div>");
    }
}

#[test]
fn read_only_entity_survives_rerender() {
    let config = EditorConfig::default();
    let (mut dom, root) = parse_fragment(
        r#"<div class="_Entity _EType_x _EId_1" contenteditable="false">E</div>"#,
    )
    .unwrap();
    let wrapper = dom.first_child(root).unwrap();
    let mut model = read(&config, &dom, root, None);

    write(&config, &mut dom, root, &mut model);
    assert_eq!(dom.first_child(root), Some(wrapper));
    assert_eq!(dom.content_editable(wrapper), Some(false));
    assert_eq!(dom.text_content(wrapper), "E");
}

#[test]
fn nothing_before_document_start() {
    let config = EditorConfig::default();
    let (dom, root) = parse_fragment("<div>abc</div>").unwrap();
    let text = first_text(&dom, root);
    let mut model = read(
        &config,
        &dom,
        root,
        Some(DomSelection::caret(DomPosition::new(text, 0))),
    );
    let expected = model.clone();

    let steps = default_delete_steps(DeleteDirection::Backward, DeleteModifiers::empty());
    let result = delete_selection(&mut model, &steps, &mut FormatContext::default());
    assert_eq!(result.delete_result, DeleteResult::NothingToDelete);
    assert_eq!(model, expected);
}
