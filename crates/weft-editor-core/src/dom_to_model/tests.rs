use weft_dom::{Dom, DomPosition, NodeId, parse_fragment};

use super::*;
use crate::config::{DomToModelOptions, EditorConfig};
use crate::format::SuperOrSubScript;
use crate::model::{Block, ListItem, ListType, SegmentKind};

fn convert(html: &str) -> ContentModelDocument {
    let (dom, root) = parse_fragment(html).unwrap();
    let config = EditorConfig::default();
    let mut ctx = config.dom_to_model_context();
    dom_to_content_model(&dom, root, &mut ctx)
}

fn convert_with_selection(
    html: &str,
    selection: impl FnOnce(&Dom, NodeId) -> DomSelection,
) -> ContentModelDocument {
    let (dom, root) = parse_fragment(html).unwrap();
    let config = EditorConfig::default();
    let mut ctx = config
        .dom_to_model_context()
        .with_selection(Some(selection(&dom, root)));
    dom_to_content_model(&dom, root, &mut ctx)
}

fn paragraph(doc: &ContentModelDocument, index: usize) -> &Paragraph {
    doc.blocks[index].as_paragraph().unwrap()
}

fn texts(p: &Paragraph) -> Vec<Option<&str>> {
    p.segments.iter().map(|s| s.as_text()).collect()
}

#[test]
fn test_block_with_inline_format() {
    let doc = convert("<div>hello <b>world</b></div>");
    assert_eq!(doc.blocks.len(), 1);
    let p = paragraph(&doc, 0);
    assert!(!p.is_implicit);
    assert_eq!(texts(p), vec![Some("hello "), Some("world")]);
    assert!(!p.segments[0].format.is_bold());
    assert!(p.segments[1].format.is_bold());
}

#[test]
fn test_inline_content_gets_implicit_paragraph() {
    let doc = convert("one<i>two</i><sup>3</sup>");
    assert_eq!(doc.blocks.len(), 1);
    let p = paragraph(&doc, 0);
    assert!(p.is_implicit);
    assert_eq!(texts(p), vec![Some("one"), Some("two"), Some("3")]);
    assert_eq!(p.segments[1].format.italic, Some(true));
    assert_eq!(
        p.segments[2].format.super_or_sub,
        Some(SuperOrSubScript::Super)
    );
}

#[test]
fn test_heading_decorator() {
    let doc = convert("<h1>Title</h1><p>body</p>");
    assert_eq!(doc.blocks.len(), 2);
    let heading = paragraph(&doc, 0);
    assert_eq!(
        heading.decorator.as_ref().map(|d| d.tag_name.as_str()),
        Some("h1")
    );
    assert!(heading.segments[0].format.is_bold());
    assert_eq!(heading.segments[0].format.font_size.as_deref(), Some("2em"));
    let body = paragraph(&doc, 1);
    assert_eq!(
        body.decorator.as_ref().map(|d| d.tag_name.as_str()),
        Some("p")
    );
    assert_eq!(body.format.margin.top.as_deref(), Some("1em"));
}

#[test]
fn test_white_space_collapses_outside_pre() {
    let doc = convert("<div>  a \n\t b  </div>\n<div>c</div>");
    assert_eq!(doc.blocks.len(), 2);
    assert_eq!(texts(paragraph(&doc, 0)), vec![Some("a b")]);
    assert_eq!(texts(paragraph(&doc, 1)), vec![Some("c")]);
}

#[test]
fn test_pre_keeps_white_space() {
    let doc = convert("<pre>  a\n b</pre>");
    assert_eq!(doc.blocks.len(), 1);
    let Block::FormatContainer(pre) = &doc.blocks[0] else {
        panic!("expected a format container");
    };
    assert_eq!(pre.tag_name, "pre");
    assert_eq!(pre.format.white_space.as_deref(), Some("pre"));
    let p = pre.blocks[0].as_paragraph().unwrap();
    assert_eq!(texts(p), vec![Some("  a\n b")]);
}

#[test]
fn test_blockquote_container() {
    let doc = convert("<blockquote><div>quoted</div></blockquote><div>after</div>");
    assert_eq!(doc.blocks.len(), 2);
    let Block::FormatContainer(quote) = &doc.blocks[0] else {
        panic!("expected a format container");
    };
    assert_eq!(quote.tag_name, "blockquote");
    assert_eq!(quote.format.margin.left.as_deref(), Some("40px"));
    assert_eq!(quote.blocks.len(), 1);
    assert_eq!(
        texts(quote.blocks[0].as_paragraph().unwrap()),
        vec![Some("quoted")]
    );
    assert_eq!(texts(paragraph(&doc, 1)), vec![Some("after")]);
}

#[test]
fn test_line_breaks() {
    let doc = convert("<div>a<br>b</div>");
    let p = paragraph(&doc, 0);
    assert_eq!(p.segments.len(), 3);
    assert!(p.segments[1].is_br());
}

#[test]
fn test_links_and_code() {
    let doc = convert(r#"<a href="https://example.com">site</a> <code>x</code>"#);
    let p = paragraph(&doc, 0);
    assert_eq!(texts(p), vec![Some("site"), Some(" "), Some("x")]);
    let link = p.segments[0].link.as_ref().unwrap();
    assert_eq!(link.format.href.as_deref(), Some("https://example.com"));
    assert!(p.segments[1].link.is_none());
    assert!(p.segments[2].code.is_some());
}

#[test]
fn test_nested_lists_flatten() {
    let doc = convert(r#"<ol start="3"><li>one</li><li>two<ul><li>inner</li></ul></li></ol>"#);
    assert_eq!(doc.blocks.len(), 3);
    let items: Vec<&ListItem> = doc
        .blocks
        .iter()
        .map(|b| match b {
            Block::ListItem(item) => item,
            other => panic!("expected a list item, got {:?}", other.kind()),
        })
        .collect();

    assert_eq!(items[0].levels.len(), 1);
    assert_eq!(items[0].levels[0].list_type, ListType::Ordered);
    assert_eq!(items[0].levels[0].format.start_number, Some(3));
    assert_eq!(items[1].levels[0].format.start_number, None);

    let inner_levels: Vec<ListType> = items[2].levels.iter().map(|l| l.list_type).collect();
    assert_eq!(inner_levels, vec![ListType::Ordered, ListType::Unordered]);
    assert_eq!(
        texts(items[1].blocks[0].as_paragraph().unwrap()),
        vec![Some("two")]
    );
    assert_eq!(
        texts(items[2].blocks[0].as_paragraph().unwrap()),
        vec![Some("inner")]
    );
}

#[test]
fn test_li_outside_list_is_a_block() {
    let doc = convert("<li>loose</li>");
    assert_eq!(doc.blocks.len(), 1);
    assert_eq!(texts(paragraph(&doc, 0)), vec![Some("loose")]);
}

#[test]
fn test_table_spans() {
    let doc = convert(
        r#"<table><tr><td colspan="2">x</td></tr><tr><td width="50">a</td><th>b</th></tr></table>"#,
    );
    assert_eq!(doc.blocks.len(), 1);
    let Block::Table(table) = &doc.blocks[0] else {
        panic!("expected a table");
    };
    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.column_count(), 2);
    assert_eq!(table.widths, vec![50.0, 0.0]);

    let spanned = table.cell(0, 1).unwrap();
    assert!(spanned.span_left);
    assert!(!spanned.span_above);
    assert!(spanned.blocks.is_empty());
    assert_eq!(table.span_of(0, 0), (1, 2));

    let header = table.cell(1, 1).unwrap();
    assert!(header.is_header);
    let first = table.cell(0, 0).unwrap().blocks[0].as_paragraph().unwrap();
    assert_eq!(texts(first), vec![Some("x")]);
}

#[test]
fn test_table_rowspan() {
    let doc = convert(r#"<table><tr><td rowspan="2">a</td><td>b</td></tr><tr><td>c</td></tr></table>"#);
    let Block::Table(table) = &doc.blocks[0] else {
        panic!("expected a table");
    };
    assert!(table.cell(1, 0).unwrap().span_above);
    let moved = table.cell(1, 1).unwrap().blocks[0].as_paragraph().unwrap();
    assert_eq!(texts(moved), vec![Some("c")]);
    assert_eq!(table.span_of(0, 0), (2, 1));
}

#[test]
fn test_unknown_inline_element_becomes_general_segment() {
    let doc = convert(r#"<div>a<custom-tag data-x="1">hi</custom-tag></div>"#);
    let p = paragraph(&doc, 0);
    assert_eq!(p.segments.len(), 2);
    let SegmentKind::General(general) = &p.segments[1].kind else {
        panic!("expected a general segment");
    };
    assert_eq!(general.tag, "custom-tag");
    assert_eq!(general.attributes[0].name, "data-x");
    assert_eq!(
        texts(general.blocks[0].as_paragraph().unwrap()),
        vec![Some("hi")]
    );
}

#[test]
fn test_entities_are_kept_by_reference() {
    let (dom, root) = parse_fragment(
        r#"<div>a<span class="_Entity _EType_mention _EId_1" contenteditable="false">@bob</span>b</div>"#,
    )
    .unwrap();
    let div = dom.first_child(root).unwrap();
    let wrapper = dom.child_at(div, 1).unwrap();
    let config = EditorConfig::default();
    let mut ctx = config.dom_to_model_context();
    let doc = dom_to_content_model(&dom, root, &mut ctx);

    let p = paragraph(&doc, 0);
    assert_eq!(p.segments.len(), 3);
    let SegmentKind::Entity(entity) = &p.segments[1].kind else {
        panic!("expected an entity segment");
    };
    assert_eq!(entity.wrapper, wrapper);
    assert_eq!(entity.entity_format.entity_type.as_deref(), Some("mention"));
}

#[test]
fn test_block_entity() {
    let doc = convert(r#"<div class="_Entity _EType_card">card</div>"#);
    assert_eq!(doc.blocks.len(), 1);
    assert!(matches!(doc.blocks[0], Block::Entity(_)));
}

#[test]
fn test_coauthoring_marker_is_skipped() {
    let doc = convert(r#"<div>a<span class="_CoauthMarker">x</span>b</div>"#);
    assert_eq!(texts(paragraph(&doc, 0)), vec![Some("ab")]);
}

#[test]
fn test_comments_are_ignored() {
    let doc = convert("<div>a<!-- note -->b</div>");
    assert_eq!(texts(paragraph(&doc, 0)), vec![Some("ab")]);
}

#[test]
fn test_collapsed_selection_in_text() {
    let doc = convert_with_selection("<div>ab</div>", |dom, root| {
        let text = dom.first_child(dom.first_child(root).unwrap()).unwrap();
        DomSelection::caret(DomPosition::new(text, 1))
    });
    let p = paragraph(&doc, 0);
    assert_eq!(texts(p), vec![Some("a"), None, Some("b")]);
    assert!(p.segments[1].is_marker());
    assert!(!p.segments[0].is_selected);
    assert!(!p.segments[2].is_selected);
}

#[test]
fn test_collapsed_selection_between_elements() {
    let doc = convert_with_selection("<div><b>a</b><i>b</i></div>", |dom, root| {
        let div = dom.first_child(root).unwrap();
        DomSelection::caret(DomPosition::new(div, 1))
    });
    let p = paragraph(&doc, 0);
    assert_eq!(p.segments.len(), 3);
    assert!(p.segments[1].is_marker());
    assert_eq!(p.marker_index(), Some(1));
}

#[test]
fn test_expanded_selection_marks_segments() {
    let doc = convert_with_selection("<div>abc</div>", |dom, root| {
        let text = dom.first_child(dom.first_child(root).unwrap()).unwrap();
        DomSelection::range(DomPosition::new(text, 1), DomPosition::new(text, 2))
    });
    let p = paragraph(&doc, 0);
    assert_eq!(texts(p), vec![Some("a"), Some("b"), Some("c")]);
    let selected: Vec<bool> = p.segments.iter().map(|s| s.is_selected).collect();
    assert_eq!(selected, vec![false, true, false]);
}

#[test]
fn test_image_selection() {
    let doc = convert_with_selection(r#"<div><img src="a.png"></div>"#, |dom, root| {
        let img = dom.first_child(dom.first_child(root).unwrap()).unwrap();
        DomSelection::Image { image: img }
    });
    let p = paragraph(&doc, 0);
    let SegmentKind::Image(image) = &p.segments[0].kind else {
        panic!("expected an image");
    };
    assert_eq!(image.src, "a.png");
    assert!(image.is_selected_as_image_selection);
    assert!(p.segments[0].is_selected);
}

#[test]
fn test_table_selection() {
    let doc = convert_with_selection(
        "<table><tr><td>a</td><td>b</td></tr><tr><td>c</td><td>d</td></tr></table>",
        |dom, root| DomSelection::Table {
            table: dom.first_child(root).unwrap(),
            first_row: 0,
            first_column: 1,
            last_row: 1,
            last_column: 1,
        },
    );
    let Block::Table(table) = &doc.blocks[0] else {
        panic!("expected a table");
    };
    let selected: Vec<bool> = table
        .rows
        .iter()
        .flat_map(|r| &r.cells)
        .map(|c| c.is_selected)
        .collect();
    assert_eq!(selected, vec![false, true, false, true]);
}

#[test]
fn test_cache_element_option() {
    let (dom, root) = parse_fragment("<div>a</div>").unwrap();
    let div = dom.first_child(root).unwrap();
    let config = EditorConfig::default().with_dom_to_model_options(
        DomToModelOptions::NORMALIZE | DomToModelOptions::ALLOW_CACHE_ELEMENT,
    );
    let mut ctx = config.dom_to_model_context();
    let doc = dom_to_content_model(&dom, root, &mut ctx);
    assert_eq!(paragraph(&doc, 0).cached_element, Some(div));

    let config = EditorConfig::default();
    let mut ctx = config.dom_to_model_context();
    let doc = dom_to_content_model(&dom, root, &mut ctx);
    assert_eq!(paragraph(&doc, 0).cached_element, None);
}

fn drop_element(
    _group: &mut dyn BlockGroupNode,
    _dom: &Dom,
    _element: NodeId,
    _ctx: &mut DomToModelContext<'_>,
) {
}

#[test]
fn test_host_processor_override() {
    let (dom, root) = parse_fragment("<div>a<b>hidden</b>c</div>").unwrap();
    let mut config = EditorConfig::default();
    assert!(config.processors.set("B", drop_element).is_some());
    let mut ctx = config.dom_to_model_context();
    let doc = dom_to_content_model(&dom, root, &mut ctx);
    assert_eq!(texts(paragraph(&doc, 0)), vec![Some("ac")]);
}

#[test]
fn test_without_normalization_keeps_implicit_paragraphs() {
    let (dom, root) = parse_fragment("<div>a</div>").unwrap();
    let config = EditorConfig::default().with_dom_to_model_options(DomToModelOptions::empty());
    let mut ctx = config.dom_to_model_context();
    let doc = dom_to_content_model(&dom, root, &mut ctx);
    assert_eq!(doc.blocks.len(), 2);
    assert!(paragraph(&doc, 1).is_implicit);
    assert!(paragraph(&doc, 1).segments.is_empty());
}
