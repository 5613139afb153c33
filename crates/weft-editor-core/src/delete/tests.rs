use weft_dom::Dom;

use super::*;
use crate::format::BlockFormat;
use crate::model::{
    BlockKind, Divider, FormatContainer, General, ListItem, ListLevel, ListType, Paragraph, Segment,
    SegmentKind, Table, TableCell, TableRow, validate,
};

fn para(segments: Vec<Segment>) -> Block {
    Block::Paragraph(Paragraph::new(false).with_segments(segments))
}

fn implicit(segments: Vec<Segment>) -> Block {
    Block::Paragraph(Paragraph::new(true).with_segments(segments))
}

fn run(
    doc: &mut ContentModelDocument,
    steps: &[DeleteSelectionStep],
) -> (DeleteSelectionResult, FormatContext) {
    let mut format_context = FormatContext::default();
    let result = delete_selection(doc, steps, &mut format_context);
    (result, format_context)
}

fn texts(block: &Block) -> Vec<String> {
    block
        .as_paragraph()
        .map(|p| {
            p.segments
                .iter()
                .map(|s| match &s.kind {
                    SegmentKind::Text(t) => t.clone(),
                    SegmentKind::SelectionMarker => "|".to_string(),
                    SegmentKind::Br => "<br>".to_string(),
                    other => format!("{:?}", std::mem::discriminant(other)),
                })
                .collect()
        })
        .unwrap_or_default()
}

fn assert_single_marker(doc: &ContentModelDocument) {
    validate(doc).unwrap();
    assert!(find_insert_point(doc).is_some());
}

#[test]
fn test_forward_delete_between_texts() {
    let mut doc = ContentModelDocument::with_blocks(vec![implicit(vec![
        Segment::text("test1"),
        Segment::marker(),
        Segment::text("test2"),
    ])]);
    let (result, _) = run(&mut doc, &[forward_delete_collapsed]);
    assert_eq!(result.delete_result, DeleteResult::SingleChar);
    assert_eq!(texts(&doc.blocks[0]), ["test1", "|", "est2"]);
    assert_eq!(result.insert_point.unwrap().marker_index, 1);
}

#[test]
fn test_backward_delete_grapheme() {
    let mut doc = ContentModelDocument::with_blocks(vec![implicit(vec![
        Segment::text("cafe\u{301}"),
        Segment::marker(),
    ])]);
    let (result, _) = run(&mut doc, &[backward_delete_collapsed]);
    assert_eq!(result.delete_result, DeleteResult::SingleChar);
    assert_eq!(texts(&doc.blocks[0]), ["caf", "|"]);
    assert!(!doc.blocks[0].as_paragraph().unwrap().is_implicit);
}

#[test]
fn test_empty_quote_is_unwrapped() {
    let mut quote = FormatContainer::new("blockquote");
    quote.blocks.push(para(vec![Segment::marker(), Segment::br()]));
    let mut doc = ContentModelDocument::with_blocks(vec![Block::FormatContainer(quote)]);

    let (result, _) = run(&mut doc, &[delete_empty_quote]);
    assert_eq!(result.delete_result, DeleteResult::Range);
    assert_eq!(doc.blocks.len(), 1);
    assert_eq!(texts(&doc.blocks[0]), ["|", "<br>"]);
    assert_eq!(result.insert_point.unwrap().path, BlockPath::root().block(0));
}

#[test]
fn test_delete_list_twice() {
    let item = ListItem {
        blocks: vec![implicit(vec![Segment::marker()])],
        levels: vec![ListLevel::new(ListType::Ordered)],
        ..Default::default()
    };
    let mut doc = ContentModelDocument::with_blocks(vec![Block::ListItem(item)]);

    let (result, _) = run(&mut doc, &[delete_list]);
    assert_eq!(result.delete_result, DeleteResult::Range);
    let Block::ListItem(item) = &doc.blocks[0] else {
        panic!("still a list item");
    };
    assert_eq!(
        item.levels[0].format.display_for_dummy_item.as_deref(),
        Some("block")
    );

    let (result, _) = run(&mut doc, &[delete_list]);
    assert_eq!(result.delete_result, DeleteResult::Range);
    assert_eq!(doc.blocks[0].kind(), BlockKind::Paragraph);
    assert_eq!(result.insert_point.unwrap().path, BlockPath::root().block(0));

    let (result, _) = run(&mut doc, &[delete_list]);
    assert_eq!(result.delete_result, DeleteResult::NotDeleted);
}

#[test]
fn test_backspace_merges_into_previous_paragraph() {
    let mut doc = ContentModelDocument::with_blocks(vec![
        para(vec![Segment::text("ab")]),
        para(vec![Segment::marker(), Segment::text("cd")]),
    ]);
    let steps = default_delete_steps(DeleteDirection::Backward, DeleteModifiers::empty());
    let (result, _) = run(&mut doc, &steps);

    assert_eq!(result.delete_result, DeleteResult::Range);
    assert_eq!(doc.blocks.len(), 1);
    assert_eq!(texts(&doc.blocks[0]), ["ab", "|", "cd"]);
    let point = result.insert_point.unwrap();
    assert_eq!(point.path, BlockPath::root().block(0));
    assert_eq!(point.marker_index, 1);
    assert_single_marker(&doc);
}

#[test]
fn test_delete_merges_next_paragraph_out_of_quote() {
    let mut quote = FormatContainer::new("blockquote");
    quote.blocks.push(para(vec![Segment::text("cd")]));
    let mut doc = ContentModelDocument::with_blocks(vec![
        para(vec![Segment::text("ab"), Segment::marker()]),
        Block::FormatContainer(quote),
    ]);
    let steps = default_delete_steps(DeleteDirection::Forward, DeleteModifiers::empty());
    let (result, _) = run(&mut doc, &steps);

    assert_eq!(result.delete_result, DeleteResult::Range);
    // the emptied quote goes with its only paragraph
    assert_eq!(doc.blocks.len(), 1);
    assert_eq!(texts(&doc.blocks[0]), ["ab", "|", "cd"]);
}

#[test]
fn test_backspace_at_document_start() {
    let mut doc =
        ContentModelDocument::with_blocks(vec![para(vec![Segment::marker(), Segment::br()])]);
    let steps = default_delete_steps(DeleteDirection::Backward, DeleteModifiers::empty());
    let (result, _) = run(&mut doc, &steps);
    assert_eq!(result.delete_result, DeleteResult::NothingToDelete);
    assert_eq!(texts(&doc.blocks[0]), ["|", "<br>"]);
}

#[test]
fn test_backspace_clears_style_of_empty_first_line() {
    let mut p = Paragraph::new(false).with_segments(vec![Segment::marker(), Segment::br()]);
    p.format.line_height = Some("2".into());
    let mut doc = ContentModelDocument::with_blocks(vec![Block::Paragraph(p)]);
    let steps = default_delete_steps(DeleteDirection::Backward, DeleteModifiers::empty());
    let (result, _) = run(&mut doc, &steps);
    assert_eq!(result.delete_result, DeleteResult::Range);
    assert_eq!(
        doc.blocks[0].as_paragraph().unwrap().format,
        BlockFormat::default()
    );
}

#[test]
fn test_backspace_outdents_empty_paragraph() {
    let mut p = Paragraph::new(false).with_segments(vec![Segment::marker(), Segment::br()]);
    p.format.margin.left = Some("80px".into());
    let mut doc = ContentModelDocument::with_blocks(vec![
        para(vec![Segment::text("x")]),
        Block::Paragraph(p),
    ]);
    let (result, _) = run(&mut doc, &[backward_delete_collapsed]);

    assert_eq!(result.delete_result, DeleteResult::Range);
    let p = doc.blocks[1].as_paragraph().unwrap();
    assert_eq!(p.format.margin.left.as_deref(), Some("40px"));
    assert_eq!(texts(&doc.blocks[1]), ["|", "<br>"]);
}

#[test]
fn test_backspace_removes_entity_segment() {
    let mut dom = Dom::new();
    let wrapper = dom.create_element("span");
    let entity = Entity {
        wrapper,
        entity_format: Default::default(),
    };
    let mut doc = ContentModelDocument::with_blocks(vec![implicit(vec![
        Segment::text("a"),
        Segment::entity(entity.clone()),
        Segment::marker(),
    ])]);
    let (result, format_context) = run(&mut doc, &[backward_delete_collapsed]);
    assert_eq!(result.delete_result, DeleteResult::SingleChar);
    assert_eq!(texts(&doc.blocks[0]), ["a", "|"]);
    assert_eq!(
        format_context.deleted_entities,
        vec![DeletedEntity {
            entity,
            operation: EntityOperation::RemoveFromEnd,
        }]
    );
}

#[test]
fn test_backspace_removes_divider() {
    let mut doc = ContentModelDocument::with_blocks(vec![
        para(vec![Segment::text("a")]),
        Block::Divider(Divider::new("hr")),
        para(vec![Segment::marker(), Segment::text("b")]),
    ]);
    let (result, _) = run(&mut doc, &[backward_delete_collapsed]);
    assert_eq!(result.delete_result, DeleteResult::Range);
    assert_eq!(doc.blocks.len(), 2);
    assert_eq!(result.insert_point.unwrap().path, BlockPath::root().block(1));
}

fn one_cell_table(text: &str) -> Block {
    let mut cell = TableCell::new(false, false, false);
    cell.blocks.push(implicit(vec![Segment::text(text)]));
    Block::Table(Table {
        rows: vec![TableRow {
            cells: vec![cell],
            ..Default::default()
        }],
        ..Default::default()
    })
}

#[test]
fn test_empty_line_after_table_moves_caret_into_it() {
    let mut doc = ContentModelDocument::with_blocks(vec![
        one_cell_table("x"),
        para(vec![Segment::marker(), Segment::br()]),
    ]);
    let (result, _) = run(&mut doc, &[backward_delete_collapsed]);

    assert_eq!(result.delete_result, DeleteResult::Range);
    assert_eq!(doc.blocks.len(), 1);
    let point = result.insert_point.unwrap();
    let context = point.table_context.clone().unwrap();
    assert_eq!((context.row, context.col), (0, 0));
    let Block::Table(table) = &doc.blocks[0] else {
        panic!("table is kept");
    };
    assert_eq!(texts(&table.rows[0].cells[0].blocks[0]), ["x", "|"]);
}

#[test]
fn test_table_is_never_deleted_by_keystroke() {
    let mut doc = ContentModelDocument::with_blocks(vec![
        para(vec![Segment::text("z"), Segment::marker()]),
        one_cell_table("x"),
    ]);
    let (result, _) = run(&mut doc, &[forward_delete_collapsed]);
    assert_eq!(result.delete_result, DeleteResult::NothingToDelete);
    assert_eq!(doc.blocks.len(), 2);
    assert_eq!(doc.blocks[1].kind(), BlockKind::Table);
}

#[test]
fn test_delete_reaches_segment_after_general() {
    let mut general = General::new("span");
    general.blocks.push(implicit(vec![Segment::marker()]));
    let mut doc = ContentModelDocument::with_blocks(vec![implicit(vec![
        Segment::general(general),
        Segment::text("x"),
    ])]);
    let (result, _) = run(&mut doc, &[forward_delete_collapsed]);
    assert_eq!(result.delete_result, DeleteResult::Range);
    assert_eq!(doc.blocks[0].as_paragraph().unwrap().segments.len(), 1);
}

#[test]
fn test_expanded_selection_then_merge() {
    let mut doc = ContentModelDocument::with_blocks(vec![
        para(vec![Segment::text("ab"), Segment::text("c").with_selected(true)]),
        para(vec![Segment::text("d").with_selected(true), Segment::text("ef")]),
    ]);
    let steps = default_delete_steps(DeleteDirection::Backward, DeleteModifiers::empty());
    let (result, _) = run(&mut doc, &steps);
    assert_eq!(result.delete_result, DeleteResult::Range);
    assert_eq!(doc.blocks.len(), 1);
    assert_eq!(texts(&doc.blocks[0]), ["ab", "|", "ef"]);
    assert_single_marker(&doc);
}

#[test]
fn test_range_over_paragraph_break_joins_lines() {
    for direction in [DeleteDirection::Backward, DeleteDirection::Forward] {
        let mut doc = ContentModelDocument::with_blocks(vec![
            para(vec![Segment::text("abc"), Segment::marker()]),
            para(vec![Segment::marker(), Segment::text("def")]),
        ]);
        let steps = default_delete_steps(direction, DeleteModifiers::empty());
        let (result, _) = run(&mut doc, &steps);

        assert_eq!(result.delete_result, DeleteResult::Range);
        assert_eq!(doc.blocks.len(), 1);
        assert_eq!(texts(&doc.blocks[0]), ["abc", "|", "def"]);
        assert_eq!(result.insert_point.unwrap().marker_index, 1);
        assert_single_marker(&doc);
    }
}

#[test]
fn test_no_selection() {
    let mut doc = ContentModelDocument::with_blocks(vec![para(vec![Segment::text("a")])]);
    let (result, _) = run(&mut doc, &[backward_delete_collapsed]);
    assert_eq!(result.insert_point, None);
    assert_eq!(result.delete_result, DeleteResult::NotDeleted);
}

#[test]
fn test_word_deletion() {
    let mut doc = ContentModelDocument::with_blocks(vec![implicit(vec![
        Segment::text("hello "),
        Segment::text("world"),
        Segment::marker(),
    ])]);
    let steps = default_delete_steps(DeleteDirection::Backward, DeleteModifiers::WORD);
    let (result, _) = run(&mut doc, &steps);
    assert_eq!(result.delete_result, DeleteResult::Range);
    assert_eq!(texts(&doc.blocks[0]), ["hello ", "|"]);

    let (result, _) = run(&mut doc, &steps);
    assert_eq!(result.delete_result, DeleteResult::Range);
    assert_eq!(texts(&doc.blocks[0]), ["|"]);
}

#[test]
fn test_delete_line_before_caret() {
    let mut doc = ContentModelDocument::with_blocks(vec![implicit(vec![
        Segment::text("one "),
        Segment::image("a.png"),
        Segment::marker(),
        Segment::text("two"),
    ])]);
    let steps = default_delete_steps(DeleteDirection::Backward, DeleteModifiers::LINE);
    let (result, _) = run(&mut doc, &steps);
    assert_eq!(result.delete_result, DeleteResult::Range);
    assert_eq!(texts(&doc.blocks[0]), ["|", "two"]);
    assert_eq!(result.insert_point.unwrap().marker_index, 0);
}

#[test]
fn test_enter_moves_empty_last_line_out_of_quote() {
    let mut quote = FormatContainer::new("blockquote");
    quote.blocks.push(para(vec![Segment::text("q")]));
    quote.blocks.push(para(vec![Segment::marker(), Segment::br()]));
    let mut doc = ContentModelDocument::with_blocks(vec![Block::FormatContainer(quote)]);

    let mut format_context = FormatContext::new(DeleteTrigger::Enter);
    let result = delete_selection(&mut doc, &[delete_empty_quote], &mut format_context);
    assert_eq!(result.delete_result, DeleteResult::Range);
    assert_eq!(doc.blocks.len(), 2);
    let Block::FormatContainer(quote) = &doc.blocks[0] else {
        panic!("quote stays");
    };
    assert_eq!(quote.blocks.len(), 1);
    assert_eq!(texts(&doc.blocks[1]), ["|", "<br>"]);
    assert_eq!(result.insert_point.unwrap().path, BlockPath::root().block(1));
}

#[test]
fn test_enter_on_only_line_removes_quote() {
    let mut quote = FormatContainer::new("blockquote");
    quote.blocks.push(para(vec![Segment::marker(), Segment::br()]));
    let mut doc = ContentModelDocument::with_blocks(vec![Block::FormatContainer(quote)]);

    let mut format_context = FormatContext::new(DeleteTrigger::Enter);
    let result = delete_selection(&mut doc, &[delete_empty_quote], &mut format_context);
    assert_eq!(result.delete_result, DeleteResult::Range);
    assert_eq!(doc.blocks.len(), 1);
    assert_eq!(doc.blocks[0].kind(), BlockKind::Paragraph);
}

#[test]
fn test_default_steps_shape() {
    assert_eq!(
        default_delete_steps(DeleteDirection::Backward, DeleteModifiers::empty()).len(),
        4
    );
    assert_eq!(
        default_delete_steps(DeleteDirection::Forward, DeleteModifiers::WORD).len(),
        3
    );
    assert_eq!(
        default_delete_steps(DeleteDirection::Forward, DeleteModifiers::LINE).len(),
        2
    );
    assert_eq!(
        default_delete_steps(DeleteDirection::Backward, DeleteModifiers::all()).len(),
        6
    );
}
