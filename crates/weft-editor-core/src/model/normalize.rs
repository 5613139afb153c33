//! Model normalization.
//!
//! Run after building a Model from markup and after edits that may leave
//! structural leftovers behind (empty paragraphs, adjacent mergeable text,
//! list items whose levels were popped).

use super::block::{Block, Paragraph};
use super::segment::{Segment, SegmentKind};
use super::{BlockGroupNode, unwrap_block};
use crate::format::BlockFormat;

pub fn normalize_content_model(group: &mut dyn BlockGroupNode) {
    let mut index = 0;
    while index < group.blocks().len() {
        let blocks = group.blocks_mut();
        let mut remove = false;
        let mut unwrap = false;
        match &mut blocks[index] {
            Block::Paragraph(p) => {
                normalize_paragraph(p);
                for segment in &mut p.segments {
                    if let SegmentKind::General(general) = &mut segment.kind {
                        normalize_content_model(general);
                    }
                }
                remove = p.segments.is_empty();
            }
            Block::Table(table) => {
                for cell in table.rows.iter_mut().flat_map(|r| &mut r.cells) {
                    normalize_content_model(cell);
                }
            }
            Block::FormatContainer(container) => {
                normalize_content_model(container);
                remove = container.blocks.is_empty();
            }
            Block::ListItem(item) => {
                normalize_content_model(item);
                unwrap = item.levels.is_empty();
            }
            Block::General(general) => normalize_content_model(general),
            Block::Divider(_) | Block::Entity(_) => {}
        }

        if remove {
            tracing::trace!(target: "weft::model", index, "removing empty block");
            blocks.remove(index);
        } else if unwrap {
            tracing::trace!(target: "weft::model", index, "unwrapping list item without levels");
            let before = group.blocks().len();
            unwrap_block(group, index);
            // children of the unwrapped item are already normalized
            index += group.blocks().len() + 1 - before;
        } else {
            index += 1;
        }
    }
}

/// Whether whitespace in blocks of this format is kept as typed.
pub fn preserves_white_space(format: &BlockFormat) -> bool {
    matches!(
        format.white_space.as_deref(),
        Some("pre" | "pre-wrap" | "break-spaces")
    )
}

pub fn normalize_paragraph(paragraph: &mut Paragraph) {
    let segments = &mut paragraph.segments;

    // An expanded selection is represented by flags; markers inside it only
    // survive in paragraphs that hold no selected content.
    let has_selected_content = segments.iter().any(|s| s.is_selected && !s.is_marker());
    if has_selected_content {
        segments.retain(|s| !s.is_marker());
    }

    segments.retain(|s| s.as_text() != Some(""));
    merge_text_segments(segments);

    if !preserves_white_space(&paragraph.format) {
        trim_collapsible_spaces(&mut paragraph.segments);
    }

    if !paragraph.is_implicit {
        normalize_trailing_br(&mut paragraph.segments);
    }
}

fn merge_text_segments(segments: &mut Vec<Segment>) {
    let mut i = 1;
    while i < segments.len() {
        let (head, tail) = segments.split_at_mut(i);
        let prev = &mut head[i - 1];
        let current = &tail[0];
        let mergeable = prev.same_style_as(current);
        if let (SegmentKind::Text(a), SegmentKind::Text(b)) = (&mut prev.kind, &current.kind) {
            if mergeable {
                a.push_str(b);
                segments.remove(i);
                continue;
            }
        }
        i += 1;
    }
}

fn trim_collapsible_spaces(segments: &mut Vec<Segment>) {
    // leading
    let mut i = 0;
    while i < segments.len() {
        match &mut segments[i].kind {
            SegmentKind::SelectionMarker => i += 1,
            SegmentKind::Text(text) => {
                let trimmed = text.trim_start_matches(' ');
                if trimmed.is_empty() {
                    segments.remove(i);
                } else {
                    *text = trimmed.to_string();
                    break;
                }
            }
            _ => break,
        }
    }
    // trailing
    let mut i = segments.len();
    while i > 0 {
        match &mut segments[i - 1].kind {
            SegmentKind::SelectionMarker => i -= 1,
            SegmentKind::Text(text) => {
                let trimmed = text.trim_end_matches(' ');
                if trimmed.is_empty() {
                    segments.remove(i - 1);
                    i -= 1;
                } else {
                    *text = trimmed.to_string();
                    break;
                }
            }
            _ => break,
        }
    }
}

fn normalize_trailing_br(segments: &mut Vec<Segment>) {
    let len = segments.len();
    let last_is_marker = segments.last().is_some_and(Segment::is_marker);
    let before_last_is_br_or_none = len < 2 || segments[len - 2].is_br();

    if last_is_marker && before_last_is_br_or_none {
        // keep the empty line from collapsing under the caret
        let format = segments[len - 1].format.clone();
        segments.push(Segment::br().with_format(format));
    } else if len > 1 && segments[len - 1].is_br() {
        let content: Vec<&Segment> = segments.iter().filter(|s| !s.is_marker()).collect();
        // A single trailing <br> after content is redundant; two in a row
        // are an intentional empty line.
        if content.len() > 1 && !content[content.len() - 2].is_br() {
            segments.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::SegmentFormat;
    use crate::model::{
        ContentModelDocument, FormatContainer, ListItem, ListLevel, ListType,
    };

    fn texts(p: &Paragraph) -> Vec<Option<&str>> {
        p.segments.iter().map(|s| s.as_text()).collect()
    }

    #[test]
    fn test_merges_same_format_text() {
        let bold = SegmentFormat {
            font_weight: Some("bold".into()),
            ..Default::default()
        };
        let mut p = Paragraph::new(true).with_segments(vec![
            Segment::text("a"),
            Segment::text("b"),
            Segment::text("c").with_format(bold),
            Segment::text(""),
        ]);
        normalize_paragraph(&mut p);
        assert_eq!(texts(&p), vec![Some("ab"), Some("c")]);
    }

    #[test]
    fn test_trims_collapsible_spaces() {
        let mut p = Paragraph::new(true).with_segments(vec![
            Segment::text("  "),
            Segment::text(" a "),
            Segment::marker(),
        ]);
        normalize_paragraph(&mut p);
        assert_eq!(texts(&p), vec![Some("a"), None]);
    }

    #[test]
    fn test_keeps_spaces_in_pre() {
        let mut p = Paragraph::new(true).with_segments(vec![Segment::text("  a  ")]);
        p.format.white_space = Some("pre".into());
        normalize_paragraph(&mut p);
        assert_eq!(texts(&p), vec![Some("  a  ")]);
    }

    #[test]
    fn test_adds_br_after_lone_marker() {
        let mut p = Paragraph::new(false).with_segments(vec![Segment::marker()]);
        normalize_paragraph(&mut p);
        assert_eq!(p.segments.len(), 2);
        assert!(p.segments[1].is_br());

        let mut p = Paragraph::new(false).with_segments(vec![Segment::br(), Segment::marker()]);
        normalize_paragraph(&mut p);
        assert_eq!(p.segments.len(), 3);

        let mut implicit = Paragraph::new(true).with_segments(vec![Segment::marker()]);
        normalize_paragraph(&mut implicit);
        assert_eq!(implicit.segments.len(), 1);
    }

    #[test]
    fn test_drops_redundant_trailing_br() {
        let mut p = Paragraph::new(false).with_segments(vec![Segment::text("a"), Segment::br()]);
        normalize_paragraph(&mut p);
        assert_eq!(texts(&p), vec![Some("a")]);

        let mut p = Paragraph::new(false).with_segments(vec![
            Segment::text("a"),
            Segment::br(),
            Segment::br(),
        ]);
        normalize_paragraph(&mut p);
        assert_eq!(p.segments.len(), 3);
    }

    #[test]
    fn test_markers_removed_from_expanded_selection() {
        let mut p = Paragraph::new(true).with_segments(vec![
            Segment::marker(),
            Segment::text("a").with_selected(true),
            Segment::marker(),
        ]);
        normalize_paragraph(&mut p);
        assert_eq!(p.segments.len(), 1);
        assert!(p.segments[0].is_selected);
    }

    #[test]
    fn test_structure_cleanup() {
        let orphan = ListItem {
            blocks: vec![Block::Paragraph(
                Paragraph::new(true).with_segments(vec![Segment::text("x")]),
            )],
            levels: vec![],
            ..Default::default()
        };
        let kept = ListItem {
            blocks: vec![Block::Paragraph(
                Paragraph::new(true).with_segments(vec![Segment::text("y")]),
            )],
            levels: vec![ListLevel::new(ListType::Ordered)],
            ..Default::default()
        };
        let mut doc = ContentModelDocument::with_blocks(vec![
            Block::Paragraph(Paragraph::new(true)),
            Block::FormatContainer(FormatContainer::new("blockquote")),
            Block::ListItem(orphan),
            Block::ListItem(kept),
        ]);
        normalize_content_model(&mut doc);
        assert_eq!(doc.blocks.len(), 2);
        assert_eq!(
            doc.blocks[0].as_paragraph().unwrap().segments[0].as_text(),
            Some("x")
        );
        assert!(matches!(doc.blocks[1], Block::ListItem(_)));
    }
}
