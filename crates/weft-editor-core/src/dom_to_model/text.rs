use weft_dom::{Dom, NodeId};

use super::{Boundary, DomToModelContext, add_segment, apply_boundary};
use crate::model::{Block, BlockGroupNode, SegmentKind, preserves_white_space};
use crate::selection::DomSelection;

/// Default `text` entry. Splits the text at selection boundaries that fall
/// inside it and collapses whitespace outside preformatted blocks.
pub fn process_text(
    group: &mut dyn BlockGroupNode,
    dom: &Dom,
    node: NodeId,
    ctx: &mut DomToModelContext<'_>,
) {
    let Some(text) = dom.text(node) else {
        return;
    };
    let chars: Vec<char> = text.chars().collect();

    let mut cuts: Vec<(usize, Boundary)> = Vec::new();
    if let Some(DomSelection::Range { start, end, .. }) = ctx.selection {
        if start.node == node {
            cuts.push((start.offset.min(chars.len()), Boundary::Start));
        }
        if end.node == node {
            cuts.push((end.offset.min(chars.len()), Boundary::End));
        }
    }

    let mut pos = 0;
    for (offset, boundary) in cuts {
        let offset = offset.max(pos);
        add_text(group, chars[pos..offset].iter().collect(), ctx);
        apply_boundary(group, ctx, boundary);
        pos = offset;
    }
    add_text(group, chars[pos..].iter().collect(), ctx);
}

fn collapse_white_space(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if matches!(c, ' ' | '\t' | '\n' | '\r' | '\u{000C}') {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

fn add_text(group: &mut dyn BlockGroupNode, text: String, ctx: &DomToModelContext<'_>) {
    if text.is_empty() {
        return;
    }
    let text = if preserves_white_space(&ctx.block_format) {
        text
    } else {
        collapse_white_space(&text)
    };

    let last_paragraph = match group.blocks_mut().last_mut() {
        Some(Block::Paragraph(p)) => Some(p),
        _ => None,
    };

    // Layout whitespace between blocks never opens a paragraph.
    let paragraph_is_empty = last_paragraph
        .as_ref()
        .is_none_or(|p| p.segments.is_empty());
    if paragraph_is_empty && text.trim_matches(' ').is_empty() {
        return;
    }

    let segment = ctx.segment(SegmentKind::Text(text));
    if let Some(paragraph) = last_paragraph {
        if let Some(last) = paragraph.segments.last_mut() {
            if last.same_style_as(&segment) {
                if let (Some(existing), Some(added)) = (last.as_text_mut(), segment.as_text()) {
                    existing.push_str(added);
                    return;
                }
            }
        }
    }
    add_segment(group, segment, ctx);
}
