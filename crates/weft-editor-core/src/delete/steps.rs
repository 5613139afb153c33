use super::segment::{delete_segment, only_markers_and_breaks};
use super::{DeleteContext, DeleteDirection, DeleteResult, DeleteTrigger};
use crate::format::BlockFormat;
use crate::model::{
    Block, BlockPath, ContentModelDocument, Paragraph, PathStep, Segment, block_at, block_at_mut,
    group_at_mut, paragraph_at, paragraph_at_mut, unwrap_block,
};

/// Delete everything between the start of the paragraph and the caret.
pub fn delete_all_segment_before(model: &mut ContentModelDocument, ctx: &mut DeleteContext<'_>) {
    if ctx.delete_result != DeleteResult::NotDeleted {
        return;
    }
    let Some(paragraph) = paragraph_at_mut(model, &ctx.insert_point.path) else {
        return;
    };
    let Some(marker) = paragraph.marker_index() else {
        return;
    };
    for index in (0..marker).rev() {
        paragraph.segments[index].is_selected = true;
        if delete_segment(paragraph, index, DeleteDirection::Backward, ctx.format_context) {
            ctx.delete_result = DeleteResult::Range;
        }
    }
    ctx.refresh_insert_point(model);
}

/// Backspace at the very start of a list item: first hide the item's
/// bullet, then drop its innermost level. An item left without levels
/// becomes plain content of the enclosing group.
pub fn delete_list(model: &mut ContentModelDocument, ctx: &mut DeleteContext<'_>) {
    if ctx.delete_result != DeleteResult::NotDeleted {
        return;
    }
    let path = &ctx.insert_point.path;
    let item_path = path.group();
    let at_start = ctx.insert_point.marker_index == 0 && path.last_index() == Some(0);
    if !at_start || !matches!(item_path.steps.last(), Some(PathStep::Block(_))) {
        return;
    }
    let Some(Block::ListItem(item)) = block_at_mut(model, &item_path) else {
        return;
    };
    let Some(level) = item.levels.last_mut() else {
        return;
    };
    if level.format.display_for_dummy_item.as_deref() == Some("block") {
        item.levels.pop();
    } else {
        level.format.display_for_dummy_item = Some("block".into());
    }
    item.cached_element = None;
    let depth = item.levels.len();
    tracing::debug!(target: "weft::delete", path = ?item_path, depth, "list item outdented");

    if depth == 0 {
        if let (Some(index), Some(parent)) = (
            item_path.last_index(),
            group_at_mut(model, &item_path.group()),
        ) {
            unwrap_block(parent, index);
        }
    }
    ctx.delete_result = DeleteResult::Range;
    ctx.refresh_insert_point(model);
}

/// Backspace in a quote that holds nothing but the caret unwraps the
/// quote. Enter on an empty last line of a quote moves that line out of it.
pub fn delete_empty_quote(model: &mut ContentModelDocument, ctx: &mut DeleteContext<'_>) {
    if !matches!(
        ctx.delete_result,
        DeleteResult::NotDeleted | DeleteResult::NothingToDelete
    ) {
        return;
    }
    let path = ctx.insert_point.path.clone();
    let Some(quote_path) = closest_container(model, &path) else {
        return;
    };
    let Some(Block::FormatContainer(quote)) = block_at(model, &quote_path) else {
        return;
    };
    if quote.tag_name != "blockquote" {
        return;
    }
    let Some(paragraph) = paragraph_at(model, &path) else {
        return;
    };
    let on_empty_line = only_markers_and_breaks(&paragraph.segments);
    let directly_inside = path.group() == quote_path;
    let (Some(quote_index), parent_path) = (quote_path.last_index(), quote_path.group()) else {
        return;
    };

    if ctx.format_context.trigger == DeleteTrigger::Enter {
        let is_last_line = directly_inside && path.last_index() == Some(quote.blocks.len() - 1);
        if on_empty_line && is_last_line {
            split_quote_after(model, &path, &parent_path, quote_index);
            ctx.delete_result = DeleteResult::Range;
            ctx.refresh_insert_point(model);
        }
    } else if on_empty_line && directly_inside && quote.blocks.len() == 1 {
        if let Some(parent) = group_at_mut(model, &parent_path) {
            unwrap_block(parent, quote_index);
            tracing::debug!(target: "weft::delete", quote = ?quote_path, "unwrapped empty quote");
            ctx.delete_result = DeleteResult::Range;
            ctx.refresh_insert_point(model);
        }
    }
}

/// Move the empty last line at `line` out of its quote, to right after it.
fn split_quote_after(
    model: &mut ContentModelDocument,
    line: &BlockPath,
    parent_path: &BlockPath,
    quote_index: usize,
) {
    let Some(parent) = group_at_mut(model, parent_path) else {
        return;
    };
    let Some(Block::FormatContainer(quote)) = parent.blocks_mut().get_mut(quote_index) else {
        return;
    };
    let Some(line_index) = line.last_index() else {
        return;
    };
    if !matches!(quote.blocks.get(line_index), Some(Block::Paragraph(_))) {
        return;
    }
    let Block::Paragraph(old) = quote.blocks.remove(line_index) else {
        return;
    };
    quote.cached_element = None;
    let emptied = quote.blocks.is_empty();

    let marker = old
        .segments
        .iter()
        .find(|s| s.is_marker())
        .cloned()
        .unwrap_or_else(Segment::marker);
    let format = marker.format.clone();
    let line = Paragraph::new(false)
        .with_format(old.format)
        .with_segments(vec![marker, Segment::br().with_format(format)]);

    let blocks = parent.blocks_mut();
    blocks.insert(quote_index + 1, Block::Paragraph(line));
    if emptied {
        blocks.remove(quote_index);
    }
    tracing::debug!(target: "weft::delete", emptied, "split quote on enter");
}

/// The nearest format container or list item around `path`, without
/// leaving the enclosing table cell or general segment.
fn closest_container(model: &ContentModelDocument, path: &BlockPath) -> Option<BlockPath> {
    let mut current = path.group();
    while let Some(PathStep::Block(_)) = current.steps.last() {
        if matches!(
            block_at(model, &current),
            Some(Block::FormatContainer(_) | Block::ListItem(_))
        ) {
            return Some(current);
        }
        current = current.group();
    }
    None
}

/// Clear the block format of an empty paragraph the caret could not leave.
pub fn delete_paragraph_style(model: &mut ContentModelDocument, ctx: &mut DeleteContext<'_>) {
    if !matches!(
        ctx.delete_result,
        DeleteResult::NotDeleted | DeleteResult::NothingToDelete
    ) {
        return;
    }
    let Some(paragraph) = paragraph_at_mut(model, &ctx.insert_point.path) else {
        return;
    };
    if !only_markers_and_breaks(&paragraph.segments) || paragraph.format == BlockFormat::default() {
        return;
    }
    paragraph.format = BlockFormat::default();
    paragraph.cached_element = None;
    ctx.delete_result = DeleteResult::Range;
    tracing::debug!(target: "weft::delete", "cleared paragraph style");
}
