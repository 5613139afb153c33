use unicode_segmentation::UnicodeSegmentation;

use super::{DeleteDirection, DeletedEntity, EntityOperation, FormatContext};
use crate::model::{Paragraph, Segment, SegmentKind};

/// Delete the segment at `index`, or one grapheme of it for unselected
/// text. Returns false when the segment cannot be deleted this way
/// (unselected general segments).
pub(super) fn delete_segment(
    paragraph: &mut Paragraph,
    index: usize,
    direction: DeleteDirection,
    format_context: &mut FormatContext,
) -> bool {
    let Some(segment) = paragraph.segments.get_mut(index) else {
        return false;
    };
    let selected = segment.is_selected;
    let remove = match &mut segment.kind {
        SegmentKind::Br
        | SegmentKind::Image(_)
        | SegmentKind::SelectionMarker
        | SegmentKind::Entity(_) => true,
        SegmentKind::Text(text) => {
            if !selected && !text.is_empty() {
                remove_graphemes(text, 1, direction);
            }
            selected || text.is_empty()
        }
        SegmentKind::General(_) if !selected => return false,
        SegmentKind::General(_) => true,
    };
    if remove {
        if let SegmentKind::Entity(entity) = paragraph.segments.remove(index).kind {
            tracing::debug!(target: "weft::delete", wrapper = ?entity.wrapper, "deleting entity");
            format_context.deleted_entities.push(DeletedEntity {
                entity,
                operation: EntityOperation::for_direction(selected, direction),
            });
        }
    }
    paragraph.cached_element = None;
    true
}

/// Remove up to `count` graphemes from the end of `text` that faces the
/// caret and return how many were removed.
pub(super) fn remove_graphemes(text: &mut String, count: usize, direction: DeleteDirection) -> usize {
    let total = text.graphemes(true).count();
    let removed = count.min(total);
    match direction {
        DeleteDirection::Forward => {
            let cut = text
                .grapheme_indices(true)
                .nth(removed)
                .map_or(text.len(), |(at, _)| at);
            text.replace_range(..cut, "");
        }
        DeleteDirection::Backward => {
            let cut = text
                .grapheme_indices(true)
                .nth(total - removed)
                .map_or(text.len(), |(at, _)| at);
            text.truncate(cut);
        }
    }
    removed
}

/// Whether a paragraph holds nothing but markers and line breaks.
pub(super) fn only_markers_and_breaks(segments: &[Segment]) -> bool {
    segments.iter().all(|s| s.is_marker() || s.is_br())
}
