//! Backspace and Delete on the Model.
//!
//! [`delete_selection`] first removes an expanded selection, then runs the
//! given steps against one shared [`DeleteContext`] until one of them
//! reports a result, and finally merges a paragraph left behind by a
//! cross-block deletion into the paragraph holding the caret.
//!
//! Deleting never fails: a keystroke that finds nothing to do reports
//! [`DeleteResult::NotDeleted`] or [`DeleteResult::NothingToDelete`].

mod collapsed;
mod expanded;
mod segment;
mod steps;
mod word;

#[cfg(test)]
mod tests;

use bitflags::bitflags;

pub use collapsed::{backward_delete_collapsed, forward_delete_collapsed};
pub use steps::{delete_all_segment_before, delete_empty_quote, delete_list, delete_paragraph_style};
pub use word::{backward_delete_word, forward_delete_word};

use crate::model::{
    Block, BlockPath, ContentModelDocument, Entity, Image, InsertPoint, PathStep, TableContext,
    find_insert_point, group_at_mut, paragraph_at_mut,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeleteResult {
    /// No step applied.
    #[default]
    NotDeleted,
    /// The caret sits at a boundary with nothing left to remove. Enclosing
    /// structure must not be deleted in its place.
    NothingToDelete,
    /// One character or segment next to the caret went away; the caret
    /// stays where it is.
    SingleChar,
    /// Structure changed; the caret has to be placed again.
    Range,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteDirection {
    Forward,
    Backward,
}

/// The key that started the deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeleteTrigger {
    #[default]
    Backspace,
    Delete,
    Enter,
}

/// How an entity left the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityOperation {
    /// Removed as part of a selection.
    Overwrite,
    /// Removed by Delete with the caret right before it.
    RemoveFromStart,
    /// Removed by Backspace with the caret right after it.
    RemoveFromEnd,
}

impl EntityOperation {
    pub(crate) fn for_direction(selected: bool, direction: DeleteDirection) -> Self {
        match (selected, direction) {
            (true, _) => Self::Overwrite,
            (false, DeleteDirection::Forward) => Self::RemoveFromStart,
            (false, DeleteDirection::Backward) => Self::RemoveFromEnd,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeletedEntity {
    pub entity: Entity,
    pub operation: EntityOperation,
}

/// Side effects of a deletion the host observes after the fact.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormatContext {
    pub trigger: DeleteTrigger,
    pub deleted_entities: Vec<DeletedEntity>,
    pub new_entities: Vec<Entity>,
    pub new_images: Vec<Image>,
}

impl FormatContext {
    pub fn new(trigger: DeleteTrigger) -> Self {
        Self {
            trigger,
            ..Default::default()
        }
    }
}

/// State shared by the steps of one deletion.
#[derive(Debug)]
pub struct DeleteContext<'a> {
    pub delete_result: DeleteResult,
    pub insert_point: InsertPoint,
    /// Paragraph whose segments move into the insertion paragraph once the
    /// steps are done.
    pub last_paragraph: Option<BlockPath>,
    pub last_table_context: Option<TableContext>,
    pub format_context: &'a mut FormatContext,
}

impl DeleteContext<'_> {
    /// Re-read the insertion point from the marker after the tree changed
    /// around it.
    pub(crate) fn refresh_insert_point(&mut self, model: &ContentModelDocument) {
        if let Some(point) = find_insert_point(model) {
            self.insert_point = point;
        }
    }
}

/// One step of the pipeline. A step looks at `delete_result` and leaves
/// the context alone when an earlier step already decided.
pub type DeleteSelectionStep = fn(&mut ContentModelDocument, &mut DeleteContext<'_>);

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteSelectionResult {
    pub insert_point: Option<InsertPoint>,
    pub delete_result: DeleteResult,
}

bitflags! {
    /// Key modifiers, already mapped from the platform's key bindings.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct DeleteModifiers: u8 {
        /// Delete a whole word (Ctrl, or Alt on macOS).
        const WORD = 1;
        /// Delete up to the start of the paragraph (Cmd on macOS).
        const LINE = 1 << 1;
    }
}

/// Steps for a Backspace or Delete keystroke.
pub fn default_delete_steps(
    direction: DeleteDirection,
    modifiers: DeleteModifiers,
) -> Vec<DeleteSelectionStep> {
    let forward = direction == DeleteDirection::Forward;
    let mut steps: Vec<DeleteSelectionStep> = Vec::new();
    if !forward && modifiers.contains(DeleteModifiers::LINE) {
        steps.push(delete_all_segment_before);
    }
    if modifiers.contains(DeleteModifiers::WORD) {
        steps.push(if forward {
            forward_delete_word
        } else {
            backward_delete_word
        });
    }
    if forward {
        steps.push(forward_delete_collapsed);
    } else {
        steps.push(delete_list);
        steps.push(backward_delete_collapsed);
        steps.push(delete_empty_quote);
    }
    steps.push(delete_paragraph_style);
    steps
}

/// Delete the selection of `model`, then run `steps` for a collapsed
/// caret.
#[tracing::instrument(level = "debug", skip_all, fields(steps = steps.len()))]
pub fn delete_selection(
    model: &mut ContentModelDocument,
    steps: &[DeleteSelectionStep],
    format_context: &mut FormatContext,
) -> DeleteSelectionResult {
    let (insert_point, delete_result, last_paragraph, last_table_context) =
        match expanded::delete_expanded_selection(model, format_context) {
            Some(outcome) => (
                outcome.insert_point.or_else(|| find_insert_point(model)),
                DeleteResult::Range,
                outcome.last_paragraph,
                outcome.last_table_context,
            ),
            None => (find_insert_point(model), DeleteResult::NotDeleted, None, None),
        };
    let Some(insert_point) = insert_point else {
        tracing::debug!(target: "weft::delete", "no selection, nothing to do");
        return DeleteSelectionResult {
            insert_point: None,
            delete_result,
        };
    };

    let mut ctx = DeleteContext {
        delete_result,
        insert_point,
        last_paragraph,
        last_table_context,
        format_context,
    };

    for step in steps {
        if !matches!(
            ctx.delete_result,
            DeleteResult::NotDeleted | DeleteResult::NothingToDelete
        ) {
            break;
        }
        step(model, &mut ctx);
    }

    merge_paragraph_after_delete(model, &mut ctx);
    ctx.refresh_insert_point(model);
    tracing::debug!(target: "weft::delete", result = ?ctx.delete_result, "deletion finished");
    DeleteSelectionResult {
        insert_point: Some(ctx.insert_point),
        delete_result: ctx.delete_result,
    }
}

/// Move the segments of `last_paragraph` to the end of the insertion
/// paragraph, when both sit in the same table cell (or in no cell).
fn merge_paragraph_after_delete(model: &mut ContentModelDocument, ctx: &mut DeleteContext<'_>) {
    let Some(last) = ctx.last_paragraph.take() else {
        return;
    };
    if matches!(
        ctx.delete_result,
        DeleteResult::NotDeleted | DeleteResult::NothingToDelete
    ) || last == ctx.insert_point.path
        || ctx.last_table_context != ctx.insert_point.table_context
    {
        return;
    }
    let Some(paragraph) = paragraph_at_mut(model, &last) else {
        return;
    };
    let segments = std::mem::take(&mut paragraph.segments);
    // The drained paragraph always follows the insertion paragraph, so the
    // insertion path survives its removal.
    remove_block(model, &last);
    if let Some(target) = paragraph_at_mut(model, &ctx.insert_point.path) {
        target.segments.extend(segments);
        target.cached_element = None;
        tracing::trace!(target: "weft::delete", ?last, "merged paragraph");
    }
}

/// Remove the block at `path`, then every block group the removal left
/// empty, up to the nearest table cell, general segment or the root.
pub(crate) fn remove_block(model: &mut ContentModelDocument, path: &BlockPath) -> Option<Block> {
    let index = path.last_index()?;
    let group_path = path.group();
    let group = group_at_mut(model, &group_path)?;
    if index >= group.blocks().len() {
        return None;
    }
    let removed = group.blocks_mut().remove(index);
    let now_empty = group.blocks().is_empty();
    if now_empty && matches!(group_path.steps.last(), Some(PathStep::Block(_))) {
        remove_block(model, &group_path);
    }
    Some(removed)
}
