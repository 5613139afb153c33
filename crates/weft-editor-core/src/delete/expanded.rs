//! Removal of an expanded selection.
//!
//! The tree is walked once in document order. The first selected item is
//! replaced by the caret marker; everything selected after it goes away.
//! The last paragraph that was only partly selected is remembered so its
//! remainder can be merged into the caret's paragraph afterwards.

use super::{DeletedEntity, EntityOperation, FormatContext};
use crate::model::{
    Block, BlockGroupNode, BlockPath, ContentModelDocument, InsertPoint, Paragraph, PathStep,
    Segment, SegmentKind, Table, TableContext,
};

#[derive(Debug)]
pub(super) struct ExpandedOutcome {
    pub insert_point: Option<InsertPoint>,
    pub last_paragraph: Option<BlockPath>,
    pub last_table_context: Option<TableContext>,
}

struct Walk<'a> {
    insert_point: Option<InsertPoint>,
    last_paragraph: Option<BlockPath>,
    last_table_context: Option<TableContext>,
    format_context: &'a mut FormatContext,
}

enum Outcome {
    Keep,
    Remove,
    /// Put a paragraph holding the caret where the block was.
    ReplaceWithCaret,
}

/// Returns `None` when nothing besides a collapsed marker is selected.
///
/// A range that only spans block boundaries holds nothing but its two
/// markers; it still counts as expanded so the blocks get joined.
pub(super) fn delete_expanded_selection(
    model: &mut ContentModelDocument,
    format_context: &mut FormatContext,
) -> Option<ExpandedOutcome> {
    if !has_selected_content(model) && count_markers(model) < 2 {
        return None;
    }
    let mut walk = Walk {
        insert_point: None,
        last_paragraph: None,
        last_table_context: None,
        format_context,
    };
    delete_in_group(model, &BlockPath::root(), &mut walk);
    tracing::debug!(
        target: "weft::delete",
        caret = ?walk.insert_point.as_ref().map(|p| &p.path),
        last = ?walk.last_paragraph,
        "deleted expanded selection"
    );
    Some(ExpandedOutcome {
        insert_point: walk.insert_point,
        last_paragraph: walk.last_paragraph,
        last_table_context: walk.last_table_context,
    })
}

/// Anything selected other than a caret marker.
fn has_selected_content(group: &dyn BlockGroupNode) -> bool {
    group.blocks().iter().any(|block| match block {
        Block::Paragraph(p) => p.segments.iter().any(|s| {
            (s.is_selected && !s.is_marker())
                || matches!(&s.kind, SegmentKind::General(g) if has_selected_content(g))
        }),
        Block::Table(t) => t
            .rows
            .iter()
            .flat_map(|r| &r.cells)
            .any(|c| c.is_selected || has_selected_content(c)),
        Block::Divider(d) => d.is_selected,
        Block::Entity(e) => e.is_selected,
        other => other.as_group().is_some_and(has_selected_content),
    })
}

fn count_markers(group: &dyn BlockGroupNode) -> usize {
    group
        .blocks()
        .iter()
        .map(|block| match block {
            Block::Paragraph(p) => p
                .segments
                .iter()
                .map(|s| match &s.kind {
                    SegmentKind::SelectionMarker => 1,
                    SegmentKind::General(g) => count_markers(g),
                    _ => 0,
                })
                .sum(),
            Block::Table(t) => t
                .rows
                .iter()
                .flat_map(|r| &r.cells)
                .map(|c| count_markers(c))
                .sum(),
            other => other.as_group().map_or(0, count_markers),
        })
        .sum()
}

fn caret_paragraph() -> Paragraph {
    Paragraph::new(false).with_segments(vec![Segment::marker(), Segment::br()])
}

fn delete_in_group(group: &mut dyn BlockGroupNode, path: &BlockPath, walk: &mut Walk<'_>) {
    let mut i = 0;
    while i < group.blocks().len() {
        let block_path = path.block(i);
        let block = &mut group.blocks_mut()[i];
        let outcome = match block {
            Block::Paragraph(p) => delete_in_paragraph(p, &block_path, walk),
            Block::Divider(d) if d.is_selected => Outcome::ReplaceWithCaret,
            Block::Entity(e) if e.is_selected => {
                walk.format_context.deleted_entities.push(DeletedEntity {
                    entity: e.entity.clone(),
                    operation: EntityOperation::Overwrite,
                });
                Outcome::ReplaceWithCaret
            }
            Block::Divider(_) | Block::Entity(_) => Outcome::Keep,
            Block::Table(table) => delete_in_table(table, &block_path, walk),
            other => match other.as_group_mut() {
                Some(child) => {
                    let had_blocks = !child.blocks().is_empty();
                    delete_in_group(child, &block_path, walk);
                    if had_blocks && child.blocks().is_empty() {
                        Outcome::Remove
                    } else {
                        other.clear_cached_element();
                        Outcome::Keep
                    }
                }
                None => Outcome::Keep,
            },
        };

        let blocks = group.blocks_mut();
        match outcome {
            Outcome::Keep => i += 1,
            Outcome::Remove => {
                blocks.remove(i);
            }
            Outcome::ReplaceWithCaret if walk.insert_point.is_none() => {
                blocks[i] = Block::Paragraph(caret_paragraph());
                walk.insert_point = Some(InsertPoint::new(block_path, 0));
                i += 1;
            }
            Outcome::ReplaceWithCaret => {
                blocks.remove(i);
            }
        }
    }
}

fn delete_in_paragraph(paragraph: &mut Paragraph, path: &BlockPath, walk: &mut Walk<'_>) -> Outcome {
    let mut touched = false;
    let mut holds_caret = false;
    let mut j = 0;
    while j < paragraph.segments.len() {
        if paragraph.segments[j].is_selected {
            touched = true;
            let removed = paragraph.segments.remove(j);
            if walk.insert_point.is_none() {
                paragraph
                    .segments
                    .insert(j, Segment::marker().with_format(removed.format.clone()));
                walk.insert_point = Some(InsertPoint::new(path.clone(), j));
                holds_caret = true;
                j += 1;
            }
            if let SegmentKind::Entity(entity) = removed.kind {
                walk.format_context.deleted_entities.push(DeletedEntity {
                    entity,
                    operation: EntityOperation::Overwrite,
                });
            }
            continue;
        }
        if let SegmentKind::General(general) = &mut paragraph.segments[j].kind {
            delete_in_group(general, &path.child(PathStep::Segment(j)), walk);
            if walk
                .insert_point
                .as_ref()
                .is_some_and(|p| p.path.steps.starts_with(&path.steps))
            {
                holds_caret = true;
            }
        }
        j += 1;
    }

    if !touched {
        return Outcome::Keep;
    }
    paragraph.cached_element = None;
    if holds_caret {
        Outcome::Keep
    } else if paragraph.segments.is_empty() {
        Outcome::Remove
    } else {
        walk.last_paragraph = Some(path.clone());
        walk.last_table_context = TableContext::of(path);
        Outcome::Keep
    }
}

fn delete_in_table(table: &mut Table, path: &BlockPath, walk: &mut Walk<'_>) -> Outcome {
    let mut cells = table.rows.iter().flat_map(|r| &r.cells).peekable();
    let fully_selected = cells.peek().is_some() && cells.all(|c| c.is_selected);
    if fully_selected {
        return Outcome::ReplaceWithCaret;
    }

    let mut touched = false;
    for (row, r) in table.rows.iter_mut().enumerate() {
        for (col, cell) in r.cells.iter_mut().enumerate() {
            let cell_path = path.child(PathStep::Cell { row, col });
            if !cell.is_selected {
                delete_in_group(cell, &cell_path, walk);
                continue;
            }
            touched = true;
            cell.is_selected = false;
            cell.cached_element = None;
            if cell.is_spanned() {
                continue;
            }
            if walk.insert_point.is_none() {
                cell.blocks = vec![Block::Paragraph(caret_paragraph())];
                walk.insert_point = Some(InsertPoint::new(cell_path.block(0), 0));
            } else {
                cell.blocks = vec![Block::Paragraph(
                    Paragraph::new(false).with_segments(vec![Segment::br()]),
                )];
            }
        }
    }
    if touched {
        table.cached_element = None;
    }
    Outcome::Keep
}
