//! The core keystroke: remove what sits right next to a collapsed caret.

use smol_str::format_smolstr;

use super::segment::{delete_segment, only_markers_and_breaks};
use super::{
    DeleteContext, DeleteDirection, DeleteResult, DeletedEntity, EntityOperation, remove_block,
};
use crate::format::{BlockFormat, Direction};
use crate::model::{
    Block, BlockGroupKind, BlockGroupNode, BlockPath, ContentModelDocument, InsertPoint, Paragraph,
    PathStep, Segment, Table, block_at, block_at_mut, group_at, paragraph_at, paragraph_at_mut,
};

/// One indentation step, in pixels.
const INDENT_STEP: f32 = 40.0;

pub fn forward_delete_collapsed(model: &mut ContentModelDocument, ctx: &mut DeleteContext<'_>) {
    delete_collapsed(model, ctx, DeleteDirection::Forward);
}

pub fn backward_delete_collapsed(model: &mut ContentModelDocument, ctx: &mut DeleteContext<'_>) {
    delete_collapsed(model, ctx, DeleteDirection::Backward);
}

/// What lies next to the caret's paragraph in the deletion direction.
#[derive(Debug, PartialEq)]
enum Sibling {
    /// A leaf block, or an empty block group.
    Block(BlockPath),
    /// A segment next to the general segment that holds the caret's
    /// paragraph.
    Segment { paragraph: BlockPath, index: usize },
}

fn delete_collapsed(
    model: &mut ContentModelDocument,
    ctx: &mut DeleteContext<'_>,
    direction: DeleteDirection,
) {
    if ctx.delete_result != DeleteResult::NotDeleted {
        return;
    }
    let forward = direction == DeleteDirection::Forward;
    let point = ctx.insert_point.clone();

    let (dropped_br, target) = {
        let Some(paragraph) = paragraph_at_mut(model, &point.path) else {
            return;
        };
        let dropped_br = drop_trailing_br(&mut paragraph.segments);
        let marker = paragraph.marker_index().unwrap_or(point.marker_index);
        let target = if forward {
            Some(marker + 1)
        } else {
            marker.checked_sub(1)
        };
        let target = target.filter(|&t| t < paragraph.segments.len());
        if let Some(index) = target {
            if delete_segment(paragraph, index, direction, ctx.format_context) {
                // keep the paragraph's format even if it is now empty
                paragraph.is_implicit = false;
                ctx.delete_result = DeleteResult::SingleChar;
            }
        }
        (dropped_br, target)
    };

    if target.is_none() {
        if !forward && outdent_empty_paragraph(model, &point.path) {
            ctx.delete_result = DeleteResult::Range;
        } else if let Some(sibling) = leaf_sibling(model, &point.path, direction) {
            delete_sibling(model, ctx, sibling, direction);
        } else {
            tracing::trace!(target: "weft::delete", path = ?point.path, "caret at a boundary");
            ctx.delete_result = DeleteResult::NothingToDelete;
        }
    }

    if ctx.last_paragraph.is_none() {
        ctx.refresh_insert_point(model);
        if dropped_br {
            restore_empty_line(model, &ctx.insert_point.path);
        }
    }
    tracing::debug!(target: "weft::delete", ?direction, result = ?ctx.delete_result, "collapsed deletion");
}

/// Drop a trailing line break unless it is the second of two.
fn drop_trailing_br(segments: &mut Vec<Segment>) -> bool {
    if !segments.last().is_some_and(Segment::is_br) {
        return false;
    }
    let content: Vec<&Segment> = segments.iter().filter(|s| !s.is_marker()).collect();
    let doubled = content.len() >= 2 && content[content.len() - 2].is_br();
    if doubled {
        return false;
    }
    segments.pop();
    true
}

fn restore_empty_line(model: &mut ContentModelDocument, path: &BlockPath) {
    let Some(paragraph) = paragraph_at_mut(model, path) else {
        return;
    };
    if paragraph.segments.iter().all(Segment::is_marker) {
        let format = paragraph
            .segments
            .last()
            .map(|s| s.format.clone())
            .unwrap_or_default();
        paragraph.segments.push(Segment::br().with_format(format));
    }
}

/// Remove one indentation step from an empty paragraph that is indented
/// on its start side. List items are outdented by their own step.
fn outdent_empty_paragraph(model: &mut ContentModelDocument, path: &BlockPath) -> bool {
    let in_list = group_at(model, &path.group())
        .is_some_and(|group| group.group_kind() == BlockGroupKind::ListItem);
    if in_list {
        return false;
    }
    let Some(paragraph) = paragraph_at_mut(model, path) else {
        return false;
    };
    if !paragraph.segments.iter().all(Segment::is_marker) {
        return false;
    }
    let outdented = outdent(&mut paragraph.format);
    if outdented {
        paragraph.cached_element = None;
        tracing::debug!(target: "weft::delete", ?path, "outdented empty paragraph");
    }
    outdented
}

fn outdent(format: &mut BlockFormat) -> bool {
    let side = if format.direction == Some(Direction::Rtl) {
        "right"
    } else {
        "left"
    };
    let Some(slot) = format.margin.side_mut(side) else {
        return false;
    };
    let Some(current) = slot.as_deref().and_then(parse_px).filter(|px| *px > 0.0) else {
        return false;
    };
    let next = (current - INDENT_STEP).max(0.0);
    *slot = (next > 0.0).then(|| format_smolstr!("{next}px"));
    true
}

fn parse_px(value: &str) -> Option<f32> {
    value.trim().strip_suffix("px")?.trim().parse().ok()
}

/// Find the block the caret would run into when leaving its paragraph.
///
/// Walks up through block groups until one has a block next to the path,
/// then descends to the nearest leaf of that block. Table cells and the
/// document bound the walk. A paragraph inside a general segment looks at
/// the segments around that general segment before walking further up.
fn leaf_sibling(
    model: &ContentModelDocument,
    path: &BlockPath,
    direction: DeleteDirection,
) -> Option<Sibling> {
    let forward = direction == DeleteDirection::Forward;
    let mut current = path.clone();
    loop {
        let index = current.last_index()?;
        let group_path = current.group();
        let group = group_at(model, &group_path)?;
        let neighbor = if forward {
            Some(index + 1)
        } else {
            index.checked_sub(1)
        };
        if let Some(neighbor) = neighbor.filter(|&n| n < group.blocks().len()) {
            return Some(Sibling::Block(descend(model, group_path.block(neighbor), forward)));
        }

        match group_path.steps.last() {
            Some(PathStep::Block(_)) => current = group_path,
            Some(PathStep::Segment(segment)) => {
                let paragraph_path = group_path.group();
                let paragraph = paragraph_at(model, &paragraph_path)?;
                let neighbor = if forward {
                    Some(segment + 1)
                } else {
                    segment.checked_sub(1)
                };
                match neighbor.filter(|&n| n < paragraph.segments.len()) {
                    Some(index) => {
                        return Some(Sibling::Segment {
                            paragraph: paragraph_path,
                            index,
                        });
                    }
                    None => current = paragraph_path,
                }
            }
            Some(PathStep::Cell { .. }) | None => return None,
        }
    }
}

/// First (or last) leaf under the block at `path`.
fn descend(model: &ContentModelDocument, mut path: BlockPath, forward: bool) -> BlockPath {
    loop {
        let Some(group) = block_at(model, &path).and_then(Block::as_group) else {
            return path;
        };
        let count = group.blocks().len();
        if count == 0 {
            return path;
        }
        path = path.block(if forward { 0 } else { count - 1 });
    }
}

fn delete_sibling(
    model: &mut ContentModelDocument,
    ctx: &mut DeleteContext<'_>,
    sibling: Sibling,
    direction: DeleteDirection,
) {
    let forward = direction == DeleteDirection::Forward;
    let path = match sibling {
        Sibling::Segment { paragraph, index } => {
            if let Some(para) = paragraph_at_mut(model, &paragraph) {
                if delete_segment(para, index, direction, ctx.format_context) {
                    ctx.delete_result = DeleteResult::Range;
                }
            }
            return;
        }
        Sibling::Block(path) => path,
    };

    match block_at_mut(model, &path) {
        Some(Block::Paragraph(paragraph)) => {
            let point = ctx.insert_point.clone();
            if forward {
                ctx.last_paragraph = Some(path);
            } else {
                // the caret's paragraph joins the end of this one
                if paragraph.segments.last().is_some_and(Segment::is_br) {
                    paragraph.segments.pop();
                }
                paragraph.cached_element = None;
                let marker_index = paragraph.segments.len();
                ctx.insert_point = InsertPoint {
                    path,
                    marker_index,
                    table_context: point.table_context.clone(),
                };
                ctx.last_paragraph = Some(point.path);
            }
            ctx.last_table_context = point.table_context;
            ctx.delete_result = DeleteResult::Range;
        }
        Some(Block::Table(_)) => enter_table(model, ctx, &path, direction),
        Some(Block::Entity(_)) => {
            if let Some(Block::Entity(block)) = remove_block(model, &path) {
                tracing::debug!(target: "weft::delete", wrapper = ?block.entity.wrapper, "deleting entity block");
                ctx.format_context.deleted_entities.push(DeletedEntity {
                    entity: block.entity,
                    operation: EntityOperation::for_direction(block.is_selected, direction),
                });
            }
            ctx.delete_result = DeleteResult::Range;
        }
        Some(_) => {
            // dividers and block groups with nothing in them
            remove_block(model, &path);
            ctx.delete_result = DeleteResult::Range;
        }
        None => {}
    }
}

/// Tables are never deleted by a collapsed keystroke. An empty paragraph
/// next to one is removed and the caret moves into the nearest cell;
/// otherwise there is nothing to delete.
fn enter_table(
    model: &mut ContentModelDocument,
    ctx: &mut DeleteContext<'_>,
    table_path: &BlockPath,
    direction: DeleteDirection,
) {
    let forward = direction == DeleteDirection::Forward;
    let point = ctx.insert_point.clone();
    let Some(paragraph) = paragraph_at(model, &point.path) else {
        return;
    };
    if !only_markers_and_breaks(&paragraph.segments) {
        ctx.delete_result = DeleteResult::NothingToDelete;
        return;
    }
    let format = paragraph
        .marker_index()
        .map(|i| paragraph.segments[i].format.clone())
        .unwrap_or_default();

    let Some(Block::Table(table)) = block_at_mut(model, table_path) else {
        return;
    };
    if !place_caret_in_table(table, forward, Segment::marker().with_format(format)) {
        ctx.delete_result = DeleteResult::NothingToDelete;
        return;
    }
    table.cached_element = None;
    remove_block(model, &point.path);
    ctx.refresh_insert_point(model);
    ctx.delete_result = DeleteResult::Range;
    tracing::debug!(target: "weft::delete", table = ?table_path, "moved caret into table");
}

/// Put `marker` at the start of the first cell or the end of the last one.
fn place_caret_in_table(table: &mut Table, forward: bool, marker: Segment) -> bool {
    let cell = if forward {
        table
            .rows
            .iter_mut()
            .flat_map(|r| r.cells.iter_mut())
            .find(|c| !c.is_spanned())
    } else {
        table
            .rows
            .iter_mut()
            .rev()
            .flat_map(|r| r.cells.iter_mut().rev())
            .find(|c| !c.is_spanned())
    };
    let Some(cell) = cell else {
        return false;
    };
    cell.cached_element = None;
    let Some(paragraph) = edge_paragraph(cell, forward) else {
        return false;
    };
    paragraph.cached_element = None;
    if forward {
        paragraph.segments.insert(0, marker);
    } else {
        let end = paragraph.segments.len();
        let at = if paragraph.segments.last().is_some_and(Segment::is_br) {
            end - 1
        } else {
            end
        };
        paragraph.segments.insert(at, marker);
    }
    true
}

/// The first (or last) paragraph of a group, created when the group ends
/// in something else.
fn edge_paragraph(group: &mut dyn BlockGroupNode, forward: bool) -> Option<&mut Paragraph> {
    let blocks = group.blocks_mut();
    let index = if forward { 0 } else { blocks.len().saturating_sub(1) };
    let shape = blocks
        .get(index)
        .map(|b| (b.as_group().is_some(), b.as_paragraph().is_some()));
    match shape {
        Some((true, _)) => edge_paragraph(blocks[index].as_group_mut()?, forward),
        Some((_, true)) => blocks[index].as_paragraph_mut(),
        _ => {
            let at = if forward { 0 } else { blocks.len() };
            blocks.insert(at, Block::Paragraph(Paragraph::new(false)));
            blocks[at].as_paragraph_mut()
        }
    }
}
