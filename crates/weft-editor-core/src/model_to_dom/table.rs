//! Tables.
//!
//! The grid is written row by row. Continuation cells of a spanned region
//! produce no element; the region's first cell carries `rowspan`/`colspan`.

use smol_str::SmolStr;
use weft_dom::{Dom, NodeId};

use super::context::TableSelectionInfo;
use super::{ModelToDomContext, adopt_element, place_element, render_block_group};
use crate::error::RenderError;
use crate::format::BlockFormat;
use crate::format::handlers::apply_dataset;
use crate::model::{Block, Table};

pub(super) fn handle_table(
    dom: &mut Dom,
    parent: NodeId,
    block: &mut Block,
    ctx: &mut ModelToDomContext<'_>,
    ref_node: Option<NodeId>,
) -> Result<Option<NodeId>, RenderError> {
    let Block::Table(table) = block else {
        return Ok(ref_node);
    };
    if table.rows.iter().all(|row| row.cells.is_empty()) {
        table.cached_element = None;
        return Ok(ref_node);
    }
    let config = ctx.config;

    let (element, next) = place_element(dom, parent, table.cached_element, "table", ref_node, ctx)?;
    let previous_tbody = dom
        .children(element)
        .iter()
        .copied()
        .find(|&child| dom.is_element_with_tag(child, "tbody"));
    dom.clear_children(element)?;
    table.cached_element = ctx.allow_cache_element.then_some(element);

    let mut scope = ctx.stack_implicit(|implicit| implicit.block = BlockFormat::default());
    config.handlers.table.apply(&table.format, dom, element, &scope)?;
    apply_dataset(&table.dataset, dom, element)?;

    let padding = uniform_cell_padding(table);
    if let Some(padding) = &padding {
        dom.set_attribute(element, "cellpadding", padding.trim_end_matches("px"))?;
    }
    let tbody = match previous_tbody {
        Some(tbody) => {
            dom.clear_children(tbody)?;
            dom.clear_attributes(tbody)?;
            tbody
        }
        None => dom.create_element("tbody"),
    };
    dom.append_child(element, tbody)?;

    let saved = scope.set_table_cell_padding(padding);
    let result = render_rows(dom, element, tbody, table, &mut scope);
    scope.set_table_cell_padding(saved);
    result?;
    Ok(next)
}

/// The padding every rendered cell shares, when it is one pixel length.
fn uniform_cell_padding(table: &Table) -> Option<SmolStr> {
    let mut cells = table
        .rows
        .iter()
        .flat_map(|row| &row.cells)
        .filter(|cell| !cell.is_spanned());
    let first = cells.next()?.format.padding.uniform()?.clone();
    if !first.ends_with("px") {
        return None;
    }
    cells
        .all(|cell| cell.format.padding.uniform() == Some(&first))
        .then_some(first)
}

fn render_rows(
    dom: &mut Dom,
    table_element: NodeId,
    tbody: NodeId,
    table: &mut Table,
    ctx: &mut ModelToDomContext<'_>,
) -> Result<(), RenderError> {
    let config = ctx.config;
    let spans: Vec<Vec<(usize, usize)>> = table
        .rows
        .iter()
        .enumerate()
        .map(|(r, row)| (0..row.cells.len()).map(|c| table.span_of(r, c)).collect())
        .collect();
    let widths = table.widths.clone();
    let mut selected: Option<TableSelectionInfo> = None;

    for (r, row) in table.rows.iter_mut().enumerate() {
        if row.cells.is_empty() {
            row.cached_element = None;
            continue;
        }
        let tr = adopt_element(dom, tbody, row.cached_element, "tr", ctx)?;
        dom.clear_children(tr)?;
        row.cached_element = ctx.allow_cache_element.then_some(tr);
        config.handlers.block.apply(&row.format, dom, tr, ctx)?;
        if row.height > 0.0 {
            dom.set_style_property(tr, "height", &format!("{}px", row.height))?;
        }

        for (c, cell) in row.cells.iter_mut().enumerate() {
            if cell.is_selected {
                selected = Some(match selected {
                    None => TableSelectionInfo {
                        table: table_element,
                        first_row: r,
                        first_column: c,
                        last_row: r,
                        last_column: c,
                    },
                    Some(info) => TableSelectionInfo {
                        first_row: info.first_row.min(r),
                        first_column: info.first_column.min(c),
                        last_row: info.last_row.max(r),
                        last_column: info.last_column.max(c),
                        ..info
                    },
                });
            }
            if cell.is_spanned() {
                cell.cached_element = None;
                continue;
            }

            let tag = if cell.is_header { "th" } else { "td" };
            let td = adopt_element(dom, tr, cell.cached_element, tag, ctx)?;
            cell.cached_element = ctx.allow_cache_element.then_some(td);
            let (rowspan, colspan) = spans[r][c];
            if rowspan > 1 {
                dom.set_attribute(td, "rowspan", rowspan.to_string())?;
            }
            if colspan > 1 {
                dom.set_attribute(td, "colspan", colspan.to_string())?;
            }
            config.handlers.table_cell.apply(&cell.format, dom, td, ctx)?;
            if let Some(width) = widths.get(c).filter(|w| colspan == 1 && **w > 0.0) {
                dom.set_style_property(td, "width", &format!("{width}px"))?;
            }
            apply_dataset(&cell.dataset, dom, td)?;

            let mut scope = ctx.stack_format(tag);
            render_block_group(dom, td, cell, &mut scope)?;
        }
    }

    if selected.is_some() {
        ctx.selection.table = selected;
    }
    Ok(())
}
