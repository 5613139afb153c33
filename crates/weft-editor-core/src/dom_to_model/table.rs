//! Tables.
//!
//! `thead`/`tbody`/`tfoot` are transparent. Spanned regions become one
//! content cell plus continuation cells flagged `span_left`/`span_above`,
//! so every row of the grid has the same shape.

use weft_dom::{Dom, NodeId};

use super::{DomToModelContext, add_block};
use crate::format::defaults::default_style;
use crate::format::handlers::parse_dataset;
use crate::format::{BlockFormat, BoxSides, FormatBag};
use crate::model::{Block, BlockGroupNode, Table, TableCell, TableRow};
use crate::selection::DomSelection;

/// Pixel value of a `width`/`height` attribute or style.
pub(crate) fn parse_pixels(value: &str) -> Option<f32> {
    let value = value.trim();
    let number = value.strip_suffix("px").unwrap_or(value).trim();
    number.parse::<f32>().ok().filter(|n| n.is_finite() && *n >= 0.0)
}

fn dimension(dom: &Dom, element: NodeId, name: &str) -> Option<f32> {
    dom.style_property(element, name)
        .as_deref()
        .and_then(parse_pixels)
        .or_else(|| dom.attribute(element, name).and_then(parse_pixels))
}

fn span(dom: &Dom, element: NodeId, name: &str) -> usize {
    dom.attribute(element, name)
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(1)
}

fn table_rows(dom: &Dom, table: NodeId) -> Vec<NodeId> {
    let mut rows = Vec::new();
    for &child in dom.children(table) {
        match dom.tag_name(child) {
            Some("tr") => rows.push(child),
            Some("tbody" | "thead" | "tfoot") => rows.extend(
                dom.children(child)
                    .iter()
                    .copied()
                    .filter(|&c| dom.is_element_with_tag(c, "tr")),
            ),
            _ => {}
        }
    }
    rows
}

pub fn process_table(
    group: &mut dyn BlockGroupNode,
    dom: &Dom,
    element: NodeId,
    ctx: &mut DomToModelContext<'_>,
) {
    let config = ctx.config;
    let mut table = Table {
        dataset: parse_dataset(dom, element),
        ..Default::default()
    };
    config
        .handlers
        .table
        .parse(&mut table.format, dom, element, ctx, &default_style("table"));
    if ctx.allow_cache_element {
        table.cached_element = Some(element);
    }

    let cell_padding = dom
        .attribute(element, "cellpadding")
        .and_then(parse_pixels)
        .map(|px| smol_str::format_smolstr!("{px}px"));

    let rows = table_rows(dom, element);
    let mut grid: Vec<Vec<Option<TableCell>>> = vec![Vec::new(); rows.len()];
    let mut widths: Vec<f32> = Vec::new();

    for (r, &tr) in rows.iter().enumerate() {
        let mut row = TableRow {
            height: dimension(dom, tr, "height").unwrap_or(0.0),
            ..Default::default()
        };
        config
            .handlers
            .block
            .parse(&mut row.format, dom, tr, ctx, &default_style("tr"));
        if ctx.allow_cache_element {
            row.cached_element = Some(tr);
        }
        table.rows.push(row);

        let mut c = 0;
        for &td in dom.children(tr) {
            let is_header = match dom.tag_name(td) {
                Some("td") => false,
                Some("th") => true,
                _ => continue,
            };
            while grid[r].get(c).is_some_and(Option::is_some) {
                c += 1;
            }
            let colspan = span(dom, td, "colspan");
            let rowspan = span(dom, td, "rowspan").min(rows.len() - r);

            if colspan == 1 {
                if let Some(width) = dimension(dom, td, "width") {
                    if widths.len() <= c {
                        widths.resize(c + 1, 0.0);
                    }
                    if widths[c] == 0.0 {
                        widths[c] = width;
                    }
                }
            }

            let mut content = Some(process_cell(dom, td, is_header, cell_padding.as_ref(), ctx));
            for dr in 0..rowspan {
                for dc in 0..colspan {
                    let grid_row = &mut grid[r + dr];
                    if grid_row.len() <= c + dc {
                        grid_row.resize(c + dc + 1, None);
                    }
                    grid_row[c + dc] = match content.take() {
                        Some(cell) => Some(cell),
                        None => Some(TableCell::new(dc > 0, dr > 0, is_header)),
                    };
                }
            }
            c += colspan;
        }
    }

    let columns = grid.iter().map(Vec::len).max().unwrap_or(0);
    widths.resize(columns, 0.0);
    table.widths = widths;
    for (row, cells) in table.rows.iter_mut().zip(grid) {
        row.cells = cells
            .into_iter()
            .map(Option::unwrap_or_default)
            .collect();
        row.cells.resize_with(columns, TableCell::default);
    }

    if let Some(DomSelection::Table {
        table: selected,
        first_row,
        first_column,
        last_row,
        last_column,
    }) = ctx.selection
    {
        if selected == element {
            for (r, row) in table.rows.iter_mut().enumerate() {
                for (c, cell) in row.cells.iter_mut().enumerate() {
                    cell.is_selected = (first_row..=last_row).contains(&r)
                        && (first_column..=last_column).contains(&c);
                }
            }
        }
    }

    add_block(group, Block::Table(table), ctx);
}

fn process_cell(
    dom: &Dom,
    td: NodeId,
    is_header: bool,
    table_padding: Option<&smol_str::SmolStr>,
    ctx: &mut DomToModelContext<'_>,
) -> TableCell {
    let config = ctx.config;
    let tag = if is_header { "th" } else { "td" };
    let defaults = default_style(tag);
    let mut cell = TableCell::new(false, false, is_header);
    config
        .handlers
        .table_cell
        .parse(&mut cell.format, dom, td, ctx, &defaults);
    if let Some(padding) = table_padding {
        if cell.format.padding.is_empty() {
            cell.format.padding = BoxSides {
                top: Some(padding.clone()),
                right: Some(padding.clone()),
                bottom: Some(padding.clone()),
                left: Some(padding.clone()),
            };
        }
    }
    cell.dataset = parse_dataset(dom, td);
    if ctx.allow_cache_element {
        cell.cached_element = Some(td);
    }

    ctx.scoped(|ctx| {
        ctx.block_format = BlockFormat::default();
        ctx.decorator = None;
        let mut segment_format = ctx.segment_format.clone();
        config
            .handlers
            .segment
            .parse(&mut segment_format, dom, td, ctx, &defaults);
        ctx.segment_format = segment_format;
        let child = config.processors.child;
        child(&mut cell, dom, td, ctx);
    });
    cell
}
