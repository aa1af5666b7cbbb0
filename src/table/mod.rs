//! Table geometry: grid reconstruction, column widths and resolved borders.

pub mod borders;
pub mod grid;

use std::collections::HashMap;

use crate::cascade::{
    CellAlignment, CellShading, GridAfter, GridBefore, GridSpan, RowHeightRule, StyleResolver,
    TableAlignment, TableBorders, TableIndent,
};
use crate::model::{
    Alignment, BorderSet, CellMargins, CellVAlign, NodeId, NodeKind, RowHeight, WidthSpec,
};

pub use borders::{CellPosition, apply_cell_borders, wins};
pub use grid::{GridCell, GridSlot, TableGrid};

#[derive(Clone, Debug, PartialEq)]
pub struct CellLayout {
    pub cell_id: usize,
    /// The `w:tc` whose content the cell shows.
    pub node: NodeId,
    pub row: usize,
    pub col: usize,
    pub row_span: usize,
    pub col_span: usize,
    /// Sum of the spanned column widths, in points.
    pub width: f32,
    pub borders: BorderSet,
    pub margins: CellMargins,
    pub fill: Option<[u8; 3]>,
    pub v_align: CellVAlign,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RowLayout {
    /// `w:trHeight`; an `Exact` rule fixes the height, `AtLeast` and `Auto`
    /// give a minimum.
    pub height: Option<RowHeight>,
    pub padding_top: f32,
    pub padding_bottom: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TableLayout {
    pub column_widths: Vec<f32>,
    pub alignment: Alignment,
    /// `w:tblInd`, points.
    pub indent: f32,
    pub rows: Vec<RowLayout>,
    /// Logical cells ordered by cell id.
    pub cells: Vec<CellLayout>,
}

impl TableLayout {
    pub fn total_width(&self) -> f32 {
        self.column_widths.iter().sum()
    }

    pub fn cell(&self, cell_id: usize) -> Option<&CellLayout> {
        self.cells.iter().find(|c| c.cell_id == cell_id)
    }

    pub fn cell_at(&self, row: usize, col: usize) -> Option<&CellLayout> {
        self.cells.iter().find(|c| {
            (c.row..c.row + c.row_span).contains(&row) && (c.col..c.col + c.col_span).contains(&col)
        })
    }
}

/// Resolve a `w:tbl` into column widths, merged cells and conflict-free
/// borders. `printable_width` is the reference for percentage widths.
pub fn resolve_table(resolver: &StyleResolver<'_>, table: NodeId, printable_width: f32) -> TableLayout {
    let doc = resolver.document();
    let mut columns = grid::declared_columns(doc, resolver, table, printable_width)
        .filter(|cols| !cols.is_empty())
        .unwrap_or_else(|| {
            let count = widest_row(resolver, table).max(1);
            log::warn!("Table has no usable column grid, splitting {printable_width}pt into {count} columns");
            vec![printable_width / count as f32; count]
        });

    let grid = TableGrid::build(doc, resolver, table, columns.len());
    grid::adjust_column_widths(doc, resolver, table, &grid, &mut columns, printable_width);

    let table_borders = resolver.resolve::<TableBorders>(table).map(|b| b.0).unwrap_or_default();
    let resolved = borders::resolve_borders(resolver, &grid, &table_borders);

    let grid_cells = grid.cells();
    let margins: HashMap<usize, CellMargins> = grid_cells
        .iter()
        .map(|cell| (cell.cell_id, borders::effective_margins(resolver, cell, table)))
        .collect();
    let padding = borders::row_padding(&grid, &resolved, &margins);

    let cells = grid_cells
        .iter()
        .map(|cell| {
            let end = (cell.col + cell.col_span).min(columns.len());
            CellLayout {
                cell_id: cell.cell_id,
                node: cell.node,
                row: cell.row,
                col: cell.col,
                row_span: cell.row_span,
                col_span: cell.col_span,
                width: columns[cell.col.min(end)..end].iter().sum(),
                borders: resolved.get(&cell.cell_id).copied().unwrap_or_default(),
                margins: margins.get(&cell.cell_id).copied().unwrap_or_default(),
                fill: resolver
                    .resolve::<CellShading>(cell.node)
                    .and_then(|s| s.0.fill)
                    .and_then(|c| c.rgb()),
                v_align: resolver
                    .resolve::<CellAlignment>(cell.node)
                    .map_or(CellVAlign::Top, |a| a.0),
            }
        })
        .collect();

    let rows = (0..grid.row_count())
        .map(|row| {
            let (padding_top, padding_bottom) = padding[row];
            RowLayout {
                height: grid
                    .row_node(row)
                    .and_then(|n| resolver.resolve::<RowHeightRule>(n))
                    .map(|h| h.0),
                padding_top,
                padding_bottom,
            }
        })
        .collect();

    let indent = match resolver.resolve::<TableIndent>(table).map(|i| i.0) {
        Some(WidthSpec::Dxa(pt)) => pt,
        _ => 0.0,
    };

    log::debug!(
        "Table: {} columns, {} rows, {} cells",
        columns.len(),
        grid.row_count(),
        grid_cells.len()
    );

    TableLayout {
        column_widths: columns,
        alignment: resolver
            .resolve::<TableAlignment>(table)
            .map_or(Alignment::Left, |a| a.0),
        indent,
        rows,
        cells,
    }
}

/// Grid positions the widest row occupies, placeholders included.
/// Word's table column limit.
const MAX_INFERRED_COLUMNS: usize = 63;

/// Grid width implied by the widest row, capped at [`MAX_INFERRED_COLUMNS`].
fn widest_row(resolver: &StyleResolver<'_>, table: NodeId) -> usize {
    let doc = resolver.document();
    doc.children(table)
        .iter()
        .copied()
        .filter(|&n| matches!(doc.kind(n), NodeKind::TableRow))
        .map(|row| {
            let before = resolver.resolve::<GridBefore>(row).map_or(0, |g| g.0 as usize);
            let after = resolver.resolve::<GridAfter>(row).map_or(0, |g| g.0 as usize);
            let cells: usize = doc
                .children(row)
                .iter()
                .filter(|&&n| matches!(doc.kind(n), NodeKind::TableCell))
                .map(|&cell| resolver.resolve::<GridSpan>(cell).map_or(1, |s| s.0.max(1) as usize))
                .fold(0usize, usize::saturating_add);
            before.saturating_add(cells).saturating_add(after)
        })
        .max()
        .unwrap_or(0)
        .min(MAX_INFERRED_COLUMNS)
}
