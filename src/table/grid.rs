//! Logical grid reconstruction and column width adjustment.

use crate::cascade::{
    CellWidth, GridAfter, GridBefore, GridSpan, StyleResolver, TableWidth, WidthAfter, WidthBefore,
};
use crate::model::{Document, NodeId, NodeKind, VMerge, WidthSpec};

/// One grid position. Positions sharing `cell_id` belong to one merged cell;
/// `cell` is `None` for `gridBefore`/`gridAfter` placeholders.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridSlot {
    pub cell_id: usize,
    pub cell: Option<NodeId>,
}

impl GridSlot {
    pub fn is_blank(&self) -> bool {
        self.cell.is_none()
    }
}

/// A logical (possibly merged) cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridCell {
    pub cell_id: usize,
    pub row: usize,
    pub col: usize,
    pub row_span: usize,
    pub col_span: usize,
    /// The `w:tc` that starts the cell.
    pub node: NodeId,
    /// The `w:tc` in the cell's last row (differs from `node` when
    /// vertically merged).
    pub last_node: NodeId,
    /// First real cell of its row (after any `gridBefore` placeholders).
    pub row_start: bool,
    /// Last real cell of its row (before any `gridAfter` placeholders).
    pub row_end: bool,
}

#[derive(Clone, Debug)]
pub struct TableGrid {
    columns: usize,
    rows: Vec<NodeId>,
    /// Row-major, `rows.len() * columns`; `None` where a short row ends.
    slots: Vec<Option<GridSlot>>,
    row_bounds: Vec<Option<(usize, usize)>>,
}

impl TableGrid {
    /// Walk the rows of `table` and assign cell ids. `columns` is the grid
    /// width; cells beyond it are dropped.
    pub fn build(doc: &Document, resolver: &StyleResolver<'_>, table: NodeId, columns: usize) -> Self {
        let rows: Vec<NodeId> = doc
            .children(table)
            .iter()
            .copied()
            .filter(|&n| matches!(doc.kind(n), NodeKind::TableRow))
            .collect();
        let mut grid = TableGrid {
            columns,
            slots: vec![None; rows.len() * columns],
            row_bounds: vec![None; rows.len()],
            rows,
        };

        let mut next_id = 0usize;
        for row_idx in 0..grid.rows.len() {
            let row = grid.rows[row_idx];
            let mut col = 0usize;
            let mut first_real: Option<usize> = None;
            let mut last_real: Option<usize> = None;

            let before = resolver
                .resolve::<GridBefore>(row)
                .map_or(0, |g| (g.0 as usize).min(columns));
            if before > 0 {
                for _ in 0..before {
                    grid.place(row_idx, col, GridSlot { cell_id: next_id, cell: None });
                    col += 1;
                }
                next_id += 1;
            }

            let cells: Vec<NodeId> = doc
                .children(row)
                .iter()
                .copied()
                .filter(|&n| matches!(doc.kind(n), NodeKind::TableCell))
                .collect();
            for cell in cells {
                let span = resolver.resolve::<GridSpan>(cell).map_or(1, |s| s.0.max(1) as usize);
                let id = match doc.props(cell).cell.v_merge {
                    Some(VMerge::Continue) => match grid.slot_above(row_idx, col) {
                        Some(id) => id,
                        None => {
                            log::warn!("vMerge continue at row {row_idx} column {col} has no cell above");
                            next_id
                        }
                    },
                    Some(VMerge::Restart) | None => next_id,
                };
                if col >= columns {
                    log::warn!("Row {row_idx} has more cells than the {columns}-column grid");
                }
                if first_real.is_none() && col < columns {
                    first_real = Some(col);
                }
                if col < columns {
                    last_real = Some(col);
                }
                for placed in 0..span.min(columns.saturating_sub(col)) {
                    grid.place(row_idx, col + placed, GridSlot { cell_id: id, cell: Some(cell) });
                }
                col = col.saturating_add(span);
                if id == next_id {
                    next_id += 1;
                }
            }

            let after = resolver.resolve::<GridAfter>(row).map_or(0, |g| g.0 as usize);
            if after > 0 && col < columns {
                for _ in 0..after.min(columns - col) {
                    grid.place(row_idx, col, GridSlot { cell_id: next_id, cell: None });
                    col += 1;
                }
                next_id += 1;
            }

            grid.row_bounds[row_idx] = first_real.zip(last_real);
        }
        grid
    }

    fn place(&mut self, row: usize, col: usize, slot: GridSlot) {
        if col < self.columns {
            self.slots[row * self.columns + col] = Some(slot);
        }
    }

    fn slot_above(&self, row: usize, col: usize) -> Option<usize> {
        let above = self.slot(row.checked_sub(1)?, col)?;
        (!above.is_blank()).then_some(above.cell_id)
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn row_node(&self, row: usize) -> Option<NodeId> {
        self.rows.get(row).copied()
    }

    pub fn slot(&self, row: usize, col: usize) -> Option<GridSlot> {
        if col >= self.columns {
            return None;
        }
        self.slots.get(row * self.columns + col).copied().flatten()
    }

    /// Non-blank cell id at a grid position.
    pub fn cell_id_at(&self, row: usize, col: usize) -> Option<usize> {
        self.slot(row, col).filter(|s| !s.is_blank()).map(|s| s.cell_id)
    }

    pub fn col_span(&self, row: usize, col: usize) -> usize {
        let Some(id) = self.slot(row, col).map(|s| s.cell_id) else {
            return 0;
        };
        (col..self.columns)
            .take_while(|&c| self.slot(row, c).is_some_and(|s| s.cell_id == id))
            .count()
    }

    pub fn row_span(&self, row: usize, col: usize) -> usize {
        let Some(id) = self.slot(row, col).map(|s| s.cell_id) else {
            return 0;
        };
        (row..self.rows.len())
            .take_while(|&r| self.slot(r, col).is_some_and(|s| s.cell_id == id))
            .count()
    }

    /// Logical cells ordered by cell id; placeholders excluded.
    pub fn cells(&self) -> Vec<GridCell> {
        let mut seen = std::collections::HashSet::new();
        let mut out = Vec::new();
        for row in 0..self.rows.len() {
            for col in 0..self.columns {
                let Some(slot) = self.slot(row, col) else {
                    continue;
                };
                let Some(node) = slot.cell else {
                    continue;
                };
                if !seen.insert(slot.cell_id) {
                    continue;
                }
                let row_span = self.row_span(row, col);
                let last_node = self
                    .slot(row + row_span - 1, col)
                    .and_then(|s| s.cell)
                    .unwrap_or(node);
                let bounds = self.row_bounds[row];
                out.push(GridCell {
                    cell_id: slot.cell_id,
                    row,
                    col,
                    row_span,
                    col_span: self.col_span(row, col),
                    node,
                    last_node,
                    row_start: bounds.is_some_and(|(first, _)| first == col),
                    row_end: bounds.is_some_and(|(_, last)| last == col),
                });
            }
        }
        out.sort_by_key(|c| c.cell_id);
        out
    }

    /// Logical cells whose first row is `row`.
    pub fn cells_in_row(&self, row: usize) -> Vec<GridCell> {
        self.cells().into_iter().filter(|c| c.row == row).collect()
    }
}

/// Declared column widths: `w:tblGrid`, else the first row's percentage
/// cell widths applied to a percentage table width. `None` when neither
/// source gives a width for every column.
pub fn declared_columns(
    doc: &Document,
    resolver: &StyleResolver<'_>,
    table: NodeId,
    printable_width: f32,
) -> Option<Vec<f32>> {
    if let NodeKind::Table { grid: Some(grid) } = doc.kind(table) {
        return Some(grid.clone());
    }
    let total = match resolver.resolve::<TableWidth>(table)?.0 {
        WidthSpec::Pct(pct) => printable_width * pct,
        _ => return None,
    };
    let first_row = doc
        .children(table)
        .iter()
        .copied()
        .find(|&n| matches!(doc.kind(n), NodeKind::TableRow))?;
    doc.children(first_row)
        .iter()
        .filter(|&&n| matches!(doc.kind(n), NodeKind::TableCell))
        .map(|&cell| match doc.props(cell).cell.width {
            Some(WidthSpec::Pct(pct)) => Some(total * pct),
            _ => None,
        })
        .collect()
}

/// Scale `columns` down (never up) so they sum to `total`.
pub fn scale_columns(columns: &mut [f32], total: f32) {
    let sum: f32 = columns.iter().sum();
    if sum <= total || sum <= 0.0 {
        return;
    }
    let ratio = total / sum;
    for width in columns.iter_mut() {
        *width *= ratio;
    }
}

/// Widen columns where a row's declared widths (`wBefore`, `tcW`,
/// `wAfter`) need more room than the grid gives them. Any shortfall goes to
/// the last column the item spans. A fixed table width (`tblW` dxa/pct)
/// scales the result back down after every row.
pub fn adjust_column_widths(
    doc: &Document,
    resolver: &StyleResolver<'_>,
    table: NodeId,
    grid: &TableGrid,
    columns: &mut [f32],
    printable_width: f32,
) {
    let fixed_total = match resolver.resolve::<TableWidth>(table).map(|w| w.0) {
        Some(WidthSpec::Dxa(w)) => Some(w),
        Some(WidthSpec::Pct(pct)) => Some(printable_width * pct),
        _ => None,
    };
    let mut total = match fixed_total {
        Some(total) => {
            scale_columns(columns, total);
            total
        }
        None => columns.iter().sum(),
    };

    for row_idx in 0..grid.row_count() {
        let Some(row) = grid.row_node(row_idx) else {
            continue;
        };
        let mut col = 0usize;

        let before = resolver.resolve::<GridBefore>(row).map_or(0, |g| g.0 as usize);
        let before_width = resolver.resolve::<WidthBefore>(row).map(|w| w.0);
        if before > 0 {
            let required = required_width(before_width, total);
            widen(columns, col, before, required);
            col = col.saturating_add(before);
        }

        let cells: Vec<NodeId> = doc
            .children(row)
            .iter()
            .copied()
            .filter(|&n| matches!(doc.kind(n), NodeKind::TableCell))
            .collect();
        for cell in cells {
            let span = resolver.resolve::<GridSpan>(cell).map_or(1, |s| s.0.max(1) as usize);
            let required = required_width(resolver.resolve::<CellWidth>(cell).map(|w| w.0), total);
            widen(columns, col, span, required);
            col = col.saturating_add(span);
        }

        let after = resolver.resolve::<GridAfter>(row).map_or(0, |g| g.0 as usize);
        if after > 0 && col < columns.len() {
            let required = required_width(resolver.resolve::<WidthAfter>(row).map(|w| w.0), total);
            widen(columns, col, after, required);
        }

        match fixed_total {
            Some(fixed) => scale_columns(columns, fixed),
            None => total = columns.iter().sum(),
        }
    }
}

fn required_width(width: Option<WidthSpec>, total: f32) -> f32 {
    match width {
        Some(WidthSpec::Dxa(w)) => w,
        Some(WidthSpec::Pct(pct)) => pct * total,
        Some(WidthSpec::Auto | WidthSpec::Nil) | None => 0.0,
    }
}

/// Add to the last of `span` columns starting at `start` whatever `required`
/// exceeds their current sum. Spans past the grid are clamped.
fn widen(columns: &mut [f32], start: usize, span: usize, required: f32) {
    if start >= columns.len() || span == 0 {
        return;
    }
    let end = start.saturating_add(span).min(columns.len());
    let available: f32 = columns[start..end].iter().sum();
    let shortfall = required - available;
    if shortfall > 0.0 {
        columns[end - 1] += shortfall;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaling_only_shrinks() {
        let mut cols = vec![100.0, 300.0];
        scale_columns(&mut cols, 200.0);
        assert_eq!(cols, vec![50.0, 150.0]);
        scale_columns(&mut cols, 1000.0);
        assert_eq!(cols, vec![50.0, 150.0]);
    }

    #[test]
    fn shortfall_goes_to_last_spanned_column() {
        let mut cols = vec![10.0, 10.0, 10.0];
        widen(&mut cols, 0, 2, 50.0);
        assert_eq!(cols, vec![10.0, 40.0, 10.0]);
        widen(&mut cols, 2, 5, 25.0);
        assert_eq!(cols, vec![10.0, 40.0, 25.0]);
    }
}
