//! Border conflict resolution between adjacent cells.

use std::collections::HashMap;

use crate::cascade::{CellBorders, CellMargin, StyleResolver, TableCellMargins};
use crate::model::{Border, BorderSet, CellMargins, Color, Merge, NodeId};
use crate::units::brightness;

use super::grid::{GridCell, TableGrid};

/// Which sides of the table a cell touches.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CellPosition {
    pub first_row: bool,
    pub last_row: bool,
    pub first_col: bool,
    pub last_col: bool,
}

impl CellPosition {
    pub fn of(cell: &GridCell, grid: &TableGrid) -> Self {
        Self {
            first_row: cell.row == 0,
            last_row: cell.row + cell.row_span >= grid.row_count(),
            first_col: cell.col == 0 || cell.row_start,
            last_col: cell.col + cell.col_span >= grid.columns() || cell.row_end,
        }
    }
}

/// Borders of one cell before neighbour conflicts are settled. Each edge is
/// the cell's own definition if present; otherwise the table's outer edge
/// where the cell touches that side and the table's inside edge where it
/// does not. Diagonals only come from the cell.
pub fn apply_cell_borders(cell: &BorderSet, table: &BorderSet, pos: CellPosition) -> BorderSet {
    let edge = |own: Option<Border>, outer: Option<Border>, inside: Option<Border>, at_edge: bool| {
        own.or(if at_edge { outer } else { inside })
    };
    BorderSet {
        top: edge(cell.top, table.top, table.inside_h, pos.first_row),
        bottom: edge(cell.bottom, table.bottom, table.inside_h, pos.last_row),
        left: edge(cell.left, table.left, table.inside_v, pos.first_col),
        right: edge(cell.right, table.right, table.inside_v, pos.last_col),
        inside_h: None,
        inside_v: None,
        tl2br: cell.tl2br,
        tr2bl: cell.tr2bl,
    }
}

/// Whether `a` beats `b` on a shared edge: heavier style first, then the
/// wider line, then the darker colour. An undefined edge ranks below any
/// defined one. Ties go to `b`.
pub fn wins(a: Option<&Border>, b: Option<&Border>) -> bool {
    let rank = |border: Option<&Border>| {
        border.map_or((0, 0.0, 0.0), |bd| {
            let lightness = match bd.color {
                Some(Color::Rgb(rgb)) => brightness(rgb),
                Some(Color::Auto) | None => 0.0,
            };
            (bd.style.weight(), bd.width.unwrap_or(0.0), lightness)
        })
    };
    let (a_weight, a_width, a_light) = rank(a);
    let (b_weight, b_width, b_light) = rank(b);
    if a_weight != b_weight {
        return a_weight > b_weight;
    }
    if a_width != b_width {
        return a_width > b_width;
    }
    a_light < b_light
}

/// Fully resolved border sets keyed by cell id. Every shared edge is owned by
/// the cell to its right or below: the winning definition is written there
/// and the left or upper cell's copy is cleared.
pub fn resolve_borders(
    resolver: &StyleResolver<'_>,
    grid: &TableGrid,
    table_borders: &BorderSet,
) -> HashMap<usize, BorderSet> {
    let cells = grid.cells();
    let base: HashMap<usize, BorderSet> = cells
        .iter()
        .map(|cell| {
            let own = resolver.resolve::<CellBorders>(cell.node).map(|b| b.0).unwrap_or_default();
            let mut borders = apply_cell_borders(&own, table_borders, CellPosition::of(cell, grid));
            if cell.last_node != cell.node {
                // A vertically merged cell ends with its last row's bottom edge.
                let last = resolver
                    .resolve::<CellBorders>(cell.last_node)
                    .map(|b| b.0)
                    .unwrap_or_default();
                let last_pos = CellPosition {
                    first_row: false,
                    ..CellPosition::of(cell, grid)
                };
                borders.bottom = apply_cell_borders(&last, table_borders, last_pos).bottom;
            }
            (cell.cell_id, borders)
        })
        .collect();

    let mut resolved = base.clone();
    for cell in &cells {
        let me = &base[&cell.cell_id];

        let right_col = cell.col + cell.col_span;
        let rights = neighbours(
            (0..cell.row_span).map(|i| grid.cell_id_at(cell.row + i, right_col)),
            cell.cell_id,
        );
        for right in &rights {
            if wins(me.right.as_ref(), base[right].left.as_ref())
                && let Some(target) = resolved.get_mut(right)
            {
                target.left = me.right;
            }
        }
        if !rights.is_empty()
            && let Some(target) = resolved.get_mut(&cell.cell_id)
        {
            target.right = None;
        }

        let below_row = cell.row + cell.row_span;
        let belows = neighbours(
            (0..cell.col_span).map(|i| grid.cell_id_at(below_row, cell.col + i)),
            cell.cell_id,
        );
        for below in &belows {
            if wins(me.bottom.as_ref(), base[below].top.as_ref())
                && let Some(target) = resolved.get_mut(below)
            {
                target.top = me.bottom;
            }
        }
        if !belows.is_empty()
            && let Some(target) = resolved.get_mut(&cell.cell_id)
        {
            target.bottom = None;
        }
    }
    resolved
}

/// Distinct cell ids in order, excluding `own`.
fn neighbours(ids: impl Iterator<Item = Option<usize>>, own: usize) -> Vec<usize> {
    let mut out: Vec<usize> = Vec::new();
    for id in ids.flatten() {
        if id != own && !out.contains(&id) {
            out.push(id);
        }
    }
    out
}

/// Cell margins in effect: the cell's `tcMar`, then the table's
/// `tblCellMar`, per side.
pub fn effective_margins(resolver: &StyleResolver<'_>, cell: &GridCell, table: NodeId) -> CellMargins {
    let own = resolver.resolve::<CellMargin>(cell.node).map(|m| m.0).unwrap_or_default();
    let table_margins = resolver
        .resolve::<TableCellMargins>(table)
        .map(|m| m.0)
        .unwrap_or_default();
    own.merge(table_margins)
}

/// Vertical padding of each row: the largest top (and bottom) margin plus
/// drawn border width among the cells starting in that row.
pub fn row_padding(
    grid: &TableGrid,
    borders: &HashMap<usize, BorderSet>,
    margins: &HashMap<usize, CellMargins>,
) -> Vec<(f32, f32)> {
    let mut padding = vec![(0.0f32, 0.0f32); grid.row_count()];
    for cell in grid.cells() {
        let set = borders.get(&cell.cell_id).copied().unwrap_or_default();
        let margin = margins.get(&cell.cell_id).copied().unwrap_or_default();
        let top = margin.top.unwrap_or(0.0) + set.top.map_or(0.0, |b| b.drawn_width());
        let bottom = margin.bottom.unwrap_or(0.0) + set.bottom.map_or(0.0, |b| b.drawn_width());
        let entry = &mut padding[cell.row];
        entry.0 = entry.0.max(top);
        entry.1 = entry.1.max(bottom);
    }
    padding
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BorderStyle;

    fn single(width: f32) -> Border {
        Border::new(BorderStyle::Single, width, Some([0, 0, 0]))
    }

    #[test]
    fn heavier_style_wins_before_width() {
        let double = Border::new(BorderStyle::Double, 0.5, None);
        assert!(wins(Some(&double), Some(&single(3.0))));
        assert!(!wins(Some(&single(3.0)), Some(&double)));
    }

    #[test]
    fn wider_then_darker_wins() {
        assert!(wins(Some(&single(2.0)), Some(&single(1.0))));
        let grey = Border::new(BorderStyle::Single, 1.0, Some([128, 128, 128]));
        assert!(wins(Some(&single(1.0)), Some(&grey)));
        assert!(!wins(Some(&grey), Some(&single(1.0))));
    }

    #[test]
    fn ties_go_to_the_other_side() {
        assert!(!wins(Some(&single(1.0)), Some(&single(1.0))));
        assert!(!wins(None, None));
        assert!(wins(Some(&single(0.5)), None));
    }

    #[test]
    fn inside_edges_apply_away_from_the_table_boundary() {
        let table = BorderSet {
            top: Some(single(2.0)),
            inside_h: Some(single(0.5)),
            ..Default::default()
        };
        let interior = CellPosition::default();
        let edge = CellPosition {
            first_row: true,
            ..Default::default()
        };
        assert_eq!(apply_cell_borders(&BorderSet::default(), &table, interior).top, Some(single(0.5)));
        assert_eq!(apply_cell_borders(&BorderSet::default(), &table, edge).top, Some(single(2.0)));
        let own = BorderSet {
            top: Some(Border::new(BorderStyle::Nil, 0.0, None)),
            ..Default::default()
        };
        assert_eq!(
            apply_cell_borders(&own, &table, edge).top.map(|b| b.style),
            Some(BorderStyle::Nil)
        );
    }
}
