use crate::constraint::{Fill, Gravity};
use crate::geometry::{Rect, Size};

use super::grid::GridState;
use super::placement::CellSpan;

/// Everything the cell resolver needs to know about one child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellGeometry {
    pub span: CellSpan,
    pub fill: Fill,
    pub gravity: Gravity,
    /// Preferred size with margin and border already folded in.
    pub preferred: Size,
    pub margin: u16,
    pub border_width: u16,
}

/// Track offsets along both axes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackOrigins {
    pub columns: Vec<u16>,
    pub rows: Vec<u16>,
}

impl TrackOrigins {
    pub fn of(grid: &GridState) -> Self {
        Self {
            columns: grid.columns.origins(),
            rows: grid.rows.origins(),
        }
    }

    fn cell_origin(&self, span: &CellSpan) -> (u16, u16) {
        (
            self.columns.get(span.column as usize).copied().unwrap_or(0),
            self.rows.get(span.row as usize).copied().unwrap_or(0),
        )
    }
}

/// Aggregate actual size of the tracks a span covers.
pub fn cell_size(grid: &GridState, span: &CellSpan) -> Size {
    Size::new(
        grid.columns
            .extent(span.column as usize, span.column_span as usize),
        grid.rows.extent(span.row as usize, span.row_span as usize),
    )
}

/// Final box of a child within its cell.
///
/// On an axis the child does not fill, a cell larger than the preferred size
/// shrinks to it and the spare space is split according to gravity. Margin
/// and border come off both sides; the result is never smaller than 1.
pub fn resolve_cell(cell: &CellGeometry, grid: &GridState, origins: &TrackOrigins) -> Rect {
    let available = cell_size(grid, &cell.span);
    let (origin_x, origin_y) = origins.cell_origin(&cell.span);

    let (dx, width) = fit_axis(
        available.width,
        cell.preferred.width,
        cell.fill.fills_width(),
        |excess| cell.gravity.horizontal_offset(excess),
    );
    let (dy, height) = fit_axis(
        available.height,
        cell.preferred.height,
        cell.fill.fills_height(),
        |excess| cell.gravity.vertical_offset(excess),
    );

    let inset = cell
        .border_width
        .saturating_add(cell.margin)
        .saturating_mul(2);

    Rect::new(
        origin_x.saturating_add(cell.margin).saturating_add(dx),
        origin_y.saturating_add(cell.margin).saturating_add(dy),
        width.saturating_sub(inset).max(1),
        height.saturating_sub(inset).max(1),
    )
}

fn fit_axis(cell: u16, preferred: u16, fills: bool, offset: impl Fn(u16) -> u16) -> (u16, u16) {
    if !fills && cell > preferred {
        (offset(cell - preferred), preferred)
    } else {
        (0, cell)
    }
}
