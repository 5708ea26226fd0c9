use lifegrid_core::{CellCoord, Grid, GridError, Topology};

const OFFSETS: [(i64, i64); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Counts the alive cells among the eight neighbours of `cell`.
///
/// Under [`Topology::Wrapped`] coordinates leaving the grid re-enter from the
/// opposite edge; under [`Topology::Bounded`] they are ignored. On grids
/// narrower than three cells a wrapped neighbour may be visited more than once,
/// exactly as a torus of that size would count it.
pub fn count_alive_neighbors(
    grid: &Grid,
    cell: CellCoord,
    topology: Topology,
) -> Result<u8, GridError> {
    if !grid.size().contains(cell) {
        return Err(GridError::OutOfRange {
            row: cell.row(),
            column: cell.column(),
            width: grid.width(),
            height: grid.height(),
        });
    }

    Ok(count_in_range(grid, cell, topology))
}

/// Neighbour count for a coordinate already known to be inside `grid`.
pub(crate) fn count_in_range(grid: &Grid, cell: CellCoord, topology: Topology) -> u8 {
    let height = i64::from(grid.height());
    let width = i64::from(grid.width());
    let row = i64::from(cell.row());
    let column = i64::from(cell.column());

    let mut alive = 0;
    for (row_offset, column_offset) in OFFSETS {
        let neighbor = match topology {
            Topology::Wrapped => Some((
                (row + row_offset).rem_euclid(height),
                (column + column_offset).rem_euclid(width),
            )),
            Topology::Bounded => {
                let (r, c) = (row + row_offset, column + column_offset);
                ((0..height).contains(&r) && (0..width).contains(&c)).then_some((r, c))
            }
        };

        let Some((r, c)) = neighbor else {
            continue;
        };

        if grid.get(r as u32, c as u32).unwrap_or(false) {
            alive += 1;
        }
    }
    alive
}
