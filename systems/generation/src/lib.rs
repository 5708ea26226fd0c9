#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure generation system implementing the B3/S23 transition rule.
//!
//! The system never mutates the grid it reads from. [`step`] allocates the
//! successor, while [`step_into`] writes into a caller-owned buffer so the
//! world can keep two grids and swap them after each generation.

mod neighbors;

use lifegrid_core::{CellCoord, Grid, Topology};

pub use neighbors::count_alive_neighbors;

/// Decides whether a cell is alive in the next generation.
///
/// Alive cells survive with two or three alive neighbours; dead cells are
/// born with exactly three.
#[must_use]
pub const fn next_alive(alive: bool, neighbors: u8) -> bool {
    matches!((alive, neighbors), (true, 2 | 3) | (false, 3))
}

/// Computes the successor of `grid` under the provided topology.
#[must_use]
pub fn step(grid: &Grid, topology: Topology) -> Grid {
    let mut next = Grid::with_size(grid.size());
    step_into(grid, topology, &mut next);
    next
}

/// Writes the successor of `current` into `next`.
///
/// `next` is resized to match `current` when the dimensions differ. Every
/// cell of `next` is overwritten, so its previous contents never leak into
/// the result.
pub fn step_into(current: &Grid, topology: Topology, next: &mut Grid) {
    if next.size() != current.size() {
        *next = Grid::with_size(current.size());
    }

    for row in 0..current.height() {
        for column in 0..current.width() {
            let cell = CellCoord::new(row, column);
            let alive = current.get(row, column).unwrap_or(false);
            let neighbors = neighbors::count_in_range(current, cell, topology);
            // Both grids share `current`'s dimensions.
            let _ = next.set(row, column, next_alive(alive, neighbors));
        }
    }
}
