//! Dense cell buffer owned by the authoritative world.

use crate::{CellCoord, GridError};

/// Dimensions of a [`Grid`] measured in whole cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridSize {
    columns: u32,
    rows: u32,
}

impl GridSize {
    /// Validates and creates a grid size with `width` columns and `height` rows.
    ///
    /// Both dimensions must be positive and the total cell count must be
    /// addressable on the host platform.
    pub fn new(width: u32, height: u32) -> Result<Self, GridError> {
        let invalid = GridError::InvalidDimension { width, height };
        if width == 0 || height == 0 {
            return Err(invalid);
        }

        let cells = u64::from(width) * u64::from(height);
        if usize::try_from(cells).is_err() {
            return Err(invalid);
        }

        Ok(Self {
            columns: width,
            rows: height,
        })
    }

    /// Number of columns (`x` extent).
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.columns
    }

    /// Number of rows (`y` extent).
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.rows
    }

    /// Total number of cells covered by the size.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        // Validated in `new`.
        (self.columns as usize) * (self.rows as usize)
    }

    /// Reports whether the coordinate lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.row() < self.rows && cell.column() < self.columns
    }
}

/// Row-major buffer of alive flags.
///
/// Every accessor validates its coordinate; there is no way to resize a grid
/// in place. A grid of different dimensions is always a freshly created,
/// fully dead grid.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Grid {
    size: GridSize,
    cells: Vec<bool>,
}

impl Grid {
    /// Creates a fully dead grid with `width` columns and `height` rows.
    pub fn create(width: u32, height: u32) -> Result<Self, GridError> {
        GridSize::new(width, height).map(Self::with_size)
    }

    /// Creates a fully dead grid from an already validated size.
    #[must_use]
    pub fn with_size(size: GridSize) -> Self {
        Self {
            size,
            cells: vec![false; size.cell_count()],
        }
    }

    /// Dimensions of the grid.
    #[must_use]
    pub const fn size(&self) -> GridSize {
        self.size
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.size.width()
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.size.height()
    }

    /// Reads the cell at `row`, `column`.
    pub fn get(&self, row: u32, column: u32) -> Result<bool, GridError> {
        let index = self.index(row, column)?;
        Ok(self.cells[index])
    }

    /// Writes the cell at `row`, `column`, touching no other cell.
    pub fn set(&mut self, row: u32, column: u32, alive: bool) -> Result<(), GridError> {
        let index = self.index(row, column)?;
        self.cells[index] = alive;
        Ok(())
    }

    /// Reads the cell addressed by a coordinate pair.
    pub fn is_alive(&self, cell: CellCoord) -> Result<bool, GridError> {
        self.get(cell.row(), cell.column())
    }

    /// Marks every cell dead.
    pub fn clear(&mut self) {
        self.cells.fill(false);
    }

    /// Number of alive cells.
    #[must_use]
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|alive| **alive).count()
    }

    /// Iterates over the rows of the grid from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> {
        self.cells.chunks(self.size.width() as usize)
    }

    /// Iterates over the alive cells in row-major order.
    pub fn alive_cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        let width = self.size.width() as usize;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, alive)| **alive)
            .map(move |(index, _)| CellCoord::new((index / width) as u32, (index % width) as u32))
    }

    fn index(&self, row: u32, column: u32) -> Result<usize, GridError> {
        if row < self.size.height() && column < self.size.width() {
            Ok(row as usize * self.size.width() as usize + column as usize)
        } else {
            Err(GridError::OutOfRange {
                row,
                column,
                width: self.size.width(),
                height: self.size.height(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_rejects_zero_dimensions() {
        assert_eq!(
            Grid::create(0, 4),
            Err(GridError::InvalidDimension {
                width: 0,
                height: 4
            })
        );
        assert_eq!(
            Grid::create(4, 0),
            Err(GridError::InvalidDimension {
                width: 4,
                height: 0
            })
        );
    }

    #[test]
    fn created_grid_is_fully_dead() {
        let grid = Grid::create(7, 3).expect("valid dimensions");
        assert_eq!(grid.width(), 7);
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.population(), 0);
        assert_eq!(grid.rows().count(), 3);
        assert!(grid.rows().all(|row| row.len() == 7));
    }

    #[test]
    fn set_touches_only_the_addressed_cell() {
        let mut grid = Grid::create(3, 3).expect("valid dimensions");
        grid.set(1, 2, true).expect("in range");

        assert_eq!(grid.get(1, 2), Ok(true));
        assert_eq!(grid.population(), 1);
        assert_eq!(
            grid.alive_cells().collect::<Vec<_>>(),
            vec![CellCoord::new(1, 2)]
        );
    }

    #[test]
    fn accessors_report_out_of_range_instead_of_clamping() {
        let mut grid = Grid::create(4, 2).expect("valid dimensions");
        let expected = GridError::OutOfRange {
            row: 2,
            column: 0,
            width: 4,
            height: 2,
        };

        assert_eq!(grid.get(2, 0), Err(expected));
        assert_eq!(grid.set(2, 0, true), Err(expected));
        assert!(grid.get(0, 4).is_err());
        assert_eq!(grid.population(), 0);
    }

    #[test]
    fn clear_kills_every_cell() {
        let mut grid = Grid::create(2, 2).expect("valid dimensions");
        grid.set(0, 0, true).expect("in range");
        grid.set(1, 1, true).expect("in range");
        grid.clear();
        assert_eq!(grid.population(), 0);
    }
}
