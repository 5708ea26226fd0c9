//! Geometry that maps a pixel viewport onto grid dimensions.

use std::ops::RangeInclusive;

use crate::{CellCoord, GridError, GridSize};

/// Accepted cell edge lengths in pixels.
pub const CELL_SIZE_RANGE: RangeInclusive<u32> = 10..=50;

/// Accepted gaps between neighbouring cells in pixels.
pub const CELL_GAP_RANGE: RangeInclusive<u32> = 1..=10;

/// Pixel extent of the surface the grid is laid out on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Viewport {
    width: u32,
    height: u32,
}

impl Viewport {
    /// Creates a viewport of the provided pixel dimensions.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }
}

/// Size of a drawn cell and the gap separating neighbouring cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellGeometry {
    cell_size: u32,
    cell_gap: u32,
}

impl CellGeometry {
    /// Creates a geometry descriptor. Values are not range checked.
    #[must_use]
    pub const fn new(cell_size: u32, cell_gap: u32) -> Self {
        Self {
            cell_size,
            cell_gap,
        }
    }

    /// Edge length of a cell in pixels.
    #[must_use]
    pub const fn cell_size(&self) -> u32 {
        self.cell_size
    }

    /// Gap between cells in pixels.
    #[must_use]
    pub const fn cell_gap(&self) -> u32 {
        self.cell_gap
    }

    /// Distance between the origins of two adjacent cells.
    #[must_use]
    pub const fn pitch(&self) -> u32 {
        self.cell_size.saturating_add(self.cell_gap)
    }

    /// Returns a copy nudged by the provided deltas, clamped to the accepted ranges.
    #[must_use]
    pub fn adjusted(self, size_delta: i32, gap_delta: i32) -> Self {
        Self {
            cell_size: nudge(self.cell_size, size_delta, &CELL_SIZE_RANGE),
            cell_gap: nudge(self.cell_gap, gap_delta, &CELL_GAP_RANGE),
        }
    }
}

impl Default for CellGeometry {
    fn default() -> Self {
        Self::new(20, 1)
    }
}

fn nudge(value: u32, delta: i32, range: &RangeInclusive<u32>) -> u32 {
    let moved = i64::from(value) + i64::from(delta);
    let clamped = moved.clamp(i64::from(*range.start()), i64::from(*range.end()));
    u32::try_from(clamped).unwrap_or(*range.start())
}

/// Grid dimensions fitted into a viewport, together with the centring offset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridLayout {
    size: GridSize,
    geometry: CellGeometry,
    offset_x: f32,
    offset_y: f32,
}

impl GridLayout {
    /// Fits as many whole cells as possible into the viewport.
    ///
    /// The grid is centred so the leftover space, plus one trailing gap, is
    /// split evenly on both sides. Fails with
    /// [`GridError::InvalidDimension`] when not a single row or column fits.
    pub fn fit(viewport: Viewport, geometry: CellGeometry) -> Result<Self, GridError> {
        let pitch = geometry.pitch();
        if pitch == 0 {
            return Err(GridError::InvalidDimension {
                width: 0,
                height: 0,
            });
        }

        let gap = geometry.cell_gap();
        let columns = viewport.width().saturating_sub(gap) / pitch;
        let rows = viewport.height().saturating_sub(gap) / pitch;
        let size = GridSize::new(columns, rows)?;

        Ok(Self {
            size,
            geometry,
            offset_x: centring_offset(viewport.width(), columns, pitch, gap),
            offset_y: centring_offset(viewport.height(), rows, pitch, gap),
        })
    }

    /// Grid dimensions derived from the viewport.
    #[must_use]
    pub const fn size(&self) -> GridSize {
        self.size
    }

    /// Geometry used to derive the layout.
    #[must_use]
    pub const fn geometry(&self) -> CellGeometry {
        self.geometry
    }

    /// Horizontal pixel offset of the first column.
    #[must_use]
    pub const fn offset_x(&self) -> f32 {
        self.offset_x
    }

    /// Vertical pixel offset of the first row.
    #[must_use]
    pub const fn offset_y(&self) -> f32 {
        self.offset_y
    }

    /// Top-left pixel position of the provided cell.
    #[must_use]
    pub fn cell_origin(&self, cell: CellCoord) -> (f32, f32) {
        let pitch = self.geometry.pitch() as f32;
        (
            self.offset_x + cell.column() as f32 * pitch,
            self.offset_y + cell.row() as f32 * pitch,
        )
    }
}

fn centring_offset(extent: u32, cells: u32, pitch: u32, gap: u32) -> f32 {
    let used = u64::from(cells) * u64::from(pitch);
    (extent as f32 - used as f32 + gap as f32) / 2.0
}
