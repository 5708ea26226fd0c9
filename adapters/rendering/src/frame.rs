use glam::Vec2;
use lifegrid_core::{CellCoord, Grid, GridLayout, Renderer};

use crate::{Color, Palette};

/// Square drawn for a single cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellQuad {
    /// Top-left corner in pixels.
    pub origin: Vec2,
    /// Edge length in pixels.
    pub size: f32,
    /// Fill color.
    pub color: Color,
}

/// Backend-agnostic snapshot of the board, one quad per cell in row-major order.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Frame {
    /// Number of columns captured.
    pub columns: u32,
    /// Number of rows captured.
    pub rows: u32,
    /// Quads to draw.
    pub cells: Vec<CellQuad>,
}

impl Frame {
    /// Converts the grid into drawable quads positioned by the layout.
    #[must_use]
    pub fn capture(grid: &Grid, layout: &GridLayout, palette: &Palette) -> Self {
        let size = layout.geometry().cell_size() as f32;
        let width = grid.width();

        let cells = (0..grid.height())
            .zip(grid.rows())
            .flat_map(|(row, cells)| {
                (0..width).zip(cells).map(move |(column, alive)| {
                    let (x, y) = layout.cell_origin(CellCoord::new(row, column));
                    CellQuad {
                        origin: Vec2::new(x, y),
                        size,
                        color: if *alive {
                            palette.alive_cell
                        } else {
                            palette.dead_cell
                        },
                    }
                })
            })
            .collect();

        Self {
            columns: grid.width(),
            rows: grid.height(),
            cells,
        }
    }
}

/// [`Renderer`] that captures a [`Frame`] for a backend to present later.
#[derive(Debug, Default)]
pub struct FrameRenderer {
    palette: Palette,
    pending: Option<Frame>,
}

impl FrameRenderer {
    /// Creates a renderer that colors cells with `palette`.
    #[must_use]
    pub fn new(palette: Palette) -> Self {
        Self {
            palette,
            pending: None,
        }
    }

    /// Removes the latest captured frame, if a redraw happened since the last call.
    pub fn take_frame(&mut self) -> Option<Frame> {
        self.pending.take()
    }
}

impl Renderer for FrameRenderer {
    fn redraw(&mut self, grid: &Grid, layout: &GridLayout) {
        self.pending = Some(Frame::capture(grid, layout, &self.palette));
    }
}
