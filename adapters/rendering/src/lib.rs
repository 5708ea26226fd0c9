#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Lifegrid adapters.

mod frame;
mod hud;
mod pointer;

use std::{ops::Range, time::Duration};

use anyhow::Result as AnyResult;
use lifegrid_core::Viewport;

pub use frame::{CellQuad, Frame, FrameRenderer};
pub use hud::{StatusLine, KEY_GUIDE};
pub use pointer::{translate_to_cell, CellEdit, MouseButtons, PointerEvent};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Parses a CSS-style `#rgb` or `#rrggbb` color.
    pub fn from_hex(value: &str) -> Result<Self, RenderingError> {
        let invalid = || RenderingError::InvalidColor {
            value: value.to_owned(),
        };
        let digits = value.strip_prefix('#').ok_or_else(invalid)?;
        if !digits.bytes().all(|byte| byte.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel =
            |range: Range<usize>| u8::from_str_radix(&digits[range], 16).map_err(|_| invalid());

        match digits.len() {
            3 => Ok(Self::from_rgb_u8(
                channel(0..1)? * 17,
                channel(1..2)? * 17,
                channel(2..3)? * 17,
            )),
            6 => Ok(Self::from_rgb_u8(
                channel(0..2)?,
                channel(2..4)?,
                channel(4..6)?,
            )),
            _ => Err(invalid()),
        }
    }
}

/// Colors used to draw the board.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    /// Fill behind the grid, visible through the cell gaps.
    pub background: Color,
    /// Fill of dead cells.
    pub dead_cell: Color,
    /// Fill of alive cells.
    pub alive_cell: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Color::from_rgb_u8(0x44, 0x44, 0x44),
            dead_cell: Color::from_rgb_u8(0x22, 0x22, 0x22),
            alive_cell: Color::from_rgb_u8(0xff, 0xdd, 0x00),
        }
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// `Enter`: switch between playing and idle.
    pub toggle_playback: bool,
    /// `Space`: compute a single generation.
    pub step: bool,
    /// `R`: clear the grid.
    pub reset: bool,
    /// `L`: switch between wrapped and bounded edges.
    pub toggle_topology: bool,
    /// `E`: allow or forbid edits while playing.
    pub toggle_live_edit: bool,
    /// Interval increments requested this frame (`Up` is positive).
    pub interval_steps: i32,
    /// Cell size change in pixels requested this frame.
    pub cell_size_delta: i32,
    /// Cell gap change in pixels requested this frame.
    pub cell_gap_delta: i32,
    /// Pointer state while a button is held.
    pub pointer: Option<PointerEvent>,
    /// Current size of the drawing surface.
    pub viewport: Option<Viewport>,
}

/// Everything a backend draws on a frame.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Scene {
    /// Most recent snapshot of the board.
    pub frame: Frame,
    /// Summary of the session shown with the key guide.
    pub status: StatusLine,
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Initial size of the window.
    pub viewport: Viewport,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, viewport: Viewport, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            viewport,
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Lifegrid scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the real frame delta and
    /// the input captured by the adapter, and refreshes the scene before it
    /// is drawn.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RenderingError {
    /// A color string was not in `#rgb` or `#rrggbb` form.
    #[error("`{value}` is not a #rgb or #rrggbb color")]
    InvalidColor {
        /// Text that failed to parse.
        value: String,
    },
}
