use glam::Vec2;
use lifegrid_core::{CellCoord, GridLayout};

/// Mouse buttons held while the pointer event was observed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MouseButtons {
    /// Primary (left) button.
    pub primary: bool,
    /// Secondary (right) button.
    pub secondary: bool,
}

/// Pointer position in surface pixels together with the held buttons.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    /// Position relative to the top-left corner of the surface.
    pub position: Vec2,
    /// Buttons held at that position.
    pub buttons: MouseButtons,
}

/// Cell edit derived from pointer input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellEdit {
    /// Cell under the pointer.
    pub cell: CellCoord,
    /// State the cell should take.
    pub alive: bool,
}

/// Maps a pointer event onto the cell it paints.
///
/// The primary button alone paints alive and the secondary button alone
/// paints dead; any other combination paints nothing. Each cell owns the gap
/// to its right and below, so positions inside a gap resolve to the
/// preceding cell. Positions outside the grid yield `None`.
#[must_use]
pub fn translate_to_cell(pointer: &PointerEvent, layout: &GridLayout) -> Option<CellEdit> {
    let alive = match (pointer.buttons.primary, pointer.buttons.secondary) {
        (true, false) => true,
        (false, true) => false,
        _ => return None,
    };

    let pitch = layout.geometry().pitch() as f32;
    let column = axis_index(pointer.position.x - layout.offset_x(), pitch)?;
    let row = axis_index(pointer.position.y - layout.offset_y(), pitch)?;
    let cell = CellCoord::new(row, column);

    layout.size().contains(cell).then_some(CellEdit { cell, alive })
}

fn axis_index(distance: f32, pitch: f32) -> Option<u32> {
    if !distance.is_finite() || distance < 0.0 || pitch <= 0.0 {
        return None;
    }
    let index = (distance / pitch).floor();
    (index <= u32::MAX as f32).then_some(index as u32)
}
