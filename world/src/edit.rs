//! Single-cell edit policy.

use lifegrid_core::{CellCoord, Grid, PlaybackState, Rejection};

/// Snapshot of the state that decides whether edits are allowed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct EditPermission {
    pub(crate) playback: PlaybackState,
    pub(crate) live_edit: bool,
}

impl EditPermission {
    pub(crate) const fn allows_edits(self) -> bool {
        matches!(self.playback, PlaybackState::Idle) || self.live_edit
    }
}

/// Result of an edit attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum EditOutcome {
    /// The cell now holds the requested state.
    Changed,
    /// The cell already held the requested state.
    Unchanged,
    /// Policy or bounds refused the edit; the grid is untouched.
    Rejected(Rejection),
}

/// Sets `cell` to `alive` when the permission allows it.
///
/// Out-of-range coordinates are refused rather than raised.
pub(crate) fn set_cell(
    grid: &mut Grid,
    permission: EditPermission,
    cell: CellCoord,
    alive: bool,
) -> EditOutcome {
    if !permission.allows_edits() {
        return EditOutcome::Rejected(Rejection::EditWhilePlaying);
    }

    match grid.is_alive(cell) {
        Err(_) => EditOutcome::Rejected(Rejection::CellOutOfRange { cell }),
        Ok(current) if current == alive => EditOutcome::Unchanged,
        Ok(_) => match grid.set(cell.row(), cell.column(), alive) {
            Ok(()) => EditOutcome::Changed,
            Err(_) => EditOutcome::Rejected(Rejection::CellOutOfRange { cell }),
        },
    }
}
