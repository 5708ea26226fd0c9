//! Translation of per-frame adapter input into session operations.

use lifegrid_core::{CellCoord, Renderer, Scheduler};
use lifegrid_rendering::{translate_to_cell, FrameInput, StatusLine};
use lifegrid_system_session::Session;
use tracing::{info, warn};

/// Applies everything the adapter observed during one frame.
///
/// Surface resizes are handled first so that pointer edits land on the grid
/// the user is looking at.
pub(crate) fn apply_input<S: Scheduler, R: Renderer>(
    session: &mut Session<S, R>,
    input: &FrameInput,
) {
    if let Some(viewport) = input.viewport.filter(|viewport| *viewport != session.viewport()) {
        if let Err(error) = session.change_viewport(viewport) {
            warn!(%error, "surface too small for a single cell; keeping the previous grid");
        }
    }

    if input.toggle_playback && !session.pause() {
        let _ = session.play();
    }
    if input.step {
        let _ = session.step();
    }
    if input.reset {
        let _ = session.reset();
    }
    if input.toggle_topology {
        let _ = session.change_topology(session.topology().toggled());
        info!(topology = ?session.topology(), "edge handling changed");
    }
    if input.toggle_live_edit {
        let _ = session.change_edit_permission(!session.live_edit());
        info!(live_edit = session.live_edit(), "edit permission changed");
    }
    if input.interval_steps != 0 {
        session.change_interval(session.interval().adjusted(input.interval_steps));
        info!(interval_ms = session.interval().as_millis(), "interval changed");
    }

    let geometry = session.layout().geometry();
    let adjusted = geometry.adjusted(input.cell_size_delta, input.cell_gap_delta);
    if adjusted != geometry {
        match session.change_geometry(adjusted) {
            Ok(()) => info!(
                cell_size = adjusted.cell_size(),
                cell_gap = adjusted.cell_gap(),
                "cell geometry changed"
            ),
            Err(error) => warn!(%error, "cell geometry does not fit the surface"),
        }
    }

    if let Some(edit) = input
        .pointer
        .and_then(|pointer| translate_to_cell(&pointer, session.layout()))
    {
        let _ = session.toggle_cell(edit.cell.row(), edit.cell.column(), edit.alive);
    }
}

/// Brings the seed cells to life, skipping those outside the current grid.
///
/// Seeds are lost whenever the grid is re-created, so callers plant them only
/// once the viewport has settled.
pub(crate) fn plant_seeds<S: Scheduler, R: Renderer>(
    session: &mut Session<S, R>,
    seeds: &[CellCoord],
) {
    for cell in seeds {
        if !session.grid().size().contains(*cell) {
            warn!(
                row = cell.row(),
                column = cell.column(),
                "seed cell lies outside the grid"
            );
            continue;
        }
        let _ = session.toggle_cell(cell.row(), cell.column(), true);
    }
}

/// Summarises the session for the on-screen guide.
pub(crate) fn status_of<S: Scheduler, R: Renderer>(session: &Session<S, R>) -> StatusLine {
    let geometry = session.layout().geometry();
    StatusLine {
        playback: session.playback_state(),
        generation: session.generation(),
        population: session.population(),
        interval_ms: session.interval().as_millis(),
        topology: session.topology(),
        live_edit: session.live_edit(),
        cell_size: geometry.cell_size(),
        cell_gap: geometry.cell_gap(),
    }
}
