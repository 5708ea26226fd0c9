//! Windowless runs on the virtual clock, printing the final board as text.

use std::fmt;

use anyhow::{Context, Result};
use lifegrid_core::{CellCoord, Grid, GridLayout, Renderer, Viewport};
use lifegrid_system_playback::TickScheduler;
use lifegrid_system_session::Session;
use tracing::{info, trace};

use crate::{config::Settings, controls::plant_seeds};

const ALIVE: char = '#';
const DEAD: char = '.';

/// Renderer that keeps a textual snapshot of the latest grid.
#[derive(Debug, Default)]
pub(crate) struct TextRenderer {
    snapshot: String,
}

impl TextRenderer {
    fn snapshot(&self) -> &str {
        &self.snapshot
    }
}

impl Renderer for TextRenderer {
    fn redraw(&mut self, grid: &Grid, _layout: &GridLayout) {
        self.snapshot.clear();
        for row in grid.rows() {
            self.snapshot
                .extend(row.iter().map(|alive| if *alive { ALIVE } else { DEAD }));
            self.snapshot.push('\n');
        }
    }
}

/// Outcome of a headless run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct HeadlessReport {
    pub(crate) generation: u64,
    pub(crate) population: usize,
    pub(crate) board: String,
}

impl fmt::Display for HeadlessReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "generation {} | population {}",
            self.generation, self.population
        )?;
        f.write_str(&self.board)
    }
}

/// Seeds `alive`, plays for `generations` timer periods and reports the final board.
pub(crate) fn run(
    settings: &Settings,
    viewport: Viewport,
    alive: &[CellCoord],
    generations: u64,
) -> Result<HeadlessReport> {
    let mut session = Session::new(
        &settings.simulation,
        viewport,
        TickScheduler::new(),
        TextRenderer::default(),
    )
    .context("viewport is too small for a single cell")?;
    info!(
        width = session.grid().width(),
        height = session.grid().height(),
        generations,
        "starting headless run"
    );

    plant_seeds(&mut session, alive);

    let period = session.interval().duration();
    let _ = session.play();
    while session.generation() < generations {
        if session.advance(period) == 0 {
            break;
        }
        trace!(
            generation = session.generation(),
            population = session.population(),
            "tick"
        );
    }
    let _ = session.pause();

    info!(
        generation = session.generation(),
        population = session.population(),
        "headless run finished"
    );
    Ok(HeadlessReport {
        generation: session.generation(),
        population: session.population(),
        board: session.renderer().snapshot().to_owned(),
    })
}
