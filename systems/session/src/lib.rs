#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Session facade that wires the world, playback and the collaborators.
//!
//! Every public operation queues commands, applies them to the world in
//! order, and notifies the [`Renderer`] once if the visible grid changed.
//! Operations that the world refuses by policy return `false`; the refusal is
//! still observable through [`Session::last_events`].

use std::time::Duration;

use lifegrid_core::{
    CellCoord, CellGeometry, Command, Event, GenerationInterval, Grid, GridError, GridLayout,
    PlaybackState, Renderer, Scheduler, SimulationConfig, StepSource, TimerHandle, Topology,
    Viewport,
};
use lifegrid_system_playback::{Playback, TickScheduler};
use lifegrid_world::{self as world, query, World};
use tracing::debug;

/// Interactive Game of Life session.
#[derive(Debug)]
pub struct Session<S, R> {
    world: World,
    playback: Playback<S>,
    renderer: R,
    viewport: Viewport,
    commands: Vec<Command>,
    events: Vec<Event>,
}

impl<S: Scheduler, R: Renderer> Session<S, R> {
    /// Creates an idle session with a dead grid fitted into `viewport`.
    ///
    /// The renderer is asked to draw the initial grid before this returns.
    pub fn new(
        config: &SimulationConfig,
        viewport: Viewport,
        scheduler: S,
        renderer: R,
    ) -> Result<Self, GridError> {
        let layout = GridLayout::fit(viewport, config.geometry)?;
        debug!(
            width = layout.size().width(),
            height = layout.size().height(),
            interval_ms = config.interval.as_millis(),
            "session created"
        );

        let mut session = Self {
            world: World::new(layout, config),
            playback: Playback::new(scheduler, config.interval),
            renderer,
            viewport,
            commands: Vec::new(),
            events: Vec::new(),
        };
        session.redraw();
        Ok(session)
    }

    /// Starts timer-driven stepping. Returns `false` when already playing.
    pub fn play(&mut self) -> bool {
        let started = self.playback.play(&mut self.commands);
        let _ = self.dispatch();
        started
    }

    /// Stops timer-driven stepping. Returns `false` when already idle.
    pub fn pause(&mut self) -> bool {
        let paused = self.playback.pause(&mut self.commands);
        let _ = self.dispatch();
        paused
    }

    /// Computes exactly one generation. Refused while playing.
    pub fn step(&mut self) -> bool {
        self.commands.push(Command::AdvanceGeneration {
            source: StepSource::Manual,
        });
        self.dispatch()
    }

    /// Clears every cell while keeping the dimensions. Refused while playing.
    pub fn reset(&mut self) -> bool {
        self.commands.push(Command::ResetGeneration);
        self.dispatch()
    }

    /// Sets the cell at (`row`, `column`) to `alive`.
    ///
    /// Returns `true` only when the cell actually changed. Edits outside the
    /// grid, edits that match the current state and edits while playing
    /// without live edit all return `false`.
    pub fn toggle_cell(&mut self, row: u32, column: u32, alive: bool) -> bool {
        self.commands.push(Command::SetCell {
            cell: CellCoord::new(row, column),
            alive,
        });
        self.dispatch()
    }

    /// Changes the step period, restarting the running timer if playing.
    pub fn change_interval(&mut self, interval: GenerationInterval) {
        self.events.clear();
        if self.playback.change_interval(interval) {
            debug!(interval_ms = interval.as_millis(), "interval changed while playing");
        }
    }

    /// Selects the topology used by subsequent steps. Returns `true` on change.
    pub fn change_topology(&mut self, topology: Topology) -> bool {
        self.commands.push(Command::SetTopology { topology });
        let _ = self.dispatch();
        self.last_events()
            .contains(&Event::TopologyChanged { topology })
    }

    /// Allows or forbids edits while playing. Returns `true` on change.
    pub fn change_edit_permission(&mut self, enabled: bool) -> bool {
        self.commands.push(Command::SetLiveEdit { enabled });
        let _ = self.dispatch();
        self.last_events()
            .contains(&Event::LiveEditChanged { enabled })
    }

    /// Re-creates a dead grid for the new cell geometry.
    ///
    /// Applies in any playback state; a running timer keeps stepping the new
    /// grid. Fails without touching the session when no cell fits.
    pub fn change_geometry(&mut self, geometry: CellGeometry) -> Result<(), GridError> {
        let layout = GridLayout::fit(self.viewport, geometry)?;
        self.configure(layout);
        Ok(())
    }

    /// Re-creates a dead grid for a resized display surface.
    pub fn change_viewport(&mut self, viewport: Viewport) -> Result<(), GridError> {
        let layout = GridLayout::fit(viewport, self.layout().geometry())?;
        self.viewport = viewport;
        self.configure(layout);
        Ok(())
    }

    /// Routes a timer firing into the session.
    ///
    /// Returns `true` when the tick advanced a generation; stale ticks are
    /// ignored.
    pub fn on_tick(&mut self, handle: TimerHandle) -> bool {
        if !self.playback.tick(handle, &mut self.commands) {
            return false;
        }
        self.dispatch()
    }

    /// The current generation.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        query::grid(&self.world)
    }

    /// Current playback state.
    #[must_use]
    pub fn playback_state(&self) -> PlaybackState {
        self.playback.state()
    }

    /// Layout of the current grid.
    #[must_use]
    pub fn layout(&self) -> &GridLayout {
        query::layout(&self.world)
    }

    /// Viewport the layout was fitted into.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Topology used by the next step.
    #[must_use]
    pub fn topology(&self) -> Topology {
        query::topology(&self.world)
    }

    /// Whether edits are allowed while playing.
    #[must_use]
    pub fn live_edit(&self) -> bool {
        query::live_edit(&self.world)
    }

    /// Step period used while playing.
    #[must_use]
    pub fn interval(&self) -> GenerationInterval {
        self.playback.interval()
    }

    /// Generations computed since the grid was last created or reset.
    #[must_use]
    pub fn generation(&self) -> u64 {
        query::generation(&self.world)
    }

    /// Number of alive cells.
    #[must_use]
    pub fn population(&self) -> usize {
        query::population(&self.world)
    }

    /// Timer currently driving generations, if playing.
    #[must_use]
    pub fn active_timer(&self) -> Option<TimerHandle> {
        self.playback.active_timer()
    }

    /// Events produced by the most recent operation.
    #[must_use]
    pub fn last_events(&self) -> &[Event] {
        &self.events
    }

    /// The scheduler backing playback.
    #[must_use]
    pub fn scheduler(&self) -> &S {
        self.playback.scheduler()
    }

    /// The renderer receiving redraw notifications.
    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Mutable access to the renderer.
    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    fn configure(&mut self, layout: GridLayout) {
        self.commands.push(Command::ConfigureLayout { layout });
        let _ = self.dispatch();
    }

    fn dispatch(&mut self) -> bool {
        self.events.clear();
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
        }

        let changed = self.events.iter().any(changes_grid);
        if changed {
            self.redraw();
        }
        changed
    }

    fn redraw(&mut self) {
        let grid = query::grid(&self.world);
        let layout = query::layout(&self.world);
        self.renderer.redraw(grid, layout);
    }
}

impl<R: Renderer> Session<TickScheduler, R> {
    /// Moves the virtual clock forward and runs every tick that came due.
    ///
    /// Ticks are processed one at a time in deadline order, each completing
    /// its step and redraw before the next. Returns the number of generations
    /// computed.
    pub fn advance(&mut self, elapsed: Duration) -> usize {
        let due = self.playback.scheduler_mut().advance(elapsed);
        due.into_iter()
            .filter(|handle| self.on_tick(*handle))
            .count()
    }
}

fn changes_grid(event: &Event) -> bool {
    matches!(
        event,
        Event::GridConfigured { .. }
            | Event::CellChanged { .. }
            | Event::GenerationAdvanced { .. }
            | Event::GenerationReset
    )
}
