#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative simulation state for Lifegrid.
//!
//! The world owns the current generation, the scratch buffer the next
//! generation is computed into, and the policy flags that decide which
//! commands are honoured. It is only ever mutated through [`apply`].

mod edit;

use lifegrid_core::{
    Command, Event, Grid, GridLayout, PlaybackState, Rejection, SimulationConfig, StepSource,
    Topology,
};
use lifegrid_system_generation as generation;
use tracing::{debug, trace};

use self::edit::{EditOutcome, EditPermission};

/// Represents the authoritative Lifegrid session state.
#[derive(Debug)]
pub struct World {
    layout: GridLayout,
    current: Grid,
    scratch: Grid,
    topology: Topology,
    live_edit: bool,
    playback: PlaybackState,
    generation: u64,
}

impl World {
    /// Creates an idle world holding a fully dead grid sized by `layout`.
    #[must_use]
    pub fn new(layout: GridLayout, config: &SimulationConfig) -> Self {
        let current = Grid::with_size(layout.size());
        Self {
            layout,
            scratch: current.clone(),
            current,
            topology: config.topology,
            live_edit: config.live_edit,
            playback: PlaybackState::Idle,
            generation: 0,
        }
    }

    fn edit_permission(&self) -> EditPermission {
        EditPermission {
            playback: self.playback,
            live_edit: self.live_edit,
        }
    }

    fn advance(&mut self, out_events: &mut Vec<Event>) {
        generation::step_into(&self.current, self.topology, &mut self.scratch);
        std::mem::swap(&mut self.current, &mut self.scratch);
        self.generation = self.generation.saturating_add(1);

        let population = self.current.population();
        trace!(generation = self.generation, population, "generation advanced");
        out_events.push(Event::GenerationAdvanced {
            generation: self.generation,
            population,
        });
    }

    fn reject(reason: Rejection, out_events: &mut Vec<Event>) {
        debug!(?reason, "command rejected");
        out_events.push(Event::CommandRejected { reason });
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureLayout { layout } => {
            let size = layout.size();
            world.layout = layout;
            world.current = Grid::with_size(size);
            world.scratch = Grid::with_size(size);
            world.generation = 0;
            debug!(
                width = size.width(),
                height = size.height(),
                "grid re-created"
            );
            out_events.push(Event::GridConfigured { size });
        }
        Command::SetCell { cell, alive } => {
            let permission = world.edit_permission();
            match edit::set_cell(&mut world.current, permission, cell, alive) {
                EditOutcome::Changed => out_events.push(Event::CellChanged { cell, alive }),
                EditOutcome::Unchanged => {}
                EditOutcome::Rejected(reason) => World::reject(reason, out_events),
            }
        }
        Command::AdvanceGeneration { source } => match (source, world.playback) {
            (StepSource::Manual, PlaybackState::Idle)
            | (StepSource::Scheduled, PlaybackState::Playing) => world.advance(out_events),
            (StepSource::Manual, PlaybackState::Playing) => {
                World::reject(Rejection::StepWhilePlaying, out_events);
            }
            (StepSource::Scheduled, PlaybackState::Idle) => {
                World::reject(Rejection::ScheduledStepWhileIdle, out_events);
            }
        },
        Command::ResetGeneration => {
            if world.playback == PlaybackState::Playing {
                World::reject(Rejection::ResetWhilePlaying, out_events);
                return;
            }
            world.current.clear();
            world.generation = 0;
            out_events.push(Event::GenerationReset);
        }
        Command::SetPlaybackState { state } => {
            if world.playback != state {
                world.playback = state;
                out_events.push(Event::PlaybackStateChanged { state });
            }
        }
        Command::SetTopology { topology } => {
            if world.topology != topology {
                world.topology = topology;
                out_events.push(Event::TopologyChanged { topology });
            }
        }
        Command::SetLiveEdit { enabled } => {
            if world.live_edit != enabled {
                world.live_edit = enabled;
                out_events.push(Event::LiveEditChanged { enabled });
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use lifegrid_core::{Grid, GridLayout, PlaybackState, Topology};

    use super::World;

    /// The current generation.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.current
    }

    /// Layout the current grid was derived from.
    #[must_use]
    pub fn layout(world: &World) -> &GridLayout {
        &world.layout
    }

    /// Topology used by the next generation step.
    #[must_use]
    pub fn topology(world: &World) -> Topology {
        world.topology
    }

    /// Whether edits are allowed while playing.
    #[must_use]
    pub fn live_edit(world: &World) -> bool {
        world.live_edit
    }

    /// Playback state recorded by the controller.
    #[must_use]
    pub fn playback_state(world: &World) -> PlaybackState {
        world.playback
    }

    /// Generations computed since the grid was last created or reset.
    #[must_use]
    pub fn generation(world: &World) -> u64 {
        world.generation
    }

    /// Number of alive cells in the current generation.
    #[must_use]
    pub fn population(world: &World) -> usize {
        world.current.population()
    }
}
