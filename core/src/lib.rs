#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Lifegrid engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Callers submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values describing what
//! actually changed. Policy refusals are reported as
//! [`Event::CommandRejected`] rather than as errors.
//!
//! The crate also owns the [`Grid`] buffer, the viewport [`GridLayout`], and
//! the two collaborator contracts the engine consumes: [`Scheduler`] for
//! periodic ticks and [`Renderer`] for redraw notifications.

mod grid;
mod layout;

use std::{ops::RangeInclusive, time::Duration};

use serde::Deserialize;

pub use grid::{Grid, GridSize};
pub use layout::{CellGeometry, GridLayout, Viewport, CELL_GAP_RANGE, CELL_SIZE_RANGE};

/// Accepted generation intervals in milliseconds.
pub const INTERVAL_RANGE_MS: RangeInclusive<u64> = 10..=1000;

/// Increment applied when an adapter nudges the generation interval.
pub const INTERVAL_STEP_MS: u64 = 10;

/// Errors raised by grid construction and direct grid access.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// Width or height was zero, or the grid would not be addressable.
    #[error("grid dimensions must be positive (received {width}x{height})")]
    InvalidDimension {
        /// Requested number of columns.
        width: u32,
        /// Requested number of rows.
        height: u32,
    },
    /// A coordinate fell outside the current grid dimensions.
    #[error("cell (row {row}, column {column}) lies outside the {width}x{height} grid")]
    OutOfRange {
        /// Requested row.
        row: u32,
        /// Requested column.
        column: u32,
        /// Grid width at the time of the access.
        width: u32,
        /// Grid height at the time of the access.
        height: u32,
    },
}

/// Rule used to resolve neighbour coordinates that fall off the grid edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topology {
    /// Edges wrap around, turning the grid into a torus.
    #[default]
    Wrapped,
    /// Coordinates beyond the edge are excluded from neighbour counts.
    Bounded,
}

impl Topology {
    /// Returns the other topology mode.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Wrapped => Self::Bounded,
            Self::Bounded => Self::Wrapped,
        }
    }
}

/// Whether generations are currently driven by the periodic timer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PlaybackState {
    /// Generations advance only on manual steps.
    #[default]
    Idle,
    /// A periodic timer advances generations.
    Playing,
}

/// Origin of a generation advance request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StepSource {
    /// A single step requested by the user; only honoured while idle.
    Manual,
    /// A periodic timer tick; only honoured while playing.
    Scheduled,
}

/// Period between generations while playing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GenerationInterval(Duration);

impl GenerationInterval {
    /// Creates an interval from a positive number of milliseconds.
    #[must_use]
    pub const fn from_millis(millis: u64) -> Option<Self> {
        if millis == 0 {
            None
        } else {
            Some(Self(Duration::from_millis(millis)))
        }
    }

    /// Interval as a [`Duration`].
    #[must_use]
    pub const fn duration(&self) -> Duration {
        self.0
    }

    /// Interval in whole milliseconds.
    #[must_use]
    pub const fn as_millis(&self) -> u64 {
        self.0.as_millis() as u64
    }

    /// Returns a copy moved by `steps` increments of [`INTERVAL_STEP_MS`],
    /// clamped to [`INTERVAL_RANGE_MS`].
    #[must_use]
    pub fn adjusted(self, steps: i32) -> Self {
        let delta = i64::from(steps) * INTERVAL_STEP_MS as i64;
        let moved = (self.as_millis() as i64).saturating_add(delta);
        let clamped = moved.clamp(
            *INTERVAL_RANGE_MS.start() as i64,
            *INTERVAL_RANGE_MS.end() as i64,
        );
        Self(Duration::from_millis(clamped as u64))
    }
}

impl Default for GenerationInterval {
    fn default() -> Self {
        Self(Duration::from_millis(50))
    }
}

/// Tunable parameters of a simulation session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SimulationConfig {
    /// Step period while playing.
    pub interval: GenerationInterval,
    /// Neighbour resolution at the grid edges.
    pub topology: Topology,
    /// Whether cells may be edited while playing.
    pub live_edit: bool,
    /// Cell size and spacing used to derive grid dimensions.
    pub geometry: CellGeometry,
}

/// Location of a single grid cell expressed as row and column indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellCoord {
    row: u32,
    column: u32,
}

impl CellCoord {
    /// Creates a new cell coordinate.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index (`i`).
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index (`j`).
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replaces the grid with a fully dead grid sized by the layout.
    ConfigureLayout {
        /// Layout the new grid is derived from.
        layout: GridLayout,
    },
    /// Requests that a single cell take the provided state.
    SetCell {
        /// Cell to edit.
        cell: CellCoord,
        /// Desired state of the cell.
        alive: bool,
    },
    /// Requests that the world compute the next generation.
    AdvanceGeneration {
        /// Whether the request came from the user or from the timer.
        source: StepSource,
    },
    /// Requests that every cell be cleared while keeping the dimensions.
    ResetGeneration,
    /// Records the playback state the controller transitioned into.
    SetPlaybackState {
        /// New playback state.
        state: PlaybackState,
    },
    /// Selects the topology used by subsequent generations.
    SetTopology {
        /// Topology to activate.
        topology: Topology,
    },
    /// Enables or disables editing while playing.
    SetLiveEdit {
        /// Whether live editing is allowed.
        enabled: bool,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// A new, fully dead grid replaced the previous one.
    GridConfigured {
        /// Dimensions of the new grid.
        size: GridSize,
    },
    /// A single cell was edited.
    CellChanged {
        /// Cell that changed.
        cell: CellCoord,
        /// State the cell now holds.
        alive: bool,
    },
    /// A generation step completed and its result became current.
    GenerationAdvanced {
        /// Number of generations computed since the grid was last created or reset.
        generation: u64,
        /// Alive cells in the new generation.
        population: usize,
    },
    /// Every cell was cleared.
    GenerationReset,
    /// Playback switched between idle and playing.
    PlaybackStateChanged {
        /// State that became active.
        state: PlaybackState,
    },
    /// The topology mode changed.
    TopologyChanged {
        /// Topology that became active.
        topology: Topology,
    },
    /// The live edit permission changed.
    LiveEditChanged {
        /// Whether live editing is now allowed.
        enabled: bool,
    },
    /// A command was refused by policy and left the world untouched.
    CommandRejected {
        /// Why the command was refused.
        reason: Rejection,
    },
}

/// Reasons a command may be refused by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Rejection {
    /// Manual steps race the timer, so they are refused while playing.
    StepWhilePlaying,
    /// A timer tick arrived after playback stopped.
    ScheduledStepWhileIdle,
    /// Resetting is only possible while idle.
    ResetWhilePlaying,
    /// Editing while playing requires live edit.
    EditWhilePlaying,
    /// The edited cell does not exist in the current grid.
    CellOutOfRange {
        /// Coordinate supplied with the edit.
        cell: CellCoord,
    },
}

/// Opaque identifier of a periodic timer registered with a [`Scheduler`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

impl TimerHandle {
    /// Wraps a scheduler-specific identifier.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the numeric identifier.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

/// Capability to register cancellable periodic timers.
///
/// A scheduler never invokes engine code itself; whoever drives it routes the
/// handles that came due back into the session, one at a time.
pub trait Scheduler {
    /// Registers a timer that first fires one `interval` from now and then
    /// every `interval` thereafter.
    fn schedule_periodic(&mut self, interval: Duration) -> TimerHandle;

    /// Cancels a timer. No firing of `handle` is reported after this returns.
    fn cancel(&mut self, handle: TimerHandle);
}

/// Receives a notification whenever the visible grid changed.
pub trait Renderer {
    /// Redraws the provided grid using the layout's geometry.
    fn redraw(&mut self, grid: &Grid, layout: &GridLayout);
}
