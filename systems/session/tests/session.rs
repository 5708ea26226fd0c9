use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    time::Duration,
};

use lifegrid_core::{
    CellCoord, CellGeometry, Event, GenerationInterval, Grid, GridLayout, PlaybackState,
    Rejection, Renderer, SimulationConfig, Topology, Viewport,
};
use lifegrid_system_playback::{TickScheduler, MAX_CATCH_UP_TICKS};
use lifegrid_system_session::Session;

const MS: Duration = Duration::from_millis(1);

#[derive(Debug, Default)]
struct RecordingRenderer {
    frames: Vec<Grid>,
}

impl Renderer for RecordingRenderer {
    fn redraw(&mut self, grid: &Grid, _layout: &GridLayout) {
        self.frames.push(grid.clone());
    }
}

type TestSession = Session<TickScheduler, RecordingRenderer>;

fn interval(millis: u64) -> GenerationInterval {
    GenerationInterval::from_millis(millis).expect("positive interval")
}

fn viewport_for(columns: u32, rows: u32) -> Viewport {
    Viewport::new(columns * 11 + 1, rows * 11 + 1)
}

fn session_with(columns: u32, rows: u32, config: SimulationConfig) -> TestSession {
    let config = SimulationConfig {
        geometry: CellGeometry::new(10, 1),
        ..config
    };
    Session::new(
        &config,
        viewport_for(columns, rows),
        TickScheduler::new(),
        RecordingRenderer::default(),
    )
    .expect("viewport fits cells")
}

fn session(columns: u32, rows: u32) -> TestSession {
    session_with(columns, rows, SimulationConfig::default())
}

fn seed_blinker(session: &mut TestSession) {
    for column in 1..=3 {
        assert!(session.toggle_cell(2, column, true));
    }
}

fn alive(session: &TestSession) -> Vec<CellCoord> {
    session.grid().alive_cells().collect()
}

fn vertical_blinker() -> Vec<CellCoord> {
    vec![
        CellCoord::new(1, 2),
        CellCoord::new(2, 2),
        CellCoord::new(3, 2),
    ]
}

#[test]
fn toggle_is_idempotent() {
    let mut session = session(4, 4);

    assert!(session.toggle_cell(1, 1, true));
    assert!(!session.toggle_cell(1, 1, true));
    assert!(session.toggle_cell(1, 1, false));
    assert_eq!(session.population(), 0);
}

#[test]
fn toggle_outside_grid_is_a_no_op() {
    let mut session = session(4, 4);

    assert!(!session.toggle_cell(4, 0, true));
    assert!(!session.toggle_cell(0, 99, true));
    assert_eq!(session.population(), 0);
}

#[test]
fn renderer_is_notified_only_when_the_grid_changes() {
    let mut session = session(5, 5);
    assert_eq!(session.renderer().frames.len(), 1);

    seed_blinker(&mut session);
    assert_eq!(session.renderer().frames.len(), 4);

    assert!(!session.toggle_cell(2, 2, true));
    assert!(!session.change_topology(Topology::Wrapped));
    assert_eq!(session.renderer().frames.len(), 4);

    assert!(session.step());
    assert_eq!(session.renderer().frames.len(), 5);
    let last = session.renderer().frames.last().expect("frame recorded");
    assert_eq!(last.alive_cells().collect::<Vec<_>>(), vertical_blinker());

    assert!(session.reset());
    assert_eq!(session.renderer().frames.len(), 6);
    assert_eq!(session.population(), 0);
}

#[test]
fn blinker_has_period_two_when_stepped_manually() {
    let mut session = session(5, 5);
    seed_blinker(&mut session);
    let start = alive(&session);

    assert!(session.step());
    assert_eq!(alive(&session), vertical_blinker());
    assert!(session.step());
    assert_eq!(alive(&session), start);
    assert_eq!(session.generation(), 2);
}

#[test]
fn step_and_reset_are_refused_while_playing() {
    let mut session = session(5, 5);
    seed_blinker(&mut session);
    assert!(session.play());

    assert!(!session.step());
    assert_eq!(
        session.last_events(),
        &[Event::CommandRejected {
            reason: Rejection::StepWhilePlaying
        }]
    );
    assert!(!session.reset());
    assert_eq!(
        session.last_events(),
        &[Event::CommandRejected {
            reason: Rejection::ResetWhilePlaying
        }]
    );
    assert_eq!(session.population(), 3);
    assert_eq!(session.generation(), 0);
}

#[test]
fn edits_while_playing_follow_live_edit() {
    let mut session = session(5, 5);
    assert!(session.play());

    assert!(!session.toggle_cell(0, 0, true));
    assert!(session.change_edit_permission(true));
    assert!(session.live_edit());
    assert!(session.toggle_cell(0, 0, true));
    assert!(!session.change_edit_permission(true));
}

#[test]
fn play_pause_round_trip_keeps_last_completed_tick() {
    let mut session = session_with(
        5,
        5,
        SimulationConfig {
            interval: interval(50),
            ..SimulationConfig::default()
        },
    );
    seed_blinker(&mut session);

    assert!(session.play());
    assert!(!session.play());
    assert_eq!(session.advance(MS * 50), 1);
    assert!(session.pause());
    assert!(!session.pause());

    assert_eq!(session.advance(MS * 500), 0);
    assert_eq!(session.playback_state(), PlaybackState::Idle);
    assert_eq!(session.generation(), 1);
    assert_eq!(alive(&session), vertical_blinker());
    assert_eq!(session.scheduler().active_timers(), 0);
}

#[test]
fn stale_tick_after_pause_is_ignored() {
    let mut session = session(5, 5);
    seed_blinker(&mut session);
    assert!(session.play());
    let handle = session.active_timer().expect("timer while playing");
    assert!(session.pause());

    assert!(!session.on_tick(handle));
    assert_eq!(session.generation(), 0);
}

#[test]
fn interval_change_restarts_the_period_without_dropping_ticks() {
    let mut session = session_with(
        5,
        5,
        SimulationConfig {
            interval: interval(100),
            ..SimulationConfig::default()
        },
    );
    seed_blinker(&mut session);
    assert!(session.play());
    assert_eq!(session.advance(MS * 90), 0);

    session.change_interval(interval(30));
    assert_eq!(session.interval(), interval(30));

    let mut fired_at = Vec::new();
    for elapsed in 1..=95 {
        if session.advance(MS) > 0 {
            fired_at.push(elapsed);
        }
    }
    assert_eq!(fired_at, vec![30, 60, 90]);
    assert_eq!(session.generation(), 3);
}

#[test]
fn interval_change_clears_previous_events() {
    let mut session = session(4, 4);
    assert!(session.toggle_cell(1, 1, true));
    assert!(!session.last_events().is_empty());

    session.change_interval(interval(70));

    assert!(session.last_events().is_empty());
    assert_eq!(session.interval(), interval(70));
}

#[test]
fn overrun_is_capped_per_advance() {
    let mut session = session_with(
        6,
        6,
        SimulationConfig {
            interval: interval(10),
            ..SimulationConfig::default()
        },
    );
    seed_blinker(&mut session);
    assert!(session.play());

    let stepped = session.advance(MS * 1_000);

    assert_eq!(stepped, MAX_CATCH_UP_TICKS as usize);
    assert_eq!(session.generation(), u64::from(MAX_CATCH_UP_TICKS));
    assert_eq!(session.advance(MS * 10), 1);
}

#[test]
fn geometry_change_while_playing_recreates_grid_and_keeps_timer() {
    let mut session = session_with(
        5,
        5,
        SimulationConfig {
            interval: interval(20),
            ..SimulationConfig::default()
        },
    );
    seed_blinker(&mut session);
    assert!(session.play());
    assert_eq!(session.advance(MS * 20), 1);
    let timer = session.active_timer();

    session
        .change_geometry(CellGeometry::new(5, 1))
        .expect("smaller cells still fit");

    assert_eq!(session.grid().width(), 9);
    assert_eq!(session.grid().height(), 9);
    assert_eq!(session.population(), 0);
    assert_eq!(session.generation(), 0);
    assert_eq!(session.playback_state(), PlaybackState::Playing);
    assert_eq!(session.active_timer(), timer);
    assert_eq!(session.advance(MS * 20), 1);
    assert_eq!(session.generation(), 1);
}

#[test]
fn failed_geometry_change_leaves_session_untouched() {
    let mut session = session(5, 5);
    seed_blinker(&mut session);

    assert!(session.change_geometry(CellGeometry::new(200, 1)).is_err());
    assert_eq!(session.population(), 3);
    assert_eq!(session.layout().geometry(), CellGeometry::new(10, 1));
}

#[test]
fn viewport_change_refits_the_grid() {
    let mut session = session(5, 5);
    seed_blinker(&mut session);

    session
        .change_viewport(viewport_for(8, 3))
        .expect("viewport fits cells");

    assert_eq!(session.grid().width(), 8);
    assert_eq!(session.grid().height(), 3);
    assert_eq!(session.population(), 0);
    assert_eq!(session.viewport(), viewport_for(8, 3));
}

#[test]
fn topology_change_applies_to_following_steps() {
    let mut session = session_with(
        5,
        5,
        SimulationConfig {
            topology: Topology::Bounded,
            ..SimulationConfig::default()
        },
    );
    let seed_top_edge = |session: &mut TestSession| {
        for column in 1..=3 {
            assert!(session.toggle_cell(0, column, true));
        }
    };

    seed_top_edge(&mut session);
    assert!(session.step());
    assert!(!session.grid().get(4, 2).expect("in range"));

    assert!(session.reset());
    seed_top_edge(&mut session);
    assert!(session.change_topology(Topology::Wrapped));
    assert!(session.step());
    assert!(session.grid().get(4, 2).expect("in range"));
}

#[test]
fn deterministic_replay_produces_identical_outcome() {
    let first = replay();
    let second = replay();

    assert_eq!(first, second, "replay diverged between runs");
}

fn replay() -> (u64, u64, usize) {
    let mut session = session_with(
        16,
        12,
        SimulationConfig {
            interval: interval(40),
            ..SimulationConfig::default()
        },
    );
    for (row, column) in [(0, 1), (1, 2), (2, 0), (2, 1), (2, 2), (8, 8), (8, 9), (8, 10)] {
        let _ = session.toggle_cell(row, column, true);
    }
    let _ = session.play();
    for frame in 0..120 {
        let _ = session.advance(MS * 16);
        if frame == 60 {
            let _ = session.change_topology(Topology::Bounded);
            session.change_interval(interval(70));
        }
    }
    let _ = session.pause();

    let mut hasher = DefaultHasher::new();
    session.grid().hash(&mut hasher);
    (hasher.finish(), session.generation(), session.renderer().frames.len())
}
