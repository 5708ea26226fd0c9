use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use lifegrid_core::{
    CellCoord, CellGeometry, Command, Event, GridLayout, PlaybackState, Rejection,
    SimulationConfig, StepSource, Topology, Viewport,
};
use lifegrid_world::{self as world, query, World};

fn layout_for(columns: u32, rows: u32) -> GridLayout {
    let geometry = CellGeometry::new(10, 2);
    let viewport = Viewport::new(columns * 12 + 2, rows * 12 + 2);
    GridLayout::fit(viewport, geometry).expect("viewport fits cells")
}

fn world_with(columns: u32, rows: u32, config: SimulationConfig) -> World {
    World::new(layout_for(columns, rows), &config)
}

fn apply_all(world: &mut World, commands: Vec<Command>) -> Vec<Event> {
    let mut events = Vec::new();
    for command in commands {
        world::apply(world, command, &mut events);
    }
    events
}

fn set(row: u32, column: u32) -> Command {
    Command::SetCell {
        cell: CellCoord::new(row, column),
        alive: true,
    }
}

fn play() -> Command {
    Command::SetPlaybackState {
        state: PlaybackState::Playing,
    }
}

#[test]
fn manual_step_advances_blinker_while_idle() {
    let mut world = world_with(5, 5, SimulationConfig::default());
    let _ = apply_all(&mut world, vec![set(2, 1), set(2, 2), set(2, 3)]);

    let events = apply_all(
        &mut world,
        vec![Command::AdvanceGeneration {
            source: StepSource::Manual,
        }],
    );

    assert_eq!(
        events,
        vec![Event::GenerationAdvanced {
            generation: 1,
            population: 3,
        }]
    );
    let alive: Vec<_> = query::grid(&world).alive_cells().collect();
    assert_eq!(
        alive,
        vec![
            CellCoord::new(1, 2),
            CellCoord::new(2, 2),
            CellCoord::new(3, 2)
        ]
    );
}

#[test]
fn manual_step_and_reset_are_refused_while_playing() {
    let mut world = world_with(4, 4, SimulationConfig::default());
    let _ = apply_all(&mut world, vec![set(1, 1), play()]);

    let events = apply_all(
        &mut world,
        vec![
            Command::AdvanceGeneration {
                source: StepSource::Manual,
            },
            Command::ResetGeneration,
        ],
    );

    assert_eq!(
        events,
        vec![
            Event::CommandRejected {
                reason: Rejection::StepWhilePlaying
            },
            Event::CommandRejected {
                reason: Rejection::ResetWhilePlaying
            },
        ]
    );
    assert_eq!(query::population(&world), 1);
    assert_eq!(query::generation(&world), 0);
}

#[test]
fn scheduled_step_advances_while_playing() {
    let mut world = world_with(4, 4, SimulationConfig::default());
    let _ = apply_all(&mut world, vec![set(1, 1), play()]);

    let events = apply_all(
        &mut world,
        vec![Command::AdvanceGeneration {
            source: StepSource::Scheduled,
        }],
    );

    assert_eq!(
        events,
        vec![Event::GenerationAdvanced {
            generation: 1,
            population: 0,
        }]
    );
}

#[test]
fn edits_while_playing_require_live_edit() {
    let mut world = world_with(4, 4, SimulationConfig::default());
    let _ = apply_all(&mut world, vec![play()]);
    assert!(!query::live_edit(&world));

    let refused = apply_all(&mut world, vec![set(0, 0)]);
    assert_eq!(
        refused,
        vec![Event::CommandRejected {
            reason: Rejection::EditWhilePlaying
        }]
    );

    let accepted = apply_all(
        &mut world,
        vec![Command::SetLiveEdit { enabled: true }, set(0, 0)],
    );
    assert_eq!(
        accepted,
        vec![
            Event::LiveEditChanged { enabled: true },
            Event::CellChanged {
                cell: CellCoord::new(0, 0),
                alive: true
            },
        ]
    );
}

#[test]
fn out_of_range_edit_is_reported_not_raised() {
    let mut world = world_with(4, 4, SimulationConfig::default());

    let events = apply_all(&mut world, vec![set(9, 0)]);

    assert_eq!(
        events,
        vec![Event::CommandRejected {
            reason: Rejection::CellOutOfRange {
                cell: CellCoord::new(9, 0)
            }
        }]
    );
    assert_eq!(query::population(&world), 0);
}

#[test]
fn reset_keeps_dimensions_and_clears_counter() {
    let mut world = world_with(6, 3, SimulationConfig::default());
    let _ = apply_all(
        &mut world,
        vec![
            set(1, 1),
            set(1, 2),
            set(1, 3),
            Command::AdvanceGeneration {
                source: StepSource::Manual,
            },
        ],
    );
    assert_eq!(query::generation(&world), 1);

    let events = apply_all(&mut world, vec![Command::ResetGeneration]);

    assert_eq!(events, vec![Event::GenerationReset]);
    assert_eq!(query::population(&world), 0);
    assert_eq!(query::generation(&world), 0);
    assert_eq!(query::grid(&world).width(), 6);
    assert_eq!(query::grid(&world).height(), 3);
}

#[test]
fn configure_layout_recreates_dead_grid_even_while_playing() {
    let mut world = world_with(4, 4, SimulationConfig::default());
    let _ = apply_all(&mut world, vec![set(0, 0), play()]);

    let layout = layout_for(9, 7);
    let events = apply_all(&mut world, vec![Command::ConfigureLayout { layout }]);

    assert_eq!(
        events,
        vec![Event::GridConfigured {
            size: layout.size()
        }]
    );
    assert_eq!(query::grid(&world).width(), 9);
    assert_eq!(query::grid(&world).height(), 7);
    assert_eq!(query::population(&world), 0);
    assert_eq!(query::playback_state(&world), PlaybackState::Playing);
    assert_eq!(query::layout(&world), &layout);
}

#[test]
fn topology_change_affects_next_step() {
    let config = SimulationConfig {
        topology: Topology::Bounded,
        ..SimulationConfig::default()
    };
    let mut world = world_with(5, 5, config);
    let _ = apply_all(&mut world, vec![set(0, 1), set(0, 2), set(0, 3)]);

    let _ = apply_all(
        &mut world,
        vec![
            Command::SetTopology {
                topology: Topology::Wrapped,
            },
            Command::AdvanceGeneration {
                source: StepSource::Manual,
            },
        ],
    );

    assert!(query::grid(&world).get(4, 2).expect("in range"));
}

#[test]
fn deterministic_replay_produces_identical_outcome() {
    let first = replay(scripted_commands());
    let second = replay(scripted_commands());

    assert_eq!(first, second, "replay diverged between runs");
}

fn scripted_commands() -> Vec<Command> {
    let mut commands = vec![set(0, 1), set(1, 2), set(2, 0), set(2, 1), set(2, 2)];
    for index in 0..6 {
        commands.push(set(7, index + 3));
    }
    commands.push(play());
    for generation in 0..30 {
        commands.push(Command::AdvanceGeneration {
            source: StepSource::Scheduled,
        });
        if generation == 10 {
            commands.push(Command::SetTopology {
                topology: Topology::Bounded,
            });
        }
    }
    commands
}

fn replay(commands: Vec<Command>) -> (u64, Vec<Event>) {
    let mut world = world_with(12, 10, SimulationConfig::default());
    let events = apply_all(&mut world, commands);

    let mut hasher = DefaultHasher::new();
    query::grid(&world).hash(&mut hasher);
    (hasher.finish(), events)
}
