#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs Lifegrid in a window or headless.

mod config;
mod controls;
mod headless;
mod windowed;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use lifegrid_core::{CellCoord, Topology, Viewport};
use tracing_subscriber::EnvFilter;

use crate::{
    config::{ConfigFile, Overrides, Settings},
    windowed::WindowOptions,
};

const DEFAULT_LOG_FILTER: &str = "warn,lifegrid=info";

#[derive(Debug, Parser)]
#[command(
    name = "lifegrid",
    about = "Conway's Game of Life with interactive editing",
    version
)]
struct CliArgs {
    /// TOML file with [simulation], [geometry] and [colors] sections.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Milliseconds between generations while playing (10..=1000).
    #[arg(long, value_name = "MS")]
    interval_ms: Option<u64>,
    /// Edge handling used by the neighbour count.
    #[arg(long, value_enum)]
    topology: Option<TopologyArg>,
    /// Allow editing cells while playing; `--live-edit=false` overrides the config file.
    #[arg(
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    live_edit: Option<bool>,
    /// Cell edge length in pixels (10..=50).
    #[arg(long, value_name = "PX")]
    cell_size: Option<u32>,
    /// Gap between cells in pixels (1..=10).
    #[arg(long, value_name = "PX")]
    cell_gap: Option<u32>,
    /// Surface width in pixels.
    #[arg(long, default_value_t = 1280)]
    width: u32,
    /// Surface height in pixels.
    #[arg(long, default_value_t = 720)]
    height: u32,
    /// Cell to bring to life before starting, as ROW,COLUMN. Repeatable.
    #[arg(long = "alive", value_name = "ROW,COLUMN", value_parser = parse_cell)]
    alive: Vec<CellCoord>,
    /// Run without a window and print the final board.
    #[arg(long)]
    headless: bool,
    /// Generations to compute in headless mode.
    #[arg(long, default_value_t = 100)]
    generations: u64,
    /// Print frame timing once per second.
    #[arg(long)]
    show_fps: bool,
    /// Start with the key guide hidden.
    #[arg(long)]
    hide_guide: bool,
    /// Request vertical sync on or off instead of the platform default.
    #[arg(long, value_name = "BOOL")]
    vsync: Option<bool>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum TopologyArg {
    Wrapped,
    Bounded,
}

impl From<TopologyArg> for Topology {
    fn from(value: TopologyArg) -> Self {
        match value {
            TopologyArg::Wrapped => Self::Wrapped,
            TopologyArg::Bounded => Self::Bounded,
        }
    }
}

impl CliArgs {
    fn overrides(&self) -> Overrides {
        Overrides {
            interval_ms: self.interval_ms,
            topology: self.topology.map(Topology::from),
            live_edit: self.live_edit,
            cell_size: self.cell_size,
            cell_gap: self.cell_gap,
        }
    }
}

fn parse_cell(value: &str) -> Result<CellCoord, String> {
    let (row, column) = value
        .split_once(',')
        .ok_or_else(|| format!("expected ROW,COLUMN but found `{value}`"))?;
    let parse = |part: &str| {
        part.trim()
            .parse::<u32>()
            .map_err(|error| format!("invalid index `{part}`: {error}"))
    };
    Ok(CellCoord::new(parse(row)?, parse(column)?))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Entry point for the Lifegrid command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let args = CliArgs::parse();

    let file = match &args.config {
        Some(path) => ConfigFile::load(path)?,
        None => ConfigFile::default(),
    };
    let settings = Settings::resolve(&file, &args.overrides()).context("invalid configuration")?;
    let viewport = Viewport::new(args.width, args.height);

    if args.headless {
        let report = headless::run(&settings, viewport, &args.alive, args.generations)?;
        print!("{report}");
        return Ok(());
    }

    windowed::run(
        settings,
        viewport,
        &args.alive,
        WindowOptions {
            show_fps: args.show_fps,
            show_guide: !args.hide_guide,
            vsync: args.vsync,
        },
    )
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn cells_parse_from_row_and_column() {
        assert_eq!(parse_cell("3,14"), Ok(CellCoord::new(3, 14)));
        assert_eq!(parse_cell(" 0 , 7"), Ok(CellCoord::new(0, 7)));
        assert!(parse_cell("3").is_err());
        assert!(parse_cell("-1,2").is_err());
    }

    #[test]
    fn flags_become_overrides() {
        let args = CliArgs::parse_from([
            "lifegrid",
            "--topology",
            "bounded",
            "--live-edit",
            "--interval-ms",
            "120",
            "--alive",
            "1,2",
            "--alive",
            "3,4",
        ]);

        assert_eq!(
            args.overrides(),
            Overrides {
                interval_ms: Some(120),
                topology: Some(Topology::Bounded),
                live_edit: Some(true),
                cell_size: None,
                cell_gap: None,
            }
        );
        assert_eq!(args.alive, vec![CellCoord::new(1, 2), CellCoord::new(3, 4)]);
        assert!(!args.headless);
    }

    #[test]
    fn live_edit_flag_can_be_switched_off() {
        let args = CliArgs::parse_from(["lifegrid", "--live-edit=false"]);
        assert_eq!(args.overrides().live_edit, Some(false));

        let args = CliArgs::parse_from(["lifegrid", "--live-edit=true"]);
        assert_eq!(args.overrides().live_edit, Some(true));

        let args = CliArgs::parse_from(["lifegrid"]);
        assert_eq!(args.overrides().live_edit, None);
    }

    #[test]
    fn live_edit_flag_overrides_config_file() {
        let file = ConfigFile::parse("[simulation]\nlive_edit = true\n").expect("valid file");
        let args = CliArgs::parse_from(["lifegrid", "--live-edit=false"]);

        let settings = Settings::resolve(&file, &args.overrides()).expect("valid settings");

        assert!(!settings.simulation.live_edit);
    }
}
