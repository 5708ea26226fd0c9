//! Layered configuration: TOML file values overridden by command-line flags.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use lifegrid_core::{
    CellGeometry, GenerationInterval, SimulationConfig, Topology, CELL_GAP_RANGE,
    CELL_SIZE_RANGE, INTERVAL_RANGE_MS,
};
use lifegrid_rendering::{Color, Palette, RenderingError};
use serde::Deserialize;

/// Contents of an optional `lifegrid.toml`. Every value may be omitted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ConfigFile {
    #[serde(default)]
    simulation: SimulationSection,
    #[serde(default)]
    geometry: GeometrySection,
    #[serde(default)]
    colors: ColorsSection,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
struct SimulationSection {
    interval_ms: Option<u64>,
    topology: Option<Topology>,
    live_edit: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
struct GeometrySection {
    cell_size: Option<u32>,
    cell_gap: Option<u32>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
struct ColorsSection {
    background: Option<String>,
    dead_cell: Option<String>,
    alive_cell: Option<String>,
}

impl ConfigFile {
    /// Reads and parses the file at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    pub(crate) fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }
}

/// Values supplied on the command line; they take precedence over the file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Overrides {
    pub(crate) interval_ms: Option<u64>,
    pub(crate) topology: Option<Topology>,
    pub(crate) live_edit: Option<bool>,
    pub(crate) cell_size: Option<u32>,
    pub(crate) cell_gap: Option<u32>,
}

/// Validated settings used to start a session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Settings {
    pub(crate) simulation: SimulationConfig,
    pub(crate) palette: Palette,
}

/// Configuration values that fall outside the accepted ranges.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub(crate) enum ConfigError {
    #[error(
        "interval_ms must lie within {min}..={max} (received {value})",
        min = INTERVAL_RANGE_MS.start(),
        max = INTERVAL_RANGE_MS.end()
    )]
    IntervalOutOfRange { value: u64 },
    #[error(
        "cell_size must lie within {min}..={max} (received {value})",
        min = CELL_SIZE_RANGE.start(),
        max = CELL_SIZE_RANGE.end()
    )]
    CellSizeOutOfRange { value: u32 },
    #[error(
        "cell_gap must lie within {min}..={max} (received {value})",
        min = CELL_GAP_RANGE.start(),
        max = CELL_GAP_RANGE.end()
    )]
    CellGapOutOfRange { value: u32 },
    #[error("invalid colors.{field}")]
    InvalidColor {
        field: &'static str,
        #[source]
        source: RenderingError,
    },
}

impl Settings {
    /// Merges file values with overrides and validates the result.
    pub(crate) fn resolve(file: &ConfigFile, overrides: &Overrides) -> Result<Self, ConfigError> {
        let defaults = SimulationConfig::default();

        let interval_ms = overrides
            .interval_ms
            .or(file.simulation.interval_ms)
            .unwrap_or_else(|| defaults.interval.as_millis());
        let interval = INTERVAL_RANGE_MS
            .contains(&interval_ms)
            .then(|| GenerationInterval::from_millis(interval_ms))
            .flatten()
            .ok_or(ConfigError::IntervalOutOfRange { value: interval_ms })?;

        let cell_size = overrides
            .cell_size
            .or(file.geometry.cell_size)
            .unwrap_or_else(|| defaults.geometry.cell_size());
        if !CELL_SIZE_RANGE.contains(&cell_size) {
            return Err(ConfigError::CellSizeOutOfRange { value: cell_size });
        }
        let cell_gap = overrides
            .cell_gap
            .or(file.geometry.cell_gap)
            .unwrap_or_else(|| defaults.geometry.cell_gap());
        if !CELL_GAP_RANGE.contains(&cell_gap) {
            return Err(ConfigError::CellGapOutOfRange { value: cell_gap });
        }

        let simulation = SimulationConfig {
            interval,
            topology: overrides
                .topology
                .or(file.simulation.topology)
                .unwrap_or(defaults.topology),
            live_edit: overrides
                .live_edit
                .or(file.simulation.live_edit)
                .unwrap_or(defaults.live_edit),
            geometry: CellGeometry::new(cell_size, cell_gap),
        };

        let base = Palette::default();
        let colors = &file.colors;
        let palette = Palette {
            background: color_or("background", colors.background.as_deref(), base.background)?,
            dead_cell: color_or("dead_cell", colors.dead_cell.as_deref(), base.dead_cell)?,
            alive_cell: color_or("alive_cell", colors.alive_cell.as_deref(), base.alive_cell)?,
        };

        Ok(Self {
            simulation,
            palette,
        })
    }
}

fn color_or(
    field: &'static str,
    value: Option<&str>,
    fallback: Color,
) -> Result<Color, ConfigError> {
    value.map_or(Ok(fallback), |value| {
        Color::from_hex(value).map_err(|source| ConfigError::InvalidColor { field, source })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_resolves_to_defaults() {
        let file = ConfigFile::parse("").expect("empty file parses");
        let settings = Settings::resolve(&file, &Overrides::default()).expect("defaults are valid");

        assert_eq!(settings.simulation, SimulationConfig::default());
        assert_eq!(settings.palette, Palette::default());
    }

    #[test]
    fn file_values_apply_and_flags_take_precedence() {
        let file = ConfigFile::parse(
            r##"
            [simulation]
            interval_ms = 200
            topology = "bounded"
            live_edit = true

            [geometry]
            cell_size = 12
            cell_gap = 2

            [colors]
            alive_cell = "#00ff00"
            "##,
        )
        .expect("valid file");
        let overrides = Overrides {
            interval_ms: Some(80),
            cell_gap: Some(3),
            ..Overrides::default()
        };

        let settings = Settings::resolve(&file, &overrides).expect("valid settings");

        assert_eq!(settings.simulation.interval.as_millis(), 80);
        assert_eq!(settings.simulation.topology, Topology::Bounded);
        assert!(settings.simulation.live_edit);
        assert_eq!(settings.simulation.geometry, CellGeometry::new(12, 3));
        assert_eq!(settings.palette.alive_cell, Color::from_rgb_u8(0, 255, 0));
        assert_eq!(settings.palette.dead_cell, Palette::default().dead_cell);
    }

    #[test]
    fn out_of_range_values_are_reported() {
        let file = ConfigFile::default();
        let resolve = |overrides: Overrides| Settings::resolve(&file, &overrides);

        assert_eq!(
            resolve(Overrides {
                interval_ms: Some(5),
                ..Overrides::default()
            }),
            Err(ConfigError::IntervalOutOfRange { value: 5 })
        );
        assert_eq!(
            resolve(Overrides {
                cell_size: Some(51),
                ..Overrides::default()
            }),
            Err(ConfigError::CellSizeOutOfRange { value: 51 })
        );
        assert_eq!(
            resolve(Overrides {
                cell_gap: Some(0),
                ..Overrides::default()
            }),
            Err(ConfigError::CellGapOutOfRange { value: 0 })
        );
    }

    #[test]
    fn malformed_color_names_the_field() {
        let file = ConfigFile::parse("[colors]\nbackground = \"grey\"").expect("valid toml");

        let error = Settings::resolve(&file, &Overrides::default()).expect_err("bad color");

        assert_eq!(error.to_string(), "invalid colors.background");
        assert!(matches!(
            error,
            ConfigError::InvalidColor {
                field: "background",
                ..
            }
        ));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(ConfigFile::parse("[simulation]\nspeed = 3").is_err());
    }

    #[test]
    fn error_messages_include_the_accepted_range() {
        assert_eq!(
            ConfigError::IntervalOutOfRange { value: 2000 }.to_string(),
            "interval_ms must lie within 10..=1000 (received 2000)"
        );
    }
}
