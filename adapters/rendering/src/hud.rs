use lifegrid_core::{PlaybackState, Topology};

/// Key bindings listed by the on-screen guide, as `(key, action)` pairs.
pub const KEY_GUIDE: &[(&str, &str)] = &[
    ("Enter", "play / pause"),
    ("Space", "step one generation"),
    ("R", "reset"),
    ("L", "toggle loop edges"),
    ("E", "toggle live edit"),
    ("Up / Down", "interval +/- 10 ms"),
    ("= / -", "cell size +/- 1 px"),
    ("] / [", "cell gap +/- 1 px"),
    ("H", "hide / show this guide"),
    ("Esc / Q", "quit"),
];

/// Snapshot of the session parameters shown next to the key guide.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatusLine {
    /// Whether the timer is running.
    pub playback: PlaybackState,
    /// Generations since the grid was created or reset.
    pub generation: u64,
    /// Alive cells.
    pub population: usize,
    /// Step period in milliseconds.
    pub interval_ms: u64,
    /// Edge handling.
    pub topology: Topology,
    /// Whether edits are allowed while playing.
    pub live_edit: bool,
    /// Cell edge length in pixels.
    pub cell_size: u32,
    /// Gap between cells in pixels.
    pub cell_gap: u32,
}

impl StatusLine {
    /// One-line human readable summary.
    #[must_use]
    pub fn summary(&self) -> String {
        let playback = match self.playback {
            PlaybackState::Idle => "paused",
            PlaybackState::Playing => "playing",
        };
        let edges = match self.topology {
            Topology::Wrapped => "on",
            Topology::Bounded => "off",
        };
        let live_edit = if self.live_edit { "on" } else { "off" };

        format!(
            "{playback} | generation {} | population {} | {} ms | cells {}+{} px | loop edges {edges} | live edit {live_edit}",
            self.generation, self.population, self.interval_ms, self.cell_size, self.cell_gap,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_names_every_parameter() {
        let status = StatusLine {
            playback: PlaybackState::Playing,
            generation: 12,
            population: 40,
            interval_ms: 50,
            topology: Topology::Bounded,
            live_edit: true,
            cell_size: 20,
            cell_gap: 1,
        };

        assert_eq!(
            status.summary(),
            "playing | generation 12 | population 40 | 50 ms | cells 20+1 px | loop edges off | live edit on"
        );
    }
}
