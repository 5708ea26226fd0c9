#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Playback system deciding when generations advance.
//!
//! The controller owns the active timer handle and translates play, pause and
//! timer ticks into world commands. A tick is honoured only when it carries
//! the handle the controller is currently waiting on, so firings that were
//! already in flight when the timer was cancelled or replaced are ignored.

mod clock;

use lifegrid_core::{
    Command, GenerationInterval, PlaybackState, Scheduler, StepSource, TimerHandle,
};
use tracing::debug;

pub use clock::{TickScheduler, MAX_CATCH_UP_TICKS};

/// Play/pause state machine backed by a [`Scheduler`].
#[derive(Debug)]
pub struct Playback<S> {
    scheduler: S,
    interval: GenerationInterval,
    active: Option<TimerHandle>,
}

impl<S: Scheduler> Playback<S> {
    /// Creates an idle controller that will tick at `interval` once playing.
    #[must_use]
    pub fn new(scheduler: S, interval: GenerationInterval) -> Self {
        Self {
            scheduler,
            interval,
            active: None,
        }
    }

    /// Current playback state.
    #[must_use]
    pub fn state(&self) -> PlaybackState {
        if self.active.is_some() {
            PlaybackState::Playing
        } else {
            PlaybackState::Idle
        }
    }

    /// Step period used while playing.
    #[must_use]
    pub fn interval(&self) -> GenerationInterval {
        self.interval
    }

    /// Handle of the timer currently driving generations, if any.
    #[must_use]
    pub fn active_timer(&self) -> Option<TimerHandle> {
        self.active
    }

    /// Read-only access to the scheduler.
    #[must_use]
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Mutable access to the scheduler, used by drivers that advance its clock.
    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Starts periodic stepping. Returns `false` when already playing.
    pub fn play(&mut self, out: &mut Vec<Command>) -> bool {
        if self.active.is_some() {
            return false;
        }

        let handle = self.scheduler.schedule_periodic(self.interval.duration());
        self.active = Some(handle);
        debug!(
            handle = handle.get(),
            interval_ms = self.interval.as_millis(),
            "playback started"
        );
        out.push(Command::SetPlaybackState {
            state: PlaybackState::Playing,
        });
        true
    }

    /// Stops periodic stepping. Returns `false` when already idle.
    pub fn pause(&mut self, out: &mut Vec<Command>) -> bool {
        let Some(handle) = self.active.take() else {
            return false;
        };

        self.scheduler.cancel(handle);
        debug!(handle = handle.get(), "playback paused");
        out.push(Command::SetPlaybackState {
            state: PlaybackState::Idle,
        });
        true
    }

    /// Pauses when playing and plays when idle, returning the resulting state.
    pub fn toggle(&mut self, out: &mut Vec<Command>) -> PlaybackState {
        if !self.pause(out) {
            let _ = self.play(out);
        }
        self.state()
    }

    /// Updates the step period.
    ///
    /// While playing the running timer is cancelled and replaced by one at the
    /// new period, so the next generation fires one full new interval after
    /// the change. Returns `true` when a running timer was replaced.
    pub fn change_interval(&mut self, interval: GenerationInterval) -> bool {
        if interval == self.interval {
            return false;
        }
        self.interval = interval;

        let Some(previous) = self.active else {
            return false;
        };
        self.scheduler.cancel(previous);
        let handle = self.scheduler.schedule_periodic(interval.duration());
        self.active = Some(handle);
        debug!(
            previous = previous.get(),
            handle = handle.get(),
            interval_ms = interval.as_millis(),
            "playback rescheduled"
        );
        true
    }

    /// Handles a timer firing. Returns `true` when a generation step was requested.
    pub fn tick(&mut self, handle: TimerHandle, out: &mut Vec<Command>) -> bool {
        if self.active != Some(handle) {
            debug!(handle = handle.get(), "ignoring stale timer tick");
            return false;
        }

        out.push(Command::AdvanceGeneration {
            source: StepSource::Scheduled,
        });
        true
    }
}
