use std::time::Duration;

use lifegrid_core::{Scheduler, TimerHandle};
use tracing::warn;

/// Upper bound on back-to-back firings of one timer within a single advance.
///
/// Any further backlog is dropped and the timer is re-anchored one period
/// after the current time.
pub const MAX_CATCH_UP_TICKS: u32 = 4;

#[derive(Clone, Copy, Debug)]
struct PeriodicTimer {
    handle: TimerHandle,
    interval: Duration,
    next_due: Duration,
}

/// Deterministic scheduler driven by an explicit virtual clock.
///
/// Nothing fires on its own: the driver calls [`TickScheduler::advance`] with
/// the elapsed time and receives the handles that came due, ordered by
/// deadline and then by handle.
#[derive(Debug, Default)]
pub struct TickScheduler {
    now: Duration,
    next_handle: u64,
    timers: Vec<PeriodicTimer>,
}

impl TickScheduler {
    /// Creates a scheduler whose clock starts at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of timers that have not been cancelled.
    #[must_use]
    pub fn active_timers(&self) -> usize {
        self.timers.len()
    }

    /// Moves the clock forward by `dt` and reports every firing that came due.
    pub fn advance(&mut self, dt: Duration) -> Vec<TimerHandle> {
        self.now = self.now.saturating_add(dt);

        let mut fired: Vec<(Duration, TimerHandle)> = Vec::new();
        for timer in &mut self.timers {
            let mut count = 0;
            while timer.next_due <= self.now {
                if count == MAX_CATCH_UP_TICKS {
                    let skipped = backlog(timer, self.now);
                    warn!(
                        handle = timer.handle.get(),
                        skipped, "timer overran; dropping backlog"
                    );
                    timer.next_due = self.now.saturating_add(timer.interval);
                    break;
                }
                fired.push((timer.next_due, timer.handle));
                timer.next_due = timer.next_due.saturating_add(timer.interval);
                count += 1;
            }
        }

        fired.sort_unstable();
        fired.into_iter().map(|(_, handle)| handle).collect()
    }
}

fn backlog(timer: &PeriodicTimer, now: Duration) -> u64 {
    if timer.interval.is_zero() {
        return 0;
    }
    let missed = now.saturating_sub(timer.next_due).as_nanos() / timer.interval.as_nanos() + 1;
    u64::try_from(missed).unwrap_or(u64::MAX)
}

impl Scheduler for TickScheduler {
    fn schedule_periodic(&mut self, interval: Duration) -> TimerHandle {
        let handle = TimerHandle::new(self.next_handle);
        self.next_handle = self.next_handle.wrapping_add(1);
        self.timers.push(PeriodicTimer {
            handle,
            interval,
            next_due: self.now.saturating_add(interval),
        });
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.timers.retain(|timer| timer.handle != handle);
    }
}
