#![forbid(unsafe_code)]

//! Host-driven time for auto-advance.
//!
//! Hosts without threads (a browser frame loop, a test, the CLI's `--play`
//! mode) push elapsed time into a [`TickSchedule`], which fires controller
//! ticks whenever a deadline falls inside the advanced window. The same
//! sequence of `advance` calls always produces the same reveals.

use std::time::Duration;

use tracing::trace;

use crate::controller::{Advance, AnimationController, TickEpoch};

/// Deterministic monotonic clock. Time only moves when the host says so.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    #[inline]
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Set current monotonic time.
    pub fn set(&mut self, now: Duration) {
        self.now = now;
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingTick {
    epoch: TickEpoch,
    due: Duration,
}

/// Fires controller ticks from a [`DeterministicClock`].
///
/// The schedule arms lazily: the first time it observes a live epoch it sets
/// the deadline one interval after the current time. A pending deadline is
/// kept across speed changes; the interval in effect when a tick fires
/// decides when the next one is due.
#[derive(Debug, Default, Clone)]
pub struct TickSchedule {
    clock: DeterministicClock,
    pending: Option<PendingTick>,
}

impl TickSchedule {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            clock: DeterministicClock::new(),
            pending: None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Absolute time of the next tick, if one is armed.
    #[must_use]
    pub fn next_due(&self) -> Option<Duration> {
        self.pending.map(|pending| pending.due)
    }

    /// Align the pending tick with the controller's live epoch.
    pub fn sync(&mut self, controller: &AnimationController) {
        match (controller.live_epoch(), self.pending) {
            (Some(epoch), Some(pending)) if pending.epoch == epoch => {}
            (Some(epoch), _) => {
                let due = self.clock.now().saturating_add(controller.tick_interval());
                trace!(%epoch, due_ms = due.as_millis() as u64, "tick armed");
                self.pending = Some(PendingTick { epoch, due });
            }
            (None, _) => self.pending = None,
        }
    }

    /// Jump straight to the next deadline and fire it.
    ///
    /// Returns the time it fired at and what the tick did, or `None` when
    /// nothing is armed.
    pub fn fire_next(&mut self, controller: &mut AnimationController) -> Option<(Duration, Advance)> {
        self.sync(controller);
        let pending = self.pending?;
        self.clock.set(pending.due);
        let advance = controller.tick(pending.epoch);
        self.rearm(pending, controller);
        advance.map(|advance| (pending.due, advance))
    }

    /// Move time forward by `dt`, firing every tick that falls due on the way.
    pub fn advance(&mut self, dt: Duration, controller: &mut AnimationController) -> Vec<Advance> {
        self.sync(controller);
        let target = self.clock.now().saturating_add(dt);
        let mut fired = Vec::new();
        while let Some(pending) = self.pending {
            if pending.due > target {
                break;
            }
            self.clock.set(pending.due);
            if let Some(advance) = controller.tick(pending.epoch) {
                fired.push(advance);
            }
            self.rearm(pending, controller);
        }
        self.clock.set(target);
        fired
    }

    fn rearm(&mut self, fired: PendingTick, controller: &AnimationController) {
        self.pending = match controller.live_epoch() {
            Some(epoch) if epoch == fired.epoch => Some(PendingTick {
                epoch,
                due: fired.due.saturating_add(controller.tick_interval()),
            }),
            _ => None,
        };
    }
}
