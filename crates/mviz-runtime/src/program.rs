#![forbid(unsafe_code)]

//! Threaded driver for hosts that run on wall-clock time.
//!
//! [`Program`] owns a [`Visualizer`] and a [`SubscriptionManager`]. After
//! every message it reconciles the declared subscriptions, so a ticker
//! thread exists exactly while playback is running. Tick messages come back
//! through the same channel and are applied on the caller's thread, which
//! keeps the controller single-writer.

use std::time::Duration;

use mviz_render::Frame;
use tracing::{debug, info_span};
use web_time::Instant;

use crate::error::ControllerError;
use crate::subscription::{SharedInterval, SubscriptionManager};
use crate::visualizer::{Msg, Visualizer};

/// How a [`Program::run_until_stopped`] loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Playback stopped on its own (completed or paused by an observer).
    Stopped,
    /// The time budget ran out while still playing.
    TimedOut,
}

pub struct Program {
    visualizer: Visualizer,
    interval: SharedInterval,
    subscriptions: SubscriptionManager<Msg>,
}

impl Program {
    pub fn new(visualizer: Visualizer) -> Self {
        let interval = SharedInterval::new(visualizer.controller().tick_interval());
        let mut program = Self {
            visualizer,
            interval,
            subscriptions: SubscriptionManager::new(),
        };
        program.reconcile();
        program
    }

    pub fn visualizer(&self) -> &Visualizer {
        &self.visualizer
    }

    /// Current frame for the visualizer's viewport.
    pub fn frame(&mut self) -> &Frame {
        self.visualizer.frame()
    }

    /// Number of ticker threads currently running.
    pub fn running_tickers(&self) -> usize {
        self.subscriptions.active_ids().len()
    }

    /// Apply a host message and reconcile tickers.
    pub fn dispatch(&mut self, msg: Msg) -> Result<(), ControllerError> {
        let result = self.visualizer.update(msg);
        self.reconcile();
        result
    }

    /// Apply every tick that has already arrived. Returns how many were handled.
    pub fn pump(&mut self) -> usize {
        let messages = self.subscriptions.drain_messages();
        self.apply(messages)
    }

    /// Wait up to `timeout` for the next tick, then apply it and anything
    /// queued behind it.
    pub fn wait(&mut self, timeout: Duration) -> usize {
        let Some(first) = self.subscriptions.recv_timeout(timeout) else {
            return 0;
        };
        let mut messages = vec![first];
        messages.extend(self.subscriptions.drain_messages());
        self.apply(messages)
    }

    /// Keep applying ticks until playback stops or `budget` elapses.
    ///
    /// `on_change` runs after every batch that changed visible state.
    pub fn run_until_stopped(
        &mut self,
        budget: Duration,
        mut on_change: impl FnMut(&mut Visualizer),
    ) -> RunOutcome {
        let _span = info_span!("run", rows = self.visualizer.controller().rows()).entered();
        let deadline = Instant::now() + budget;
        while self.visualizer.controller().is_playing() {
            let now = Instant::now();
            if now >= deadline {
                return RunOutcome::TimedOut;
            }
            let before = self.visualizer.revision();
            self.wait(deadline - now);
            if self.visualizer.revision() != before {
                on_change(&mut self.visualizer);
            }
        }
        RunOutcome::Stopped
    }

    /// Stop every ticker and hand back the visualizer.
    pub fn shutdown(mut self) -> Visualizer {
        self.subscriptions.stop_all();
        debug!("program shut down");
        let Self { visualizer, .. } = self;
        visualizer
    }

    fn apply(&mut self, messages: Vec<Msg>) -> usize {
        let count = messages.len();
        for msg in messages {
            // Tick messages cannot be rejected.
            let _ = self.visualizer.update(msg);
        }
        if count > 0 {
            self.reconcile();
        }
        count
    }

    fn reconcile(&mut self) {
        self.interval
            .set(self.visualizer.controller().tick_interval());
        let subs = self.visualizer.subscriptions(&self.interval);
        self.subscriptions.reconcile(subs);
    }
}

impl std::fmt::Debug for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Program")
            .field("visualizer", &self.visualizer)
            .field("interval", &self.interval.get())
            .field("tickers", &self.subscriptions.active_ids())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VisualizerConfig;

    fn fast_program(rows: usize) -> Program {
        let config = VisualizerConfig {
            rows,
            interval_ms: 5,
            ..VisualizerConfig::default()
        };
        Program::new(Visualizer::new(&config).unwrap())
    }

    #[test]
    fn ticker_exists_only_while_playing() {
        let mut program = fast_program(3);
        assert_eq!(program.running_tickers(), 0);
        program.dispatch(Msg::Play).unwrap();
        assert_eq!(program.running_tickers(), 1);
        program.dispatch(Msg::Pause).unwrap();
        assert_eq!(program.running_tickers(), 0);
    }

    #[test]
    fn runs_to_completion_and_stops_ticker() {
        let mut program = fast_program(3);
        program.dispatch(Msg::Play).unwrap();
        let outcome = program.run_until_stopped(Duration::from_secs(5), |_| {});
        assert_eq!(outcome, RunOutcome::Stopped);
        assert!(program.visualizer().controller().is_complete());
        assert_eq!(program.running_tickers(), 0);
    }

    #[test]
    fn shutdown_returns_visualizer() {
        let mut program = fast_program(4);
        program.dispatch(Msg::Step).unwrap();
        program.dispatch(Msg::Play).unwrap();
        let visualizer = program.shutdown();
        assert_eq!(visualizer.controller().step(), Some(0));
    }

    #[test]
    fn rejected_dispatch_reports_error() {
        let mut program = fast_program(4);
        assert!(program.dispatch(Msg::SetSpeed(0.0)).is_err());
        assert!(program.dispatch(Msg::SetRows(99)).is_err());
        assert_eq!(program.visualizer().controller().rows(), 4);
    }
}
