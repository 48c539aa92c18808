#![forbid(unsafe_code)]

//! Animation controller: the single owner of reveal state.
//!
//! The controller holds the current [`Triangle`], the last revealed step and
//! whether playback is running. Every mutation goes through `&mut self`, so a
//! host that funnels input events and tick messages through one owner gets
//! the one-writer discipline for free.
//!
//! # Ticks and cancellation
//!
//! Each transition into [`Playback::Playing`] mints a fresh [`TickEpoch`].
//! Tick sources (the deterministic [`crate::TickSchedule`] or the threaded
//! [`crate::subscription::Every`]) carry the epoch they were armed with, and
//! [`AnimationController::tick`] ignores anything but the live epoch. Pausing,
//! resetting, completing, or changing the row count retires the epoch, so a
//! tick that was already in flight can never reveal a cell afterwards.
//!
//! # Example
//! ```
//! use mviz_runtime::{Advance, AnimationController, ControllerSettings};
//!
//! let mut controller = AnimationController::new(ControllerSettings::default(), 3).unwrap();
//! assert_eq!(controller.progress().to_string(), "0/6 (0%)");
//!
//! for _ in 0..4 {
//!     controller.advance_one();
//! }
//! assert!(matches!(controller.advance_one(), Advance::Revealed(cell) if cell.row == 2 && cell.col == 1));
//! assert_eq!(controller.active_addition().unwrap().to_string(), "1 + 1 = 2");
//! ```

use std::fmt;
use std::time::Duration;

use mviz_core::{Addition, Cell, Progress, RowCount, Triangle};
use tracing::{debug, info, trace, warn};

use crate::error::ControllerError;

/// Whether auto-advance is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Playback {
    #[default]
    Stopped,
    Playing,
}

/// Identity of one run of auto-advance.
///
/// Ticks tagged with an epoch other than the live one are stale and ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TickEpoch(u64);

impl TickEpoch {
    /// Raw epoch number, useful as a subscription id.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TickEpoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "epoch#{}", self.0)
    }
}

/// What a single advance did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Revealed this cell.
    Revealed(Cell),
    /// Revealed the final cell while playing; playback has stopped.
    Completed(Cell),
    /// Already at the last step; nothing changed.
    Saturated,
}

impl Advance {
    /// The newly revealed cell, if any.
    #[must_use]
    pub const fn cell(self) -> Option<Cell> {
        match self {
            Self::Revealed(cell) | Self::Completed(cell) => Some(cell),
            Self::Saturated => None,
        }
    }
}

/// Handle returned by observer registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// Limits the controller enforces on host input.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerSettings {
    /// Smallest row count `set_row_count` accepts.
    pub min_rows: usize,
    /// Largest row count `set_row_count` accepts.
    pub max_rows: usize,
    /// Tick interval at speed 1.0.
    pub base_interval: Duration,
}

impl ControllerSettings {
    /// Default interval between reveals at speed 1.0.
    pub const BASE_INTERVAL: Duration = Duration::from_millis(600);
    /// Slowest accepted speed multiplier.
    pub const MIN_SPEED: f64 = 0.05;
    /// Fastest accepted speed multiplier.
    pub const MAX_SPEED: f64 = 20.0;

    /// Effective row bounds after intersecting with the model's own limits.
    #[must_use]
    pub fn row_bounds(&self) -> (usize, usize) {
        (
            self.min_rows.max(RowCount::MIN),
            self.max_rows.min(RowCount::MAX_SUPPORTED),
        )
    }
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            min_rows: 2,
            max_rows: 10,
            base_interval: Self::BASE_INTERVAL,
        }
    }
}

type ProgressObserver = Box<dyn FnMut(Progress) + Send>;
type CompleteObserver = Box<dyn FnMut() + Send>;

/// Reveal state machine for one triangle.
pub struct AnimationController {
    settings: ControllerSettings,
    triangle: Triangle,
    step: Option<usize>,
    playback: Playback,
    speed: f64,
    next_epoch: u64,
    live_epoch: Option<TickEpoch>,
    next_observer: u64,
    progress_observers: Vec<(ObserverId, ProgressObserver)>,
    complete_observers: Vec<(ObserverId, CompleteObserver)>,
}

impl fmt::Debug for AnimationController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationController")
            .field("rows", &self.triangle.row_count().get())
            .field("step", &self.step)
            .field("playback", &self.playback)
            .field("speed", &self.speed)
            .field("live_epoch", &self.live_epoch)
            .field("observers", &(self.progress_observers.len() + self.complete_observers.len()))
            .finish()
    }
}

impl AnimationController {
    /// Create a stopped controller with nothing revealed.
    pub fn new(settings: ControllerSettings, rows: usize) -> Result<Self, ControllerError> {
        let row_count = validate_rows(&settings, rows)?;
        Ok(Self {
            settings,
            triangle: Triangle::build(row_count),
            step: None,
            playback: Playback::Stopped,
            speed: 1.0,
            next_epoch: 0,
            live_epoch: None,
            next_observer: 0,
            progress_observers: Vec::new(),
            complete_observers: Vec::new(),
        })
    }

    // --- queries -----------------------------------------------------------

    /// The triangle currently being revealed.
    #[inline]
    #[must_use]
    pub fn triangle(&self) -> &Triangle {
        &self.triangle
    }

    #[inline]
    #[must_use]
    pub fn rows(&self) -> usize {
        self.triangle.row_count().get()
    }

    #[inline]
    #[must_use]
    pub fn total_steps(&self) -> usize {
        self.triangle.total_steps()
    }

    /// Last revealed step, `None` before the first reveal.
    #[inline]
    #[must_use]
    pub fn step(&self) -> Option<usize> {
        self.step
    }

    /// Last revealed step with `-1` meaning nothing revealed.
    #[must_use]
    pub fn step_index(&self) -> i64 {
        self.progress().step_index()
    }

    #[inline]
    #[must_use]
    pub fn playback(&self) -> Playback {
        self.playback
    }

    #[inline]
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.playback == Playback::Playing
    }

    #[inline]
    #[must_use]
    pub fn speed(&self) -> f64 {
        self.speed
    }

    #[must_use]
    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    /// Interval between auto-advance ticks at the current speed.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        // Whole nanoseconds so 600ms at 2x is exactly 300ms.
        let nanos = self.settings.base_interval.as_nanos() as f64 / self.speed;
        Duration::from_nanos(nanos.round() as u64)
    }

    /// Epoch that ticks must carry to be honoured, `None` when stopped.
    #[inline]
    #[must_use]
    pub fn live_epoch(&self) -> Option<TickEpoch> {
        self.live_epoch
    }

    #[must_use]
    pub fn progress(&self) -> Progress {
        Progress::new(self.step, self.total_steps())
    }

    /// Whether the last step has been revealed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.progress().is_complete()
    }

    /// The most recently revealed cell.
    #[must_use]
    pub fn current_cell(&self) -> Option<Cell> {
        let step = self.step?;
        self.triangle.cell_at(step).ok()
    }

    /// The addition being explained: present only when the current cell is interior.
    #[must_use]
    pub fn active_addition(&self) -> Option<Addition> {
        self.current_cell()
            .and_then(|cell| self.triangle.addition(cell))
    }

    /// The interior cell whose addition is being shown.
    #[must_use]
    pub fn active_cell(&self) -> Option<Cell> {
        self.active_addition().map(|addition| addition.cell)
    }

    // --- commands ----------------------------------------------------------

    /// Rebuild the triangle with `rows` rows and start over.
    ///
    /// Out-of-range input is rejected and leaves the controller unchanged.
    pub fn set_row_count(&mut self, rows: usize) -> Result<(), ControllerError> {
        let row_count = match validate_rows(&self.settings, rows) {
            Ok(row_count) => row_count,
            Err(err) => {
                warn!(rows, error = %err, "rejected row count");
                return Err(err);
            }
        };
        self.stop_playback();
        self.triangle = Triangle::build(row_count);
        self.step = None;
        info!(rows, total = self.total_steps(), "row count changed");
        self.notify_progress();
        Ok(())
    }

    /// Reveal the next cell.
    ///
    /// At the final step this is a no-op that still re-announces progress.
    /// Reaching the final step while playing stops playback and fires the
    /// completion observers once.
    pub fn advance_one(&mut self) -> Advance {
        let total = self.total_steps();
        let next = self.step.map_or(0, |step| step + 1);
        let Ok(cell) = self.triangle.cell_at(next) else {
            trace!(step = ?self.step, total, "advance at final step");
            self.notify_progress();
            return Advance::Saturated;
        };
        self.step = Some(next);

        let completed = next + 1 == total && self.is_playing();
        if completed {
            self.stop_playback();
        }
        debug!(step = next, total, row = cell.row, col = cell.col, "revealed cell");
        self.notify_progress();

        if completed {
            info!(rows = self.rows(), total, "playback complete");
            for (_, observer) in &mut self.complete_observers {
                observer();
            }
            Advance::Completed(cell)
        } else {
            Advance::Revealed(cell)
        }
    }

    /// Start auto-advance.
    ///
    /// Returns the live epoch, or `None` when already at the final step (there
    /// is nothing left to play). Calling `play` while playing keeps the
    /// current epoch.
    pub fn play(&mut self) -> Option<TickEpoch> {
        if self.is_complete() {
            debug!(total = self.total_steps(), "play ignored at final step");
            return None;
        }
        if let Some(epoch) = self.live_epoch {
            return Some(epoch);
        }
        self.next_epoch += 1;
        let epoch = TickEpoch(self.next_epoch);
        self.playback = Playback::Playing;
        self.live_epoch = Some(epoch);
        debug!(%epoch, interval_ms = self.tick_interval().as_millis() as u64, "playback started");
        Some(epoch)
    }

    /// Stop auto-advance. Idempotent.
    pub fn pause(&mut self) {
        if self.is_playing() {
            debug!(step = ?self.step, "playback paused");
        }
        self.stop_playback();
    }

    /// Play when stopped, pause when playing.
    pub fn toggle(&mut self) -> Playback {
        if self.is_playing() {
            self.pause();
        } else {
            self.play();
        }
        self.playback
    }

    /// Hide every cell and stop playback.
    pub fn reset(&mut self) {
        self.stop_playback();
        self.step = None;
        debug!(total = self.total_steps(), "reset");
        self.notify_progress();
    }

    /// Change the speed multiplier.
    ///
    /// A pending tick keeps its deadline; the new interval applies from the
    /// next one on.
    pub fn set_speed(&mut self, speed: f64) -> Result<(), ControllerError> {
        let (min, max) = (ControllerSettings::MIN_SPEED, ControllerSettings::MAX_SPEED);
        if !speed.is_finite() || !(min..=max).contains(&speed) {
            warn!(speed, "rejected speed");
            return Err(ControllerError::InvalidSpeed { speed, min, max });
        }
        self.speed = speed;
        debug!(speed, interval_ms = self.tick_interval().as_millis() as u64, "speed changed");
        Ok(())
    }

    /// Deliver a tick. Stale epochs are ignored and return `None`.
    pub fn tick(&mut self, epoch: TickEpoch) -> Option<Advance> {
        if self.live_epoch != Some(epoch) {
            trace!(%epoch, live = ?self.live_epoch, "stale tick ignored");
            return None;
        }
        Some(self.advance_one())
    }

    // --- observers ---------------------------------------------------------

    /// Register a callback invoked with the new progress after every
    /// reveal, reset, or row-count change.
    pub fn on_progress(&mut self, observer: impl FnMut(Progress) + Send + 'static) -> ObserverId {
        let id = self.mint_observer();
        self.progress_observers.push((id, Box::new(observer)));
        id
    }

    /// Register a callback invoked once each time playback runs to the end.
    pub fn on_complete(&mut self, observer: impl FnMut() + Send + 'static) -> ObserverId {
        let id = self.mint_observer();
        self.complete_observers.push((id, Box::new(observer)));
        id
    }

    /// Remove a previously registered observer. Returns whether it was found.
    pub fn remove_observer(&mut self, id: ObserverId) -> bool {
        let before = self.progress_observers.len() + self.complete_observers.len();
        self.progress_observers.retain(|(oid, _)| *oid != id);
        self.complete_observers.retain(|(oid, _)| *oid != id);
        before != self.progress_observers.len() + self.complete_observers.len()
    }

    fn mint_observer(&mut self) -> ObserverId {
        self.next_observer += 1;
        ObserverId(self.next_observer)
    }

    fn notify_progress(&mut self) {
        let progress = self.progress();
        for (_, observer) in &mut self.progress_observers {
            observer(progress);
        }
    }

    fn stop_playback(&mut self) {
        self.playback = Playback::Stopped;
        self.live_epoch = None;
    }
}

fn validate_rows(settings: &ControllerSettings, rows: usize) -> Result<RowCount, ControllerError> {
    let (min, max) = settings.row_bounds();
    RowCount::within(rows, min, max).map_err(|_| ControllerError::InvalidRowCount {
        requested: rows,
        min,
        max,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tracing_test::traced_test;

    fn controller(rows: usize) -> AnimationController {
        AnimationController::new(ControllerSettings::default(), rows).unwrap()
    }

    fn recorder(controller: &mut AnimationController) -> Arc<Mutex<Vec<Progress>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        controller.on_progress(move |p| sink.lock().unwrap().push(p));
        seen
    }

    #[test]
    fn starts_stopped_with_nothing_revealed() {
        let c = controller(5);
        assert_eq!(c.step(), None);
        assert_eq!(c.step_index(), -1);
        assert_eq!(c.playback(), Playback::Stopped);
        assert_eq!(c.total_steps(), 15);
        assert_eq!(c.live_epoch(), None);
        assert!(c.active_addition().is_none());
    }

    #[test]
    fn construction_rejects_rows_outside_settings() {
        let err = AnimationController::new(ControllerSettings::default(), 11).unwrap_err();
        assert_eq!(
            err,
            ControllerError::InvalidRowCount {
                requested: 11,
                min: 2,
                max: 10
            }
        );
    }

    #[test]
    fn advance_walks_row_major() {
        let mut c = controller(3);
        let cells: Vec<_> = (0..6).filter_map(|_| c.advance_one().cell()).collect();
        let expected: Vec<_> = mviz_core::cells(3).collect();
        assert_eq!(cells, expected);
        assert_eq!(c.advance_one(), Advance::Saturated);
        assert_eq!(c.step(), Some(5));
    }

    #[test]
    fn saturated_advance_still_reports_progress() {
        let mut c = controller(2);
        for _ in 0..3 {
            c.advance_one();
        }
        let seen = recorder(&mut c);
        assert_eq!(c.advance_one(), Advance::Saturated);
        assert_eq!(seen.lock().unwrap().as_slice(), &[Progress::new(Some(2), 3)]);
    }

    #[test]
    fn manual_stepping_to_the_end_does_not_complete() {
        let mut c = controller(2);
        let done = Arc::new(Mutex::new(0));
        let sink = Arc::clone(&done);
        c.on_complete(move || *sink.lock().unwrap() += 1);
        for _ in 0..3 {
            c.advance_one();
        }
        assert!(c.is_complete());
        assert_eq!(*done.lock().unwrap(), 0);
    }

    #[test]
    fn ticks_run_to_completion_exactly_once() {
        let mut c = controller(3);
        let done = Arc::new(Mutex::new(0));
        let sink = Arc::clone(&done);
        c.on_complete(move || *sink.lock().unwrap() += 1);

        let epoch = c.play().unwrap();
        let mut results = Vec::new();
        while let Some(advance) = c.tick(epoch) {
            results.push(advance);
        }
        assert_eq!(results.len(), 6);
        assert!(matches!(results[5], Advance::Completed(cell) if cell == Cell::new(2, 2)));
        assert_eq!(c.playback(), Playback::Stopped);
        assert_eq!(*done.lock().unwrap(), 1);

        // The retired epoch and a fresh play both do nothing.
        assert_eq!(c.tick(epoch), None);
        assert_eq!(c.play(), None);
        assert_eq!(*done.lock().unwrap(), 1);
    }

    #[test]
    fn pause_retires_the_epoch() {
        let mut c = controller(4);
        let epoch = c.play().unwrap();
        c.tick(epoch);
        c.pause();
        assert_eq!(c.tick(epoch), None);
        assert_eq!(c.step(), Some(0));

        let resumed = c.play().unwrap();
        assert_ne!(resumed, epoch);
        assert!(c.tick(resumed).is_some());
        assert_eq!(c.step(), Some(1));
    }

    #[test]
    fn play_while_playing_keeps_epoch() {
        let mut c = controller(4);
        let first = c.play().unwrap();
        assert_eq!(c.play(), Some(first));
    }

    #[test]
    fn toggle_flips_playback() {
        let mut c = controller(4);
        assert_eq!(c.toggle(), Playback::Playing);
        assert_eq!(c.toggle(), Playback::Stopped);
    }

    #[test]
    fn reset_hides_everything_and_stops() {
        let mut c = controller(4);
        let epoch = c.play().unwrap();
        c.tick(epoch);
        c.tick(epoch);
        let seen = recorder(&mut c);
        c.reset();
        assert_eq!(c.step(), None);
        assert_eq!(c.playback(), Playback::Stopped);
        assert_eq!(c.tick(epoch), None);
        assert_eq!(seen.lock().unwrap().as_slice(), &[Progress::new(None, 10)]);
    }

    #[test]
    fn set_row_count_rebuilds_and_stops() {
        let mut c = controller(4);
        let epoch = c.play().unwrap();
        c.tick(epoch);
        let seen = recorder(&mut c);
        c.set_row_count(6).unwrap();
        assert_eq!(c.rows(), 6);
        assert_eq!(c.total_steps(), 21);
        assert_eq!(c.step(), None);
        assert_eq!(c.tick(epoch), None);
        assert_eq!(seen.lock().unwrap().as_slice(), &[Progress::new(None, 21)]);
    }

    #[test]
    fn rejected_row_count_leaves_state_alone() {
        let mut c = controller(4);
        c.advance_one();
        let seen = recorder(&mut c);
        assert!(c.set_row_count(1).is_err());
        assert!(c.set_row_count(0).is_err());
        assert_eq!(c.rows(), 4);
        assert_eq!(c.step(), Some(0));
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn speed_scales_interval() {
        let mut c = controller(4);
        assert_eq!(c.tick_interval(), Duration::from_millis(600));
        c.set_speed(2.0).unwrap();
        assert_eq!(c.tick_interval(), Duration::from_millis(300));
        c.set_speed(0.5).unwrap();
        assert_eq!(c.tick_interval(), Duration::from_millis(1200));
    }

    #[test]
    fn invalid_speed_is_rejected() {
        let mut c = controller(4);
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY, 1000.0] {
            assert!(matches!(
                c.set_speed(bad),
                Err(ControllerError::InvalidSpeed { .. })
            ));
        }
        assert_eq!(c.speed(), 1.0);
    }

    #[test]
    fn speed_change_keeps_epoch() {
        let mut c = controller(4);
        let epoch = c.play().unwrap();
        c.set_speed(3.0).unwrap();
        assert_eq!(c.live_epoch(), Some(epoch));
    }

    #[test]
    fn active_addition_only_for_interior_current_cell() {
        let mut c = controller(4);
        // Steps 0..=3 are edges: (0,0) (1,0) (1,1) (2,0).
        for _ in 0..4 {
            c.advance_one();
            assert!(c.active_addition().is_none());
        }
        c.advance_one();
        let addition = c.active_addition().unwrap();
        assert_eq!(addition.cell, Cell::new(2, 1));
        assert_eq!(addition.to_string(), "1 + 1 = 2");
        c.advance_one();
        assert!(c.active_addition().is_none());
    }

    #[test]
    #[traced_test]
    fn completion_and_rejections_are_logged() {
        let mut c = controller(2);
        assert!(c.set_row_count(40).is_err());
        let epoch = c.play().unwrap();
        while c.tick(epoch).is_some() {}
        assert!(logs_contain("rejected row count"));
        assert!(logs_contain("playback complete"));
    }

    #[test]
    fn removed_observer_is_not_called() {
        let mut c = controller(3);
        let count = Arc::new(Mutex::new(0));
        let sink = Arc::clone(&count);
        let id = c.on_progress(move |_| *sink.lock().unwrap() += 1);
        c.advance_one();
        assert!(c.remove_observer(id));
        assert!(!c.remove_observer(id));
        c.advance_one();
        assert_eq!(*count.lock().unwrap(), 1);
    }

    #[test]
    fn progress_observers_see_post_mutation_state() {
        let mut c = controller(3);
        let seen = recorder(&mut c);
        c.advance_one();
        c.advance_one();
        let steps: Vec<_> = seen.lock().unwrap().iter().map(|p| p.display_step()).collect();
        assert_eq!(steps, vec![1, 2]);
    }
}
