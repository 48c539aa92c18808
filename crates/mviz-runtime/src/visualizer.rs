#![forbid(unsafe_code)]

//! Host-facing core: one owner for controller state, styles, and the last frame.
//!
//! A host feeds [`Msg`] values into [`Visualizer::update`] (button presses,
//! slider changes, resizes, ticks), pushes elapsed time through
//! [`Visualizer::advance_time`] when it drives the clock itself, and asks for
//! [`Visualizer::frame`] whenever it wants to paint.
//!
//! The stylesheet is resolved once at construction and again only when the
//! theme mode changes. Frames are cached by state revision, viewport and
//! mode, so a resize or theme switch always produces a fresh frame at the
//! new dimensions.

use std::time::Duration;

use mviz_core::{Cell, Point, Progress, Viewport};
use mviz_render::{Frame, RenderInput, TriangleLayout, render_triangle};
use mviz_style::{StyleSheet, Theme, ThemeMode};
use tracing::debug;

use crate::clock::TickSchedule;
use crate::config::VisualizerConfig;
use crate::controller::{
    Advance, AnimationController, ControllerSettings, ObserverId, Playback, TickEpoch,
};
use crate::error::ControllerError;
use crate::subscription::{Every, SharedInterval, SubId, Subscription};

/// Every input the visualizer reacts to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Msg {
    Play,
    Pause,
    /// Play/pause button.
    Toggle,
    /// Manual "next step".
    Step,
    Reset,
    /// Row-count slider.
    SetRows(usize),
    /// Speed multiplier slider.
    SetSpeed(f64),
    Resize(Viewport),
    SetTheme(ThemeMode),
    /// Auto-advance tick carrying the epoch that armed it.
    Tick(TickEpoch),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FrameKey {
    revision: u64,
    width: u32,
    height: u32,
    mode: ThemeMode,
}

impl FrameKey {
    fn new(revision: u64, viewport: Viewport, mode: ThemeMode) -> Self {
        Self {
            revision,
            width: viewport.width.to_bits(),
            height: viewport.height.to_bits(),
            mode,
        }
    }
}

/// Controller plus everything needed to paint it.
#[derive(Debug)]
pub struct Visualizer {
    controller: AnimationController,
    schedule: TickSchedule,
    theme: Theme,
    sheet: StyleSheet,
    viewport: Viewport,
    revision: u64,
    cache: Option<(FrameKey, Frame)>,
}

impl Visualizer {
    /// Build from a validated configuration.
    pub fn new(config: &VisualizerConfig) -> Result<Self, ControllerError> {
        Self::with_theme(config, Theme::default())
    }

    /// Build with a custom palette.
    pub fn with_theme(config: &VisualizerConfig, theme: Theme) -> Result<Self, ControllerError> {
        let settings = ControllerSettings {
            min_rows: config.min_rows,
            max_rows: config.max_rows,
            base_interval: Duration::from_millis(config.interval_ms),
        };
        let mut controller = AnimationController::new(settings, config.rows)?;
        controller.set_speed(config.speed)?;
        let sheet = StyleSheet::resolve(&theme, config.theme);
        Ok(Self {
            controller,
            schedule: TickSchedule::new(),
            theme,
            sheet,
            viewport: Viewport::new(config.width, config.height),
            revision: 0,
            cache: None,
        })
    }

    #[inline]
    pub fn controller(&self) -> &AnimationController {
        &self.controller
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[inline]
    pub fn theme_mode(&self) -> ThemeMode {
        self.sheet.mode()
    }

    pub fn progress(&self) -> Progress {
        self.controller.progress()
    }

    /// Monotonic counter bumped on every visible state change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Monotonic time seen by the host-driven tick schedule.
    pub fn now(&self) -> Duration {
        self.schedule.now()
    }

    /// Apply one message.
    ///
    /// Rejected row counts and speeds leave the state untouched and are
    /// returned as errors for the host to surface.
    pub fn update(&mut self, msg: Msg) -> Result<(), ControllerError> {
        let changed = match msg {
            Msg::Play => {
                self.controller.play();
                true
            }
            Msg::Pause => {
                self.controller.pause();
                true
            }
            Msg::Toggle => {
                self.controller.toggle();
                true
            }
            Msg::Step => {
                self.controller.advance_one();
                true
            }
            Msg::Reset => {
                self.controller.reset();
                true
            }
            Msg::SetRows(rows) => {
                self.controller.set_row_count(rows)?;
                true
            }
            Msg::SetSpeed(speed) => {
                self.controller.set_speed(speed)?;
                false
            }
            Msg::Resize(viewport) => {
                debug!(width = viewport.width, height = viewport.height, "resize");
                self.viewport = viewport;
                false
            }
            Msg::SetTheme(mode) => {
                if mode != self.sheet.mode() {
                    self.sheet = StyleSheet::resolve(&self.theme, mode);
                }
                false
            }
            Msg::Tick(epoch) => self.controller.tick(epoch).is_some(),
        };
        self.schedule.sync(&self.controller);
        if changed {
            self.revision += 1;
        }
        Ok(())
    }

    /// Push host time forward, firing any ticks that fall due.
    pub fn advance_time(&mut self, dt: Duration) -> Vec<Advance> {
        let fired = self.schedule.advance(dt, &mut self.controller);
        if !fired.is_empty() {
            self.revision += 1;
        }
        fired
    }

    /// Jump to the next pending tick and fire it.
    ///
    /// Returns `None` when playback is stopped.
    pub fn advance_to_next_tick(&mut self) -> Option<(Duration, Advance)> {
        let fired = self.schedule.fire_next(&mut self.controller);
        if fired.is_some() {
            self.revision += 1;
        }
        fired
    }

    /// Render the current state at an arbitrary size and mode.
    pub fn render(&self, viewport: Viewport, mode: ThemeMode) -> Frame {
        let resolved;
        let sheet = if mode == self.sheet.mode() {
            &self.sheet
        } else {
            resolved = StyleSheet::resolve(&self.theme, mode);
            &resolved
        };
        let input = RenderInput {
            triangle: self.controller.triangle(),
            step: self.controller.step(),
            active: self.controller.active_cell(),
            viewport,
        };
        render_triangle(&input, sheet)
    }

    /// Frame for the current viewport and theme, re-rendered only when stale.
    pub fn frame(&mut self) -> &Frame {
        let mode = self.sheet.mode();
        let key = FrameKey::new(self.revision, self.viewport, mode);
        let entry = match self.cache.take() {
            Some((cached, frame)) if cached == key => (cached, frame),
            _ => (key, self.render(self.viewport, mode)),
        };
        &self.cache.insert(entry).1
    }

    /// Cell under a pointer position in the current viewport.
    pub fn hit_test(&self, point: Point) -> Option<Cell> {
        TriangleLayout::compute(self.controller.rows(), self.viewport)?.hit_test(point)
    }

    /// The ticker a threaded host should be running right now.
    pub fn subscriptions(&self, interval: &SharedInterval) -> Vec<Box<dyn Subscription<Msg>>> {
        match (self.controller.playback(), self.controller.live_epoch()) {
            (Playback::Playing, Some(epoch)) => {
                let id: SubId = TICK_SUB_TAG ^ epoch.get();
                vec![Box::new(Every::with_shared(id, interval.clone(), move || {
                    Msg::Tick(epoch)
                }))]
            }
            _ => Vec::new(),
        }
    }

    pub fn on_progress(&mut self, observer: impl FnMut(Progress) + Send + 'static) -> ObserverId {
        self.controller.on_progress(observer)
    }

    pub fn on_complete(&mut self, observer: impl FnMut() + Send + 'static) -> ObserverId {
        self.controller.on_complete(observer)
    }

    pub fn remove_observer(&mut self, id: ObserverId) -> bool {
        self.controller.remove_observer(id)
    }
}

const TICK_SUB_TAG: SubId = 0x5449_434B_0000_0000;
