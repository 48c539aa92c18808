#![forbid(unsafe_code)]

//! Runtime for the Pascal's triangle visualizer.
//!
//! # Role in mviz
//! `mviz-runtime` owns the only mutable state in the system: which step of
//! the triangle has been revealed and whether auto-advance is running. It
//! wires that state to the pure render engine and to whatever clock the host
//! has.
//!
//! # Primary responsibilities
//! - **AnimationController**: reveal state machine with play/pause/step,
//!   speed, row-count changes, and progress/completion observers.
//! - **Tick cancellation**: every run of auto-advance gets a [`TickEpoch`];
//!   stale ticks are ignored.
//! - **TickSchedule**: deterministic host-driven time.
//! - **Subscriptions**: background ticker threads for wall-clock hosts.
//! - **Visualizer / Program**: message-driven host API with a cached frame.
//! - **VisualizerConfig**: defaults, TOML/JSON files, `MVIZ_*` overrides.
//!
//! # How it fits in the system
//! Hosts translate input into [`Msg`] values and hand them to a
//! [`Visualizer`] (single-threaded, host-driven clock) or a [`Program`]
//! (ticker threads). Both paint by asking for a [`mviz_render::Frame`].

pub mod clock;
pub mod config;
pub mod controller;
pub mod error;
pub mod program;
pub mod subscription;
pub mod visualizer;

pub use clock::{DeterministicClock, TickSchedule};
pub use config::VisualizerConfig;
pub use controller::{
    Advance, AnimationController, ControllerSettings, ObserverId, Playback, TickEpoch,
};
pub use error::{ConfigError, ControllerError};
pub use program::{Program, RunOutcome};
pub use subscription::{SharedInterval, StopSignal, SubId, Subscription, SubscriptionManager};
pub use visualizer::{Msg, Visualizer};

pub use mviz_core::{Cell, Progress, Viewport};
pub use mviz_style::ThemeMode;
