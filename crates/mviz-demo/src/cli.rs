#![forbid(unsafe_code)]

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use clap::Parser;
use mviz_render::ascii::rasterize;
use mviz_runtime::{Msg, Program, RunOutcome, Visualizer, VisualizerConfig};
use mviz_style::ThemeMode;
use tracing::{info, warn};

use crate::error::Result;

#[derive(Debug, Parser)]
#[command(
    name = "mviz",
    about = "Step through Pascal's triangle one cell at a time",
    version
)]
pub struct Cli {
    /// Number of rows (overrides config and MVIZ_ROWS).
    #[arg(short, long)]
    pub rows: Option<usize>,

    /// Speed multiplier for auto-advance.
    #[arg(short, long)]
    pub speed: Option<f64>,

    /// Viewport width in pixels.
    #[arg(long)]
    pub width: Option<f32>,

    /// Viewport height in pixels.
    #[arg(long)]
    pub height: Option<f32>,

    /// Color theme: light or dark.
    #[arg(long)]
    pub theme: Option<ThemeMode>,

    /// TOML or JSON config file.
    #[arg(long, env = "MVIZ_CONFIG")]
    pub config: Option<PathBuf>,

    /// Manual advances before anything else.
    #[arg(long, default_value_t = 0)]
    pub steps: usize,

    /// Auto-play to the end on a simulated clock.
    #[arg(long)]
    pub play: bool,

    /// With --play, tick on wall-clock time using a ticker thread.
    #[arg(long, requires = "play")]
    pub live: bool,

    /// Give up on --live playback after this many seconds.
    #[arg(long, default_value_t = 120)]
    pub timeout_secs: u64,

    /// Raster width in characters.
    #[arg(long, default_value_t = 72)]
    pub cols: usize,

    /// Raster height in lines.
    #[arg(long, default_value_t = 24)]
    pub lines: usize,

    /// Print progress lines only.
    #[arg(short, long)]
    pub quiet: bool,
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    crate::logging::init(cli.quiet);
    let stdout = io::stdout();
    run(&cli, &mut stdout.lock())
}

/// Resolve the configuration: file, then `MVIZ_*` variables, then flags.
pub fn resolve_config(cli: &Cli) -> Result<VisualizerConfig> {
    let base = match &cli.config {
        Some(path) => VisualizerConfig::from_file(path)?,
        None => VisualizerConfig::default(),
    };
    let mut config = base.apply_env();
    if let Some(rows) = cli.rows {
        config.rows = rows;
    }
    if let Some(speed) = cli.speed {
        config.speed = speed;
    }
    if let Some(width) = cli.width {
        config.width = width;
    }
    if let Some(height) = cli.height {
        config.height = height;
    }
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
    config.validate()?;
    Ok(config)
}

pub fn run(cli: &Cli, out: &mut dyn Write) -> Result<()> {
    let config = resolve_config(cli)?;
    let mut visualizer = Visualizer::new(&config)?;
    let completions = Arc::new(AtomicUsize::new(0));
    let sink = Arc::clone(&completions);
    visualizer.on_complete(move || {
        sink.fetch_add(1, Ordering::Relaxed);
    });

    info!(rows = config.rows, speed = config.speed, theme = %config.theme, "starting");
    emit(out, &mut visualizer, cli, "start")?;

    for i in 1..=cli.steps {
        visualizer.update(Msg::Step)?;
        emit(out, &mut visualizer, cli, &format!("step {i}"))?;
    }

    if cli.play {
        visualizer.update(Msg::Play)?;
        visualizer = if cli.live {
            play_live(visualizer, cli, out)?
        } else {
            while let Some((at, _)) = visualizer.advance_to_next_tick() {
                emit(out, &mut visualizer, cli, &format!("t={}ms", at.as_millis()))?;
            }
            visualizer
        };
    }

    if completions.load(Ordering::Relaxed) > 0 {
        let progress = visualizer.progress();
        writeln!(
            out,
            "complete: {} rows, {} cells revealed",
            visualizer.controller().rows(),
            progress.total
        )?;
    }
    Ok(())
}

fn play_live(visualizer: Visualizer, cli: &Cli, out: &mut dyn Write) -> Result<Visualizer> {
    let mut program = Program::new(visualizer);
    let mut failure = None;
    let mut tick = 0usize;
    let outcome = program.run_until_stopped(Duration::from_secs(cli.timeout_secs), |v| {
        tick += 1;
        if failure.is_none() {
            failure = emit(out, v, cli, &format!("tick {tick}")).err();
        }
    });
    let visualizer = program.shutdown();
    if let Some(err) = failure {
        return Err(err.into());
    }
    if outcome == RunOutcome::TimedOut {
        warn!(timeout_secs = cli.timeout_secs, "live playback timed out");
    }
    Ok(visualizer)
}

fn emit(out: &mut dyn Write, visualizer: &mut Visualizer, cli: &Cli, label: &str) -> io::Result<()> {
    let progress = visualizer.progress();
    match visualizer.controller().active_addition() {
        Some(addition) => writeln!(out, "[{label}] {progress}  {addition}")?,
        None => writeln!(out, "[{label}] {progress}")?,
    }
    if !cli.quiet {
        let raster = rasterize(visualizer.frame(), cli.cols, cli.lines);
        writeln!(out, "{raster}")?;
    }
    Ok(())
}
