//! Replay a scripted walk through the abbey

use abbey::{AbbeyConfig, SimulationState};
use anyhow::{Context, Result};
use clap::Parser;
use game::{JsonPresenter, LogPresenter, Presenter, ReplayRuntime, Script};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "abbey-walk")]
#[command(about = "Replay scripted input through the abbey walk simulation", long_about = None)]
struct Args {
    /// Input script (TOML, a list of [[steps]])
    #[arg(value_name = "SCRIPT")]
    script: PathBuf,

    /// Scene and tuning configuration (TOML); built-in abbey if omitted
    #[arg(long, short = 'c', value_name = "PATH")]
    config: Option<PathBuf>,

    /// Simulated frames per second
    #[arg(long, default_value_t = 60.0)]
    fps: f32,

    /// Write JSON lines to stdout instead of logging
    #[arg(long)]
    json: bool,

    /// With --json, emit a frame snapshot for every tick
    #[arg(long, requires = "json")]
    frames: bool,

    /// Stop after this many ticks
    #[arg(long, value_name = "TICKS")]
    max_ticks: Option<u64>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => AbbeyConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AbbeyConfig::default(),
    };
    let script = Script::load(&args.script)?;
    tracing::info!(
        "Replaying {} steps ({} ticks) at {} fps",
        script.steps.len(),
        script.total_ticks(),
        args.fps
    );

    let sim = SimulationState::new(config).context("Failed to start simulation")?;
    let mut runtime = ReplayRuntime::new(sim, args.fps, args.max_ticks)?;

    let mut presenter: Box<dyn Presenter> = if args.json {
        Box::new(JsonPresenter::new(std::io::stdout().lock(), args.frames))
    } else {
        Box::new(LogPresenter)
    };

    let stats = runtime.run(&script, presenter.as_mut())?;
    tracing::info!(
        "{} ticks, {} events{}",
        stats.ticks,
        stats.events,
        if stats.truncated { " (truncated)" } else { "" }
    );
    Ok(())
}
