//! Robotank CLI - runs the sample arena without a window.

// Allow print in the CLI binary
#![allow(clippy::print_stdout)]

mod arena;
mod headless;
mod hunter;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use robotank_core::{ChannelLink, DirectLink, GameLoop, RendererLink, RunSummary, Scene, SimConfig, WorldSnapshot};
use tracing::{error, info};

use crate::headless::Headless;

/// How the renderer is connected to the game loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Transport {
    /// Render synchronously on the simulation thread.
    Direct,
    /// Render on a separate thread behind bounded channels.
    Threaded,
}

/// Robotank - programmable tank battles on a fixed-tick arena
#[derive(Parser, Debug)]
#[command(name = "robotank")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON configuration file (defaults apply to missing fields)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Ticks to run before stopping
    #[arg(short, long, default_value_t = 1000)]
    ticks: u64,

    /// Random seed (overrides the configuration)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Renderer transport
    #[arg(long, value_enum, default_value_t = Transport::Threaded)]
    transport: Transport,

    /// Minimum milliseconds per tick (overrides the configuration; 0 runs flat out)
    #[arg(long)]
    tick_floor_ms: Option<u64>,

    /// Log an arena summary every N ticks (0 disables)
    #[arg(long, default_value_t = 100)]
    report_every: u64,

    /// Print the final snapshot as JSON
    #[arg(long)]
    dump_snapshot: bool,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        error!(%info, ?backtrace, "panic");
    }));
}

fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = format!("{err:#}"), "robotank failed");
            ExitCode::FAILURE
        }
    }
}

fn load_config(args: &Args) -> anyhow::Result<SimConfig> {
    let mut config = match &args.config {
        Some(path) => SimConfig::from_path(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => SimConfig::default(),
    };
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    if let Some(ms) = args.tick_floor_ms {
        config = config.with_tick_floor(Duration::from_millis(ms));
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn run(args: &Args) -> anyhow::Result<()> {
    let config = load_config(args)?;
    let seed = config.seed;
    let mut scene = Scene::new(config).context("creating scene")?;
    let tanks = arena::populate(&mut scene).context("populating the arena")?;
    info!(seed, tanks, ticks = args.ticks, transport = ?args.transport, "arena ready");

    let renderer = Headless::new(args.ticks, args.report_every);
    let (summary, last) = match args.transport {
        Transport::Direct => drive(GameLoop::new(scene, DirectLink::new(renderer)))?,
        Transport::Threaded => drive(GameLoop::new(scene, ChannelLink::spawn(renderer)))?,
    };

    info!(
        ticks = summary.ticks,
        survivors = ?summary.survivors,
        "battle over"
    );
    if args.dump_snapshot {
        let json = serde_json::to_string_pretty(&last).context("serializing final snapshot")?;
        println!("{json}");
    }
    Ok(())
}

fn drive<L: RendererLink>(mut game: GameLoop<L>) -> anyhow::Result<(RunSummary, WorldSnapshot)> {
    let summary = game.run().context("game loop stopped with an error")?;
    Ok((summary, game.scene().snapshot()))
}
