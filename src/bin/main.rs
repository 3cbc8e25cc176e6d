//! CLI entry point for Task Monitor (taskmon)

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::info;

use taskmonlib::config::Config;

#[derive(Parser)]
#[command(name = "taskmon")]
#[command(about = "Task Monitor: an interactive terminal dashboard for processes, performance, app history and startup apps", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the configuration file (default: ./taskmon.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the render tick, in milliseconds
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Override the system metric sampling interval, in seconds
    #[arg(long)]
    perf_interval: Option<f64>,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => match Config::load_from(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("taskmon: cannot load {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => Config::load(),
    };
    if let Some(ms) = cli.tick_ms {
        config.general.tick_ms = ms;
    }
    if let Some(secs) = cli.perf_interval {
        config.general.perf_interval_secs = secs;
    }
    info!(
        "starting dashboard: tick={}ms perf_interval={}s",
        config.general.tick_ms, config.general.perf_interval_secs
    );

    if let Err(e) = taskmonlib::tui::run(config) {
        eprintln!("taskmon: {}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
