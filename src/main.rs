//! Match Replay CLI
//!
//! Replays a directory of numbered event files and prints the final state
//! summary and winner report as JSON.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use match_replay::{
    config::{AfterEnd, ReplayConfig},
    game::report::Metric,
    DirectorySource, MatchReplay, VERSION,
};

#[cfg(feature = "debug-tracing")]
const DEFAULT_FILTER: &str = "debug";
#[cfg(not(feature = "debug-tracing"))]
const DEFAULT_FILTER: &str = "info";

#[derive(Parser)]
#[command(name = "match-replay", version)]
#[command(about = "Rebuild match state from numbered telemetry event files", long_about = None)]
struct Cli {
    /// Directory of `<n>.json` event files (default: $MATCH_REPLAY_DATA_DIR or ./data)
    data_dir: Option<PathBuf>,

    /// Handling of events after MATCH_END: "apply" or "ignore"
    #[arg(long)]
    after_end: Option<AfterEnd>,

    /// Print the report on a single line
    #[arg(long)]
    compact: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging (stderr, so stdout stays machine-readable)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    let mut config = ReplayConfig::from_env().context("Invalid environment configuration")?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    if let Some(after_end) = cli.after_end {
        config.after_end = after_end;
    }
    if cli.compact {
        config.pretty = false;
    }

    info!("Match Replay v{}", VERSION);
    info!("Data directory: {}", config.data_dir.display());
    info!("After-end policy: {}", config.after_end);

    let mut source = DirectorySource::open(&config.data_dir)
        .with_context(|| format!("Cannot open event directory {}", config.data_dir.display()))?;
    info!("{} event files queued", source.remaining());

    let mut replay = MatchReplay::new(config.after_end);
    replay.replay_source(&mut source);

    let summary = replay.summary();
    info!("=== Match Results ===");
    match summary.phase {
        Some(phase) => info!("Final phase: {}", phase),
        None => info!("Final phase: <none>"),
    }
    for metric in Metric::ALL {
        let record = summary.winner.get(metric);
        match &record.leader {
            Some(leader) => info!("{:?}: {} ({})", metric, leader, record.value),
            None => info!("{:?}: no leader", metric),
        }
    }
    info!("Final State Hash: {}", summary.state_hash);

    let json = if config.pretty {
        serde_json::to_string_pretty(&summary)
    } else {
        serde_json::to_string(&summary)
    }
    .context("Failed to serialize summary")?;
    println!("{}", json);

    Ok(())
}
