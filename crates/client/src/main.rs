//! JumpJump co-op replay client.
//!
//! Plays one peer of a co-op session against a recorded message stream.
//! Inbound messages are read as JSON lines from a file (or stdin when no
//! path is given) and delivered in order, one frame per line. Everything the
//! peer would send to the remote side is written to stdout as JSON lines;
//! logs go to stderr (and to `JUMPJUMP_LOG_DIR/replay.log` when set).
//!
//! # Examples
//!
//! ```bash
//! JUMPJUMP_ROLE=client JUMPJUMP_SEED=42 \
//!     cargo run -p jumpjump-client -- recorded.jsonl > outbound.jsonl
//! ```
mod logging;
mod replay;
mod sink;

use anyhow::{Context, Result};
use jumpjump_runtime::{CoopRuntime, RuntimeConfig};

use crate::replay::{Replay, ReplayConfig};
use crate::sink::StdoutSink;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let _log_guard = logging::setup_logging()?;

    let runtime_config = RuntimeConfig::from_env();
    let replay_config = ReplayConfig::from_env(std::env::args().nth(1));

    tracing::info!("Starting JumpJump replay");
    tracing::info!("Role: {}", runtime_config.authority);
    tracing::info!("Seed: {}", runtime_config.seed);
    tracing::info!("Frame step: {}ms", replay_config.frame_ms);

    let runtime = CoopRuntime::builder()
        .config(runtime_config)
        .sink(StdoutSink::new())
        .build()
        .await
        .context("failed to start runtime")?;

    let summary = Replay::new(runtime.handle(), replay_config).run().await?;

    tracing::info!(
        "Replayed {} messages ({} applied, {} skipped, {} malformed)",
        summary.lines,
        summary.applied,
        summary.skipped,
        summary.malformed
    );
    tracing::info!(
        "Final scene: {} enemies, {} coins, {} power-ups, {} sprites",
        summary.enemies,
        summary.coins,
        summary.power_ups,
        summary.sprites
    );

    runtime.shutdown().await?;
    Ok(())
}
