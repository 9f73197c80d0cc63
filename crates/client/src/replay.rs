//! Feeds a recorded message stream into a running peer.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use jumpjump_core::{ApplyOutcome, ReconcileOutcome, Timestamp};
use jumpjump_runtime::{RuntimeError, RuntimeHandle};

/// Replay settings.
#[derive(Debug, Clone)]
pub struct ReplayConfig {
    /// JSON-lines file to read; `None` reads stdin.
    pub source: Option<PathBuf>,
    /// Scene time advanced after each delivered line.
    pub frame_ms: u64,
}

impl ReplayConfig {
    pub const DEFAULT_FRAME_MS: u64 = 16;

    /// Environment variables:
    /// - `JUMPJUMP_REPLAY_FRAME_MS` - Scene time per line (default: 16)
    pub fn from_env(source: Option<String>) -> Self {
        let frame_ms = std::env::var("JUMPJUMP_REPLAY_FRAME_MS")
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(Self::DEFAULT_FRAME_MS);

        Self {
            source: source.map(PathBuf::from),
            frame_ms,
        }
    }
}

/// Counters reported once the stream is exhausted.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReplaySummary {
    pub lines: usize,
    pub applied: usize,
    pub skipped: usize,
    pub malformed: usize,
    pub enemies: usize,
    pub coins: usize,
    pub power_ups: usize,
    pub sprites: usize,
}

pub struct Replay {
    handle: RuntimeHandle,
    config: ReplayConfig,
}

impl Replay {
    pub fn new(handle: RuntimeHandle, config: ReplayConfig) -> Self {
        Self { handle, config }
    }

    pub async fn run(self) -> Result<ReplaySummary> {
        match self.config.source.clone() {
            Some(path) => {
                let file = tokio::fs::File::open(&path)
                    .await
                    .with_context(|| format!("failed to open {}", path.display()))?;
                self.run_from(BufReader::new(file)).await
            }
            None => self.run_from(BufReader::new(tokio::io::stdin())).await,
        }
    }

    /// Delivers every line of `reader` in order. Blank lines and lines
    /// starting with `#` are ignored; malformed messages are counted and skipped.
    pub async fn run_from<R>(self, reader: R) -> Result<ReplaySummary>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut summary = ReplaySummary::default();
        let mut lines = reader.lines();
        let mut now = 0u64;

        while let Some(line) = lines.next_line().await.context("failed to read input")? {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            summary.lines += 1;

            match self.handle.deliver_json(line).await {
                Ok(outcome) if had_effect(&outcome) => summary.applied += 1,
                Ok(_) => summary.skipped += 1,
                Err(RuntimeError::Decode(_)) => summary.malformed += 1,
                Err(e) => return Err(e.into()),
            }

            now += self.config.frame_ms;
            let frame = self.handle.advance(Timestamp(now)).await?;
            for id in &frame.expired {
                tracing::debug!("{} expired at {}ms", id, now);
            }
        }

        let scene = self.handle.query_scene().await?;
        summary.enemies = scene.enemies.len();
        summary.coins = scene.coins.len();
        summary.power_ups = scene.power_ups.len();
        summary.sprites = scene.sprites.len();
        Ok(summary)
    }
}

fn had_effect(outcome: &ApplyOutcome) -> bool {
    match outcome {
        ApplyOutcome::Entity(entity) => !matches!(entity, ReconcileOutcome::Skipped { .. }),
        ApplyOutcome::FullSync(_) => true,
        ApplyOutcome::Hit(hit) => hit.is_applied(),
        ApplyOutcome::HitReportIgnored => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jumpjump_runtime::{CoopRuntime, RuntimeConfig};

    fn config() -> ReplayConfig {
        ReplayConfig {
            source: None,
            frame_ms: 250,
        }
    }

    #[tokio::test]
    async fn replays_spawn_death_and_collection() {
        let runtime = CoopRuntime::builder()
            .config(RuntimeConfig::client())
            .build()
            .await
            .unwrap();

        let input = br#"
# level start
{"event":"enemy_state","data":{"enemy_id":"e1","x":10,"y":10,"health":20,"is_alive":true}}
{"event":"coin_state","data":{"coin_id":"coin_1","x":50,"y":60,"value":2}}
{"event":"enemy_state","data":{"enemy_id":"e1","x":10,"y":10,"health":0,"is_alive":false}}
{"event":"coin_state","data":{"coin_id":"coin_1","x":50,"y":60,"is_collected":true}}
not json
{"event":"enemy_hit","data":{"enemy_id":"e1","damage":5,"by":"One"}}
"#;

        let summary = Replay::new(runtime.handle(), config())
            .run_from(&input[..])
            .await
            .unwrap();

        assert_eq!(summary.lines, 6);
        assert_eq!(summary.applied, 4);
        assert_eq!(summary.malformed, 1);
        assert_eq!(summary.skipped, 1);
        // Three frames after the death outlast the linger: the enemy has expired.
        assert_eq!(summary.enemies, 0);
        assert_eq!(summary.coins, 0);
        assert_eq!(summary.sprites, 0);
    }

    #[tokio::test]
    async fn reads_messages_from_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recorded.jsonl");
        std::fs::write(
            &path,
            "{\"event\":\"power_up_state\",\"data\":{\"powerup_id\":\"powerup_1\",\"x\":1,\"y\":2,\"type\":\"extra_life\"}}\n",
        )
        .unwrap();

        let runtime = CoopRuntime::builder()
            .config(RuntimeConfig::client())
            .build()
            .await
            .unwrap();
        let config = ReplayConfig {
            source: Some(path),
            ..config()
        };
        let summary = Replay::new(runtime.handle(), config).run().await.unwrap();

        assert_eq!(summary.lines, 1);
        assert_eq!(summary.power_ups, 1);
        assert_eq!(summary.sprites, 1);
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let runtime = CoopRuntime::builder().build().await.unwrap();
        let config = ReplayConfig {
            source: Some("/nonexistent/recorded.jsonl".into()),
            ..config()
        };
        assert!(Replay::new(runtime.handle(), config).run().await.is_err());
    }
}
