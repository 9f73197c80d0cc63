//! Runtime configuration and its environment loader.
use std::env;
use std::path::PathBuf;

use jumpjump_core::{Authority, SyncConfig};

use crate::repository::{self, FileStore};

/// Runtime configuration shared across the orchestrator and worker.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub sync: SyncConfig,
    pub authority: Authority,
    /// Seed for the shared RNG; both peers must agree on it.
    pub seed: u32,
    /// Name used for per-player progress keys.
    pub player_name: String,
    /// Scene time between full-sync snapshots on the host. Zero disables them.
    pub full_sync_interval_ms: u64,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    pub save_data: SaveLocation,
}

/// Where the builder keeps progress when no repository is supplied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SaveLocation {
    /// Progress is not persisted.
    #[default]
    Disabled,
    /// [`FileStore::default_path`].
    PlatformDefault,
    /// [`FileStore::FILE_NAME`] inside this directory.
    Dir(PathBuf),
}

impl SaveLocation {
    /// Path of the progress file, or `None` when persistence is disabled.
    pub fn file_path(&self) -> repository::Result<Option<PathBuf>> {
        match self {
            Self::Disabled => Ok(None),
            Self::PlatformDefault => FileStore::default_path().map(Some),
            Self::Dir(dir) => Ok(Some(dir.join(FileStore::FILE_NAME))),
        }
    }
}

impl RuntimeConfig {
    pub const DEFAULT_FULL_SYNC_INTERVAL_MS: u64 = 2_000;
    pub const DEFAULT_PLAYER_NAME: &'static str = "player";

    pub fn host() -> Self {
        Self {
            authority: Authority::Host,
            ..Self::default()
        }
    }

    pub fn client() -> Self {
        Self {
            authority: Authority::Client,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_sync(mut self, sync: SyncConfig) -> Self {
        self.sync = sync;
        self
    }

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `JUMPJUMP_ROLE` - `host` or `client` (default: host)
    /// - `JUMPJUMP_SEED` - Shared RNG seed (default: 0)
    /// - `JUMPJUMP_PLAYER_NAME` - Name for progress keys (default: player)
    /// - `JUMPJUMP_SNAP_THRESHOLD` - Snap distance in pixels (default: 50)
    /// - `JUMPJUMP_LERP_FACTOR` - Interpolation factor in (0, 1) (default: 0.3)
    /// - `JUMPJUMP_INVINCIBILITY_MS` - Hit invincibility window (default: 500)
    /// - `JUMPJUMP_DEATH_LINGER_MS` - Dead enemy removal delay (default: 600)
    /// - `JUMPJUMP_FRIENDLY_FIRE` - Teammates can hurt each other (default: false)
    /// - `JUMPJUMP_DEBUG_INVINCIBLE` - Players take no damage (default: false)
    /// - `JUMPJUMP_FULL_SYNC_INTERVAL_MS` - Host snapshot interval (default: 2000)
    /// - `JUMPJUMP_EVENT_BUFFER` - Event channel capacity (default: 100)
    /// - `JUMPJUMP_COMMAND_BUFFER` - Command queue size (default: 32)
    /// - `JUMPJUMP_SAVE_DIR` - Directory for progress data (default: platform-specific)
    /// - `JUMPJUMP_PERSIST` - Set to false to keep progress in memory only (default: true)
    ///
    /// Unparsable values are ignored and leave the default in place.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(authority) = read_env::<Authority>("JUMPJUMP_ROLE") {
            config.authority = authority;
        }
        if let Some(seed) = read_env::<u32>("JUMPJUMP_SEED") {
            config.seed = seed;
        }
        if let Ok(name) = env::var("JUMPJUMP_PLAYER_NAME")
            && !name.trim().is_empty()
        {
            config.player_name = name.trim().to_owned();
        }

        // Sync tuning
        if let Some(threshold) = read_env::<f32>("JUMPJUMP_SNAP_THRESHOLD") {
            config.sync.snap_threshold = threshold;
        }
        if let Some(factor) = read_env::<f32>("JUMPJUMP_LERP_FACTOR") {
            config.sync.lerp_factor = factor;
        }
        if let Some(window) = read_env::<u64>("JUMPJUMP_INVINCIBILITY_MS") {
            config.sync.invincibility_ms = window;
        }
        if let Some(linger) = read_env::<u64>("JUMPJUMP_DEATH_LINGER_MS") {
            config.sync.death_linger_ms = linger;
        }
        if let Some(enable) = read_env::<bool>("JUMPJUMP_FRIENDLY_FIRE") {
            config.sync.friendly_fire = enable;
        }
        if let Some(enable) = read_env::<bool>("JUMPJUMP_DEBUG_INVINCIBLE") {
            config.sync.debug_invincible = enable;
        }

        // Worker configuration
        if let Some(interval) = read_env::<u64>("JUMPJUMP_FULL_SYNC_INTERVAL_MS") {
            config.full_sync_interval_ms = interval;
        }
        if let Some(capacity) = read_env::<usize>("JUMPJUMP_EVENT_BUFFER") {
            config.event_buffer_size = capacity.max(1);
        }
        if let Some(capacity) = read_env::<usize>("JUMPJUMP_COMMAND_BUFFER") {
            config.command_buffer_size = capacity.max(1);
        }

        config.save_data = if read_env::<bool>("JUMPJUMP_PERSIST") == Some(false) {
            SaveLocation::Disabled
        } else {
            env::var_os("JUMPJUMP_SAVE_DIR")
                .map_or(SaveLocation::PlatformDefault, |dir| SaveLocation::Dir(dir.into()))
        };

        config
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            sync: SyncConfig::default(),
            authority: Authority::Host,
            seed: 0,
            player_name: Self::DEFAULT_PLAYER_NAME.to_owned(),
            full_sync_interval_ms: Self::DEFAULT_FULL_SYNC_INTERVAL_MS,
            event_buffer_size: 100,
            command_buffer_size: 32,
            save_data: SaveLocation::Disabled,
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_location_has_no_file() {
        assert_eq!(SaveLocation::Disabled.file_path().unwrap(), None);
        assert_eq!(RuntimeConfig::default().save_data, SaveLocation::Disabled);
    }

    #[test]
    fn directory_override_uses_progress_file_name() {
        let dir = PathBuf::from("/tmp/jumpjump-saves");
        assert_eq!(
            SaveLocation::Dir(dir.clone()).file_path().unwrap(),
            Some(dir.join(FileStore::FILE_NAME))
        );
    }

    #[test]
    fn platform_default_matches_file_store() {
        assert_eq!(
            SaveLocation::PlatformDefault.file_path().ok().flatten(),
            FileStore::default_path().ok()
        );
    }
}
