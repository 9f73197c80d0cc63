//! High-level runtime orchestrator.
//!
//! The runtime owns the sync worker, wires up command/event channels, and
//! exposes a builder-based API for embedding one peer of a co-op session.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::info;

use jumpjump_core::SceneState;

use crate::api::{NullSink, OutboundSink, Result, RuntimeError, RuntimeHandle};
use crate::config::RuntimeConfig;
use crate::events::{EventBus, SyncEvent};
use crate::repository::{FileStore, ProgressRepository};
use crate::workers::{Command, SyncWorker, WorkerSettings};

/// One peer of a co-op session.
///
/// [`CoopRuntime`] owns the worker; [`RuntimeHandle`] provides a cloneable
/// façade for clients.
pub struct CoopRuntime {
    handle: RuntimeHandle,
    worker_handle: JoinHandle<()>,
}

impl CoopRuntime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Subscribe to sync events on every topic
    pub fn subscribe_events(&self) -> broadcast::Receiver<SyncEvent> {
        self.handle.subscribe_events()
    }

    /// Shutdown the runtime gracefully
    ///
    /// The worker stops once every outstanding handle clone is dropped.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);
        self.worker_handle.await.map_err(RuntimeError::WorkerJoin)
    }
}

/// Builder for [`CoopRuntime`].
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    sink: Option<Arc<dyn OutboundSink>>,
    progress: Option<ProgressRepository>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            sink: None,
            progress: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Where outbound messages go. Defaults to [`NullSink`].
    pub fn sink(mut self, sink: impl OutboundSink + 'static) -> Self {
        self.sink = Some(Arc::new(sink));
        self
    }

    /// Persist progress through `progress`.
    ///
    /// Without it, progress goes to a [`FileStore`] at `config.save_data`,
    /// unless that is
    /// [`SaveLocation::Disabled`](crate::SaveLocation::Disabled).
    pub fn progress(mut self, progress: ProgressRepository) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Build the runtime
    pub async fn build(self) -> Result<CoopRuntime> {
        let config = self.config;
        if let Err(e) = config.sync.validate() {
            let e = RuntimeError::from(e);
            e.log("Sync configuration");
            return Err(e);
        }

        let progress = match self.progress {
            Some(progress) => Some(progress),
            None => match config.save_data.file_path()? {
                Some(path) => {
                    info!("Saving progress to {}", path.display());
                    Some(ProgressRepository::new(Arc::new(FileStore::open(path)?)))
                }
                None => None,
            },
        };

        let mut scene = SceneState::new(config.authority, config.sync.clone(), config.seed);
        if let Some(progress) = &progress {
            let bought = progress.take_purchased_lives()?;
            if bought > 0 {
                info!("Adding {} purchased lives to {}", bought, scene.local_slot);
                let player = scene.player_mut(scene.local_slot);
                player.lives = player.lives.saturating_add(bought);
            }
        }

        let (command_tx, command_rx) = mpsc::channel::<Command>(config.command_buffer_size.max(1));
        let event_bus = EventBus::with_capacity(config.event_buffer_size);
        let handle = RuntimeHandle::new(command_tx, event_bus.clone());

        let sink = self
            .sink
            .unwrap_or_else(|| Arc::new(NullSink) as Arc<dyn OutboundSink>);
        let worker = SyncWorker::new(
            scene,
            command_rx,
            event_bus,
            sink,
            progress,
            WorkerSettings {
                player_name: config.player_name,
                full_sync_interval_ms: config.full_sync_interval_ms,
            },
        );

        let worker_handle = tokio::spawn(async move {
            worker.run().await;
        });

        Ok(CoopRuntime {
            handle,
            worker_handle,
        })
    }
}
