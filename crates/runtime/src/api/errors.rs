//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination, persistence, wire decoding and
//! the outbound transport so clients can bubble them up with context.
use thiserror::Error;
use tokio::sync::oneshot;

use jumpjump_core::{ConfigError, ErrorSeverity, GameError, SpawnError};

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("sync worker command channel closed")]
    CommandChannelClosed,

    #[error("sync worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("sync worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("invalid sync configuration")]
    Config(#[from] ConfigError),

    #[error("spawn rejected")]
    Spawn(#[from] SpawnError),

    #[error("malformed network message")]
    Decode(#[source] serde_json::Error),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl RuntimeError {
    /// Severity of errors raised by the game rules; `None` for runtime failures.
    pub fn severity(&self) -> Option<ErrorSeverity> {
        match self {
            Self::Config(e) => Some(e.severity()),
            Self::Spawn(e) => Some(e.severity()),
            _ => None,
        }
    }

    /// Stable identifier of errors raised by the game rules.
    pub fn error_code(&self) -> Option<&'static str> {
        match self {
            Self::Config(e) => Some(e.error_code()),
            Self::Spawn(e) => Some(e.error_code()),
            _ => None,
        }
    }

    /// Logs at a level matching the error's severity.
    pub(crate) fn log(&self, context: &str) {
        let code = self.error_code().unwrap_or("RUNTIME");
        match self.severity() {
            Some(ErrorSeverity::Recoverable) => {
                tracing::debug!(code, "{} rejected: {}", context, self)
            }
            Some(ErrorSeverity::Validation) => tracing::warn!(code, "{} rejected: {}", context, self),
            Some(ErrorSeverity::Internal) | None => {
                tracing::error!(code, "{} failed: {}", context, self)
            }
        }
    }
}

/// Failures of an [`OutboundSink`](super::OutboundSink).
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("outbound transport closed")]
    Closed,

    #[error("failed to encode outbound message")]
    Encode(#[source] serde_json::Error),

    #[error("transport error: {0}")]
    Transport(String),
}
