//! Runtime orchestration for one peer of a JumpJump co-op session.
//!
//! This crate wraps the deterministic sync rules of `jumpjump-core` in an
//! async worker that owns the scene, forwards outbound messages to a
//! transport, publishes events, and persists player progress. Consumers embed
//! [`CoopRuntime`] and interact with it through [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`config`] loads runtime settings from the environment
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`repository`] stores progress across sessions
//! - `workers` keeps the background task internal to the crate
pub mod api;
pub mod config;
pub mod events;
pub mod repository;
pub mod runtime;

mod workers;

pub use api::{
    ChannelSink, NullSink, OutboundSink, Result, RuntimeError, RuntimeHandle, SinkError,
};
pub use config::{RuntimeConfig, SaveLocation};
pub use events::{EventBus, RemovalReason, SyncEvent, Topic};
pub use repository::{
    FileStore, InMemoryStore, KeyValueStore, ProgressRepository, RepositoryError, keys,
};
pub use runtime::{CoopRuntime, RuntimeBuilder};
