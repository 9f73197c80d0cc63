//! Worker tasks that back the runtime orchestration.
//!
//! A single sync worker owns the scene; every command reaches it through
//! one queue so messages and frames are applied in order.

mod sync;

pub use sync::{Command, Pickup, SyncWorker, WorkerSettings};
