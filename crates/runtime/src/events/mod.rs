//! Topic-based event bus for runtime events.
//!
//! Every command the sync worker processes is summarised as one or more
//! [`SyncEvent`]s. Consumers subscribe to the topics they need, or to all of
//! them at once.

mod bus;
mod types;

pub use bus::{EventBus, Topic};
pub use types::{RemovalReason, SyncEvent};
