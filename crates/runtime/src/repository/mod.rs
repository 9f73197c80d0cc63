//! Repository layer for local player progress.
//!
//! Progress is a flat string key-value store, the way a browser's local
//! storage holds it:
//! - [`KeyValueStore`] is the storage contract
//! - [`InMemoryStore`] and [`FileStore`] implement it
//! - [`ProgressRepository`] gives typed access to the known keys

mod error;
mod file;
mod memory;
mod progress;
mod traits;

pub use error::{RepositoryError, Result};
pub use file::FileStore;
pub use memory::InMemoryStore;
pub use progress::{ProgressRepository, keys};
pub use traits::KeyValueStore;
