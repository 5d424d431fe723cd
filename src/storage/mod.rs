//! Persistence backends.
//!
//! The namespace is persisted as a single string value under one reserved key
//! of a [`KeyValueStore`]. Two implementations are provided:
//!
//! - [`MemoryStore`]: process-local, used by tests and ephemeral sessions
//! - [`DirectoryStore`]: one file per key inside a directory on disk

mod directory_store;
mod key_value_store;
mod memory_store;

pub use directory_store::DirectoryStore;
pub use key_value_store::{KeyValueStore, StoreError, validate_key};
pub(crate) use key_value_store::SerializeSnafu;
pub use memory_store::MemoryStore;
