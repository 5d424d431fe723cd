//! Ownership of the persisted tree: load/save lifecycle and path resolution.

mod fingerprint;
mod tree_store;

pub use fingerprint::TreeFingerprint;
pub use tree_store::{DEFAULT_STORAGE_KEY, TreeStore, resolve, resolve_mut};
