use snafu::ResultExt;
use tracing::{debug, info, warn};

use crate::filesystem::{FilesystemNode, NodePath, Tree};
use crate::namespace::NamespaceError;
use crate::storage::{KeyValueStore, SerializeSnafu, StoreError};
use crate::store::TreeFingerprint;

/// Key the namespace is stored under unless configured otherwise
pub const DEFAULT_STORAGE_KEY: &str = "shareplaceFS";

/// Owns the persistence backend and the lifecycle of the stored tree.
#[derive(Debug)]
pub struct TreeStore<S> {
    backend: S,
    key: String,
    last_saved: Option<TreeFingerprint>,
}

impl<S: KeyValueStore> TreeStore<S> {
    pub fn new(backend: S) -> Self {
        Self::with_key(backend, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(backend: S, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
            last_saved: None,
        }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Reads the tree from the backend.
    ///
    /// Absent, unreadable or structurally invalid state yields a fresh tree
    /// with an empty root; this never fails. A fresh tree is always written
    /// by the next save.
    pub fn load(&mut self) -> Tree {
        debug!("Reading namespace from key '{}'", self.key);
        self.last_saved = None;
        let json = match self.backend.get(&self.key) {
            Ok(Some(json)) => json,
            Ok(None) => {
                info!("No existing namespace found, starting fresh");
                return Tree::new();
            }
            Err(e) => {
                warn!("Failed to read the stored namespace, starting fresh: {}", e);
                return Tree::new();
            }
        };

        let tree = match Tree::from_json(&json) {
            Ok(tree) => tree,
            Err(e) => {
                warn!("Stored namespace is malformed, starting fresh: {}", e);
                return Tree::new();
            }
        };
        if let Err(e) = tree.validate() {
            warn!("Stored namespace is invalid, starting fresh: {}", e);
            return Tree::new();
        }

        self.last_saved = tree.to_json().ok().map(|json| TreeFingerprint::of(&json));
        debug!(
            "Successfully read namespace with {} nodes",
            tree.root().node_count()
        );
        tree
    }

    /// Serializes the whole tree and replaces the stored value.
    ///
    /// The backend is not touched when the serialized tree equals what was
    /// last loaded or saved.
    pub fn save(&mut self, tree: &Tree) -> Result<(), StoreError> {
        let json = tree.to_json().context(SerializeSnafu)?;
        let fingerprint = TreeFingerprint::of(&json);
        if self.last_saved == Some(fingerprint) {
            debug!("Namespace unchanged, skipping write");
            return Ok(());
        }

        self.backend.set(&self.key, &json)?;
        self.last_saved = Some(fingerprint);
        debug!("Saved namespace ({} bytes)", json.len());
        Ok(())
    }
}

/// Walks from the root to the node at `path`. Never creates nodes.
pub fn resolve<'t>(tree: &'t Tree, path: &NodePath) -> Result<&'t FilesystemNode, NamespaceError> {
    tree.get(path).ok_or_else(|| NamespaceError::NotFound {
        path: path.to_string(),
    })
}

pub fn resolve_mut<'t>(
    tree: &'t mut Tree,
    path: &NodePath,
) -> Result<&'t mut FilesystemNode, NamespaceError> {
    tree.get_mut(path).ok_or_else(|| NamespaceError::NotFound {
        path: path.to_string(),
    })
}
