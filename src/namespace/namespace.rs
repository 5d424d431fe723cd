use snafu::ResultExt;
use tracing::{info, warn};

use crate::filesystem::{FilesystemNode, NodePath, Tree};
use crate::namespace::error::PersistFailureSnafu;
use crate::namespace::{NamespaceError, operations};
use crate::storage::KeyValueStore;
use crate::store::{TreeStore, resolve};

/// The loaded tree together with the store it is persisted to.
///
/// Each successful mutation is followed by a full save. When the save fails
/// the mutation stays applied in memory and
/// [`NamespaceError::PersistFailure`] is returned.
#[derive(Debug)]
pub struct Namespace<S> {
    store: TreeStore<S>,
    tree: Tree,
}

impl<S: KeyValueStore> Namespace<S> {
    /// Loads the tree from `store`, falling back to an empty root.
    pub fn open(mut store: TreeStore<S>) -> Self {
        let tree = store.load();
        info!(
            "Opened namespace '{}' with {} nodes",
            store.key(),
            tree.root().node_count()
        );
        Self { store, tree }
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn store(&self) -> &TreeStore<S> {
        &self.store
    }

    pub fn resolve(&self, path: &NodePath) -> Result<&FilesystemNode, NamespaceError> {
        resolve(&self.tree, path)
    }

    pub fn list_children(
        &self,
        path: &NodePath,
    ) -> Result<Vec<(&str, &FilesystemNode)>, NamespaceError> {
        operations::list_children(&self.tree, path)
    }

    pub fn navigate(&self, from: &NodePath, into: &str) -> Result<NodePath, NamespaceError> {
        operations::navigate(&self.tree, from, into)
    }

    pub fn create_folder(&mut self, parent: &NodePath, name: &str) -> Result<(), NamespaceError> {
        operations::create_folder(&mut self.tree, parent, name)?;
        self.persist()
    }

    pub fn create_file(&mut self, parent: &NodePath, name: &str) -> Result<(), NamespaceError> {
        operations::create_file(&mut self.tree, parent, name)?;
        self.persist()
    }

    pub fn rename(
        &mut self,
        parent: &NodePath,
        from: &str,
        to: &str,
    ) -> Result<(), NamespaceError> {
        operations::rename(&mut self.tree, parent, from, to)?;
        self.persist()
    }

    pub fn delete(&mut self, parent: &NodePath, name: &str) -> Result<(), NamespaceError> {
        operations::delete(&mut self.tree, parent, name)?;
        self.persist()
    }

    pub fn move_node(
        &mut self,
        from: &NodePath,
        name: &str,
        to: &NodePath,
    ) -> Result<(), NamespaceError> {
        operations::move_node(&mut self.tree, from, name, to)?;
        self.persist()
    }

    /// Saves the current tree. Retrying after a `PersistFailure` is safe.
    pub fn persist(&mut self) -> Result<(), NamespaceError> {
        self.store
            .save(&self.tree)
            .inspect_err(|e| warn!("Failed to persist namespace: {}", e))
            .context(PersistFailureSnafu)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{DirectoryStore, MemoryStore, StoreError};
    use std::cell::Cell;
    use std::io;
    use std::path::PathBuf;
    use tempfile::TempDir;

    /// Backend whose writes can be switched off
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryStore,
        offline: Cell<bool>,
    }

    impl KeyValueStore for FlakyStore {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
            if self.offline.get() {
                return Err(StoreError::Io {
                    path: PathBuf::from(key),
                    source: io::Error::other("quota exceeded"),
                });
            }
            self.inner.set(key, value)
        }
    }

    fn reopen(namespace: &Namespace<MemoryStore>) -> Namespace<MemoryStore> {
        Namespace::open(TreeStore::new(namespace.store().backend().clone()))
    }

    #[test]
    fn mutations_are_persisted() {
        let mut namespace = Namespace::open(TreeStore::new(MemoryStore::new()));
        let root = NodePath::root();

        namespace.create_folder(&root, "Docs").unwrap();
        namespace.create_file(&NodePath::parse("/Docs"), "a.txt").unwrap();
        namespace.rename(&root, "Docs", "Papers").unwrap();

        let reopened = reopen(&namespace);
        assert_eq!(reopened.tree(), namespace.tree());
        assert!(reopened.resolve(&NodePath::parse("/Papers/a.txt")).is_ok());
    }

    #[test]
    fn deeply_nested_folders_survive_reopen() {
        let mut namespace = Namespace::open(TreeStore::new(MemoryStore::new()));
        let mut parent = NodePath::root();
        for level in 0..70 {
            let name = format!("d{level}");
            namespace.create_folder(&parent, &name).unwrap();
            parent = parent.join(&name);
        }

        let reopened = reopen(&namespace);

        assert_eq!(reopened.tree(), namespace.tree());
        assert_eq!(reopened.tree().root().node_count(), 71);
        assert!(reopened.resolve(&parent).is_ok());
    }

    #[test]
    fn failed_mutation_does_not_write() {
        let mut namespace = Namespace::open(TreeStore::new(MemoryStore::new()));
        namespace.create_folder(&NodePath::root(), "Docs").unwrap();
        let writes = namespace.store().backend().writes();

        assert!(namespace.create_folder(&NodePath::root(), "Docs").is_err());
        assert!(namespace.delete(&NodePath::root(), "missing").is_err());

        assert_eq!(namespace.store().backend().writes(), writes);
    }

    #[test]
    fn noop_rename_does_not_write() {
        let mut namespace = Namespace::open(TreeStore::new(MemoryStore::new()));
        namespace.create_folder(&NodePath::root(), "Docs").unwrap();
        let writes = namespace.store().backend().writes();

        namespace.rename(&NodePath::root(), "Docs", "Docs").unwrap();

        assert_eq!(namespace.store().backend().writes(), writes);
    }

    #[test]
    fn persist_failure_keeps_the_change_in_memory() {
        let mut namespace = Namespace::open(TreeStore::new(FlakyStore::default()));
        namespace.store().backend().offline.set(true);

        let result = namespace.create_folder(&NodePath::root(), "Docs");

        match result {
            Err(error @ NamespaceError::PersistFailure { .. }) => assert!(error.is_degraded()),
            other => panic!("Expected PersistFailure, got {:?}", other),
        }
        assert!(namespace.resolve(&NodePath::parse("/Docs")).is_ok());
        assert_eq!(namespace.store().backend().inner.get("shareplaceFS").unwrap(), None);

        namespace.store().backend().offline.set(false);
        namespace.persist().unwrap();
        assert!(
            namespace
                .store()
                .backend()
                .inner
                .get("shareplaceFS")
                .unwrap()
                .is_some_and(|json| json.contains("Docs"))
        );
    }

    #[test]
    fn directory_backed_namespace_survives_reload() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let open = || Namespace::open(TreeStore::new(DirectoryStore::new(temp_dir.path())));

        let mut first = open();
        first.create_folder(&NodePath::root(), "A").unwrap();
        first.create_folder(&NodePath::parse("/A"), "B").unwrap();
        first.create_file(&NodePath::parse("/A/B"), "c.txt").unwrap();
        first.delete(&NodePath::parse("/A/B"), "c.txt").unwrap();

        let second = open();
        assert_eq!(second.tree(), first.tree());
        assert!(second.resolve(&NodePath::parse("/A/B")).is_ok());
        assert!(second.resolve(&NodePath::parse("/A/B/c.txt")).is_err());
    }
}
