use tracing::{debug, warn};

use crate::filesystem::{FilesystemNode, NodePath};
use crate::namespace::{Namespace, NamespaceError};
use crate::session::{Command, Outcome};
use crate::storage::KeyValueStore;
use crate::store::TreeStore;

const ROOT_LABEL: &str = "Root";

/// One user's view of the namespace: the tree and the folder being browsed.
#[derive(Debug)]
pub struct Session<S> {
    namespace: Namespace<S>,
    current: NodePath,
}

impl<S: KeyValueStore> Session<S> {
    /// Loads the tree from `store` and starts at the root.
    pub fn open(store: TreeStore<S>) -> Self {
        Self {
            namespace: Namespace::open(store),
            current: NodePath::root(),
        }
    }

    pub fn namespace(&self) -> &Namespace<S> {
        &self.namespace
    }

    pub fn current_path(&self) -> &NodePath {
        &self.current
    }

    /// Applies `command` relative to the current folder.
    pub fn dispatch(&mut self, command: Command) -> Result<Outcome, NamespaceError> {
        debug!("Dispatching {:?} at {}", command, self.current);
        let current = self.current.clone();
        match command {
            Command::Navigate { name } => {
                let target = self.namespace.navigate(&current, &name)?;
                Ok(self.move_to(target))
            }
            Command::NavigateTo { path } => {
                let node = self.namespace.resolve(&path)?;
                if !node.is_folder() {
                    return Err(NamespaceError::NotAFolder {
                        path: path.to_string(),
                    });
                }
                Ok(self.move_to(path))
            }
            Command::Up => {
                let parent = current.parent().unwrap_or_default();
                Ok(self.move_to(parent))
            }
            Command::CreateFolder { name } => self
                .namespace
                .create_folder(&current, &name)
                .map(|()| Outcome::Changed),
            Command::CreateFile { name } => self
                .namespace
                .create_file(&current, &name)
                .map(|()| Outcome::Changed),
            Command::Rename { from, to } => self
                .namespace
                .rename(&current, &from, &to)
                .map(|()| Outcome::Changed),
            Command::Delete { name } => self
                .namespace
                .delete(&current, &name)
                .map(|()| Outcome::Changed),
            Command::Move { name, destination } => self
                .namespace
                .move_node(&current, &name, &destination)
                .map(|()| Outcome::Changed),
        }
    }

    /// Children of the current folder in display order.
    ///
    /// When the current path no longer resolves to a folder the session
    /// falls back to the root first.
    pub fn listing(&mut self) -> Vec<(&str, &FilesystemNode)> {
        if let Err(e) = self.namespace.list_children(&self.current) {
            warn!("Cannot list {}, returning to root: {}", self.current, e);
            self.current = NodePath::root();
        }
        self.namespace
            .list_children(&self.current)
            .unwrap_or_default()
    }

    /// Prefix sequence of the current path with display labels, root first.
    pub fn breadcrumbs(&self) -> Vec<(&str, NodePath)> {
        let labels = std::iter::once(ROOT_LABEL)
            .chain(self.current.segments().iter().map(String::as_str));
        labels.zip(self.current.prefixes()).collect()
    }

    fn move_to(&mut self, path: NodePath) -> Outcome {
        self.current = path.clone();
        Outcome::Moved(path)
    }
}
