use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use snafu::Snafu;

use crate::filesystem::{NodePath, is_valid_name};

/// Represents a node of the virtual namespace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FilesystemNode {
    Folder {
        #[serde(default)]
        children: BTreeMap<String, FilesystemNode>,
    },
    File {},
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
    Folder,
    File,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Folder => write!(f, "folder"),
            NodeKind::File => write!(f, "file"),
        }
    }
}

impl FilesystemNode {
    pub fn empty_folder() -> Self {
        FilesystemNode::Folder {
            children: BTreeMap::new(),
        }
    }

    pub fn file() -> Self {
        FilesystemNode::File {}
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            FilesystemNode::Folder { .. } => NodeKind::Folder,
            FilesystemNode::File {} => NodeKind::File,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, FilesystemNode::Folder { .. })
    }

    pub fn children(&self) -> Option<&BTreeMap<String, FilesystemNode>> {
        match self {
            FilesystemNode::Folder { children } => Some(children),
            FilesystemNode::File {} => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut BTreeMap<String, FilesystemNode>> {
        match self {
            FilesystemNode::Folder { children } => Some(children),
            FilesystemNode::File {} => None,
        }
    }

    /// Number of nodes in this subtree, the node itself included.
    pub fn node_count(&self) -> usize {
        1 + self
            .children()
            .map(|children| children.values().map(FilesystemNode::node_count).sum())
            .unwrap_or(0)
    }

    fn validate_children(&self, path: &NodePath) -> Result<(), TreeValidationError> {
        let Some(children) = self.children() else {
            return Ok(());
        };
        for (name, child) in children {
            if !is_valid_name(name) {
                return Err(TreeValidationError::InvalidName {
                    parent: path.to_string(),
                    name: name.clone(),
                });
            }
            child.validate_children(&path.join(name))?;
        }
        Ok(())
    }
}

/// The whole namespace. The root is stored under the `/` key when serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tree {
    #[serde(rename = "/")]
    root: FilesystemNode,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// A tree holding only an empty root folder
    pub fn new() -> Self {
        Self {
            root: FilesystemNode::empty_folder(),
        }
    }

    pub fn root(&self) -> &FilesystemNode {
        &self.root
    }

    /// Walks from the root following each segment of `path`.
    /// Fails when a segment is missing or an intermediate node is a file.
    pub fn get(&self, path: &NodePath) -> Option<&FilesystemNode> {
        path.segments()
            .iter()
            .try_fold(&self.root, |current, segment| current.children()?.get(segment))
    }

    pub fn get_mut(&mut self, path: &NodePath) -> Option<&mut FilesystemNode> {
        let mut current = &mut self.root;
        for segment in path.segments() {
            current = current.children_mut()?.get_mut(segment)?;
        }
        Some(current)
    }

    /// Checks the structural invariants a deserialized tree may violate:
    /// the root must be a folder and every name must be a valid segment.
    pub fn validate(&self) -> Result<(), TreeValidationError> {
        if !self.root.is_folder() {
            return Err(TreeValidationError::RootNotFolder);
        }
        self.root.validate_children(&NodePath::root())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parses a stored tree. Nesting depth is unbounded.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut json_deserializer = serde_json::Deserializer::from_str(json);
        json_deserializer.disable_recursion_limit();
        let tree = Tree::deserialize(serde_stacker::Deserializer::new(&mut json_deserializer))?;
        json_deserializer.end()?;
        Ok(tree)
    }
}

#[derive(Debug, Snafu)]
pub enum TreeValidationError {
    #[snafu(display("The root node is not a folder"))]
    RootNotFolder,
    #[snafu(display("Invalid name '{}' inside {}", name, parent))]
    InvalidName { parent: String, name: String },
}
