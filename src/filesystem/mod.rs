//! Filesystem tree representation of the virtual namespace.
//!
//! This module provides a tree-like structure where nodes can be either
//! folders (that can contain other nodes) or content-less files, together
//! with the [`NodePath`] type used to address them from the root.

mod path;
mod tree;

pub use path::{NodePath, SEPARATOR, is_valid_name};
pub use tree::{FilesystemNode, NodeKind, Tree, TreeValidationError};
