//! Validated queries and mutations on an in-memory [`Tree`].
//!
//! Every mutation checks all of its preconditions before touching the tree,
//! so an `Err` always means the tree is unchanged. Persistence is layered on
//! top by [`Namespace`](crate::namespace::Namespace).

use std::collections::BTreeMap;

use tracing::debug;

use crate::filesystem::{FilesystemNode, NodePath, Tree, is_valid_name};
use crate::namespace::ordering::listing_order;
use crate::namespace::NamespaceError;
use crate::store::{resolve, resolve_mut};

/// Children of the folder at `path`, folders first then by name.
pub fn list_children<'t>(
    tree: &'t Tree,
    path: &NodePath,
) -> Result<Vec<(&'t str, &'t FilesystemNode)>, NamespaceError> {
    let children = folder_children(tree, path)?;
    let mut entries = children
        .iter()
        .map(|(name, node)| (name.as_str(), node))
        .collect::<Vec<_>>();
    entries.sort_by(listing_order);
    Ok(entries)
}

/// Returns `from` extended by `into`, which must name a folder.
pub fn navigate(tree: &Tree, from: &NodePath, into: &str) -> Result<NodePath, NamespaceError> {
    let children = folder_children(tree, from)?;
    let target = from.join(into);
    match children.get(into) {
        Some(node) if node.is_folder() => Ok(target),
        Some(_) => Err(NamespaceError::NotAFolder {
            path: target.to_string(),
        }),
        None => Err(NamespaceError::NotFound {
            path: target.to_string(),
        }),
    }
}

pub fn create_folder(tree: &mut Tree, parent: &NodePath, name: &str) -> Result<(), NamespaceError> {
    insert_new(tree, parent, name, FilesystemNode::empty_folder())
}

pub fn create_file(tree: &mut Tree, parent: &NodePath, name: &str) -> Result<(), NamespaceError> {
    insert_new(tree, parent, name, FilesystemNode::file())
}

/// Re-keys the child `from` of `parent` to `to`. Renaming to the same name
/// is a successful no-op.
pub fn rename(
    tree: &mut Tree,
    parent: &NodePath,
    from: &str,
    to: &str,
) -> Result<(), NamespaceError> {
    ensure_valid_name(to)?;
    let children = folder_children_mut(tree, parent)?;
    if !children.contains_key(from) {
        return Err(NamespaceError::NotFound {
            path: parent.join(from).to_string(),
        });
    }
    if from == to {
        return Ok(());
    }
    if children.contains_key(to) {
        return Err(NamespaceError::NameConflict {
            name: to.to_string(),
        });
    }

    if let Some(node) = children.remove(from) {
        children.insert(to.to_string(), node);
    }
    debug!("Renamed {} to '{}'", parent.join(from), to);
    Ok(())
}

/// Removes the child `name` of `parent` together with its whole subtree.
pub fn delete(tree: &mut Tree, parent: &NodePath, name: &str) -> Result<(), NamespaceError> {
    let children = folder_children_mut(tree, parent)?;
    let removed = children
        .remove(name)
        .ok_or_else(|| NamespaceError::NotFound {
            path: parent.join(name).to_string(),
        })?;
    debug!(
        "Deleted {} ({} nodes)",
        parent.join(name),
        removed.node_count()
    );
    Ok(())
}

/// Moves the child `name` of `from` into the folder `to`, keeping its name.
///
/// Moving a node into itself or one of its descendants is rejected, which
/// keeps the tree acyclic. Moving into the current parent is a no-op.
pub fn move_node(
    tree: &mut Tree,
    from: &NodePath,
    name: &str,
    to: &NodePath,
) -> Result<(), NamespaceError> {
    let source = from.join(name);
    if !folder_children(tree, from)?.contains_key(name) {
        return Err(NamespaceError::NotFound {
            path: source.to_string(),
        });
    }
    let destination = folder_children(tree, to)?;
    if to.starts_with(&source) {
        return Err(NamespaceError::CycleDetected {
            path: source.to_string(),
        });
    }
    if from == to {
        return Ok(());
    }
    if destination.contains_key(name) {
        return Err(NamespaceError::NameConflict {
            name: name.to_string(),
        });
    }

    // `to` is not below `source`, so it still resolves once `source` is detached.
    let node = folder_children_mut(tree, from)?
        .remove(name)
        .ok_or_else(|| NamespaceError::NotFound {
            path: source.to_string(),
        })?;
    folder_children_mut(tree, to)?.insert(name.to_string(), node);
    debug!("Moved {} into {}", source, to);
    Ok(())
}

fn insert_new(
    tree: &mut Tree,
    parent: &NodePath,
    name: &str,
    node: FilesystemNode,
) -> Result<(), NamespaceError> {
    ensure_valid_name(name)?;
    let children = folder_children_mut(tree, parent)?;
    if children.contains_key(name) {
        return Err(NamespaceError::NameConflict {
            name: name.to_string(),
        });
    }
    debug!("Creating {} {}", node.kind(), parent.join(name));
    children.insert(name.to_string(), node);
    Ok(())
}

fn ensure_valid_name(name: &str) -> Result<(), NamespaceError> {
    if is_valid_name(name) {
        Ok(())
    } else {
        Err(NamespaceError::InvalidName {
            name: name.to_string(),
        })
    }
}

fn folder_children<'t>(
    tree: &'t Tree,
    path: &NodePath,
) -> Result<&'t BTreeMap<String, FilesystemNode>, NamespaceError> {
    resolve(tree, path)?
        .children()
        .ok_or_else(|| NamespaceError::NotAFolder {
            path: path.to_string(),
        })
}

fn folder_children_mut<'t>(
    tree: &'t mut Tree,
    path: &NodePath,
) -> Result<&'t mut BTreeMap<String, FilesystemNode>, NamespaceError> {
    resolve_mut(tree, path)?
        .children_mut()
        .ok_or_else(|| NamespaceError::NotAFolder {
            path: path.to_string(),
        })
}
