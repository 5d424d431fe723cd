use crate::filesystem::NodePath;

/// A user action, applied relative to the session's current folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Enter the child folder `name`
    Navigate { name: String },
    /// Jump to an absolute path, as breadcrumbs do
    NavigateTo { path: NodePath },
    /// Go to the containing folder; stays put at the root
    Up,
    CreateFolder { name: String },
    CreateFile { name: String },
    Rename { from: String, to: String },
    Delete { name: String },
    /// Move the child `name` into the folder at `destination`
    Move { name: String, destination: NodePath },
}

/// Result of a successfully dispatched command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The current folder changed to the contained path
    Moved(NodePath),
    /// The tree changed and was persisted
    Changed,
}
