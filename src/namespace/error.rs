use snafu::Snafu;

use crate::storage::StoreError;

/// Failure of a namespace query or mutation.
///
/// Every kind is recoverable. Except for [`NamespaceError::PersistFailure`],
/// an error means the tree was left untouched.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum NamespaceError {
    #[snafu(display("No such file or folder: {}", path))]
    NotFound { path: String },
    #[snafu(display("Not a folder: {}", path))]
    NotAFolder { path: String },
    #[snafu(display("An item named '{}' already exists", name))]
    NameConflict { name: String },
    #[snafu(display("Invalid name '{}'", name))]
    InvalidName { name: String },
    #[snafu(display("Cannot move {} into itself", path))]
    CycleDetected { path: String },
    #[snafu(display("The change was applied but could not be saved"))]
    PersistFailure { source: StoreError },
}

impl NamespaceError {
    /// True when the in-memory tree holds a change that is not durable.
    pub fn is_degraded(&self) -> bool {
        matches!(self, NamespaceError::PersistFailure { .. })
    }
}
