//! Mutation and query protocol of the virtual namespace.
//!
//! [`operations`] holds the validated tree transformations; [`Namespace`]
//! pairs them with a [`TreeStore`](crate::store::TreeStore) so that every
//! successful mutation is persisted.

mod error;
mod namespace;
pub mod operations;
mod ordering;

pub use error::NamespaceError;
pub use namespace::Namespace;
pub use ordering::listing_order;
