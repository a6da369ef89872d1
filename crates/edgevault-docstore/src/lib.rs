//! MongoDB document-store backend for edgevault.
//!
//! Each collection maps to a MongoDB collection of the same name. Unique
//! fields are enforced by partial unique indexes created on connect, and
//! [`edgevault_store::Filter`] predicates are translated into native
//! queries by [`query`].

#![deny(missing_docs)]

/// Filter translation.
pub mod query;
/// The document store.
pub mod store;

pub use store::{DocumentOptions, DocumentStore};
