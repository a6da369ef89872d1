//! Backend-agnostic storage contract for edgevault records.
//!
//! This crate provides:
//! - The [`Store`] trait every backend implements, working on BSON documents
//! - The [`StoreError`] taxonomy every backend maps its native failures onto
//! - [`Filter`] predicates evaluated client-side or translated natively
//! - [`Database`], the typed per-entity API consumers program against
//! - [`MemoryStore`], the in-memory backend used by tests
//!
//! Backends differ only in how they persist documents; uniqueness, not-found
//! and ordering semantics are identical and pinned down by the contract test
//! suite in the `edgevault` crate.

#![deny(missing_docs)]

/// Typed per-entity facade over a [`Store`].
pub mod database;
/// Error taxonomy shared by all backends.
pub mod error;
/// Record predicates.
pub mod filter;
/// In-memory backend.
pub mod memory;
/// Stamping and field helpers shared by backends.
pub mod record;
/// The storage contract trait.
pub mod traits;

mod data;
mod export;
mod metadata;

pub use database::Database;
pub use edgevault_model as model;
pub use error::{ErrorKind, StoreError};
pub use filter::Filter;
pub use memory::MemoryStore;
pub use traits::Store;
