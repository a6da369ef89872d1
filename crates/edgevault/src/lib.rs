//! Pluggable persistence for IoT edge records.
//!
//! This crate provides:
//! - [`StoreConfig`], flat storage settings with environment overrides
//! - [`open_store`] / [`open_database`], which pick and connect a backend
//! - Re-exports of the storage contract, the typed [`Database`] API and
//!   the key-value pool registry
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use edgevault::{open_database, PoolRegistry, StoreConfig};
//! use edgevault::model::Reading;
//!
//! let config = StoreConfig {
//!     backend: "memorydb".to_string(),
//!     ..Default::default()
//! };
//! let registry = Arc::new(PoolRegistry::new());
//! let db = open_database(&config, &registry)?;
//!
//! let id = db.add_reading(&Reading {
//!     device: "thermostat".into(),
//!     name: "temperature".into(),
//!     value: "21.5".into(),
//!     ..Default::default()
//! })?;
//! assert_eq!(db.reading_by_id(&id.to_hex())?.value, "21.5");
//! db.close_session();
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Backends
//!
//! - `memorydb`: process-local, for tests and tooling
//! - `redisdb`: the index engine over Redis, or over an in-process keyspace
//!   when `embedded` is set
//! - `mongodb`: the document store, behind the `mongodb` cargo feature

#![deny(missing_docs)]

/// Storage settings.
pub mod config;
/// Backend construction.
pub mod factory;

pub use config::{BackendKind, ConfigError, StoreConfig};
pub use edgevault_kv::{PoolRegistry, Transport};
pub use edgevault_model as model;
pub use edgevault_store::{Database, ErrorKind, Filter, Store, StoreError};
pub use factory::{open_database, open_store};
