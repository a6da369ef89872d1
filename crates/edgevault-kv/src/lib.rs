//! Key-value index engine backend for edgevault.
//!
//! This crate provides:
//! - [`KvStore`], the handful of primitive commands the engine needs
//! - [`RedisPool`], a pooled Redis implementation over TCP or a Unix socket
//! - [`EmbeddedKv`], an in-process keyspace with the same semantics
//! - [`PoolRegistry`], which shares one pool per transport
//! - [`IndexEngine`], the [`edgevault_store::Store`] built on top of them
//!
//! ## Key layout
//!
//! For a collection `C`:
//! - `C:<id>` holds the BSON bytes of the record
//! - `C` is a sorted set of ids scored by creation time
//! - `C:<field>` is a hash mapping each unique field value to its owner id
//!
//! Every write is one atomic transaction whose guards are checked before
//! anything is applied, so the indexes never disagree with the records.

#![deny(missing_docs)]

/// Embedded in-process keyspace.
pub mod embedded;
/// The index engine implementing the storage contract.
pub mod engine;
/// Error types for key-value operations.
pub mod error;
/// Key naming.
pub mod keys;
/// Transport registry.
pub mod pool;
/// Pooled Redis connections.
pub mod redis_pool;
/// Guarded write batches.
pub mod transaction;
/// The primitive key-value contract.
pub mod traits;

mod scripts;

pub use embedded::EmbeddedKv;
pub use engine::IndexEngine;
pub use error::{KvError, Rejection};
pub use pool::{ConnectOptions, PoolRegistry, Transport};
pub use redis_pool::RedisPool;
pub use traits::KvStore;
pub use transaction::{Guard, Transaction, Write};
