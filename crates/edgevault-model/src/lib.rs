//! Entity model for the edgevault persistence layer.
//!
//! This crate provides:
//! - The opaque record identifier [`Id`] (a 24-hex-character object id)
//! - Telemetry records (events, readings, value descriptors)
//! - Metadata records (addressables, devices, profiles, schedules, ...)
//! - Export registrations
//! - [`Collection`] descriptors naming each record family and its unique fields
//!
//! Core invariants:
//! - Ids, `created` and `modified` are assigned by the store, never by callers
//! - Records serialize to BSON documents with camelCase field names and `_id`
//!
#![deny(missing_docs)]

/// Collection descriptors and the [`Entity`] binding trait.
pub mod collection;
/// Telemetry records: events, readings and value descriptors.
pub mod data;
/// Export registration records.
pub mod export;
/// Record identifiers.
pub mod id;
/// Metadata records describing devices and how to reach them.
pub mod metadata;
/// Millisecond timestamps.
pub mod time;
/// Validation errors for model values.
pub mod validation;

pub use collection::{Collection, Entity};
pub use data::{Event, Reading, ValueDescriptor};
pub use export::{
    Compression, Destination, EncryptionAlgorithm, EncryptionDetails, ExportFilter, ExportFormat,
    Registration,
};
pub use id::Id;
pub use metadata::{
    Action, Addressable, AdminState, Command, Device, DeviceProfile, DeviceReport, DeviceService,
    OperatingState, ProvisionWatcher, Response, Schedule, ScheduleEvent,
};
pub use time::now_millis;
pub use validation::ValidationError;
