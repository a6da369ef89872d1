use serde::{Deserialize, Serialize};

use crate::id::Id;

/// A single sensor value reported by a device.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    /// Store-assigned id.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Id>,
    /// Creation time in milliseconds, store-assigned.
    #[serde(default)]
    pub created: i64,
    /// Last modification time in milliseconds, store-assigned.
    #[serde(default)]
    pub modified: i64,
    /// Time the reading was taken at the source.
    #[serde(default)]
    pub origin: i64,
    /// Time the reading was exported, 0 if never.
    #[serde(default)]
    pub pushed: i64,
    /// Name of the reporting device.
    #[serde(default)]
    pub device: String,
    /// Name of the value descriptor the value conforms to.
    #[serde(default)]
    pub name: String,
    /// Reported value in its textual form.
    #[serde(default)]
    pub value: String,
}

/// A batch of readings reported together by one device.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Store-assigned id.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Id>,
    /// Creation time in milliseconds, store-assigned.
    #[serde(default)]
    pub created: i64,
    /// Last modification time in milliseconds, store-assigned.
    #[serde(default)]
    pub modified: i64,
    /// Time the event was produced at the source.
    #[serde(default)]
    pub origin: i64,
    /// Time the event was exported, 0 if never.
    #[serde(default)]
    pub pushed: i64,
    /// Name of the reporting device.
    #[serde(default)]
    pub device: String,
    /// Readings carried by the event.
    #[serde(default)]
    pub readings: Vec<Reading>,
}

/// Describes the shape and unit of a reading value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueDescriptor {
    /// Store-assigned id.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Id>,
    /// Creation time in milliseconds, store-assigned.
    #[serde(default)]
    pub created: i64,
    /// Last modification time in milliseconds, store-assigned.
    #[serde(default)]
    pub modified: i64,
    /// Caller-supplied origin time.
    #[serde(default)]
    pub origin: i64,
    /// Unique name, referenced by readings.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Minimum allowed value.
    #[serde(default)]
    pub min: String,
    /// Maximum allowed value.
    #[serde(default)]
    pub max: String,
    /// Value used when a reading omits one.
    #[serde(default)]
    pub default_value: String,
    /// Value type code (`I`, `F`, `S`, `B`, `J`).
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Unit of measure label.
    #[serde(default)]
    pub uom_label: String,
    /// printf-style display format.
    #[serde(default)]
    pub formatting: String,
    /// Free-form labels.
    #[serde(default)]
    pub labels: Vec<String>,
}
