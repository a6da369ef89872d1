use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::id::Id;

/// Administrative state of a device or service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AdminState {
    /// Commands are rejected.
    Locked,
    /// Commands are accepted.
    #[default]
    Unlocked,
}

/// Operating state of a device, service or watcher.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OperatingState {
    /// In service.
    #[default]
    Enabled,
    /// Out of service.
    Disabled,
}

/// Network location of a device, service or export endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Addressable {
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
    /// Name of the addressable.
    pub name: String,
    /// Transport protocol (`HTTP`, `TCP`, `MAC`, `ZMQ`, `OTHER`).
    #[serde(default)]
    pub protocol: String,
    /// HTTP method for HTTP addressables.
    #[serde(default)]
    pub method: String,
    /// Host name or address.
    #[serde(default)]
    pub address: String,
    /// Port number.
    #[serde(default)]
    pub port: i64,
    /// Request path.
    #[serde(default)]
    pub path: String,
    /// Publisher id for message bus endpoints.
    #[serde(default)]
    pub publisher: String,
    /// Login user.
    #[serde(default)]
    pub user: String,
    /// Login password.
    #[serde(default)]
    pub password: String,
    /// Message bus topic.
    #[serde(default)]
    pub topic: String,
}

impl Addressable {
    /// Returns `protocol://address:port` with a lowercase scheme.
    pub fn base_url(&self) -> String {
        format!(
            "{}://{}:{}",
            self.protocol.to_lowercase(),
            self.address,
            self.port
        )
    }
}

/// A service that owns and drives devices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceService {
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
    /// Unique service name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Free-form labels.
    #[serde(default)]
    pub labels: Vec<String>,
    /// Last time the service connected.
    #[serde(default)]
    pub last_connected: i64,
    /// Last time the service reported.
    #[serde(default)]
    pub last_reported: i64,
    /// Operating state.
    #[serde(default)]
    pub operating_state: OperatingState,
    /// Administrative state.
    #[serde(default)]
    pub admin_state: AdminState,
    /// Where the service listens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addressable_id: Option<Id>,
}

/// A physical or virtual device.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
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
    /// Unique device name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Free-form labels.
    #[serde(default)]
    pub labels: Vec<String>,
    /// Administrative state.
    #[serde(default)]
    pub admin_state: AdminState,
    /// Operating state.
    #[serde(default)]
    pub operating_state: OperatingState,
    /// Where the device is reached.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addressable_id: Option<Id>,
    /// Owning device service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_id: Option<Id>,
    /// Profile describing the device.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_id: Option<Id>,
    /// Last time the device connected.
    #[serde(default)]
    pub last_connected: i64,
    /// Last time the device reported.
    #[serde(default)]
    pub last_reported: i64,
    /// Free-form location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Expected response of a command action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    /// Status code.
    pub code: String,
    /// Human readable description.
    #[serde(default)]
    pub description: String,
    /// Value descriptor names the response carries.
    #[serde(default)]
    pub expected_values: Vec<String>,
}

/// One verb of a command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    /// Request path.
    pub path: String,
    /// Possible responses.
    #[serde(default)]
    pub responses: Vec<Response>,
}

/// A get/put operation a device profile offers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Command {
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
    /// Command name; several profiles may define commands with the same name.
    pub name: String,
    /// Read action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub get: Option<Action>,
    /// Write action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub put: Option<Action>,
}

/// Template shared by devices of one make and model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceProfile {
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
    /// Unique profile name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Device manufacturer.
    #[serde(default)]
    pub manufacturer: String,
    /// Device model.
    #[serde(default)]
    pub model: String,
    /// Free-form labels.
    #[serde(default)]
    pub labels: Vec<String>,
    /// Ids of the commands the profile offers.
    #[serde(default)]
    pub commands: Vec<Id>,
}

/// Values a device reports when a schedule event fires.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceReport {
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
    /// Report name.
    pub name: String,
    /// Name of the reporting device.
    #[serde(default)]
    pub device: String,
    /// Name of the triggering schedule event.
    #[serde(default)]
    pub event: String,
    /// Value descriptor names expected in the report.
    #[serde(default)]
    pub expected: Vec<String>,
}

/// A recurring time window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
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
    /// Unique schedule name.
    pub name: String,
    /// Start time, `YYYYMMDDThhmmss`.
    #[serde(default)]
    pub start: String,
    /// End time, `YYYYMMDDThhmmss`.
    #[serde(default)]
    pub end: String,
    /// ISO 8601 duration between firings.
    #[serde(default)]
    pub frequency: String,
    /// Cron expression alternative to `frequency`.
    #[serde(default)]
    pub cron: String,
    /// Fire only once.
    #[serde(default)]
    pub run_once: bool,
}

/// An action bound to a schedule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEvent {
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
    /// Unique schedule event name.
    pub name: String,
    /// Name of the schedule that triggers the event.
    #[serde(default)]
    pub schedule: String,
    /// Endpoint invoked when the event fires.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addressable_id: Option<Id>,
    /// Request body sent to the endpoint.
    #[serde(default)]
    pub parameters: String,
    /// Name of the owning service.
    #[serde(default)]
    pub service: String,
}

/// Matches newly discovered devices against identifier patterns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionWatcher {
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
    /// Unique watcher name.
    pub name: String,
    /// Identifier key/value patterns a discovered device must carry.
    #[serde(default)]
    pub identifiers: BTreeMap<String, String>,
    /// Profile assigned to matching devices.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_id: Option<Id>,
    /// Service that adopts matching devices.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_id: Option<Id>,
    /// Operating state.
    #[serde(default)]
    pub operating_state: OperatingState,
}
