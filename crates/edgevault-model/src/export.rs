use serde::{Deserialize, Serialize};

use crate::id::Id;
use crate::metadata::Addressable;
use crate::validation::ValidationError;

/// Payload format of exported events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExportFormat {
    /// Plain JSON.
    #[default]
    Json,
    /// XML.
    Xml,
    /// Language-native serialized form.
    Serialized,
    /// JSON shaped for Google IoT Core.
    IotcoreJson,
    /// JSON shaped for Azure IoT Hub.
    AzureJson,
    /// JSON shaped for AWS IoT.
    AwsJson,
    /// Comma separated values.
    Csv,
}

/// Compression applied before dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Compression {
    /// No compression.
    #[default]
    None,
    /// gzip.
    Gzip,
    /// zip.
    Zip,
}

/// Kind of endpoint the export is dispatched to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Destination {
    /// MQTT broker topic.
    #[default]
    MqttTopic,
    /// ZeroMQ topic.
    ZmqTopic,
    /// Google IoT Core MQTT bridge.
    IotcoreMqtt,
    /// Azure IoT Hub MQTT.
    AzureMqtt,
    /// REST endpoint.
    RestEndpoint,
    /// XMPP topic.
    XmppTopic,
    /// AWS IoT MQTT.
    AwsMqtt,
    /// InfluxDB endpoint.
    InfluxdbEndpoint,
}

/// Encryption applied before dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EncryptionAlgorithm {
    /// No encryption.
    #[default]
    None,
    /// AES with a shared key and initializing vector.
    Aes,
}

/// Which events a registration receives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportFilter {
    /// Device names to include; empty means all.
    #[serde(default)]
    pub device_identifiers: Vec<String>,
    /// Value descriptor names to include; empty means all.
    #[serde(default)]
    pub value_descriptor_identifiers: Vec<String>,
}

/// Encryption settings of a registration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptionDetails {
    /// Algorithm.
    #[serde(default)]
    pub encryption_algorithm: EncryptionAlgorithm,
    /// Shared key.
    #[serde(default)]
    pub encryption_key: String,
    /// Initializing vector.
    #[serde(default)]
    pub initializing_vector: String,
}

/// An export subscription: where and how to forward telemetry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
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
    /// Unique registration name.
    pub name: String,
    /// Destination endpoint.
    #[serde(default)]
    pub addressable: Addressable,
    /// Payload format.
    #[serde(default)]
    pub format: ExportFormat,
    /// Event selection.
    #[serde(default)]
    pub filter: ExportFilter,
    /// Encryption settings.
    #[serde(default)]
    pub encryption: EncryptionDetails,
    /// Compression.
    #[serde(default)]
    pub compression: Compression,
    /// Whether the registration receives events.
    #[serde(default)]
    pub enable: bool,
    /// Destination kind.
    #[serde(default)]
    pub destination: Destination,
}

impl Registration {
    /// Checks the fields the storage layer cannot express as types.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::Empty { field: "name" });
        }
        if self.encryption.encryption_algorithm == EncryptionAlgorithm::Aes {
            if self.encryption.encryption_key.is_empty() {
                return Err(ValidationError::NotAllowed {
                    field: "encryption",
                    reason: "AES requires an encryption key".to_string(),
                });
            }
            if self.encryption.initializing_vector.is_empty() {
                return Err(ValidationError::NotAllowed {
                    field: "encryption",
                    reason: "AES requires an initializing vector".to_string(),
                });
            }
        }
        Ok(())
    }
}
