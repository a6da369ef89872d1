use std::fmt;
use std::str::FromStr;

use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::validation::ValidationError;

/// Opaque, globally unique record identifier.
///
/// Ids are 12-byte object ids rendered as 24 lowercase hex characters. The
/// leading bytes carry the generation time in seconds and the trailing bytes a
/// process-wide counter, so ids generated by one process sort in creation
/// order within the same second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id(ObjectId);

impl Id {
    /// Generates a fresh id.
    pub fn generate() -> Self {
        Self(ObjectId::new())
    }

    /// Parses a validated id from its hex representation.
    pub fn parse(value: impl AsRef<str>) -> Result<Self, ValidationError> {
        let value = value.as_ref();
        ObjectId::parse_str(value)
            .map(Self)
            .map_err(|_| ValidationError::InvalidId {
                value: value.to_string(),
            })
    }

    /// Returns the 24-character hex form.
    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }

    /// Returns the underlying object id.
    pub fn as_object_id(&self) -> ObjectId {
        self.0
    }
}

impl From<ObjectId> for Id {
    fn from(value: ObjectId) -> Self {
        Self(value)
    }
}

impl From<Id> for bson::Bson {
    fn from(value: Id) -> Self {
        bson::Bson::ObjectId(value.0)
    }
}

impl FromStr for Id {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_hex())
    }
}
