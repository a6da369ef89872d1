use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::data::{Event, Reading, ValueDescriptor};
use crate::export::Registration;
use crate::id::Id;
use crate::metadata::{
    Addressable, Command, Device, DeviceProfile, DeviceReport, DeviceService, ProvisionWatcher,
    Schedule, ScheduleEvent,
};

/// Describes one record family: its storage name and the fields whose values
/// must be unique within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Collection {
    /// Storage name, also the key prefix in key/value backends.
    pub name: &'static str,
    /// Fields whose values are unique across the collection.
    pub unique: &'static [&'static str],
}

impl Collection {
    /// Returns true if `field` is declared unique.
    pub fn is_unique(&self, field: &str) -> bool {
        self.unique.contains(&field)
    }
}

/// Event collection.
pub const EVENTS: Collection = Collection {
    name: "event",
    unique: &[],
};
/// Reading collection.
pub const READINGS: Collection = Collection {
    name: "reading",
    unique: &[],
};
/// Value descriptor collection.
pub const VALUE_DESCRIPTORS: Collection = Collection {
    name: "valueDescriptor",
    unique: &["name"],
};
/// Addressable collection.
pub const ADDRESSABLES: Collection = Collection {
    name: "addressable",
    unique: &[],
};
/// Device service collection.
pub const DEVICE_SERVICES: Collection = Collection {
    name: "deviceService",
    unique: &["name"],
};
/// Device collection.
pub const DEVICES: Collection = Collection {
    name: "device",
    unique: &["name"],
};
/// Device profile collection.
pub const DEVICE_PROFILES: Collection = Collection {
    name: "deviceProfile",
    unique: &["name"],
};
/// Device report collection.
pub const DEVICE_REPORTS: Collection = Collection {
    name: "deviceReport",
    unique: &[],
};
/// Schedule collection.
pub const SCHEDULES: Collection = Collection {
    name: "schedule",
    unique: &["name"],
};
/// Schedule event collection.
pub const SCHEDULE_EVENTS: Collection = Collection {
    name: "scheduleEvent",
    unique: &["name"],
};
/// Provision watcher collection.
pub const PROVISION_WATCHERS: Collection = Collection {
    name: "provisionWatcher",
    unique: &["name"],
};
/// Command collection.
pub const COMMANDS: Collection = Collection {
    name: "command",
    unique: &[],
};
/// Export registration collection.
pub const REGISTRATIONS: Collection = Collection {
    name: "exportConfiguration",
    unique: &["name"],
};

/// Metadata collections, scrubbed together.
pub const METADATA: &[&Collection] = &[
    &ADDRESSABLES,
    &DEVICE_SERVICES,
    &DEVICES,
    &DEVICE_PROFILES,
    &DEVICE_REPORTS,
    &SCHEDULES,
    &SCHEDULE_EVENTS,
    &PROVISION_WATCHERS,
    &COMMANDS,
];

/// Every collection known to the model.
pub const ALL: &[&Collection] = &[
    &EVENTS,
    &READINGS,
    &VALUE_DESCRIPTORS,
    &ADDRESSABLES,
    &DEVICE_SERVICES,
    &DEVICES,
    &DEVICE_PROFILES,
    &DEVICE_REPORTS,
    &SCHEDULES,
    &SCHEDULE_EVENTS,
    &PROVISION_WATCHERS,
    &COMMANDS,
    &REGISTRATIONS,
];

/// Binds a record type to its collection.
pub trait Entity: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Collection the record type is stored in.
    const COLLECTION: &'static Collection;

    /// Store-assigned id, if the record has been persisted.
    fn id(&self) -> Option<Id>;
}

macro_rules! entity {
    ($ty:ty, $collection:ident) => {
        impl Entity for $ty {
            const COLLECTION: &'static Collection = &$collection;

            fn id(&self) -> Option<Id> {
                self.id
            }
        }
    };
}

entity!(Event, EVENTS);
entity!(Reading, READINGS);
entity!(ValueDescriptor, VALUE_DESCRIPTORS);
entity!(Addressable, ADDRESSABLES);
entity!(DeviceService, DEVICE_SERVICES);
entity!(Device, DEVICES);
entity!(DeviceProfile, DEVICE_PROFILES);
entity!(DeviceReport, DEVICE_REPORTS);
entity!(Schedule, SCHEDULES);
entity!(ScheduleEvent, SCHEDULE_EVENTS);
entity!(ProvisionWatcher, PROVISION_WATCHERS);
entity!(Command, COMMANDS);
entity!(Registration, REGISTRATIONS);
