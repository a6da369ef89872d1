//! Device metadata operations.

use edgevault_model::collection::METADATA;
use edgevault_model::{
    Addressable, Command, Device, DeviceProfile, DeviceReport, DeviceService, Id,
    ProvisionWatcher, Schedule, ScheduleEvent,
};
use tracing::info;

use crate::database::Database;
use crate::error::StoreError;
use crate::filter::Filter;

/// Generates the add/update/get/list/delete quintet for one entity.
macro_rules! crud {
    (
        $entity:ty,
        $label:literal,
        $add:ident,
        $update:ident,
        $by_id:ident,
        $all:ident,
        $delete:ident $(,)?
    ) => {
        impl Database {
            #[doc = concat!("Stores a new ", $label, ".")]
            pub fn $add(&self, record: &$entity) -> Result<Id, StoreError> {
                self.add(record)
            }

            #[doc = concat!("Replaces an existing ", $label, ".")]
            pub fn $update(&self, record: &$entity) -> Result<(), StoreError> {
                self.update(record)
            }

            #[doc = concat!("Fetches a ", $label, " by id.")]
            pub fn $by_id(&self, id: &str) -> Result<$entity, StoreError> {
                self.by_id(id)
            }

            #[doc = concat!("Every ", $label, ", oldest first.")]
            pub fn $all(&self) -> Result<Vec<$entity>, StoreError> {
                self.all(None)
            }

            #[doc = concat!("Deletes a ", $label, " by id.")]
            pub fn $delete(&self, id: &str) -> Result<(), StoreError> {
                self.delete::<$entity>(id)
            }
        }
    };
}

crud!(
    Addressable,
    "addressable",
    add_addressable,
    update_addressable,
    addressable_by_id,
    addressables,
    delete_addressable_by_id,
);
crud!(
    DeviceService,
    "device service",
    add_device_service,
    update_device_service,
    device_service_by_id,
    device_services,
    delete_device_service_by_id,
);
crud!(Device, "device", add_device, update_device, device_by_id, devices, delete_device_by_id);
crud!(
    DeviceProfile,
    "device profile",
    add_device_profile,
    update_device_profile,
    device_profile_by_id,
    device_profiles,
    delete_device_profile_by_id,
);
crud!(
    DeviceReport,
    "device report",
    add_device_report,
    update_device_report,
    device_report_by_id,
    device_reports,
    delete_device_report_by_id,
);
crud!(
    Schedule,
    "schedule",
    add_schedule,
    update_schedule,
    schedule_by_id,
    schedules,
    delete_schedule_by_id,
);
crud!(
    ScheduleEvent,
    "schedule event",
    add_schedule_event,
    update_schedule_event,
    schedule_event_by_id,
    schedule_events,
    delete_schedule_event_by_id,
);
crud!(
    ProvisionWatcher,
    "provision watcher",
    add_provision_watcher,
    update_provision_watcher,
    provision_watcher_by_id,
    provision_watchers,
    delete_provision_watcher_by_id,
);
crud!(
    Command,
    "command",
    add_command,
    update_command,
    command_by_id,
    commands,
    delete_command_by_id,
);

fn reference(field: &str, id: &str) -> Result<Filter, StoreError> {
    Ok(Filter::eq(field, Id::parse(id)?))
}

impl Database {
    /// First addressable named `name`.
    pub fn addressable_by_name(&self, name: &str) -> Result<Addressable, StoreError> {
        self.by_field("name", name)
    }

    /// Addressables listening on `port`.
    pub fn addressables_by_port(&self, port: i64) -> Result<Vec<Addressable>, StoreError> {
        self.matching(Filter::eq("port", port), None)
    }

    /// Addressables with publisher `publisher`.
    pub fn addressables_by_publisher(
        &self,
        publisher: &str,
    ) -> Result<Vec<Addressable>, StoreError> {
        self.matching(Filter::eq("publisher", publisher), None)
    }

    /// Addressables at host `address`.
    pub fn addressables_by_address(&self, address: &str) -> Result<Vec<Addressable>, StoreError> {
        self.matching(Filter::eq("address", address), None)
    }

    /// Addressables publishing to `topic`.
    pub fn addressables_by_topic(&self, topic: &str) -> Result<Vec<Addressable>, StoreError> {
        self.matching(Filter::eq("topic", topic), None)
    }

    /// Device service named `name`.
    pub fn device_service_by_name(&self, name: &str) -> Result<DeviceService, StoreError> {
        self.by_field("name", name)
    }

    /// Device services reachable through the addressable `id`.
    pub fn device_services_by_addressable_id(
        &self,
        id: &str,
    ) -> Result<Vec<DeviceService>, StoreError> {
        self.matching(reference("addressableId", id)?, None)
    }

    /// Device named `name`.
    pub fn device_by_name(&self, name: &str) -> Result<Device, StoreError> {
        self.by_field("name", name)
    }

    /// Devices built on the profile `id`.
    pub fn devices_by_profile_id(&self, id: &str) -> Result<Vec<Device>, StoreError> {
        self.matching(reference("profileId", id)?, None)
    }

    /// Devices owned by the service `id`.
    pub fn devices_by_service_id(&self, id: &str) -> Result<Vec<Device>, StoreError> {
        self.matching(reference("serviceId", id)?, None)
    }

    /// Devices reachable through the addressable `id`.
    pub fn devices_by_addressable_id(&self, id: &str) -> Result<Vec<Device>, StoreError> {
        self.matching(reference("addressableId", id)?, None)
    }

    /// Devices carrying `label`.
    pub fn devices_by_label(&self, label: &str) -> Result<Vec<Device>, StoreError> {
        self.matching(Filter::contains("labels", label), None)
    }

    /// Device profile named `name`.
    pub fn device_profile_by_name(&self, name: &str) -> Result<DeviceProfile, StoreError> {
        self.by_field("name", name)
    }

    /// Device profiles for `model`.
    pub fn device_profiles_by_model(&self, model: &str) -> Result<Vec<DeviceProfile>, StoreError> {
        self.matching(Filter::eq("model", model), None)
    }

    /// Device profiles from `manufacturer`.
    pub fn device_profiles_by_manufacturer(
        &self,
        manufacturer: &str,
    ) -> Result<Vec<DeviceProfile>, StoreError> {
        self.matching(Filter::eq("manufacturer", manufacturer), None)
    }

    /// Device profiles from `manufacturer` for `model`.
    pub fn device_profiles_by_manufacturer_and_model(
        &self,
        manufacturer: &str,
        model: &str,
    ) -> Result<Vec<DeviceProfile>, StoreError> {
        self.matching(
            Filter::and([
                Filter::eq("manufacturer", manufacturer),
                Filter::eq("model", model),
            ]),
            None,
        )
    }

    /// Device profiles carrying `label`.
    pub fn device_profiles_by_label(&self, label: &str) -> Result<Vec<DeviceProfile>, StoreError> {
        self.matching(Filter::contains("labels", label), None)
    }

    /// Device profiles referencing the command `id`.
    pub fn device_profiles_using_command(
        &self,
        id: &str,
    ) -> Result<Vec<DeviceProfile>, StoreError> {
        self.matching(Filter::contains("commands", Id::parse(id)?), None)
    }

    /// First device report named `name`.
    pub fn device_report_by_name(&self, name: &str) -> Result<DeviceReport, StoreError> {
        self.by_field("name", name)
    }

    /// Device reports for the device `device`.
    pub fn device_reports_by_device_name(
        &self,
        device: &str,
    ) -> Result<Vec<DeviceReport>, StoreError> {
        self.matching(Filter::eq("device", device), None)
    }

    /// Device reports triggered by the schedule event `event`.
    pub fn device_reports_by_schedule_event_name(
        &self,
        event: &str,
    ) -> Result<Vec<DeviceReport>, StoreError> {
        self.matching(Filter::eq("event", event), None)
    }

    /// Schedule named `name`.
    pub fn schedule_by_name(&self, name: &str) -> Result<Schedule, StoreError> {
        self.by_field("name", name)
    }

    /// Schedule event named `name`.
    pub fn schedule_event_by_name(&self, name: &str) -> Result<ScheduleEvent, StoreError> {
        self.by_field("name", name)
    }

    /// Schedule events targeting the addressable `id`.
    pub fn schedule_events_by_addressable_id(
        &self,
        id: &str,
    ) -> Result<Vec<ScheduleEvent>, StoreError> {
        self.matching(reference("addressableId", id)?, None)
    }

    /// Schedule events run on behalf of the service `service`.
    pub fn schedule_events_by_service_name(
        &self,
        service: &str,
    ) -> Result<Vec<ScheduleEvent>, StoreError> {
        self.matching(Filter::eq("service", service), None)
    }

    /// Schedule events fired by the schedule `schedule`.
    pub fn schedule_events_by_schedule_name(
        &self,
        schedule: &str,
    ) -> Result<Vec<ScheduleEvent>, StoreError> {
        self.matching(Filter::eq("schedule", schedule), None)
    }

    /// Provision watcher named `name`.
    pub fn provision_watcher_by_name(&self, name: &str) -> Result<ProvisionWatcher, StoreError> {
        self.by_field("name", name)
    }

    /// Provision watchers assigning the profile `id`.
    pub fn provision_watchers_by_profile_id(
        &self,
        id: &str,
    ) -> Result<Vec<ProvisionWatcher>, StoreError> {
        self.matching(reference("profileId", id)?, None)
    }

    /// Provision watchers assigning the service `id`.
    pub fn provision_watchers_by_service_id(
        &self,
        id: &str,
    ) -> Result<Vec<ProvisionWatcher>, StoreError> {
        self.matching(reference("serviceId", id)?, None)
    }

    /// Provision watchers whose identifier `key` equals `value`.
    pub fn provision_watchers_by_identifier(
        &self,
        key: &str,
        value: &str,
    ) -> Result<Vec<ProvisionWatcher>, StoreError> {
        self.matching(Filter::eq(format!("identifiers.{key}"), value), None)
    }

    /// Commands named `name`. Command names repeat across profiles.
    pub fn commands_by_name(&self, name: &str) -> Result<Vec<Command>, StoreError> {
        self.matching(Filter::eq("name", name), None)
    }

    /// Removes every metadata record.
    pub fn scrub_metadata(&self) -> Result<(), StoreError> {
        for collection in METADATA {
            self.store().scrub(collection)?;
        }
        info!(backend = self.backend(), "metadata scrubbed");
        Ok(())
    }
}
