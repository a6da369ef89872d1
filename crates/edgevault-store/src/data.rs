//! Telemetry operations: events, readings and value descriptors.

use edgevault_model::{now_millis, Event, Id, Reading, ValueDescriptor};
use tracing::debug;

use crate::database::Database;
use crate::error::StoreError;
use crate::filter::Filter;

impl Database {
    /// All events, oldest first.
    pub fn events(&self) -> Result<Vec<Event>, StoreError> {
        self.all(None)
    }

    /// The `limit` oldest events.
    pub fn events_with_limit(&self, limit: usize) -> Result<Vec<Event>, StoreError> {
        self.all(Some(limit))
    }

    /// Stores an event.
    ///
    /// Each reading is stored in the reading collection first; the event then
    /// embeds the stored copies, ids and stamps included.
    pub fn add_event(&self, event: &Event) -> Result<Id, StoreError> {
        let mut record = event.clone();
        record.readings = Vec::with_capacity(event.readings.len());
        for reading in &event.readings {
            let id = self.add(reading)?;
            record.readings.push(self.get(&id)?);
        }
        let id = self.add(&record)?;
        debug!(id = %id, readings = record.readings.len(), "event added");
        Ok(id)
    }

    /// Replaces an event. Embedded readings are stored as given.
    pub fn update_event(&self, event: &Event) -> Result<(), StoreError> {
        self.update(event)
    }

    /// Fetches an event by id.
    pub fn event_by_id(&self, id: &str) -> Result<Event, StoreError> {
        self.by_id(id)
    }

    /// Number of events.
    pub fn event_count(&self) -> Result<usize, StoreError> {
        self.count::<Event>()
    }

    /// Number of events reported by `device`.
    pub fn event_count_by_device(&self, device: &str) -> Result<usize, StoreError> {
        self.count_matching::<Event>(Filter::eq("device", device))
    }

    /// Deletes an event together with the readings it embeds.
    ///
    /// Readings already deleted on their own are skipped.
    pub fn delete_event_by_id(&self, id: &str) -> Result<(), StoreError> {
        let event: Event = self.by_id(id)?;
        let readings: Vec<Id> = event.readings.iter().filter_map(|reading| reading.id).collect();
        self.delete::<Event>(id)?;
        for reading in readings {
            match self.remove::<Reading>(&reading) {
                Ok(()) | Err(StoreError::NotFound { .. }) => {}
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }

    /// The `limit` oldest events reported by `device`.
    pub fn events_for_device(&self, device: &str, limit: usize) -> Result<Vec<Event>, StoreError> {
        self.matching(Filter::eq("device", device), Some(limit))
    }

    /// Events created within `[start, end]`, at most `limit`.
    pub fn events_by_creation_time(
        &self,
        start: i64,
        end: i64,
        limit: usize,
    ) -> Result<Vec<Event>, StoreError> {
        self.created_between(start, end, Some(limit))
    }

    /// Events created more than `age` milliseconds ago.
    pub fn events_older_than_age(&self, age: i64) -> Result<Vec<Event>, StoreError> {
        let cutoff = now_millis().saturating_sub(age).saturating_sub(1);
        self.created_between(0, cutoff, None)
    }

    /// Events that have been exported.
    pub fn events_pushed(&self) -> Result<Vec<Event>, StoreError> {
        self.matching(Filter::gt("pushed", 0), None)
    }

    /// Removes every event and reading.
    pub fn scrub_all_events(&self) -> Result<(), StoreError> {
        self.scrub::<Event>()?;
        self.scrub::<Reading>()
    }

    /// All readings, oldest first.
    pub fn readings(&self) -> Result<Vec<Reading>, StoreError> {
        self.all(None)
    }

    /// Stores a reading.
    pub fn add_reading(&self, reading: &Reading) -> Result<Id, StoreError> {
        self.add(reading)
    }

    /// Replaces a reading.
    pub fn update_reading(&self, reading: &Reading) -> Result<(), StoreError> {
        self.update(reading)
    }

    /// Fetches a reading by id.
    pub fn reading_by_id(&self, id: &str) -> Result<Reading, StoreError> {
        self.by_id(id)
    }

    /// Number of readings.
    pub fn reading_count(&self) -> Result<usize, StoreError> {
        self.count::<Reading>()
    }

    /// Deletes a reading.
    pub fn delete_reading_by_id(&self, id: &str) -> Result<(), StoreError> {
        self.delete::<Reading>(id)
    }

    /// The `limit` oldest readings reported by `device`.
    pub fn readings_by_device(
        &self,
        device: &str,
        limit: usize,
    ) -> Result<Vec<Reading>, StoreError> {
        self.matching(Filter::eq("device", device), Some(limit))
    }

    /// The `limit` oldest readings for the value descriptor `name`.
    pub fn readings_by_value_descriptor(
        &self,
        name: &str,
        limit: usize,
    ) -> Result<Vec<Reading>, StoreError> {
        self.matching(Filter::eq("name", name), Some(limit))
    }

    /// The `limit` oldest readings for any of the value descriptor `names`.
    pub fn readings_by_value_descriptor_names(
        &self,
        names: &[String],
        limit: usize,
    ) -> Result<Vec<Reading>, StoreError> {
        self.matching(Filter::any_of("name", names.iter().map(String::as_str)), Some(limit))
    }

    /// Readings created within `[start, end]`, at most `limit`.
    pub fn readings_by_creation_time(
        &self,
        start: i64,
        end: i64,
        limit: usize,
    ) -> Result<Vec<Reading>, StoreError> {
        self.created_between(start, end, Some(limit))
    }

    /// The `limit` oldest readings of `device` for the value descriptor `name`.
    pub fn readings_by_device_and_value_descriptor(
        &self,
        device: &str,
        name: &str,
        limit: usize,
    ) -> Result<Vec<Reading>, StoreError> {
        self.matching(
            Filter::and([Filter::eq("device", device), Filter::eq("name", name)]),
            Some(limit),
        )
    }

    /// All value descriptors.
    pub fn value_descriptors(&self) -> Result<Vec<ValueDescriptor>, StoreError> {
        self.all(None)
    }

    /// Stores a value descriptor; names are unique.
    pub fn add_value_descriptor(&self, descriptor: &ValueDescriptor) -> Result<Id, StoreError> {
        self.add(descriptor)
    }

    /// Replaces a value descriptor.
    pub fn update_value_descriptor(&self, descriptor: &ValueDescriptor) -> Result<(), StoreError> {
        self.update(descriptor)
    }

    /// Deletes a value descriptor.
    pub fn delete_value_descriptor_by_id(&self, id: &str) -> Result<(), StoreError> {
        self.delete::<ValueDescriptor>(id)
    }

    /// Fetches a value descriptor by name.
    pub fn value_descriptor_by_name(&self, name: &str) -> Result<ValueDescriptor, StoreError> {
        self.by_field("name", name)
    }

    /// Value descriptors whose name is in `names`.
    pub fn value_descriptors_by_name(
        &self,
        names: &[String],
    ) -> Result<Vec<ValueDescriptor>, StoreError> {
        self.matching(Filter::any_of("name", names.iter().map(String::as_str)), None)
    }

    /// Fetches a value descriptor by id.
    pub fn value_descriptor_by_id(&self, id: &str) -> Result<ValueDescriptor, StoreError> {
        self.by_id(id)
    }

    /// Value descriptors with the unit of measure `uom_label`.
    pub fn value_descriptors_by_uom_label(
        &self,
        uom_label: &str,
    ) -> Result<Vec<ValueDescriptor>, StoreError> {
        self.matching(Filter::eq("uomLabel", uom_label), None)
    }

    /// Value descriptors carrying `label`.
    pub fn value_descriptors_by_label(
        &self,
        label: &str,
    ) -> Result<Vec<ValueDescriptor>, StoreError> {
        self.matching(Filter::contains("labels", label), None)
    }

    /// Value descriptors of value type `kind`.
    pub fn value_descriptors_by_type(
        &self,
        kind: &str,
    ) -> Result<Vec<ValueDescriptor>, StoreError> {
        self.matching(Filter::eq("type", kind), None)
    }

    /// Removes every value descriptor.
    pub fn scrub_all_value_descriptors(&self) -> Result<(), StoreError> {
        self.scrub::<ValueDescriptor>()
    }
}
