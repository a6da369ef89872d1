//! Export registration operations.

use edgevault_model::{Id, Registration};

use crate::database::Database;
use crate::error::StoreError;

impl Database {
    /// Every export registration.
    pub fn registrations(&self) -> Result<Vec<Registration>, StoreError> {
        self.all(None)
    }

    /// Stores a registration; names are unique.
    pub fn add_registration(&self, registration: &Registration) -> Result<Id, StoreError> {
        self.add(registration)
    }

    /// Replaces a registration.
    pub fn update_registration(&self, registration: &Registration) -> Result<(), StoreError> {
        self.update(registration)
    }

    /// Fetches a registration by id.
    pub fn registration_by_id(&self, id: &str) -> Result<Registration, StoreError> {
        self.by_id(id)
    }

    /// Fetches a registration by name.
    pub fn registration_by_name(&self, name: &str) -> Result<Registration, StoreError> {
        self.by_field("name", name)
    }

    /// Deletes a registration by id.
    pub fn delete_registration_by_id(&self, id: &str) -> Result<(), StoreError> {
        self.delete::<Registration>(id)
    }

    /// Deletes a registration by name.
    pub fn delete_registration_by_name(&self, name: &str) -> Result<(), StoreError> {
        self.delete_by_field::<Registration>("name", name)
    }

    /// Removes every registration.
    pub fn scrub_all_registrations(&self) -> Result<(), StoreError> {
        self.scrub::<Registration>()
    }
}
