//! The storage contract every backend implements.

use bson::Document;
use edgevault_model::{Collection, Id};

use crate::error::StoreError;
use crate::filter::Filter;

/// Record-level storage contract.
///
/// Records are BSON documents carrying their id under `_id` and their
/// store-assigned stamps under `created` and `modified`. Every listing is
/// ordered oldest first. Implementations must be safe to call concurrently
/// and must report failures only through the [`StoreError`] kinds.
pub trait Store: Send + Sync {
    /// Short backend name for logs.
    fn backend(&self) -> &'static str;

    /// Establishes connectivity. Called once by the factory before use.
    fn connect(&self) -> Result<(), StoreError>;

    /// Persists a new record, assigning its id and stamps.
    ///
    /// Fails with [`StoreError::DuplicateName`] when a unique field value is
    /// taken, leaving the collection untouched.
    fn insert(&self, collection: &Collection, record: Document) -> Result<Id, StoreError>;

    /// Replaces an existing record, keeping its creation time.
    ///
    /// Fails with [`StoreError::NotFound`] when the record carries no id or
    /// the id is unknown; never creates.
    fn update(&self, collection: &Collection, record: Document) -> Result<(), StoreError>;

    /// Fetches a record by id.
    fn find_by_id(&self, collection: &Collection, id: &Id) -> Result<Document, StoreError>;

    /// Fetches the first record whose `field` equals `value`.
    ///
    /// Unique fields resolve through an index where the backend keeps one.
    fn find_unique(
        &self,
        collection: &Collection,
        field: &str,
        value: &str,
    ) -> Result<Document, StoreError>;

    /// Lists records, at most `limit` of them.
    fn find_all(
        &self,
        collection: &Collection,
        limit: Option<usize>,
    ) -> Result<Vec<Document>, StoreError>;

    /// Lists records matching `filter`, at most `limit` of them.
    fn find(
        &self,
        collection: &Collection,
        filter: &Filter,
        limit: Option<usize>,
    ) -> Result<Vec<Document>, StoreError>;

    /// Lists records created within `[start, end]`, at most `limit` of them.
    fn find_created_between(
        &self,
        collection: &Collection,
        start: i64,
        end: i64,
        limit: Option<usize>,
    ) -> Result<Vec<Document>, StoreError>;

    /// Number of records in the collection.
    fn count(&self, collection: &Collection) -> Result<usize, StoreError>;

    /// Number of records matching `filter`.
    fn count_matching(
        &self,
        collection: &Collection,
        filter: &Filter,
    ) -> Result<usize, StoreError> {
        Ok(self.find(collection, filter, None)?.len())
    }

    /// Removes a record and every index entry referencing it.
    fn delete_by_id(&self, collection: &Collection, id: &Id) -> Result<(), StoreError>;

    /// Removes the record found by [`Store::find_unique`].
    fn delete_unique(
        &self,
        collection: &Collection,
        field: &str,
        value: &str,
    ) -> Result<(), StoreError> {
        let record = self.find_unique(collection, field, value)?;
        let id = crate::record::id_of(&record).ok_or_else(|| {
            StoreError::unexpected(format!("{} record without id", collection.name))
        })?;
        self.delete_by_id(collection, &id)
    }

    /// Removes every record and index structure of the collection.
    fn scrub(&self, collection: &Collection) -> Result<(), StoreError>;

    /// Releases backend resources. Calling it again is a no-op.
    fn close_session(&self);
}
