//! Typed per-entity API over a [`Store`].

use std::sync::Arc;

use bson::Document;
use edgevault_model::{Entity, Id};

use crate::error::StoreError;
use crate::filter::Filter;
use crate::traits::Store;

/// Typed access to every record family.
///
/// The per-entity operations live in the `data`, `metadata` and `export`
/// modules; each one translates into a handful of [`Store`] calls so every
/// backend answers them identically. Ids are taken as strings and rejected
/// with [`StoreError::InvalidId`] when malformed.
#[derive(Clone)]
pub struct Database {
    store: Arc<dyn Store>,
}

impl Database {
    /// Wraps a connected store.
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Underlying record-level store.
    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    /// Backend name.
    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }

    /// Releases the backend session. Safe to call more than once.
    pub fn close_session(&self) {
        self.store.close_session();
    }

    pub(crate) fn add<T: Entity>(&self, record: &T) -> Result<Id, StoreError> {
        let document = bson::to_document(record)?;
        self.store.insert(T::COLLECTION, document)
    }

    pub(crate) fn update<T: Entity>(&self, record: &T) -> Result<(), StoreError> {
        if record.id().is_none() {
            return Err(StoreError::not_found(T::COLLECTION.name, "record without id"));
        }
        let document = bson::to_document(record)?;
        self.store.update(T::COLLECTION, document)
    }

    pub(crate) fn by_id<T: Entity>(&self, id: &str) -> Result<T, StoreError> {
        self.get(&Id::parse(id)?)
    }

    pub(crate) fn get<T: Entity>(&self, id: &Id) -> Result<T, StoreError> {
        decode(self.store.find_by_id(T::COLLECTION, id)?)
    }

    pub(crate) fn by_field<T: Entity>(&self, field: &str, value: &str) -> Result<T, StoreError> {
        decode(self.store.find_unique(T::COLLECTION, field, value)?)
    }

    pub(crate) fn all<T: Entity>(&self, limit: Option<usize>) -> Result<Vec<T>, StoreError> {
        decode_all(self.store.find_all(T::COLLECTION, limit)?)
    }

    pub(crate) fn matching<T: Entity>(
        &self,
        filter: Filter,
        limit: Option<usize>,
    ) -> Result<Vec<T>, StoreError> {
        decode_all(self.store.find(T::COLLECTION, &filter, limit)?)
    }

    pub(crate) fn created_between<T: Entity>(
        &self,
        start: i64,
        end: i64,
        limit: Option<usize>,
    ) -> Result<Vec<T>, StoreError> {
        decode_all(
            self.store
                .find_created_between(T::COLLECTION, start, end, limit)?,
        )
    }

    pub(crate) fn count<T: Entity>(&self) -> Result<usize, StoreError> {
        self.store.count(T::COLLECTION)
    }

    pub(crate) fn count_matching<T: Entity>(&self, filter: Filter) -> Result<usize, StoreError> {
        self.store.count_matching(T::COLLECTION, &filter)
    }

    pub(crate) fn delete<T: Entity>(&self, id: &str) -> Result<(), StoreError> {
        self.remove::<T>(&Id::parse(id)?)
    }

    pub(crate) fn remove<T: Entity>(&self, id: &Id) -> Result<(), StoreError> {
        self.store.delete_by_id(T::COLLECTION, id)
    }

    pub(crate) fn delete_by_field<T: Entity>(
        &self,
        field: &str,
        value: &str,
    ) -> Result<(), StoreError> {
        self.store.delete_unique(T::COLLECTION, field, value)
    }

    pub(crate) fn scrub<T: Entity>(&self) -> Result<(), StoreError> {
        self.store.scrub(T::COLLECTION)
    }
}

fn decode<T: Entity>(document: Document) -> Result<T, StoreError> {
    Ok(bson::from_document(document)?)
}

fn decode_all<T: Entity>(documents: Vec<Document>) -> Result<Vec<T>, StoreError> {
    documents.into_iter().map(decode).collect()
}
