//! In-memory backend.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use bson::{Bson, Document};
use edgevault_model::{Collection, Id};
use parking_lot::RwLock;

use crate::error::StoreError;
use crate::filter::Filter;
use crate::record::{self, created_of, id_of, stamp_new, stamp_update, unique_values};
use crate::traits::Store;

/// Keeps each collection as an insertion-ordered vector of documents.
///
/// Intended for tests and single-process tooling; every call takes the lock
/// once, so there is no cross-call isolation.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<&'static str, Vec<Document>>>,
    closed: AtomicBool,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_open(&self) -> Result<(), StoreError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StoreError::unexpected("memory session is closed"));
        }
        Ok(())
    }

    fn read<T>(
        &self,
        collection: &Collection,
        f: impl FnOnce(&[Document]) -> T,
    ) -> Result<T, StoreError> {
        self.ensure_open()?;
        let guard = self.collections.read();
        let records = guard.get(collection.name).map(Vec::as_slice).unwrap_or(&[]);
        Ok(f(records))
    }
}

fn conflict(
    collection: &Collection,
    records: &[Document],
    candidate: &Document,
    owner: Option<&Id>,
) -> Option<StoreError> {
    for (field, value) in unique_values(collection, candidate) {
        let taken = records.iter().any(|existing| {
            matches!(existing.get(field), Some(Bson::String(other)) if other == value)
                && id_of(existing).as_ref() != owner
        });
        if taken {
            return Some(StoreError::duplicate(collection.name, field, value));
        }
    }
    None
}

fn take(records: impl Iterator<Item = Document>, limit: Option<usize>) -> Vec<Document> {
    records.take(limit.unwrap_or(usize::MAX)).collect()
}

impl Store for MemoryStore {
    fn backend(&self) -> &'static str {
        "memorydb"
    }

    fn connect(&self) -> Result<(), StoreError> {
        self.ensure_open()
    }

    fn insert(&self, collection: &Collection, mut record: Document) -> Result<Id, StoreError> {
        self.ensure_open()?;
        let mut guard = self.collections.write();
        let records = guard.entry(collection.name).or_default();
        if let Some(err) = conflict(collection, records, &record, None) {
            return Err(err);
        }
        let id = stamp_new(&mut record);
        records.push(record);
        Ok(id)
    }

    fn update(&self, collection: &Collection, mut record: Document) -> Result<(), StoreError> {
        self.ensure_open()?;
        let id = id_of(&record)
            .ok_or_else(|| StoreError::not_found(collection.name, "record without id"))?;
        let mut guard = self.collections.write();
        let records = guard.entry(collection.name).or_default();
        let position = records
            .iter()
            .position(|existing| id_of(existing) == Some(id))
            .ok_or_else(|| StoreError::not_found(collection.name, id.to_hex()))?;
        if let Some(err) = conflict(collection, records, &record, Some(&id)) {
            return Err(err);
        }
        stamp_update(&mut record, created_of(&records[position]));
        records[position] = record;
        Ok(())
    }

    fn find_by_id(&self, collection: &Collection, id: &Id) -> Result<Document, StoreError> {
        self.read(collection, |records| {
            records
                .iter()
                .find(|record| id_of(record).as_ref() == Some(id))
                .cloned()
        })?
        .ok_or_else(|| StoreError::not_found(collection.name, id.to_hex()))
    }

    fn find_unique(
        &self,
        collection: &Collection,
        field: &str,
        value: &str,
    ) -> Result<Document, StoreError> {
        let filter = Filter::eq(field, value);
        self.read(collection, |records| {
            records.iter().find(|record| filter.matches(record)).cloned()
        })?
        .ok_or_else(|| StoreError::not_found(collection.name, value))
    }

    fn find_all(
        &self,
        collection: &Collection,
        limit: Option<usize>,
    ) -> Result<Vec<Document>, StoreError> {
        self.read(collection, |records| take(records.iter().cloned(), limit))
    }

    fn find(
        &self,
        collection: &Collection,
        filter: &Filter,
        limit: Option<usize>,
    ) -> Result<Vec<Document>, StoreError> {
        self.read(collection, |records| {
            take(
                records.iter().filter(|record| filter.matches(record)).cloned(),
                limit,
            )
        })
    }

    fn find_created_between(
        &self,
        collection: &Collection,
        start: i64,
        end: i64,
        limit: Option<usize>,
    ) -> Result<Vec<Document>, StoreError> {
        self.find(collection, &Filter::between(record::CREATED, start, end), limit)
    }

    fn count(&self, collection: &Collection) -> Result<usize, StoreError> {
        self.read(collection, |records| records.len())
    }

    fn delete_by_id(&self, collection: &Collection, id: &Id) -> Result<(), StoreError> {
        self.ensure_open()?;
        let mut guard = self.collections.write();
        let records = guard.entry(collection.name).or_default();
        let position = records
            .iter()
            .position(|record| id_of(record).as_ref() == Some(id))
            .ok_or_else(|| StoreError::not_found(collection.name, id.to_hex()))?;
        records.remove(position);
        Ok(())
    }

    fn scrub(&self, collection: &Collection) -> Result<(), StoreError> {
        self.ensure_open()?;
        self.collections.write().remove(collection.name);
        Ok(())
    }

    fn close_session(&self) {
        self.closed.store(true, Ordering::Release);
    }
}
