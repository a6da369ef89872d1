use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bson::Document;
use edgevault_model::{Collection, Id};
use edgevault_store::record::{created_of, id_of, stamp_new, stamp_update, unique_values};
use edgevault_store::{Filter, Store, StoreError};
use tracing::{debug, info, warn};

use crate::error::{KvError, Rejection};
use crate::keys;
use crate::pool::{ConnectOptions, PoolRegistry, Transport};
use crate::traits::KvStore;
use crate::transaction::{Guard, Transaction, Write};

/// Attempts made when a guarded record keeps changing underneath a write.
const WRITE_ATTEMPTS: usize = 5;

/// Keys fetched per MGET round trip.
const MGET_CHUNK: usize = 1024;

/// [`Store`] over a [`KvStore`], keeping records, creation order and
/// unique-field indexes in step.
///
/// Every write is a single guarded [`Transaction`]: uniqueness is checked
/// against the index hashes and the touched record is pinned to the bytes
/// read beforehand, so concurrent writers can never leave a dangling index
/// entry or admit two records with the same unique value.
pub struct IndexEngine {
    kv: Arc<dyn KvStore>,
    lease: Option<(Arc<PoolRegistry>, Transport)>,
    closed: AtomicBool,
}

impl IndexEngine {
    /// Wraps a key-value store the engine owns outright.
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self {
            kv,
            lease: None,
            closed: AtomicBool::new(false),
        }
    }

    /// Acquires the pool for `transport` from `registry`.
    ///
    /// Closing the session releases the pool back to the registry.
    pub fn open(
        registry: &Arc<PoolRegistry>,
        transport: Transport,
        options: &ConnectOptions,
    ) -> Result<Self, StoreError> {
        let kv = registry.acquire(&transport, options)?;
        Ok(Self {
            kv,
            lease: Some((Arc::clone(registry), transport)),
            closed: AtomicBool::new(false),
        })
    }

    fn ensure_open(&self) -> Result<(), StoreError> {
        if self.closed.load(Ordering::Acquire) || self.kv.is_closed() {
            return Err(StoreError::unexpected("index engine session is closed"));
        }
        Ok(())
    }

    /// Fetches and decodes the given ids in order, skipping records that
    /// vanished since the ids were listed.
    fn load<'a>(
        &self,
        collection: &Collection,
        ids: impl IntoIterator<Item = &'a String>,
        mut keep: impl FnMut(&Document) -> bool,
        limit: Option<usize>,
    ) -> Result<Vec<Document>, StoreError> {
        let limit = limit.unwrap_or(usize::MAX);
        let ids: Vec<&str> = ids.into_iter().map(String::as_str).collect();
        let mut records = Vec::new();
        for chunk in ids.chunks(MGET_CHUNK) {
            let values = self.kv.mget(&keys::records(collection, chunk.iter().copied()))?;
            for bytes in values.into_iter().flatten() {
                let record = decode(&bytes)?;
                if keep(&record) {
                    records.push(record);
                    if records.len() >= limit {
                        return Ok(records);
                    }
                }
            }
        }
        Ok(records)
    }

    /// Reads the record, builds a transaction pinned to its current bytes
    /// and submits it, rebuilding while concurrent writers win the race.
    fn rewrite(
        &self,
        collection: &Collection,
        id: &Id,
        build: impl Fn(&Document, Vec<u8>) -> Result<Transaction, StoreError>,
    ) -> Result<(), StoreError> {
        let key = keys::record(collection, id);
        let mut attempt = 0;
        loop {
            attempt += 1;
            let bytes = self
                .kv
                .get(&key)?
                .ok_or_else(|| StoreError::not_found(collection.name, id.to_hex()))?;
            let current = decode(&bytes)?;
            let tx = build(&current, bytes)?;
            match self.kv.exec(&tx) {
                Ok(()) => return Ok(()),
                Err(KvError::Rejected(Rejection::Changed { .. })) if attempt < WRITE_ATTEMPTS => {
                    warn!(
                        collection = collection.name,
                        id = %id,
                        attempt,
                        "record changed concurrently, retrying"
                    );
                }
                Err(KvError::Rejected(rejection)) => {
                    return Err(rejected(collection, rejection, &id.to_hex()))
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}

fn decode(bytes: &[u8]) -> Result<Document, StoreError> {
    Ok(bson::from_slice(bytes)?)
}

fn rejected(collection: &Collection, rejection: Rejection, id: &str) -> StoreError {
    match rejection {
        Rejection::FieldTaken { key, field } => {
            let prefix = keys::prefix(collection);
            let unique = key.strip_prefix(prefix.as_str()).unwrap_or(&key);
            StoreError::duplicate(collection.name, unique, field)
        }
        Rejection::Missing { .. } => StoreError::not_found(collection.name, id),
        Rejection::Changed { key } => {
            StoreError::unexpected(format!("{key} kept changing concurrently"))
        }
    }
}

/// Guards and index writes claiming the record's unique values for `owner`.
fn claim(
    tx: &mut Transaction,
    collection: &Collection,
    record: &Document,
    owner: &str,
    existing: bool,
) {
    for (field, value) in unique_values(collection, record) {
        let index = keys::unique_index(collection, field);
        tx.guard(Guard::FieldFree {
            key: index.clone(),
            field: value.to_string(),
            owner: existing.then(|| owner.to_string()),
        })
        .write(Write::HSet {
            key: index,
            field: value.to_string(),
            value: owner.to_string(),
        });
    }
}

/// Writes removing every key that references the record.
fn unlink(tx: &mut Transaction, collection: &Collection, id: &Id, record: &Document) {
    for (field, value) in unique_values(collection, record) {
        tx.write(Write::HDel {
            key: keys::unique_index(collection, field),
            field: value.to_string(),
        });
    }
    tx.write(Write::ZRem {
        key: keys::ordering(collection),
        member: id.to_hex(),
    })
    .write(Write::Del {
        key: keys::record(collection, id),
    });
}

/// Writes storing the record and its creation-order entry.
fn link(
    tx: &mut Transaction,
    collection: &Collection,
    id: &Id,
    record: &Document,
) -> Result<(), StoreError> {
    tx.write(Write::Set {
        key: keys::record(collection, id),
        value: bson::to_vec(record)?,
    })
    .write(Write::ZAdd {
        key: keys::ordering(collection),
        score: created_of(record),
        member: id.to_hex(),
    });
    Ok(())
}

impl Store for IndexEngine {
    fn backend(&self) -> &'static str {
        "redisdb"
    }

    fn connect(&self) -> Result<(), StoreError> {
        self.ensure_open()?;
        self.kv.ping()?;
        info!(backend = self.backend(), kv = self.kv.name(), "index engine connected");
        Ok(())
    }

    fn insert(&self, collection: &Collection, mut record: Document) -> Result<Id, StoreError> {
        self.ensure_open()?;
        let id = stamp_new(&mut record);
        let mut tx = Transaction::new();
        claim(&mut tx, collection, &record, &id.to_hex(), false);
        link(&mut tx, collection, &id, &record)?;

        self.kv
            .exec(&tx)
            .map_err(|err| match err {
                KvError::Rejected(rejection) => rejected(collection, rejection, &id.to_hex()),
                other => other.into(),
            })?;
        debug!(collection = collection.name, id = %id, "record inserted");
        Ok(id)
    }

    fn update(&self, collection: &Collection, record: Document) -> Result<(), StoreError> {
        self.ensure_open()?;
        let id = id_of(&record)
            .ok_or_else(|| StoreError::not_found(collection.name, "record without id"))?;
        let owner = id.to_hex();

        self.rewrite(collection, &id, |current, bytes| {
            let mut next = record.clone();
            stamp_update(&mut next, created_of(current));

            let mut tx = Transaction::new();
            tx.guard(Guard::Unchanged {
                key: keys::record(collection, &id),
                value: bytes,
            });
            unlink(&mut tx, collection, &id, current);
            claim(&mut tx, collection, &next, &owner, true);
            link(&mut tx, collection, &id, &next)?;
            Ok(tx)
        })?;
        debug!(collection = collection.name, id = %id, "record updated");
        Ok(())
    }

    fn find_by_id(&self, collection: &Collection, id: &Id) -> Result<Document, StoreError> {
        self.ensure_open()?;
        let bytes = self
            .kv
            .get(&keys::record(collection, id))?
            .ok_or_else(|| StoreError::not_found(collection.name, id.to_hex()))?;
        decode(&bytes)
    }

    fn find_unique(
        &self,
        collection: &Collection,
        field: &str,
        value: &str,
    ) -> Result<Document, StoreError> {
        self.ensure_open()?;
        // Empty unique values are never indexed.
        if !collection.is_unique(field) || value.is_empty() {
            return self
                .find(collection, &Filter::eq(field, value), Some(1))?
                .into_iter()
                .next()
                .ok_or_else(|| StoreError::not_found(collection.name, value));
        }

        let owner = self
            .kv
            .hget(&keys::unique_index(collection, field), value)?
            .ok_or_else(|| StoreError::not_found(collection.name, value))?;
        self.find_by_id(collection, &Id::parse(&owner)?)
    }

    fn find_all(
        &self,
        collection: &Collection,
        limit: Option<usize>,
    ) -> Result<Vec<Document>, StoreError> {
        self.ensure_open()?;
        let ids = self.kv.zrange(&keys::ordering(collection), limit)?;
        self.load(collection, &ids, |_| true, None)
    }

    fn find(
        &self,
        collection: &Collection,
        filter: &Filter,
        limit: Option<usize>,
    ) -> Result<Vec<Document>, StoreError> {
        self.ensure_open()?;
        if limit == Some(0) {
            return Ok(Vec::new());
        }
        let ids = self.kv.zrange(&keys::ordering(collection), None)?;
        self.load(collection, &ids, |record| filter.matches(record), limit)
    }

    fn find_created_between(
        &self,
        collection: &Collection,
        start: i64,
        end: i64,
        limit: Option<usize>,
    ) -> Result<Vec<Document>, StoreError> {
        self.ensure_open()?;
        let ids = self
            .kv
            .zrange_by_score(&keys::ordering(collection), start, end, limit)?;
        self.load(collection, &ids, |_| true, None)
    }

    fn count(&self, collection: &Collection) -> Result<usize, StoreError> {
        self.ensure_open()?;
        Ok(self.kv.zcard(&keys::ordering(collection))?)
    }

    fn delete_by_id(&self, collection: &Collection, id: &Id) -> Result<(), StoreError> {
        self.ensure_open()?;
        self.rewrite(collection, id, |current, bytes| {
            let mut tx = Transaction::new();
            tx.guard(Guard::Unchanged {
                key: keys::record(collection, id),
                value: bytes,
            });
            unlink(&mut tx, collection, id, current);
            Ok(tx)
        })?;
        debug!(collection = collection.name, id = %id, "record deleted");
        Ok(())
    }

    fn scrub(&self, collection: &Collection) -> Result<(), StoreError> {
        self.ensure_open()?;
        let mut tx = Transaction::new();
        tx.write(Write::Scrub {
            ordering: keys::ordering(collection),
            prefix: keys::prefix(collection),
        });
        self.kv.exec(&tx)?;
        info!(collection = collection.name, "collection scrubbed");
        Ok(())
    }

    fn close_session(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        match &self.lease {
            Some((registry, transport)) => registry.release(transport),
            None => self.kv.close(),
        }
        debug!(backend = self.backend(), "session closed");
    }
}
