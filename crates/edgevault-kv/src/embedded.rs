use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use crate::error::KvError;
use crate::traits::KvStore;
use crate::transaction::{Guard, Transaction, Write};

#[derive(Debug, Default)]
struct SortedSet {
    scores: HashMap<String, i64>,
    order: BTreeSet<(i64, String)>,
}

impl SortedSet {
    fn add(&mut self, score: i64, member: &str) {
        if let Some(old) = self.scores.insert(member.to_string(), score) {
            self.order.remove(&(old, member.to_string()));
        }
        self.order.insert((score, member.to_string()));
    }

    fn remove(&mut self, member: &str) {
        if let Some(old) = self.scores.remove(member) {
            self.order.remove(&(old, member.to_string()));
        }
    }
}

#[derive(Debug, Default)]
struct Keyspace {
    strings: HashMap<String, Vec<u8>>,
    zsets: HashMap<String, SortedSet>,
    hashes: HashMap<String, HashMap<String, String>>,
}

impl Keyspace {
    fn check(&self, guard: &Guard) -> Result<(), KvError> {
        let current = match guard {
            Guard::Unchanged { key, .. } => self.strings.get(key).map(Vec::as_slice),
            Guard::FieldFree { key, field, .. } => self
                .hashes
                .get(key)
                .and_then(|hash| hash.get(field))
                .map(String::as_bytes),
        };
        guard.check(current).map_err(KvError::Rejected)
    }

    fn apply(&mut self, write: &Write) {
        match write {
            Write::Set { key, value } => {
                self.strings.insert(key.clone(), value.clone());
            }
            Write::Del { key } => {
                self.strings.remove(key);
                self.zsets.remove(key);
                self.hashes.remove(key);
            }
            Write::ZAdd { key, score, member } => {
                self.zsets.entry(key.clone()).or_default().add(*score, member);
            }
            Write::ZRem { key, member } => {
                if let Some(set) = self.zsets.get_mut(key) {
                    set.remove(member);
                    if set.scores.is_empty() {
                        self.zsets.remove(key);
                    }
                }
            }
            Write::HSet { key, field, value } => {
                self.hashes
                    .entry(key.clone())
                    .or_default()
                    .insert(field.clone(), value.clone());
            }
            Write::HDel { key, field } => {
                if let Some(hash) = self.hashes.get_mut(key) {
                    hash.remove(field);
                    if hash.is_empty() {
                        self.hashes.remove(key);
                    }
                }
            }
            Write::Scrub { ordering, prefix } => {
                self.zsets.remove(ordering);
                self.strings.retain(|key, _| !key.starts_with(prefix.as_str()));
                self.zsets.retain(|key, _| !key.starts_with(prefix.as_str()));
                self.hashes.retain(|key, _| !key.starts_with(prefix.as_str()));
            }
        }
    }
}

/// In-process keyspace with the command semantics of the Redis transport.
///
/// One mutex covers the whole keyspace, so a transaction's guards and
/// writes are observed atomically by every other caller.
#[derive(Debug, Default)]
pub struct EmbeddedKv {
    keyspace: Mutex<Keyspace>,
    closed: AtomicBool,
}

impl EmbeddedKv {
    /// Creates an empty keyspace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every live key, sorted.
    pub fn keys(&self) -> Vec<String> {
        let keyspace = self.keyspace.lock();
        let mut keys: Vec<String> = keyspace
            .strings
            .keys()
            .chain(keyspace.zsets.keys())
            .chain(keyspace.hashes.keys())
            .cloned()
            .collect();
        keys.sort();
        keys
    }

    fn open(&self) -> Result<parking_lot::MutexGuard<'_, Keyspace>, KvError> {
        if self.is_closed() {
            return Err(KvError::Closed);
        }
        Ok(self.keyspace.lock())
    }
}

fn take<T>(items: impl Iterator<Item = T>, limit: Option<usize>) -> Vec<T> {
    items.take(limit.unwrap_or(usize::MAX)).collect()
}

impl KvStore for EmbeddedKv {
    fn name(&self) -> &'static str {
        "embedded"
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KvError> {
        Ok(self.open()?.strings.get(key).cloned())
    }

    fn mget(&self, keys: &[String]) -> Result<Vec<Option<Vec<u8>>>, KvError> {
        let keyspace = self.open()?;
        Ok(keys.iter().map(|key| keyspace.strings.get(key).cloned()).collect())
    }

    fn zrange(&self, key: &str, limit: Option<usize>) -> Result<Vec<String>, KvError> {
        let keyspace = self.open()?;
        Ok(keyspace
            .zsets
            .get(key)
            .map(|set| take(set.order.iter().map(|(_, member)| member.clone()), limit))
            .unwrap_or_default())
    }

    fn zrange_by_score(
        &self,
        key: &str,
        min: i64,
        max: i64,
        limit: Option<usize>,
    ) -> Result<Vec<String>, KvError> {
        if min > max {
            return Ok(Vec::new());
        }
        let keyspace = self.open()?;
        Ok(keyspace
            .zsets
            .get(key)
            .map(|set| {
                let members = set
                    .order
                    .range((min, String::new())..)
                    .take_while(|(score, _)| *score <= max)
                    .map(|(_, member)| member.clone());
                take(members, limit)
            })
            .unwrap_or_default())
    }

    fn zcard(&self, key: &str) -> Result<usize, KvError> {
        Ok(self
            .open()?
            .zsets
            .get(key)
            .map(|set| set.scores.len())
            .unwrap_or(0))
    }

    fn hget(&self, key: &str, field: &str) -> Result<Option<String>, KvError> {
        Ok(self
            .open()?
            .hashes
            .get(key)
            .and_then(|hash| hash.get(field))
            .cloned())
    }

    fn ping(&self) -> Result<(), KvError> {
        self.open().map(drop)
    }

    fn exec(&self, tx: &Transaction) -> Result<(), KvError> {
        let mut keyspace = self.open()?;
        for guard in &tx.guards {
            keyspace.check(guard)?;
        }
        for write in &tx.writes {
            keyspace.apply(write);
        }
        Ok(())
    }

    fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}
