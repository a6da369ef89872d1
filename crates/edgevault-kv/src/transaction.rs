use crate::error::Rejection;

/// Condition checked atomically before a transaction's writes apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guard {
    /// The key still holds exactly `value`.
    Unchanged {
        /// Guarded key.
        key: String,
        /// Value read before building the transaction.
        value: Vec<u8>,
    },
    /// The hash field is unset or points at `owner`.
    FieldFree {
        /// Hash key.
        key: String,
        /// Hash field.
        field: String,
        /// Id allowed to hold the field already.
        owner: Option<String>,
    },
}

impl Guard {
    /// Key the guard reads, and therefore watches.
    pub fn key(&self) -> &str {
        match self {
            Self::Unchanged { key, .. } | Self::FieldFree { key, .. } => key,
        }
    }

    /// Judges the guard against the value it reads.
    ///
    /// `current` is the string value for [`Guard::Unchanged`] and the hash
    /// field value for [`Guard::FieldFree`].
    pub fn check(&self, current: Option<&[u8]>) -> Result<(), Rejection> {
        match self {
            Self::Unchanged { key, value } => match current {
                None => Err(Rejection::Missing { key: key.clone() }),
                Some(current) if current != value.as_slice() => {
                    Err(Rejection::Changed { key: key.clone() })
                }
                Some(_) => Ok(()),
            },
            Self::FieldFree { key, field, owner } => match current {
                None => Ok(()),
                Some(holder) if owner.as_deref().map(str::as_bytes) == Some(holder) => Ok(()),
                Some(_) => Err(Rejection::FieldTaken {
                    key: key.clone(),
                    field: field.clone(),
                }),
            },
        }
    }
}

/// Mutation applied by a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Write {
    /// SET key value.
    Set {
        /// Key.
        key: String,
        /// Bytes to store.
        value: Vec<u8>,
    },
    /// DEL key.
    Del {
        /// Key.
        key: String,
    },
    /// ZADD key score member.
    ZAdd {
        /// Sorted set key.
        key: String,
        /// Score.
        score: i64,
        /// Member.
        member: String,
    },
    /// ZREM key member.
    ZRem {
        /// Sorted set key.
        key: String,
        /// Member.
        member: String,
    },
    /// HSET key field value.
    HSet {
        /// Hash key.
        key: String,
        /// Field.
        field: String,
        /// Value.
        value: String,
    },
    /// HDEL key field.
    HDel {
        /// Hash key.
        key: String,
        /// Field.
        field: String,
    },
    /// Unlinks every member of `ordering` prefixed by `prefix`, the
    /// ordering set itself, then every key starting with `prefix`.
    Scrub {
        /// Sorted set of ids.
        ordering: String,
        /// Record and index key prefix.
        prefix: String,
    },
}

/// Guards plus writes, applied all-or-nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transaction {
    /// Checked first; any failure aborts the whole transaction.
    pub guards: Vec<Guard>,
    /// Applied in order once every guard holds.
    pub writes: Vec<Write>,
}

impl Transaction {
    /// Creates an empty transaction.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a guard.
    pub fn guard(&mut self, guard: Guard) -> &mut Self {
        self.guards.push(guard);
        self
    }

    /// Adds a write.
    pub fn write(&mut self, write: Write) -> &mut Self {
        self.writes.push(write);
        self
    }

    /// Distinct keys read by the guards.
    pub fn watched_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.guards.iter().map(Guard::key).collect();
        keys.sort_unstable();
        keys.dedup();
        keys
    }
}
