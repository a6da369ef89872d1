use crate::error::KvError;
use crate::transaction::Transaction;

/// Primitive commands the index engine is built from.
///
/// Implementations are shared across threads; each call is independent
/// except [`KvStore::exec`], which applies a whole [`Transaction`]
/// atomically or not at all.
pub trait KvStore: Send + Sync {
    /// Transport name for logs.
    fn name(&self) -> &'static str;

    /// GET key.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KvError>;

    /// MGET keys, one slot per key.
    fn mget(&self, keys: &[String]) -> Result<Vec<Option<Vec<u8>>>, KvError>;

    /// Members of a sorted set, lowest score first, at most `limit`.
    fn zrange(&self, key: &str, limit: Option<usize>) -> Result<Vec<String>, KvError>;

    /// Members scored within `[min, max]`, lowest first, at most `limit`.
    fn zrange_by_score(
        &self,
        key: &str,
        min: i64,
        max: i64,
        limit: Option<usize>,
    ) -> Result<Vec<String>, KvError>;

    /// Cardinality of a sorted set.
    fn zcard(&self, key: &str) -> Result<usize, KvError>;

    /// HGET key field.
    fn hget(&self, key: &str, field: &str) -> Result<Option<String>, KvError>;

    /// Round trip to check connectivity.
    fn ping(&self) -> Result<(), KvError>;

    /// Checks the guards and applies the writes atomically.
    fn exec(&self, tx: &Transaction) -> Result<(), KvError>;

    /// Releases resources; later calls fail with [`KvError::Closed`].
    fn close(&self);

    /// Returns true once [`KvStore::close`] ran.
    fn is_closed(&self) -> bool;
}
