use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::info;

use crate::embedded::EmbeddedKv;
use crate::error::KvError;
use crate::redis_pool::RedisPool;
use crate::traits::KvStore;

/// Where a key-value pool connects to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Transport {
    /// Redis over TCP.
    Tcp {
        /// Host name or address.
        host: String,
        /// Port.
        port: u16,
    },
    /// Redis over a Unix domain socket.
    Unix(PathBuf),
    /// Named in-process keyspace.
    Embedded(String),
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tcp { host, port } => write!(f, "tcp://{host}:{port}"),
            Self::Unix(path) => write!(f, "unix://{}", path.display()),
            Self::Embedded(name) => write!(f, "embedded://{name}"),
        }
    }
}

/// Connection settings for the Redis transports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectOptions {
    /// Logical database index.
    pub db: i64,
    /// ACL user name.
    pub username: Option<String>,
    /// Password.
    pub password: Option<String>,
    /// Upper bound on establishing a connection.
    pub connect_timeout: Duration,
    /// Read and write timeout on established connections; zero disables it.
    pub socket_timeout: Duration,
    /// Idle connections kept for reuse.
    pub max_idle: usize,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            db: 0,
            username: None,
            password: None,
            connect_timeout: Duration::from_millis(5000),
            socket_timeout: Duration::from_millis(5000),
            max_idle: 1,
        }
    }
}

struct Lease {
    pool: Arc<dyn KvStore>,
    holders: usize,
}

/// Shares one pool per transport between engines.
///
/// Every acquire takes a lease on the transport's pool and every release
/// gives one back; the pool is closed when its last lease is released. The
/// next acquire after that builds a fresh pool.
#[derive(Default)]
pub struct PoolRegistry {
    pools: Mutex<HashMap<Transport, Lease>>,
}

impl PoolRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Leases the live pool for `transport`, creating it if needed.
    pub fn acquire(
        &self,
        transport: &Transport,
        options: &ConnectOptions,
    ) -> Result<Arc<dyn KvStore>, KvError> {
        let mut pools = self.pools.lock();
        if let Some(lease) = pools.get_mut(transport) {
            if !lease.pool.is_closed() {
                lease.holders += 1;
                return Ok(Arc::clone(&lease.pool));
            }
        }

        let pool: Arc<dyn KvStore> = match transport {
            Transport::Embedded(_) => Arc::new(EmbeddedKv::new()),
            Transport::Tcp { .. } | Transport::Unix(_) => {
                Arc::new(RedisPool::open(transport, options)?)
            }
        };
        info!(transport = %transport, kind = pool.name(), "key-value pool created");
        pools.insert(
            transport.clone(),
            Lease {
                pool: Arc::clone(&pool),
                holders: 1,
            },
        );
        Ok(pool)
    }

    /// Gives back one lease on `transport`, closing the pool with the last.
    pub fn release(&self, transport: &Transport) {
        let mut pools = self.pools.lock();
        let Some(lease) = pools.get_mut(transport) else {
            return;
        };
        lease.holders = lease.holders.saturating_sub(1);
        if lease.holders > 0 {
            return;
        }
        if let Some(lease) = pools.remove(transport) {
            lease.pool.close();
            info!(transport = %transport, "key-value pool released");
        }
    }

    /// Closes every pool regardless of outstanding leases.
    pub fn close_all(&self) {
        let pools: Vec<_> = self.pools.lock().drain().collect();
        for (transport, lease) in pools {
            lease.pool.close();
            info!(transport = %transport, "key-value pool released");
        }
    }

    /// Leases held on `transport`'s pool.
    pub fn holders(&self, transport: &Transport) -> usize {
        self.pools
            .lock()
            .get(transport)
            .map_or(0, |lease| lease.holders)
    }

    /// Number of live pools.
    pub fn len(&self) -> usize {
        self.pools.lock().len()
    }

    /// Returns true when no pool is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
