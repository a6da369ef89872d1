use std::sync::Arc;

use edgevault_kv::{IndexEngine, PoolRegistry};
use edgevault_store::{Database, MemoryStore, Store, StoreError};
use tracing::info;

use crate::config::{BackendKind, StoreConfig};

/// Builds the backend named by `config.backend` and connects it.
///
/// Index engines share their pool through `registry`; the store releases
/// it again on [`Store::close_session`].
pub fn open_store(
    config: &StoreConfig,
    registry: &Arc<PoolRegistry>,
) -> Result<Arc<dyn Store>, StoreError> {
    let kind: BackendKind = config.backend.parse()?;
    let store: Arc<dyn Store> = match kind {
        BackendKind::Memory => Arc::new(MemoryStore::new()),
        BackendKind::Index => Arc::new(IndexEngine::open(
            registry,
            config.transport(),
            &config.connect_options(),
        )?),
        BackendKind::Document => document_store(config)?,
    };

    if let Err(err) = store.connect() {
        store.close_session();
        return Err(err);
    }
    info!(backend = store.backend(), "store opened");
    Ok(store)
}

/// [`open_store`] wrapped in the typed [`Database`] API.
pub fn open_database(
    config: &StoreConfig,
    registry: &Arc<PoolRegistry>,
) -> Result<Database, StoreError> {
    open_store(config, registry).map(Database::new)
}

#[cfg(feature = "mongodb")]
fn document_store(config: &StoreConfig) -> Result<Arc<dyn Store>, StoreError> {
    Ok(Arc::new(edgevault_docstore::DocumentStore::new(
        config.document_options(),
    )))
}

#[cfg(not(feature = "mongodb"))]
fn document_store(config: &StoreConfig) -> Result<Arc<dyn Store>, StoreError> {
    Err(StoreError::UnsupportedBackend(format!(
        "{} (built without the mongodb feature)",
        config.backend
    )))
}
