use std::time::Duration;

use bson::{doc, Document};
use edgevault_model::collection::ALL;
use edgevault_model::{Collection, Id};
use edgevault_store::record::{
    created_of, id_of, stamp_new, stamp_update, unique_values, CREATED, ID,
};
use edgevault_store::{Filter, Store, StoreError};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::{
    ClientOptions, Credential, FindOneOptions, FindOptions, IndexOptions, ServerAddress,
};
use mongodb::sync::{Client, Database};
use mongodb::IndexModel;
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::query::{creation_order, translate};

/// Server error code for a unique index violation.
const DUPLICATE_KEY: i32 = 11000;

/// Where and how to reach the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentOptions {
    /// Host name or address.
    pub host: String,
    /// Port.
    pub port: u16,
    /// Database name; also the authentication source.
    pub database: String,
    /// User name, when authentication is enabled.
    pub username: Option<String>,
    /// Password.
    pub password: Option<String>,
    /// Upper bound on establishing a connection.
    pub connect_timeout: Duration,
    /// Upper bound on finding a usable server for an operation.
    pub socket_timeout: Duration,
}

/// [`Store`] backed by a MongoDB database.
pub struct DocumentStore {
    options: DocumentOptions,
    database: Mutex<Option<Database>>,
}

impl DocumentStore {
    /// Prepares a store; [`Store::connect`] opens the client.
    pub fn new(options: DocumentOptions) -> Self {
        Self {
            options,
            database: Mutex::new(None),
        }
    }

    fn collection(
        &self,
        collection: &Collection,
    ) -> Result<mongodb::sync::Collection<Document>, StoreError> {
        self.database
            .lock()
            .as_ref()
            .map(|db| db.collection::<Document>(collection.name))
            .ok_or_else(|| StoreError::unexpected("document store session is not open"))
    }

    fn client_options(&self) -> ClientOptions {
        let options = &self.options;
        let credential = options.username.as_ref().map(|username| {
            Credential::builder()
                .username(username.clone())
                .password(options.password.clone())
                .source(options.database.clone())
                .build()
        });
        ClientOptions::builder()
            .hosts(vec![ServerAddress::Tcp {
                host: options.host.clone(),
                port: Some(options.port),
            }])
            .credential(credential)
            .connect_timeout(non_zero(options.connect_timeout))
            .server_selection_timeout(non_zero(options.socket_timeout))
            .app_name(Some("edgevault".to_string()))
            .build()
    }

    fn ensure_indexes(&self, database: &Database) -> Result<(), StoreError> {
        for collection in ALL {
            let target = database.collection::<Document>(collection.name);
            target
                .create_index(IndexModel::builder().keys(creation_order()).build(), None)
                .map_err(StoreError::unexpected)?;
            for field in collection.unique {
                let unique = IndexOptions::builder()
                    .unique(true)
                    .partial_filter_expression(doc! { *field: { "$gt": "" } })
                    .build();
                let model = IndexModel::builder()
                    .keys(doc! { *field: 1 })
                    .options(unique)
                    .build();
                target
                    .create_index(model, None)
                    .map_err(StoreError::unexpected)?;
            }
        }
        Ok(())
    }
}

fn non_zero(duration: Duration) -> Option<Duration> {
    (!duration.is_zero()).then_some(duration)
}

/// Maps a driver error, recognising unique index violations.
fn classify(collection: &Collection, record: &Document, err: mongodb::error::Error) -> StoreError {
    let code = match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write)) => Some(write.code),
        ErrorKind::Command(command) => Some(command.code),
        _ => None,
    };
    if code != Some(DUPLICATE_KEY) {
        return StoreError::unexpected(err);
    }

    let message = err.to_string();
    let values = unique_values(collection, record);
    let (field, value) = values
        .iter()
        .find(|(field, _)| message.contains(&format!("{field}_1")))
        .or_else(|| values.first())
        .copied()
        .unwrap_or(("name", ""));
    StoreError::duplicate(collection.name, field, value)
}

fn limited(limit: Option<usize>) -> Option<i64> {
    limit.map(|n| i64::try_from(n).unwrap_or(i64::MAX))
}

impl Store for DocumentStore {
    fn backend(&self) -> &'static str {
        "mongodb"
    }

    fn connect(&self) -> Result<(), StoreError> {
        let client = Client::with_options(self.client_options()).map_err(StoreError::unexpected)?;
        let database = client.database(&self.options.database);
        database
            .run_command(doc! { "ping": 1 }, None)
            .map_err(StoreError::unexpected)?;
        self.ensure_indexes(&database)?;
        info!(
            backend = self.backend(),
            host = %self.options.host,
            port = self.options.port,
            database = %self.options.database,
            "document store connected"
        );
        *self.database.lock() = Some(database);
        Ok(())
    }

    fn insert(&self, collection: &Collection, mut record: Document) -> Result<Id, StoreError> {
        let target = self.collection(collection)?;
        let id = stamp_new(&mut record);
        target
            .insert_one(&record, None)
            .map_err(|err| classify(collection, &record, err))?;
        debug!(collection = collection.name, id = %id, "record inserted");
        Ok(id)
    }

    fn update(&self, collection: &Collection, mut record: Document) -> Result<(), StoreError> {
        let target = self.collection(collection)?;
        let id = id_of(&record)
            .ok_or_else(|| StoreError::not_found(collection.name, "record without id"))?;
        let selector = doc! { ID: id };
        let current = target
            .find_one(selector.clone(), None)
            .map_err(StoreError::unexpected)?
            .ok_or_else(|| StoreError::not_found(collection.name, id.to_hex()))?;

        stamp_update(&mut record, created_of(&current));
        let result = target
            .replace_one(selector, &record, None)
            .map_err(|err| classify(collection, &record, err))?;
        if result.matched_count == 0 {
            return Err(StoreError::not_found(collection.name, id.to_hex()));
        }
        debug!(collection = collection.name, id = %id, "record updated");
        Ok(())
    }

    fn find_by_id(&self, collection: &Collection, id: &Id) -> Result<Document, StoreError> {
        self.collection(collection)?
            .find_one(doc! { ID: *id }, None)
            .map_err(StoreError::unexpected)?
            .ok_or_else(|| StoreError::not_found(collection.name, id.to_hex()))
    }

    fn find_unique(
        &self,
        collection: &Collection,
        field: &str,
        value: &str,
    ) -> Result<Document, StoreError> {
        let options = FindOneOptions::builder().sort(creation_order()).build();
        self.collection(collection)?
            .find_one(doc! { field: value }, options)
            .map_err(StoreError::unexpected)?
            .ok_or_else(|| StoreError::not_found(collection.name, value))
    }

    fn find_all(
        &self,
        collection: &Collection,
        limit: Option<usize>,
    ) -> Result<Vec<Document>, StoreError> {
        self.find(collection, &Filter::and([]), limit)
    }

    fn find(
        &self,
        collection: &Collection,
        filter: &Filter,
        limit: Option<usize>,
    ) -> Result<Vec<Document>, StoreError> {
        // A zero limit means "no limit" to the server.
        if limit == Some(0) {
            return Ok(Vec::new());
        }
        let options = FindOptions::builder()
            .sort(creation_order())
            .limit(limited(limit))
            .build();
        self.collection(collection)?
            .find(translate(filter), options)
            .map_err(StoreError::unexpected)?
            .map(|record| record.map_err(StoreError::unexpected))
            .collect()
    }

    fn find_created_between(
        &self,
        collection: &Collection,
        start: i64,
        end: i64,
        limit: Option<usize>,
    ) -> Result<Vec<Document>, StoreError> {
        self.find(collection, &Filter::between(CREATED, start, end), limit)
    }

    fn count(&self, collection: &Collection) -> Result<usize, StoreError> {
        self.count_matching(collection, &Filter::and([]))
    }

    fn count_matching(
        &self,
        collection: &Collection,
        filter: &Filter,
    ) -> Result<usize, StoreError> {
        let count = self
            .collection(collection)?
            .count_documents(translate(filter), None)
            .map_err(StoreError::unexpected)?;
        usize::try_from(count).map_err(StoreError::unexpected)
    }

    fn delete_by_id(&self, collection: &Collection, id: &Id) -> Result<(), StoreError> {
        let result = self
            .collection(collection)?
            .delete_one(doc! { ID: *id }, None)
            .map_err(StoreError::unexpected)?;
        if result.deleted_count == 0 {
            return Err(StoreError::not_found(collection.name, id.to_hex()));
        }
        debug!(collection = collection.name, id = %id, "record deleted");
        Ok(())
    }

    fn scrub(&self, collection: &Collection) -> Result<(), StoreError> {
        self.collection(collection)?
            .delete_many(Document::new(), None)
            .map_err(StoreError::unexpected)?;
        info!(collection = collection.name, "collection scrubbed");
        Ok(())
    }

    fn close_session(&self) {
        if self.database.lock().take().is_some() {
            debug!(backend = self.backend(), "session closed");
        }
    }
}
