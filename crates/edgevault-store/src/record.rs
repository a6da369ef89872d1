//! Field conventions shared by every backend.

use bson::{Bson, Document};
use edgevault_model::{now_millis, Collection, Id};

use crate::filter::as_i64;

/// Field holding the record id.
pub const ID: &str = "_id";
/// Field holding the creation time in milliseconds.
pub const CREATED: &str = "created";
/// Field holding the last modification time in milliseconds.
pub const MODIFIED: &str = "modified";

/// Assigns a fresh id and creation/modification stamps to a new record.
pub fn stamp_new(record: &mut Document) -> Id {
    let id = Id::generate();
    let now = now_millis();
    record.insert(ID, id);
    record.insert(CREATED, now);
    record.insert(MODIFIED, now);
    id
}

/// Restamps a record being updated, keeping its original creation time.
pub fn stamp_update(record: &mut Document, created: i64) {
    record.insert(CREATED, created);
    record.insert(MODIFIED, now_millis().max(created));
}

/// Id of a stored record.
pub fn id_of(record: &Document) -> Option<Id> {
    match record.get(ID) {
        Some(Bson::ObjectId(oid)) => Some(Id::from(*oid)),
        _ => None,
    }
}

/// Creation time of a stored record, 0 when unset.
pub fn created_of(record: &Document) -> i64 {
    record.get(CREATED).and_then(as_i64).unwrap_or(0)
}

/// Values of the collection's unique fields present on the record.
///
/// Empty strings are not indexed, so records without a name never collide.
pub fn unique_values<'a>(
    collection: &Collection,
    record: &'a Document,
) -> Vec<(&'static str, &'a str)> {
    collection
        .unique
        .iter()
        .filter_map(|field| match record.get(*field) {
            Some(Bson::String(value)) if !value.is_empty() => Some((*field, value.as_str())),
            _ => None,
        })
        .collect()
}
