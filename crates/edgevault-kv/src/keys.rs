use edgevault_model::{Collection, Id};

/// Sorted set ordering the collection's ids by creation time.
pub fn ordering(collection: &Collection) -> String {
    collection.name.to_string()
}

/// Prefix shared by every record and index key of the collection.
pub fn prefix(collection: &Collection) -> String {
    format!("{}:", collection.name)
}

/// Key holding one record.
pub fn record(collection: &Collection, id: &Id) -> String {
    format!("{}:{}", collection.name, id.to_hex())
}

/// Hash indexing a unique field.
pub fn unique_index(collection: &Collection, field: &str) -> String {
    format!("{}:{}", collection.name, field)
}

/// Keys of the given ids, in order.
pub fn records<'a>(collection: &Collection, ids: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    ids.into_iter()
        .map(|id| format!("{}:{}", collection.name, id))
        .collect()
}
