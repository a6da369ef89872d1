use bson::{doc, Bson, Document};
use edgevault_store::record::{CREATED, ID};
use edgevault_store::Filter;

/// Native query equivalent to `filter`.
pub fn translate(filter: &Filter) -> Document {
    match filter {
        Filter::Eq { field, value } | Filter::Contains { field, value } => {
            doc! { field.as_str(): value.clone() }
        }
        Filter::In { field, values } => doc! { field.as_str(): { "$in": values.clone() } },
        Filter::Gt { field, value } => doc! { field.as_str(): { "$gt": *value } },
        Filter::Between { field, min, max } => {
            doc! { field.as_str(): { "$gte": *min, "$lte": *max } }
        }
        Filter::And(filters) if filters.is_empty() => Document::new(),
        Filter::And(filters) => {
            let clauses: Vec<Bson> = filters.iter().map(|f| Bson::Document(translate(f))).collect();
            doc! { "$and": clauses }
        }
    }
}

/// Creation order, ties broken by id.
pub fn creation_order() -> Document {
    doc! { CREATED: 1, ID: 1 }
}
