//! Record predicates for selective queries.

use bson::{Bson, Document};

/// Predicate over a stored record.
///
/// Backends without a query engine evaluate filters client-side with
/// [`Filter::matches`]; the document store translates them into its native
/// query language. Field names may be dotted paths into embedded documents.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Field equals the value.
    Eq {
        /// Field path.
        field: String,
        /// Expected value.
        value: Bson,
    },
    /// Field equals one of the values.
    In {
        /// Field path.
        field: String,
        /// Accepted values.
        values: Vec<Bson>,
    },
    /// Array field contains the value.
    Contains {
        /// Field path of an array.
        field: String,
        /// Element to look for.
        value: Bson,
    },
    /// Integer field is strictly greater than the value.
    Gt {
        /// Field path.
        field: String,
        /// Exclusive lower bound.
        value: i64,
    },
    /// Integer field lies within the bounds (inclusive on both ends).
    Between {
        /// Field path.
        field: String,
        /// Inclusive lower bound.
        min: i64,
        /// Inclusive upper bound.
        max: i64,
    },
    /// All filters must match.
    And(Vec<Filter>),
}

impl Filter {
    /// Field equals `value`.
    pub fn eq(field: impl Into<String>, value: impl Into<Bson>) -> Self {
        Self::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Field equals any of `values`.
    pub fn any_of<V: Into<Bson>>(
        field: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Self::In {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Array field contains `value`.
    pub fn contains(field: impl Into<String>, value: impl Into<Bson>) -> Self {
        Self::Contains {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Integer field is greater than `value`.
    pub fn gt(field: impl Into<String>, value: i64) -> Self {
        Self::Gt {
            field: field.into(),
            value,
        }
    }

    /// Integer field lies in `[min, max]`.
    pub fn between(field: impl Into<String>, min: i64, max: i64) -> Self {
        Self::Between {
            field: field.into(),
            min,
            max,
        }
    }

    /// Conjunction of `filters`.
    pub fn and(filters: impl IntoIterator<Item = Filter>) -> Self {
        Self::And(filters.into_iter().collect())
    }

    /// Returns true if the record matches the filter.
    pub fn matches(&self, record: &Document) -> bool {
        match self {
            Self::Eq { field, value } => lookup(record, field)
                .map(|found| same_value(found, value))
                .unwrap_or(false),
            Self::In { field, values } => lookup(record, field)
                .map(|found| values.iter().any(|value| same_value(found, value)))
                .unwrap_or(false),
            Self::Contains { field, value } => match lookup(record, field) {
                Some(Bson::Array(items)) => items.iter().any(|item| same_value(item, value)),
                _ => false,
            },
            Self::Gt { field, value } => lookup(record, field)
                .and_then(as_i64)
                .map(|found| found > *value)
                .unwrap_or(false),
            Self::Between { field, min, max } => lookup(record, field)
                .and_then(as_i64)
                .map(|found| found >= *min && found <= *max)
                .unwrap_or(false),
            Self::And(filters) => filters.iter().all(|filter| filter.matches(record)),
        }
    }
}

/// Resolves a dotted field path inside a document.
pub fn lookup<'a>(record: &'a Document, path: &str) -> Option<&'a Bson> {
    let mut parts = path.split('.');
    let mut current = record.get(parts.next()?)?;
    for part in parts {
        current = match current {
            Bson::Document(inner) => inner.get(part)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Reads an integer value regardless of its BSON width.
pub fn as_i64(value: &Bson) -> Option<i64> {
    match value {
        Bson::Int32(v) => Some(i64::from(*v)),
        Bson::Int64(v) => Some(*v),
        Bson::DateTime(v) => Some(v.timestamp_millis()),
        _ => None,
    }
}

fn same_value(found: &Bson, expected: &Bson) -> bool {
    match (as_i64(found), as_i64(expected)) {
        (Some(a), Some(b)) => a == b,
        _ => found == expected,
    }
}
