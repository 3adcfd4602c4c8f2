use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Maps a field name to the zero-based column it is read from.
///
/// Resolved once before a run starts and shared read-only by every row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnMapping {
    columns: BTreeMap<String, usize>,
}

impl ColumnMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, column: usize) {
        self.columns.insert(field.into(), column);
    }

    pub fn get(&self, field: &str) -> Option<usize> {
        self.columns.get(field).copied()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.columns.contains_key(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.columns.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, usize)> for ColumnMapping {
    fn from_iter<I: IntoIterator<Item = (K, usize)>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// A caller supplied column reference: either a position or a header title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnRef {
    Index(usize),
    Header(String),
}

/// How one schema field ended up bound to the uploaded table.
///
/// Returned to clients after a mapping has been resolved so they can review
/// which header feeds which placeholder, together with an example value.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct ColumnBinding {
    /// The schema field name (e.g. `EventTitle`).
    pub field: String,
    /// Zero-based column index the field reads from.
    pub column: usize,
    /// The header title found at that column.
    pub header: String,
    /// Whether the active schema requires this field.
    pub required: bool,
    /// Value of the first data row at that column, if any.
    pub first_row: Option<String>,
}
