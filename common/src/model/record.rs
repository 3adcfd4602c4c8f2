use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One recipient's resolved field values, keyed by field name.
///
/// Built fresh from a table row for every run and never changed once
/// rendering starts. Keys are kept sorted so iteration is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipientRecord {
    fields: BTreeMap<String, String>,
}

impl RecipientRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw value for `field`, if the field is present at all.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Trimmed value for `field`; absent fields read as the empty string.
    pub fn value(&self, field: &str) -> &str {
        self.get(field).map(str::trim).unwrap_or("")
    }

    /// True when the field is absent or only whitespace.
    pub fn is_blank(&self, field: &str) -> bool {
        self.value(field).is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Recipient address, trimmed.
    pub fn email(&self) -> &str {
        self.value("Email")
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RecipientRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}


/// Outcome of checking a record against its variant's schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationResult {
    Valid,
    /// Names the first missing or malformed field encountered.
    Invalid(String),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            ValidationResult::Valid => None,
            ValidationResult::Invalid(reason) => Some(reason),
        }
    }
}
