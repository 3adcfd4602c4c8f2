use serde::Serialize;

/// Field names a template variant understands, split by whether a row must
/// carry a value for them.
///
/// Both lists are ordered. Validation walks `required` front to back, so the
/// first missing field reported for a row is always the same one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSchema {
    pub required: &'static [&'static str],
    pub optional: &'static [&'static str],
}

/// Whether a placeholder must be filled for the row to be sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PlaceholderRequirement {
    Required,
    Optional,
}

impl FieldSchema {
    /// Every field of the schema, required ones first.
    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.required.iter().chain(self.optional.iter()).copied()
    }

    pub fn requirement(&self, field: &str) -> Option<PlaceholderRequirement> {
        if self.required.contains(&field) {
            Some(PlaceholderRequirement::Required)
        } else if self.optional.contains(&field) {
            Some(PlaceholderRequirement::Optional)
        } else {
            None
        }
    }

    pub fn is_required(&self, field: &str) -> bool {
        self.required.contains(&field)
    }
}
