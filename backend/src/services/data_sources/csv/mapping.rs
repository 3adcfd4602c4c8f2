//! Field-to-column mapping for a table source.
//!
//! Suggestions come from header titles; explicit overrides from the caller
//! win. The final mapping must cover every required field of the variant or
//! the run is refused before anything is sent.

use crate::error::ConfigurationError;
use crate::services::templates::schema::schema;
use common::model::csv::{ColumnBinding, ColumnMapping, ColumnRef};
use common::model::datasource::Table;
use common::model::template::TemplateVariant;
use common::requests::MappingOverrides;

const FIRST_NAME_HEADERS: [&str; 3] = ["firstname", "first name", "first_name"];
const LAST_NAME_HEADERS: [&str; 3] = ["lastname", "last name", "last_name"];

fn find_header(headers: &[String], wanted: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(wanted.trim()))
}

/// Mapping guessed from the header row alone.
///
/// A table with split first/last name columns and no `Name` column maps
/// `FirstName` and `LastName` and leaves `Name` to be synthesized.
pub fn suggest_mapping(headers: &[String], variant: TemplateVariant) -> ColumnMapping {
    let lowered: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();
    let mut mapping = ColumnMapping::new();

    let has_name = lowered.iter().any(|h| h == "name");
    let first = lowered
        .iter()
        .position(|h| FIRST_NAME_HEADERS.contains(&h.as_str()));
    let last = lowered
        .iter()
        .position(|h| LAST_NAME_HEADERS.contains(&h.as_str()));
    let split_name = match (has_name, first, last) {
        (false, Some(first), Some(last)) => {
            mapping.insert("FirstName", first);
            mapping.insert("LastName", last);
            true
        }
        _ => false,
    };

    for field in schema(variant).fields() {
        if (field == "Name" && split_name) || mapping.contains(field) {
            continue;
        }
        if let Some(idx) = find_header(headers, field) {
            mapping.insert(field, idx);
        }
    }
    mapping
}

/// Applies caller overrides on top of `mapping`.
pub fn apply_overrides(
    mut mapping: ColumnMapping,
    headers: &[String],
    overrides: &MappingOverrides,
) -> Result<ColumnMapping, ConfigurationError> {
    for (field, column) in overrides {
        let idx = match column {
            ColumnRef::Index(idx) => *idx,
            ColumnRef::Header(header) => {
                find_header(headers, header).ok_or_else(|| ConfigurationError::UnknownHeader {
                    field: field.clone(),
                    header: header.clone(),
                })?
            }
        };
        mapping.insert(field.as_str(), idx);
    }
    Ok(mapping)
}

/// Checks that the mapping is usable against `headers`.
pub fn check_mapping(
    mapping: &ColumnMapping,
    headers: &[String],
    variant: TemplateVariant,
) -> Result<(), ConfigurationError> {
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(ConfigurationError::EmptyHeader);
    }

    if let Some((field, index)) = mapping.iter().find(|(_, idx)| *idx >= headers.len()) {
        return Err(ConfigurationError::ColumnOutOfRange {
            field: field.to_string(),
            index,
            columns: headers.len(),
        });
    }

    for field in schema(variant).required {
        let resolved = match *field {
            "Name" => {
                mapping.contains("Name")
                    || (mapping.contains("FirstName") && mapping.contains("LastName"))
            }
            other => mapping.contains(other),
        };
        if !resolved {
            return Err(ConfigurationError::UnresolvedField(field.to_string()));
        }
    }
    Ok(())
}

/// Suggestion, overrides and check in one step.
pub fn resolve_mapping(
    headers: &[String],
    variant: TemplateVariant,
    overrides: &MappingOverrides,
) -> Result<ColumnMapping, ConfigurationError> {
    let mapping = apply_overrides(suggest_mapping(headers, variant), headers, overrides)?;
    check_mapping(&mapping, headers, variant)?;
    Ok(mapping)
}

/// Human-readable summary of a resolved mapping, in schema order.
pub fn bindings(mapping: &ColumnMapping, table: &Table, variant: TemplateVariant) -> Vec<ColumnBinding> {
    let schema = schema(variant);
    let mut fields: Vec<&str> = schema.fields().filter(|f| mapping.contains(f)).collect();
    // Overrides may target fields outside the schema.
    fields.extend(mapping.iter().map(|(f, _)| f).filter(|f| schema.requirement(f).is_none()));

    fields
        .into_iter()
        .filter_map(|field| {
            let column = mapping.get(field)?;
            Some(ColumnBinding {
                field: field.to_string(),
                column,
                header: table.headers.get(column).cloned().unwrap_or_default(),
                required: schema.is_required(field),
                first_row: table.rows.first().and_then(|row| row.get(column)).cloned(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::model::template::CertificateKind;

    const ATTACHED: TemplateVariant = TemplateVariant::Certificate(CertificateKind::Attached);

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn suggests_case_insensitive_matches() {
        let h = headers(&["EMAIL", "name", "Certificateid", "Other"]);
        let mapping = suggest_mapping(&h, ATTACHED);
        assert_eq!(mapping.get("Email"), Some(0));
        assert_eq!(mapping.get("Name"), Some(1));
        assert_eq!(mapping.get("CertificateID"), Some(2));
        assert_eq!(mapping.len(), 3);
    }

    #[test]
    fn split_name_columns_replace_name() {
        let h = headers(&["First Name", "last_name", "Email"]);
        let mapping = suggest_mapping(&h, ATTACHED);
        assert_eq!(mapping.get("FirstName"), Some(0));
        assert_eq!(mapping.get("LastName"), Some(1));
        assert!(!mapping.contains("Name"));
        assert!(check_mapping(&mapping, &h, ATTACHED).is_ok());
    }

    #[test]
    fn name_column_wins_over_split_columns() {
        let h = headers(&["Name", "FirstName", "LastName", "Email"]);
        let mapping = suggest_mapping(&h, ATTACHED);
        assert_eq!(mapping.get("Name"), Some(0));
        assert_eq!(mapping.get("FirstName"), Some(1));
    }

    #[test]
    fn overrides_accept_index_or_header() {
        let h = headers(&["Full Name", "Mail", "Id"]);
        let overrides: MappingOverrides = serde_json::from_str(
            r#"{"Name": "full name", "Email": 1, "CertificateID": "ID"}"#,
        )
        .unwrap();
        let mapping = resolve_mapping(&h, ATTACHED, &overrides).unwrap();
        assert_eq!(mapping.get("Name"), Some(0));
        assert_eq!(mapping.get("Email"), Some(1));
        assert_eq!(mapping.get("CertificateID"), Some(2));
    }

    #[test]
    fn unknown_override_header_is_fatal() {
        let h = headers(&["Name", "Email"]);
        let overrides: MappingOverrides = serde_json::from_str(r#"{"Email": "Address"}"#).unwrap();
        assert_eq!(
            resolve_mapping(&h, ATTACHED, &overrides),
            Err(ConfigurationError::UnknownHeader {
                field: "Email".to_string(),
                header: "Address".to_string()
            })
        );
    }

    #[test]
    fn missing_required_field_is_fatal() {
        let h = headers(&["Name", "EventTitle"]);
        assert_eq!(
            resolve_mapping(&h, TemplateVariant::Event, &MappingOverrides::new()),
            Err(ConfigurationError::UnresolvedField("Email".to_string()))
        );
    }

    #[test]
    fn out_of_range_index_is_fatal() {
        let h = headers(&["Name", "Email"]);
        let overrides: MappingOverrides = serde_json::from_str(r#"{"Email": 7}"#).unwrap();
        assert!(matches!(
            resolve_mapping(&h, ATTACHED, &overrides),
            Err(ConfigurationError::ColumnOutOfRange { index: 7, columns: 2, .. })
        ));
    }

    #[test]
    fn empty_header_row_is_fatal() {
        assert_eq!(
            resolve_mapping(&[], ATTACHED, &MappingOverrides::new()),
            Err(ConfigurationError::EmptyHeader)
        );
        assert_eq!(
            resolve_mapping(&headers(&["", " "]), ATTACHED, &MappingOverrides::new()),
            Err(ConfigurationError::EmptyHeader)
        );
    }

    #[test]
    fn bindings_follow_schema_order() {
        let table = Table {
            headers: headers(&["Email", "Name"]),
            rows: vec![headers(&["ada@example.com", "Ada"])],
        };
        let mapping = suggest_mapping(&table.headers, ATTACHED);
        let bound = bindings(&mapping, &table, ATTACHED);
        assert_eq!(bound[0].field, "Name");
        assert_eq!(bound[0].header, "Name");
        assert!(bound[0].required);
        assert_eq!(bound[1].first_row.as_deref(), Some("ada@example.com"));
    }
}
