//! Turns a raw table row into a [`RecipientRecord`].

use super::schema::{field_rules, FieldDefaults, FieldRule};
use common::model::csv::ColumnMapping;
use common::model::record::RecipientRecord;
use common::model::template::TemplateVariant;

/// Builds the record for one row.
///
/// Cells past the end of a short row read as blank and every value is
/// trimmed. `Name` is synthesized from `FirstName`/`LastName` when only those
/// are mapped, then the variant's alias and default rules run once in order.
pub fn normalize(
    row: &[String],
    mapping: &ColumnMapping,
    variant: TemplateVariant,
    defaults: &FieldDefaults,
) -> RecipientRecord {
    let mut record: RecipientRecord = mapping
        .iter()
        .map(|(field, idx)| {
            let value = row.get(idx).map(|cell| cell.trim()).unwrap_or("");
            (field, value)
        })
        .collect();

    if mapping.contains("FirstName") && mapping.contains("LastName") && !mapping.contains("Name") {
        let full = format!("{} {}", record.value("FirstName"), record.value("LastName"));
        record.insert("Name", full.trim());
    }

    apply_rules(&mut record, field_rules(variant), defaults);
    record
}

fn apply_rules(record: &mut RecipientRecord, rules: &[FieldRule], defaults: &FieldDefaults) {
    for rule in rules {
        match *rule {
            FieldRule::Alias { legacy, modern } => {
                if record.is_blank(modern) && !record.is_blank(legacy) {
                    let value = record.value(legacy).to_string();
                    record.insert(modern, value);
                }
            }
            FieldRule::Default { field, value } => {
                if record.is_blank(field) {
                    record.insert(field, defaults.resolve(value));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::model::template::CertificateKind;

    const CERTIFICATE: TemplateVariant = TemplateVariant::Certificate(CertificateKind::Attached);

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn reads_and_trims_mapped_cells() {
        let mapping: ColumnMapping = [("Email", 1), ("Name", 0)].into_iter().collect();
        let record = normalize(
            &row(&["  Ada  ", " ada@x.com"]),
            &mapping,
            TemplateVariant::Event,
            &FieldDefaults::default(),
        );
        assert_eq!(record.get("Name"), Some("Ada"));
        assert_eq!(record.get("Email"), Some("ada@x.com"));
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn short_rows_read_as_blank() {
        let mapping: ColumnMapping = [("Name", 0), ("Email", 5)].into_iter().collect();
        let record = normalize(
            &row(&["Ada"]),
            &mapping,
            TemplateVariant::Event,
            &FieldDefaults::default(),
        );
        assert_eq!(record.get("Email"), Some(""));
    }

    #[test]
    fn synthesizes_name_from_first_and_last() {
        let mapping: ColumnMapping = [("FirstName", 0), ("LastName", 1), ("Email", 2)]
            .into_iter()
            .collect();
        let record = normalize(
            &row(&["Ada", "Lovelace", "ada@x.com"]),
            &mapping,
            TemplateVariant::Event,
            &FieldDefaults::default(),
        );
        assert_eq!(record.get("Name"), Some("Ada Lovelace"));
    }

    #[test]
    fn synthesized_name_is_trimmed_when_one_half_is_blank() {
        let mapping: ColumnMapping = [("FirstName", 0), ("LastName", 1)].into_iter().collect();
        let record = normalize(
            &row(&["Ada", ""]),
            &mapping,
            TemplateVariant::Event,
            &FieldDefaults::default(),
        );
        assert_eq!(record.get("Name"), Some("Ada"));
    }

    #[test]
    fn mapped_name_takes_precedence() {
        let mapping: ColumnMapping = [("Name", 0), ("FirstName", 1), ("LastName", 2)]
            .into_iter()
            .collect();
        let record = normalize(
            &row(&["Grace Hopper", "Ada", "Lovelace"]),
            &mapping,
            TemplateVariant::Event,
            &FieldDefaults::default(),
        );
        assert_eq!(record.get("Name"), Some("Grace Hopper"));
    }

    #[test]
    fn legacy_columns_back_fill_modern_names() {
        let mapping: ColumnMapping = [("CourseTitle", 0), ("CompletionDate", 1), ("EventName", 2)]
            .into_iter()
            .collect();
        let record = normalize(
            &row(&["Rust 101", "2024-05-01", ""]),
            &mapping,
            CERTIFICATE,
            &FieldDefaults::default(),
        );
        assert_eq!(record.get("EventName"), Some("Rust 101"));
        assert_eq!(record.get("EventDate"), Some("2024-05-01"));
    }

    #[test]
    fn alias_never_overwrites_a_modern_value() {
        let mapping: ColumnMapping = [("CourseTitle", 0), ("EventName", 1)].into_iter().collect();
        let record = normalize(
            &row(&["Old", "New"]),
            &mapping,
            CERTIFICATE,
            &FieldDefaults::default(),
        );
        assert_eq!(record.get("EventName"), Some("New"));
    }

    #[test]
    fn defaults_fill_blank_certificate_fields() {
        let defaults = FieldDefaults {
            org_name: "Rust Guild".into(),
            support_email: "help@guild.org".into(),
            signer_name: "Ferris".into(),
        };
        let mapping: ColumnMapping = [("OrgName", 0), ("Name", 1)].into_iter().collect();
        let record = normalize(&row(&["  ", "Ada"]), &mapping, CERTIFICATE, &defaults);
        assert_eq!(record.get("OrgName"), Some("Rust Guild"));
        assert_eq!(record.get("SupportEmail"), Some("help@guild.org"));
        assert_eq!(record.get("TeamOrSignerName"), Some("Ferris"));
        assert_eq!(record.get("Title"), Some(""));
        assert_eq!(record.value("Year").len(), 4);
    }

    #[test]
    fn event_rows_get_no_defaults() {
        let mapping: ColumnMapping = [("Name", 0)].into_iter().collect();
        let record = normalize(
            &row(&["Ada"]),
            &mapping,
            TemplateVariant::Event,
            &FieldDefaults::default(),
        );
        assert!(!record.contains("OrgName"));
        assert!(!record.contains("Year"));
    }
}
