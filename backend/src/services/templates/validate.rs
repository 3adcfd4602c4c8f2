use super::schema::{extra_requirement, schema};
use common::model::record::{RecipientRecord, ValidationResult};
use common::model::template::TemplateVariant;
use regex::Regex;
use std::sync::LazyLock;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}$").expect("valid email regex")
});

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Checks `record` against `variant` and reports the first problem found.
///
/// Order is fixed: required fields in schema order, then the email format,
/// then the variant's extra required value. Pure, so previews can call it
/// freely.
pub fn validate(record: &RecipientRecord, variant: TemplateVariant) -> ValidationResult {
    for field in schema(variant).required {
        if *field == "Name" {
            let split_name = !record.is_blank("FirstName") && !record.is_blank("LastName");
            if record.is_blank("Name") && !split_name {
                return ValidationResult::Invalid(
                    "Missing required field: Name (or FirstName/LastName)".to_string(),
                );
            }
        } else if record.is_blank(field) {
            return ValidationResult::Invalid(format!("Missing required field: {}", field));
        }
    }

    let email = record.email();
    if !is_valid_email(email) {
        return ValidationResult::Invalid(format!("Invalid email format: {}", email));
    }

    let extra = extra_requirement(variant);
    if record.is_blank(extra.field) {
        return ValidationResult::Invalid(extra.reason.to_string());
    }

    ValidationResult::Valid
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::model::template::CertificateKind;

    const ATTACHED: TemplateVariant = TemplateVariant::Certificate(CertificateKind::Attached);
    const HOSTED: TemplateVariant = TemplateVariant::Certificate(CertificateKind::Hosted);

    fn record(pairs: &[(&str, &str)]) -> RecipientRecord {
        pairs.iter().copied().collect()
    }

    fn full_event() -> RecipientRecord {
        record(&[
            ("Name", "Ada Lovelace"),
            ("Email", "ada@example.com"),
            ("OrgName", "Analytical Society"),
            ("EventTitle", "Engines"),
            ("EventDate", "2025-03-01"),
            ("EventTime", "18:00"),
            ("EventTimezone", "GMT"),
            ("EventLocation", "London"),
            ("EventDescription", "An evening of engines."),
            ("RSVP_URL", "https://example.com/rsvp"),
            ("CalendarICSURL", "https://example.com/cal.ics"),
            ("SupportEmail", "help@example.com"),
            ("Year", "2025"),
        ])
    }

    #[test]
    fn accepts_a_complete_event_row() {
        assert_eq!(validate(&full_event(), TemplateVariant::Event), ValidationResult::Valid);
    }

    #[test]
    fn reports_first_missing_field_in_schema_order() {
        let mut row = full_event();
        row.insert("EventTime", "");
        row.insert("OrgName", " ");
        assert_eq!(
            validate(&row, TemplateVariant::Event),
            ValidationResult::Invalid("Missing required field: OrgName".to_string())
        );
    }

    #[test]
    fn name_hint_mentions_split_columns() {
        let row = record(&[("Email", "a@x.com"), ("CertificateID", "C-1")]);
        assert_eq!(
            validate(&row, ATTACHED).reason(),
            Some("Missing required field: Name (or FirstName/LastName)")
        );
    }

    #[test]
    fn first_and_last_name_satisfy_name() {
        let row = record(&[
            ("FirstName", "Ada"),
            ("LastName", "Lovelace"),
            ("Email", "ada@x.com"),
            ("CertificateID", "C-1"),
        ]);
        assert!(validate(&row, ATTACHED).is_valid());
    }

    #[test]
    fn only_first_name_is_not_enough() {
        let row = record(&[("FirstName", "Ada"), ("Email", "ada@x.com"), ("CertificateID", "C-1")]);
        assert!(!validate(&row, ATTACHED).is_valid());
    }

    #[test]
    fn rejects_malformed_addresses_even_when_complete() {
        for bad in [
            "plainaddress",
            "ada@",
            "@example.com",
            "ada@example",
            "ada@example.c",
            "ada lovelace@example.com",
            "ada@exa mple.com",
            "ada@example.c0m",
        ] {
            let mut row = full_event();
            row.insert("Email", bad);
            assert_eq!(
                validate(&row, TemplateVariant::Event),
                ValidationResult::Invalid(format!("Invalid email format: {}", bad.trim())),
                "{} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn accepts_grammar_edge_cases() {
        for good in ["a.b+tag@sub.example.org", "x_%-y@a-b.io", "UPPER@EXAMPLE.COM"] {
            assert!(is_valid_email(good), "{} should be accepted", good);
        }
    }

    #[test]
    fn missing_field_is_reported_before_bad_email() {
        let row = record(&[("Name", "Ada"), ("Email", "nope")]);
        assert_eq!(
            validate(&row, TemplateVariant::Event).reason(),
            Some("Missing required field: OrgName")
        );
    }

    #[test]
    fn certificate_kind_selects_extra_field() {
        let row = record(&[("Name", "Ada"), ("Email", "ada@x.com")]);
        assert_eq!(validate(&row, ATTACHED).reason(), Some("Missing CertificateID"));
        assert_eq!(validate(&row, HOSTED).reason(), Some("Missing CertificateURL"));

        let mut hosted = row.clone();
        hosted.insert("CertificateURL", "https://certs.example.com/ada");
        assert!(validate(&hosted, HOSTED).is_valid());
    }

    #[test]
    fn validation_is_repeatable() {
        let mut row = full_event();
        row.insert("Email", "broken");
        let first = validate(&row, TemplateVariant::Event);
        let second = validate(&row, TemplateVariant::Event);
        assert_eq!(first, second);
    }
}
