//! Static field schemas, derivation rules and subject patterns for each
//! template variant.

use chrono::{Datelike, Local};
use common::model::place_holder::FieldSchema;
use common::model::template::{CertificateKind, TemplateVariant};
use serde::Deserialize;

const CERTIFICATE_SCHEMA: FieldSchema = FieldSchema {
    required: &["Name", "Email"],
    optional: &[
        "EventName",
        "CourseTitle",
        "EventDate",
        "CompletionDate",
        "EventLocation",
        "ResourcesURL",
        "ResourcesDescription",
        "FeedbackURL",
        "OrgName",
        "SupportEmail",
        "Year",
        "OrgAddress",
        "OrgPhone",
        "TeamOrSignerName",
        "Title",
        "CertificateID",
        "CertificateURL",
        "FirstName",
        "LastName",
    ],
};

const EVENT_SCHEMA: FieldSchema = FieldSchema {
    required: &[
        "Name",
        "Email",
        "OrgName",
        "EventTitle",
        "EventDate",
        "EventTime",
        "EventTimezone",
        "EventLocation",
        "EventDescription",
        "RSVP_URL",
        "CalendarICSURL",
        "SupportEmail",
        "Year",
    ],
    optional: &[
        "Outcome1",
        "Outcome2",
        "Speaker1Name",
        "Speaker1Title",
        "Speaker2Name",
        "Speaker2Title",
        "HeroImageURL",
        "UnsubscribeURL",
        "OrgAddress",
        "FirstName",
        "LastName",
    ],
};

/// Field schema of `variant`.
pub fn schema(variant: TemplateVariant) -> FieldSchema {
    match variant {
        TemplateVariant::Certificate(_) => CERTIFICATE_SCHEMA,
        TemplateVariant::Event => EVENT_SCHEMA,
    }
}

/// Subject used when the caller does not supply one.
pub fn default_subject_pattern(variant: TemplateVariant) -> &'static str {
    match variant {
        TemplateVariant::Certificate(_) => "Thank You for Attending {EventName}",
        TemplateVariant::Event => "Invitation: {EventTitle} — {EventDate}",
    }
}

/// Subject used instead of the default when the field it names is blank.
pub struct SubjectFallback {
    pub unless_present: &'static str,
    pub pattern: &'static str,
}

pub fn subject_fallback(variant: TemplateVariant) -> Option<SubjectFallback> {
    match variant {
        TemplateVariant::Certificate(_) => Some(SubjectFallback {
            unless_present: "EventName",
            pattern: "Thank You for Attending",
        }),
        TemplateVariant::Event => None,
    }
}

/// Per-variant value a row must carry on top of the schema's required list.
pub struct ExtraRequirement {
    pub field: &'static str,
    pub reason: &'static str,
}

pub fn extra_requirement(variant: TemplateVariant) -> ExtraRequirement {
    match variant {
        TemplateVariant::Certificate(CertificateKind::Attached) => ExtraRequirement {
            field: "CertificateID",
            reason: "Missing CertificateID",
        },
        TemplateVariant::Certificate(CertificateKind::Hosted) => ExtraRequirement {
            field: "CertificateURL",
            reason: "Missing CertificateURL",
        },
        TemplateVariant::Event => ExtraRequirement {
            field: "RSVP_URL",
            reason: "Missing RSVP_URL",
        },
    }
}

/// Source of a default value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultValue {
    OrgName,
    SupportEmail,
    SignerName,
    CurrentYear,
    Empty,
}

/// A derivation applied to every normalized record, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    /// Copy `legacy` into `modern` when `modern` is blank and `legacy` is not.
    Alias {
        legacy: &'static str,
        modern: &'static str,
    },
    /// Fill `field` when it is blank or absent.
    Default {
        field: &'static str,
        value: DefaultValue,
    },
}

const CERTIFICATE_RULES: &[FieldRule] = &[
    FieldRule::Alias {
        legacy: "CourseTitle",
        modern: "EventName",
    },
    FieldRule::Alias {
        legacy: "CompletionDate",
        modern: "EventDate",
    },
    FieldRule::Default {
        field: "OrgName",
        value: DefaultValue::OrgName,
    },
    FieldRule::Default {
        field: "SupportEmail",
        value: DefaultValue::SupportEmail,
    },
    FieldRule::Default {
        field: "Year",
        value: DefaultValue::CurrentYear,
    },
    FieldRule::Default {
        field: "TeamOrSignerName",
        value: DefaultValue::SignerName,
    },
    FieldRule::Default {
        field: "Title",
        value: DefaultValue::Empty,
    },
];

/// Derivation rules of `variant`. Event rows carry every value they need, so it has none.
pub fn field_rules(variant: TemplateVariant) -> &'static [FieldRule] {
    match variant {
        TemplateVariant::Certificate(_) => CERTIFICATE_RULES,
        TemplateVariant::Event => &[],
    }
}

/// Organisation-wide fallbacks for blank default-bearing fields.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FieldDefaults {
    pub org_name: String,
    pub support_email: String,
    pub signer_name: String,
}

impl Default for FieldDefaults {
    fn default() -> Self {
        Self {
            org_name: "Our Organization".to_string(),
            support_email: "support@example.org".to_string(),
            signer_name: "The Organizing Team".to_string(),
        }
    }
}

impl FieldDefaults {
    pub fn resolve(&self, value: DefaultValue) -> String {
        match value {
            DefaultValue::OrgName => self.org_name.clone(),
            DefaultValue::SupportEmail => self.support_email.clone(),
            DefaultValue::SignerName => self.signer_name.clone(),
            DefaultValue::CurrentYear => Local::now().year().to_string(),
            DefaultValue::Empty => String::new(),
        }
    }
}
