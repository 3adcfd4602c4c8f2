use crate::model::csv::ColumnRef;
use crate::model::options::{CertificateOptions, SendOptions};
use crate::model::template::TemplateVariant;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Field name to column overrides. Fields not listed are matched by header title.
pub type MappingOverrides = BTreeMap<String, ColumnRef>;

#[derive(Deserialize)]
/// Request payload for the CSV verification endpoint.
pub struct VerifyCsvRequest {
    pub data_source_id: String,
    pub variant: TemplateVariant,
    #[serde(default)]
    pub mapping: MappingOverrides,
}

/// Request payload for `POST /api/templates/preview`.
#[derive(Deserialize)]
pub struct PreviewRequest {
    pub data_source_id: String,
    pub variant: TemplateVariant,
    #[serde(default)]
    pub mapping: MappingOverrides,
    #[serde(default)]
    pub custom_subject: Option<String>,
    #[serde(default = "default_max_preview")]
    pub max_preview: usize,
}

fn default_max_preview() -> usize {
    3
}

/// Request payload for `POST /api/merge/start`.
#[derive(Deserialize)]
pub struct StartMergeRequest {
    pub data_source_id: String,
    pub variant: TemplateVariant,
    #[serde(default)]
    pub mapping: MappingOverrides,
    #[serde(default)]
    pub options: SendOptions,
    #[serde(default)]
    pub certificate: Option<CertificateOptions>,
}

/// One rendered sample returned by the preview endpoint.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct PreviewItem {
    pub row: usize,
    pub to: String,
    pub subject: String,
    /// First 200 characters of the plain-text body.
    pub excerpt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsvp_url: Option<String>,
}

/// Result of a verification job, serialized into `JobStatus::Completed`.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct VerifyReport {
    pub total_rows: usize,
    pub valid: usize,
    pub invalid: usize,
    /// `(row number, reason)` for the first invalid rows, in row order. Row 1 is the header.
    pub first_invalid: Vec<(usize, String)>,
}
