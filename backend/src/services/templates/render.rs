//! Pure rendering of subject, HTML and plain-text bodies for one recipient.
//!
//! Rendering happens in two passes. First the variant computes its
//! conditional sections, each either empty or a complete block, for both the
//! HTML and the text rendering from the same presence decisions. Then the
//! fixed skeleton is filled in one substitution pass from the record values
//! plus those sections. Missing optional data only shrinks the output; a
//! placeholder nothing provides stays in the output as literal text.

use super::placeholder::substitute;
use super::schema::{default_subject_pattern, subject_fallback};
use super::{certificate, event};
use common::model::record::RecipientRecord;
use common::model::template::TemplateVariant;
use serde::Serialize;
use std::collections::HashMap;

/// Subject and both bodies for a recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedContent {
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// Conditional blocks keyed by placeholder name, one value per rendering.
#[derive(Debug, Default)]
pub(crate) struct Sections {
    html: HashMap<&'static str, String>,
    text: HashMap<&'static str, String>,
}

impl Sections {
    pub(crate) fn set(&mut self, name: &'static str, html: String, text: String) {
        self.html.insert(name, html);
        self.text.insert(name, text);
    }

    #[cfg(test)]
    pub(crate) fn html(&self, name: &str) -> Option<&str> {
        self.html.get(name).map(String::as_str)
    }

    #[cfg(test)]
    pub(crate) fn text(&self, name: &str) -> Option<&str> {
        self.text.get(name).map(String::as_str)
    }
}

/// Renders as if every attachment the variant wants is included.
pub fn render(
    record: &RecipientRecord,
    variant: TemplateVariant,
    custom_subject: Option<&str>,
) -> RenderedContent {
    render_with_attachment(record, variant, custom_subject, variant.requires_attachment())
}

/// Renders for a message that does or does not actually carry the attachment,
/// so the body never announces a file that is missing.
pub fn render_with_attachment(
    record: &RecipientRecord,
    variant: TemplateVariant,
    custom_subject: Option<&str>,
    attachment_included: bool,
) -> RenderedContent {
    let (html_template, text_template, sections) = match variant {
        TemplateVariant::Certificate(kind) => (
            certificate::HTML_TEMPLATE,
            certificate::TEXT_TEMPLATE,
            certificate::sections(record, kind, attachment_included),
        ),
        TemplateVariant::Event => (
            event::HTML_TEMPLATE,
            event::TEXT_TEMPLATE,
            event::sections(record),
        ),
    };

    let html = substitute(html_template, |key| {
        sections
            .html
            .get(key)
            .map(String::as_str)
            .or_else(|| record.get(key))
    });
    let text = substitute(text_template, |key| {
        sections
            .text
            .get(key)
            .map(String::as_str)
            .or_else(|| record.get(key))
    });

    RenderedContent {
        subject: render_subject(record, variant, custom_subject),
        html,
        text,
    }
}

/// Fills the subject pattern from the record. Values are inserted verbatim.
pub fn render_subject(
    record: &RecipientRecord,
    variant: TemplateVariant,
    custom_subject: Option<&str>,
) -> String {
    let pattern = match custom_subject {
        Some(custom) => custom,
        None => match subject_fallback(variant) {
            Some(fallback) if record.is_blank(fallback.unless_present) => fallback.pattern,
            _ => default_subject_pattern(variant),
        },
    };
    substitute(pattern, |key| record.get(key))
}
