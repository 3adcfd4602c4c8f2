//! `POST /api/templates/preview`: rendered samples before a run.

use super::render::render;
use super::validate::validate;
use crate::config::AppConfig;
use crate::error::MergeError;
use crate::services::data_sources::csv::mapping::resolve_mapping;
use crate::services::data_sources::csv::store::load_table;
use crate::services::merge::orchestrator::records_from_table;
use actix_web::{web, HttpResponse, Responder};
use common::model::record::RecipientRecord;
use common::model::template::TemplateVariant;
use common::requests::{PreviewItem, PreviewRequest};

const EXCERPT_CHARS: usize = 200;

pub(crate) async fn process(
    config: web::Data<AppConfig>,
    payload: web::Json<PreviewRequest>,
) -> impl Responder {
    let req = payload.into_inner();
    match web::block(move || build_preview(&config, &req)).await {
        Ok(Ok(items)) => HttpResponse::Ok().json(items),
        Ok(Err(e)) => HttpResponse::BadRequest().body(e.to_string()),
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
    }
}

fn build_preview(config: &AppConfig, req: &PreviewRequest) -> Result<Vec<PreviewItem>, MergeError> {
    let table = load_table(config, &req.data_source_id)?;
    let mapping = resolve_mapping(&table.headers, req.variant, &req.mapping)?;
    let records = records_from_table(&table, &mapping, req.variant, &config.field_defaults());
    Ok(preview(
        &records,
        req.variant,
        req.custom_subject.as_deref().filter(|s| !s.trim().is_empty()),
        req.max_preview,
    ))
}

/// Renders the first `max` valid records. Invalid ones are passed over.
///
/// `row` is the spreadsheet row number, the header being row 1.
pub fn preview(
    records: &[RecipientRecord],
    variant: TemplateVariant,
    custom_subject: Option<&str>,
    max: usize,
) -> Vec<PreviewItem> {
    records
        .iter()
        .enumerate()
        .filter(|(_, record)| validate(record, variant).is_valid())
        .take(max)
        .map(|(i, record)| {
            let content = render(record, variant, custom_subject);
            PreviewItem {
                row: i + 2,
                to: record.email().to_string(),
                subject: content.subject,
                excerpt: content.text.chars().take(EXCERPT_CHARS).collect(),
                rsvp_url: match variant {
                    TemplateVariant::Event => Some(record.value("RSVP_URL").to_string()),
                    TemplateVariant::Certificate(_) => None,
                },
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::model::template::CertificateKind;

    const HOSTED: TemplateVariant = TemplateVariant::Certificate(CertificateKind::Hosted);

    fn hosted(name: &str, email: &str) -> RecipientRecord {
        [
            ("Name", name),
            ("Email", email),
            ("EventName", "Engines"),
            ("CertificateURL", "https://certs.example.com/x"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn skips_invalid_rows_and_stops_at_max() {
        let records = vec![
            hosted("A", "bad"),
            hosted("B", "b@x.com"),
            hosted("C", "c@x.com"),
            hosted("D", "d@x.com"),
        ];
        let items = preview(&records, HOSTED, None, 2);
        assert_eq!(items.len(), 2);
        assert_eq!((items[0].row, items[0].to.as_str()), (3, "b@x.com"));
        assert_eq!(items[1].to, "c@x.com");
        assert_eq!(items[0].subject, "Thank You for Attending Engines");
        assert!(items[0].rsvp_url.is_none());
    }

    #[test]
    fn excerpt_is_limited_to_200_characters() {
        let items = preview(&[hosted("Ådå", "a@x.com")], HOSTED, Some("Hi {Name}"), 3);
        assert_eq!(items[0].excerpt.chars().count(), 200);
        assert_eq!(items[0].subject, "Hi Ådå");
    }

    #[test]
    fn preview_does_not_change_the_records() {
        let records = vec![hosted("A", "a@x.com")];
        let before = records.clone();
        preview(&records, HOSTED, None, 1);
        preview(&records, HOSTED, None, 1);
        assert_eq!(records, before);
    }
}
