use crate::config::AppConfig;
use crate::job_controller::state::{JobUpdate, JobsState};
use crate::services::data_sources::csv::mapping::resolve_mapping;
use crate::services::data_sources::csv::store::load_table;
use crate::services::templates::normalize::normalize;
use crate::services::templates::schema::FieldDefaults;
use crate::services::templates::validate::validate;
use actix_web::{web, HttpResponse, Responder};
use common::jobs::JobStatus;
use common::model::csv::ColumnMapping;
use common::model::datasource::Table;
use common::model::record::ValidationResult;
use common::model::template::TemplateVariant;
use common::requests::{VerifyCsvRequest, VerifyReport};
use log::info;
use rayon::prelude::*;
use std::time::Instant;
use tokio::sync::mpsc;

const CHUNK_SIZE: usize = 50_000;
const MAX_REPORTED: usize = 10;

/// Validates one chunk in parallel. Results keep row order.
fn check_chunk(
    rows: &[Vec<String>],
    offset: usize,
    mapping: &ColumnMapping,
    variant: TemplateVariant,
    defaults: &FieldDefaults,
) -> Vec<(usize, ValidationResult)> {
    rows.par_iter()
        .enumerate()
        .map(|(i, row)| {
            let record = normalize(row, mapping, variant, defaults);
            // +2: one for the header row, one for 1-based numbering.
            (offset + i + 2, validate(&record, variant))
        })
        .collect()
}

/// Validates every row of `table`, calling `on_chunk(rows_done)` after each chunk.
pub fn verify_table<F>(
    table: &Table,
    mapping: &ColumnMapping,
    variant: TemplateVariant,
    defaults: &FieldDefaults,
    mut on_chunk: F,
) -> VerifyReport
where
    F: FnMut(usize),
{
    let mut report = VerifyReport {
        total_rows: table.rows.len(),
        valid: 0,
        invalid: 0,
        first_invalid: Vec::new(),
    };

    for (n, chunk) in table.rows.chunks(CHUNK_SIZE).enumerate() {
        for (row, result) in check_chunk(chunk, n * CHUNK_SIZE, mapping, variant, defaults) {
            match result {
                ValidationResult::Valid => report.valid += 1,
                ValidationResult::Invalid(reason) => {
                    report.invalid += 1;
                    if report.first_invalid.len() < MAX_REPORTED {
                        report.first_invalid.push((row, reason));
                    }
                }
            }
        }
        on_chunk(n * CHUNK_SIZE + chunk.len());
    }
    report
}

fn verify_csv_data_blocking(
    tx: mpsc::Sender<JobUpdate>,
    job_id: String,
    config: &AppConfig,
    req: &VerifyCsvRequest,
) -> Result<VerifyReport, String> {
    let start = Instant::now();

    let table = load_table(config, &req.data_source_id).map_err(|e| e.to_string())?;
    let mapping =
        resolve_mapping(&table.headers, req.variant, &req.mapping).map_err(|e| e.to_string())?;
    let total = table.rows.len().max(1);

    let report = verify_table(&table, &mapping, req.variant, &config.field_defaults(), |done| {
        let _ = tx.blocking_send(JobUpdate {
            job_id: job_id.clone(),
            status: JobStatus::InProgress((done * 100 / total) as u32),
        });
    });

    info!(
        "verify {} finished in {:.2?}: {} valid, {} invalid",
        req.data_source_id,
        start.elapsed(),
        report.valid,
        report.invalid
    );
    Ok(report)
}

pub(crate) async fn process(
    jobs_state: web::Data<JobsState>,
    config: web::Data<AppConfig>,
    req: web::Json<VerifyCsvRequest>,
) -> impl Responder {
    let job_id = schedule_verify_job(jobs_state, config, req.into_inner()).await;
    HttpResponse::Ok().body(job_id)
}

async fn schedule_verify_job(
    jobs_state: web::Data<JobsState>,
    config: web::Data<AppConfig>,
    req: VerifyCsvRequest,
) -> String {
    let job_id = uuid::Uuid::new_v4().to_string();
    jobs_state
        .jobs
        .write()
        .await
        .insert(job_id.clone(), JobStatus::Pending);
    let tx = jobs_state.tx.clone();
    let value = job_id.clone();
    let js = jobs_state.clone();

    tokio::spawn(async move {
        let value_for_blocking = value.clone();
        let handle = tokio::task::spawn_blocking(move || {
            verify_csv_data_blocking(tx, value_for_blocking, &config, &req)
        });

        let status = match handle.await {
            Ok(Ok(report)) => match serde_json::to_string(&report) {
                Ok(json) => JobStatus::Completed(json),
                Err(e) => JobStatus::Failed(e.to_string()),
            },
            Ok(Err(e)) => JobStatus::Failed(e),
            Err(join_err) => JobStatus::Failed(format!("join error: {}", join_err)),
        };
        js.jobs.write().await.insert(value, status);
    });

    job_id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::data_sources::csv::mapping::suggest_mapping;

    fn table(rows: &[&[&str]]) -> Table {
        Table {
            headers: ["Name", "Email", "CertificateURL"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn counts_valid_and_invalid_rows_in_row_order() {
        let variant = "certificate-hosted".parse().unwrap();
        let table = table(&[
            &["Ada", "ada@x.com", "https://c/1"],
            &["", "b@x.com", "https://c/2"],
            &["Cy", "cy@x.com"],
            &["Di", "di@x", "https://c/4"],
        ]);
        let mapping = suggest_mapping(&table.headers, variant);
        let mut progress = Vec::new();

        let report = verify_table(&table, &mapping, variant, &FieldDefaults::default(), |done| {
            progress.push(done)
        });

        assert_eq!((report.total_rows, report.valid, report.invalid), (4, 1, 3));
        assert_eq!(
            report.first_invalid,
            vec![
                (3, "Missing required field: Name (or FirstName/LastName)".to_string()),
                (4, "Missing CertificateURL".to_string()),
                (5, "Invalid email format: di@x".to_string()),
            ]
        );
        assert_eq!(progress, vec![4]);
    }

    #[test]
    fn empty_table_reports_nothing() {
        let variant = TemplateVariant::Event;
        let table = table(&[]);
        let report = verify_table(
            &table,
            &ColumnMapping::new(),
            variant,
            &FieldDefaults::default(),
            |_| {},
        );
        assert_eq!(report.total_rows, 0);
        assert!(report.first_invalid.is_empty());
    }
}
