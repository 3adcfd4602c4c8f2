//! # Merge Job Start Service
//!
//! `POST /api/merge/start` runs a batch send in the background.
//!
//! 1. The handler checks the options (log name under the log directory,
//!    throttle, credentials for a live run), registers the job as `Pending`
//!    with a stop signal and returns the `job_id` right away.
//! 2. A Tokio task runs [`merge_blocking`] through `spawn_blocking`; the batch
//!    sleeps between recipients and the transport blocks on HTTP, so neither
//!    may run on the async runtime.
//! 3. `merge_blocking` loads the uploaded table, resolves the column mapping,
//!    normalizes every row and hands the records to the orchestrator with a
//!    fresh CSV log.
//! 4. Progress comes back as [`MergeUpdate`]s and is forwarded to the job
//!    controller as a percentage. The final status carries the
//!    `BatchSummary` as JSON: `Completed`, or `Interrupted` when stopped.

use crate::config::AppConfig;
use crate::error::{ConfigurationError, MergeError};
use crate::job_controller::state::{JobUpdate, JobsState};
use crate::services::attachments::CertificateGenerator;
use crate::services::data_sources::csv::mapping::resolve_mapping;
use crate::services::data_sources::csv::store::load_table;
use crate::services::mail::GmailApiTransport;
use crate::services::merge::log_sink::{resolve_log_path, CsvLogSink};
use crate::services::merge::orchestrator::{records_from_table, Batch};
use actix_web::{web, HttpResponse, Responder};
use common::jobs::JobStatus;
use common::model::merge::BatchSummary;
use common::requests::StartMergeRequest;
use log::{error, info};
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Progress sent from the blocking worker to the async side of the job.
#[derive(Debug)]
pub enum MergeUpdate {
    Job(JobStatus),
    /// One more recipient reached a terminal state.
    Task { row_index: usize, total_rows: usize },
}

pub(crate) async fn process(
    state: web::Data<JobsState>,
    config: web::Data<AppConfig>,
    certificates: web::Data<CertificateGenerator>,
    payload: web::Json<StartMergeRequest>,
) -> impl Responder {
    let req = payload.into_inner();
    if let Err(e) = check_request(&config, &req) {
        return HttpResponse::BadRequest().body(e.to_string());
    }
    let job_id = schedule_merge_job(
        state,
        config.into_inner(),
        certificates.get_ref().clone(),
        req,
    )
    .await;
    HttpResponse::Ok().json(serde_json::json!({ "job_id": job_id }))
}

/// Rejects a request that could only fail once the job is running.
fn check_request(config: &AppConfig, req: &StartMergeRequest) -> Result<(), ConfigurationError> {
    resolve_log_path(Path::new(&config.logs_dir), &req.options.log_path)?;
    if req.options.throttle().is_none() {
        return Err(ConfigurationError::ThrottleOutOfRange(
            req.options.throttle_seconds.to_string(),
        ));
    }
    check_credentials(config, req)
}

/// Live runs need a token and someone to send as.
fn check_credentials(config: &AppConfig, req: &StartMergeRequest) -> Result<(), ConfigurationError> {
    if req.options.dry_run {
        return Ok(());
    }
    if config.access_token.as_deref().map_or(true, |t| t.trim().is_empty()) {
        return Err(ConfigurationError::MissingCredentials("MAILMERGE_ACCESS_TOKEN"));
    }
    if sender_address(config, req).is_none() {
        return Err(ConfigurationError::MissingCredentials(
            "MAILMERGE_SENDER or a from address",
        ));
    }
    Ok(())
}

fn sender_address<'a>(config: &'a AppConfig, req: &'a StartMergeRequest) -> Option<&'a str> {
    config
        .sender
        .as_deref()
        .or(req.options.from_address.as_deref())
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

async fn schedule_merge_job(
    state: web::Data<JobsState>,
    config: Arc<AppConfig>,
    certificates: CertificateGenerator,
    req: StartMergeRequest,
) -> String {
    let job_id = Uuid::new_v4().to_string();
    state
        .jobs
        .write()
        .await
        .insert(job_id.clone(), JobStatus::Pending);
    let stop = state.register_stop_signal(&job_id).await;

    let tx = state.tx.clone();
    let job_id_clone = job_id.clone();

    tokio::spawn(async move {
        let (merge_tx, mut merge_rx) = mpsc::channel::<MergeUpdate>(100);

        // Translate worker progress into job controller updates.
        let job_updater_tx = tx.clone();
        let job_id_for_updater = job_id_clone.clone();
        let forwarder = tokio::spawn(async move {
            while let Some(update) = merge_rx.recv().await {
                let status = match update {
                    MergeUpdate::Job(job_status) => job_status,
                    MergeUpdate::Task {
                        row_index,
                        total_rows,
                    } => JobStatus::InProgress(progress_percent(row_index, total_rows)),
                };
                let _ = job_updater_tx
                    .send(JobUpdate {
                        job_id: job_id_for_updater.clone(),
                        status,
                    })
                    .await;
            }
        });

        let handle = tokio::task::spawn_blocking(move || {
            merge_blocking(merge_tx, &config, &certificates, &req, &stop)
        });

        let status = match handle.await {
            Ok(Ok(summary)) => final_status(&summary),
            Ok(Err(e)) => {
                error!("Merge job {} failed: {}", job_id_clone, e);
                JobStatus::Failed(e.to_string())
            }
            Err(e) => JobStatus::Failed(format!("Task join error: {}", e)),
        };

        // Let queued progress land before the final status.
        let _ = forwarder.await;
        let _ = tx
            .send(JobUpdate {
                job_id: job_id_clone.clone(),
                status,
            })
            .await;
        state.clear_stop_signal(&job_id_clone).await;
    });

    job_id
}

fn progress_percent(row_index: usize, total_rows: usize) -> u32 {
    if total_rows > 0 {
        ((row_index + 1) as f32 / total_rows as f32 * 100.0) as u32
    } else {
        0
    }
}

fn final_status(summary: &BatchSummary) -> JobStatus {
    let json = serde_json::to_string(summary).unwrap_or_default();
    if summary.interrupted {
        JobStatus::Interrupted(json)
    } else {
        JobStatus::Completed(json)
    }
}

/// The whole batch, run on a blocking thread.
fn merge_blocking(
    tx: mpsc::Sender<MergeUpdate>,
    config: &AppConfig,
    certificates: &CertificateGenerator,
    req: &StartMergeRequest,
    stop: &AtomicBool,
) -> Result<BatchSummary, MergeError> {
    let _ = tx.blocking_send(MergeUpdate::Job(JobStatus::InProgress(0)));

    let table = load_table(config, &req.data_source_id)?;
    let mapping = resolve_mapping(&table.headers, req.variant, &req.mapping)?;
    let records = records_from_table(&table, &mapping, req.variant, &config.field_defaults());
    info!(
        "Starting {} batch for {} rows ({})",
        req.variant.display_name(),
        records.len(),
        if req.options.dry_run { "dry run" } else { "live" }
    );

    let mut transport = if req.options.dry_run {
        None
    } else {
        let token = config
            .access_token
            .as_deref()
            .ok_or(ConfigurationError::MissingCredentials("MAILMERGE_ACCESS_TOKEN"))?;
        let sender = sender_address(config, req)
            .ok_or(ConfigurationError::MissingCredentials("MAILMERGE_SENDER or a from address"))?;
        Some(GmailApiTransport::new(&config.gmail_api_base, token, sender)?)
    };

    let log_path = resolve_log_path(Path::new(&config.logs_dir), &req.options.log_path)?;
    let mut log = CsvLogSink::create(&log_path)?;
    let mut batch = Batch::new(req.variant, &req.options, &mut log).stop_signal(stop);
    if let Some(transport) = transport.as_mut() {
        batch = batch.transport(transport);
    }
    if let (Some(provider), Some(options)) = (certificates.provider(), req.certificate.as_ref()) {
        batch = batch.certificates(provider, options);
    }

    batch.run(&records, |done, total| {
        let _ = tx.blocking_send(MergeUpdate::Task {
            row_index: done - 1,
            total_rows: total,
        });
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::data_sources::csv::store::{data_source_path, open, save_data_source};
    use common::model::datasource::{DataSource, DataSourceType};
    use common::model::options::SendOptions;
    use common::model::template::{CertificateKind, TemplateVariant};
    use tempfile::tempdir;

    fn request(data_source_id: &str, options: SendOptions) -> StartMergeRequest {
        StartMergeRequest {
            data_source_id: data_source_id.to_string(),
            variant: TemplateVariant::Certificate(CertificateKind::Hosted),
            mapping: Default::default(),
            options,
            certificate: None,
        }
    }

    #[test]
    fn live_run_needs_token_and_sender() {
        let live = SendOptions {
            dry_run: false,
            ..SendOptions::default()
        };
        let mut config = AppConfig::default();
        assert!(check_credentials(&config, &request("x", SendOptions::default())).is_ok());
        assert_eq!(
            check_credentials(&config, &request("x", live.clone())),
            Err(ConfigurationError::MissingCredentials("MAILMERGE_ACCESS_TOKEN"))
        );

        config.access_token = Some("token".to_string());
        assert!(check_credentials(&config, &request("x", live.clone())).is_err());

        let with_from = SendOptions {
            from_address: Some("events@example.org".to_string()),
            ..live
        };
        assert!(check_credentials(&config, &request("x", with_from)).is_ok());
    }

    #[test]
    fn request_checks_log_name_and_throttle() {
        let config = AppConfig::default();
        assert!(check_request(&config, &request("x", SendOptions::default())).is_ok());

        for log_path in ["/tmp/victim", "../outside.csv"] {
            let options = SendOptions {
                log_path: log_path.to_string(),
                ..SendOptions::default()
            };
            assert_eq!(
                check_request(&config, &request("x", options)),
                Err(ConfigurationError::UnsafeLogPath(log_path.to_string()))
            );
        }

        let options = SendOptions {
            throttle_seconds: 1e20,
            ..SendOptions::default()
        };
        assert!(matches!(
            check_request(&config, &request("x", options)),
            Err(ConfigurationError::ThrottleOutOfRange(_))
        ));
    }

    #[test]
    fn progress_is_a_percentage() {
        assert_eq!(progress_percent(0, 4), 25);
        assert_eq!(progress_percent(3, 4), 100);
        assert_eq!(progress_percent(0, 0), 0);
    }

    #[test]
    fn interrupted_summary_maps_to_interrupted_status() {
        let summary = BatchSummary {
            interrupted: true,
            ..BatchSummary::default()
        };
        assert!(matches!(final_status(&summary), JobStatus::Interrupted(_)));
        assert!(matches!(
            final_status(&BatchSummary::default()),
            JobStatus::Completed(_)
        ));
    }

    #[test]
    fn blocking_merge_runs_a_stored_table() {
        let dir = tempdir().unwrap();
        let config = AppConfig {
            database_path: dir.path().join("db.sqlite").to_string_lossy().into_owned(),
            uploads_dir: dir.path().to_string_lossy().into_owned(),
            logs_dir: dir.path().join("logs").to_string_lossy().into_owned(),
            ..AppConfig::default()
        };
        let conn = open(&config.database_path).unwrap();
        save_data_source(
            &conn,
            &DataSource {
                id: "ds".to_string(),
                md5: "m".to_string(),
                headers: vec![],
                row_count: 2,
                source_type: DataSourceType::Csv,
            },
        )
        .unwrap();
        std::fs::write(
            data_source_path(&config.uploads_dir, "ds", "m"),
            "First Name,Last Name,Email,CertificateURL\n\
             Ada,Lovelace,ada@x.com,https://c.example/1\n\
             Grace,Hopper,,https://c.example/2\n",
        )
        .unwrap();

        let log_path = dir.path().join("logs").join("send_log.csv");
        let options = SendOptions {
            throttle_seconds: 0.0,
            log_path: "send_log.csv".to_string(),
            ..SendOptions::default()
        };
        let (tx, mut rx) = mpsc::channel(16);

        let summary = merge_blocking(
            tx,
            &config,
            &CertificateGenerator::default(),
            &request("ds", options),
            &AtomicBool::new(false),
        )
        .unwrap();

        assert_eq!((summary.dry_run, summary.skipped), (1, 1));
        assert!(matches!(rx.try_recv(), Ok(MergeUpdate::Job(JobStatus::InProgress(0)))));
        let log = std::fs::read_to_string(&log_path).unwrap();
        assert_eq!(log.lines().count(), 3);
        assert!(log.contains("Thank You for Attending"));
    }

    #[test]
    fn unmapped_required_field_fails_before_logging() {
        let dir = tempdir().unwrap();
        let config = AppConfig {
            database_path: dir.path().join("db.sqlite").to_string_lossy().into_owned(),
            uploads_dir: dir.path().to_string_lossy().into_owned(),
            logs_dir: dir.path().join("logs").to_string_lossy().into_owned(),
            ..AppConfig::default()
        };
        let conn = open(&config.database_path).unwrap();
        save_data_source(
            &conn,
            &DataSource {
                id: "ds".to_string(),
                md5: "m".to_string(),
                headers: vec![],
                row_count: 1,
                source_type: DataSourceType::Csv,
            },
        )
        .unwrap();
        std::fs::write(data_source_path(&config.uploads_dir, "ds", "m"), "Name\nAda\n").unwrap();

        let log_path = dir.path().join("logs").join("send_log.csv");
        let options = SendOptions {
            log_path: "send_log.csv".to_string(),
            ..SendOptions::default()
        };
        let (tx, _rx) = mpsc::channel(16);

        let result = merge_blocking(
            tx,
            &config,
            &CertificateGenerator::default(),
            &request("ds", options),
            &AtomicBool::new(false),
        );

        assert!(matches!(
            result,
            Err(MergeError::Configuration(ConfigurationError::UnresolvedField(ref f))) if f == "Email"
        ));
        assert!(!log_path.exists());
    }
}
