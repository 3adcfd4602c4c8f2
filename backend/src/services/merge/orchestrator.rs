//! Sequential batch send.
//!
//! Each recipient goes through validate, render, optional certificate,
//! build, send (or dry run) and log before the next one starts, so log order
//! always equals input order. Per-recipient problems become outcomes; only a
//! configuration problem or a failing log ends the batch early, and an
//! operator stop is honoured between recipients.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use common::model::csv::ColumnMapping;
use common::model::datasource::Table;
use common::model::merge::{BatchSummary, SendOutcome};
use common::model::options::{CertificateOptions, SendOptions};
use common::model::record::{RecipientRecord, ValidationResult};
use common::model::template::TemplateVariant;
use log::{debug, info, warn};
use std::path::Path;

use super::log_sink::{LogEntry, LogSink};
use crate::error::{ConfigurationError, MergeError};
use crate::services::attachments::{certificate_attachment, AttachmentProvider};
use crate::services::mail::{Attachment, Email, MailTransport};
use crate::services::templates::normalize::normalize;
use crate::services::templates::render::render_with_attachment;
use crate::services::templates::schema::FieldDefaults;
use crate::services::templates::validate::validate;

/// Normalizes every data row of `table` with a resolved mapping.
pub fn records_from_table(
    table: &Table,
    mapping: &ColumnMapping,
    variant: TemplateVariant,
    defaults: &FieldDefaults,
) -> Vec<RecipientRecord> {
    table
        .rows
        .iter()
        .map(|row| normalize(row, mapping, variant, defaults))
        .collect()
}

const STOP_POLL_INTERVAL: Duration = Duration::from_millis(50);

struct CertificateSource<'a> {
    provider: &'a dyn AttachmentProvider,
    options: &'a CertificateOptions,
}

/// One run over a fixed list of records.
///
/// The log sink and transport are borrowed exclusively for the whole run.
pub struct Batch<'a> {
    variant: TemplateVariant,
    options: &'a SendOptions,
    log: &'a mut dyn LogSink,
    transport: Option<&'a mut dyn MailTransport>,
    certificates: Option<CertificateSource<'a>>,
    stop: Option<&'a AtomicBool>,
}

impl<'a> Batch<'a> {
    pub fn new(variant: TemplateVariant, options: &'a SendOptions, log: &'a mut dyn LogSink) -> Self {
        Self {
            variant,
            options,
            log,
            transport: None,
            certificates: None,
            stop: None,
        }
    }

    pub fn transport(mut self, transport: &'a mut dyn MailTransport) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn certificates(
        mut self,
        provider: &'a dyn AttachmentProvider,
        options: &'a CertificateOptions,
    ) -> Self {
        self.certificates = Some(CertificateSource { provider, options });
        self
    }

    /// Checked before each recipient; once set, the run ends as interrupted.
    pub fn stop_signal(mut self, stop: &'a AtomicBool) -> Self {
        self.stop = Some(stop);
        self
    }

    /// Processes `records` in order and returns the counters.
    ///
    /// `on_progress(done, total)` fires after each recipient is logged.
    pub fn run<F>(mut self, records: &[RecipientRecord], mut on_progress: F) -> Result<BatchSummary, MergeError>
    where
        F: FnMut(usize, usize),
    {
        if !self.options.dry_run && self.transport.is_none() {
            return Err(ConfigurationError::MissingCredentials("a mail transport").into());
        }
        let throttle = self.options.throttle().ok_or_else(|| {
            ConfigurationError::ThrottleOutOfRange(self.options.throttle_seconds.to_string())
        })?;

        let recipients: Vec<&RecipientRecord> = records
            .iter()
            .filter(|record| self.options.matches_filter(record.email()))
            .collect();
        let total = recipients.len();
        let mut summary = BatchSummary {
            total_rows: records.len(),
            filtered_out: records.len() - total,
            ..BatchSummary::default()
        };
        let template_used = self.variant.key();

        for (i, record) in recipients.into_iter().enumerate() {
            if self.stop_requested() {
                info!("Stop requested, {} of {} recipients processed", i, total);
                summary.interrupted = true;
                break;
            }

            let (outcome, subject) = self.process(record);
            self.log.append(&LogEntry {
                email: record.email(),
                subject: &subject,
                outcome: &outcome,
                template_used,
            })?;

            let detail = match &outcome {
                SendOutcome::DryRun => subject.as_str(),
                other => match other.message_id() {
                    "" => other.error(),
                    id => id,
                },
            };
            info!(
                "[{}/{}] {} {}: {}",
                i + 1,
                total,
                outcome.status(),
                record.email(),
                detail
            );

            summary.record(&outcome);
            on_progress(i + 1, total);

            let skipped = matches!(outcome, SendOutcome::Skipped(_));
            if !skipped && i + 1 < total && !throttle.is_zero() {
                self.pause(throttle);
            }
        }

        info!(
            "Batch finished: {} sent, {} failed, {} skipped, {} dry run",
            summary.sent, summary.failed, summary.skipped, summary.dry_run
        );
        Ok(summary)
    }

    fn stop_requested(&self) -> bool {
        self.stop.is_some_and(|stop| stop.load(Ordering::SeqCst))
    }

    /// Sleeps for `throttle`, returning early once a stop is requested.
    fn pause(&self, throttle: Duration) {
        let deadline = Instant::now() + throttle;
        loop {
            if self.stop_requested() {
                return;
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return;
            }
            thread::sleep(remaining.min(STOP_POLL_INTERVAL));
        }
    }

    /// Terminal outcome and rendered subject for one recipient.
    fn process(&mut self, record: &RecipientRecord) -> (SendOutcome, String) {
        if let ValidationResult::Invalid(reason) = validate(record, self.variant) {
            return (SendOutcome::Skipped(reason), String::new());
        }

        let attachment = self.attachment_for(record);
        let content = render_with_attachment(
            record,
            self.variant,
            self.options.subject_override(),
            attachment.is_some(),
        );
        let from = self
            .options
            .from_address
            .as_deref()
            .map(str::trim)
            .filter(|from| !from.is_empty())
            .map(str::to_string);
        let email = Email::build(
            record.email(),
            content.subject.clone(),
            content.html,
            content.text,
            from,
            attachment,
        );

        debug!("Message for {} built as {:?}", email.to, email.layout());

        if self.options.dry_run {
            return (SendOutcome::DryRun, content.subject);
        }
        let outcome = match self.transport.as_mut() {
            Some(transport) => match transport.send(&email) {
                Ok(id) => SendOutcome::Sent(id),
                Err(e) => SendOutcome::Failed(e.to_string()),
            },
            None => SendOutcome::Failed("no mail transport configured".to_string()),
        };
        (outcome, content.subject)
    }

    fn attachment_for(&self, record: &RecipientRecord) -> Option<Attachment> {
        if !self.variant.requires_attachment() {
            return None;
        }
        let source = self.certificates.as_ref()?;
        match certificate_attachment(
            source.provider,
            Path::new(&source.options.template_path),
            record.value("Name"),
            &source.options.placement,
        ) {
            Ok(attachment) => Some(attachment),
            Err(e) => {
                warn!(
                    "Certificate for {} not generated, sending without it: {}",
                    record.email(),
                    e
                );
                None
            }
        }
    }
}
