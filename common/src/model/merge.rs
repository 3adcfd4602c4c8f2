use serde::{Deserialize, Serialize};
use std::fmt;

/// Terminal state reached by one recipient during a batch.
///
/// Exactly one outcome is produced per processed recipient. It is appended to
/// the send log and folded into the run's [`BatchSummary`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SendOutcome {
    /// Accepted by the mail transport. Carries the provider message id.
    Sent(String),
    /// The transport rejected the message. Carries the error description.
    Failed(String),
    /// The record did not pass validation. Carries the reason.
    Skipped(String),
    /// Fully prepared but not handed to the transport.
    DryRun,
}

/// Literal status written to the send log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SendStatus {
    #[serde(rename = "SENT")]
    Sent,
    #[serde(rename = "FAILED")]
    Failed,
    #[serde(rename = "SKIPPED")]
    Skipped,
    #[serde(rename = "DRY-RUN")]
    DryRun,
}

impl SendStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SendStatus::Sent => "SENT",
            SendStatus::Failed => "FAILED",
            SendStatus::Skipped => "SKIPPED",
            SendStatus::DryRun => "DRY-RUN",
        }
    }
}

impl fmt::Display for SendStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl SendOutcome {
    pub fn status(&self) -> SendStatus {
        match self {
            SendOutcome::Sent(_) => SendStatus::Sent,
            SendOutcome::Failed(_) => SendStatus::Failed,
            SendOutcome::Skipped(_) => SendStatus::Skipped,
            SendOutcome::DryRun => SendStatus::DryRun,
        }
    }

    /// Provider message id, empty unless the message was sent.
    pub fn message_id(&self) -> &str {
        match self {
            SendOutcome::Sent(id) => id,
            _ => "",
        }
    }

    /// Error or skip reason, empty for successful outcomes.
    pub fn error(&self) -> &str {
        match self {
            SendOutcome::Failed(error) | SendOutcome::Skipped(error) => error,
            _ => "",
        }
    }
}

/// Counters for a finished (or interrupted) batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Rows in the source table, including rows removed by the address filter.
    pub total_rows: usize,
    /// Rows removed by the single-address filter before processing began.
    pub filtered_out: usize,
    /// Recipients that reached a terminal state.
    pub processed: usize,
    pub sent: usize,
    pub failed: usize,
    pub skipped: usize,
    pub dry_run: usize,
    /// True when an operator stopped the batch before every recipient was processed.
    pub interrupted: bool,
}

impl BatchSummary {
    /// Folds one terminal outcome into the counters.
    pub fn record(&mut self, outcome: &SendOutcome) {
        self.processed += 1;
        match outcome {
            SendOutcome::Sent(_) => self.sent += 1,
            SendOutcome::Failed(_) => self.failed += 1,
            SendOutcome::Skipped(_) => self.skipped += 1,
            SendOutcome::DryRun => self.dry_run += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_literals_match_log_format() {
        assert_eq!(SendOutcome::Sent("id".into()).status().as_str(), "SENT");
        assert_eq!(SendOutcome::Failed("x".into()).status().as_str(), "FAILED");
        assert_eq!(SendOutcome::Skipped("x".into()).status().as_str(), "SKIPPED");
        assert_eq!(SendOutcome::DryRun.status().to_string(), "DRY-RUN");
        assert_eq!(serde_json::to_string(&SendStatus::DryRun).unwrap(), "\"DRY-RUN\"");
    }

    #[test]
    fn message_id_and_error_are_empty_when_not_applicable() {
        let sent = SendOutcome::Sent("abc".into());
        assert_eq!(sent.message_id(), "abc");
        assert_eq!(sent.error(), "");
        let skipped = SendOutcome::Skipped("Missing required field: Email".into());
        assert_eq!(skipped.message_id(), "");
        assert_eq!(skipped.error(), "Missing required field: Email");
        assert_eq!(SendOutcome::DryRun.error(), "");
    }

    #[test]
    fn summary_counts_each_terminal_state_once() {
        let mut summary = BatchSummary::default();
        for outcome in [
            SendOutcome::Sent("1".into()),
            SendOutcome::Failed("boom".into()),
            SendOutcome::Skipped("bad".into()),
            SendOutcome::DryRun,
            SendOutcome::DryRun,
        ] {
            summary.record(&outcome);
        }
        assert_eq!(summary.processed, 5);
        assert_eq!(
            (summary.sent, summary.failed, summary.skipped, summary.dry_run),
            (1, 1, 1, 2)
        );
    }
}
