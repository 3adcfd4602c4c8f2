//! Append-only CSV send log.
//!
//! One row per recipient, in processing order, under the fixed header
//! `Email,Subject,Status,MessageId,Error,Timestamp,TemplateUsed`. Downstream
//! reporting reads this file, so column order and status literals are fixed.

use crate::error::ConfigurationError;
use chrono::Local;
use common::model::merge::SendOutcome;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

pub const LOG_HEADER: [&str; 7] = [
    "Email",
    "Subject",
    "Status",
    "MessageId",
    "Error",
    "Timestamp",
    "TemplateUsed",
];

#[derive(Debug, Error)]
pub enum LogError {
    #[error("log file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("log write error: {0}")]
    Csv(#[from] csv::Error),
}

/// What the batch knows about a recipient once it reached a terminal state.
#[derive(Debug, Clone, Copy)]
pub struct LogEntry<'a> {
    pub email: &'a str,
    /// Rendered subject, empty for skipped records.
    pub subject: &'a str,
    pub outcome: &'a SendOutcome,
    pub template_used: &'a str,
}

pub trait LogSink: Send {
    /// Writes `entry` durably before returning. The timestamp is taken here.
    fn append(&mut self, entry: &LogEntry<'_>) -> Result<(), LogError>;
}

/// Places a caller-supplied log name below `logs_dir`.
///
/// Only plain relative paths are accepted: no root, drive prefix or `..`.
pub fn resolve_log_path(logs_dir: &Path, requested: &str) -> Result<PathBuf, ConfigurationError> {
    let relative = Path::new(requested.trim());
    let unsafe_path = || ConfigurationError::UnsafeLogPath(requested.to_string());
    if relative.as_os_str().is_empty() {
        return Err(unsafe_path());
    }
    for component in relative.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(unsafe_path())
            }
        }
    }
    if relative.file_name().is_none() {
        return Err(unsafe_path());
    }
    Ok(logs_dir.join(relative))
}

pub struct CsvLogSink<W: Write> {
    writer: csv::Writer<W>,
}

impl CsvLogSink<File> {
    /// Creates (or truncates) the log at `path` and writes the header row.
    pub fn create(path: &Path) -> Result<Self, LogError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        Self::from_writer(File::create(path)?)
    }
}

impl<W: Write> CsvLogSink<W> {
    pub fn from_writer(inner: W) -> Result<Self, LogError> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(inner);
        writer.write_record(LOG_HEADER)?;
        writer.flush()?;
        Ok(Self { writer })
    }
}

impl<W: Write + Send> LogSink for CsvLogSink<W> {
    fn append(&mut self, entry: &LogEntry<'_>) -> Result<(), LogError> {
        let timestamp = Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string();
        self.writer.write_record([
            entry.email,
            entry.subject,
            entry.outcome.status().as_str(),
            entry.outcome.message_id(),
            entry.outcome.error(),
            timestamp.as_str(),
            entry.template_used,
        ])?;
        self.writer.flush()?;
        Ok(())
    }
}
