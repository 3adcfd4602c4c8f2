use crate::services::mail::MailError;
use crate::services::merge::log_sink::LogError;
use thiserror::Error;

/// Problems found before any message is sent. Always fatal for the run.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("the table has no header row")]
    EmptyHeader,

    #[error("required field '{0}' is not mapped to a column")]
    UnresolvedField(String),

    #[error("field '{field}' is mapped to column {index}, but the table has {columns} columns")]
    ColumnOutOfRange {
        field: String,
        index: usize,
        columns: usize,
    },

    #[error("field '{field}' is mapped to unknown header '{header}'")]
    UnknownHeader { field: String, header: String },

    #[error("data source not found: {0}")]
    DataSourceNotFound(String),

    #[error("live sending needs {0}")]
    MissingCredentials(&'static str),

    #[error("throttle of {0} seconds is too large")]
    ThrottleOutOfRange(String),

    #[error("log path '{0}' must be relative and stay inside the log directory")]
    UnsafeLogPath(String),
}

#[derive(Debug, Error)]
pub enum MergeError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("failed to load data source: {0}")]
    DataSource(String),

    #[error(transparent)]
    Mail(#[from] MailError),

    /// Every outcome must be logged, so a failing log stops the batch.
    #[error("send log failed: {0}")]
    LogSink(#[from] LogError),
}

impl From<rusqlite::Error> for MergeError {
    fn from(e: rusqlite::Error) -> Self {
        MergeError::DataSource(e.to_string())
    }
}

impl From<csv::Error> for MergeError {
    fn from(e: csv::Error) -> Self {
        MergeError::DataSource(e.to_string())
    }
}

impl From<std::io::Error> for MergeError {
    fn from(e: std::io::Error) -> Self {
        MergeError::DataSource(e.to_string())
    }
}
