//! Message assembly and delivery.
//!
//! [`Email`] is the transmittable envelope produced for each recipient.
//! [`MailTransport`] is the seam to the mail-sending API: the batch hands it
//! one message at a time and gets back the provider's message id.
//!
//! # Environment Variables
//!
//! [`GmailApiTransport`] is built from [`crate::config::AppConfig`]:
//!
//! | Variable | Required | Description |
//! |----------|----------|-------------|
//! | `MAILMERGE_ACCESS_TOKEN` | Live runs | OAuth bearer token for the Gmail API |
//! | `MAILMERGE_SENDER` | Live runs without a from override | Authenticated sender address |
//! | `MAILMERGE_GMAIL_API_BASE` | No | API base URL (default `https://gmail.googleapis.com`) |

mod message;
mod transport;

pub use message::{Attachment, Email, MessageLayout};
pub use transport::{GmailApiTransport, MailTransport};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("missing required config: {0}")]
    MissingConfig(String),

    #[error("invalid email address: {0}")]
    InvalidAddress(String),

    #[error("failed to build message: {0}")]
    Build(String),

    #[error("transport error: {0}")]
    Transport(String),
}
