//! Mail transport trait and the Gmail REST implementation.

use std::time::Duration;

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use lettre::message::Mailbox;
use serde::Deserialize;

use super::{Email, MailError};

/// Blocking delivery of one message at a time.
///
/// Implementations return the provider-assigned message id on success.
pub trait MailTransport: Send {
    fn send(&mut self, email: &Email) -> Result<String, MailError>;
}

#[derive(Deserialize)]
struct SentMessage {
    id: String,
}

/// Sends through `users.messages.send` of the Gmail API with a bearer token.
///
/// Uses the blocking reqwest client, so build and use it from a blocking
/// thread (`spawn_blocking`), never directly on the async runtime.
pub struct GmailApiTransport {
    client: reqwest::blocking::Client,
    endpoint: String,
    access_token: String,
    sender: Mailbox,
}

impl GmailApiTransport {
    pub fn new(api_base: &str, access_token: &str, sender: &str) -> Result<Self, MailError> {
        if access_token.trim().is_empty() {
            return Err(MailError::MissingConfig("access_token".to_string()));
        }
        let sender: Mailbox = sender
            .parse()
            .map_err(|_| MailError::InvalidAddress(sender.to_string()))?;
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| MailError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}/gmail/v1/users/me/messages/send",
                api_base.trim_end_matches('/')
            ),
            access_token: access_token.trim().to_string(),
            sender,
        })
    }

    /// RFC 822 bytes of `email`, base64url encoded as the API expects.
    fn raw_message(&self, email: &Email) -> Result<String, MailError> {
        let message = email.to_message(&self.sender)?;
        Ok(URL_SAFE.encode(message.formatted()))
    }
}

impl MailTransport for GmailApiTransport {
    fn send(&mut self, email: &Email) -> Result<String, MailError> {
        let raw = self.raw_message(email)?;

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.access_token)
            .json(&serde_json::json!({ "raw": raw }))
            .send()
            .map_err(|e| MailError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(MailError::Transport(format!("{}: {}", status, body.trim())));
        }

        let sent: SentMessage = response
            .json()
            .map_err(|e| MailError::Transport(format!("unexpected response: {}", e)))?;
        Ok(sent.id)
    }
}
