//! Email envelope and MIME conversion.

use lettre::message::header::ContentType;
use lettre::message::{Attachment as MimeAttachment, Mailbox, MultiPart};
use lettre::Message;

use super::MailError;

/// A binary file carried next to the message bodies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn png(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content_type: "image/png".to_string(),
            bytes,
        }
    }
}

/// MIME structure a message will be sent with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLayout {
    /// `multipart/alternative` holding the text and HTML bodies.
    Alternative,
    /// `multipart/mixed` wrapping the alternative part plus one attachment part.
    MixedWithAttachment,
}

/// A rendered message ready for the transport.
///
/// Built only for records that already passed validation, so nothing is
/// checked here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: String,
    /// Sender header override. `None` leaves the sender to the transport.
    pub from: Option<String>,
    pub attachment: Option<Attachment>,
}

impl Email {
    pub fn build(
        to: impl Into<String>,
        subject: impl Into<String>,
        html: impl Into<String>,
        text: impl Into<String>,
        from: Option<String>,
        attachment: Option<Attachment>,
    ) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            text: text.into(),
            html: html.into(),
            from,
            attachment,
        }
    }

    pub fn layout(&self) -> MessageLayout {
        match self.attachment {
            Some(_) => MessageLayout::MixedWithAttachment,
            None => MessageLayout::Alternative,
        }
    }

    /// Converts to a lettre [`Message`], using `default_from` when no override is set.
    pub fn to_message(&self, default_from: &Mailbox) -> Result<Message, MailError> {
        let from = match &self.from {
            Some(address) => address
                .parse::<Mailbox>()
                .map_err(|_| MailError::InvalidAddress(address.clone()))?,
            None => default_from.clone(),
        };
        let to: Mailbox = self
            .to
            .parse()
            .map_err(|_| MailError::InvalidAddress(self.to.clone()))?;

        let builder = Message::builder().from(from).to(to).subject(&self.subject);
        let body = MultiPart::alternative_plain_html(self.text.clone(), self.html.clone());

        let message = match &self.attachment {
            None => builder.multipart(body),
            Some(attachment) => {
                let content_type = ContentType::parse(&attachment.content_type)
                    .map_err(|e| MailError::Build(e.to_string()))?;
                let part = MimeAttachment::new(attachment.filename.clone())
                    .body(attachment.bytes.clone(), content_type);
                builder.multipart(MultiPart::mixed().multipart(body).singlepart(part))
            }
        };

        message.map_err(|e| MailError::Build(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sender() -> Mailbox {
        "sender@example.com".parse().unwrap()
    }

    fn formatted(email: &Email) -> String {
        String::from_utf8_lossy(&email.to_message(&sender()).unwrap().formatted()).into_owned()
    }

    #[test]
    fn plain_message_is_a_flat_alternative() {
        let email = Email::build("ada@example.com", "Hello", "<p>Hi</p>", "Hi", None, None);
        assert_eq!(email.layout(), MessageLayout::Alternative);
        let raw = formatted(&email);
        assert!(raw.contains("multipart/alternative"));
        assert!(!raw.contains("multipart/mixed"));
    }

    #[test]
    fn attachment_wraps_bodies_in_mixed_container() {
        let email = Email::build(
            "ada@example.com",
            "Hello",
            "<p>Hi</p>",
            "Hi",
            None,
            Some(Attachment::png("certificate_ADA.png", vec![0x89, 0x50, 0x4e, 0x47])),
        );
        assert_eq!(email.layout(), MessageLayout::MixedWithAttachment);
        let raw = formatted(&email);
        assert!(raw.contains("multipart/mixed"));
        assert!(raw.contains("multipart/alternative"));
        assert!(raw.contains("certificate_ADA.png"));
        assert!(raw.contains("image/png"));
    }

    #[test]
    fn sender_defaults_to_transport_identity() {
        let email = Email::build("ada@example.com", "Hello", "<p>Hi</p>", "Hi", None, None);
        assert!(formatted(&email).contains("From: sender@example.com"));

        let overridden = Email::build(
            "ada@example.com",
            "Hello",
            "<p>Hi</p>",
            "Hi",
            Some("events@example.org".to_string()),
            None,
        );
        assert!(formatted(&overridden).contains("From: events@example.org"));
    }

    #[test]
    fn malformed_override_is_rejected() {
        let email = Email::build(
            "ada@example.com",
            "Hello",
            "<p>Hi</p>",
            "Hi",
            Some("not an address".to_string()),
            None,
        );
        assert!(matches!(
            email.to_message(&sender()),
            Err(MailError::InvalidAddress(_))
        ));
    }
}
