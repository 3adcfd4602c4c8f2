//! Certificate image attachments.
//!
//! Only the contract lives here. A generator draws the recipient's name onto
//! a blank certificate image and returns PNG bytes; the batch treats any
//! failure as a warning and sends without the attachment.

use common::model::options::PlacementConfig;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use crate::services::mail::Attachment;

#[derive(Debug, Error)]
pub enum AttachmentError {
    #[error("certificate template not found: {0}")]
    TemplateNotFound(String),

    #[error("failed to render certificate: {0}")]
    Render(String),
}

pub trait AttachmentProvider: Send + Sync {
    /// Produces PNG bytes with `display_name` placed per `placement`.
    fn generate(
        &self,
        template: &Path,
        display_name: &str,
        placement: &PlacementConfig,
    ) -> Result<Vec<u8>, AttachmentError>;
}

/// Generator installed in the server, if any. Shared by all merge jobs.
#[derive(Clone, Default)]
pub struct CertificateGenerator {
    provider: Option<Arc<dyn AttachmentProvider>>,
}

impl CertificateGenerator {
    pub fn provider(&self) -> Option<&dyn AttachmentProvider> {
        self.provider.as_deref()
    }
}

/// `certificate_ADA_LOVELACE.png` for "Ada Lovelace".
pub fn attachment_filename(name: &str) -> String {
    let upper: Vec<String> = name.split_whitespace().map(str::to_uppercase).collect();
    format!("certificate_{}.png", upper.join("_"))
}

/// Runs `provider` for one recipient and wraps the result as a mail attachment.
pub fn certificate_attachment(
    provider: &dyn AttachmentProvider,
    template: &Path,
    name: &str,
    placement: &PlacementConfig,
) -> Result<Attachment, AttachmentError> {
    let display_name = name.trim().to_uppercase();
    let bytes = provider.generate(template, &display_name, placement)?;
    Ok(Attachment::png(attachment_filename(name), bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Recording(Mutex<Vec<String>>);

    impl AttachmentProvider for Recording {
        fn generate(
            &self,
            _template: &Path,
            display_name: &str,
            _placement: &PlacementConfig,
        ) -> Result<Vec<u8>, AttachmentError> {
            self.0.lock().unwrap().push(display_name.to_string());
            Ok(vec![1, 2, 3])
        }
    }

    #[test]
    fn generator_is_empty_by_default() {
        assert!(CertificateGenerator::default().provider().is_none());
        let installed = CertificateGenerator {
            provider: Some(Arc::new(Recording(Mutex::new(Vec::new())))),
        };
        assert!(installed.provider().is_some());
    }

    #[test]
    fn filename_joins_upper_cased_words() {
        assert_eq!(attachment_filename("Ada Lovelace"), "certificate_ADA_LOVELACE.png");
        assert_eq!(attachment_filename("  grace   m hopper "), "certificate_GRACE_M_HOPPER.png");
    }

    #[test]
    fn provider_receives_upper_cased_name() {
        let provider = Recording(Mutex::new(Vec::new()));
        let attachment = certificate_attachment(
            &provider,
            Path::new("blank.png"),
            " Ada Lovelace",
            &PlacementConfig::default(),
        )
        .unwrap();

        assert_eq!(*provider.0.lock().unwrap(), vec!["ADA LOVELACE".to_string()]);
        assert_eq!(attachment.filename, "certificate_ADA_LOVELACE.png");
        assert_eq!(attachment.content_type, "image/png");
        assert_eq!(attachment.bytes, vec![1, 2, 3]);
    }
}
