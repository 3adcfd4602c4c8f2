use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two document types a merge can produce.
///
/// The variant selects the field schema, the HTML and plain-text skeletons and
/// the default subject line. It is chosen once per run and never changes while
/// a batch is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateVariant {
    /// "Thank you for attending" notice carrying a certificate.
    Certificate(CertificateKind),
    /// Invitation to an upcoming event.
    Event,
}

/// How the certificate reaches the recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CertificateKind {
    /// A personalised image is attached to the email. Rows must carry a `CertificateID`.
    #[default]
    Attached,
    /// The certificate lives online. Rows must carry a `CertificateURL`.
    Hosted,
}

impl TemplateVariant {
    /// Short key written to the `TemplateUsed` column of the send log.
    pub fn key(&self) -> &'static str {
        match self {
            TemplateVariant::Certificate(_) => "certificate",
            TemplateVariant::Event => "event",
        }
    }

    /// Human readable template name.
    pub fn display_name(&self) -> &'static str {
        match self {
            TemplateVariant::Certificate(_) => "Thank You for Attending",
            TemplateVariant::Event => "Upcoming Event Invitation",
        }
    }

    /// Whether recipients of this variant get a generated certificate image.
    pub fn requires_attachment(&self) -> bool {
        matches!(self, TemplateVariant::Certificate(CertificateKind::Attached))
    }
}

impl fmt::Display for TemplateVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateVariant::Certificate(CertificateKind::Attached) => f.write_str("certificate"),
            TemplateVariant::Certificate(CertificateKind::Hosted) => {
                f.write_str("certificate-hosted")
            }
            TemplateVariant::Event => f.write_str("event"),
        }
    }
}

impl FromStr for TemplateVariant {
    type Err = String;

    /// Parses the path form used by the HTTP API (`certificate`, `certificate-hosted`, `event`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "certificate" | "certificate-attached" => {
                Ok(TemplateVariant::Certificate(CertificateKind::Attached))
            }
            "certificate-hosted" => Ok(TemplateVariant::Certificate(CertificateKind::Hosted)),
            "event" => Ok(TemplateVariant::Event),
            other => Err(format!("Unknown template variant: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_path_forms() {
        assert_eq!(
            "certificate".parse::<TemplateVariant>().unwrap(),
            TemplateVariant::Certificate(CertificateKind::Attached)
        );
        assert_eq!(
            "Certificate-Hosted".parse::<TemplateVariant>().unwrap(),
            TemplateVariant::Certificate(CertificateKind::Hosted)
        );
        assert_eq!("event".parse::<TemplateVariant>().unwrap(), TemplateVariant::Event);
        assert!("newsletter".parse::<TemplateVariant>().is_err());
    }

    #[test]
    fn display_round_trips_through_from_str() {
        let hosted = TemplateVariant::Certificate(CertificateKind::Hosted);
        assert_eq!(hosted.to_string().parse::<TemplateVariant>().unwrap(), hosted);
    }

    #[test]
    fn serde_shape() {
        let json = serde_json::to_string(&TemplateVariant::Event).unwrap();
        assert_eq!(json, "\"event\"");
        let cert: TemplateVariant = serde_json::from_str(r#"{"certificate":"hosted"}"#).unwrap();
        assert_eq!(cert, TemplateVariant::Certificate(CertificateKind::Hosted));
    }

    #[test]
    fn only_attached_certificates_need_an_image() {
        assert!(TemplateVariant::Certificate(CertificateKind::Attached).requires_attachment());
        assert!(!TemplateVariant::Certificate(CertificateKind::Hosted).requires_attachment());
        assert!(!TemplateVariant::Event.requires_attachment());
        assert_eq!(TemplateVariant::Certificate(CertificateKind::Hosted).key(), "certificate");
    }
}
