use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Options consumed by the batch orchestrator.
///
/// Built by whatever front end drives the merge (HTTP request, script, test)
/// and passed in fully populated; nothing is prompted for mid-run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SendOptions {
    /// Render and log everything without contacting the mail transport.
    pub dry_run: bool,
    /// Pause between consecutive recipients, in seconds.
    pub throttle_seconds: f64,
    /// Sender header override. When absent the transport's own identity is used.
    pub from_address: Option<String>,
    /// Restrict the run to rows whose email matches this address (case-insensitive).
    pub filter_email: Option<String>,
    /// Where the CSV send log is written.
    pub log_path: String,
    /// Subject pattern overriding the variant default. May contain `{Field}` placeholders.
    pub custom_subject: Option<String>,
}

impl Default for SendOptions {
    fn default() -> Self {
        Self {
            dry_run: true,
            throttle_seconds: 0.8,
            from_address: None,
            filter_email: None,
            log_path: "send_log.csv".to_string(),
            custom_subject: None,
        }
    }
}

impl SendOptions {
    /// Throttle interval; negative or NaN values count as zero.
    ///
    /// `None` when the value is too large to represent as a [`Duration`].
    pub fn throttle(&self) -> Option<Duration> {
        if self.throttle_seconds > 0.0 {
            Duration::try_from_secs_f64(self.throttle_seconds).ok()
        } else {
            Some(Duration::ZERO)
        }
    }

    /// Whether `email` survives the single-address filter.
    pub fn matches_filter(&self, email: &str) -> bool {
        match self.filter_email.as_deref().map(str::trim) {
            Some(filter) if !filter.is_empty() => email.trim().eq_ignore_ascii_case(filter),
            _ => true,
        }
    }

    /// Custom subject, ignoring blank overrides.
    pub fn subject_override(&self) -> Option<&str> {
        self.custom_subject
            .as_deref()
            .filter(|subject| !subject.trim().is_empty())
    }
}

/// Where and how the recipient's name is drawn on a certificate image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Manual top-left pixel position of the name.
    pub position: Option<(u32, u32)>,
    /// Place the name just above a detected horizontal guideline.
    pub auto_position: bool,
    /// Guideline row found ahead of time, if any.
    pub detected_line_y: Option<u32>,
    /// Extra vertical shift, positive moves down.
    pub vertical_offset: i32,
    pub font_size: u32,
    /// Hex colour such as `#000000`.
    pub font_color: String,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            position: None,
            auto_position: false,
            detected_line_y: None,
            vertical_offset: 0,
            font_size: 80,
            font_color: "#000000".to_string(),
        }
    }
}

/// Certificate image settings for a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CertificateOptions {
    /// Path to the blank certificate template image.
    pub template_path: String,
    #[serde(default)]
    pub placement: PlacementConfig,
}
