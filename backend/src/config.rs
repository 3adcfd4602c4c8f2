//! Server and engine settings read from `MAILMERGE_*` environment variables.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `MAILMERGE_HOST` | `127.0.0.1` |
//! | `MAILMERGE_PORT` | `8080` |
//! | `MAILMERGE_DATABASE_PATH` | `mailmerge.sqlite` |
//! | `MAILMERGE_UPLOADS_DIR` | `uploads` |
//! | `MAILMERGE_LOGS_DIR` | `logs`, send logs are always written below it |
//! | `MAILMERGE_GMAIL_API_BASE` | `https://gmail.googleapis.com` |
//! | `MAILMERGE_ACCESS_TOKEN` | unset, needed for live runs |
//! | `MAILMERGE_SENDER` | unset, authenticated sender address |
//! | `MAILMERGE_ORG_NAME`, `MAILMERGE_SUPPORT_EMAIL`, `MAILMERGE_SIGNER_NAME` | see [`FieldDefaults`] |

use crate::services::templates::schema::FieldDefaults;
use config::{Config, ConfigError, Environment};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_path: String,
    pub uploads_dir: String,
    pub logs_dir: String,
    pub gmail_api_base: String,
    pub access_token: Option<String>,
    pub sender: Option<String>,
    pub org_name: Option<String>,
    pub support_email: Option<String>,
    pub signer_name: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            database_path: "mailmerge.sqlite".to_string(),
            uploads_dir: "uploads".to_string(),
            logs_dir: "logs".to_string(),
            gmail_api_base: "https://gmail.googleapis.com".to_string(),
            access_token: None,
            sender: None,
            org_name: None,
            support_email: None,
            signer_name: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_config(
            Config::builder()
                .add_source(Environment::with_prefix("MAILMERGE"))
                .build()?,
        )
    }

    pub fn from_config(config: Config) -> Result<Self, ConfigError> {
        config.try_deserialize()
    }

    /// Fallbacks for blank organisation fields, overridden where configured.
    pub fn field_defaults(&self) -> FieldDefaults {
        let base = FieldDefaults::default();
        FieldDefaults {
            org_name: self.org_name.clone().unwrap_or(base.org_name),
            support_email: self.support_email.clone().unwrap_or(base.support_email),
            signer_name: self.signer_name.clone().unwrap_or(base.signer_name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_source_gives_defaults() {
        let config = AppConfig::from_config(Config::builder().build().unwrap()).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.logs_dir, "logs");
        assert_eq!(config.gmail_api_base, "https://gmail.googleapis.com");
        assert!(config.access_token.is_none());
        assert_eq!(config.field_defaults(), FieldDefaults::default());
    }

    #[test]
    fn overrides_are_applied() {
        let config = AppConfig::from_config(
            Config::builder()
                .set_override("port", 9090)
                .unwrap()
                .set_override("sender", "events@example.org")
                .unwrap()
                .set_override("org_name", "Analytical Society")
                .unwrap()
                .build()
                .unwrap(),
        )
        .unwrap();
        assert_eq!(config.port, 9090);
        assert_eq!(config.sender.as_deref(), Some("events@example.org"));
        assert_eq!(config.field_defaults().org_name, "Analytical Society");
        assert_eq!(config.field_defaults().signer_name, "The Organizing Team");
    }
}
