//! Backend connection settings.
//!
//! # Responsibility
//! - Describe how to reach the WordPress ajax endpoint for one course.
//! - Load settings from JSON or `CURRICULUM_*` environment variables.
//!
//! # Invariants
//! - A validated config always has an http(s) URL, a nonce field name,
//!   a course id and a non-zero timeout.

use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::time::Duration;

/// Default ajax action returning the course curriculum.
pub const DEFAULT_FETCH_ACTION: &str = "tutor_course_contents";
/// Default ajax action persisting the curriculum order.
pub const DEFAULT_ORDER_ACTION: &str = "tutor_update_course_content_order";
const DEFAULT_NONCE_KEY: &str = "_tutor_nonce";
const DEFAULT_TIMEOUT_MS: u64 = 15_000;
const ENV_PREFIX: &str = "CURRICULUM_";

/// Configuration loading/validation errors.
#[derive(Debug)]
pub enum ConfigError {
    /// One field holds an unusable value.
    Invalid {
        field: &'static str,
        message: String,
    },
    /// Config file cannot be read.
    Io(std::io::Error),
    /// Config JSON cannot be decoded.
    Parse(serde_json::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid { field, message } => write!(f, "invalid config `{field}`: {message}"),
            Self::Io(err) => write!(f, "failed to read config: {err}"),
            Self::Parse(err) => write!(f, "failed to parse config: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid { .. } => None,
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Ajax endpoint settings for one course builder session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Absolute URL of `wp-admin/admin-ajax.php`.
    pub ajax_url: String,
    /// Form field name carrying the nonce.
    pub nonce_key: String,
    pub nonce: String,
    pub course_id: String,
    pub timeout_ms: u64,
    pub fetch_action: String,
    pub order_action: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            ajax_url: String::new(),
            nonce_key: DEFAULT_NONCE_KEY.to_string(),
            nonce: String::new(),
            course_id: String::new(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            fetch_action: DEFAULT_FETCH_ACTION.to_string(),
            order_action: DEFAULT_ORDER_ACTION.to_string(),
        }
    }
}

impl BackendConfig {
    /// Decodes and validates a JSON config document.
    pub fn from_json_str(value: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(value)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a JSON config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Reads `CURRICULUM_AJAX_URL`, `CURRICULUM_NONCE_KEY`, `CURRICULUM_NONCE`,
    /// `CURRICULUM_COURSE_ID` and `CURRICULUM_TIMEOUT_MS`; unset values keep
    /// their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(format!("{ENV_PREFIX}{name}")).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(value) = lookup("AJAX_URL") {
            config.ajax_url = value;
        }
        if let Some(value) = lookup("NONCE_KEY") {
            config.nonce_key = value;
        }
        if let Some(value) = lookup("NONCE") {
            config.nonce = value;
        }
        if let Some(value) = lookup("COURSE_ID") {
            config.course_id = value;
        }
        if let Some(value) = lookup("TIMEOUT_MS") {
            config.timeout_ms = value.trim().parse().map_err(|_| ConfigError::Invalid {
                field: "timeout_ms",
                message: format!("expected milliseconds, got `{value}`"),
            })?;
        }
        config.validate()?;
        Ok(config)
    }

    /// Checks field-level invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.ajax_url.trim();
        if url.is_empty() {
            return Err(invalid("ajax_url", "must not be empty"));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(invalid("ajax_url", "must be an http(s) URL"));
        }
        if self.nonce_key.trim().is_empty() {
            return Err(invalid("nonce_key", "must not be empty"));
        }
        if self.course_id.trim().is_empty() {
            return Err(invalid("course_id", "must not be empty"));
        }
        if self.timeout_ms == 0 {
            return Err(invalid("timeout_ms", "must be greater than zero"));
        }
        if self.fetch_action.trim().is_empty() || self.order_action.trim().is_empty() {
            return Err(invalid("action", "ajax action names must not be empty"));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn invalid(field: &'static str, message: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{BackendConfig, ConfigError, DEFAULT_ORDER_ACTION};
    use std::collections::HashMap;

    #[test]
    fn lookup_fills_fields_and_keeps_defaults() {
        let values = HashMap::from([
            ("AJAX_URL", "https://lms.test/wp-admin/admin-ajax.php"),
            ("NONCE", "abc"),
            ("COURSE_ID", "42"),
        ]);
        let config =
            BackendConfig::from_lookup(|name| values.get(name).map(|v| v.to_string())).unwrap();

        assert_eq!(config.course_id, "42");
        assert_eq!(config.nonce_key, "_tutor_nonce");
        assert_eq!(config.order_action, DEFAULT_ORDER_ACTION);
        assert_eq!(config.timeout_ms, 15_000);
    }

    #[test]
    fn lookup_rejects_non_numeric_timeout() {
        let err = BackendConfig::from_lookup(|name| match name {
            "TIMEOUT_MS" => Some("soon".to_string()),
            _ => None,
        })
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "timeout_ms",
                ..
            }
        ));
    }

    #[test]
    fn validate_rejects_non_http_url() {
        let config = BackendConfig {
            ajax_url: "ftp://lms.test".to_string(),
            course_id: "1".to_string(),
            ..BackendConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "ajax_url",
                ..
            })
        ));
    }
}
