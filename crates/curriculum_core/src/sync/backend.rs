//! Backend contract and WordPress ajax implementation.
//!
//! # Responsibility
//! - Define the fetch/order operations the engine needs from the backend.
//! - Speak the `admin-ajax.php` action protocol: form POST with `action`
//!   and nonce fields, JSON `{ success, data }` envelope in response.
//!
//! # Invariants
//! - Every request carries the configured action name and nonce field.
//! - Malformed responses surface as `InvalidResponse`, never as panics.

use super::payload::ContentOrderPayload;
use crate::config::BackendConfig;
use crate::model::curriculum::ServerTopic;
use log::{info, warn};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type used by backend operations.
pub type BackendResult<T> = Result<T, BackendError>;

/// Errors from backend round-trips.
#[derive(Debug)]
pub enum BackendError {
    /// Request could not be sent or the response body could not be read.
    Transport(reqwest::Error),
    /// Backend answered with a non-success HTTP status.
    Status(u16),
    /// Backend answered `success: false` (or WordPress' bare `0`/`-1`).
    Rejected(String),
    /// Response body does not match the expected shape.
    InvalidResponse(String),
    /// Delivery worker is no longer running.
    WorkerStopped,
}

impl Display for BackendError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(err) => write!(f, "backend request failed: {err}"),
            Self::Status(code) => write!(f, "backend returned HTTP status {code}"),
            Self::Rejected(message) => write!(f, "backend rejected request: {message}"),
            Self::InvalidResponse(message) => write!(f, "invalid backend response: {message}"),
            Self::WorkerStopped => write!(f, "order delivery worker stopped"),
        }
    }
}

impl Error for BackendError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Transport(err) => Some(err),
            Self::Status(_) => None,
            Self::Rejected(_) => None,
            Self::InvalidResponse(_) => None,
            Self::WorkerStopped => None,
        }
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(value)
    }
}

/// Backend operations consumed by the curriculum engine.
pub trait CurriculumBackend: Send + Sync {
    /// Loads topics with their contents for one course, in backend order.
    fn fetch_topics(&self, course_id: &str) -> BackendResult<Vec<ServerTopic>>;
    /// Persists the full curriculum order.
    fn update_content_order(&self, payload: &ContentOrderPayload) -> BackendResult<()>;
}

#[derive(Deserialize)]
struct AjaxEnvelope {
    success: bool,
    #[serde(default)]
    data: Value,
    #[serde(default)]
    message: Option<String>,
}

/// Decodes one `admin-ajax.php` response body into its `data` member.
pub fn decode_envelope(body: &str) -> BackendResult<Value> {
    match body.trim() {
        "-1" => return Err(BackendError::Rejected("nonce verification failed".to_string())),
        "0" => return Err(BackendError::Rejected("unknown ajax action".to_string())),
        _ => {}
    }

    let envelope: AjaxEnvelope = serde_json::from_str(body)
        .map_err(|err| BackendError::InvalidResponse(format!("envelope: {err}")))?;
    if envelope.success {
        return Ok(envelope.data);
    }

    let message = envelope
        .message
        .or_else(|| envelope.data.as_str().map(str::to_string))
        .or_else(|| {
            envelope
                .data
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| "request failed".to_string());
    Err(BackendError::Rejected(message))
}

/// Decodes the `data` member of a fetch response.
pub fn decode_topics(data: Value) -> BackendResult<Vec<ServerTopic>> {
    if data.is_null() {
        return Ok(Vec::new());
    }
    serde_json::from_value(data)
        .map_err(|err| BackendError::InvalidResponse(format!("topics: {err}")))
}

/// `admin-ajax.php` backend over blocking HTTP.
pub struct AjaxBackend {
    client: Client,
    config: BackendConfig,
}

impl AjaxBackend {
    /// Creates a backend from validated config.
    pub fn new(config: BackendConfig) -> BackendResult<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    fn post_action(&self, action: &str, mut fields: Vec<(String, String)>) -> BackendResult<Value> {
        fields.push(("action".to_string(), action.to_string()));
        fields.push((self.config.nonce_key.clone(), self.config.nonce.clone()));

        let response = self
            .client
            .post(self.config.ajax_url.as_str())
            .form(&fields)
            .send()?;
        let status = response.status();
        if !status.is_success() {
            warn!(
                "event=ajax_request module=sync status=error action={} http_status={}",
                action,
                status.as_u16()
            );
            return Err(BackendError::Status(status.as_u16()));
        }

        let body = response.text()?;
        decode_envelope(&body)
    }
}

impl CurriculumBackend for AjaxBackend {
    fn fetch_topics(&self, course_id: &str) -> BackendResult<Vec<ServerTopic>> {
        let data = self.post_action(
            &self.config.fetch_action,
            vec![("course_id".to_string(), course_id.to_string())],
        )?;
        let topics = decode_topics(data)?;
        info!(
            "event=fetch_topics module=sync status=ok course_id={} topics={}",
            course_id,
            topics.len()
        );
        Ok(topics)
    }

    fn update_content_order(&self, payload: &ContentOrderPayload) -> BackendResult<()> {
        let fields = payload
            .to_form_fields()
            .map_err(|err| BackendError::InvalidResponse(format!("encode payload: {err}")))?;
        self.post_action(&self.config.order_action, fields)?;
        Ok(())
    }
}
