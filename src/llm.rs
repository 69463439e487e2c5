//! Chat-completion API boundary.
//!
//! The generator only needs one operation: send a list of role-tagged
//! messages with a model, temperature and token budget, get one text
//! completion back. [`ChatClient`] is that seam; [`OpenAiClient`] implements
//! it against any OpenAI-compatible `/chat/completions` endpoint with a
//! blocking `reqwest` client.
//!
//! ## Error kinds
//!
//! Failures carry an [`ApiErrorKind`] so the retry policy never has to guess
//! from text. The kind is taken from structured signals first:
//!
//! | Signal | Kind |
//! |--------|------|
//! | HTTP 429, error code `rate_limit_exceeded` | `RateLimited` |
//! | HTTP 500 / 502 / 503 | `ServerError` |
//! | HTTP 529, error type `overloaded_error` | `Overloaded` |
//! | `reqwest` timeout | `Timeout` |
//!
//! Only when none of those apply is the message scanned for markers
//! (`rate_limit`, `429`, `500`, `502`, `503`, `timeout`, `overloaded`).

use crate::config::OpenAiConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    RateLimited,
    Timeout,
    Overloaded,
    ServerError,
    /// The API refused the request (bad key, bad model, 4xx).
    Rejected,
    /// Connection-level failure that is not a timeout.
    Transport,
    /// The response arrived but had no usable completion.
    InvalidResponse,
}

impl ApiErrorKind {
    /// Whether a retry has a reasonable chance of succeeding.
    pub fn is_transient(self) -> bool {
        matches!(
            self,
            ApiErrorKind::RateLimited
                | ApiErrorKind::Timeout
                | ApiErrorKind::Overloaded
                | ApiErrorKind::ServerError
        )
    }
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ApiErrorKind::RateLimited => "rate limited",
            ApiErrorKind::Timeout => "timeout",
            ApiErrorKind::Overloaded => "overloaded",
            ApiErrorKind::ServerError => "server error",
            ApiErrorKind::Rejected => "rejected",
            ApiErrorKind::Transport => "transport error",
            ApiErrorKind::InvalidResponse => "invalid response",
        };
        f.write_str(label)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("API {kind}: {message}")]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

/// Substrings that mark an otherwise unclassified error as transient.
const TRANSIENT_MARKERS: [(&str, ApiErrorKind); 7] = [
    ("rate_limit", ApiErrorKind::RateLimited),
    ("429", ApiErrorKind::RateLimited),
    ("timeout", ApiErrorKind::Timeout),
    ("overloaded", ApiErrorKind::Overloaded),
    ("500", ApiErrorKind::ServerError),
    ("502", ApiErrorKind::ServerError),
    ("503", ApiErrorKind::ServerError),
];

impl ApiError {
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn is_transient(&self) -> bool {
        self.kind.is_transient()
    }

    /// Classify free text, for failures without a status or error code.
    /// Anything without a marker is `fallback`.
    pub fn from_message(message: impl Into<String>, fallback: ApiErrorKind) -> Self {
        let message = message.into();
        let lower = message.to_lowercase();
        let kind = TRANSIENT_MARKERS
            .iter()
            .find(|(marker, _)| lower.contains(marker))
            .map(|(_, kind)| *kind)
            .unwrap_or(fallback);
        Self { kind, message }
    }

    /// Classify an HTTP error response from its status and body.
    pub fn from_response(status: u16, body: &str) -> Self {
        let detail = serde_json::from_str::<ErrorEnvelope>(body)
            .ok()
            .map(|e| e.error);
        let message = match &detail {
            Some(d) if !d.message.is_empty() => format!("HTTP {status}: {}", d.message),
            _ => format!("HTTP {status}: {}", body.trim()),
        };

        let code = detail.as_ref().and_then(|d| d.code.as_deref());
        let error_type = detail.as_ref().and_then(|d| d.error_type.as_deref());

        let kind = match (status, code, error_type) {
            (_, Some("rate_limit_exceeded"), _) | (429, _, _) => ApiErrorKind::RateLimited,
            (_, _, Some("overloaded_error")) | (529, _, _) => ApiErrorKind::Overloaded,
            (500 | 502 | 503, _, _) => ApiErrorKind::ServerError,
            (408 | 504, _, _) => ApiErrorKind::Timeout,
            _ => ApiErrorKind::Rejected,
        };
        Self { kind, message }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return ApiError::new(ApiErrorKind::Timeout, err.to_string());
        }
        if let Some(status) = err.status() {
            return ApiError::from_response(status.as_u16(), &err.to_string());
        }
        if err.is_decode() {
            return ApiError::new(ApiErrorKind::InvalidResponse, err.to_string());
        }
        ApiError::from_message(err.to_string(), ApiErrorKind::Transport)
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: String,
    #[serde(rename = "type")]
    error_type: Option<String>,
    code: Option<String>,
}

// ============================================================================
// Request / response types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// One chat-completion request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    pub max_tokens: u32,
    pub messages: Vec<ChatMessage>,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Anything that turns a chat request into one completion text.
pub trait ChatClient {
    fn complete(&self, request: &ChatRequest) -> Result<String, ApiError>;
}

impl<C: ChatClient + ?Sized> ChatClient for &C {
    fn complete(&self, request: &ChatRequest) -> Result<String, ApiError> {
        (**self).complete(request)
    }
}

// ============================================================================
// OpenAI-compatible HTTP client
// ============================================================================

pub struct OpenAiClient {
    client: reqwest::blocking::Client,
    api_key: String,
    endpoint: String,
}

impl OpenAiClient {
    pub fn new(config: &OpenAiConfig) -> Result<Self, ApiError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
        })
    }
}

impl fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("client", &"<reqwest::blocking::Client>")
            .field("api_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl ChatClient for OpenAiClient {
    fn complete(&self, request: &ChatRequest) -> Result<String, ApiError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()?;

        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            return Err(ApiError::from_response(status.as_u16(), &body));
        }
        parse_completion(&body)
    }
}

/// Extract the first choice's text from a chat-completion response body.
pub fn parse_completion(body: &str) -> Result<String, ApiError> {
    let parsed: ChatResponse = serde_json::from_str(body).map_err(|e| {
        ApiError::new(
            ApiErrorKind::InvalidResponse,
            format!("unparseable completion: {e}"),
        )
    })?;
    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .map(|text| text.trim().to_string())
        .ok_or_else(|| ApiError::new(ApiErrorKind::InvalidResponse, "completion has no content"))
}
