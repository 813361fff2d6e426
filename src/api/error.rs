use reqwest::StatusCode;
use thiserror::Error;
use crate::session::SessionError;

/// Failures talking to the backend. `Display` is the text shown to the user.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Transport(String),
    #[error("{message}")]
    Status { status: u16, message: String },
    #[error("{0}")]
    Rejected(String),
    #[error("Unexpected response from server: {0}")]
    Decode(String),
    #[error("Invalid API endpoint: {0}")]
    InvalidUrl(String),
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl ApiError {
    /// Builds the error for a non-2xx response, preferring the server's own
    /// message over the HTTP reason phrase.
    pub fn from_status(status: StatusCode, body: &[u8]) -> Self {
        let message = extract_message(body).unwrap_or_else(|| {
            status
                .canonical_reason()
                .map(str::to_string)
                .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()))
        });
        Self::Status { status: status.as_u16(), message }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            Self::Decode(error.to_string())
        } else {
            Self::Transport(error.to_string())
        }
    }
}

const MAX_TEXT_MESSAGE: usize = 200;

/// Pulls a human-readable message out of an error body.
///
/// Looks at `message`, then `error` (string or `{message}`), then falls
/// back to the raw text when the body is short plain text.
pub fn extract_message(body: &[u8]) -> Option<String> {
    if let Ok(json) = serde_json::from_slice::<serde_json::Value>(body) {
        let from_json = json
            .get("message")
            .and_then(|v| v.as_str())
            .or_else(|| json.get("error").and_then(|v| v.as_str()))
            .or_else(|| json.pointer("/error/message").and_then(|v| v.as_str()))
            .map(str::trim)
            .filter(|m| !m.is_empty());
        return from_json.map(str::to_string);
    }
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() || text.len() > MAX_TEXT_MESSAGE || text.starts_with('<') {
        return None;
    }
    Some(text.to_string())
}
