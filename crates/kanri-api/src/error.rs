use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Errors from the catalog API client.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiError {
    /// The text to surface to the user.
    ///
    /// For server-side failures this is the message the server put in the
    /// body; everything else falls back to the transport description.
    pub fn message(&self) -> String {
        match self {
            Self::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Pull a human-readable message out of a failed response body.
pub(crate) fn extract_message(status: StatusCode, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        if !parsed.error.trim().is_empty() {
            return parsed.error;
        }
    }
    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }
    status
        .canonical_reason()
        .unwrap_or("request failed")
        .to_string()
}
