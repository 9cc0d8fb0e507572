//! Errors surfaced by the HTTP wrapper.

use reqwest::StatusCode;
use shared::{config::ConfigError, models::ErrorResponse};

/// Failure of a single API call.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response, or the body could not be decoded.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("server responded with {status}{}", describe_body(.body))]
    Status {
        /// HTTP status returned.
        status: StatusCode,
        /// Raw response body, possibly empty.
        body: String,
    },

    /// An endpoint path could not be joined onto the base URL.
    #[error("invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The client configuration was unusable.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ApiError {
    /// HTTP status of the failure, when the server answered.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Http(err) => err.status(),
            Self::InvalidUrl(_) | Self::Config(_) => None,
        }
    }

    /// `true` for 401 responses.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }

    /// `true` for 403 responses.
    #[must_use]
    pub fn is_forbidden(&self) -> bool {
        self.status() == Some(StatusCode::FORBIDDEN)
    }
}

fn describe_body(body: &str) -> String {
    if let Some(parsed) = ErrorResponse::parse(body) {
        return format!(": {parsed}");
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {trimmed}")
    }
}
