use serde::{Deserialize, Serialize};

/// Error body returned by the API on a non-2xx response.
///
/// The server reports either a single `detail` string or a list of
/// `non_field_errors`; both are optional.
#[derive(Debug, Default, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ErrorResponse {
    /// Human-readable reason.
    #[serde(default)]
    pub detail: Option<String>,
    /// Validation messages not tied to a single field.
    #[serde(default)]
    pub non_field_errors: Vec<String>,
}

impl ErrorResponse {
    /// Best-effort parse of a raw response body.
    #[must_use]
    pub fn parse(body: &str) -> Option<Self> {
        serde_json::from_str::<Self>(body)
            .ok()
            .filter(|parsed| parsed.message().is_some())
    }

    /// Single display line, preferring `detail`.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        if let Some(detail) = &self.detail {
            return Some(detail.clone());
        }
        if self.non_field_errors.is_empty() {
            None
        } else {
            Some(self.non_field_errors.join("; "))
        }
    }
}

impl std::fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.message() {
            Some(message) => f.write_str(&message),
            None => f.write_str("unknown error"),
        }
    }
}
