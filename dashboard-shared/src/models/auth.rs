use serde::{Deserialize, Serialize};
use std::fmt;

/// Credentials posted to `/login/`.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginRequest {
    /// Account username.
    pub username: String,
    /// Plain-text password, sent once over the wire and never stored.
    pub password: String,
}

impl LoginRequest {
    /// Build a login request from borrowed credentials.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Successful `/login/` response carrying the opaque bearer token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginResponse {
    /// Token to send as `Authorization: Token <token>`.
    pub token: String,
}
