//! HTTP wrapper around the dashboard REST API.
//!
//! Every request is authorised with the token current *at call time*, read
//! from an injected [`CredentialProvider`]. A 401 from any endpoint is
//! reported once to an injected [`AuthFailureHandler`] before the error is
//! returned unchanged. Nothing is retried or queued.

use std::{fmt, sync::Arc, time::Duration};

use reqwest::{
    Client, RequestBuilder, Response, StatusCode,
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue},
};
use shared::{
    config::ClientConfig,
    models::{
        CreateMessageRequest, DashboardStats, LoginRequest, LoginResponse, Message,
        MessageFilters, Paginated, User,
    },
};
use tracing::{debug, warn};
use url::Url;

use crate::error::ApiError;

const USER_AGENT: &str = concat!("admin-dashboard/", env!("CARGO_PKG_VERSION"));

/// Supplies the bearer token for outgoing requests.
pub trait CredentialProvider: Send + Sync {
    /// Token to attach, if any. Called once per request.
    fn token(&self) -> Option<String>;
}

/// Notified when the API rejects a request as unauthenticated.
pub trait AuthFailureHandler: Send + Sync {
    /// Called exactly once for each request answered with 401.
    fn on_auth_failure(&self);
}

/// Provider and handler for callers that never authenticate.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unauthenticated;

impl CredentialProvider for Unauthenticated {
    fn token(&self) -> Option<String> {
        None
    }
}

impl AuthFailureHandler for Unauthenticated {
    fn on_auth_failure(&self) {}
}

/// Lightweight API client for the dashboard endpoints.
#[derive(Clone)]
pub struct ApiClient {
    base_url: Url,
    client: Client,
    credentials: Arc<dyn CredentialProvider>,
    on_unauthorized: Arc<dyn AuthFailureHandler>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Builds a client for `config.api_base_url`.
    ///
    /// # Errors
    /// Returns an error when the base URL is invalid or the HTTP client
    /// cannot be constructed.
    pub fn new(
        config: &ClientConfig,
        credentials: Arc<dyn CredentialProvider>,
        on_unauthorized: Arc<dyn AuthFailureHandler>,
    ) -> Result<Self, ApiError> {
        let base_url = config.base_url()?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = Client::builder()
            .default_headers(headers)
            .user_agent(USER_AGENT);
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            base_url,
            client: builder.build()?,
            credentials,
            on_unauthorized,
        })
    }

    /// Base URL every endpoint is joined onto. Always ends in `/`.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.credentials.token() {
            Some(token) => request.header(AUTHORIZATION, format!("Token {token}")),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = self.authorize(request).send().await?;
        let status = response.status();
        debug!(url = %response.url(), %status, "api response");
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        if status == StatusCode::UNAUTHORIZED {
            warn!("api rejected credentials; ending session");
            self.on_unauthorized.on_auth_failure();
        }
        Err(ApiError::Status { status, body })
    }

    /// Exchanges credentials for a token via `POST /login/`.
    ///
    /// # Errors
    /// Any non-2xx response or transport failure.
    pub async fn login(&self, payload: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let url = self.endpoint("login/")?;
        let response = self.send(self.client.post(url).json(payload)).await?;
        Ok(response.json().await?)
    }

    /// Profile of the user owning the current token, from `GET /user/`.
    ///
    /// # Errors
    /// Any non-2xx response or transport failure.
    pub async fn current_user(&self) -> Result<User, ApiError> {
        let url = self.endpoint("user/")?;
        let response = self.send(self.client.get(url)).await?;
        Ok(response.json().await?)
    }

    /// One page of `GET /users/`.
    ///
    /// # Errors
    /// Any non-2xx response or transport failure.
    pub async fn list_users(&self, page: u32) -> Result<Paginated<User>, ApiError> {
        let url = self.endpoint("users/")?;
        let request = self.client.get(url).query(&[("page", page)]);
        let response = self.send(request).await?;
        Ok(response.json().await?)
    }

    /// One page of `GET /messages/`, narrowed by `filters`.
    ///
    /// # Errors
    /// Any non-2xx response or transport failure.
    pub async fn list_messages(
        &self,
        page: u32,
        filters: &MessageFilters,
    ) -> Result<Paginated<Message>, ApiError> {
        let url = self.endpoint("messages/")?;
        let request = self
            .client
            .get(url)
            .query(&[("page", page)])
            .query(&filters.query_pairs());
        let response = self.send(request).await?;
        Ok(response.json().await?)
    }

    /// Posts a new message. Returns the created row when the server echoes one.
    ///
    /// # Errors
    /// Any non-2xx response or transport failure.
    pub async fn create_message(
        &self,
        payload: &CreateMessageRequest,
    ) -> Result<Option<Message>, ApiError> {
        let url = self.endpoint("messages/")?;
        let response = self.send(self.client.post(url).json(payload)).await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body).ok())
    }

    /// Deletes a message via `DELETE /messages/{id}/`.
    ///
    /// # Errors
    /// Any non-2xx response (403 for non-owners) or transport failure.
    pub async fn delete_message(&self, id: i64) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("messages/{id}/"))?;
        self.send(self.client.delete(url)).await?;
        Ok(())
    }

    /// Aggregate counters from `GET /dashboard-stats/`.
    ///
    /// # Errors
    /// Any non-2xx response or transport failure.
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        let url = self.endpoint("dashboard-stats/")?;
        let response = self.send(self.client.get(url)).await?;
        Ok(response.json().await?)
    }
}
