use std::sync::Arc;

use shared::{config::ClientConfig, models::User};
use tracing::debug;

use crate::{
    api::ApiClient,
    error::ApiError,
    pages::{DashboardPage, ReportsPage, UsersPage},
    routes::{Navigation, Route, guard},
    session::{LoginOutcome, Session},
    storage::{FileTokenStore, TokenStore},
};

/// Application root: owns the session and the API client built around it.
#[derive(Debug, Clone)]
pub struct App {
    config: ClientConfig,
    session: Session,
    api: ApiClient,
}

impl App {
    /// Restores the session from `tokens` and wires it into a new client.
    ///
    /// # Errors
    /// Returns an error when the configured base URL is unusable.
    pub fn new(config: ClientConfig, tokens: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        let session = Session::restore(tokens);
        let api = ApiClient::new(
            &config,
            Arc::new(session.clone()),
            Arc::new(session.clone()),
        )?;
        debug!(base_url = %api.base_url(), "api client ready");
        Ok(Self {
            config,
            session,
            api,
        })
    }

    /// As [`Self::new`], persisting the token at the configured path.
    ///
    /// # Errors
    /// Returns an error when the configured base URL is unusable.
    pub fn with_file_store(config: ClientConfig) -> Result<Self, ApiError> {
        let store = FileTokenStore::new(config.resolved_token_path());
        debug!(path = %store.path().display(), "token file");
        Self::new(config, Arc::new(store))
    }

    /// Loads the profile behind a restored token, if any.
    ///
    /// A rejected token ends the session here.
    pub async fn start(&self) -> Option<User> {
        if !self.session.is_authenticated() {
            return None;
        }
        if let Some(user) = self.session.current_user() {
            return Some(user);
        }
        self.session.fetch_current_user(&self.api).await
    }

    /// Settings the app was built from.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The one session.
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// The one API client.
    #[must_use]
    pub const fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Signs in through the shared client.
    pub async fn login(&self, username: &str, password: &str) -> LoginOutcome {
        self.session.login(&self.api, username, password).await
    }

    /// Signs out.
    pub fn logout(&self) {
        self.session.logout();
    }

    /// Runs the route guard for `path` against the live session.
    #[must_use]
    pub fn navigate(&self, path: &str) -> Navigation {
        let route = Route::from_path(path);
        let decision = guard(route, self.session.is_authenticated());
        debug!(path, ?decision, "navigation");
        decision
    }

    /// Controller for `/dashboard`.
    #[must_use]
    pub fn dashboard(&self) -> DashboardPage {
        DashboardPage::new(self.api.clone(), self.session.clone())
    }

    /// Controller for `/users`.
    #[must_use]
    pub fn users(&self) -> UsersPage {
        UsersPage::new(self.api.clone())
    }

    /// Controller for `/reports`.
    #[must_use]
    pub fn reports(&self) -> ReportsPage {
        ReportsPage::new(self.api.clone())
    }
}
