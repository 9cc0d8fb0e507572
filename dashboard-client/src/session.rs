//! Client-held authentication state.
//!
//! One [`Session`] is created by the application root and handed by
//! reference to whatever needs it. It is also injected into the
//! [`ApiClient`] as both credential provider and 401 handler, so the wrapper
//! never looks the session up on its own.
//!
//! STATE MACHINE
//! =============
//! `Anonymous --login ok--> Authenticating --profile ok--> Authenticated`
//! `Authenticating --profile failed--> Anonymous`
//! `Authenticated --logout / any 401--> Anonymous`
//!
//! ORDERING
//! ========
//! A generation counter is bumped whenever a token is installed or the
//! session is cleared. Profile responses carry the generation they were
//! requested under and are dropped if it has moved on, so a late success can
//! never re-authenticate a session that was logged out meanwhile.

use std::{
    fmt,
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicU64, Ordering},
    },
};

use shared::models::{LoginRequest, User};
use tracing::{debug, info, warn};

use crate::{
    api::{ApiClient, AuthFailureHandler, CredentialProvider},
    error::ApiError,
    storage::TokenStore,
};

/// Shown after the login endpoint rejects the credentials for any reason.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid username or password.";

/// Shown when a token was issued but the profile behind it could not be read.
pub const PROFILE_UNAVAILABLE_MESSAGE: &str = "Unable to load your profile.";

/// Where the session sits in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No token held.
    Anonymous,
    /// Token issued, profile not yet confirmed.
    Authenticating,
    /// Token held and accepted.
    Authenticated,
}

/// Point-in-time copy of the session state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Bearer token, if any.
    pub token: Option<String>,
    /// Equals `token.is_some()` outside of an in-flight login.
    pub is_authenticated: bool,
    /// Profile of the signed-in user once fetched.
    pub current_user: Option<User>,
    /// Last user-facing login error.
    pub last_error: Option<String>,
    /// A login call is in flight.
    pub login_in_progress: bool,
}

impl SessionSnapshot {
    /// Lifecycle phase derived from the token and flag.
    #[must_use]
    pub const fn phase(&self) -> SessionPhase {
        match (&self.token, self.is_authenticated) {
            (None, _) => SessionPhase::Anonymous,
            (Some(_), false) => SessionPhase::Authenticating,
            (Some(_), true) => SessionPhase::Authenticated,
        }
    }
}

/// Result of [`Session::login`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Token issued and profile loaded.
    Authenticated(User),
    /// The login endpoint refused; `last_error` is set.
    InvalidCredentials,
    /// Token issued but the profile fetch failed; the session was cleared.
    ProfileUnavailable,
    /// A logout landed while the profile was in flight.
    Interrupted,
    /// Already signed in; nothing was sent.
    AlreadyAuthenticated,
    /// Another login is still running; nothing was sent.
    InProgress,
}

impl LoginOutcome {
    /// `true` only when the session ended authenticated.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }
}

struct SessionInner {
    state: Mutex<SessionSnapshot>,
    generation: AtomicU64,
    tokens: Arc<dyn TokenStore>,
}

/// Shared handle to the session; clones observe the same state.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("Session")
            .field("phase", &state.phase())
            .field("user", &state.current_user.as_ref().map(|u| &u.username))
            .field("login_in_progress", &state.login_in_progress)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Restores the session from `tokens`.
    ///
    /// A persisted token restores an authenticated session whose profile is
    /// not yet known. An unreadable store starts anonymous.
    pub fn restore(tokens: Arc<dyn TokenStore>) -> Self {
        let token = tokens.load().unwrap_or_else(|err| {
            warn!(error = %err, "could not read persisted token; starting signed out");
            None
        });
        if token.is_some() {
            debug!("restored persisted session token");
        }

        let state = SessionSnapshot {
            is_authenticated: token.is_some(),
            token,
            ..SessionSnapshot::default()
        };

        Self {
            inner: Arc::new(SessionInner {
                state: Mutex::new(state),
                generation: AtomicU64::new(0),
                tokens,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionSnapshot> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn is_current(&self, generation: u64) -> bool {
        self.inner.generation.load(Ordering::SeqCst) == generation
    }

    /// Copy of the full state.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.lock().clone()
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.lock().phase()
    }

    /// `true` once authenticated and until logout.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.lock().is_authenticated
    }

    /// Current bearer token.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.lock().token.clone()
    }

    /// Profile of the signed-in user, once fetched.
    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.lock().current_user.clone()
    }

    /// Last user-facing login error.
    #[must_use]
    pub fn last_error(&self) -> Option<String> {
        self.lock().last_error.clone()
    }

    /// Signs in with `username` and `password`.
    ///
    /// Rejected without a request when already signed in or while another
    /// login runs. Never retries.
    pub async fn login(&self, api: &ApiClient, username: &str, password: &str) -> LoginOutcome {
        {
            let mut state = self.lock();
            if state.login_in_progress {
                return LoginOutcome::InProgress;
            }
            if state.token.is_some() {
                return LoginOutcome::AlreadyAuthenticated;
            }
            state.login_in_progress = true;
            state.last_error = None;
        }

        debug!(username, "signing in");
        let token = match api.login(&LoginRequest::new(username, password)).await {
            Ok(response) => response.token,
            Err(err) => {
                debug!(error = %err, "login rejected");
                let mut state = self.lock();
                state.last_error = Some(INVALID_CREDENTIALS_MESSAGE.to_string());
                state.login_in_progress = false;
                return LoginOutcome::InvalidCredentials;
            }
        };

        let generation = self.install_token(token);
        let outcome = match api.current_user().await {
            Ok(user) => {
                let mut state = self.lock();
                if self.is_current(generation) && state.token.is_some() {
                    info!(username = %user.username, "signed in");
                    state.is_authenticated = true;
                    state.current_user = Some(user.clone());
                    LoginOutcome::Authenticated(user)
                } else {
                    debug!("session cleared while the profile was loading");
                    LoginOutcome::Interrupted
                }
            }
            // A 401 has already cleared the session through the auth handler.
            Err(err) if !err.is_unauthorized() && !self.is_current(generation) => {
                debug!(error = %err, "session cleared while the profile was loading");
                LoginOutcome::Interrupted
            }
            Err(err) => {
                warn!(error = %err, "failed to fetch user details");
                if self.is_current(generation) {
                    self.logout();
                }
                self.lock().last_error = Some(PROFILE_UNAVAILABLE_MESSAGE.to_string());
                LoginOutcome::ProfileUnavailable
            }
        };

        self.lock().login_in_progress = false;
        outcome
    }

    /// Clears the token everywhere. Safe to call when already signed out.
    pub fn logout(&self) {
        let mut state = self.lock();
        if let Err(err) = self.inner.tokens.clear() {
            warn!(error = %err, "failed to clear persisted token");
        }
        self.inner.generation.fetch_add(1, Ordering::SeqCst);

        if state.token.is_some() {
            info!("signed out");
        }
        state.token = None;
        state.is_authenticated = false;
        state.current_user = None;
    }

    /// Loads the profile for the held token.
    ///
    /// Does nothing when signed out. Any failure ends the session; a success
    /// that arrives after the session moved on is discarded.
    pub async fn fetch_current_user(&self, api: &ApiClient) -> Option<User> {
        let generation = {
            let state = self.lock();
            state.token.as_ref()?;
            self.inner.generation.load(Ordering::SeqCst)
        };

        let user = self.load_profile(api, generation).await.ok()?;
        let mut state = self.lock();
        if self.is_current(generation) && state.token.is_some() {
            state.current_user = Some(user.clone());
            Some(user)
        } else {
            debug!("discarding profile fetched for a superseded session");
            None
        }
    }

    fn install_token(&self, token: String) -> u64 {
        let mut state = self.lock();
        if let Err(err) = self.inner.tokens.save(&token) {
            warn!(error = %err, "failed to persist session token; keeping it in memory only");
        }
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        state.token = Some(token);
        state.is_authenticated = false;
        state.current_user = None;
        generation
    }

    async fn load_profile(&self, api: &ApiClient, generation: u64) -> Result<User, ApiError> {
        match api.current_user().await {
            Ok(user) => Ok(user),
            Err(err) => {
                warn!(error = %err, "failed to fetch user details");
                if self.is_current(generation) {
                    self.logout();
                }
                Err(err)
            }
        }
    }
}

impl CredentialProvider for Session {
    fn token(&self) -> Option<String> {
        Session::token(self)
    }
}

impl AuthFailureHandler for Session {
    fn on_auth_failure(&self) {
        self.logout();
    }
}
