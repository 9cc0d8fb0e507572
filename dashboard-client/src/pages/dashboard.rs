use std::sync::{Mutex, PoisonError};

use shared::models::DashboardStats;
use tracing::warn;

use super::PLACEHOLDER;
use crate::{api::ApiClient, session::Session};

/// Overview counters and greeting.
#[derive(Debug)]
pub struct DashboardPage {
    api: ApiClient,
    session: Session,
    stats: Mutex<Option<DashboardStats>>,
}

impl DashboardPage {
    /// Page bound to `api` and `session`; call [`Self::load`] to populate.
    #[must_use]
    pub fn new(api: ApiClient, session: Session) -> Self {
        Self {
            api,
            session,
            stats: Mutex::new(None),
        }
    }

    /// Loads the counters. A failure is logged and leaves them absent.
    pub async fn load(&self) -> Option<DashboardStats> {
        match self.api.dashboard_stats().await {
            Ok(stats) => {
                *self.stats.lock().unwrap_or_else(PoisonError::into_inner) = Some(stats);
                Some(stats)
            }
            Err(err) => {
                warn!(error = %err, "failed to fetch dashboard stats");
                None
            }
        }
    }

    /// Last loaded counters.
    #[must_use]
    pub fn stats(&self) -> Option<DashboardStats> {
        *self.stats.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// `"Welcome back, {username}!"`, with a placeholder until the profile loads.
    #[must_use]
    pub fn greeting(&self) -> String {
        let name = self
            .session
            .current_user()
            .map_or_else(|| PLACEHOLDER.to_string(), |user| user.username);
        format!("Welcome back, {name}!")
    }

    /// Labelled counters in display order; placeholders while absent.
    #[must_use]
    pub fn cards(&self) -> [(&'static str, String); 3] {
        let stats = self.stats();
        let show = |value: fn(&DashboardStats) -> u64| {
            stats
                .as_ref()
                .map_or_else(|| PLACEHOLDER.to_string(), |s| value(s).to_string())
        };
        [
            ("Total Users", show(|s| s.total_users)),
            ("Today Messages", show(|s| s.today_messages)),
            ("Month Messages", show(|s| s.month_messages)),
        ]
    }
}
