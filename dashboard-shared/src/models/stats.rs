use serde::{Deserialize, Serialize};

/// Aggregate counters from `/dashboard-stats/`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Number of registered users.
    pub total_users: u64,
    /// Messages posted since midnight.
    pub today_messages: u64,
    /// Messages posted this calendar month.
    pub month_messages: u64,
}
