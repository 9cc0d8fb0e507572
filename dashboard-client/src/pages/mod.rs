//! Controllers behind each authenticated view.

pub mod dashboard;
pub mod reports;
pub mod users;

pub use dashboard::DashboardPage;
pub use reports::{ComposeError, DeleteError, MessageSource, ReportsPage};
pub use users::{UserSource, UsersPage};

/// Shown wherever a value has not loaded yet.
pub const PLACEHOLDER: &str = "...";
