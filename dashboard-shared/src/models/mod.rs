//! Request and response shapes exchanged with the dashboard REST API.

pub mod auth;
pub mod errors;
pub mod message;
pub mod page;
pub mod stats;
pub mod user;

pub use auth::{LoginRequest, LoginResponse};
pub use errors::ErrorResponse;
pub use message::{CreateMessageRequest, FILTER_DATE_FORMAT, Message, MessageFilters};
pub use page::{PageResult, Paginated};
pub use stats::DashboardStats;
pub use user::User;
