//! # client
//!
//! Client core of the admin dashboard: a token session, an HTTP wrapper that
//! authorises every request and reports 401s back to the session, a
//! paginated list fetcher shared by the Users and Reports pages, and the
//! route guard that decides which view may render.
//!
//! The [`app::App`] root owns one [`session::Session`] and one
//! [`api::ApiClient`]; everything else borrows them.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod app;
pub mod error;
pub mod pages;
pub mod pagination;
pub mod routes;
pub mod session;
pub mod storage;

pub use api::{ApiClient, AuthFailureHandler, CredentialProvider};
pub use app::App;
pub use error::ApiError;
pub use session::{LoginOutcome, Session, SessionPhase, SessionSnapshot};
