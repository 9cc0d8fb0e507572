//! # Configuration
//!
//! Client configuration: API location, logging, and where the session token
//! is persisted.

pub mod client;

pub use client::{ClientConfig, ConfigError, ConfigFormat, LogFormat};
