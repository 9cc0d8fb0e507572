//! Wire models and configuration shared by the dashboard client library and CLI.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod models;
