//! Core building blocks shared by every command
//!
//! - **config**: `dropgen.toml` parsing and validation
//! - **context**: config and snapshot loaded once per invocation
//! - **error**: error types with contextual help messages and exit codes

pub mod config;
pub mod context;
pub mod error;
