//! Shared error types and configuration for Nexvest.
//!
//! This crate provides common pieces used across all other crates:
//! - Application-wide error types with API error codes
//! - Configuration management

pub mod config;
pub mod error;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
