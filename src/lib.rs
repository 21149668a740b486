//! Generic Rust backend template.
//!
//! A single HTTP application with health-check, echo and placeholder
//! endpoints. No persistence, no authentication, no business rules: the
//! routes return static or echoed data and the lifecycle hooks mark where
//! real logic would go.
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Error types and their JSON responses
//! - [`api`]: Routes, handlers, CORS and OpenAPI docs
//! - [`lifecycle`]: Startup/shutdown hooks
//! - [`metrics`]: Request metrics and Prometheus exporter
//! - [`utils`]: Utility functions

pub mod api;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod metrics;
pub mod utils;

pub use config::Config;
pub use error::{AppError, Result, StartupError};
