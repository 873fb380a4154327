//! services/dashboard/src/error.rs
//!
//! Defines the primary error type for the dashboard service.

use crate::config::ConfigError;
use admin_dashboard_core::ports::PortError;

/// The primary error type for the `dashboard` service.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from the admin API port.
    #[error("{0}")]
    Port(#[from] PortError),

    /// Represents an error building the underlying HTTP client.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// A protected view was requested without a session.
    #[error("Not signed in; redirecting to login (requested {from})")]
    Unauthenticated { from: String },

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}
