//! crates/admin_dashboard_core/src/ports.rs
//!
//! Defines the contract between the dashboard's state layer and the REST backend.
//! The stores only ever talk to `AdminApi`, so the HTTP adapter can be swapped for
//! a scripted fake in tests.

use async_trait::async_trait;
use std::collections::BTreeMap;

use crate::domain::{
    Credentials, Product, ProductDraft, Registration, Role, Session, User, UserStatus,
};
use crate::validation::FieldErrors;

//=========================================================================================
// Port Error and Result Types
//=========================================================================================

/// The closed set of failures a dashboard operation can end in.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PortError {
    /// No response was received (connection refused, DNS, TLS, reset).
    #[error("Network error: {0}")]
    Network(String),

    /// Rejected locally before any request was issued.
    #[error("{field}: {message}")]
    Validation { field: String, message: String },

    /// The backend answered with a non-2xx status.
    #[error("Server responded with status {status}{}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    Server {
        status: u16,
        message: Option<String>,
        field_errors: BTreeMap<String, Vec<String>>,
    },

    /// A 2xx body that did not have the expected shape.
    #[error("Could not decode response: {0}")]
    Decode(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Request cancelled")]
    Cancelled,
}

impl PortError {
    /// Builds a `Server` error with only a status and message.
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        PortError::Server {
            status,
            message: Some(message.into()),
            field_errors: BTreeMap::new(),
        }
    }

    /// The text shown to the operator: the server's or validator's message if there
    /// is one, otherwise the per-operation `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            PortError::Server {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            PortError::Validation { message, .. } => message.clone(),
            _ => fallback.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            PortError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the backend rejected the session token.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

impl From<FieldErrors> for PortError {
    fn from(errors: FieldErrors) -> Self {
        match errors.first() {
            Some((field, message)) => PortError::Validation {
                field: field.to_string(),
                message: message.to_string(),
            },
            None => PortError::Validation {
                field: String::new(),
                message: "Invalid input".to_string(),
            },
        }
    }
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Port
//=========================================================================================

#[async_trait]
pub trait AdminApi: Send + Sync {
    // --- Auth ---
    async fn login(&self, credentials: &Credentials) -> PortResult<Session>;

    async fn register(&self, registration: &Registration) -> PortResult<()>;

    async fn logout(&self) -> PortResult<()>;

    // --- Products ---
    async fn list_products(&self) -> PortResult<Vec<Product>>;

    async fn create_product(&self, draft: &ProductDraft) -> PortResult<Product>;

    async fn update_product(&self, id: &str, draft: &ProductDraft) -> PortResult<Product>;

    async fn delete_product(&self, id: &str) -> PortResult<()>;

    // --- Users ---
    async fn list_users(&self) -> PortResult<Vec<User>>;

    async fn update_user_status(&self, id: &str, status: UserStatus) -> PortResult<User>;

    async fn update_user_role(&self, id: &str, role: Role) -> PortResult<User>;
}
