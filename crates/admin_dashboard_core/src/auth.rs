//! crates/admin_dashboard_core/src/auth.rs
//!
//! The auth session state and its reducer. Every transition of the session goes
//! through `AuthState::apply`; the async side lives in the service crate.

use crate::domain::Session;
use crate::validation::FieldErrors;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthPhase {
    #[default]
    Anonymous,
    Pending,
    Authenticated,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    pub phase: AuthPhase,
    pub session: Option<Session>,
    pub error: Option<String>,
    pub field_errors: FieldErrors,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AuthAction {
    /// A login or register request was dispatched.
    Pending,
    LoggedIn(Session),
    /// Registration succeeded. The operator still has to log in.
    Registered,
    Rejected(String),
    ValidationFailed(FieldErrors),
    LoggedOut,
    /// The backend refused the token.
    Expired,
}

impl AuthState {
    /// Resumes a session from a previously issued token.
    pub fn resumed(session: Session) -> Self {
        Self {
            phase: AuthPhase::Authenticated,
            session: Some(session),
            ..Self::default()
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.token.as_str())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.phase == AuthPhase::Pending
    }

    pub fn apply(&mut self, action: AuthAction) {
        match action {
            AuthAction::Pending => {
                self.phase = AuthPhase::Pending;
                self.error = None;
                self.field_errors = FieldErrors::new();
            }
            AuthAction::LoggedIn(session) => {
                self.phase = AuthPhase::Authenticated;
                self.session = Some(session);
                self.error = None;
            }
            AuthAction::Registered => {
                self.phase = AuthPhase::Anonymous;
                self.session = None;
                self.error = None;
            }
            AuthAction::Rejected(message) => {
                self.phase = AuthPhase::Anonymous;
                self.session = None;
                self.error = Some(message);
            }
            AuthAction::ValidationFailed(errors) => {
                self.field_errors = errors;
                self.error = None;
            }
            AuthAction::LoggedOut => {
                *self = AuthState::default();
            }
            AuthAction::Expired => {
                *self = AuthState {
                    error: Some("Session expired. Please log in again.".to_string()),
                    ..AuthState::default()
                };
            }
        }
    }
}
