//! services/dashboard/src/stores/auth.rs
//!
//! The auth session store: async login/register/logout on top of the
//! `AuthState` reducer.

use admin_dashboard_core::auth::{AuthAction, AuthState};
use admin_dashboard_core::domain::{Credentials, Registration, Session};
use admin_dashboard_core::ports::{AdminApi, PortResult};
use admin_dashboard_core::validation::{validate_login, validate_registration};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use crate::notify::Notifier;

const LOGIN_FAILED: &str = "Login failed. Please check your credentials.";
const REGISTER_FAILED: &str = "Registration failed. Please try again.";

#[derive(Clone)]
pub struct AuthStore {
    state: Arc<watch::Sender<AuthState>>,
    api: Arc<dyn AdminApi>,
    notifier: Notifier,
}

impl AuthStore {
    /// `state` is shared with whoever needs the token, usually the HTTP adapter.
    pub fn new(api: Arc<dyn AdminApi>, state: Arc<watch::Sender<AuthState>>, notifier: Notifier) -> Self {
        Self {
            state,
            api,
            notifier,
        }
    }

    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    fn dispatch(&self, action: AuthAction) {
        self.state.send_modify(|state| state.apply(action));
    }

    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> PortResult<Session> {
        if let Err(errors) = validate_login(email, password) {
            debug!(fields = errors.len(), "Login rejected by local validation");
            self.dispatch(AuthAction::ValidationFailed(errors.clone()));
            return Err(errors.into());
        }

        self.dispatch(AuthAction::Pending);
        let credentials = Credentials {
            email: email.to_string(),
            password: password.to_string(),
        };
        match self.api.login(&credentials).await {
            Ok(session) => {
                info!(user_id = %session.user.id, "Login successful");
                self.dispatch(AuthAction::LoggedIn(session.clone()));
                self.notifier.success("Login successful");
                Ok(session)
            }
            Err(e) => {
                let message = e.user_message(LOGIN_FAILED);
                warn!(error = %e, "Login failed");
                self.dispatch(AuthAction::Rejected(message.clone()));
                self.notifier.error(message);
                Err(e)
            }
        }
    }

    #[instrument(skip(self, password, confirm_password))]
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> PortResult<()> {
        if let Err(errors) = validate_registration(name, email, password, confirm_password) {
            debug!(fields = errors.len(), "Registration rejected by local validation");
            self.dispatch(AuthAction::ValidationFailed(errors.clone()));
            return Err(errors.into());
        }

        self.dispatch(AuthAction::Pending);
        let registration = Registration {
            name: name.trim().to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        match self.api.register(&registration).await {
            Ok(()) => {
                info!("Registration successful");
                self.dispatch(AuthAction::Registered);
                self.notifier.success("Registration successful! Please log in.");
                Ok(())
            }
            Err(e) => {
                let message = e.user_message(REGISTER_FAILED);
                warn!(error = %e, "Registration failed");
                self.dispatch(AuthAction::Rejected(message.clone()));
                self.notifier.error(message);
                Err(e)
            }
        }
    }

    /// Ends the session. The local session is cleared whatever the server says.
    #[instrument(skip(self))]
    pub async fn logout(&self) {
        if let Err(e) = self.api.logout().await {
            warn!(error = %e, "Server-side logout failed, clearing session anyway");
        }
        self.dispatch(AuthAction::LoggedOut);
        info!("Logged out");
    }

    /// Drops the session if it still holds `rejected_token`. A 401 for a token that
    /// has since been replaced by a new login leaves the new session alone.
    pub fn expire(&self, rejected_token: &str) {
        let expired = self.state.send_if_modified(|state| {
            if state.token() == Some(rejected_token) {
                state.apply(AuthAction::Expired);
                true
            } else {
                false
            }
        });
        if !expired {
            debug!("Ignoring 401 for a token that is no longer current");
            return;
        }
        warn!("Session token rejected by the backend");
        self.notifier
            .notify("Session expired. Please log in again.", crate::notify::Severity::Warning);
    }
}
