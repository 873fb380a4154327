//! crates/admin_dashboard_core/src/guard.rs
//!
//! Gate for protected views: pass when a session token is present, otherwise send
//! the operator to the login screen and remember where they were headed.

use crate::auth::AuthState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    RedirectToLogin { from: String },
}

impl GuardDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardDecision::Allow)
    }
}

pub fn guard(auth: &AuthState, requested_path: &str) -> GuardDecision {
    if auth.is_authenticated() {
        GuardDecision::Allow
    } else {
        GuardDecision::RedirectToLogin {
            from: requested_path.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthAction;
    use crate::domain::{AuthUser, Session};

    #[test]
    fn anonymous_is_redirected_with_origin() {
        let decision = guard(&AuthState::default(), "/products");
        assert_eq!(
            decision,
            GuardDecision::RedirectToLogin {
                from: "/products".into()
            }
        );
        assert!(!decision.is_allowed());
    }

    #[test]
    fn pending_login_is_still_redirected() {
        let mut state = AuthState::default();
        state.apply(AuthAction::Pending);
        assert!(!guard(&state, "/users").is_allowed());
    }

    #[test]
    fn session_is_allowed() {
        let state = AuthState::resumed(Session {
            user: AuthUser {
                id: "1".into(),
                name: "Op".into(),
                email: "op@example.com".into(),
            },
            token: "t".into(),
        });
        assert_eq!(guard(&state, "/users"), GuardDecision::Allow);
    }
}
