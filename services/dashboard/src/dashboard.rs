//! services/dashboard/src/dashboard.rs
//!
//! Wires the adapter and the stores together into one handle the front end holds.

use admin_dashboard_core::auth::AuthState;
use admin_dashboard_core::domain::Session;
use admin_dashboard_core::guard::{guard, GuardDecision};
use admin_dashboard_core::ports::AdminApi;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::adapters::HttpAdminApi;
use crate::config::Config;
use crate::error::DashboardError;
use crate::notify::Notifier;
use crate::stores::{AuthStore, ProductsStore, UsersStore};

#[derive(Clone)]
pub struct Dashboard {
    pub auth: AuthStore,
    pub products: ProductsStore,
    pub users: UsersStore,
    pub notifier: Notifier,
}

impl Dashboard {
    /// Builds the HTTP adapter from `config` and resumes `config.token` if one is set.
    pub fn connect(config: &Config) -> Result<Self, DashboardError> {
        let initial = match &config.token {
            Some(token) => {
                info!("Resuming session from stored token");
                AuthState::resumed(Session::from_token(token.clone()))
            }
            None => AuthState::default(),
        };
        let session = Arc::new(watch::Sender::new(initial));
        let api = HttpAdminApi::new(config, session.subscribe())?;
        info!(base_url = %config.api_base_url, "Admin API client ready");
        Ok(Self::from_parts(Arc::new(api), session))
    }

    /// Assembles the stores around any `AdminApi`. `session` is the auth state channel
    /// the adapter reads its token from.
    pub fn from_parts(api: Arc<dyn AdminApi>, session: Arc<watch::Sender<AuthState>>) -> Self {
        let notifier = Notifier::new();
        let auth = AuthStore::new(api.clone(), session, notifier.clone());
        Self {
            products: ProductsStore::new(api.clone(), auth.clone(), notifier.clone()),
            users: UsersStore::new(api, auth.clone(), notifier.clone()),
            auth,
            notifier,
        }
    }

    /// Checks the current session before a protected view is shown.
    pub fn guard(&self, path: &str) -> Result<(), DashboardError> {
        match guard(&self.auth.state(), path) {
            GuardDecision::Allow => Ok(()),
            GuardDecision::RedirectToLogin { from } => {
                debug!(%from, "Redirecting to login");
                Err(DashboardError::Unauthenticated { from })
            }
        }
    }

    /// Cancels in-flight requests in every resource store, as when a view unmounts.
    pub fn cancel_pending(&self) {
        self.products.cancel_pending();
        self.users.cancel_pending();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{product_json, session_json, FakeApi};
    use admin_dashboard_core::ports::PortError;
    use serde_json::json;

    fn dashboard(api: Arc<FakeApi>) -> Dashboard {
        Dashboard::from_parts(api, Arc::new(watch::Sender::new(AuthState::default())))
    }

    #[tokio::test]
    async fn guard_follows_the_session() {
        let api = Arc::new(FakeApi::default());
        api.reply("login", Ok(session_json("tok-1")));
        api.reply("logout", Ok(json!(null)));
        let dash = dashboard(api);

        match dash.guard("/products") {
            Err(DashboardError::Unauthenticated { from }) => assert_eq!(from, "/products"),
            other => panic!("expected redirect, got {:?}", other.map(|_| ())),
        }

        dash.auth.login("op@example.com", "secret1").await.unwrap();
        assert!(dash.guard("/products").is_ok());

        dash.auth.logout().await;
        assert!(dash.guard("/users").is_err());
    }

    #[tokio::test]
    async fn expired_token_locks_every_view() {
        let api = Arc::new(FakeApi::default());
        api.reply("login", Ok(session_json("tok-1")));
        api.reply("list_products", Ok(json!([product_json("1", "Bust A")])));
        api.reply("list_users", Err(PortError::server(401, "Token expired")));
        let dash = dashboard(api);

        dash.auth.login("op@example.com", "secret1").await.unwrap();
        dash.products.fetch_all().await.unwrap();
        dash.users.fetch_all().await.unwrap_err();

        assert!(dash.guard("/dashboard").is_err());
        assert_eq!(dash.products.state().items.len(), 1);
    }

    #[test]
    fn connect_resumes_configured_token() {
        let config = Config::from_lookup(|key| match key {
            "ADMIN_TOKEN" => Some("tok-env".to_string()),
            _ => None,
        })
        .unwrap();

        let dash = Dashboard::connect(&config).unwrap();
        assert_eq!(dash.auth.state().token(), Some("tok-env"));
        assert!(dash.guard("/products").is_ok());
    }
}
