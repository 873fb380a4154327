//! services/dashboard/src/stores/users.rs
//!
//! The users store: lists managed accounts and changes their status and role.

use admin_dashboard_core::domain::{Role, User, UserStatus};
use admin_dashboard_core::ports::{AdminApi, PortError, PortResult};
use admin_dashboard_core::resource::{RequestKind, ResourceAction, ResourceState};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, instrument};

use crate::notify::Notifier;
use crate::stores::auth::AuthStore;
use crate::stores::resource::ResourceStore;

const FETCH_FAILED: &str = "Failed to fetch users";
const STATUS_FAILED: &str = "Failed to update user status";
const ROLE_FAILED: &str = "Failed to update user role";

#[derive(Clone)]
pub struct UsersStore {
    inner: ResourceStore<User>,
    api: Arc<dyn AdminApi>,
}

impl UsersStore {
    pub fn new(api: Arc<dyn AdminApi>, session: AuthStore, notifier: Notifier) -> Self {
        Self {
            inner: ResourceStore::new(session, notifier),
            api,
        }
    }

    pub fn state(&self) -> ResourceState<User> {
        self.inner.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<ResourceState<User>> {
        self.inner.subscribe()
    }

    pub fn cancel_pending(&self) {
        self.inner.cancel_pending();
    }

    #[instrument(skip(self))]
    pub async fn fetch_all(&self) -> PortResult<Vec<User>> {
        let users = self
            .inner
            .execute(
                RequestKind::Fetch,
                FETCH_FAILED,
                self.api.list_users(),
                |seq, users: &Vec<User>| ResourceAction::Fetched(seq, users.clone()),
            )
            .await?;
        info!(count = users.len(), "Users loaded");
        Ok(users)
    }

    #[instrument(skip(self))]
    pub async fn update_status(&self, id: &str, status: UserStatus) -> PortResult<User> {
        let user = self
            .inner
            .execute(
                RequestKind::Mutation,
                STATUS_FAILED,
                self.api.update_user_status(id, status),
                |seq, user: &User| ResourceAction::Updated(seq, user.clone()),
            )
            .await?;
        info!(status = %user.status, "User status updated");
        self.inner.notifier().success("User status updated successfully");
        Ok(user)
    }

    #[instrument(skip(self))]
    pub async fn update_role(&self, id: &str, role: Role) -> PortResult<User> {
        let user = self
            .inner
            .execute(
                RequestKind::Mutation,
                ROLE_FAILED,
                self.api.update_user_role(id, role),
                |seq, user: &User| ResourceAction::Updated(seq, user.clone()),
            )
            .await?;
        info!(role = %user.role, "User role updated");
        self.inner.notifier().success("User role updated successfully");
        Ok(user)
    }

    /// Flips a loaded user between active and inactive.
    pub async fn toggle_status(&self, id: &str) -> PortResult<User> {
        let current = self
            .state()
            .find(&id.to_string())
            .map(|user| user.status)
            .ok_or_else(|| PortError::server(404, format!("User {} is not loaded", id)))?;
        self.update_status(id, current.toggled()).await
    }

    pub fn select(&self, id: &str) -> Option<User> {
        self.inner.select(&id.to_string())
    }

    pub fn clear_selection(&self) {
        self.inner.clear_selection();
    }
}
