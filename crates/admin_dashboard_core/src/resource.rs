//! crates/admin_dashboard_core/src/resource.rs
//!
//! Generic collection state shared by the products and users stores, plus the
//! reducer that applies request outcomes to it.

use std::fmt::{Debug, Display};

use crate::domain::{Product, User};

//=========================================================================================
// Entity
//=========================================================================================

/// Anything a resource store can hold.
pub trait Entity: Clone + Debug + Send + Sync + 'static {
    type Id: PartialEq + Clone + Debug + Display + Send + Sync;

    /// Collection name used in logs ("products", "users").
    const KIND: &'static str;

    fn id(&self) -> &Self::Id;
}

impl Entity for Product {
    type Id = String;
    const KIND: &'static str = "products";

    fn id(&self) -> &String {
        &self.id
    }
}

impl Entity for User {
    type Id = String;
    const KIND: &'static str = "users";

    fn id(&self) -> &String {
        &self.id
    }
}

//=========================================================================================
// Request sequencing
//=========================================================================================

/// Monotonic per-store ticket stamped on every dispatched request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct RequestSeq(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Fetch,
    Mutation,
}

//=========================================================================================
// State and actions
//=========================================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ResourceState<T: Entity> {
    pub items: Vec<T>,
    pub selected: Option<T>,
    pub is_loading: bool,
    pub error: Option<String>,
    last_dispatched: RequestSeq,
    last_fetch: RequestSeq,
}

impl<T: Entity> Default for ResourceState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            selected: None,
            is_loading: false,
            error: None,
            last_dispatched: RequestSeq::default(),
            last_fetch: RequestSeq::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum ResourceAction<T: Entity> {
    Pending(RequestSeq, RequestKind),
    Fetched(RequestSeq, Vec<T>),
    Created(RequestSeq, T),
    Updated(RequestSeq, T),
    Deleted(RequestSeq, T::Id),
    Rejected(RequestSeq, RequestKind, String),
    Cancelled(RequestSeq),
    Select(Option<T>),
}

/// What the reducer did with an action, for logging at the dispatch site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Applied,
    /// A fetch outcome, success or failure, older than the newest dispatched fetch.
    Stale,
}

impl<T: Entity> ResourceState<T> {
    /// Allocates the ticket for a new request. The caller dispatches `Pending` with it.
    pub fn next_seq(&self) -> RequestSeq {
        RequestSeq(self.last_dispatched.0 + 1)
    }

    pub fn find(&self, id: &T::Id) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn apply(&mut self, action: ResourceAction<T>) -> Applied {
        match action {
            ResourceAction::Pending(seq, kind) => {
                self.last_dispatched = self.last_dispatched.max(seq);
                if kind == RequestKind::Fetch {
                    self.last_fetch = self.last_fetch.max(seq);
                }
                self.is_loading = true;
                self.error = None;
                Applied::Applied
            }
            ResourceAction::Fetched(seq, items) => {
                if seq < self.last_fetch {
                    self.settle(seq);
                    return Applied::Stale;
                }
                self.items = items;
                if let Some(selected) = self.selected.take() {
                    self.selected = self.find(selected.id()).cloned();
                }
                self.settle(seq);
                Applied::Applied
            }
            ResourceAction::Created(seq, item) => {
                self.items.push(item);
                self.settle(seq);
                Applied::Applied
            }
            ResourceAction::Updated(seq, item) => {
                if let Some(slot) = self.items.iter_mut().find(|i| i.id() == item.id()) {
                    *slot = item.clone();
                }
                if let Some(selected) = self.selected.as_mut() {
                    if selected.id() == item.id() {
                        *selected = item;
                    }
                }
                self.settle(seq);
                Applied::Applied
            }
            ResourceAction::Deleted(seq, id) => {
                self.items.retain(|item| item.id() != &id);
                if self.selected.as_ref().is_some_and(|s| s.id() == &id) {
                    self.selected = None;
                }
                self.settle(seq);
                Applied::Applied
            }
            ResourceAction::Rejected(seq, kind, message) => {
                if kind == RequestKind::Fetch && seq < self.last_fetch {
                    self.settle(seq);
                    return Applied::Stale;
                }
                self.error = Some(message);
                self.settle(seq);
                Applied::Applied
            }
            ResourceAction::Cancelled(seq) => {
                self.settle(seq);
                Applied::Applied
            }
            ResourceAction::Select(selected) => {
                self.selected = selected;
                Applied::Applied
            }
        }
    }

    // Loading ends only when the most recently dispatched request resolves.
    fn settle(&mut self, seq: RequestSeq) {
        if seq >= self.last_dispatched {
            self.is_loading = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ProductCategory, Role, UserStatus};
    use chrono::{TimeZone, Utc};

    fn product(id: &str, name: &str) -> Product {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Product {
            id: id.into(),
            name: name.into(),
            description: "desc".into(),
            price: 120.0,
            stock: 3,
            category: ProductCategory::Busts,
            image_url: String::new(),
            created_at: at,
            updated_at: at,
        }
    }

    fn dispatch(state: &mut ResourceState<Product>, kind: RequestKind) -> RequestSeq {
        let seq = state.next_seq();
        state.apply(ResourceAction::Pending(seq, kind));
        seq
    }

    #[test]
    fn fetch_lifecycle() {
        let mut state = ResourceState::<Product>::default();
        let seq = dispatch(&mut state, RequestKind::Fetch);
        assert!(state.is_loading);
        assert!(state.error.is_none());

        let items = vec![product("1", "Bust A")];
        state.apply(ResourceAction::Fetched(seq, items.clone()));
        assert_eq!(state.items, items);
        assert!(!state.is_loading);
        assert!(state.error.is_none());
    }

    #[test]
    fn rejection_leaves_items_untouched() {
        let mut state = ResourceState::<Product>::default();
        let seq = dispatch(&mut state, RequestKind::Fetch);
        state.apply(ResourceAction::Fetched(seq, vec![product("1", "Bust A")]));

        let seq = dispatch(&mut state, RequestKind::Mutation);
        state.apply(ResourceAction::Rejected(
            seq,
            RequestKind::Mutation,
            "duplicate name".into(),
        ));
        assert_eq!(state.items.len(), 1);
        assert_eq!(state.error.as_deref(), Some("duplicate name"));
        assert!(!state.is_loading);
    }

    #[test]
    fn update_replaces_only_matching_id() {
        let mut state = ResourceState::<Product>::default();
        let seq = dispatch(&mut state, RequestKind::Fetch);
        state.apply(ResourceAction::Fetched(
            seq,
            vec![product("1", "Bust A"), product("2", "Statue B")],
        ));
        let untouched = state.items[1].clone();

        let seq = dispatch(&mut state, RequestKind::Mutation);
        state.apply(ResourceAction::Updated(seq, product("1", "Bust A v2")));
        assert_eq!(state.items[0].name, "Bust A v2");
        assert_eq!(state.items[1], untouched);

        // Unknown id is a no-op.
        let seq = dispatch(&mut state, RequestKind::Mutation);
        state.apply(ResourceAction::Updated(seq, product("9", "Ghost")));
        assert_eq!(state.items.len(), 2);
        assert!(state.find(&"9".to_string()).is_none());
    }

    #[test]
    fn create_appends_and_delete_filters() {
        let mut state = ResourceState::<Product>::default();
        let seq = dispatch(&mut state, RequestKind::Mutation);
        state.apply(ResourceAction::Created(seq, product("7", "New")));
        assert_eq!(state.items.len(), 1);

        state.apply(ResourceAction::Select(Some(product("7", "New"))));
        let seq = dispatch(&mut state, RequestKind::Mutation);
        state.apply(ResourceAction::Deleted(seq, "7".to_string()));
        assert!(state.items.is_empty());
        assert!(state.selected.is_none());
    }

    #[test]
    fn stale_fetch_is_discarded() {
        let mut state = ResourceState::<Product>::default();
        let first = dispatch(&mut state, RequestKind::Fetch);
        let second = dispatch(&mut state, RequestKind::Fetch);

        assert_eq!(
            state.apply(ResourceAction::Fetched(second, vec![product("2", "fresh")])),
            Applied::Applied
        );
        assert!(!state.is_loading);
        assert_eq!(
            state.apply(ResourceAction::Fetched(first, vec![product("1", "stale")])),
            Applied::Stale
        );
        assert_eq!(state.items[0].name, "fresh");
        assert!(!state.is_loading);
    }

    #[test]
    fn stale_fetch_failure_is_discarded() {
        let mut state = ResourceState::<Product>::default();
        let first = dispatch(&mut state, RequestKind::Fetch);
        let second = dispatch(&mut state, RequestKind::Fetch);
        state.apply(ResourceAction::Fetched(second, vec![product("2", "fresh")]));

        assert_eq!(
            state.apply(ResourceAction::Rejected(
                first,
                RequestKind::Fetch,
                "old failure".into()
            )),
            Applied::Stale
        );
        assert!(state.error.is_none());
        assert_eq!(state.items[0].name, "fresh");
        assert!(!state.is_loading);
    }

    #[test]
    fn older_mutation_failure_is_still_recorded() {
        let mut state = ResourceState::<Product>::default();
        let mutation = dispatch(&mut state, RequestKind::Mutation);
        let fetch = dispatch(&mut state, RequestKind::Fetch);
        state.apply(ResourceAction::Fetched(fetch, vec![product("1", "Bust A")]));

        assert_eq!(
            state.apply(ResourceAction::Rejected(
                mutation,
                RequestKind::Mutation,
                "duplicate name".into()
            )),
            Applied::Applied
        );
        assert_eq!(state.error.as_deref(), Some("duplicate name"));
    }

    #[test]
    fn loading_stays_until_latest_request_resolves() {
        let mut state = ResourceState::<Product>::default();
        let first = dispatch(&mut state, RequestKind::Fetch);
        let second = dispatch(&mut state, RequestKind::Mutation);

        state.apply(ResourceAction::Fetched(first, vec![product("1", "Bust A")]));
        assert!(state.is_loading);
        state.apply(ResourceAction::Created(second, product("2", "Statue B")));
        assert!(!state.is_loading);
        assert_eq!(state.items.len(), 2);
    }

    #[test]
    fn cancellation_clears_loading_without_error() {
        let mut state = ResourceState::<Product>::default();
        let seq = dispatch(&mut state, RequestKind::Fetch);
        state.apply(ResourceAction::Cancelled(seq));
        assert!(!state.is_loading);
        assert!(state.error.is_none());
    }

    #[test]
    fn selected_user_tracks_updates() {
        let user = User {
            id: "u1".into(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            role: Role::User,
            status: UserStatus::Active,
            created_at: None,
        };
        let mut state = ResourceState::<User>::default();
        let seq = state.next_seq();
        state.apply(ResourceAction::Pending(seq, RequestKind::Fetch));
        state.apply(ResourceAction::Fetched(seq, vec![user.clone()]));
        state.apply(ResourceAction::Select(Some(user.clone())));

        let promoted = User {
            role: Role::Admin,
            ..user
        };
        let seq = state.next_seq();
        state.apply(ResourceAction::Pending(seq, RequestKind::Mutation));
        state.apply(ResourceAction::Updated(seq, promoted));
        assert_eq!(state.selected.as_ref().map(|u| u.role), Some(Role::Admin));
        assert_eq!(state.items[0].role, Role::Admin);
    }
}
