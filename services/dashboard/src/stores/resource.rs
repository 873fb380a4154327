//! services/dashboard/src/stores/resource.rs
//!
//! The async half of a resource store. `ResourceStore` owns the state channel,
//! stamps every request with a ticket, races it against the store's cancellation
//! token and folds the outcome back through the `ResourceState` reducer.

use admin_dashboard_core::ports::{PortError, PortResult};
use admin_dashboard_core::resource::{
    Applied, Entity, RequestKind, RequestSeq, ResourceAction, ResourceState,
};
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::notify::Notifier;
use crate::stores::auth::AuthStore;

#[derive(Clone)]
pub struct ResourceStore<T: Entity> {
    state: Arc<watch::Sender<ResourceState<T>>>,
    cancel: Arc<Mutex<CancellationToken>>,
    session: AuthStore,
    notifier: Notifier,
}

impl<T: Entity> ResourceStore<T> {
    pub fn new(session: AuthStore, notifier: Notifier) -> Self {
        Self {
            state: Arc::new(watch::Sender::new(ResourceState::default())),
            cancel: Arc::new(Mutex::new(CancellationToken::new())),
            session,
            notifier,
        }
    }

    pub fn state(&self) -> ResourceState<T> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ResourceState<T>> {
        self.state.subscribe()
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// The token every request dispatched from now on is raced against.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Cancels every in-flight request of this store. Later requests get a fresh token.
    pub fn cancel_pending(&self) {
        let previous = {
            let mut guard = self.cancel.lock().unwrap_or_else(PoisonError::into_inner);
            std::mem::replace(&mut *guard, CancellationToken::new())
        };
        info!(kind = T::KIND, "Cancelling in-flight requests");
        previous.cancel();
    }

    pub fn apply(&self, action: ResourceAction<T>) -> Applied {
        let mut applied = Applied::Applied;
        self.state.send_modify(|state| applied = state.apply(action));
        applied
    }

    fn dispatch_pending(&self, kind: RequestKind) -> RequestSeq {
        let mut seq = RequestSeq::default();
        self.state.send_modify(|state| {
            seq = state.next_seq();
            state.apply(ResourceAction::Pending(seq, kind));
        });
        seq
    }

    /// Runs one request through the full lifecycle: pending, then exactly one of
    /// merge / rejected / cancelled. `merge` builds the success action from the result.
    /// Dropping the returned future before it resolves counts as cancellation.
    pub async fn execute<R, F, M>(
        &self,
        kind: RequestKind,
        fallback: &str,
        request: F,
        merge: M,
    ) -> PortResult<R>
    where
        F: Future<Output = PortResult<R>>,
        M: FnOnce(RequestSeq, &R) -> ResourceAction<T>,
    {
        let token = self.cancellation_token();
        let sent_token = self.session.state().token().map(str::to_owned);
        let seq = self.dispatch_pending(kind);
        let mut in_flight = InFlight {
            state: self.state.as_ref(),
            seq,
            settled: false,
        };
        debug!(kind = T::KIND, seq = seq.0, "Request dispatched");

        let result = tokio::select! {
            _ = token.cancelled() => Err(PortError::Cancelled),
            result = request => result,
        };
        in_flight.settled = true;

        match &result {
            Ok(value) => {
                if self.apply(merge(seq, value)) == Applied::Stale {
                    debug!(kind = T::KIND, seq = seq.0, "Discarded stale response");
                }
            }
            Err(PortError::Cancelled) => {
                info!(kind = T::KIND, seq = seq.0, "Request cancelled");
                self.apply(ResourceAction::Cancelled(seq));
            }
            Err(e) => {
                let message = e.user_message(fallback);
                let rejected = ResourceAction::Rejected(seq, kind, message.clone());
                if self.apply(rejected) == Applied::Stale {
                    debug!(kind = T::KIND, seq = seq.0, error = %e, "Discarded stale failure");
                    return result;
                }
                error!(kind = T::KIND, seq = seq.0, error = %e, "{}", message);
                self.notifier.error(message);
                if e.is_unauthorized() {
                    if let Some(sent) = sent_token.as_deref() {
                        self.session.expire(sent);
                    }
                }
            }
        }
        result
    }

    /// Marks the loaded entity with `id` as selected; clears the selection if absent.
    pub fn select(&self, id: &T::Id) -> Option<T> {
        let mut selected = None;
        self.state.send_modify(|state| {
            selected = state.find(id).cloned();
            state.apply(ResourceAction::Select(selected.clone()));
        });
        selected
    }

    pub fn clear_selection(&self) {
        self.apply(ResourceAction::Select(None));
    }
}

// Settles the ticket as cancelled if `execute` is dropped mid-request.
struct InFlight<'a, T: Entity> {
    state: &'a watch::Sender<ResourceState<T>>,
    seq: RequestSeq,
    settled: bool,
}

impl<T: Entity> Drop for InFlight<'_, T> {
    fn drop(&mut self) {
        if !self.settled {
            debug!(kind = T::KIND, seq = self.seq.0, "Request dropped before completion");
            self.state.send_modify(|state| {
                state.apply(ResourceAction::Cancelled(self.seq));
            });
        }
    }
}
