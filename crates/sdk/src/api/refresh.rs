use std::sync::{Mutex, PoisonError};

use tokio::sync::oneshot;
use traintrack_core::authentication::types::AccessToken;

use crate::api::types::ApiError;

pub(crate) type RefreshOutcome = Result<AccessToken, ApiError>;

/// Single-flight coordination for the token refresh exchange.
///
/// Owned by the client instance, never global. At most one refresh runs at a
/// time; every request that hits an authentication fault while one is in
/// flight parks here and is resumed with the shared outcome.
///
/// Invariant: the waiter queue is only ever non-empty while `refreshing` is
/// true. Waiters are pushed under the lock while the flag is set, and the
/// drain in `settle` clears the flag and empties the queue in the same
/// critical section.
pub(crate) struct RefreshCoordinator {
    state: Mutex<RefreshState>,
}

#[derive(Default)]
struct RefreshState {
    refreshing: bool,
    waiters: Vec<oneshot::Sender<RefreshOutcome>>,
}

pub(crate) enum RefreshTicket {
    /// No refresh was in flight; the caller must run the exchange and then
    /// call `settle` exactly once.
    Leader,
    /// A refresh is already running; await the shared outcome.
    Waiter(oneshot::Receiver<RefreshOutcome>),
}

impl RefreshCoordinator {
    pub(crate) fn new() -> Self {
        Self { state: Mutex::new(RefreshState::default()) }
    }

    pub(crate) fn begin(&self) -> RefreshTicket {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.refreshing {
            let (tx, rx) = oneshot::channel();
            state.waiters.push(tx);
            RefreshTicket::Waiter(rx)
        } else {
            state.refreshing = true;
            RefreshTicket::Leader
        }
    }

    /// Ends the in-flight refresh and releases parked waiters in enqueue
    /// order. A waiter whose caller has gone away is skipped; cancellation
    /// is otherwise unsupported.
    pub(crate) fn settle(&self, outcome: RefreshOutcome) {
        let waiters = {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            state.refreshing = false;
            std::mem::take(&mut state.waiters)
        };
        for waiter in waiters {
            let _ = waiter.send(outcome.clone());
        }
    }
}
