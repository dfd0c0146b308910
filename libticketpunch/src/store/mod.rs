//! State container
//!
//! - Actions: what can happen (`actions.rs`)
//! - State: what is true right now (`state.rs`)
//! - Reducer: pure function (State, Action) -> State (`reducer.rs`)
//! - Modals: independent visibility flags (`modal.rs`)
//!
//! `Store` owns one `AppState` and is passed around explicitly (usually as
//! `Arc<Store>`); there is no global instance. `dispatch` applies the
//! reducer under a single lock, so two dispatches never interleave, and
//! then broadcasts the action to subscribers.
//!
//! # Example
//!
//! ```
//! use libticketpunch::store::{Store, actions::ModalAction, modal::Modal};
//!
//! let store = Store::new();
//! store.dispatch(ModalAction::Open(Modal::AddProject).into());
//! assert!(store.select(|s| s.modals.add_project));
//! ```

pub mod actions;
pub mod modal;
pub mod reducer;
pub mod state;

pub use actions::{Action, ModalAction, Operation, ProjectAction, ResourceAction, TicketAction, UserAction};
pub use modal::{Modal, ModalState};
pub use reducer::reduce;
pub use state::{AppState, ProjectState, ResourceState, SessionState, TicketState};

use std::sync::Mutex;
use tokio::sync::broadcast;

/// Receiver for dispatched actions
pub type ActionReceiver = broadcast::Receiver<Action>;

const DEFAULT_CAPACITY: usize = 100;

pub struct Store {
    state: Mutex<AppState>,
    sender: broadcast::Sender<Action>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    pub fn new() -> Self {
        Self::with_state(AppState::default())
    }

    /// Start from a prepared state (tests, restored sessions)
    pub fn with_state(state: AppState) -> Self {
        let (sender, _) = broadcast::channel(DEFAULT_CAPACITY);
        Self {
            state: Mutex::new(state),
            sender,
        }
    }

    /// Apply `action` and notify subscribers
    ///
    /// Subscribers see actions in the order they were applied. Slow
    /// subscribers lag (and miss the oldest actions) rather than blocking
    /// dispatch.
    pub fn dispatch(&self, action: Action) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let current = std::mem::take(&mut *state);
        *state = reduce(current, action.clone());
        tracing::trace!(?action, "dispatched");
        // No subscribers is fine
        let _ = self.sender.send(action);
    }

    /// Snapshot of the whole state
    pub fn state(&self) -> AppState {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Read part of the state without cloning all of it
    pub fn select<R>(&self, f: impl FnOnce(&AppState) -> R) -> R {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        f(&state)
    }

    /// Receive every action dispatched after this call
    pub fn subscribe(&self) -> ActionReceiver {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    // === Modal shortcuts ===

    pub fn open_modal(&self, modal: Modal) {
        self.dispatch(ModalAction::Open(modal).into());
    }

    pub fn close_modal(&self, modal: Modal) {
        self.dispatch(ModalAction::Close(modal).into());
    }
}
