//! Pure reducer function for state transitions
//!
//! `(State, Action) -> State` with no side effects: no network, no file
//! I/O, no clock. The same inputs always give the same output.
//!
//! Success replaces the relevant field wholesale; there is no merging of
//! partial responses. Creates upsert by id so that replaying a success is
//! harmless.

use super::actions::{Action, ModalAction, ResourceAction, UserAction};
use super::state::{AppState, Entity, ResourceState, SessionState};

/// Pure reducer function
///
/// Takes current state and an action, returns new state.
pub fn reduce(state: AppState, action: Action) -> AppState {
    match action {
        Action::User(UserAction::Logout) => AppState {
            // Modal flags are UI chrome, not user data
            modals: state.modals,
            ..AppState::default()
        },

        Action::User(action) => AppState {
            session: reduce_session(state.session, action),
            ..state
        },

        Action::Project(action) => AppState {
            projects: reduce_resource(state.projects, action),
            ..state
        },

        Action::Ticket(action) => AppState {
            tickets: reduce_resource(state.tickets, action),
            ..state
        },

        Action::Modal(ModalAction::Open(modal)) => AppState {
            modals: state.modals.with(modal, true),
            ..state
        },

        Action::Modal(ModalAction::Close(modal)) => AppState {
            modals: state.modals.with(modal, false),
            ..state
        },
    }
}

fn reduce_session(state: SessionState, action: UserAction) -> SessionState {
    match action {
        UserAction::LoginRequest | UserAction::RegisterRequest => SessionState {
            loading: true,
            error: None,
            ..state
        },

        UserAction::LoginSuccess(user)
        | UserAction::RegisterSuccess(user)
        | UserAction::SessionRestored(user) => SessionState {
            user: Some(user),
            loading: false,
            error: None,
        },

        // A failed login never touches `user`
        UserAction::LoginFailure(message) | UserAction::RegisterFailure(message) => SessionState {
            loading: false,
            error: Some(message),
            ..state
        },

        UserAction::Logout => SessionState::default(),
    }
}

/// Reducer shared by every resource slice
pub fn reduce_resource<T: Entity>(
    state: ResourceState<T>,
    action: ResourceAction<T>,
) -> ResourceState<T> {
    match action {
        ResourceAction::Request(op) => ResourceState {
            loading: true,
            pending: Some(op),
            error: None,
            ..state
        },

        ResourceAction::FetchAllSuccess(items) => ResourceState {
            items,
            ..settled(state)
        },

        ResourceAction::FetchSuccess(item) => ResourceState {
            current: Some(item),
            ..settled(state)
        },

        ResourceAction::CreateSuccess(item) => {
            let mut next = settled(state);
            next.items = upsert(next.items, item);
            next
        }

        ResourceAction::UpdateSuccess(item) => {
            let mut next = settled(state);
            let id = item.id();
            for slot in next.items.iter_mut().filter(|i| i.id() == id) {
                *slot = item.clone();
            }
            next.current = replace_if_same(next.current, &item);
            next.target = replace_if_same(next.target, &item);
            next
        }

        ResourceAction::DeleteSuccess(id) => {
            let mut next = settled(state);
            next.items.retain(|i| i.id() != id);
            next.current = next.current.filter(|i| i.id() != id);
            next.target = next.target.filter(|i| i.id() != id);
            next
        }

        ResourceAction::Failure { op: _, message } => ResourceState {
            error: Some(message),
            ..settled(state)
        },

        ResourceAction::Target(item) => ResourceState {
            target: Some(item),
            ..state
        },

        ResourceAction::ClearTarget => ResourceState {
            target: None,
            ..state
        },
    }
}

/// Clear the in-flight markers and the previous error
fn settled<T>(state: ResourceState<T>) -> ResourceState<T> {
    ResourceState {
        loading: false,
        pending: None,
        error: None,
        ..state
    }
}

fn upsert<T: Entity>(mut items: Vec<T>, item: T) -> Vec<T> {
    match items.iter().position(|i| i.id() == item.id()) {
        Some(pos) => items[pos] = item,
        None => items.push(item),
    }
    items
}

fn replace_if_same<T: Entity>(slot: Option<T>, item: &T) -> Option<T> {
    match slot {
        Some(existing) if existing.id() == item.id() => Some(item.clone()),
        other => other,
    }
}
