//! Actions for the reducer pattern
//!
//! Every state transition is triggered by an action. Actions are plain data
//! describing what happened; the reducer (see `reducer.rs`) decides what it
//! means for the state.
//!
//! Each REST operation produces at most three actions: a request when the
//! call starts, then exactly one success or failure when it finishes.

use super::modal::Modal;
use crate::types::{Project, Ticket, User};

/// Actions that trigger state transitions
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    User(UserAction),
    Project(ProjectAction),
    Ticket(TicketAction),
    Modal(ModalAction),
}

/// Session/authentication actions
#[derive(Debug, Clone, PartialEq)]
pub enum UserAction {
    LoginRequest,
    LoginSuccess(User),
    LoginFailure(String),

    RegisterRequest,
    RegisterSuccess(User),
    RegisterFailure(String),

    /// Persisted session loaded at startup
    SessionRestored(User),

    /// Discard the session client-side
    Logout,
}

/// Which REST operation a request or failure belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    FetchAll,
    Fetch,
    Create,
    Update,
    Delete,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::FetchAll => "fetch_all",
            Operation::Fetch => "fetch",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }
}

/// Outcome events for one resource type
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceAction<T> {
    /// A call started
    Request(Operation),

    FetchAllSuccess(Vec<T>),
    FetchSuccess(T),
    CreateSuccess(T),
    UpdateSuccess(T),
    /// Carries the id the server confirmed as removed
    DeleteSuccess(i64),

    /// A call failed; only the message survives
    Failure { op: Operation, message: String },

    /// Select an entity for editing
    Target(T),
    ClearTarget,
}

pub type ProjectAction = ResourceAction<Project>;
pub type TicketAction = ResourceAction<Ticket>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalAction {
    Open(Modal),
    Close(Modal),
}

impl From<UserAction> for Action {
    fn from(action: UserAction) -> Self {
        Action::User(action)
    }
}

impl From<ProjectAction> for Action {
    fn from(action: ProjectAction) -> Self {
        Action::Project(action)
    }
}

impl From<TicketAction> for Action {
    fn from(action: TicketAction) -> Self {
        Action::Ticket(action)
    }
}

impl From<ModalAction> for Action {
    fn from(action: ModalAction) -> Self {
        Action::Modal(action)
    }
}
