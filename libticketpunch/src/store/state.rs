//! Application state
//!
//! Plain data, one slice per resource. All state transitions happen through
//! the reducer (see `reducer.rs`); front-ends only read.

use super::actions::Operation;
use super::modal::ModalState;
use crate::types::{Project, Ticket, User};

/// Root application state
///
/// This is the single source of truth for what front-ends render.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub session: SessionState,
    pub projects: ProjectState,
    pub tickets: TicketState,
    pub modals: ModalState,
}

/// Authenticated user slice
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub user: Option<User>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Anything stored in a resource slice
pub trait Entity: Clone {
    fn id(&self) -> i64;
}

impl Entity for Project {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Entity for Ticket {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Slice for one resource type
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceState<T> {
    /// Latest list fetched (plus local creates/updates/deletes)
    pub items: Vec<T>,
    /// Latest single entity fetched
    pub current: Option<T>,
    /// Entity selected for editing; pre-fills edit forms
    pub target: Option<T>,
    pub loading: bool,
    /// Operation behind `loading`
    pub pending: Option<Operation>,
    pub error: Option<String>,
}

impl<T> Default for ResourceState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            current: None,
            target: None,
            loading: false,
            pending: None,
            error: None,
        }
    }
}

impl<T: Entity> ResourceState<T> {
    /// Look up an entity anywhere in the slice
    pub fn find(&self, id: i64) -> Option<&T> {
        self.items
            .iter()
            .chain(self.current.iter())
            .chain(self.target.iter())
            .find(|item| item.id() == id)
    }

    pub fn contains(&self, id: i64) -> bool {
        self.find(id).is_some()
    }
}

pub type ProjectState = ResourceState<Project>;
pub type TicketState = ResourceState<Ticket>;

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.user.is_some()
    }

    /// Id of the logged-in user
    pub fn user_id(&self) -> Option<i64> {
        self.session.user.as_ref().map(|u| u.id)
    }

    /// True while any slice has a call in flight
    pub fn is_loading(&self) -> bool {
        self.session.loading || self.projects.loading || self.tickets.loading
    }
}
