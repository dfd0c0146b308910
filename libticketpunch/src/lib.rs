//! Ticket Punch - project and ticket tracking client
//!
//! This library provides the data layer (typed REST repositories) and the
//! state layer (store, actions, pure reducers) shared by every Ticket Punch
//! front-end.

pub mod api;
pub mod board;
pub mod config;
pub mod error;
pub mod forms;
pub mod logging;
pub mod repository;
pub mod service;
pub mod session;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use error::{ApiError, Result, TicketPunchError};
pub use service::TicketPunchService;
pub use store::{reduce, Action, AppState, Store};
pub use types::{
    Credentials, NewProject, NewTicket, Project, ProjectEdits, ProjectStatus, Ticket, TicketEdits,
    TicketStatus, User,
};
