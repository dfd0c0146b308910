//! Typed commands with an explicit result channel
//!
//! A `Command` names one REST operation and its inputs. It can be run
//! inline with `TicketPunchService::execute` or spawned with
//! `TicketPunchService::submit`, which hands back a `CommandHandle`.
//! Either way the store sees the same request/success/failure actions.
//!
//! Overlapping commands are not ordered: when two fetches of the same
//! slice are in flight, whichever response arrives last is what the slice
//! ends up holding.

use tokio::sync::oneshot;

use crate::error::{Result, TicketPunchError};
use crate::types::{
    Credentials, NewProject, NewTicket, Project, ProjectEdits, ProjectId, Ticket, TicketEdits,
    TicketId, User, UserId,
};

#[derive(Debug)]
pub enum Command {
    Login(Credentials),
    Register(Credentials),

    FetchProjects { user_id: UserId },
    FetchProject(ProjectId),
    CreateProject(NewProject),
    UpdateProject { id: ProjectId, edits: ProjectEdits },
    DeleteProject(ProjectId),

    FetchTickets { project_id: ProjectId },
    FetchTicket(TicketId),
    CreateTicket(NewTicket),
    UpdateTicket { id: TicketId, edits: TicketEdits },
    DeleteTicket(TicketId),
}

impl Command {
    /// Short description for logs; never includes a password
    pub fn describe(&self) -> String {
        match self {
            Command::Login(c) => format!("login {}", c.email),
            Command::Register(c) => format!("register {}", c.email),
            Command::FetchProjects { user_id } => format!("fetch projects of user {}", user_id),
            Command::FetchProject(id) => format!("fetch project {}", id),
            Command::CreateProject(p) => format!("create project '{}'", p.title),
            Command::UpdateProject { id, .. } => format!("update project {}", id),
            Command::DeleteProject(id) => format!("delete project {}", id),
            Command::FetchTickets { project_id } => {
                format!("fetch tickets of project {}", project_id)
            }
            Command::FetchTicket(id) => format!("fetch ticket {}", id),
            Command::CreateTicket(t) => format!("create ticket '{}'", t.title),
            Command::UpdateTicket { id, .. } => format!("update ticket {}", id),
            Command::DeleteTicket(id) => format!("delete ticket {}", id),
        }
    }
}

/// What a successful command produced
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    User(User),
    Projects(Vec<Project>),
    Project(Project),
    ProjectDeleted(ProjectId),
    Tickets(Vec<Ticket>),
    Ticket(Ticket),
    TicketDeleted(TicketId),
}

/// Result channel for a spawned command
///
/// Dropping the handle does not cancel the command.
#[derive(Debug)]
pub struct CommandHandle {
    description: String,
    receiver: oneshot::Receiver<Result<Outcome>>,
}

impl CommandHandle {
    pub(crate) fn new(description: String, receiver: oneshot::Receiver<Result<Outcome>>) -> Self {
        Self {
            description,
            receiver,
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Wait for the command to finish
    ///
    /// # Errors
    ///
    /// The command's own error, or `Incomplete` if the task died before
    /// reporting.
    pub async fn outcome(self) -> Result<Outcome> {
        match self.receiver.await {
            Ok(result) => result,
            Err(_) => Err(TicketPunchError::Incomplete(self.description)),
        }
    }
}
