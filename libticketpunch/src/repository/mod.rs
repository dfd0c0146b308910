//! Typed repository interfaces, one per resource
//!
//! Front-ends never talk HTTP directly; they go through these traits so the
//! transport can be swapped. `crate::api::ApiClient` implements all three
//! against the REST API and `mock::MockBackend` implements them in memory.
//!
//! Every method maps to exactly one API call. Implementations must not
//! retry.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{
    Credentials, NewProject, NewTicket, Project, ProjectEdits, ProjectId, Ticket, TicketEdits,
    TicketId, User, UserId,
};

// Mock backend is available for all builds (not just tests) to support integration tests
pub mod mock;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// POST /users/login
    async fn login(&self, credentials: &Credentials) -> Result<User>;

    /// POST /users/register
    async fn register(&self, credentials: &Credentials) -> Result<User>;
}

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// GET /projects/user/{userId}
    async fn list_projects(&self, user_id: UserId) -> Result<Vec<Project>>;

    /// GET /projects/{projectId}
    async fn get_project(&self, project_id: ProjectId) -> Result<Project>;

    /// POST /projects
    async fn create_project(&self, project: &NewProject) -> Result<Project>;

    /// PUT /projects/{projectId}
    async fn update_project(&self, project_id: ProjectId, edits: &ProjectEdits) -> Result<Project>;

    /// DELETE /projects/{projectId}
    ///
    /// Returns the id of the removed project once the server confirms.
    async fn delete_project(&self, project_id: ProjectId) -> Result<ProjectId>;
}

#[async_trait]
pub trait TicketRepository: Send + Sync {
    /// GET /tickets/project/{projectId}
    async fn list_tickets(&self, project_id: ProjectId) -> Result<Vec<Ticket>>;

    /// GET /tickets/{ticketId}
    async fn get_ticket(&self, ticket_id: TicketId) -> Result<Ticket>;

    /// POST /tickets
    async fn create_ticket(&self, ticket: &NewTicket) -> Result<Ticket>;

    /// PUT /tickets/{ticketId}
    async fn update_ticket(&self, ticket_id: TicketId, edits: &TicketEdits) -> Result<Ticket>;

    /// DELETE /tickets/{ticketId}
    async fn delete_ticket(&self, ticket_id: TicketId) -> Result<TicketId>;
}

/// Everything a front-end needs from a backend
pub trait Backend: UserRepository + ProjectRepository + TicketRepository {}

impl<T> Backend for T where T: UserRepository + ProjectRepository + TicketRepository {}
