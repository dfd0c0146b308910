//! In-memory backend for testing
//!
//! `MockBackend` implements every repository trait against in-process maps
//! and can simulate failures and latency. It behaves like the real API for
//! the cases the client cares about: unknown ids give 404, bad logins give
//! 401, duplicate registrations give 400.

use async_trait::async_trait;
use secrecy::ExposeSecret;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::sleep;

use super::{ProjectRepository, TicketRepository, UserRepository};
use crate::error::{ApiError, Result};
use crate::types::{
    Credentials, NewProject, NewTicket, Project, ProjectEdits, ProjectId, Ticket, TicketEdits,
    TicketId, User, UserId,
};

#[derive(Default)]
struct MockData {
    /// email -> (password, user)
    users: HashMap<String, (String, User)>,
    projects: BTreeMap<ProjectId, Project>,
    tickets: BTreeMap<TicketId, Ticket>,
    next_id: i64,
}

impl MockData {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

pub struct MockBackend {
    data: Mutex<MockData>,
    /// Error returned by every call while set
    failure: Mutex<Option<ApiError>>,
    /// Per-call latencies consumed in call order; empty means no delay
    delays: Mutex<VecDeque<Duration>>,
    calls: AtomicUsize,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            data: Mutex::new(MockData::default()),
            failure: Mutex::new(None),
            delays: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Register a user directly, bypassing the API
    pub fn seed_user(&self, email: &str, password: &str) -> User {
        let mut data = self.lock();
        let id = data.next_id();
        let user = User {
            id,
            email: email.to_string(),
            token: format!("token-{}", id),
        };
        data.users
            .insert(email.to_string(), (password.to_string(), user.clone()));
        user
    }

    /// Insert a project directly, bypassing the API
    pub fn seed_project(&self, project: NewProject) -> Project {
        let mut data = self.lock();
        let project = build_project(data.next_id(), project);
        data.projects.insert(project.id, project.clone());
        project
    }

    /// Insert a ticket directly, bypassing the API
    pub fn seed_ticket(&self, ticket: NewTicket) -> Ticket {
        let mut data = self.lock();
        let ticket = build_ticket(data.next_id(), ticket);
        data.tickets.insert(ticket.id, ticket.clone());
        ticket
    }

    /// Make every subsequent call fail with `error` until cleared
    pub fn fail_with(&self, error: ApiError) {
        *self.failure.lock().unwrap_or_else(|e| e.into_inner()) = Some(error);
    }

    pub fn clear_failure(&self) {
        *self.failure.lock().unwrap_or_else(|e| e.into_inner()) = None;
    }

    /// Queue latencies for the next calls, one per call in order
    pub fn queue_delays(&self, delays: impl IntoIterator<Item = Duration>) {
        self.delays
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .extend(delays);
    }

    /// Number of repository calls made so far
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn project_count(&self) -> usize {
        self.lock().projects.len()
    }

    pub fn ticket_count(&self) -> usize {
        self.lock().tickets.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockData> {
        self.data.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Count the call, apply latency and injected failure
    async fn enter(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let delay = self
            .delays
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();
        if let Some(delay) = delay {
            sleep(delay).await;
        }

        let failure = self
            .failure
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        match failure {
            Some(error) => Err(error.into()),
            None => Ok(()),
        }
    }
}

fn not_found(kind: &str, id: i64) -> ApiError {
    ApiError::Status {
        status: 404,
        message: format!("{} {} not found", kind, id),
    }
}

fn build_project(id: ProjectId, project: NewProject) -> Project {
    Project {
        id,
        user_id: project.user_id,
        title: project.title,
        description: project.description,
        status: project.status,
    }
}

fn build_ticket(id: TicketId, ticket: NewTicket) -> Ticket {
    Ticket {
        id,
        project_id: ticket.project_id,
        title: ticket.title,
        description: ticket.description,
        status: ticket.status,
        bug: ticket.bug,
        archived: ticket.archived,
    }
}

#[async_trait]
impl UserRepository for MockBackend {
    async fn login(&self, credentials: &Credentials) -> Result<User> {
        self.enter().await?;
        let data = self.lock();
        match data.users.get(&credentials.email) {
            Some((password, user)) if password == credentials.password.expose_secret() => {
                Ok(user.clone())
            }
            _ => Err(ApiError::Status {
                status: 401,
                message: "Invalid credentials".to_string(),
            }
            .into()),
        }
    }

    async fn register(&self, credentials: &Credentials) -> Result<User> {
        self.enter().await?;
        let mut data = self.lock();
        if data.users.contains_key(&credentials.email) {
            return Err(ApiError::Status {
                status: 400,
                message: "Email already registered".to_string(),
            }
            .into());
        }
        let id = data.next_id();
        let user = User {
            id,
            email: credentials.email.clone(),
            token: format!("token-{}", id),
        };
        data.users.insert(
            credentials.email.clone(),
            (credentials.password.expose_secret().to_string(), user.clone()),
        );
        Ok(user)
    }
}

#[async_trait]
impl ProjectRepository for MockBackend {
    async fn list_projects(&self, user_id: UserId) -> Result<Vec<Project>> {
        self.enter().await?;
        Ok(self
            .lock()
            .projects
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn get_project(&self, project_id: ProjectId) -> Result<Project> {
        self.enter().await?;
        self.lock()
            .projects
            .get(&project_id)
            .cloned()
            .ok_or_else(|| not_found("Project", project_id).into())
    }

    async fn create_project(&self, project: &NewProject) -> Result<Project> {
        self.enter().await?;
        let mut data = self.lock();
        let project = build_project(data.next_id(), project.clone());
        data.projects.insert(project.id, project.clone());
        Ok(project)
    }

    async fn update_project(&self, project_id: ProjectId, edits: &ProjectEdits) -> Result<Project> {
        self.enter().await?;
        let mut data = self.lock();
        let project = data
            .projects
            .get_mut(&project_id)
            .ok_or_else(|| not_found("Project", project_id))?;
        if let Some(title) = &edits.title {
            project.title = title.clone();
        }
        if let Some(description) = &edits.description {
            project.description = description.clone();
        }
        if let Some(status) = edits.status {
            project.status = status;
        }
        Ok(project.clone())
    }

    async fn delete_project(&self, project_id: ProjectId) -> Result<ProjectId> {
        self.enter().await?;
        let mut data = self.lock();
        data.projects
            .remove(&project_id)
            .ok_or_else(|| not_found("Project", project_id))?;
        // Cascade like the server does
        data.tickets.retain(|_, t| t.project_id != project_id);
        Ok(project_id)
    }
}

#[async_trait]
impl TicketRepository for MockBackend {
    async fn list_tickets(&self, project_id: ProjectId) -> Result<Vec<Ticket>> {
        self.enter().await?;
        Ok(self
            .lock()
            .tickets
            .values()
            .filter(|t| t.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn get_ticket(&self, ticket_id: TicketId) -> Result<Ticket> {
        self.enter().await?;
        self.lock()
            .tickets
            .get(&ticket_id)
            .cloned()
            .ok_or_else(|| not_found("Ticket", ticket_id).into())
    }

    async fn create_ticket(&self, ticket: &NewTicket) -> Result<Ticket> {
        self.enter().await?;
        let mut data = self.lock();
        if !data.projects.contains_key(&ticket.project_id) {
            return Err(not_found("Project", ticket.project_id).into());
        }
        let ticket = build_ticket(data.next_id(), ticket.clone());
        data.tickets.insert(ticket.id, ticket.clone());
        Ok(ticket)
    }

    async fn update_ticket(&self, ticket_id: TicketId, edits: &TicketEdits) -> Result<Ticket> {
        self.enter().await?;
        let mut data = self.lock();
        let ticket = data
            .tickets
            .get_mut(&ticket_id)
            .ok_or_else(|| not_found("Ticket", ticket_id))?;
        if let Some(project_id) = edits.project_id {
            ticket.project_id = project_id;
        }
        if let Some(title) = &edits.title {
            ticket.title = title.clone();
        }
        if let Some(description) = &edits.description {
            ticket.description = description.clone();
        }
        if let Some(status) = edits.status {
            ticket.status = status;
        }
        if let Some(bug) = edits.bug {
            ticket.bug = bug;
        }
        if let Some(archived) = edits.archived {
            ticket.archived = archived;
        }
        Ok(ticket.clone())
    }

    async fn delete_ticket(&self, ticket_id: TicketId) -> Result<TicketId> {
        self.enter().await?;
        self.lock()
            .tickets
            .remove(&ticket_id)
            .ok_or_else(|| not_found("Ticket", ticket_id))?;
        Ok(ticket_id)
    }
}
