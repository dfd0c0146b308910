//! Service layer for Ticket Punch
//!
//! The services are the action creators: each operation dispatches a
//! request action to the store, makes exactly one repository call, and then
//! dispatches either a success action carrying the response or a failure
//! action carrying only the error message.
//!
//! # Architecture
//!
//! `TicketPunchService` is the facade. It owns the shared `Store`, the
//! session store and one sub-service per resource:
//!
//! - `UserService`: login, registration, logout, session restore
//! - `ProjectService`: project CRUD and edit selection
//! - `TicketService`: ticket CRUD and edit selection
//! - `command`: typed `Command` values that can be spawned and awaited
//!
//! # Example
//!
//! ```no_run
//! use libticketpunch::{Credentials, TicketPunchService};
//!
//! # async fn example() -> libticketpunch::Result<()> {
//! let service = TicketPunchService::new()?;
//!
//! let user = service
//!     .users()
//!     .login(Credentials::new("ada@example.com", "hunter22"))
//!     .await?;
//! let projects = service.projects().fetch_all(user.id).await?;
//! println!("{} projects", projects.len());
//! # Ok(())
//! # }
//! ```

pub mod command;
pub mod projects;
pub mod tickets;
pub mod users;

pub use command::{Command, CommandHandle, Outcome};

use std::future::Future;
use std::sync::Arc;

use self::projects::ProjectService;
use self::tickets::TicketService;
use self::users::UserService;
use crate::api::ApiClient;
use crate::error::{Result, TicketPunchError};
use crate::repository::{Backend, ProjectRepository, TicketRepository, UserRepository};
use crate::session::{FileSessionStore, SessionStore};
use crate::store::{Action, ActionReceiver, Operation, ResourceAction, Store};
use crate::types::User;
use crate::Config;

/// Main service facade that coordinates all sub-services
///
/// Cloning is cheap; every clone shares the same store, session store and
/// backend.
#[derive(Clone)]
pub struct TicketPunchService {
    store: Arc<Store>,
    session: Arc<dyn SessionStore>,
    users: UserService,
    projects: ProjectService,
    tickets: TicketService,
}

impl TicketPunchService {
    /// Create a service from the default configuration file
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded or the HTTP
    /// client cannot be built.
    pub fn new() -> Result<Self> {
        let config = Config::load()?;
        Self::from_config(config)
    }

    /// Create a service talking to the configured API, with the session
    /// persisted at the configured path
    pub fn from_config(config: Config) -> Result<Self> {
        let session: Arc<dyn SessionStore> = Arc::new(FileSessionStore::new(config.session_path()));
        let client = ApiClient::from_config(&config, Arc::clone(&session))?;

        tracing::debug!(
            base_url = client.base_url(),
            session = session.backend_name(),
            "Created API-backed service"
        );

        Ok(Self::with_backend(
            Arc::new(client),
            session,
            Arc::new(Store::new()),
        ))
    }

    /// Create a service over any backend (the in-memory mock in tests)
    pub fn with_backend<B: Backend + 'static>(
        backend: Arc<B>,
        session: Arc<dyn SessionStore>,
        store: Arc<Store>,
    ) -> Self {
        let user_repo: Arc<dyn UserRepository> = backend.clone();
        let project_repo: Arc<dyn ProjectRepository> = backend.clone();
        let ticket_repo: Arc<dyn TicketRepository> = backend;

        let users = UserService::new(user_repo, Arc::clone(&session), Arc::clone(&store));
        let projects = ProjectService::new(project_repo, Arc::clone(&store));
        let tickets = TicketService::new(ticket_repo, Arc::clone(&store));

        Self {
            store,
            session,
            users,
            projects,
            tickets,
        }
    }

    /// The store every operation reports to
    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    pub fn session(&self) -> &Arc<dyn SessionStore> {
        &self.session
    }

    pub fn users(&self) -> &UserService {
        &self.users
    }

    pub fn projects(&self) -> &ProjectService {
        &self.projects
    }

    pub fn tickets(&self) -> &TicketService {
        &self.tickets
    }

    /// Receive every action dispatched after this call
    pub fn subscribe(&self) -> ActionReceiver {
        self.store.subscribe()
    }

    /// The logged-in user, or `NotAuthenticated`
    pub fn require_user(&self) -> Result<User> {
        self.store
            .select(|s| s.session.user.clone())
            .ok_or(TicketPunchError::NotAuthenticated)
    }

    /// Run a command to completion on the current task
    pub async fn execute(&self, command: Command) -> Result<Outcome> {
        tracing::debug!(command = %command.describe(), "Executing command");
        match command {
            Command::Login(credentials) => self.users.login(credentials).await.map(Outcome::User),
            Command::Register(credentials) => {
                self.users.register(credentials).await.map(Outcome::User)
            }
            Command::FetchProjects { user_id } => {
                self.projects.fetch_all(user_id).await.map(Outcome::Projects)
            }
            Command::FetchProject(id) => self.projects.fetch(id).await.map(Outcome::Project),
            Command::CreateProject(project) => {
                self.projects.create(project).await.map(Outcome::Project)
            }
            Command::UpdateProject { id, edits } => {
                self.projects.update(id, edits).await.map(Outcome::Project)
            }
            Command::DeleteProject(id) => {
                self.projects.delete(id).await.map(Outcome::ProjectDeleted)
            }
            Command::FetchTickets { project_id } => {
                self.tickets.fetch_all(project_id).await.map(Outcome::Tickets)
            }
            Command::FetchTicket(id) => self.tickets.fetch(id).await.map(Outcome::Ticket),
            Command::CreateTicket(ticket) => self.tickets.create(ticket).await.map(Outcome::Ticket),
            Command::UpdateTicket { id, edits } => {
                self.tickets.update(id, edits).await.map(Outcome::Ticket)
            }
            Command::DeleteTicket(id) => self.tickets.delete(id).await.map(Outcome::TicketDeleted),
        }
    }

    /// Spawn a command and return a handle to its result
    ///
    /// The command runs to completion even if the handle is dropped; its
    /// actions still reach the store. Must be called inside a Tokio runtime.
    pub fn submit(&self, command: Command) -> CommandHandle {
        let (sender, receiver) = tokio::sync::oneshot::channel();
        let service = self.clone();
        let description = command.describe();

        tokio::spawn(async move {
            let result = service.execute(command).await;
            // Receiver gone means nobody is waiting; the store already has the outcome
            let _ = sender.send(result);
        });

        CommandHandle::new(description, receiver)
    }
}

/// Request, one call, then success or failure
///
/// Shared by the project and ticket services. `success` builds the success
/// action from the call's result; failures carry only the message.
pub(crate) async fn perform<T, R, F>(
    store: &Store,
    kind: &'static str,
    op: Operation,
    call: F,
    success: impl FnOnce(&T) -> ResourceAction<R>,
) -> Result<T>
where
    F: Future<Output = Result<T>>,
    ResourceAction<R>: Into<Action>,
{
    store.dispatch(ResourceAction::<R>::Request(op).into());
    tracing::debug!(resource = kind, operation = op.as_str(), "Request started");

    match call.await {
        Ok(value) => {
            store.dispatch(success(&value).into());
            tracing::debug!(resource = kind, operation = op.as_str(), "Request succeeded");
            Ok(value)
        }
        Err(e) => {
            tracing::warn!(
                resource = kind,
                operation = op.as_str(),
                error = %e,
                "Request failed"
            );
            store.dispatch(
                ResourceAction::<R>::Failure {
                    op,
                    message: e.to_string(),
                }
                .into(),
            );
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::mock::MockBackend;
    use crate::session::MemorySessionStore;
    use crate::types::{Credentials, NewProject, ProjectStatus};

    fn service() -> (Arc<MockBackend>, TicketPunchService) {
        let backend = Arc::new(MockBackend::new());
        let service = TicketPunchService::with_backend(
            Arc::clone(&backend),
            Arc::new(MemorySessionStore::new()),
            Arc::new(Store::new()),
        );
        (backend, service)
    }

    #[tokio::test]
    async fn test_require_user_when_logged_out() {
        let (_, service) = service();
        assert!(matches!(
            service.require_user(),
            Err(TicketPunchError::NotAuthenticated)
        ));
    }

    #[tokio::test]
    async fn test_execute_login_then_fetch() {
        let (backend, service) = service();
        let user = backend.seed_user("ada@example.com", "hunter22");
        backend.seed_project(NewProject {
            title: "Compiler".to_string(),
            description: String::new(),
            status: ProjectStatus::WorkingOnIt,
            user_id: user.id,
        });

        let outcome = service
            .execute(Command::Login(Credentials::new("ada@example.com", "hunter22")))
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::User(user.clone()));
        assert_eq!(service.require_user().unwrap(), user);

        let outcome = service
            .execute(Command::FetchProjects { user_id: user.id })
            .await
            .unwrap();
        match outcome {
            Outcome::Projects(projects) => assert_eq!(projects.len(), 1),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_submit_delivers_result() {
        let (backend, service) = service();
        backend.seed_user("ada@example.com", "hunter22");

        let handle = service.submit(Command::Login(Credentials::new("ada@example.com", "wrong")));
        let result = handle.outcome().await;

        assert!(result.is_err());
        assert_eq!(
            service.store().select(|s| s.session.error.clone()).as_deref(),
            Some("Invalid credentials")
        );
    }

    #[tokio::test]
    async fn test_perform_dispatches_request_then_failure() {
        let (backend, service) = service();
        backend.fail_with(crate::ApiError::Transport("Network Error".to_string()));
        let mut actions = service.subscribe();

        let result = service.projects().fetch(7).await;
        assert!(result.is_err());

        assert_eq!(
            actions.recv().await.unwrap(),
            Action::Project(ResourceAction::Request(Operation::Fetch))
        );
        assert_eq!(
            actions.recv().await.unwrap(),
            Action::Project(ResourceAction::Failure {
                op: Operation::Fetch,
                message: "Network Error".to_string(),
            })
        );
    }
}
