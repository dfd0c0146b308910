//! Service integration tests
//!
//! Drive `TicketPunchService` end to end over the in-memory backend and
//! check what the store ends up holding.

use anyhow::Result;
use libticketpunch::repository::mock::MockBackend;
use libticketpunch::service::{Command, Outcome};
use libticketpunch::session::{FileSessionStore, MemorySessionStore, SessionStore};
use libticketpunch::store::{Action, Modal, Operation, ProjectAction, Store, TicketAction};
use libticketpunch::{
    reduce, ApiError, AppState, Credentials, NewProject, NewTicket, ProjectEdits, ProjectStatus,
    TicketPunchService, TicketStatus, User,
};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

struct Harness {
    backend: Arc<MockBackend>,
    service: TicketPunchService,
    user: User,
}

impl Harness {
    fn new() -> Self {
        Self::with_session(Arc::new(MemorySessionStore::new()))
    }

    fn with_session(session: Arc<dyn SessionStore>) -> Self {
        let backend = Arc::new(MockBackend::new());
        let user = backend.seed_user("ada@example.com", "hunter22");
        let service =
            TicketPunchService::with_backend(Arc::clone(&backend), session, Arc::new(Store::new()));
        Self {
            backend,
            service,
            user,
        }
    }

    fn new_project(&self, title: &str) -> NewProject {
        NewProject {
            title: title.to_string(),
            description: format!("{} description", title),
            status: ProjectStatus::WorkingOnIt,
            user_id: self.user.id,
        }
    }

    fn state(&self) -> AppState {
        self.service.store().state()
    }
}

fn new_ticket(project_id: i64, title: &str) -> NewTicket {
    NewTicket {
        project_id,
        title: title.to_string(),
        description: String::new(),
        status: TicketStatus::Stuck,
        bug: true,
        archived: false,
    }
}

#[tokio::test]
async fn test_failed_login_never_sets_user() {
    let h = Harness::new();

    let result = h
        .service
        .users()
        .login(Credentials::new("ada@example.com", "wrong"))
        .await;

    assert!(result.is_err());
    let state = h.state();
    assert!(state.session.user.is_none());
    assert!(!state.session.loading);
    assert_eq!(state.session.error.as_deref(), Some("Invalid credentials"));
}

#[tokio::test]
async fn test_full_project_lifecycle() -> Result<()> {
    let h = Harness::new();
    h.service
        .users()
        .login(Credentials::new("ada@example.com", "hunter22"))
        .await?;

    let created = h.service.projects().create(h.new_project("Compiler")).await?;
    assert!(h.state().projects.contains(created.id));

    let edits = ProjectEdits {
        title: Some("Compiler v2".to_string()),
        ..Default::default()
    };
    let updated = h.service.projects().update(created.id, edits).await?;
    assert_eq!(h.state().projects.find(created.id), Some(&updated));

    h.service.projects().delete(created.id).await?;
    assert!(!h.state().projects.contains(created.id));
    assert_eq!(h.backend.project_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_each_call_emits_request_then_outcome() -> Result<()> {
    let h = Harness::new();
    let project = h.backend.seed_project(h.new_project("Compiler"));
    let mut actions = h.service.subscribe();

    h.service.tickets().create(new_ticket(project.id, "Lexer")).await?;
    h.backend.fail_with(ApiError::from_status(503, ""));
    let _ = h.service.tickets().fetch_all(project.id).await;

    assert_eq!(
        actions.recv().await?,
        Action::Ticket(TicketAction::Request(Operation::Create))
    );
    assert!(matches!(
        actions.recv().await?,
        Action::Ticket(TicketAction::CreateSuccess(_))
    ));
    assert_eq!(
        actions.recv().await?,
        Action::Ticket(TicketAction::Request(Operation::FetchAll))
    );
    assert_eq!(
        actions.recv().await?,
        Action::Ticket(TicketAction::Failure {
            op: Operation::FetchAll,
            message: "Request failed with status code 503".to_string(),
        })
    );
    assert_eq!(h.backend.call_count(), 2);
    Ok(())
}

#[tokio::test]
async fn test_replayed_success_is_idempotent() -> Result<()> {
    let h = Harness::new();
    let project = h.service.projects().create(h.new_project("Compiler")).await?;

    let once = h.state();
    let twice = reduce(once.clone(), ProjectAction::CreateSuccess(project.clone()).into());
    assert_eq!(once, twice);

    let deleted = reduce(twice, ProjectAction::DeleteSuccess(project.id).into());
    let deleted_again = reduce(deleted.clone(), ProjectAction::DeleteSuccess(project.id).into());
    assert_eq!(deleted, deleted_again);
    Ok(())
}

#[tokio::test]
async fn test_modal_open_close_restores_flags() {
    let h = Harness::new();
    let store = h.service.store();
    store.open_modal(Modal::Help);
    let before = h.state().modals;

    store.open_modal(Modal::EditTicket);
    store.open_modal(Modal::EditTicket);
    store.close_modal(Modal::EditTicket);

    assert_eq!(h.state().modals, before);
    assert!(h.state().modals.help);
}

#[tokio::test]
async fn test_failure_keeps_previous_list() -> Result<()> {
    let h = Harness::new();
    h.backend.seed_project(h.new_project("Compiler"));
    let projects = h.service.projects().fetch_all(h.user.id).await?;

    h.backend.fail_with(ApiError::Transport("Network Error".to_string()));
    assert!(h.service.projects().fetch_all(h.user.id).await.is_err());

    let state = h.state();
    assert_eq!(state.projects.items, projects);
    assert_eq!(state.projects.error.as_deref(), Some("Network Error"));

    // The next request clears the error
    h.backend.clear_failure();
    h.service.projects().fetch_all(h.user.id).await?;
    assert!(h.state().projects.error.is_none());
    Ok(())
}

#[tokio::test]
async fn test_submit_runs_after_handle_dropped() -> Result<()> {
    let h = Harness::new();
    h.backend.queue_delays([Duration::from_millis(20)]);
    let mut actions = h.service.subscribe();

    drop(h.service.submit(Command::CreateProject(h.new_project("Compiler"))));

    assert_eq!(
        actions.recv().await?,
        Action::Project(ProjectAction::Request(Operation::Create))
    );
    assert!(matches!(
        actions.recv().await?,
        Action::Project(ProjectAction::CreateSuccess(_))
    ));
    assert_eq!(h.state().projects.items.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_overlapping_fetches_last_response_wins() -> Result<()> {
    let h = Harness::new();
    let other = h.backend.seed_user("grace@example.com", "cobol1959");
    h.backend.seed_project(h.new_project("Mine"));
    h.backend.seed_project(NewProject {
        user_id: other.id,
        ..h.new_project("Theirs")
    });
    h.backend
        .queue_delays([Duration::from_millis(80), Duration::from_millis(5)]);
    let mut actions = h.service.subscribe();

    let slow = h.service.submit(Command::FetchProjects { user_id: h.user.id });
    // Wait until the slow call has taken its delay
    actions.recv().await?;
    let fast = h.service.submit(Command::FetchProjects { user_id: other.id });

    let fast = fast.outcome().await?;
    let slow = slow.outcome().await?;

    match (fast, slow) {
        (Outcome::Projects(fast), Outcome::Projects(slow)) => {
            assert_eq!(fast[0].title, "Theirs");
            assert_eq!(slow[0].title, "Mine");
            assert_eq!(h.state().projects.items, slow);
        }
        other => panic!("unexpected outcomes: {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn test_session_file_survives_restart() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("nested").join("session.json");

    let h = Harness::with_session(Arc::new(FileSessionStore::new(&path)));
    h.service
        .users()
        .login(Credentials::new("ada@example.com", "hunter22"))
        .await?;
    assert!(path.exists());

    // A fresh service over the same file picks the session up
    let restarted = TicketPunchService::with_backend(
        Arc::clone(&h.backend),
        Arc::new(FileSessionStore::new(&path)),
        Arc::new(Store::new()),
    );
    let restored = restarted.users().restore()?;
    assert_eq!(restored, Some(h.user.clone()));
    assert_eq!(restarted.require_user()?, h.user);

    restarted.users().logout()?;
    assert!(!path.exists());
    assert!(restarted.require_user().is_err());
    Ok(())
}

#[tokio::test]
async fn test_logout_drops_resource_slices() -> Result<()> {
    let h = Harness::new();
    h.service
        .users()
        .login(Credentials::new("ada@example.com", "hunter22"))
        .await?;
    let project = h.service.projects().create(h.new_project("Compiler")).await?;
    h.service.tickets().create(new_ticket(project.id, "Lexer")).await?;
    h.service.projects().target(project);

    h.service.users().logout()?;

    let state = h.state();
    assert!(!state.is_authenticated());
    assert!(state.projects.items.is_empty());
    assert!(state.projects.target.is_none());
    assert!(state.tickets.items.is_empty());
    Ok(())
}
