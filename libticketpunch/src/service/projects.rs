//! Project operations

use std::sync::Arc;

use super::perform;
use crate::error::{Result, TicketPunchError};
use crate::repository::ProjectRepository;
use crate::store::{Operation, ProjectAction, Store};
use crate::types::{NewProject, Project, ProjectEdits, ProjectId, UserId};

const KIND: &str = "project";

#[derive(Clone)]
pub struct ProjectService {
    repo: Arc<dyn ProjectRepository>,
    store: Arc<Store>,
}

impl ProjectService {
    pub fn new(repo: Arc<dyn ProjectRepository>, store: Arc<Store>) -> Self {
        Self { repo, store }
    }

    /// GET /projects/user/{userId}; replaces the project list
    pub async fn fetch_all(&self, user_id: UserId) -> Result<Vec<Project>> {
        perform(
            &self.store,
            KIND,
            Operation::FetchAll,
            self.repo.list_projects(user_id),
            |projects: &Vec<Project>| ProjectAction::FetchAllSuccess(projects.clone()),
        )
        .await
    }

    /// GET /projects/{projectId}; replaces the current project
    pub async fn fetch(&self, project_id: ProjectId) -> Result<Project> {
        perform(
            &self.store,
            KIND,
            Operation::Fetch,
            self.repo.get_project(project_id),
            |project: &Project| ProjectAction::FetchSuccess(project.clone()),
        )
        .await
    }

    /// POST /projects
    pub async fn create(&self, project: NewProject) -> Result<Project> {
        perform(
            &self.store,
            KIND,
            Operation::Create,
            self.repo.create_project(&project),
            |project: &Project| ProjectAction::CreateSuccess(project.clone()),
        )
        .await
    }

    /// PUT /projects/{projectId}
    ///
    /// An empty edit set is rejected before any action is dispatched.
    pub async fn update(&self, project_id: ProjectId, edits: ProjectEdits) -> Result<Project> {
        if edits.is_empty() {
            return Err(TicketPunchError::InvalidInput(
                "Nothing to update".to_string(),
            ));
        }
        perform(
            &self.store,
            KIND,
            Operation::Update,
            self.repo.update_project(project_id, &edits),
            |project: &Project| ProjectAction::UpdateSuccess(project.clone()),
        )
        .await
    }

    /// DELETE /projects/{projectId}
    pub async fn delete(&self, project_id: ProjectId) -> Result<ProjectId> {
        perform(
            &self.store,
            KIND,
            Operation::Delete,
            self.repo.delete_project(project_id),
            |id: &ProjectId| ProjectAction::DeleteSuccess(*id),
        )
        .await
    }

    /// Select a project for editing
    pub fn target(&self, project: Project) {
        self.store.dispatch(ProjectAction::Target(project).into());
    }

    pub fn clear_target(&self) {
        self.store.dispatch(ProjectAction::ClearTarget.into());
    }
}
