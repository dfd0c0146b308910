//! Project endpoints

use async_trait::async_trait;

use super::ApiClient;
use crate::error::Result;
use crate::repository::ProjectRepository;
use crate::types::{NewProject, Project, ProjectEdits, ProjectId, UserId};

#[async_trait]
impl ProjectRepository for ApiClient {
    async fn list_projects(&self, user_id: UserId) -> Result<Vec<Project>> {
        self.get(&format!("/projects/user/{}", user_id)).await
    }

    async fn get_project(&self, project_id: ProjectId) -> Result<Project> {
        self.get(&format!("/projects/{}", project_id)).await
    }

    async fn create_project(&self, project: &NewProject) -> Result<Project> {
        self.post("/projects", project).await
    }

    async fn update_project(&self, project_id: ProjectId, edits: &ProjectEdits) -> Result<Project> {
        self.put(&format!("/projects/{}", project_id), edits).await
    }

    async fn delete_project(&self, project_id: ProjectId) -> Result<ProjectId> {
        // The server's delete body varies (count, message, record); success
        // status is the confirmation, so report the id that was asked for.
        self.delete(&format!("/projects/{}", project_id)).await?;
        Ok(project_id)
    }
}
