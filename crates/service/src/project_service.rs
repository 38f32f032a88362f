use chrono::Utc;
use serde_json::{Map, Value};
use tracing::{info, instrument};

use models::project::NewProject;
use models::{ids, Collection, Project, Task};

use crate::data_store::{take_by_id, DataStore};
use crate::errors::ServiceError;

/// Result of deleting a project together with its tasks.
#[derive(Debug, Clone)]
pub struct ProjectRemoval {
    pub project: Project,
    pub removed_tasks: usize,
}

pub async fn list_projects(store: &DataStore) -> Result<Vec<Project>, ServiceError> {
    store.list::<Project>().await
}

pub async fn get_project(store: &DataStore, raw_id: &str) -> Result<Project, ServiceError> {
    store.find::<Project>(raw_id).await
}

/// Create a project from a request body; only `name` is required.
#[instrument(skip_all)]
pub async fn create_project(store: &DataStore, body: &Map<String, Value>) -> Result<Project, ServiceError> {
    let input = NewProject::from_body(body)?;
    let now = Utc::now();
    store.insert(|_, id| Ok(input.into_project(id, now)?)).await
}

pub async fn update_project(store: &DataStore, raw_id: &str, patch: &Map<String, Value>) -> Result<Project, ServiceError> {
    store.patch::<Project>(raw_id, patch).await
}

/// Delete a project and every task pointing at it.
///
/// When the project does not exist nothing is removed, tasks included.
#[instrument(skip(store))]
pub async fn delete_project(store: &DataStore, raw_id: &str) -> Result<ProjectRemoval, ServiceError> {
    let id = ids::parse_id(raw_id).ok_or_else(|| ServiceError::missing(Collection::Projects))?;
    let removal = store
        .mutate(|doc, _| {
            let project = take_by_id::<Project>(doc, id).ok_or_else(|| ServiceError::missing(Collection::Projects))?;
            let before = doc.tasks.len();
            doc.tasks.retain(|t: &Task| t.project_id != id);
            Ok(ProjectRemoval { project, removed_tasks: before - doc.tasks.len() })
        })
        .await?;
    info!(project_id = id, removed_tasks = removal.removed_tasks, "project deleted");
    Ok(removal)
}
