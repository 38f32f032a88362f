use serde_json::{Map, Value};
use tracing::instrument;

use models::task::NewTask;
use models::{ids, Task};

use crate::data_store::DataStore;
use crate::errors::ServiceError;

/// List tasks, optionally only those of one project.
///
/// An empty filter lists everything; a filter that is not a number matches
/// nothing. Insertion order is kept.
pub async fn list_tasks(store: &DataStore, project_id: Option<&str>) -> Result<Vec<Task>, ServiceError> {
    let filter = project_id.map(str::trim).filter(|s| !s.is_empty());
    let Some(raw) = filter else {
        return store.list::<Task>().await;
    };
    let Some(pid) = ids::parse_id(raw) else {
        return Ok(Vec::new());
    };
    store
        .read(|doc| doc.tasks.iter().filter(|t| t.project_id == pid).cloned().collect())
        .await
}

pub async fn get_task(store: &DataStore, raw_id: &str) -> Result<Task, ServiceError> {
    store.find::<Task>(raw_id).await
}

/// `title`, `status` and `projectId` are required; the project is not checked.
#[instrument(skip_all)]
pub async fn create_task(store: &DataStore, body: &Map<String, Value>) -> Result<Task, ServiceError> {
    let input = NewTask::from_body(body)?;
    store.insert(|_, id| Ok(input.into_task(id)?)).await
}

pub async fn update_task(store: &DataStore, raw_id: &str, patch: &Map<String, Value>) -> Result<Task, ServiceError> {
    store.patch::<Task>(raw_id, patch).await
}

pub async fn delete_task(store: &DataStore, raw_id: &str) -> Result<Task, ServiceError> {
    store.remove::<Task>(raw_id).await
}
