use axum::{extract::{Path, State}, http::StatusCode, Json};

use common::types::OkBody;
use models::Task;
use service::task_service;

use crate::{errors::JsonApiError, extract::{JsonBody, QueryParams}, state::ServerState};

#[derive(Debug, Default, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TaskQuery {
    /// Only tasks of this project
    #[param(rename = "projectId")]
    pub project_id: Option<String>,
}

impl From<&QueryParams> for TaskQuery {
    fn from(params: &QueryParams) -> Self {
        Self { project_id: params.first("projectId").map(str::to_owned) }
    }
}

#[utoipa::path(
    get, path = "/tasks", tag = "tasks",
    params(TaskQuery),
    responses((status = 200, description = "Tasks in insertion order"))
)]
pub async fn list(State(state): State<ServerState>, params: QueryParams) -> Result<Json<Vec<Task>>, JsonApiError> {
    let q = TaskQuery::from(&params);
    let items = task_service::list_tasks(&state.store, q.project_id.as_deref()).await?;
    Ok(Json(items))
}

#[utoipa::path(
    get, path = "/tasks/{id}", tag = "tasks",
    params(("id" = String, Path, description = "Task id")),
    responses((status = 200, description = "OK"), (status = 404, description = "Not Found"))
)]
pub async fn get(State(state): State<ServerState>, Path(id): Path<String>) -> Result<Json<Task>, JsonApiError> {
    Ok(Json(task_service::get_task(&state.store, &id).await?))
}

#[utoipa::path(
    post, path = "/tasks", tag = "tasks",
    request_body = crate::openapi::CreateTaskDoc,
    responses((status = 201, description = "Created"), (status = 400, description = "title, status, projectId required"))
)]
pub async fn create(
    State(state): State<ServerState>,
    JsonBody(body): JsonBody,
) -> Result<(StatusCode, Json<Task>), JsonApiError> {
    let task = task_service::create_task(&state.store, &body).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

#[utoipa::path(
    patch, path = "/tasks/{id}", tag = "tasks",
    params(("id" = String, Path, description = "Task id")),
    request_body = crate::openapi::PatchDoc,
    responses((status = 200, description = "Merged record"), (status = 400, description = "Invalid field"), (status = 404, description = "Not Found"))
)]
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    JsonBody(patch): JsonBody,
) -> Result<Json<Task>, JsonApiError> {
    Ok(Json(task_service::update_task(&state.store, &id, &patch).await?))
}

#[utoipa::path(
    delete, path = "/tasks/{id}", tag = "tasks",
    params(("id" = String, Path, description = "Task id")),
    responses((status = 200, description = "Deleted"), (status = 404, description = "Not Found"))
)]
pub async fn delete(State(state): State<ServerState>, Path(id): Path<String>) -> Result<Json<OkBody>, JsonApiError> {
    task_service::delete_task(&state.store, &id).await?;
    Ok(Json(OkBody::default()))
}
