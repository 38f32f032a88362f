use axum::{extract::{Path, State}, http::StatusCode, Json};
use tracing::info;

use common::types::OkBody;
use models::Project;
use service::project_service;

use crate::{errors::JsonApiError, extract::JsonBody, state::ServerState};

#[utoipa::path(
    get, path = "/projects", tag = "projects",
    responses((status = 200, description = "All projects"))
)]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<Project>>, JsonApiError> {
    let items = project_service::list_projects(&state.store).await?;
    Ok(Json(items))
}

#[utoipa::path(
    get, path = "/projects/{id}", tag = "projects",
    params(("id" = String, Path, description = "Project id")),
    responses((status = 200, description = "OK"), (status = 404, description = "Not Found"))
)]
pub async fn get(State(state): State<ServerState>, Path(id): Path<String>) -> Result<Json<Project>, JsonApiError> {
    Ok(Json(project_service::get_project(&state.store, &id).await?))
}

#[utoipa::path(
    post, path = "/projects", tag = "projects",
    request_body = crate::openapi::CreateProjectDoc,
    responses((status = 201, description = "Created"), (status = 400, description = "name required"))
)]
pub async fn create(
    State(state): State<ServerState>,
    JsonBody(body): JsonBody,
) -> Result<(StatusCode, Json<Project>), JsonApiError> {
    let project = project_service::create_project(&state.store, &body).await?;
    info!(id = project.id, name = %project.name, "created project");
    Ok((StatusCode::CREATED, Json(project)))
}

#[utoipa::path(
    patch, path = "/projects/{id}", tag = "projects",
    params(("id" = String, Path, description = "Project id")),
    request_body = crate::openapi::PatchDoc,
    responses((status = 200, description = "Merged record"), (status = 404, description = "Not Found"))
)]
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    JsonBody(patch): JsonBody,
) -> Result<Json<Project>, JsonApiError> {
    Ok(Json(project_service::update_project(&state.store, &id, &patch).await?))
}

#[utoipa::path(
    delete, path = "/projects/{id}", tag = "projects",
    params(("id" = String, Path, description = "Project id")),
    responses((status = 200, description = "Deleted with its tasks"), (status = 404, description = "Not Found"))
)]
pub async fn delete(State(state): State<ServerState>, Path(id): Path<String>) -> Result<Json<OkBody>, JsonApiError> {
    let removal = project_service::delete_project(&state.store, &id).await?;
    info!(id = removal.project.id, removed_tasks = removal.removed_tasks, "deleted project");
    Ok(Json(OkBody::default()))
}
