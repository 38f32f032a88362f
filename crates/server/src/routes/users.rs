use axum::{extract::{Path, State}, http::StatusCode, Json};
use tracing::info;

use models::User;
use service::user_service;

use crate::{errors::JsonApiError, extract::{JsonBody, QueryParams}, state::ServerState};

#[derive(Debug, Default, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserQuery {
    /// Case-insensitive substring of the email
    pub email: Option<String>,
}

impl From<&QueryParams> for UserQuery {
    fn from(params: &QueryParams) -> Self {
        Self { email: params.first("email").map(str::to_owned) }
    }
}

#[utoipa::path(
    get, path = "/users", tag = "users",
    params(UserQuery),
    responses((status = 200, description = "Users"))
)]
pub async fn list(State(state): State<ServerState>, params: QueryParams) -> Result<Json<Vec<User>>, JsonApiError> {
    let q = UserQuery::from(&params);
    let items = user_service::list_users(&state.store, q.email.as_deref()).await?;
    Ok(Json(items))
}

#[utoipa::path(
    get, path = "/users/{id}", tag = "users",
    params(("id" = String, Path, description = "User id")),
    responses((status = 200, description = "OK"), (status = 404, description = "Not Found"))
)]
pub async fn get(State(state): State<ServerState>, Path(id): Path<String>) -> Result<Json<User>, JsonApiError> {
    Ok(Json(user_service::get_user(&state.store, &id).await?))
}

#[utoipa::path(
    post, path = "/users", tag = "users",
    request_body = crate::openapi::RegisterUserDoc,
    responses(
        (status = 201, description = "Registered"),
        (status = 400, description = "Missing fields"),
        (status = 409, description = "Email already exists")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    JsonBody(body): JsonBody,
) -> Result<(StatusCode, Json<User>), JsonApiError> {
    let user = user_service::create_user(&state.store, &body).await?;
    info!(id = user.id, role = %user.role, "registered user");
    Ok((StatusCode::CREATED, Json(user)))
}
