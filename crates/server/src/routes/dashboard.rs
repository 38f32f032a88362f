use axum::{extract::State, Json};

use service::dashboard_service::{self, DashboardSummary};

use crate::{errors::JsonApiError, extract::QueryParams, state::ServerState};

#[derive(Debug, Default, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DashboardQuery {
    /// Viewer; managers and an absent viewer see everything
    #[param(rename = "userId")]
    pub user_id: Option<String>,
}

impl From<&QueryParams> for DashboardQuery {
    fn from(params: &QueryParams) -> Self {
        Self { user_id: params.first("userId").map(str::to_owned) }
    }
}

#[utoipa::path(
    get, path = "/dashboard", tag = "dashboard",
    params(DashboardQuery),
    responses((status = 200, description = "Progress summary"), (status = 404, description = "Unknown viewer"))
)]
pub async fn summary(
    State(state): State<ServerState>,
    params: QueryParams,
) -> Result<Json<DashboardSummary>, JsonApiError> {
    let q = DashboardQuery::from(&params);
    let summary = dashboard_service::summarize(&state.store, q.user_id.as_deref()).await?;
    Ok(Json(summary))
}
