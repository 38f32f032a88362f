use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct CreateProjectDoc {
    pub name: String,
    pub description: Option<String>,
}

#[derive(ToSchema)]
pub struct CreateTaskDoc {
    pub title: String,
    /// todo | doing | done
    pub status: String,
    #[schema(rename = "projectId")]
    pub project_id: u64,
    pub assignee: Option<String>,
}

#[derive(ToSchema)]
pub struct RegisterUserDoc {
    pub name: String,
    pub email: String,
    pub password: String,
    /// manager | user
    pub role: String,
}

/// Any subset of the record's fields; each one given replaces the stored value.
#[derive(ToSchema)]
pub struct PatchDoc {
    #[schema(value_type = Object)]
    pub fields: serde_json::Value,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::projects::list,
        crate::routes::projects::get,
        crate::routes::projects::create,
        crate::routes::projects::update,
        crate::routes::projects::delete,
        crate::routes::tasks::list,
        crate::routes::tasks::get,
        crate::routes::tasks::create,
        crate::routes::tasks::update,
        crate::routes::tasks::delete,
        crate::routes::users::list,
        crate::routes::users::get,
        crate::routes::users::create,
        crate::routes::dashboard::summary,
    ),
    components(
        schemas(
            HealthResponse,
            CreateProjectDoc,
            CreateTaskDoc,
            RegisterUserDoc,
            PatchDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "projects"),
        (name = "tasks"),
        (name = "users"),
        (name = "dashboard")
    )
)]
pub struct ApiDoc;
