use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::services::AdminUser,
    error::ApiResult,
    forms::{parse_id, ApiJson, MessageResponse},
    projects::{
        dto::ProjectRequest,
        repo_types::Project,
        services,
    },
    state::AppState,
};

pub fn project_routes() -> Router<AppState> {
    Router::new()
        .route("/projects", get(list_projects).post(create_project))
        .route(
            "/projects/:key",
            get(get_project).put(update_project).delete(delete_project),
        )
}

#[instrument(skip(state))]
pub async fn list_projects(State(state): State<AppState>) -> ApiResult<Json<Vec<Project>>> {
    Ok(Json(services::list_projects(state.projects.as_ref()).await?))
}

/// `key` is an id or a slug.
#[instrument(skip(state))]
pub async fn get_project(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<Json<Project>> {
    Ok(Json(services::get_project(state.projects.as_ref(), &key).await?))
}

#[instrument(skip(state, payload))]
pub async fn create_project(
    State(state): State<AppState>,
    _admin: AdminUser,
    ApiJson(payload): ApiJson<ProjectRequest>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    let project = services::create_project(state.projects.as_ref(), payload).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

#[instrument(skip(state, payload))]
pub async fn update_project(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(key): Path<String>,
    ApiJson(payload): ApiJson<ProjectRequest>,
) -> ApiResult<Json<Project>> {
    let id = parse_id(&key, "Project")?;
    Ok(Json(
        services::update_project(state.projects.as_ref(), id, payload).await?,
    ))
}

#[instrument(skip(state))]
pub async fn delete_project(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(key): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let id = parse_id(&key, "Project")?;
    services::delete_project(state.projects.as_ref(), id).await?;
    Ok(Json(MessageResponse::deleted("Project")))
}
