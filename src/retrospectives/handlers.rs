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
    retrospectives::{dto::RetrospectiveRequest, repo_types::RetrospectivePost, services},
    state::AppState,
};

pub fn retrospective_routes() -> Router<AppState> {
    Router::new()
        .route("/retrospective", get(list_posts).post(create_post))
        .route(
            "/retrospective/:id",
            get(get_post).put(update_post).delete(delete_post),
        )
}

#[instrument(skip(state))]
pub async fn list_posts(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<RetrospectivePost>>> {
    Ok(Json(services::list_posts(state.retrospectives.as_ref()).await?))
}

#[instrument(skip(state))]
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<RetrospectivePost>> {
    let id = parse_id(&id, "Retrospective")?;
    Ok(Json(services::get_post(state.retrospectives.as_ref(), id).await?))
}

#[instrument(skip(state, payload))]
pub async fn create_post(
    State(state): State<AppState>,
    _admin: AdminUser,
    ApiJson(payload): ApiJson<RetrospectiveRequest>,
) -> ApiResult<(StatusCode, Json<RetrospectivePost>)> {
    let post = services::create_post(state.retrospectives.as_ref(), payload).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

#[instrument(skip(state, payload))]
pub async fn update_post(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<RetrospectiveRequest>,
) -> ApiResult<Json<RetrospectivePost>> {
    let id = parse_id(&id, "Retrospective")?;
    Ok(Json(
        services::update_post(state.retrospectives.as_ref(), id, payload).await?,
    ))
}

#[instrument(skip(state))]
pub async fn delete_post(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let id = parse_id(&id, "Retrospective")?;
    services::delete_post(state.retrospectives.as_ref(), id).await?;
    Ok(Json(MessageResponse::deleted("Retrospective")))
}
