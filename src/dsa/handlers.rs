use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::services::AdminUser,
    dsa::{dto::DsaRequest, repo_types::DsaPost, services},
    error::ApiResult,
    forms::{parse_id, ApiJson, MessageResponse},
    state::AppState,
};

pub fn dsa_routes() -> Router<AppState> {
    Router::new()
        .route("/dsa", get(list_posts).post(create_post))
        .route("/dsa/slug/:slug", get(get_post_by_slug))
        .route("/dsa/:id", get(get_post).put(update_post).delete(delete_post))
}

#[instrument(skip(state))]
pub async fn list_posts(State(state): State<AppState>) -> ApiResult<Json<Vec<DsaPost>>> {
    Ok(Json(services::list_posts(state.dsa.as_ref()).await?))
}

#[instrument(skip(state))]
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DsaPost>> {
    let id = parse_id(&id, "Post")?;
    Ok(Json(services::get_post(state.dsa.as_ref(), id).await?))
}

#[instrument(skip(state))]
pub async fn get_post_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<DsaPost>> {
    Ok(Json(services::get_post_by_slug(state.dsa.as_ref(), &slug).await?))
}

#[instrument(skip(state, payload))]
pub async fn create_post(
    State(state): State<AppState>,
    _admin: AdminUser,
    ApiJson(payload): ApiJson<DsaRequest>,
) -> ApiResult<(StatusCode, Json<DsaPost>)> {
    let post = services::create_post(state.dsa.as_ref(), payload).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

#[instrument(skip(state, payload))]
pub async fn update_post(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<DsaRequest>,
) -> ApiResult<Json<DsaPost>> {
    let id = parse_id(&id, "Post")?;
    Ok(Json(services::update_post(state.dsa.as_ref(), id, payload).await?))
}

#[instrument(skip(state))]
pub async fn delete_post(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let id = parse_id(&id, "Post")?;
    services::delete_post(state.dsa.as_ref(), id).await?;
    Ok(Json(MessageResponse::deleted("Post")))
}
