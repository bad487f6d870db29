use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::services::AdminUser,
    error::{ApiError, ApiResult},
    forms::{parse_id, ApiJson, MessageResponse},
    leetcode::{
        dto::{LeetcodeRequest, ScrapeRequest, ScrapeResponse},
        repo_types::LeetcodeSolution,
        scrape, services,
    },
    state::AppState,
};

pub fn leetcode_routes() -> Router<AppState> {
    Router::new()
        .route("/leetcode", get(list_solutions).post(create_solution))
        .route("/leetcode/scrape", post(scrape_problem))
        .route(
            "/leetcode/:id",
            get(get_solution).put(update_solution).delete(delete_solution),
        )
}

#[instrument(skip(state))]
pub async fn list_solutions(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<LeetcodeSolution>>> {
    Ok(Json(services::list_solutions(state.leetcode.as_ref()).await?))
}

#[instrument(skip(state))]
pub async fn get_solution(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<LeetcodeSolution>> {
    let id = parse_id(&id, "Solution")?;
    Ok(Json(services::get_solution(state.leetcode.as_ref(), id).await?))
}

#[instrument(skip(state, payload))]
pub async fn create_solution(
    State(state): State<AppState>,
    _admin: AdminUser,
    ApiJson(payload): ApiJson<LeetcodeRequest>,
) -> ApiResult<(StatusCode, Json<LeetcodeSolution>)> {
    let created = services::create_solution(state.leetcode.as_ref(), payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[instrument(skip(state, payload))]
pub async fn update_solution(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<LeetcodeRequest>,
) -> ApiResult<Json<LeetcodeSolution>> {
    let id = parse_id(&id, "Solution")?;
    Ok(Json(
        services::update_solution(state.leetcode.as_ref(), id, payload).await?,
    ))
}

#[instrument(skip(state))]
pub async fn delete_solution(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let id = parse_id(&id, "Solution")?;
    services::delete_solution(state.leetcode.as_ref(), id).await?;
    Ok(Json(MessageResponse::deleted("Solution")))
}

#[instrument(skip(state))]
pub async fn scrape_problem(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ScrapeRequest>,
) -> ApiResult<Json<ScrapeResponse>> {
    let url = payload
        .url
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| ApiError::validation("url is required"))?;
    let timeout = Duration::from_secs(state.config.scrape_timeout_secs);
    Ok(Json(scrape::scrape_problem(&state.http, &url, timeout).await?))
}
