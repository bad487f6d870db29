use axum::{extract::State, routing::post, Json, Router};
use tracing::{instrument, warn};

use crate::{
    chat::{
        dto::{ChatRequest, ChatResponse},
        services::{complete, validate_message, ClientIp},
    },
    error::{ApiError, ApiResult},
    forms::ApiJson,
    state::AppState,
};

pub fn chat_routes() -> Router<AppState> {
    Router::new().route("/chat", post(chat))
}

#[instrument(skip(state, payload))]
pub async fn chat(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    payload: Result<ApiJson<ChatRequest>, ApiError>,
) -> ApiResult<Json<ChatResponse>> {
    if !state.rate_limiter.check(&ip).await {
        warn!(%ip, "chat rate limit exceeded");
        return Err(ApiError::RateLimited);
    }

    let ApiJson(payload) = payload?;

    let message = validate_message(payload.message)?;
    let reply = complete(
        &state.http,
        &state.config.chat,
        &message,
        payload.context.as_deref(),
    )
    .await?;
    Ok(Json(ChatResponse { reply }))
}
