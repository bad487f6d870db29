use std::convert::Infallible;
use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::{request::Parts, HeaderMap},
};
use tracing::error;

use crate::chat::dto::{CompletionMessage, CompletionRequest, CompletionResponse};
use crate::config::ChatConfig;
use crate::error::{ApiError, ApiResult};

pub const MAX_MESSAGE_CHARS: usize = 2000;

const SYSTEM_PROMPT: &str = "You are the assistant on a software developer's portfolio site. \
    Answer visitors' questions about the developer's projects, skills and writing concisely.";

/// Caller address used as the rate-limit key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub String);

pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(',').next().unwrap_or("").trim().to_string())
            .filter(|v| !v.is_empty())
    };
    header("x-forwarded-for")
        .or_else(|| header("x-real-ip"))
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}

#[async_trait]
impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);
        Ok(ClientIp(client_ip(&parts.headers, peer)))
    }
}

/// Trimmed message, or a validation error.
pub fn validate_message(message: Option<String>) -> ApiResult<String> {
    let message = message.unwrap_or_default().trim().to_string();
    if message.is_empty() {
        return Err(ApiError::validation("message is required"));
    }
    if message.chars().count() > MAX_MESSAGE_CHARS {
        return Err(ApiError::validation(format!(
            "message must be at most {MAX_MESSAGE_CHARS} characters"
        )));
    }
    Ok(message)
}

/// Sends one question to the completion endpoint and returns the answer text.
pub async fn complete(
    http: &reqwest::Client,
    config: &ChatConfig,
    message: &str,
    context: Option<&str>,
) -> ApiResult<String> {
    let api_key = config
        .api_key
        .as_deref()
        .ok_or_else(|| ApiError::Upstream("Chat is not configured".into()))?;

    let system = match context.map(str::trim).filter(|c| !c.is_empty()) {
        Some(ctx) => format!("{SYSTEM_PROMPT}\n\nContext:\n{ctx}"),
        None => SYSTEM_PROMPT.to_string(),
    };
    let body = CompletionRequest {
        model: &config.model,
        messages: vec![
            CompletionMessage {
                role: "system",
                content: &system,
            },
            CompletionMessage {
                role: "user",
                content: message,
            },
        ],
    };

    let response = http
        .post(&config.api_url)
        .bearer_auth(api_key)
        .timeout(Duration::from_secs(config.timeout_secs))
        .json(&body)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| {
            error!(error = %e, "chat completion request failed");
            ApiError::Upstream("Failed to get a reply".into())
        })?;

    let parsed: CompletionResponse = response.json().await.map_err(|e| {
        error!(error = %e, "chat completion response unreadable");
        ApiError::Upstream("Failed to get a reply".into())
    })?;

    parsed
        .choices
        .into_iter()
        .find_map(|c| c.message.content)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::Upstream("Empty reply from chat model".into()))
}
