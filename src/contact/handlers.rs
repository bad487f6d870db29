use axum::{routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::{
    auth::services::is_valid_email,
    error::{ApiError, ApiResult},
    forms::{require_text, ApiJson},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub success: bool,
}

pub fn contact_routes() -> Router<AppState> {
    Router::new().route("/contact", post(submit_contact))
}

#[instrument(skip(payload))]
pub async fn submit_contact(
    ApiJson(payload): ApiJson<ContactRequest>,
) -> ApiResult<Json<ContactResponse>> {
    let name = require_text("name", payload.name)?;
    let email = require_text("email", payload.email)?;
    let subject = require_text("subject", payload.subject)?;
    let message = require_text("message", payload.message)?;
    if !is_valid_email(email.trim()) {
        return Err(ApiError::validation("email is not a valid address"));
    }

    info!(
        name = %name.trim(),
        email = %email.trim(),
        subject = %subject.trim(),
        message_len = message.len(),
        "contact message received"
    );
    Ok(Json(ContactResponse { success: true }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ContactRequest {
        ContactRequest {
            name: Some("Ada".into()),
            email: Some("ada@example.com".into()),
            subject: Some("Hello".into()),
            message: Some("Nice site".into()),
        }
    }

    #[tokio::test]
    async fn accepts_complete_messages() {
        let Json(res) = submit_contact(ApiJson(request())).await.unwrap();
        assert!(res.success);
    }

    #[tokio::test]
    async fn rejects_missing_fields_and_bad_email() {
        for req in [
            ContactRequest { name: None, ..request() },
            ContactRequest { subject: Some(" ".into()), ..request() },
            ContactRequest { message: None, ..request() },
            ContactRequest { email: Some("not-an-email".into()), ..request() },
        ] {
            let err = submit_contact(ApiJson(req)).await.unwrap_err();
            assert!(matches!(err, ApiError::Validation(_)));
        }
    }
}
