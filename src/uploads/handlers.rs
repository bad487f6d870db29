use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    routing::post,
    Json, Router,
};
use tracing::{instrument, warn};

use crate::{
    auth::services::AdminUser,
    error::{ApiError, ApiResult},
    state::AppState,
    uploads::services::{store_files, UploadItem, UploadResponse},
};

const FILE_FIELDS: &[&str] = &["files", "files[]", "file"];

pub fn upload_routes() -> Router<AppState> {
    Router::new()
        .route("/upload", post(upload_files))
        .layer(DefaultBodyLimit::max(20 * 1024 * 1024)) // 20MB
}

/// POST /upload (multipart), fields `files`, `files[]` or `file`.
#[instrument(skip(state, mp))]
pub async fn upload_files(
    State(state): State<AppState>,
    _admin: AdminUser,
    mut mp: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    let mut items = Vec::new();
    loop {
        let field = match mp.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "malformed multipart body");
                return Err(ApiError::validation("Invalid multipart data"));
            }
        };
        if !field.name().is_some_and(|n| FILE_FIELDS.contains(&n)) {
            continue;
        }
        let original_name = field.file_name().unwrap_or("unnamed").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let body = field
            .bytes()
            .await
            .map_err(|e| ApiError::validation(format!("Failed to read {original_name}: {e}")))?;
        items.push(UploadItem {
            original_name,
            content_type,
            body,
        });
    }

    Ok(Json(store_files(state.storage.as_ref(), items).await?))
}
