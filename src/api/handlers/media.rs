// Copyright (c) Microblog Team
// SPDX-License-Identifier: Apache-2.0

use anyhow::anyhow;
use axum::extract::{Multipart, Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::{json, Value};
use tracing::info;

use crate::api::{ApiKey, AppState};
use crate::error::ApiError;
use crate::metrics;
use crate::store;

/// Accept a multipart upload, persist the blob under the uploader's
/// namespace and register its metadata row.
pub async fn upload_media(
    State(state): State<AppState>,
    ApiKey(key): ApiKey,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let user = state.identity.resolve(&key).await?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Internal(anyhow!("invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let original_name = field
            .file_name()
            .map(str::to_string)
            .unwrap_or_else(|| "upload".to_string());
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::Internal(anyhow!("failed to read upload: {e}")))?;

        let storage_path = state.blobs.store(user.id, &original_name, &data).await?;

        let mut conn = state.db.get_connection().await?;
        let media_id = store::media::save_media(&mut conn, user.id, &storage_path).await?;

        metrics::MEDIA_UPLOADED.inc();
        info!("user {} uploaded media {} at {}", user.id, media_id, storage_path);
        return Ok(Json(json!({
            "result": true,
            "media_id": media_id,
        })));
    }

    Err(ApiError::reference_not_found("Multipart field `file`"))
}

/// Serve a stored blob back as an attachment. No credential required.
pub async fn get_media_file(
    State(state): State<AppState>,
    Path((user_id, file_name)): Path<(i32, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let bytes = state.blobs.open(user_id, &file_name).await?;
    Ok((
        [(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{file_name}\""),
        )],
        bytes,
    ))
}
