//! services/api/src/web/uploads.rs
//!
//! Handlers for file uploads. Audio and video files are transcribed; text
//! files become their own transcript. The transcript is returned to the client
//! so it can drive document generation.

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

use capture_core::{
    domain::Upload,
    ports::{NewUpload, PortError},
};

use crate::adapters::sst::MAX_AUDIO_BYTES;
use crate::web::port_err;
use crate::web::state::AppState;

const AUDIO_TYPES: &[&str] = &[
    "audio/mpeg",
    "audio/wav",
    "audio/webm",
    "audio/mp4",
    "audio/m4a",
];
const VIDEO_TYPES: &[&str] = &["video/mp4", "video/webm", "video/quicktime"];
const TEXT_TYPES: &[&str] = &["text/plain", "text/markdown", "application/pdf"];

fn is_transcribable(content_type: &str) -> bool {
    AUDIO_TYPES.contains(&content_type) || VIDEO_TYPES.contains(&content_type)
}

fn is_accepted(content_type: &str) -> bool {
    is_transcribable(content_type) || TEXT_TYPES.contains(&content_type)
}

//=========================================================================================
// Response Types
//=========================================================================================

#[derive(Serialize, ToSchema)]
pub struct UploadResponse {
    pub id: Uuid,
    pub document_id: Option<Uuid>,
    pub file_name: String,
    pub file_type: String,
    pub file_url: String,
    pub transcript: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Upload> for UploadResponse {
    fn from(upload: Upload) -> Self {
        Self {
            id: upload.id,
            document_id: upload.document_id,
            file_name: upload.file_name,
            file_type: upload.file_type,
            file_url: upload.file_url,
            transcript: upload.transcript,
            created_at: upload.created_at,
        }
    }
}

//=========================================================================================
// Handlers
//=========================================================================================

/// Upload a file and extract its transcript.
///
/// Accepts a multipart/form-data request with a single file part. Audio and
/// video go through speech-to-text; text files are read as UTF-8.
#[utoipa::path(
    post,
    path = "/uploads",
    request_body(content_type = "multipart/form-data", description = "The file to upload."),
    responses(
        (status = 201, description = "Upload stored with its transcript", body = UploadResponse),
        (status = 422, description = "Unsupported type, oversized, or undecodable file"),
        (status = 429, description = "Collaborator rate limit"),
        (status = 503, description = "Collaborator unreachable")
    )
)]
pub async fn create_upload_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let field = multipart
        .next_field()
        .await
        .map_err(|e| {
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("Failed to read multipart data: {}", e),
            )
        })?
        .ok_or((
            StatusCode::UNPROCESSABLE_ENTITY,
            "Multipart form must include a file".to_string(),
        ))?;

    let file_name = field.file_name().unwrap_or("untitled").to_string();
    let content_type = field.content_type().unwrap_or("").to_string();
    if !is_accepted(&content_type) {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("'{}' is not a supported file type", content_type),
        ));
    }

    let data = field.bytes().await.map_err(|e| {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("Failed to read file bytes: {}", e),
        )
    })?;
    if data.len() > MAX_AUDIO_BYTES {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            "Maximum file size is 50MB".to_string(),
        ));
    }

    let transcript = if is_transcribable(&content_type) {
        state
            .with_deadline(state.sst_adapter.transcribe(&data, &file_name))
            .await
            .map_err(port_err)?
    } else {
        String::from_utf8(data.to_vec())
            .map_err(|_| {
                port_err(PortError::Validation(
                    "Text file is not valid UTF-8".to_string(),
                ))
            })?
    };

    // No object store is wired up; the URL records where the file would live.
    let file_url = format!("uploads/{}/{}", user_id, file_name);
    let upload = state
        .db
        .create_upload(
            user_id,
            NewUpload {
                file_name,
                file_type: content_type,
                file_url,
                transcript: Some(transcript),
            },
        )
        .await
        .map_err(port_err)?;

    info!("Stored upload {} for user {}", upload.id, user_id);
    Ok((StatusCode::CREATED, Json(UploadResponse::from(upload))))
}

/// List the user's uploads, most recent first.
#[utoipa::path(
    get,
    path = "/uploads",
    responses(
        (status = 200, description = "The user's uploads", body = [UploadResponse]),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_uploads_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let uploads = state.db.list_uploads(user_id).await.map_err(port_err)?;
    let response: Vec<UploadResponse> = uploads.into_iter().map(Into::into).collect();
    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audio_and_video_types_are_transcribable() {
        assert!(is_transcribable("audio/webm"));
        assert!(is_transcribable("video/quicktime"));
        assert!(!is_transcribable("text/plain"));
    }

    #[test]
    fn unsupported_types_are_rejected() {
        assert!(!is_accepted("application/zip"));
        assert!(!is_accepted("image/png"));
        assert!(is_accepted("text/markdown"));
    }
}
