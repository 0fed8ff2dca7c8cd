//! services/api/src/web/transcription.rs
//!
//! Handler for transcribing base64 audio captured by the voice recorder.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::adapters::sst::decode_base64_chunks;
use crate::web::port_err;
use crate::web::state::AppState;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct TranscribeRequest {
    /// Base64-encoded audio, as produced by the browser's media recorder.
    pub audio: String,
}

#[derive(Serialize, ToSchema)]
pub struct TranscribeResponse {
    pub text: String,
}

//=========================================================================================
// Handler
//=========================================================================================

/// Transcribe a base64 audio payload into plain text.
#[utoipa::path(
    post,
    path = "/transcriptions",
    request_body = TranscribeRequest,
    responses(
        (status = 200, description = "The transcript", body = TranscribeResponse),
        (status = 422, description = "Invalid base64 or oversized payload"),
        (status = 429, description = "Collaborator rate limit"),
        (status = 503, description = "Collaborator unreachable")
    )
)]
pub async fn transcribe_handler(
    State(state): State<Arc<AppState>>,
    Extension(_user_id): Extension<Uuid>,
    Json(req): Json<TranscribeRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let audio = decode_base64_chunks(&req.audio).map_err(port_err)?;

    // Recordings arrive as webm from the browser recorder.
    let text = state
        .with_deadline(state.sst_adapter.transcribe(&audio, "audio.webm"))
        .await
        .map_err(port_err)?;

    Ok(Json(TranscribeResponse { text }))
}
