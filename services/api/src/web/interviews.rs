//! services/api/src/web/interviews.rs
//!
//! Handlers for guided interview sessions: start, turn, and generation.
//!
//! The message log is only persisted after a successful collaborator reply, so
//! a failed turn leaves the stored conversation exactly as it was.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

use capture_core::{
    domain::{ChatMessage, DocumentKind, GenerationSource, InterviewSession, MessageRole},
    interview,
    ports::NewDocument,
};

use crate::web::documents::{parse_kind, DocumentResponse};
use crate::web::port_err;
use crate::web::state::AppState;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct StartInterviewRequest {
    pub topic: String,
    /// Wire name of the target document kind; defaults to `general`.
    pub kind: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct InterviewTurnRequest {
    pub message: String,
}

#[derive(Serialize, ToSchema)]
pub struct ChatMessageResponse {
    pub role: String,
    pub content: String,
}

impl From<&ChatMessage> for ChatMessageResponse {
    fn from(m: &ChatMessage) -> Self {
        Self {
            role: match m.role {
                MessageRole::User => "user".to_string(),
                MessageRole::Assistant => "assistant".to_string(),
            },
            content: m.content.clone(),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct InterviewResponse {
    pub id: Uuid,
    pub topic: String,
    pub target_kind: String,
    pub messages: Vec<ChatMessageResponse>,
    pub status: String,
    pub document_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<InterviewSession> for InterviewResponse {
    fn from(session: InterviewSession) -> Self {
        Self {
            id: session.id,
            topic: session.topic,
            target_kind: session.target_kind.as_str().to_string(),
            messages: session.messages.iter().map(Into::into).collect(),
            status: session.status.as_str().to_string(),
            document_id: session.document_id,
            created_at: session.created_at,
            updated_at: session.updated_at,
        }
    }
}

//=========================================================================================
// Handlers
//=========================================================================================

/// Start an interview: create the session and ask the opening question.
#[utoipa::path(
    post,
    path = "/interviews",
    request_body = StartInterviewRequest,
    responses(
        (status = 201, description = "Session started with the opening question", body = InterviewResponse),
        (status = 422, description = "Blank topic or unknown kind"),
        (status = 429, description = "Collaborator rate limit"),
        (status = 503, description = "Collaborator unreachable")
    )
)]
pub async fn start_interview_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Json(req): Json<StartInterviewRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if req.topic.trim().is_empty() {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            "A topic is required".to_string(),
        ));
    }
    let kind = req
        .kind
        .as_deref()
        .map(parse_kind)
        .transpose()?
        .unwrap_or(DocumentKind::General);

    let mut session = state
        .db
        .create_interview(user_id, req.topic.trim(), kind)
        .await
        .map_err(port_err)?;

    // A failed opening question leaves the session with an empty log; the
    // client can retry the turn without recreating the session.
    let opening = state
        .with_deadline(
            state
                .interview_adapter
                .next_question(&session.topic, kind, &[]),
        )
        .await
        .map_err(port_err)?;

    session.messages = vec![ChatMessage::assistant(opening)];
    state
        .db
        .update_interview_messages(session.id, user_id, &session.messages)
        .await
        .map_err(port_err)?;

    info!("Started interview {} for user {}", session.id, user_id);
    Ok((StatusCode::CREATED, Json(InterviewResponse::from(session))))
}

/// Fetch an interview session with its full message log.
#[utoipa::path(
    get,
    path = "/interviews/{id}",
    params(("id" = Uuid, Path, description = "The session id")),
    responses(
        (status = 200, description = "The session", body = InterviewResponse),
        (status = 404, description = "No such session for this user")
    )
)]
pub async fn get_interview_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let session = state.db.get_interview(id, user_id).await.map_err(port_err)?;
    Ok(Json(InterviewResponse::from(session)))
}

/// Answer the interviewer and receive the next question.
#[utoipa::path(
    post,
    path = "/interviews/{id}/messages",
    params(("id" = Uuid, Path, description = "The session id")),
    request_body = InterviewTurnRequest,
    responses(
        (status = 200, description = "The session including the new exchange", body = InterviewResponse),
        (status = 404, description = "No such session for this user"),
        (status = 409, description = "Session already completed"),
        (status = 422, description = "Blank message"),
        (status = 429, description = "Collaborator rate limit"),
        (status = 503, description = "Collaborator unreachable")
    )
)]
pub async fn interview_turn_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(id): Path<Uuid>,
    Json(req): Json<InterviewTurnRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if req.message.trim().is_empty() {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            "A message is required".to_string(),
        ));
    }

    let mut session = state.db.get_interview(id, user_id).await.map_err(port_err)?;
    interview::ensure_in_progress(&session).map_err(port_err)?;

    // Build the candidate log in memory; nothing is persisted until the
    // collaborator answers.
    session.messages.push(ChatMessage::user(req.message));
    let reply = state
        .with_deadline(state.interview_adapter.next_question(
            &session.topic,
            session.target_kind,
            &session.messages,
        ))
        .await
        .map_err(port_err)?;

    session.messages.push(ChatMessage::assistant(reply));
    state
        .db
        .update_interview_messages(session.id, user_id, &session.messages)
        .await
        .map_err(port_err)?;

    Ok(Json(InterviewResponse::from(session)))
}

/// Generate a document from the interview and complete the session.
#[utoipa::path(
    post,
    path = "/interviews/{id}/generate",
    params(("id" = Uuid, Path, description = "The session id")),
    responses(
        (status = 201, description = "Generated document", body = DocumentResponse),
        (status = 404, description = "No such session for this user"),
        (status = 409, description = "Session already completed"),
        (status = 422, description = "Not enough conversation yet"),
        (status = 429, description = "Collaborator rate limit"),
        (status = 503, description = "Collaborator unreachable")
    )
)]
pub async fn generate_from_interview_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let session = state.db.get_interview(id, user_id).await.map_err(port_err)?;
    // The readiness check runs before any collaborator call is made.
    interview::ensure_can_generate(&session).map_err(port_err)?;

    let generated = state
        .with_deadline(state.generation_adapter.generate(
            &session.topic,
            session.target_kind,
            GenerationSource::Conversation(&session.messages),
        ))
        .await
        .map_err(port_err)?;

    let document = state
        .db
        .create_document(
            user_id,
            NewDocument {
                title: generated.title,
                content: Some(generated.content),
                summary: Some(generated.summary),
                kind: Some(session.target_kind),
                tags: generated.tags,
                source_type: Some("text".to_string()),
            },
        )
        .await
        .map_err(port_err)?;

    state
        .db
        .complete_interview(session.id, user_id, document.id)
        .await
        .map_err(port_err)?;

    info!(
        "Interview {} produced document {} for user {}",
        session.id, document.id, user_id
    );
    Ok((StatusCode::CREATED, Json(DocumentResponse::from(document))))
}
