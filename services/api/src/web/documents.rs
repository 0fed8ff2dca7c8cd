//! services/api/src/web/documents.rs
//!
//! Handlers for the document store: CRUD, version snapshots, and generation
//! from a transcript.

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
    domain::{Document, DocumentKind, DocumentVersion, GenerationSource},
    ports::{DocumentPatch, NewDocument},
    templates,
};

use crate::web::port_err;
use crate::web::state::AppState;

//=========================================================================================
// Request/Response Types
//=========================================================================================

/// A document as returned by the API. Kind and status use their wire names.
#[derive(Serialize, ToSchema)]
pub struct DocumentResponse {
    pub id: Uuid,
    pub title: String,
    pub content: Option<String>,
    pub summary: Option<String>,
    pub kind: String,
    pub status: String,
    pub tags: Vec<String>,
    pub source_type: Option<String>,
    pub is_public: bool,
    pub public_slug: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Document> for DocumentResponse {
    fn from(doc: Document) -> Self {
        Self {
            id: doc.id,
            title: doc.title,
            content: doc.content,
            summary: doc.summary,
            kind: doc.kind.as_str().to_string(),
            status: doc.status.as_str().to_string(),
            tags: doc.tags,
            source_type: doc.source_type,
            is_public: doc.is_public,
            public_slug: doc.public_slug,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct VersionResponse {
    pub id: Uuid,
    pub document_id: Uuid,
    pub title: String,
    pub content: Option<String>,
    pub summary: Option<String>,
    pub version_number: i32,
    pub change_description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<DocumentVersion> for VersionResponse {
    fn from(v: DocumentVersion) -> Self {
        Self {
            id: v.id,
            document_id: v.document_id,
            title: v.title,
            content: v.content,
            summary: v.summary,
            version_number: v.version_number,
            change_description: v.change_description,
            created_at: v.created_at,
        }
    }
}

/// Creates a document either from explicit fields or from a built-in template.
#[derive(Deserialize, ToSchema)]
pub struct CreateDocumentRequest {
    /// A built-in template id such as `sop-standard` or `blank`.
    pub template_id: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub summary: Option<String>,
    pub kind: Option<String>,
    pub tags: Option<Vec<String>>,
    pub source_type: Option<String>,
}

/// A partial update; omitted fields are left unchanged.
#[derive(Deserialize, ToSchema)]
pub struct UpdateDocumentRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub summary: Option<String>,
    pub kind: Option<String>,
    pub status: Option<String>,
    pub tags: Option<Vec<String>>,
    pub is_public: Option<bool>,
}

#[derive(Deserialize, ToSchema)]
pub struct SnapshotRequest {
    pub change_description: Option<String>,
}

/// Generates a document from transcript text (voice recording or file upload).
#[derive(Deserialize, ToSchema)]
pub struct GenerateDocumentRequest {
    pub topic: String,
    pub kind: Option<String>,
    pub transcript: String,
    /// Where the transcript came from: `voice` or `file`.
    pub source_type: Option<String>,
    /// An upload to link to the produced document.
    pub upload_id: Option<Uuid>,
}

pub(crate) fn parse_kind(raw: &str) -> Result<DocumentKind, (StatusCode, String)> {
    raw.parse::<DocumentKind>()
        .map_err(|e| (StatusCode::UNPROCESSABLE_ENTITY, e))
}

//=========================================================================================
// Document CRUD Handlers
//=========================================================================================

/// List the authenticated user's documents, most recently updated first.
#[utoipa::path(
    get,
    path = "/documents",
    responses(
        (status = 200, description = "The user's documents", body = [DocumentResponse]),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_documents_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let documents = state.db.list_documents(user_id).await.map_err(port_err)?;
    let response: Vec<DocumentResponse> = documents.into_iter().map(Into::into).collect();
    Ok(Json(response))
}

/// Create a document from explicit fields or from a built-in template.
#[utoipa::path(
    post,
    path = "/documents",
    request_body = CreateDocumentRequest,
    responses(
        (status = 201, description = "Document created", body = DocumentResponse),
        (status = 422, description = "Unknown template id or blank title"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn create_document_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Json(req): Json<CreateDocumentRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let fields = if let Some(template_id) = &req.template_id {
        let template = templates::find(template_id).ok_or_else(|| {
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("'{}' is not a known template", template_id),
            )
        })?;
        NewDocument {
            title: req
                .title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| template.name.to_string()),
            content: Some(template.content.to_string()),
            summary: req.summary,
            kind: Some(template.kind),
            tags: template.tags.iter().map(|t| t.to_string()).collect(),
            source_type: Some("template".to_string()),
        }
    } else {
        let title = req.title.unwrap_or_default();
        if title.trim().is_empty() {
            return Err((
                StatusCode::UNPROCESSABLE_ENTITY,
                "A title is required".to_string(),
            ));
        }
        let kind = req.kind.as_deref().map(parse_kind).transpose()?;
        NewDocument {
            title,
            content: req.content,
            summary: req.summary,
            kind,
            tags: req.tags.unwrap_or_default(),
            source_type: req.source_type,
        }
    };

    let document = state
        .db
        .create_document(user_id, fields)
        .await
        .map_err(port_err)?;
    info!("Created document {} for user {}", document.id, user_id);
    Ok((StatusCode::CREATED, Json(DocumentResponse::from(document))))
}

/// Fetch one of the user's documents.
#[utoipa::path(
    get,
    path = "/documents/{id}",
    params(("id" = Uuid, Path, description = "The document id")),
    responses(
        (status = 200, description = "The document", body = DocumentResponse),
        (status = 404, description = "No such document for this user")
    )
)]
pub async fn get_document_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let document = state.db.get_document(id, user_id).await.map_err(port_err)?;
    Ok(Json(DocumentResponse::from(document)))
}

/// Apply a partial update. Setting `is_public` drives the slug lifecycle.
#[utoipa::path(
    put,
    path = "/documents/{id}",
    params(("id" = Uuid, Path, description = "The document id")),
    request_body = UpdateDocumentRequest,
    responses(
        (status = 200, description = "The updated document", body = DocumentResponse),
        (status = 404, description = "No such document for this user"),
        (status = 422, description = "Invalid kind, status, or blank title")
    )
)]
pub async fn update_document_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateDocumentRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if let Some(title) = &req.title {
        if title.trim().is_empty() {
            return Err((
                StatusCode::UNPROCESSABLE_ENTITY,
                "A title cannot be blank".to_string(),
            ));
        }
    }
    let kind = req.kind.as_deref().map(parse_kind).transpose()?;
    let status = req
        .status
        .as_deref()
        .map(|raw| {
            raw.parse()
                .map_err(|e: String| (StatusCode::UNPROCESSABLE_ENTITY, e))
        })
        .transpose()?;

    let patch = DocumentPatch {
        title: req.title,
        content: req.content,
        summary: req.summary,
        kind,
        status,
        tags: req.tags,
        is_public: req.is_public,
    };
    let document = state
        .db
        .update_document(id, user_id, patch)
        .await
        .map_err(port_err)?;
    Ok(Json(DocumentResponse::from(document)))
}

/// Delete a document. Its versions go with it; uploads and interview sessions
/// keep their rows but lose the back-reference.
#[utoipa::path(
    delete,
    path = "/documents/{id}",
    params(("id" = Uuid, Path, description = "The document id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "No such document for this user")
    )
)]
pub async fn delete_document_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    state
        .db
        .delete_document(id, user_id)
        .await
        .map_err(port_err)?;
    Ok(StatusCode::NO_CONTENT)
}

//=========================================================================================
// Version Handlers
//=========================================================================================

/// Snapshot the document's current state as the next version.
#[utoipa::path(
    post,
    path = "/documents/{id}/versions",
    params(("id" = Uuid, Path, description = "The document id")),
    request_body = SnapshotRequest,
    responses(
        (status = 201, description = "Snapshot created", body = VersionResponse),
        (status = 404, description = "No such document for this user")
    )
)]
pub async fn snapshot_version_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(id): Path<Uuid>,
    Json(req): Json<SnapshotRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let version = state
        .db
        .snapshot_version(id, user_id, req.change_description)
        .await
        .map_err(port_err)?;
    Ok((StatusCode::CREATED, Json(VersionResponse::from(version))))
}

/// List a document's versions, most recent first.
#[utoipa::path(
    get,
    path = "/documents/{id}/versions",
    params(("id" = Uuid, Path, description = "The document id")),
    responses(
        (status = 200, description = "The document's versions", body = [VersionResponse]),
        (status = 404, description = "No such document for this user")
    )
)]
pub async fn list_versions_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let versions = state
        .db
        .list_versions(id, user_id)
        .await
        .map_err(port_err)?;
    let response: Vec<VersionResponse> = versions.into_iter().map(Into::into).collect();
    Ok(Json(response))
}

/// Read a historical snapshot. Restoring is a client-driven document update
/// with the returned title and content.
#[utoipa::path(
    get,
    path = "/versions/{id}",
    params(("id" = Uuid, Path, description = "The version id")),
    responses(
        (status = 200, description = "The snapshot", body = VersionResponse),
        (status = 404, description = "No such version for this user")
    )
)]
pub async fn get_version_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let version = state.db.get_version(id, user_id).await.map_err(port_err)?;
    Ok(Json(VersionResponse::from(version)))
}

//=========================================================================================
// Generation From a Transcript
//=========================================================================================

/// Generate a structured document from transcript text.
#[utoipa::path(
    post,
    path = "/documents/generate",
    request_body = GenerateDocumentRequest,
    responses(
        (status = 201, description = "Generated document", body = DocumentResponse),
        (status = 422, description = "Blank topic or transcript"),
        (status = 429, description = "Collaborator rate limit"),
        (status = 402, description = "Collaborator quota exhausted"),
        (status = 503, description = "Collaborator unreachable")
    )
)]
pub async fn generate_document_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Json(req): Json<GenerateDocumentRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if req.topic.trim().is_empty() {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            "A topic is required".to_string(),
        ));
    }
    if req.transcript.trim().is_empty() {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            "A transcript is required".to_string(),
        ));
    }
    let kind = req
        .kind
        .as_deref()
        .map(parse_kind)
        .transpose()?
        .unwrap_or(DocumentKind::General);
    let source_type = match req.source_type.as_deref() {
        None | Some("voice") => "voice",
        Some("file") => "file",
        Some(other) => {
            return Err((
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("'{}' is not a transcript source", other),
            ))
        }
    };

    let source = match source_type {
        "file" => GenerationSource::FileContent(&req.transcript),
        _ => GenerationSource::VoiceTranscript(&req.transcript),
    };
    let generated = state
        .with_deadline(state.generation_adapter.generate(&req.topic, kind, source))
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
                kind: Some(kind),
                tags: generated.tags,
                source_type: Some(source_type.to_string()),
            },
        )
        .await
        .map_err(port_err)?;

    if let Some(upload_id) = req.upload_id {
        state
            .db
            .link_upload_document(upload_id, user_id, document.id)
            .await
            .map_err(port_err)?;
    }

    info!(
        "Generated document {} from a {} transcript for user {}",
        document.id, source_type, user_id
    );
    Ok((StatusCode::CREATED, Json(DocumentResponse::from(document))))
}
