//! services/api/src/web/public.rs
//!
//! The unauthenticated read path for published documents.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use capture_core::domain::PublicDocument;

use crate::web::port_err;
use crate::web::state::AppState;

/// The reduced projection served at a public slug. No owner or status fields.
#[derive(Serialize, ToSchema)]
pub struct PublicDocumentResponse {
    pub title: String,
    pub content: Option<String>,
    pub summary: Option<String>,
    pub kind: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<PublicDocument> for PublicDocumentResponse {
    fn from(doc: PublicDocument) -> Self {
        Self {
            title: doc.title,
            content: doc.content,
            summary: doc.summary,
            kind: doc.kind.as_str().to_string(),
            tags: doc.tags,
            created_at: doc.created_at,
        }
    }
}

/// Read a published document by its slug. No authentication required.
#[utoipa::path(
    get,
    path = "/public/{slug}",
    params(("slug" = String, Path, description = "The public slug")),
    responses(
        (status = 200, description = "The published document", body = PublicDocumentResponse),
        (status = 404, description = "No published document at this slug")
    )
)]
pub async fn get_public_document_handler(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let document = state.db.get_public_document(&slug).await.map_err(port_err)?;
    Ok(Json(PublicDocumentResponse::from(document)))
}
