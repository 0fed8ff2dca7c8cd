//! crates/capture_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases or APIs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{
    ChatMessage, Document, DocumentKind, DocumentStatus, DocumentVersion, GeneratedDocument,
    GenerationSource, InterviewSession, Profile, PublicDocument, Upload, User, UserCredentials,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// The error taxonomy shared by all port operations.
///
/// Missing rows and rows owned by another user both surface as `NotFound` so
/// that the existence of private data never leaks to the caller.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("The interview does not have enough content yet")]
    InsufficientContent,
    #[error("The interview session is completed and its log is frozen")]
    SessionCompleted,
    #[error("The AI service is receiving too many requests. Please try again in a moment")]
    RateLimited,
    #[error("AI usage limit reached. Please add credits")]
    QuotaExceeded,
    #[error("The AI service is unreachable: {0}")]
    Unavailable(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
    #[error("Unauthorized")]
    Unauthorized,
}

impl PortError {
    /// True when retrying the same call may succeed without operator action.
    pub fn is_retryable(&self) -> bool {
        matches!(self, PortError::RateLimited | PortError::Unavailable(_))
    }
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Store Payload Structs
//=========================================================================================

/// Fields for creating a document. Status defaults to draft and the document
/// starts private; tags are stored exactly as given.
#[derive(Debug, Clone, Default)]
pub struct NewDocument {
    pub title: String,
    pub content: Option<String>,
    pub summary: Option<String>,
    pub kind: Option<DocumentKind>,
    pub tags: Vec<String>,
    pub source_type: Option<String>,
}

/// A partial update. `None` fields are left unchanged.
///
/// Setting `is_public` to true on a document without a slug assigns one
/// derived from the title; setting it to false clears the slug.
#[derive(Debug, Clone, Default)]
pub struct DocumentPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub summary: Option<String>,
    pub kind: Option<DocumentKind>,
    pub status: Option<DocumentStatus>,
    pub tags: Option<Vec<String>>,
    pub is_public: Option<bool>,
}

/// Fields for recording an upload.
#[derive(Debug, Clone)]
pub struct NewUpload {
    pub file_name: String,
    pub file_type: String,
    pub file_url: String,
    pub transcript: Option<String>,
}

/// A partial profile update. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProfilePatch {
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub company_name: Option<String>,
}

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait DatabaseService: Send + Sync {
    // --- Auth Methods ---
    async fn create_user_with_email(
        &self,
        email: &str,
        hashed_password: &str,
    ) -> PortResult<User>;

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials>;

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()>;

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid>;

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()>;

    // --- Document Management ---
    async fn create_document(&self, user_id: Uuid, fields: NewDocument) -> PortResult<Document>;

    async fn get_document(&self, document_id: Uuid, user_id: Uuid) -> PortResult<Document>;

    /// All documents owned by the user, most recently updated first.
    async fn list_documents(&self, user_id: Uuid) -> PortResult<Vec<Document>>;

    async fn update_document(
        &self,
        document_id: Uuid,
        user_id: Uuid,
        patch: DocumentPatch,
    ) -> PortResult<Document>;

    /// Deletes the document. Versions cascade; interview sessions and uploads
    /// keep their rows but lose the back-reference.
    async fn delete_document(&self, document_id: Uuid, user_id: Uuid) -> PortResult<()>;

    /// The public read path: resolves only when the document is public and the
    /// slug matches. A private document and a nonexistent slug are
    /// indistinguishable to the caller.
    async fn get_public_document(&self, slug: &str) -> PortResult<PublicDocument>;

    // --- Version Management ---
    /// Captures an immutable snapshot of the document's current state with the
    /// next version number. Concurrent calls for the same document never
    /// produce duplicate numbers.
    async fn snapshot_version(
        &self,
        document_id: Uuid,
        user_id: Uuid,
        change_description: Option<String>,
    ) -> PortResult<DocumentVersion>;

    /// Versions of the document, most recent first.
    async fn list_versions(
        &self,
        document_id: Uuid,
        user_id: Uuid,
    ) -> PortResult<Vec<DocumentVersion>>;

    /// Reads a historical snapshot. Restoring is read-only at this layer: the
    /// caller decides whether to apply the returned state to the live document.
    async fn get_version(&self, version_id: Uuid, user_id: Uuid) -> PortResult<DocumentVersion>;

    // --- Interview Sessions ---
    async fn create_interview(
        &self,
        user_id: Uuid,
        topic: &str,
        target_kind: DocumentKind,
    ) -> PortResult<InterviewSession>;

    async fn get_interview(
        &self,
        session_id: Uuid,
        user_id: Uuid,
    ) -> PortResult<InterviewSession>;

    /// Replaces the message log. Fails with `SessionCompleted` once the
    /// session is frozen.
    async fn update_interview_messages(
        &self,
        session_id: Uuid,
        user_id: Uuid,
        messages: &[ChatMessage],
    ) -> PortResult<()>;

    /// Attaches the generated document and marks the session completed,
    /// freezing the message log.
    async fn complete_interview(
        &self,
        session_id: Uuid,
        user_id: Uuid,
        document_id: Uuid,
    ) -> PortResult<()>;

    // --- Uploads ---
    async fn create_upload(&self, user_id: Uuid, fields: NewUpload) -> PortResult<Upload>;

    async fn list_uploads(&self, user_id: Uuid) -> PortResult<Vec<Upload>>;

    async fn link_upload_document(
        &self,
        upload_id: Uuid,
        user_id: Uuid,
        document_id: Uuid,
    ) -> PortResult<()>;

    // --- Profiles ---
    async fn create_profile(&self, user_id: Uuid) -> PortResult<Profile>;

    async fn get_profile(&self, user_id: Uuid) -> PortResult<Profile>;

    async fn update_profile(&self, user_id: Uuid, patch: ProfilePatch) -> PortResult<Profile>;
}

#[async_trait]
pub trait SpeechToTextService: Send + Sync {
    /// Transcribes audio data into text. Oversized payloads are rejected with
    /// `Validation` before any collaborator call.
    async fn transcribe(&self, audio: &[u8], file_name: &str) -> PortResult<String>;
}

#[async_trait]
pub trait DocumentGenerationService: Send + Sync {
    /// Turns a conversation or transcript into a structured document. A reply
    /// that does not follow the JSON schema degrades to a fallback result
    /// rather than failing.
    async fn generate(
        &self,
        topic: &str,
        kind: DocumentKind,
        source: GenerationSource<'_>,
    ) -> PortResult<GeneratedDocument>;
}

#[async_trait]
pub trait InterviewService: Send + Sync {
    /// Produces the next interviewer question. With an empty message log this
    /// is the opening question of the session.
    async fn next_question(
        &self,
        topic: &str,
        kind: DocumentKind,
        messages: &[ChatMessage],
    ) -> PortResult<String>;
}
