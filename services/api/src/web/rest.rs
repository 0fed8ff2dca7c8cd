//! services/api/src/web/rest.rs
//!
//! The master definition for the OpenAPI specification, aggregating every
//! handler and schema in the web layer.

use utoipa::OpenApi;

use crate::web::{auth, documents, interviews, profiles, public, transcription, uploads};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::signup_handler,
        auth::login_handler,
        auth::logout_handler,
        documents::list_documents_handler,
        documents::create_document_handler,
        documents::get_document_handler,
        documents::update_document_handler,
        documents::delete_document_handler,
        documents::snapshot_version_handler,
        documents::list_versions_handler,
        documents::get_version_handler,
        documents::generate_document_handler,
        interviews::start_interview_handler,
        interviews::get_interview_handler,
        interviews::interview_turn_handler,
        interviews::generate_from_interview_handler,
        transcription::transcribe_handler,
        uploads::create_upload_handler,
        uploads::list_uploads_handler,
        profiles::get_profile_handler,
        profiles::update_profile_handler,
        public::get_public_document_handler,
    ),
    components(
        schemas(
            auth::SignupRequest,
            auth::LoginRequest,
            auth::AuthResponse,
            documents::DocumentResponse,
            documents::VersionResponse,
            documents::CreateDocumentRequest,
            documents::UpdateDocumentRequest,
            documents::SnapshotRequest,
            documents::GenerateDocumentRequest,
            interviews::StartInterviewRequest,
            interviews::InterviewTurnRequest,
            interviews::ChatMessageResponse,
            interviews::InterviewResponse,
            transcription::TranscribeRequest,
            transcription::TranscribeResponse,
            uploads::UploadResponse,
            profiles::ProfileResponse,
            profiles::UpdateProfileRequest,
            public::PublicDocumentResponse,
        )
    ),
    tags(
        (name = "Founder Knowledge API", description = "API endpoints for capturing and publishing founder knowledge.")
    )
)]
pub struct ApiDoc;
