//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `DatabaseService` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.
//!
//! Every owner-scoped query filters on `user_id`; a row that exists but belongs
//! to another user is reported as `NotFound`, never as a permission error.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

use capture_core::domain::{
    ChatMessage, Document, DocumentKind, DocumentStatus, DocumentVersion, InterviewSession,
    Profile, PublicDocument, SessionStatus, Upload, User, UserCredentials,
};
use capture_core::ports::{
    DatabaseService, DocumentPatch, NewDocument, NewUpload, PortError, PortResult, ProfilePatch,
};
use capture_core::slug;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `DatabaseService` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false)
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(Debug, Clone, Copy, sqlx::Type)]
#[sqlx(type_name = "document_kind", rename_all = "snake_case")]
enum KindRecord {
    Sop,
    HowTo,
    ProductDoc,
    Reflection,
    General,
}

impl From<KindRecord> for DocumentKind {
    fn from(k: KindRecord) -> Self {
        match k {
            KindRecord::Sop => DocumentKind::Sop,
            KindRecord::HowTo => DocumentKind::HowTo,
            KindRecord::ProductDoc => DocumentKind::ProductDoc,
            KindRecord::Reflection => DocumentKind::Reflection,
            KindRecord::General => DocumentKind::General,
        }
    }
}

impl From<DocumentKind> for KindRecord {
    fn from(k: DocumentKind) -> Self {
        match k {
            DocumentKind::Sop => KindRecord::Sop,
            DocumentKind::HowTo => KindRecord::HowTo,
            DocumentKind::ProductDoc => KindRecord::ProductDoc,
            DocumentKind::Reflection => KindRecord::Reflection,
            DocumentKind::General => KindRecord::General,
        }
    }
}

#[derive(Debug, Clone, Copy, sqlx::Type)]
#[sqlx(type_name = "document_status", rename_all = "snake_case")]
enum StatusRecord {
    Draft,
    Review,
    Published,
}

impl From<StatusRecord> for DocumentStatus {
    fn from(s: StatusRecord) -> Self {
        match s {
            StatusRecord::Draft => DocumentStatus::Draft,
            StatusRecord::Review => DocumentStatus::Review,
            StatusRecord::Published => DocumentStatus::Published,
        }
    }
}

impl From<DocumentStatus> for StatusRecord {
    fn from(s: DocumentStatus) -> Self {
        match s {
            DocumentStatus::Draft => StatusRecord::Draft,
            DocumentStatus::Review => StatusRecord::Review,
            DocumentStatus::Published => StatusRecord::Published,
        }
    }
}

#[derive(FromRow)]
struct UserRecord {
    user_id: Uuid,
    email: Option<String>,
}

impl UserRecord {
    fn to_domain(self) -> User {
        User {
            user_id: self.user_id,
            email: self.email,
        }
    }
}

#[derive(FromRow)]
struct CredentialsRecord {
    user_id: Uuid,
    email: String,
    hashed_password: String,
}

impl CredentialsRecord {
    fn to_domain(self) -> UserCredentials {
        UserCredentials {
            user_id: self.user_id,
            email: self.email,
            hashed_password: self.hashed_password,
        }
    }
}

#[derive(FromRow)]
struct DocumentRecord {
    id: Uuid,
    user_id: Uuid,
    title: String,
    content: Option<String>,
    summary: Option<String>,
    kind: KindRecord,
    status: StatusRecord,
    tags: Vec<String>,
    source_type: Option<String>,
    is_public: bool,
    public_slug: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl DocumentRecord {
    fn to_domain(self) -> Document {
        Document {
            id: self.id,
            user_id: self.user_id,
            title: self.title,
            content: self.content,
            summary: self.summary,
            kind: self.kind.into(),
            status: self.status.into(),
            tags: self.tags,
            source_type: self.source_type,
            is_public: self.is_public,
            public_slug: self.public_slug,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

const DOCUMENT_COLUMNS: &str = "id, user_id, title, content, summary, kind, status, tags, \
                                source_type, is_public, public_slug, created_at, updated_at";

#[derive(FromRow)]
struct PublicDocumentRecord {
    title: String,
    content: Option<String>,
    summary: Option<String>,
    kind: KindRecord,
    tags: Vec<String>,
    created_at: DateTime<Utc>,
}

impl PublicDocumentRecord {
    fn to_domain(self) -> PublicDocument {
        PublicDocument {
            title: self.title,
            content: self.content,
            summary: self.summary,
            kind: self.kind.into(),
            tags: self.tags,
            created_at: self.created_at,
        }
    }
}

#[derive(FromRow)]
struct VersionRecord {
    id: Uuid,
    document_id: Uuid,
    user_id: Uuid,
    title: String,
    content: Option<String>,
    summary: Option<String>,
    version_number: i32,
    change_description: Option<String>,
    created_at: DateTime<Utc>,
}

impl VersionRecord {
    fn to_domain(self) -> DocumentVersion {
        DocumentVersion {
            id: self.id,
            document_id: self.document_id,
            user_id: self.user_id,
            title: self.title,
            content: self.content,
            summary: self.summary,
            version_number: self.version_number,
            change_description: self.change_description,
            created_at: self.created_at,
        }
    }
}

const VERSION_COLUMNS: &str = "id, document_id, user_id, title, content, summary, \
                               version_number, change_description, created_at";

#[derive(FromRow)]
struct InterviewRecord {
    id: Uuid,
    user_id: Uuid,
    topic: String,
    target_kind: KindRecord,
    messages: Json<Vec<ChatMessage>>,
    status: String,
    document_id: Option<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl InterviewRecord {
    fn to_domain(self) -> PortResult<InterviewSession> {
        let status = self
            .status
            .parse::<SessionStatus>()
            .map_err(PortError::Unexpected)?;
        Ok(InterviewSession {
            id: self.id,
            user_id: self.user_id,
            topic: self.topic,
            target_kind: self.target_kind.into(),
            messages: self.messages.0,
            status,
            document_id: self.document_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const INTERVIEW_COLUMNS: &str =
    "id, user_id, topic, target_kind, messages, status, document_id, created_at, updated_at";

#[derive(FromRow)]
struct UploadRecord {
    id: Uuid,
    user_id: Uuid,
    document_id: Option<Uuid>,
    file_name: String,
    file_type: String,
    file_url: String,
    transcript: Option<String>,
    created_at: DateTime<Utc>,
}

impl UploadRecord {
    fn to_domain(self) -> Upload {
        Upload {
            id: self.id,
            user_id: self.user_id,
            document_id: self.document_id,
            file_name: self.file_name,
            file_type: self.file_type,
            file_url: self.file_url,
            transcript: self.transcript,
            created_at: self.created_at,
        }
    }
}

#[derive(FromRow)]
struct ProfileRecord {
    id: Uuid,
    user_id: Uuid,
    full_name: Option<String>,
    avatar_url: Option<String>,
    company_name: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProfileRecord {
    fn to_domain(self) -> Profile {
        Profile {
            id: self.id,
            user_id: self.user_id,
            full_name: self.full_name,
            avatar_url: self.avatar_url,
            company_name: self.company_name,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

//=========================================================================================
// Internal Helpers
//=========================================================================================

impl DbAdapter {
    /// Locks a document row for the duration of a transaction, owner-scoped.
    /// Serializes the publish transition and version-number assignment.
    async fn lock_document(
        tx: &mut Transaction<'_, Postgres>,
        document_id: Uuid,
        user_id: Uuid,
    ) -> PortResult<Document> {
        let record = sqlx::query_as::<_, DocumentRecord>(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE id = $1 AND user_id = $2 FOR UPDATE"
        ))
        .bind(document_id)
        .bind(user_id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(unexpected)?
        .ok_or_else(|| PortError::NotFound(format!("Document {}", document_id)))?;
        Ok(record.to_domain())
    }

    /// Distinguishes "session is frozen" from "session does not exist" after a
    /// guarded update matched zero rows.
    async fn interview_update_miss(&self, session_id: Uuid, user_id: Uuid) -> PortError {
        let exists = sqlx::query_scalar::<_, String>(
            "SELECT status FROM interview_sessions WHERE id = $1 AND user_id = $2",
        )
        .bind(session_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await;

        match exists {
            Ok(Some(_)) => PortError::SessionCompleted,
            Ok(None) => PortError::NotFound(format!("Interview session {}", session_id)),
            Err(e) => unexpected(e),
        }
    }
}

//=========================================================================================
// `DatabaseService` Trait Implementation
//=========================================================================================

#[async_trait]
impl DatabaseService for DbAdapter {
    async fn create_user_with_email(
        &self,
        email: &str,
        hashed_password: &str,
    ) -> PortResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(
            "INSERT INTO users (user_id, email, hashed_password) VALUES ($1, $2, $3) \
             RETURNING user_id, email",
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(hashed_password)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                PortError::Validation("An account with this email already exists".to_string())
            } else {
                unexpected(e)
            }
        })?;
        Ok(record.to_domain())
    }

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        let record = sqlx::query_as::<_, CredentialsRecord>(
            "SELECT user_id, email, hashed_password FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or_else(|| PortError::NotFound(format!("User with email {}", email)))?;
        Ok(record.to_domain())
    }

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()> {
        sqlx::query("INSERT INTO auth_sessions (id, user_id, expires_at) VALUES ($1, $2, $3)")
            .bind(session_id)
            .bind(user_id)
            .bind(expires_at)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid> {
        let user_id = sqlx::query_scalar::<_, Uuid>(
            "SELECT user_id FROM auth_sessions WHERE id = $1 AND expires_at > now()",
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or(PortError::Unauthorized)?;
        Ok(user_id)
    }

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()> {
        sqlx::query("DELETE FROM auth_sessions WHERE id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }

    // --- Document Management ---

    async fn create_document(&self, user_id: Uuid, fields: NewDocument) -> PortResult<Document> {
        let kind: KindRecord = fields.kind.unwrap_or(DocumentKind::General).into();
        let record = sqlx::query_as::<_, DocumentRecord>(&format!(
            "INSERT INTO documents (id, user_id, title, content, summary, kind, tags, source_type) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {DOCUMENT_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(&fields.title)
        .bind(&fields.content)
        .bind(&fields.summary)
        .bind(kind)
        .bind(&fields.tags)
        .bind(&fields.source_type)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(record.to_domain())
    }

    async fn get_document(&self, document_id: Uuid, user_id: Uuid) -> PortResult<Document> {
        let record = sqlx::query_as::<_, DocumentRecord>(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE id = $1 AND user_id = $2"
        ))
        .bind(document_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or_else(|| PortError::NotFound(format!("Document {}", document_id)))?;
        Ok(record.to_domain())
    }

    async fn list_documents(&self, user_id: Uuid) -> PortResult<Vec<Document>> {
        let records = sqlx::query_as::<_, DocumentRecord>(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE user_id = $1 ORDER BY updated_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn update_document(
        &self,
        document_id: Uuid,
        user_id: Uuid,
        patch: DocumentPatch,
    ) -> PortResult<Document> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;

        let mut doc = Self::lock_document(&mut tx, document_id, user_id).await?;

        if let Some(title) = patch.title {
            doc.title = title;
        }
        if let Some(content) = patch.content {
            doc.content = Some(content);
        }
        if let Some(summary) = patch.summary {
            doc.summary = Some(summary);
        }
        if let Some(kind) = patch.kind {
            doc.kind = kind;
        }
        if let Some(status) = patch.status {
            doc.status = status;
        }
        if let Some(tags) = patch.tags {
            doc.tags = tags;
        }
        if let Some(is_public) = patch.is_public {
            doc.is_public = is_public;
        }

        // The publish transition: assigning a slug on the way in, dropping it
        // on the way out, so is_public and public_slug never disagree.
        if doc.is_public {
            if doc.public_slug.is_none() {
                doc.public_slug = Some(slug::public_slug(&doc.title, Utc::now()));
            }
        } else {
            doc.public_slug = None;
        }

        let record = sqlx::query_as::<_, DocumentRecord>(&format!(
            "UPDATE documents SET title = $1, content = $2, summary = $3, kind = $4, \
             status = $5, tags = $6, is_public = $7, public_slug = $8, updated_at = now() \
             WHERE id = $9 \
             RETURNING {DOCUMENT_COLUMNS}"
        ))
        .bind(&doc.title)
        .bind(&doc.content)
        .bind(&doc.summary)
        .bind(KindRecord::from(doc.kind))
        .bind(StatusRecord::from(doc.status))
        .bind(&doc.tags)
        .bind(doc.is_public)
        .bind(&doc.public_slug)
        .bind(document_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(unexpected)?;

        tx.commit().await.map_err(unexpected)?;
        Ok(record.to_domain())
    }

    async fn delete_document(&self, document_id: Uuid, user_id: Uuid) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM documents WHERE id = $1 AND user_id = $2")
            .bind(document_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("Document {}", document_id)));
        }
        Ok(())
    }

    async fn get_public_document(&self, slug: &str) -> PortResult<PublicDocument> {
        let record = sqlx::query_as::<_, PublicDocumentRecord>(
            "SELECT title, content, summary, kind, tags, created_at FROM documents \
             WHERE public_slug = $1 AND is_public = true",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        // Private documents and unknown slugs produce the same answer.
        .ok_or_else(|| PortError::NotFound("Public document".to_string()))?;
        Ok(record.to_domain())
    }

    // --- Version Management ---

    async fn snapshot_version(
        &self,
        document_id: Uuid,
        user_id: Uuid,
        change_description: Option<String>,
    ) -> PortResult<DocumentVersion> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;

        // The row lock serializes concurrent snapshots of the same document;
        // the (document_id, version_number) unique index is the backstop.
        let doc = Self::lock_document(&mut tx, document_id, user_id).await?;

        let next_number = sqlx::query_scalar::<_, i32>(
            "SELECT COALESCE(MAX(version_number), 0) + 1 FROM document_versions \
             WHERE document_id = $1",
        )
        .bind(document_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(unexpected)?;

        let record = sqlx::query_as::<_, VersionRecord>(&format!(
            "INSERT INTO document_versions \
             (id, document_id, user_id, title, content, summary, version_number, change_description) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {VERSION_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(document_id)
        .bind(user_id)
        .bind(&doc.title)
        .bind(&doc.content)
        .bind(&doc.summary)
        .bind(next_number)
        .bind(&change_description)
        .fetch_one(&mut *tx)
        .await
        .map_err(unexpected)?;

        tx.commit().await.map_err(unexpected)?;
        Ok(record.to_domain())
    }

    async fn list_versions(
        &self,
        document_id: Uuid,
        user_id: Uuid,
    ) -> PortResult<Vec<DocumentVersion>> {
        // Verifying ownership first keeps the version query itself simple.
        self.get_document(document_id, user_id).await?;

        let records = sqlx::query_as::<_, VersionRecord>(&format!(
            "SELECT {VERSION_COLUMNS} FROM document_versions WHERE document_id = $1 \
             ORDER BY version_number DESC"
        ))
        .bind(document_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn get_version(&self, version_id: Uuid, user_id: Uuid) -> PortResult<DocumentVersion> {
        let record = sqlx::query_as::<_, VersionRecord>(&format!(
            "SELECT {VERSION_COLUMNS} FROM document_versions WHERE id = $1 AND user_id = $2"
        ))
        .bind(version_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or_else(|| PortError::NotFound(format!("Version {}", version_id)))?;
        Ok(record.to_domain())
    }

    // --- Interview Sessions ---

    async fn create_interview(
        &self,
        user_id: Uuid,
        topic: &str,
        target_kind: DocumentKind,
    ) -> PortResult<InterviewSession> {
        let record = sqlx::query_as::<_, InterviewRecord>(&format!(
            "INSERT INTO interview_sessions (id, user_id, topic, target_kind) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {INTERVIEW_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(topic)
        .bind(KindRecord::from(target_kind))
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;
        record.to_domain()
    }

    async fn get_interview(
        &self,
        session_id: Uuid,
        user_id: Uuid,
    ) -> PortResult<InterviewSession> {
        let record = sqlx::query_as::<_, InterviewRecord>(&format!(
            "SELECT {INTERVIEW_COLUMNS} FROM interview_sessions WHERE id = $1 AND user_id = $2"
        ))
        .bind(session_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or_else(|| PortError::NotFound(format!("Interview session {}", session_id)))?;
        record.to_domain()
    }

    async fn update_interview_messages(
        &self,
        session_id: Uuid,
        user_id: Uuid,
        messages: &[ChatMessage],
    ) -> PortResult<()> {
        // The status guard makes the log immutable once the session completes.
        let result = sqlx::query(
            "UPDATE interview_sessions SET messages = $1, updated_at = now() \
             WHERE id = $2 AND user_id = $3 AND status = 'in_progress'",
        )
        .bind(Json(messages))
        .bind(session_id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(unexpected)?;

        if result.rows_affected() == 0 {
            return Err(self.interview_update_miss(session_id, user_id).await);
        }
        Ok(())
    }

    async fn complete_interview(
        &self,
        session_id: Uuid,
        user_id: Uuid,
        document_id: Uuid,
    ) -> PortResult<()> {
        let result = sqlx::query(
            "UPDATE interview_sessions SET document_id = $1, status = 'completed', \
             updated_at = now() \
             WHERE id = $2 AND user_id = $3 AND status = 'in_progress'",
        )
        .bind(document_id)
        .bind(session_id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(unexpected)?;

        if result.rows_affected() == 0 {
            return Err(self.interview_update_miss(session_id, user_id).await);
        }
        Ok(())
    }

    // --- Uploads ---

    async fn create_upload(&self, user_id: Uuid, fields: NewUpload) -> PortResult<Upload> {
        let record = sqlx::query_as::<_, UploadRecord>(
            "INSERT INTO uploads (id, user_id, file_name, file_type, file_url, transcript) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id, user_id, document_id, file_name, file_type, file_url, transcript, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(&fields.file_name)
        .bind(&fields.file_type)
        .bind(&fields.file_url)
        .bind(&fields.transcript)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(record.to_domain())
    }

    async fn list_uploads(&self, user_id: Uuid) -> PortResult<Vec<Upload>> {
        let records = sqlx::query_as::<_, UploadRecord>(
            "SELECT id, user_id, document_id, file_name, file_type, file_url, transcript, created_at \
             FROM uploads WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn link_upload_document(
        &self,
        upload_id: Uuid,
        user_id: Uuid,
        document_id: Uuid,
    ) -> PortResult<()> {
        let result =
            sqlx::query("UPDATE uploads SET document_id = $1 WHERE id = $2 AND user_id = $3")
                .bind(document_id)
                .bind(upload_id)
                .bind(user_id)
                .execute(&self.pool)
                .await
                .map_err(unexpected)?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("Upload {}", upload_id)));
        }
        Ok(())
    }

    // --- Profiles ---

    async fn create_profile(&self, user_id: Uuid) -> PortResult<Profile> {
        let record = sqlx::query_as::<_, ProfileRecord>(
            "INSERT INTO profiles (id, user_id) VALUES ($1, $2) \
             RETURNING id, user_id, full_name, avatar_url, company_name, created_at, updated_at",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(record.to_domain())
    }

    async fn get_profile(&self, user_id: Uuid) -> PortResult<Profile> {
        let record = sqlx::query_as::<_, ProfileRecord>(
            "SELECT id, user_id, full_name, avatar_url, company_name, created_at, updated_at \
             FROM profiles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or_else(|| PortError::NotFound(format!("Profile for user {}", user_id)))?;
        Ok(record.to_domain())
    }

    async fn update_profile(&self, user_id: Uuid, patch: ProfilePatch) -> PortResult<Profile> {
        let record = sqlx::query_as::<_, ProfileRecord>(
            "UPDATE profiles SET full_name = COALESCE($1, full_name), \
             avatar_url = COALESCE($2, avatar_url), \
             company_name = COALESCE($3, company_name), updated_at = now() \
             WHERE user_id = $4 \
             RETURNING id, user_id, full_name, avatar_url, company_name, created_at, updated_at",
        )
        .bind(&patch.full_name)
        .bind(&patch.avatar_url)
        .bind(&patch.company_name)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or_else(|| PortError::NotFound(format!("Profile for user {}", user_id)))?;
        Ok(record.to_domain())
    }
}
