//! crates/capture_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or HTTP framework.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// The closed set of document kinds. Each kind drives its own generation
/// prompt outline and starter template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Sop,
    HowTo,
    ProductDoc,
    Reflection,
    General,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 5] = [
        DocumentKind::Sop,
        DocumentKind::HowTo,
        DocumentKind::ProductDoc,
        DocumentKind::Reflection,
        DocumentKind::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Sop => "sop",
            DocumentKind::HowTo => "how_to",
            DocumentKind::ProductDoc => "product_doc",
            DocumentKind::Reflection => "reflection",
            DocumentKind::General => "general",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sop" => Ok(DocumentKind::Sop),
            "how_to" => Ok(DocumentKind::HowTo),
            "product_doc" => Ok(DocumentKind::ProductDoc),
            "reflection" => Ok(DocumentKind::Reflection),
            "general" => Ok(DocumentKind::General),
            other => Err(format!("'{}' is not a document kind", other)),
        }
    }
}

/// Lifecycle status of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Draft,
    Review,
    Published,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Draft => "draft",
            DocumentStatus::Review => "review",
            DocumentStatus::Published => "published",
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(DocumentStatus::Draft),
            "review" => Ok(DocumentStatus::Review),
            "published" => Ok(DocumentStatus::Published),
            other => Err(format!("'{}' is not a document status", other)),
        }
    }
}

/// A captured knowledge document owned by a single user.
///
/// Invariant: `public_slug` is `Some` if and only if `is_public` is true.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: Option<String>,
    pub summary: Option<String>,
    pub kind: DocumentKind,
    pub status: DocumentStatus,
    /// Stored as-given: duplicates are tolerated and insertion order is kept.
    pub tags: Vec<String>,
    /// How the document was produced: "text", "voice", "file" or "template".
    pub source_type: Option<String>,
    pub is_public: bool,
    pub public_slug: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The reduced projection of a public document, served by slug.
/// Exposes nothing about the owner.
#[derive(Debug, Clone)]
pub struct PublicDocument {
    pub title: String,
    pub content: Option<String>,
    pub summary: Option<String>,
    pub kind: DocumentKind,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// An immutable snapshot of a document's title/content/summary at save time.
/// Version numbers are per-document, start at 1 and strictly increase.
#[derive(Debug, Clone)]
pub struct DocumentVersion {
    pub id: Uuid,
    pub document_id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: Option<String>,
    pub summary: Option<String>,
    pub version_number: i32,
    pub change_description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Who authored a message in an interview log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    User,
    Assistant,
}

/// One entry in an interview session's ordered message log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: MessageRole::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: MessageRole::Assistant, content: content.into() }
    }
}

/// Status of a guided interview session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    InProgress,
    Completed,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::InProgress => "in_progress",
            SessionStatus::Completed => "completed",
        }
    }
}

impl FromStr for SessionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_progress" => Ok(SessionStatus::InProgress),
            "completed" => Ok(SessionStatus::Completed),
            other => Err(format!("'{}' is not a session status", other)),
        }
    }
}

/// A guided AI interview. The message log is append-only while the session is
/// in progress and frozen once a generated document has been attached.
#[derive(Debug, Clone)]
pub struct InterviewSession {
    pub id: Uuid,
    pub user_id: Uuid,
    pub topic: String,
    pub target_kind: DocumentKind,
    pub messages: Vec<ChatMessage>,
    pub status: SessionStatus,
    pub document_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A file a user uploaded for transcription/generation.
#[derive(Debug, Clone)]
pub struct Upload {
    pub id: Uuid,
    pub user_id: Uuid,
    pub document_id: Option<Uuid>,
    pub file_name: String,
    pub file_type: String,
    pub file_url: String,
    pub transcript: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Per-user display metadata, one row per account.
#[derive(Debug, Clone)]
pub struct Profile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub company_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Represents a user - used throughout the app
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: Uuid,
    pub email: Option<String>,
}

// Only used internally for login/signup - contains sensitive data
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user_id: Uuid,
    pub email: String,
    pub hashed_password: String,
}

/// The structured result returned by the generation collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedDocument {
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// What the generation collaborator is given to work from.
#[derive(Debug, Clone)]
pub enum GenerationSource<'a> {
    /// A finished interview conversation.
    Conversation(&'a [ChatMessage]),
    /// Speech-to-text output from a voice recording.
    VoiceTranscript(&'a str),
    /// The textual content of an uploaded file.
    FileContent(&'a str),
}

impl GenerationSource<'_> {
    /// Human-readable source label, used in the generation prompt.
    pub fn label(&self) -> &'static str {
        match self {
            GenerationSource::Conversation(_) => "Interview conversation",
            GenerationSource::VoiceTranscript(_) => "Voice recording transcript",
            GenerationSource::FileContent(_) => "Uploaded file content",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_kind_round_trips_through_wire_names() {
        for kind in DocumentKind::ALL {
            assert_eq!(kind.as_str().parse::<DocumentKind>().unwrap(), kind);
        }
        assert!("essay".parse::<DocumentKind>().is_err());
    }

    #[test]
    fn chat_message_serializes_with_snake_case_roles() {
        let msg = ChatMessage::assistant("What is the first step?");
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains(r#""role":"assistant""#));

        let back: ChatMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, msg);
    }

    #[test]
    fn generation_sources_name_their_origin() {
        assert_eq!(
            GenerationSource::Conversation(&[]).label(),
            "Interview conversation"
        );
        assert_eq!(
            GenerationSource::VoiceTranscript("t").label(),
            "Voice recording transcript"
        );
        assert_eq!(
            GenerationSource::FileContent("t").label(),
            "Uploaded file content"
        );
    }

    #[test]
    fn generated_document_tolerates_missing_optional_fields() {
        let parsed: GeneratedDocument =
            serde_json::from_str(r#"{"title":"Onboarding"}"#).unwrap();
        assert_eq!(parsed.title, "Onboarding");
        assert!(parsed.content.is_empty());
        assert!(parsed.tags.is_empty());
    }
}
