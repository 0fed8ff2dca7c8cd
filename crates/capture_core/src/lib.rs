pub mod domain;
pub mod interview;
pub mod ports;
pub mod slug;
pub mod templates;

pub use domain::{
    ChatMessage, Document, DocumentKind, DocumentStatus, DocumentVersion, GeneratedDocument,
    GenerationSource, InterviewSession, MessageRole, Profile, PublicDocument, SessionStatus,
    Upload, User, UserCredentials,
};
pub use ports::{
    DatabaseService, DocumentGenerationService, DocumentPatch, InterviewService, NewDocument,
    NewUpload, PortError, PortResult, ProfilePatch, SpeechToTextService,
};
