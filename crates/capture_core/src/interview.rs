//! crates/capture_core/src/interview.rs
//!
//! Pure rules for the interview state machine. The database adapter enforces
//! the same transitions at the row level; these checks run first so that no
//! collaborator call is made for a request that is doomed to fail.

use crate::domain::{ChatMessage, InterviewSession, MessageRole, SessionStatus};
use crate::ports::{PortError, PortResult};

/// The minimum message-log length before a document may be generated from a
/// session (two full interview turns).
pub const MIN_MESSAGES_FOR_GENERATION: usize = 4;

/// Fails with `SessionCompleted` when the session's log is frozen.
pub fn ensure_in_progress(session: &InterviewSession) -> PortResult<()> {
    match session.status {
        SessionStatus::InProgress => Ok(()),
        SessionStatus::Completed => Err(PortError::SessionCompleted),
    }
}

/// Checks that a session is ready to produce a document: still in progress and
/// holding at least [`MIN_MESSAGES_FOR_GENERATION`] messages. Must be called
/// before any collaborator call.
pub fn ensure_can_generate(session: &InterviewSession) -> PortResult<()> {
    ensure_in_progress(session)?;
    if session.messages.len() < MIN_MESSAGES_FOR_GENERATION {
        return Err(PortError::InsufficientContent);
    }
    Ok(())
}

/// Serializes a conversation for the generation prompt. Matches the labels the
/// interviewer persona uses, so the model sees who said what.
pub fn conversation_transcript(messages: &[ChatMessage]) -> String {
    messages
        .iter()
        .map(|m| {
            let speaker = match m.role {
                MessageRole::User => "Founder",
                MessageRole::Assistant => "Interviewer",
            };
            format!("{}: {}", speaker, m.content)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DocumentKind;
    use chrono::Utc;
    use uuid::Uuid;

    fn session(status: SessionStatus, message_count: usize) -> InterviewSession {
        let messages = (0..message_count)
            .map(|i| {
                if i % 2 == 0 {
                    ChatMessage::assistant(format!("Question {}", i))
                } else {
                    ChatMessage::user(format!("Answer {}", i))
                }
            })
            .collect();
        InterviewSession {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            topic: "Customer onboarding".to_string(),
            target_kind: DocumentKind::Sop,
            messages,
            status,
            document_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn completed_sessions_reject_further_activity() {
        let s = session(SessionStatus::Completed, 6);
        assert!(matches!(
            ensure_in_progress(&s),
            Err(PortError::SessionCompleted)
        ));
        assert!(matches!(
            ensure_can_generate(&s),
            Err(PortError::SessionCompleted)
        ));
    }

    #[test]
    fn generation_requires_four_messages() {
        let short = session(SessionStatus::InProgress, 3);
        assert!(matches!(
            ensure_can_generate(&short),
            Err(PortError::InsufficientContent)
        ));

        let ready = session(SessionStatus::InProgress, 4);
        assert!(ensure_can_generate(&ready).is_ok());
    }

    #[test]
    fn transcript_labels_speakers() {
        let messages = vec![
            ChatMessage::assistant("What does onboarding start with?"),
            ChatMessage::user("A kickoff call."),
        ];
        let transcript = conversation_transcript(&messages);
        assert_eq!(
            transcript,
            "Interviewer: What does onboarding start with?\n\nFounder: A kickoff call."
        );
    }
}
