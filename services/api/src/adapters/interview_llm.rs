//! services/api/src/adapters/interview_llm.rs
//!
//! This module contains the adapter for the Interviewing LLM.
//! It implements the `InterviewService` port from the `core` crate.

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use capture_core::{
    domain::{ChatMessage, DocumentKind, MessageRole},
    ports::{InterviewService, PortError, PortResult},
};

use super::map_openai_error;

//=========================================================================================
// Prompt Construction
//=========================================================================================

/// Short description of the target kind, woven into the interviewer prompt.
fn kind_description(kind: DocumentKind) -> &'static str {
    match kind {
        DocumentKind::Sop => {
            "Standard Operating Procedure with clear steps, responsibilities, and checkpoints"
        }
        DocumentKind::HowTo => "How-To Guide with practical instructions and tips",
        DocumentKind::ProductDoc => {
            "Product Documentation covering features, usage, and specifications"
        }
        DocumentKind::Reflection => {
            "Founder Reflection capturing insights, lessons learned, and personal journey"
        }
        DocumentKind::General => "General Knowledge documentation",
    }
}

fn system_prompt(topic: &str, kind: DocumentKind) -> String {
    format!(
        "You are an expert interviewer helping founders capture their knowledge. Your goal \
         is to extract valuable insights through thoughtful questions.\n\n\
         You are helping create a {} about: {}\n\n\
         Guidelines:\n\
         - Ask one focused question at a time\n\
         - Use follow-up questions to dig deeper into interesting points\n\
         - Be encouraging and acknowledge good insights\n\
         - Help the founder articulate tacit knowledge they might not realize they have\n\
         - After 4-6 exchanges, you can suggest wrapping up if enough content has been gathered\n\
         - Keep responses concise but warm",
        kind_description(kind),
        topic,
    )
}

fn to_request_message(message: &ChatMessage) -> PortResult<ChatCompletionRequestMessage> {
    let built = match message.role {
        MessageRole::User => ChatCompletionRequestUserMessageArgs::default()
            .content(message.content.clone())
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?
            .into(),
        MessageRole::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
            .content(message.content.clone())
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?
            .into(),
    };
    Ok(built)
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `InterviewService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiInterviewAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiInterviewAdapter {
    /// Creates a new `OpenAiInterviewAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }
}

//=========================================================================================
// `InterviewService` Trait Implementation
//=========================================================================================

#[async_trait]
impl InterviewService for OpenAiInterviewAdapter {
    /// Produces the next interviewer question. An empty log means the session
    /// is just starting, so a synthetic opening request stands in for the
    /// founder's first message.
    async fn next_question(
        &self,
        topic: &str,
        kind: DocumentKind,
        messages: &[ChatMessage],
    ) -> PortResult<String> {
        let mut request_messages: Vec<ChatCompletionRequestMessage> =
            Vec::with_capacity(messages.len() + 2);
        request_messages.push(
            ChatCompletionRequestSystemMessageArgs::default()
                .content(system_prompt(topic, kind))
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
        );

        if messages.is_empty() {
            request_messages.push(
                ChatCompletionRequestUserMessageArgs::default()
                    .content(format!(
                        "I want to document: {}. Please start the interview.",
                        topic
                    ))
                    .build()
                    .map_err(|e| PortError::Unexpected(e.to_string()))?
                    .into(),
            );
        } else {
            for message in messages {
                request_messages.push(to_request_message(message)?);
            }
        }

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(request_messages)
            .n(1)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(map_openai_error)?;

        if let Some(choice) = response.choices.into_iter().next() {
            if let Some(content) = choice.message.content {
                Ok(content)
            } else {
                Err(PortError::Unexpected(
                    "Interview LLM response contained no text content.".to_string(),
                ))
            }
        } else {
            Err(PortError::Unexpected(
                "Interview LLM returned no choices in its response.".to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_names_the_target_kind_and_topic() {
        let prompt = system_prompt("customer onboarding", DocumentKind::Sop);
        assert!(prompt.contains("Standard Operating Procedure"));
        assert!(prompt.contains("customer onboarding"));
    }

    #[test]
    fn both_roles_convert_to_request_messages() {
        let user = ChatMessage::user("We start with a kickoff call.");
        let assistant = ChatMessage::assistant("What happens after the call?");
        assert!(to_request_message(&user).is_ok());
        assert!(to_request_message(&assistant).is_ok());
    }
}
