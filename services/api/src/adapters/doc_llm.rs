//! services/api/src/adapters/doc_llm.rs
//!
//! This module contains the adapter for the Document-Generating LLM.
//! It implements the `DocumentGenerationService` port from the `core` crate.
//!
//! The model is asked for a JSON object. Models wrap JSON in prose or code
//! fences often enough that the reply is scanned for the first balanced
//! object; if no parseable object is found at all, generation degrades to a
//! fallback document built from the raw reply instead of failing the request.

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use capture_core::{
    domain::{DocumentKind, GeneratedDocument, GenerationSource},
    interview::conversation_transcript,
    ports::{DocumentGenerationService, PortError, PortResult},
};

use super::map_openai_error;

//=========================================================================================
// Per-Kind Prompt Outlines
//=========================================================================================

/// The output outline the model is instructed to follow for each kind.
fn kind_instructions(kind: DocumentKind) -> &'static str {
    match kind {
        DocumentKind::Sop => {
            "Create a Standard Operating Procedure (SOP) with:\n\
             - Clear title\n\
             - Purpose/objective\n\
             - Scope\n\
             - Numbered step-by-step procedures\n\
             - Roles and responsibilities where applicable\n\
             - Checklists for quality assurance\n\
             - Notes and tips"
        }
        DocumentKind::HowTo => {
            "Create a How-To Guide with:\n\
             - Clear, action-oriented title\n\
             - Brief introduction explaining what will be achieved\n\
             - Prerequisites or requirements\n\
             - Step-by-step instructions\n\
             - Tips and best practices\n\
             - Troubleshooting section if applicable"
        }
        DocumentKind::ProductDoc => {
            "Create Product Documentation with:\n\
             - Clear product/feature name\n\
             - Overview and purpose\n\
             - Key features and capabilities\n\
             - Usage instructions\n\
             - Configuration options\n\
             - Best practices"
        }
        DocumentKind::Reflection => {
            "Create a Founder Reflection with:\n\
             - Meaningful title capturing the theme\n\
             - Context and background\n\
             - Key insights and lessons learned\n\
             - Challenges faced and how they were overcome\n\
             - Advice for other founders\n\
             - Personal takeaways"
        }
        DocumentKind::General => {
            "Create well-organized documentation with:\n\
             - Clear, descriptive title\n\
             - Executive summary\n\
             - Main content organized into logical sections\n\
             - Key takeaways\n\
             - Action items or next steps if applicable"
        }
    }
}

fn system_prompt(topic: &str, kind: DocumentKind, source_label: &str) -> String {
    format!(
        "You are an expert documentation writer helping founders turn their knowledge into \
         structured, professional documents.\n\n\
         Task: {}\n\n\
         Topic: {}\n\n\
         Source: {}\n\n\
         Instructions:\n\
         1. Extract all valuable insights from the source content\n\
         2. Organize into a clear, professional structure following the format above\n\
         3. Use clear headings and subheadings\n\
         4. Include actionable steps where appropriate\n\
         5. Add bullet points and numbered lists for clarity\n\
         6. Keep the founder's voice and personality while making it professional\n\
         7. Generate relevant tags based on the content (3-5 tags)\n\n\
         Respond with a JSON object containing:\n\
         {{\n\
           \"title\": \"Document title\",\n\
           \"content\": \"Full formatted document content with markdown headings, lists, etc.\",\n\
           \"summary\": \"2-3 sentence summary of the document\",\n\
           \"tags\": [\"tag1\", \"tag2\", \"tag3\"]\n\
         }}",
        kind_instructions(kind),
        topic,
        source_label,
    )
}

//=========================================================================================
// Reply Parsing
//=========================================================================================

/// Finds the first balanced `{...}` object in `text`, tracking string literals
/// and escapes so braces inside values do not end the scan early.
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &b) in bytes[start..].iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Parses the model reply into a `GeneratedDocument`, degrading to a fallback
/// document built from the raw reply when no usable JSON is present.
fn parse_generated(reply: &str, topic: &str) -> GeneratedDocument {
    if let Some(candidate) = extract_json_object(reply) {
        if let Ok(parsed) = serde_json::from_str::<GeneratedDocument>(candidate) {
            if !parsed.title.trim().is_empty() {
                return parsed;
            }
        }
    }

    GeneratedDocument {
        title: topic.to_string(),
        content: reply.to_string(),
        summary: format!("Documentation about {}", topic),
        tags: Vec::new(),
    }
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `DocumentGenerationService` using an
/// OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiDocumentAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiDocumentAdapter {
    /// Creates a new `OpenAiDocumentAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }
}

//=========================================================================================
// `DocumentGenerationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl DocumentGenerationService for OpenAiDocumentAdapter {
    async fn generate(
        &self,
        topic: &str,
        kind: DocumentKind,
        source: GenerationSource<'_>,
    ) -> PortResult<GeneratedDocument> {
        let source_content = match &source {
            GenerationSource::Conversation(messages) => conversation_transcript(messages),
            GenerationSource::VoiceTranscript(text) | GenerationSource::FileContent(text) => {
                text.to_string()
            }
        };
        if source_content.trim().is_empty() {
            return Err(PortError::Validation(
                "There is no source content to generate from".to_string(),
            ));
        }

        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(system_prompt(topic, kind, source.label()))
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(source_content)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .n(1)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(map_openai_error)?;

        let reply = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                PortError::Unexpected(
                    "Document generation LLM returned no text content.".to_string(),
                )
            })?;

        Ok(parse_generated(&reply, topic))
    }
}

//=========================================================================================
// Tests
//=========================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_json_wrapped_in_a_code_fence() {
        let reply = "Here you go:\n```json\n{\"title\": \"Refund Handling SOP\", \
                     \"content\": \"# Steps\", \"summary\": \"How refunds work.\", \
                     \"tags\": [\"support\"]}\n```";
        let doc = parse_generated(reply, "refunds");
        assert_eq!(doc.title, "Refund Handling SOP");
        assert_eq!(doc.tags, vec!["support".to_string()]);
    }

    #[test]
    fn handles_braces_inside_string_values() {
        let reply = r#"{"title": "Config {advanced}", "content": "Use { } literally", "summary": "s", "tags": []}"#;
        let doc = parse_generated(reply, "config");
        assert_eq!(doc.title, "Config {advanced}");
        assert_eq!(doc.content, "Use { } literally");
    }

    #[test]
    fn falls_back_to_raw_reply_when_no_json_is_present() {
        let reply = "I could not produce structured output, but here is the gist.";
        let doc = parse_generated(reply, "onboarding");
        assert_eq!(doc.title, "onboarding");
        assert_eq!(doc.content, reply);
        assert_eq!(doc.summary, "Documentation about onboarding");
        assert!(doc.tags.is_empty());
    }

    #[test]
    fn every_kind_has_a_distinct_outline() {
        let outlines: Vec<&str> = DocumentKind::ALL
            .iter()
            .map(|k| kind_instructions(*k))
            .collect();
        for (i, a) in outlines.iter().enumerate() {
            for b in &outlines[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn extract_ignores_text_after_the_object() {
        let reply = "prefix {\"title\": \"T\"} suffix with } stray brace";
        assert_eq!(extract_json_object(reply), Some("{\"title\": \"T\"}"));
    }
}
