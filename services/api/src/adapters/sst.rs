//! services/api/src/adapters/sst.rs
//!
//! This module contains the adapter for OpenAI's Speech-to-Text (Whisper) service.
//! It implements the `SpeechToTextService` port from the `core` crate.

use async_openai::{
    config::OpenAIConfig,
    types::audio::{AudioInput, CreateTranscriptionRequest},
    Client,
};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use capture_core::ports::{PortError, PortResult, SpeechToTextService};

use super::map_openai_error;

/// Largest audio payload accepted, after base64 decoding.
pub const MAX_AUDIO_BYTES: usize = 50 * 1024 * 1024;

/// Base64 strings arrive in one piece from the client; decoding in chunks
/// keeps peak memory bounded for recordings near the size limit.
const BASE64_CHUNK_CHARS: usize = 32_768;

/// Decodes a base64 audio payload chunk by chunk. Chunk boundaries are snapped
/// back to a multiple of four so no 4-character base64 group is split.
pub fn decode_base64_chunks(encoded: &str) -> PortResult<Vec<u8>> {
    let trimmed: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    let mut decoded = Vec::with_capacity(trimmed.len() / 4 * 3);
    let bytes = trimmed.as_bytes();

    let mut position = 0;
    while position < bytes.len() {
        let mut end = usize::min(position + BASE64_CHUNK_CHARS, bytes.len());
        if end < bytes.len() {
            end -= (end - position) % 4;
        }
        let chunk = std::str::from_utf8(&bytes[position..end])
            .map_err(|_| PortError::Validation("Audio payload is not valid base64".to_string()))?;
        let mut part = BASE64
            .decode(chunk)
            .map_err(|_| PortError::Validation("Audio payload is not valid base64".to_string()))?;
        decoded.append(&mut part);
        position = end;
    }
    Ok(decoded)
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements the `SpeechToTextService` port using the OpenAI Whisper API.
#[derive(Clone)]
pub struct OpenAiSstAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiSstAdapter {
    /// Creates a new `OpenAiSstAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }
}

//=========================================================================================
// `SpeechToTextService` Trait Implementation
//=========================================================================================

#[async_trait]
impl SpeechToTextService for OpenAiSstAdapter {
    /// Transcribes a slice of audio data into text using the configured Whisper model.
    /// Oversized payloads are rejected before any network call is made.
    async fn transcribe(&self, audio: &[u8], file_name: &str) -> PortResult<String> {
        if audio.is_empty() {
            return Err(PortError::Validation("Audio payload is empty".to_string()));
        }
        if audio.len() > MAX_AUDIO_BYTES {
            return Err(PortError::Validation(format!(
                "Audio payload is {} bytes; the limit is {} bytes",
                audio.len(),
                MAX_AUDIO_BYTES
            )));
        }

        let input = AudioInput::from_vec_u8(file_name.to_string(), audio.to_vec());

        let request = CreateTranscriptionRequest {
            file: input,
            model: self.model.clone(),
            ..Default::default()
        };

        let response = self
            .client
            .audio()
            .transcription()
            .create(request)
            .await
            .map_err(map_openai_error)?;

        Ok(response.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_a_payload_spanning_multiple_chunks() {
        let raw: Vec<u8> = (0..200_000u32).map(|i| (i % 251) as u8).collect();
        let encoded = BASE64.encode(&raw);
        assert!(encoded.len() > BASE64_CHUNK_CHARS);
        assert_eq!(decode_base64_chunks(&encoded).unwrap(), raw);
    }

    #[test]
    fn decodes_whitespace_separated_base64() {
        let encoded = format!("{}\n", BASE64.encode(b"hello "));
        let decoded = decode_base64_chunks(&encoded).unwrap();
        assert_eq!(decoded, b"hello ");
    }

    #[test]
    fn rejects_invalid_base64() {
        assert!(matches!(
            decode_base64_chunks("not base64!!!"),
            Err(PortError::Validation(_))
        ));
    }

    fn offline_adapter() -> OpenAiSstAdapter {
        OpenAiSstAdapter::new(Client::with_config(OpenAIConfig::new()), "whisper-1".to_string())
    }

    #[tokio::test]
    async fn audio_over_the_size_limit_is_rejected_before_any_network_call() {
        let audio = vec![0u8; MAX_AUDIO_BYTES + 1];
        let result = offline_adapter().transcribe(&audio, "audio.webm").await;
        assert!(matches!(result, Err(PortError::Validation(_))));
    }

    #[tokio::test]
    async fn empty_audio_is_rejected_before_any_network_call() {
        let result = offline_adapter().transcribe(&[], "audio.webm").await;
        assert!(matches!(result, Err(PortError::Validation(_))));
    }
}
