//! services/api/src/adapters/mod.rs
//!
//! Concrete implementations of the ports defined in the `core` crate.

pub mod db;
pub mod doc_llm;
pub mod interview_llm;
pub mod sst;

pub use db::DbAdapter;
pub use doc_llm::OpenAiDocumentAdapter;
pub use interview_llm::OpenAiInterviewAdapter;
pub use sst::OpenAiSstAdapter;

use async_openai::error::OpenAIError;
use capture_core::ports::PortError;

/// Maps an OpenAI client error onto the port taxonomy so handlers can pick
/// the right status code without knowing the client library.
pub(crate) fn map_openai_error(err: OpenAIError) -> PortError {
    let text = err.to_string();
    let lowered = text.to_lowercase();
    if lowered.contains("rate limit") || lowered.contains("429") {
        PortError::RateLimited
    } else if lowered.contains("quota") || lowered.contains("insufficient_quota") {
        PortError::QuotaExceeded
    } else if lowered.contains("error sending request")
        || lowered.contains("timed out")
        || lowered.contains("connection")
    {
        PortError::Unavailable(text)
    } else {
        PortError::Unexpected(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_text_maps_to_rate_limited() {
        let err = OpenAIError::InvalidArgument("Rate limit reached for requests".to_string());
        assert!(matches!(map_openai_error(err), PortError::RateLimited));
    }

    #[test]
    fn quota_text_maps_to_quota_exceeded() {
        let err = OpenAIError::InvalidArgument(
            "You exceeded your current quota, please check your plan".to_string(),
        );
        assert!(matches!(map_openai_error(err), PortError::QuotaExceeded));
    }

    #[test]
    fn unknown_text_maps_to_unexpected() {
        let err = OpenAIError::InvalidArgument("something else entirely".to_string());
        assert!(matches!(map_openai_error(err), PortError::Unexpected(_)));
    }
}
