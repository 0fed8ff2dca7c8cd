//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use capture_core::ports::{
    DatabaseService, DocumentGenerationService, InterviewService, PortError, PortResult,
    SpeechToTextService,
};
use std::future::Future;
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn DatabaseService>,
    pub config: Arc<Config>,
    pub sst_adapter: Arc<dyn SpeechToTextService>,
    pub generation_adapter: Arc<dyn DocumentGenerationService>,
    pub interview_adapter: Arc<dyn InterviewService>,
}

impl AppState {
    /// Runs a collaborator call under the configured deadline. A call that
    /// outlives the deadline surfaces as `Unavailable` rather than hanging
    /// the request.
    pub async fn with_deadline<F, T>(&self, call: F) -> PortResult<T>
    where
        F: Future<Output = PortResult<T>>,
    {
        match tokio::time::timeout(self.config.collaborator_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(PortError::Unavailable(format!(
                "collaborator call exceeded {}s",
                self.config.collaborator_timeout.as_secs()
            ))),
        }
    }
}
