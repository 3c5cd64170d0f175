//! Provider handler contract.
//!
//! Every provider integration implements [`ApiHandler`]: take a system
//! prompt and a conversation, give back the uniform chunk stream. The rest
//! of the framework only ever talks to this trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::error::ProviderError;
use crate::message::Message;
use crate::models::ModelInfo;
use crate::stream::ApiStream;

/// The model a handler has settled on for its requests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedModel {
    pub id: &'static str,
    pub info: &'static ModelInfo,
}

/// Caller-supplied handler configuration. Read-only to the handler.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HandlerOptions {
    /// API key for the upstream endpoint.
    pub api_key: String,
    /// Requested model id. Unknown ids fall back to the catalog default.
    pub api_model_id: Option<String>,
    /// Override for the upstream base URL (e.g. a staging endpoint).
    pub base_url: Option<String>,
}

impl HandlerOptions {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_model_id: None,
            base_url: None,
        }
    }

    pub fn with_model_id(mut self, model_id: impl Into<String>) -> Self {
        self.api_model_id = Some(model_id.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Build options from the environment.
    ///
    /// Loads `.env` if present, then reads `TELKOM_AI_API_KEY` (required),
    /// `TELKOM_AI_MODEL_ID` and `TELKOM_AI_BASE_URL`.
    pub fn from_env() -> Result<Self, ProviderError> {
        let _ = dotenvy::dotenv();

        let api_key =
            std::env::var("TELKOM_AI_API_KEY").map_err(|_| ProviderError::MissingApiKey)?;

        Ok(Self {
            api_key,
            api_model_id: std::env::var("TELKOM_AI_MODEL_ID").ok(),
            base_url: std::env::var("TELKOM_AI_BASE_URL").ok(),
        })
    }
}

/// One provider's request/response translation.
///
/// Handlers are stateless between calls; a single instance may serve
/// concurrent calls.
#[async_trait]
pub trait ApiHandler: Send + Sync {
    /// Issue one chat completion.
    ///
    /// On success the returned stream is complete and well-formed; on
    /// failure no partial stream is produced. A cancellation token, when
    /// given, aborts the in-flight request and any pending retry backoff
    /// with [`ProviderError::Cancelled`].
    async fn create_message(
        &self,
        system_prompt: &str,
        messages: &[Message],
        cancellation: Option<CancellationToken>,
    ) -> Result<ApiStream, ProviderError>;

    /// The model this handler resolves to, independent of any request.
    fn get_model(&self) -> ResolvedModel;
}
