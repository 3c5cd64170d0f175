//! Telkom AI provider layer
//!
//! This crate provides:
//! - The uniform handler contract every model provider implements
//! - A retry policy with exponential backoff for transient upstream failures
//! - The model catalog with default-model fallback
//! - The Telkom AI (OpenAI-compatible) handler implementation

pub mod error;
pub mod handler;
pub mod message;
pub mod models;
pub mod retry;
pub mod stream;
pub mod telkom;

pub use error::ProviderError;
pub use handler::{ApiHandler, HandlerOptions, ResolvedModel};
pub use message::{Message, Role};
pub use models::{
    model_info, resolve_model, ModelInfo, TELKOM_AI_DEFAULT_MODEL_ID, TELKOM_AI_MODELS,
};
pub use retry::RetryPolicy;
pub use stream::{ApiStream, StreamChunk};
pub use telkom::{TelkomAiHandler, TELKOM_AI_DEFAULT_BASE_URL};
