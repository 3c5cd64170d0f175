//! Model catalog for the Telkom AI endpoint.
//!
//! Static table of model id → metadata plus the default model. This is the
//! single source of truth for context windows, output limits and pricing.

use serde::Serialize;

/// Metadata for one model. Prices are USD per million tokens.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModelInfo {
    /// Maximum output tokens the model will produce.
    pub max_tokens: u32,
    /// Context window size in tokens.
    pub context_window: u32,
    /// Whether the model accepts image input.
    pub supports_images: bool,
    /// Whether the endpoint supports prompt caching for this model.
    pub supports_prompt_cache: bool,
    pub input_price: f64,
    pub output_price: f64,
}

/// The catalog entry used when the caller requests nothing, or something
/// unknown. Id and info travel together so they cannot drift apart.
const DEFAULT_MODEL: (&str, ModelInfo) = (
    "gpt-4o",
    ModelInfo {
        max_tokens: 16_384,
        context_window: 128_000,
        supports_images: true,
        supports_prompt_cache: false,
        input_price: 2.5,
        output_price: 10.0,
    },
);

/// Model used when the caller requests nothing, or something unknown.
pub const TELKOM_AI_DEFAULT_MODEL_ID: &str = DEFAULT_MODEL.0;

/// Models served by the Telkom AI OpenAI-compatible proxy.
pub const TELKOM_AI_MODELS: &[(&str, ModelInfo)] = &[
    DEFAULT_MODEL,
    (
        "gpt-4o-mini",
        ModelInfo {
            max_tokens: 16_384,
            context_window: 128_000,
            supports_images: true,
            supports_prompt_cache: false,
            input_price: 0.15,
            output_price: 0.6,
        },
    ),
    (
        "gpt-3.5-turbo",
        ModelInfo {
            max_tokens: 4_096,
            context_window: 16_385,
            supports_images: false,
            supports_prompt_cache: false,
            input_price: 0.5,
            output_price: 1.5,
        },
    ),
];

/// Look up a model by id.
pub fn model_info(id: &str) -> Option<&'static ModelInfo> {
    TELKOM_AI_MODELS
        .iter()
        .find(|(model_id, _)| *model_id == id)
        .map(|(_, info)| info)
}

/// Resolve the effective model for a request.
///
/// A known requested id wins; anything else (including no request at all)
/// silently falls back to the default. Callers that need strict validation
/// must check the catalog themselves.
pub fn resolve_model(requested: Option<&str>) -> (&'static str, &'static ModelInfo) {
    requested
        .and_then(|id| {
            TELKOM_AI_MODELS
                .iter()
                .find(|(model_id, _)| *model_id == id)
        })
        .map(|(id, info)| (*id, info))
        .unwrap_or((DEFAULT_MODEL.0, &DEFAULT_MODEL.1))
}
