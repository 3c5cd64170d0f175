//! Telkom AI provider handler.
//!
//! Talks to the Telkom AI OpenAI-compatible chat completions endpoint. The
//! upstream call is non-streaming; the complete response is normalized into
//! the uniform chunk stream (one text chunk, then usage if reported).

use std::time::Instant;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::error::ProviderError;
use crate::handler::{ApiHandler, HandlerOptions, ResolvedModel};
use crate::message::Message;
use crate::models::resolve_model;
use crate::retry::RetryPolicy;
use crate::stream::{stream_from_chunks, ApiStream, StreamChunk};

/// Production endpoint, overridable via `HandlerOptions::base_url`.
pub const TELKOM_AI_DEFAULT_BASE_URL: &str =
    "https://api-stage-aitools.telkom.design/v1/openai/chat/completions";

/// Fixed output budget for every request.
const MAX_TOKENS: u32 = 5000;

/// Race a future against the cancellation token, if one was given.
async fn with_cancellation<F, T>(
    fut: F,
    cancellation: Option<&CancellationToken>,
) -> Result<T, ProviderError>
where
    F: std::future::Future<Output = T>,
{
    match cancellation {
        Some(token) => tokio::select! {
            biased;
            _ = token.cancelled() => Err(ProviderError::Cancelled),
            value = fut => Ok(value),
        },
        None => Ok(fut.await),
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<WireMessage<'a>>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    usage: Option<WireUsage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct WireUsage {
    prompt_tokens: Option<u64>,
    completion_tokens: Option<u64>,
}

/// Handler for the Telkom AI endpoint.
///
/// Stateless between calls; clone or share one instance across tasks.
#[derive(Debug, Clone)]
pub struct TelkomAiHandler {
    options: HandlerOptions,
    base_url: String,
    retry: RetryPolicy,
    http_client: reqwest::Client,
}

impl TelkomAiHandler {
    /// Create a handler from caller options.
    ///
    /// Fails fast with [`ProviderError::MissingApiKey`] before any network
    /// attempt can happen.
    pub fn new(options: HandlerOptions) -> Result<Self, ProviderError> {
        if options.api_key.trim().is_empty() {
            return Err(ProviderError::MissingApiKey);
        }

        let base_url = options
            .base_url
            .clone()
            .unwrap_or_else(|| TELKOM_AI_DEFAULT_BASE_URL.to_string());

        let http_client = reqwest::Client::builder().build()?;

        Ok(Self {
            options,
            base_url,
            retry: RetryPolicy::default(),
            http_client,
        })
    }

    /// Replace the default retry policy.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// One network attempt: send the request, classify the status, parse.
    async fn request_completion(
        &self,
        body: &ChatRequest<'_>,
        cancellation: Option<&CancellationToken>,
    ) -> Result<ChatResponse, ProviderError> {
        let request_fut = self
            .http_client
            .post(&self.base_url)
            .header("Content-Type", "application/json")
            .header("Api-Key", &self.options.api_key)
            .json(body)
            .send();

        let response = with_cancellation(request_fut, cancellation).await??;

        let status = response.status();
        if !status.is_success() {
            let body_text = with_cancellation(response.text(), cancellation)
                .await?
                .unwrap_or_default();
            if status.as_u16() == 429 {
                return Err(ProviderError::RateLimited(body_text));
            }
            return Err(ProviderError::UpstreamStatus {
                status: status.as_u16(),
                body: body_text,
            });
        }

        // A failure here is only malformed payload if it is a decode error;
        // the body read can also die on the wire, which stays retryable.
        with_cancellation(response.json::<ChatResponse>(), cancellation)
            .await?
            .map_err(|e| {
                if e.is_decode() {
                    ProviderError::MalformedResponse(e.to_string())
                } else {
                    ProviderError::Network(e)
                }
            })
    }

    /// Normalize a successful response into chunks: the full text, then
    /// usage if the endpoint reported it (missing counts read as zero).
    fn chunks_from_response(response: ChatResponse) -> Result<Vec<StreamChunk>, ProviderError> {
        let choice = response.choices.into_iter().next().ok_or_else(|| {
            ProviderError::MalformedResponse("response contained no choices".to_string())
        })?;

        let mut chunks = vec![StreamChunk::Text {
            text: choice.message.content,
        }];

        if let Some(usage) = response.usage {
            chunks.push(StreamChunk::Usage {
                input_tokens: usage.prompt_tokens.unwrap_or(0),
                output_tokens: usage.completion_tokens.unwrap_or(0),
            });
        }

        Ok(chunks)
    }
}

#[async_trait]
impl ApiHandler for TelkomAiHandler {
    async fn create_message(
        &self,
        system_prompt: &str,
        messages: &[Message],
        cancellation: Option<CancellationToken>,
    ) -> Result<ApiStream, ProviderError> {
        let model = self.get_model();

        let mut wire_messages = Vec::with_capacity(messages.len() + 1);
        wire_messages.push(WireMessage {
            role: "system",
            content: system_prompt,
        });
        wire_messages.extend(messages.iter().map(|msg| WireMessage {
            role: msg.role.as_str(),
            content: &msg.content,
        }));

        let body = ChatRequest {
            model: model.id,
            max_tokens: MAX_TOKENS,
            messages: wire_messages,
            stream: false,
        };

        let start = Instant::now();
        info!(
            target: "llm",
            model = model.id,
            message_count = messages.len(),
            "Starting chat completion"
        );

        let chunks = self
            .retry
            .run(
                || {
                    let body = &body;
                    let cancellation = cancellation.as_ref();
                    async move {
                        let response = self.request_completion(body, cancellation).await?;
                        Self::chunks_from_response(response)
                    }
                },
                cancellation.as_ref(),
            )
            .await
            .map_err(|err| {
                error!(
                    target: "llm",
                    model = model.id,
                    error = %err,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Chat completion failed"
                );
                err
            })?;

        let (input_tokens, output_tokens) = chunks
            .iter()
            .find_map(|chunk| match chunk {
                StreamChunk::Usage {
                    input_tokens,
                    output_tokens,
                } => Some((Some(*input_tokens), Some(*output_tokens))),
                _ => None,
            })
            .unwrap_or((None, None));

        info!(
            target: "llm",
            model = model.id,
            elapsed_ms = start.elapsed().as_millis() as u64,
            input_tokens,
            output_tokens,
            "Chat completion finished"
        );

        Ok(stream_from_chunks(chunks))
    }

    fn get_model(&self) -> ResolvedModel {
        let (id, info) = resolve_model(self.options.api_model_id.as_deref());
        ResolvedModel { id, info }
    }
}
