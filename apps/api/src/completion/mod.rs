/// Completion client — the single point of entry for all model calls in the
/// parser API.
///
/// ARCHITECTURAL RULE: No other module may call the inference provider
/// directly. All completion traffic MUST go through this module.
///
/// Model: mistralai/Mistral-7B-Instruct-v0.2 (hardcoded — do not make
/// configurable to prevent drift)
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const HF_ROUTER_URL: &str = "https://router.huggingface.co/v1/chat/completions";
/// The model used for all completion calls.
/// This is intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "mistralai/Mistral-7B-Instruct-v0.2";
/// Output cap: large enough to hold one full structured record.
const MAX_TOKENS: u32 = 2048;
/// Near-deterministic sampling keeps the output schema-compliant.
const TEMPERATURE: f32 = 0.1;
const REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("completion returned empty content")]
    EmptyContent,
}

impl From<reqwest::Error> for CompletionError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            CompletionError::Timeout(REQUEST_TIMEOUT_SECS)
        } else {
            CompletionError::Http(e)
        }
    }
}

/// A single request/response text-completion capability: prompt in, free
/// text out.
///
/// One concrete adapter per provider. Handlers hold this as
/// `Arc<dyn CompletionClient>` so tests substitute mocks without touching
/// the extraction logic.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Sends one prompt and returns the model's raw text reply.
    /// Exactly one attempt: no retry, no backoff. The underlying HTTP
    /// client enforces the request timeout.
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Hugging Face router adapter for `CompletionClient`.
/// Wraps the OpenAI-compatible chat-completions endpoint.
pub struct HfCompletionClient {
    client: Client,
    token: String,
}

impl HfCompletionClient {
    pub fn new(token: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            token,
        }
    }
}

#[async_trait]
impl CompletionClient for HfCompletionClient {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let request_body = ChatRequest {
            model: MODEL,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let response = self
            .client
            .post(HF_ROUTER_URL)
            .bearer_auth(&self.token)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Try to parse the provider's error message
            let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(CompletionError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let chat: ChatResponse = response.json().await?;

        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|text| !text.is_empty())
            .ok_or(CompletionError::EmptyContent)?;

        debug!("completion call succeeded ({} chars)", content.len());

        Ok(content)
    }
}
