//! Completion Client — the single point of entry for calls to the generation service.
//!
//! Speaks the OpenAI-compatible chat-completions protocol (Groq by default).
//! One attempt per call: no retries, no client-side timeout. Callers that need
//! bounded latency must impose their own deadline.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::document::{OptimizationRequest, RawCompletion};

pub const DEFAULT_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "llama3-8b-8192";
pub const DEFAULT_MAX_TOKENS: u32 = 2000;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Generation service error: {0}")]
    ApiError(String),

    #[error("Generation service returned no completion text")]
    MalformedResponse,
}

/// Per-call options sent alongside the request.
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    pub model: String,
    pub max_output_tokens: u32,
    pub temperature: f32,
    pub credential_token: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
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
    #[serde(default)]
    choices: Vec<Choice>,
    error: Option<ChatErrorBody>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatErrorBody {
    message: Option<String>,
}

impl ChatResponse {
    fn content(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
    }
}

#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_url: String,
}

impl LlmClient {
    pub fn new(api_url: String) -> Self {
        Self {
            client: Client::new(),
            api_url,
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Sends one chat-completion request and returns the first choice's text.
    pub async fn complete(
        &self,
        request: &OptimizationRequest,
        config: &CompletionConfig,
    ) -> Result<RawCompletion, ServiceError> {
        let body = ChatRequest {
            model: &config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user,
                },
            ],
            max_tokens: config.max_output_tokens,
            temperature: config.temperature,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&config.credential_token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        let parsed = match serde_json::from_str::<ChatResponse>(&text) {
            Ok(parsed) => parsed,
            Err(e) if status.is_success() => {
                warn!("Completion response is not valid JSON: {e}");
                return Err(ServiceError::MalformedResponse);
            }
            Err(_) => {
                warn!("Generation service returned {status}: {text}");
                return Err(ServiceError::ApiError(format!("status {}", status.as_u16())));
            }
        };

        if let Some(error) = parsed.error {
            let message = error.message.unwrap_or_else(|| "API Error".to_string());
            warn!("Generation service reported an error ({status}): {message}");
            return Err(ServiceError::ApiError(message));
        }

        if !status.is_success() {
            warn!("Generation service returned {status} without an error body");
            return Err(ServiceError::ApiError(format!("status {}", status.as_u16())));
        }

        let content = parsed.content().ok_or(ServiceError::MalformedResponse)?;
        debug!("Completion received: {} chars", content.len());

        Ok(RawCompletion::new(content))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-process fake of the chat-completions endpoint.

    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::HeaderMap, http::StatusCode, routing::post, Json, Router};
    use serde_json::Value;

    #[derive(Clone, Default)]
    pub struct Captured {
        pub requests: Arc<Mutex<Vec<(Option<String>, Value)>>>,
    }

    /// Serves `reply` for every POST and records the auth header and JSON body.
    pub async fn spawn_fake(status: StatusCode, reply: String) -> (String, Captured) {
        let captured = Captured::default();
        let app = Router::new()
            .route(
                "/v1/chat/completions",
                post(
                    move |State(captured): State<Captured>,
                          headers: HeaderMap,
                          Json(body): Json<Value>| {
                        let reply = reply.clone();
                        async move {
                            let auth = headers
                                .get("authorization")
                                .and_then(|v| v.to_str().ok())
                                .map(String::from);
                            captured.requests.lock().unwrap().push((auth, body));
                            (status, reply)
                        }
                    },
                ),
            )
            .with_state(captured.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{addr}/v1/chat/completions"), captured)
    }

    pub fn completion_body(content: &str) -> String {
        serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": content}}]
        })
        .to_string()
    }
}
