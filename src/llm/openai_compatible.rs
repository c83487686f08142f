// ABOUTME: OpenAI-compatible chat-completions provider for meal plan generation
// ABOUTME: Posts chat requests with a bearer token and maps HTTP failures onto error codes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Healy Health Companion

//! # `OpenAI`-Compatible Provider
//!
//! Works with any endpoint implementing the `OpenAI` chat completions API:
//! hosted model-serving endpoints, Ollama, vLLM or `LocalAI`. The endpoint
//! is configured as the full completions URL, since hosted serving
//! endpoints do not follow the `/v1/chat/completions` layout.
//!
//! ## HTTP status mapping
//!
//! | Status      | Error code                   |
//! |-------------|------------------------------|
//! | 401, 403    | `ExternalAuthFailed`         |
//! | 429         | `ExternalRateLimited`        |
//! | 404         | `ExternalServiceUnavailable` |
//! | other       | `ExternalServiceError`       |

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use super::{ChatMessage, ChatRequest, ChatResponse, LlmProvider, TokenUsage};
use crate::config::LlmConfig;
use healy_core::constants::{defaults, service_names::GENERATION_SERVICE};
use healy_core::errors::{AppError, ErrorCode};

/// Longest slice of a non-JSON error body echoed into an error message
const ERROR_BODY_PREVIEW_CHARS: usize = 200;

// ============================================================================
// API Request/Response Types (OpenAI-compatible format)
// ============================================================================

#[derive(Debug, Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: Vec<OpenAiMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct OpenAiMessage<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> From<&'a ChatMessage> for OpenAiMessage<'a> {
    fn from(msg: &'a ChatMessage) -> Self {
        Self {
            role: msg.role.as_str(),
            content: &msg.content,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
    #[serde(default)]
    usage: Option<OpenAiUsage>,
    #[serde(default)]
    model: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    #[serde(rename = "prompt_tokens")]
    prompt: u32,
    #[serde(rename = "completion_tokens")]
    completion: u32,
    #[serde(rename = "total_tokens")]
    total: u32,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorResponse {
    error: OpenAiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorDetail {
    message: String,
}

// ============================================================================
// Provider Configuration
// ============================================================================

/// Configuration for the `OpenAI`-compatible provider
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleConfig {
    /// Full chat-completions URL
    pub endpoint: String,
    /// Bearer token (optional for local servers)
    pub api_key: Option<String>,
    /// Default model to use
    pub default_model: String,
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Whole-request timeout
    pub request_timeout: Duration,
}

impl Default for OpenAiCompatibleConfig {
    fn default() -> Self {
        Self {
            endpoint: defaults::LLM_ENDPOINT.to_owned(),
            api_key: None,
            default_model: defaults::LLM_MODEL.to_owned(),
            connect_timeout: Duration::from_secs(defaults::LLM_CONNECT_TIMEOUT_SECS),
            request_timeout: Duration::from_secs(defaults::LLM_TIMEOUT_SECS),
        }
    }
}

impl From<&LlmConfig> for OpenAiCompatibleConfig {
    fn from(config: &LlmConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            api_key: config.token.clone(),
            default_model: config.model.clone(),
            connect_timeout: Duration::from_secs(defaults::LLM_CONNECT_TIMEOUT_SECS),
            request_timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// Generic `OpenAI`-compatible chat-completions provider
pub struct OpenAiCompatibleProvider {
    client: Client,
    config: OpenAiCompatibleConfig,
}

impl OpenAiCompatibleProvider {
    /// Create a new provider with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: OpenAiCompatibleConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Configured completions URL
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    /// Add authorization header if a token is configured
    fn add_auth_header(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.config.api_key.as_deref() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Map a non-success HTTP response onto an error code
    pub(crate) fn parse_error_response(status: StatusCode, body: &str) -> AppError {
        let detail = serde_json::from_str::<OpenAiErrorResponse>(body).map_or_else(
            |_| body.trim().chars().take(ERROR_BODY_PREVIEW_CHARS).collect(),
            |response| response.error.message,
        );

        let (code, message) = match status.as_u16() {
            401 | 403 => (
                ErrorCode::ExternalAuthFailed,
                format!("Endpoint rejected the token ({status}): {detail}"),
            ),
            429 => (
                ErrorCode::ExternalRateLimited,
                format!("Endpoint rate limit reached: {detail}"),
            ),
            404 => (
                ErrorCode::ExternalServiceUnavailable,
                format!("Model or endpoint not found: {detail}"),
            ),
            _ => (
                ErrorCode::ExternalServiceError,
                format!("API error ({status}): {detail}"),
            ),
        };

        AppError::new(code, format!("{GENERATION_SERVICE}: {message}"))
            .with_details(serde_json::json!({ "status": status.as_u16() }))
    }

    /// Turn a successful response body into a `ChatResponse`
    pub(crate) fn parse_success_body(
        body: &str,
        fallback_model: &str,
    ) -> Result<ChatResponse, AppError> {
        let response: OpenAiResponse = serde_json::from_str(body).map_err(|e| {
            error!("Failed to parse completion response: {e}");
            AppError::external_service(GENERATION_SERVICE, format!("Failed to parse response: {e}"))
        })?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| {
                AppError::external_service(GENERATION_SERVICE, "API returned no choices")
            })?;

        Ok(ChatResponse {
            content: choice.message.content.unwrap_or_default(),
            model: response.model.unwrap_or_else(|| fallback_model.to_owned()),
            usage: response.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt,
                completion_tokens: u.completion,
                total_tokens: u.total,
            }),
            finish_reason: choice.finish_reason,
        })
    }
}

#[async_trait]
impl LlmProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        "openai-compatible"
    }

    fn default_model(&self) -> &str {
        &self.config.default_model
    }

    #[instrument(skip(self, request), fields(model = %request.model.as_deref().unwrap_or(&self.config.default_model)))]
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        let model = request
            .model
            .as_deref()
            .unwrap_or(&self.config.default_model);

        let openai_request = OpenAiRequest {
            model,
            messages: request.messages.iter().map(OpenAiMessage::from).collect(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };
        debug!(
            messages = openai_request.messages.len(),
            max_tokens = ?request.max_tokens,
            "Sending chat completion request"
        );

        let http_request = self.client.post(&self.config.endpoint).json(&openai_request);
        let response = self
            .add_auth_header(http_request)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to send request to {}: {e}", self.config.endpoint);
                if e.is_connect() || e.is_timeout() {
                    AppError::new(
                        ErrorCode::ExternalServiceUnavailable,
                        format!(
                            "{GENERATION_SERVICE}: cannot reach {} ({e})",
                            self.config.endpoint
                        ),
                    )
                } else {
                    AppError::external_service(GENERATION_SERVICE, format!("Request failed: {e}"))
                }
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!("Failed to read completion response: {e}");
            AppError::external_service(GENERATION_SERVICE, format!("Failed to read response: {e}"))
        })?;

        if !status.is_success() {
            return Err(Self::parse_error_response(status, &body));
        }

        let chat_response = Self::parse_success_body(&body, model)?;
        debug!(
            chars = chat_response.content.len(),
            finish_reason = ?chat_response.finish_reason,
            "Received completion"
        );
        Ok(chat_response)
    }
}
