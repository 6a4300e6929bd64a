//! Generation backend trait and concrete implementations.
//!
//! Backends:
//!   GeminiBackend     — Google Gemini generateContent (gemini-1.5-flash, pro, …)
//!   OpenAiBackend     — OpenAI chat completions, or any compatible base URL
//!   AnthropicBackend  — Anthropic Messages API (claude-*)
//!   OllamaBackend     — local Ollama (OpenAI-compatible endpoint)
//!
//! Every backend sends the composed prompt as a single user turn.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_MAX_TOKENS: u32 = 2048;
const DEFAULT_TEMPERATURE: f32 = 0.4;

// ── Error ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Backend unavailable: {0}")]
    Unavailable(String),
    #[error("API error [{status}]: {message}")]
    ApiError { status: u16, message: String },
    #[error("Model returned an empty completion")]
    EmptyCompletion,
}

// ── Request / Response ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmRequest {
    pub prompt: String,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl LlmRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self { prompt: prompt.into(), max_tokens: None, temperature: None }
    }

    pub fn with_limits(mut self, max_tokens: u32, temperature: f32) -> Self {
        self.max_tokens = Some(max_tokens);
        self.temperature = Some(temperature);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    pub content: String,
    pub model: String,
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

// ── Trait ─────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait LlmBackend: Send + Sync {
    async fn complete(&self, req: LlmRequest) -> Result<LlmResponse, LlmError>;
    fn model_id(&self) -> &str;
    fn backend_name(&self) -> &'static str;
    fn is_local(&self) -> bool;
}

// ── Helpers ──────────────────────────────────────────────────────────────────

fn parse_openai_response(json: &serde_json::Value, fallback_model: &str) -> Result<LlmResponse, LlmError> {
    let content = json["choices"][0]["message"]["content"]
        .as_str()
        .unwrap_or("")
        .to_string();
    non_empty(LlmResponse {
        content,
        model: json["model"]
            .as_str()
            .unwrap_or(fallback_model)
            .to_string(),
        prompt_tokens:     json["usage"]["prompt_tokens"].as_u64().unwrap_or(0) as u32,
        completion_tokens: json["usage"]["completion_tokens"].as_u64().unwrap_or(0) as u32,
    })
}

fn non_empty(resp: LlmResponse) -> Result<LlmResponse, LlmError> {
    if resp.content.trim().is_empty() {
        return Err(LlmError::EmptyCompletion);
    }
    Ok(resp)
}

/// Characters of a non-JSON error body kept in the error message.
const ERROR_BODY_PREVIEW_CHARS: usize = 200;

async fn check_response_status(resp: reqwest::Response) -> Result<serde_json::Value, LlmError> {
    let status = resp.status().as_u16();
    if status >= 400 {
        let text = resp.text().await?;
        return Err(api_error(status, &text));
    }
    Ok(resp.json().await?)
}

/// Error for a failed call. Provider JSON errors yield their message; anything
/// else (e.g. a proxy's HTML page) is kept as a trimmed preview of the raw body.
fn api_error(status: u16, body: &str) -> LlmError {
    let from_json = serde_json::from_str::<serde_json::Value>(body).ok().and_then(|json| {
        json["error"]["message"]
            .as_str()
            .or_else(|| json["message"].as_str())
            .map(str::to_string)
    });
    let message = from_json.unwrap_or_else(|| {
        let raw = body.trim();
        if raw.is_empty() {
            "unknown API error".to_string()
        } else {
            raw.chars().take(ERROR_BODY_PREVIEW_CHARS).collect()
        }
    });
    LlmError::ApiError { status, message }
}

fn chat_body(model: &str, req: &LlmRequest) -> serde_json::Value {
    serde_json::json!({
        "model":       model,
        "messages":    [{ "role": "user", "content": req.prompt }],
        "max_tokens":  req.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
        "temperature": req.temperature.unwrap_or(DEFAULT_TEMPERATURE),
    })
}

// ── 1. Google Gemini ──────────────────────────────────────────────────────────

pub struct GeminiBackend {
    pub model: String,
    pub base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl GeminiBackend {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// Extract the first candidate's text. A blocked prompt comes back with no
/// candidates and a `promptFeedback.blockReason` instead.
fn parse_gemini_response(json: &serde_json::Value, model: &str) -> Result<LlmResponse, LlmError> {
    if let Some(reason) = json["promptFeedback"]["blockReason"].as_str() {
        return Err(LlmError::ApiError {
            status: 200,
            message: format!("prompt blocked: {reason}"),
        });
    }

    let content = json["candidates"][0]["content"]["parts"]
        .as_array()
        .map(|parts| {
            parts.iter()
                .filter_map(|p| p["text"].as_str())
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    non_empty(LlmResponse {
        content,
        model: model.to_string(),
        prompt_tokens: json["usageMetadata"]["promptTokenCount"]
            .as_u64().unwrap_or(0) as u32,
        completion_tokens: json["usageMetadata"]["candidatesTokenCount"]
            .as_u64().unwrap_or(0) as u32,
    })
}

#[async_trait]
impl LlmBackend for GeminiBackend {
    async fn complete(&self, req: LlmRequest) -> Result<LlmResponse, LlmError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        );

        let body = serde_json::json!({
            "contents": [{ "role": "user", "parts": [{ "text": req.prompt }] }],
            "generationConfig": {
                "maxOutputTokens": req.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
                "temperature":     req.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            }
        });

        let resp = self.client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;
        let json = check_response_status(resp).await?;
        parse_gemini_response(&json, &self.model)
    }

    fn model_id(&self) -> &str { &self.model }
    fn backend_name(&self) -> &'static str { "gemini" }
    fn is_local(&self) -> bool { false }
}

// ── 2. OpenAI (and compatible endpoints) ─────────────────────────────────────

pub struct OpenAiBackend {
    pub model: String,
    pub base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl OpenAiBackend {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            base_url: "https://api.openai.com".to_string(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Point at an OpenAI-compatible server (LMStudio, Groq, OpenRouter, vLLM, …).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl LlmBackend for OpenAiBackend {
    async fn complete(&self, req: LlmRequest) -> Result<LlmResponse, LlmError> {
        let url = format!("{}/v1/chat/completions", self.base_url.trim_end_matches('/'));
        let resp = self.client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&chat_body(&self.model, &req))
            .send()
            .await?;
        let json = check_response_status(resp).await?;
        parse_openai_response(&json, &self.model)
    }

    fn model_id(&self) -> &str { &self.model }
    fn backend_name(&self) -> &'static str { "openai" }
    fn is_local(&self) -> bool { false }
}

// ── 3. Anthropic (claude-*) ───────────────────────────────────────────────────

pub struct AnthropicBackend {
    pub model: String,
    pub base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl AnthropicBackend {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: "https://api.anthropic.com".to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

fn parse_anthropic_response(json: &serde_json::Value, model: &str) -> Result<LlmResponse, LlmError> {
    let content = json["content"]
        .as_array()
        .map(|blocks| {
            blocks.iter()
                .filter_map(|b| b["text"].as_str())
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    non_empty(LlmResponse {
        content,
        model: json["model"].as_str().unwrap_or(model).to_string(),
        prompt_tokens:     json["usage"]["input_tokens"].as_u64().unwrap_or(0) as u32,
        completion_tokens: json["usage"]["output_tokens"].as_u64().unwrap_or(0) as u32,
    })
}

#[async_trait]
impl LlmBackend for AnthropicBackend {
    async fn complete(&self, req: LlmRequest) -> Result<LlmResponse, LlmError> {
        let url = format!("{}/v1/messages", self.base_url.trim_end_matches('/'));
        let body = serde_json::json!({
            "model":       &self.model,
            "messages":    [{ "role": "user", "content": req.prompt }],
            "max_tokens":  req.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            "temperature": req.temperature.unwrap_or(DEFAULT_TEMPERATURE),
        });

        let resp = self.client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let json = check_response_status(resp).await?;
        parse_anthropic_response(&json, &self.model)
    }

    fn model_id(&self) -> &str { &self.model }
    fn backend_name(&self) -> &'static str { "anthropic" }
    fn is_local(&self) -> bool { false }
}

// ── 4. Ollama (local) ─────────────────────────────────────────────────────────

pub struct OllamaBackend {
    pub base_url: String,
    pub model: String,
    client: reqwest::Client,
}

impl OllamaBackend {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), model: model.into(), client: reqwest::Client::new() }
    }
}

#[async_trait]
impl LlmBackend for OllamaBackend {
    async fn complete(&self, req: LlmRequest) -> Result<LlmResponse, LlmError> {
        let url = format!("{}/v1/chat/completions", self.base_url.trim_end_matches('/'));
        let resp = self.client
            .post(&url)
            .json(&chat_body(&self.model, &req))
            .send()
            .await?;
        let json = check_response_status(resp).await?;
        parse_openai_response(&json, &self.model)
    }

    fn model_id(&self) -> &str { &self.model }
    fn backend_name(&self) -> &'static str { "ollama" }
    fn is_local(&self) -> bool { true }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
