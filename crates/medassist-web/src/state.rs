//! Shared application state for the web server.

use std::sync::Arc;

use medassist_config::{Config, Provider};
use medassist_core::ResponseComposer;
use medassist_llm::{build_backend, BackendConfig, BackendKind};

/// The composer, or the reason it could not be built.
pub enum AssistantSlot {
    Ready(Arc<ResponseComposer>),
    /// Detail for the log; clients only see the generic configuration message.
    Misconfigured(String),
}

/// Shared state injected into every Axum handler.
pub struct AppState {
    pub assistant: AssistantSlot,
    pub max_message_chars: usize,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    /// Build the composer once from configuration. A missing credential does
    /// not stop the server; `/chat` reports it per request instead.
    pub fn from_config(config: &Config) -> Self {
        let assistant = match build_composer(config) {
            Ok(composer) => {
                tracing::info!(
                    backend = composer.backend().backend_name(),
                    model = composer.backend().model_id(),
                    "Assistant initialised"
                );
                AssistantSlot::Ready(Arc::new(composer))
            }
            Err(detail) => {
                tracing::warn!(%detail, "Assistant unavailable, /chat will report a configuration error");
                AssistantSlot::Misconfigured(detail)
            }
        };
        Self { assistant, max_message_chars: config.server.max_message_chars }
    }

    pub fn with_composer(composer: ResponseComposer, max_message_chars: usize) -> Self {
        Self {
            assistant: AssistantSlot::Ready(Arc::new(composer)),
            max_message_chars,
        }
    }

    pub fn misconfigured(detail: impl Into<String>, max_message_chars: usize) -> Self {
        Self {
            assistant: AssistantSlot::Misconfigured(detail.into()),
            max_message_chars,
        }
    }
}

fn backend_kind(provider: Provider) -> BackendKind {
    match provider {
        Provider::Gemini    => BackendKind::Gemini,
        Provider::OpenAi    => BackendKind::OpenAi,
        Provider::Anthropic => BackendKind::Anthropic,
        Provider::Ollama    => BackendKind::Ollama,
    }
}

fn build_composer(config: &Config) -> Result<ResponseComposer, String> {
    let llm = &config.llm;
    let api_key = llm.resolve_api_key().map_err(|e| e.to_string())?;
    let backend = build_backend(BackendConfig {
        kind: backend_kind(llm.provider),
        model: llm.model().to_string(),
        api_key,
        base_url: llm.base_url.clone(),
    })
    .map_err(|e| e.to_string())?;

    Ok(ResponseComposer::new(backend)
        .with_generation_limits(llm.max_output_tokens, llm.temperature))
}
