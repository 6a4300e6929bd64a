//! Backend factory — turns configuration into a concrete `LlmBackend`.

use std::sync::Arc;
use crate::backend::{
    AnthropicBackend, GeminiBackend, LlmBackend, LlmError, OllamaBackend, OpenAiBackend,
};

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Gemini,
    OpenAi,
    Anthropic,
    Ollama,
}

/// Everything needed to construct one backend.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub kind: BackendKind,
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

/// Build the configured backend. Remote kinds require an API key.
pub fn build_backend(cfg: BackendConfig) -> Result<Arc<dyn LlmBackend>, LlmError> {
    let BackendConfig { kind, model, api_key, base_url } = cfg;
    let key = || {
        api_key.clone()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| LlmError::Unavailable(format!("{kind:?} backend requires an API key")))
    };

    let backend: Arc<dyn LlmBackend> = match kind {
        BackendKind::Ollama => {
            let url = base_url.unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string());
            Arc::new(OllamaBackend::new(url, model))
        }
        BackendKind::Gemini => {
            let b = GeminiBackend::new(key()?, model);
            Arc::new(match base_url { Some(url) => b.with_base_url(url), None => b })
        }
        BackendKind::OpenAi => {
            let b = OpenAiBackend::new(key()?, model);
            Arc::new(match base_url { Some(url) => b.with_base_url(url), None => b })
        }
        BackendKind::Anthropic => {
            let b = AnthropicBackend::new(key()?, model);
            Arc::new(match base_url { Some(url) => b.with_base_url(url), None => b })
        }
    };

    tracing::info!(
        backend = backend.backend_name(),
        model = backend.model_id(),
        is_local = backend.is_local(),
        "Generation backend ready"
    );
    Ok(backend)
}
