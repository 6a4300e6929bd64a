//! Audit record for generation calls. Records are emitted through `tracing`,
//! never persisted.

use chrono::Utc;
use serde::Serialize;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::backend::{LlmBackend, LlmResponse};

#[derive(Debug, Clone, Serialize)]
pub struct GenerationAudit {
    pub id: Uuid,
    pub backend: String,
    pub model: String,
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    /// Triage tier of the request that triggered the call.
    pub urgency: String,
    pub output_hash: String,
    pub latency_ms: u64,
    pub called_at: chrono::DateTime<Utc>,
}

impl GenerationAudit {
    pub fn new(
        backend: &dyn LlmBackend,
        response: &LlmResponse,
        urgency: impl Into<String>,
        latency_ms: u64,
    ) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(response.content.as_bytes());
        let output_hash = format!("{:x}", hasher.finalize());

        Self {
            id: Uuid::new_v4(),
            backend: backend.backend_name().to_string(),
            model: response.model.clone(),
            prompt_tokens: response.prompt_tokens,
            completion_tokens: response.completion_tokens,
            urgency: urgency.into(),
            output_hash,
            latency_ms,
            called_at: Utc::now(),
        }
    }

    pub fn emit(&self) {
        tracing::info!(
            audit_id = %self.id,
            backend = %self.backend,
            model = %self.model,
            prompt_tokens = self.prompt_tokens,
            completion_tokens = self.completion_tokens,
            urgency = %self.urgency,
            output_hash = %self.output_hash,
            latency_ms = self.latency_ms,
            "Generation call completed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::OllamaBackend;

    #[test]
    fn test_output_hash_is_sha256_hex() {
        let backend = OllamaBackend::new("http://localhost:11434", "llama3:8b");
        let response = LlmResponse {
            content: "abc".to_string(),
            model: "llama3:8b".to_string(),
            prompt_tokens: 1,
            completion_tokens: 1,
        };
        let audit = GenerationAudit::new(&backend, &response, "routine", 12);
        assert_eq!(
            audit.output_hash,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(audit.backend, "ollama");
        assert_eq!(audit.urgency, "routine");
    }
}
