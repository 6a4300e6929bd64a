//! Shared testing utilities: a scripted generation backend and sample messages.

pub mod fixtures;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use medassist_llm::{LlmBackend, LlmError, LlmRequest, LlmResponse};

/// What the scripted backend does when called.
#[derive(Debug, Clone)]
pub enum Script {
    Reply(String),
    Fail { status: u16, message: String },
}

/// In-process stand-in for a generation service.
///
/// Records every prompt it is given so tests can assert on what was sent,
/// or that nothing was sent at all.
pub struct ScriptedBackend {
    script: Script,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    pub fn replying(text: impl Into<String>) -> Self {
        Self::new(Script::Reply(text.into()))
    }

    pub fn failing(status: u16, message: impl Into<String>) -> Self {
        Self::new(Script::Fail { status, message: message.into() })
    }

    pub fn new(script: Script) -> Self {
        Self { script, calls: AtomicUsize::new(0), prompts: Mutex::new(Vec::new()) }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts().pop()
    }
}

#[async_trait]
impl LlmBackend for ScriptedBackend {
    async fn complete(&self, req: LlmRequest) -> Result<LlmResponse, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(req.prompt.clone());
        }
        match &self.script {
            Script::Reply(text) => Ok(LlmResponse {
                content: text.clone(),
                model: "scripted".to_string(),
                prompt_tokens: req.prompt.split_whitespace().count() as u32,
                completion_tokens: text.split_whitespace().count() as u32,
            }),
            Script::Fail { status, message } => Err(LlmError::ApiError {
                status: *status,
                message: message.clone(),
            }),
        }
    }

    fn model_id(&self) -> &str { "scripted" }
    fn backend_name(&self) -> &'static str { "scripted" }
    fn is_local(&self) -> bool { true }
}
