//! medassist-llm — text-generation backend abstraction.
//! One composed prompt in, one completion out; no streaming, no history.

pub mod backend;
pub mod factory;
pub mod audit;

pub use backend::{LlmBackend, LlmError, LlmRequest, LlmResponse};
pub use factory::{build_backend, BackendConfig, BackendKind};
