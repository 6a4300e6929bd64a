//! medassist-core — triage, symptom matching and response composition.
//!
//! Request flow:
//!   message → TriageClassifier → (emergency: canned notice, done)
//!           → SymptomMatcher → prompt → LlmBackend → ChatResponse

pub mod keywords;
pub mod triage;
pub mod symptoms;
pub mod prompt;
pub mod composer;
pub mod tips;

pub use composer::{ChatResponse, ComposeError, ResponseComposer, Stage};
pub use symptoms::{AnalysisConfidence, ConditionMatch, SymptomAnalysis, SymptomMatcher};
pub use triage::{RiskLevel, TriageClassifier, TriageResult, Urgency};
