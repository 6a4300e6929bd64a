//! Response composition for a single chat request.
//!
//! Stages: Received → Triaged → (emergency: done) → Analyzed → Generated → Composed.
//! An emergency triage result ends the request immediately with the canned
//! notice; neither symptom analysis nor generation runs.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use thiserror::Error;

use medassist_common::round_hundredths;
use medassist_llm::audit::GenerationAudit;
use medassist_llm::{LlmBackend, LlmError, LlmRequest};

use crate::prompt::build_prompt;
use crate::symptoms::{SymptomAnalysis, SymptomMatcher};
use crate::triage::{TriageClassifier, TriageResult, Urgency};

pub const BASE_DISCLAIMERS: [&str; 3] = [
    "This AI assistant provides general health information only and is not a substitute for \
     professional medical advice, diagnosis, or treatment.",
    "Always seek the advice of your physician or other qualified health provider with any \
     questions you may have regarding a medical condition.",
    "Never disregard professional medical advice or delay seeking it because of something you \
     have read here.",
];

pub const URGENT_DISCLAIMER: &str =
    "⚠️ Your symptoms may require prompt medical attention. Please contact your healthcare provider.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Received,
    Triaged,
    Analyzed,
    Generated,
    Composed,
}

#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("{source}")]
    Generation {
        /// Last stage completed before the failure.
        stage: Stage,
        #[source]
        source: LlmError,
        elapsed_secs: f64,
    },
}

impl ComposeError {
    pub fn stage(&self) -> Stage {
        match self {
            ComposeError::Generation { stage, .. } => *stage,
        }
    }

    pub fn elapsed_secs(&self) -> f64 {
        match self {
            ComposeError::Generation { elapsed_secs, .. } => *elapsed_secs,
        }
    }
}

/// Everything the HTTP layer needs to render a reply.
#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    pub text: String,
    pub triage: TriageResult,
    /// Present only when at least one condition matched.
    pub symptom_analysis: Option<SymptomAnalysis>,
    /// Empty for emergencies.
    pub disclaimers: Vec<String>,
    /// `None` for emergencies, whose action is already in `text`.
    pub recommended_action: Option<String>,
    pub emergency: bool,
    /// Seconds since the request was received, rounded to hundredths.
    pub response_time: f64,
}

/// Disclaimers for a non-emergency reply.
pub fn disclaimers_for(urgency: Urgency) -> Vec<String> {
    let mut out: Vec<String> = BASE_DISCLAIMERS.iter().map(|d| d.to_string()).collect();
    if urgency == Urgency::Urgent {
        out.insert(0, URGENT_DISCLAIMER.to_string());
    }
    out
}

#[derive(Debug, Clone, Copy)]
struct GenerationLimits {
    max_tokens: u32,
    temperature: f32,
}

/// Owns the triage tables, the symptom matcher and the generation backend.
/// Built once at startup and shared read-only between requests.
pub struct ResponseComposer {
    triage: TriageClassifier,
    matcher: SymptomMatcher,
    backend: Arc<dyn LlmBackend>,
    limits: Option<GenerationLimits>,
}

impl ResponseComposer {
    pub fn new(backend: Arc<dyn LlmBackend>) -> Self {
        Self {
            triage: TriageClassifier::default(),
            matcher: SymptomMatcher::default(),
            backend,
            limits: None,
        }
    }

    pub fn with_generation_limits(mut self, max_tokens: u32, temperature: f32) -> Self {
        self.limits = Some(GenerationLimits { max_tokens, temperature });
        self
    }

    pub fn backend(&self) -> &dyn LlmBackend {
        self.backend.as_ref()
    }

    pub async fn respond(&self, message: &str) -> Result<ChatResponse, ComposeError> {
        let started = Instant::now();
        let elapsed = || round_hundredths(started.elapsed().as_secs_f64());
        tracing::debug!(stage = ?Stage::Received, chars = message.chars().count());

        let triage = self.triage.assess_urgency(message);
        tracing::debug!(
            stage = ?Stage::Triaged,
            urgency = triage.urgency.as_str(),
            risk = triage.risk.as_str()
        );

        if triage.is_emergency() {
            tracing::warn!(reasoning = %triage.reasoning, "Emergency detected, skipping generation");
            return Ok(ChatResponse {
                text: triage.safety_notice().unwrap_or_default(),
                triage,
                symptom_analysis: None,
                disclaimers: Vec::new(),
                recommended_action: None,
                emergency: true,
                response_time: elapsed(),
            });
        }

        let analysis = self.matcher.analyze_symptoms(message);
        let explanation = analysis
            .has_conditions()
            .then(|| self.matcher.generate_explanation(&analysis));
        tracing::debug!(stage = ?Stage::Analyzed, total_matches = analysis.total_matches);

        let prompt = build_prompt(&triage, explanation.as_deref(), message);
        let mut request = LlmRequest::new(prompt);
        if let Some(limits) = self.limits {
            request = request.with_limits(limits.max_tokens, limits.temperature);
        }

        let call_started = Instant::now();
        let generated = match self.backend.complete(request).await {
            Ok(resp) => resp,
            Err(source) => {
                tracing::error!(error = %source, backend = self.backend.backend_name(), "Generation failed");
                return Err(ComposeError::Generation {
                    stage: Stage::Analyzed,
                    source,
                    elapsed_secs: elapsed(),
                });
            }
        };
        GenerationAudit::new(
            self.backend.as_ref(),
            &generated,
            triage.urgency.as_str(),
            call_started.elapsed().as_millis() as u64,
        )
        .emit();
        tracing::debug!(stage = ?Stage::Generated, model = %generated.model);

        let text = match triage.safety_notice() {
            Some(notice) => format!("{notice}\n\n{}", generated.content),
            None => generated.content,
        };
        tracing::debug!(stage = ?Stage::Composed);

        Ok(ChatResponse {
            text,
            disclaimers: disclaimers_for(triage.urgency),
            recommended_action: Some(triage.action_required.clone()),
            symptom_analysis: analysis.has_conditions().then_some(analysis),
            triage,
            emergency: false,
            response_time: elapsed(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medassist_test_utils::{fixtures, ScriptedBackend};
    use pretty_assertions::assert_eq;

    use crate::prompt::NO_PATTERN_PLACEHOLDER;

    fn composer(backend: &Arc<ScriptedBackend>) -> ResponseComposer {
        ResponseComposer::new(backend.clone())
    }

    #[tokio::test]
    async fn test_emergency_never_calls_backend() {
        let backend = Arc::new(ScriptedBackend::replying("should not be used"));
        let resp = composer(&backend).respond(fixtures::EMERGENCY_CHEST_PAIN).await.unwrap();

        assert!(resp.emergency);
        assert_eq!(resp.triage.urgency, Urgency::Emergency);
        assert!(resp.text.contains("MEDICAL EMERGENCY DETECTED"));
        assert!(resp.symptom_analysis.is_none());
        assert!(resp.disclaimers.is_empty());
        assert_eq!(resp.recommended_action, None);
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_emergency_short_circuits_even_with_symptom_patterns() {
        let backend = Arc::new(ScriptedBackend::replying("unused"));
        let resp = composer(&backend)
            .respond("fever, chills and a seizure this morning")
            .await
            .unwrap();
        assert!(resp.emergency);
        assert!(resp.symptom_analysis.is_none());
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_routine_reply_with_analysis() {
        let backend = Arc::new(ScriptedBackend::replying("Rest and drink fluids."));
        let resp = composer(&backend).respond(fixtures::FOUR_CLUSTER_SYMPTOMS).await.unwrap();

        assert!(!resp.emergency);
        assert_eq!(resp.text, "Rest and drink fluids.");
        assert_eq!(resp.triage.urgency, Urgency::Routine);
        assert_eq!(resp.disclaimers.len(), 3);
        assert_eq!(resp.recommended_action.as_deref(), Some(resp.triage.action_required.as_str()));

        let analysis = resp.symptom_analysis.unwrap();
        assert_eq!(analysis.possible_conditions.len(), 3);
        assert_eq!(analysis.total_matches, 6);

        let prompt = backend.last_prompt().unwrap();
        assert!(prompt.contains("Upper Respiratory Infection"));
        assert!(prompt.contains(&format!("USER QUERY: {}", fixtures::FOUR_CLUSTER_SYMPTOMS)));
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn test_no_pattern_omits_analysis_and_uses_placeholder() {
        let backend = Arc::new(ScriptedBackend::replying("About two litres."));
        let resp = composer(&backend).respond(fixtures::GENERAL_QUESTION).await.unwrap();

        assert!(resp.symptom_analysis.is_none());
        assert_eq!(resp.triage.confidence, 0.4);
        assert!(backend.last_prompt().unwrap().contains(NO_PATTERN_PLACEHOLDER));
    }

    #[tokio::test]
    async fn test_urgent_reply_is_prefixed_with_notice() {
        let backend = Arc::new(ScriptedBackend::replying("Generated guidance."));
        let resp = composer(&backend).respond(fixtures::URGENT_FEVER).await.unwrap();

        assert!(resp.text.contains("URGENT MEDICAL ATTENTION NEEDED"));
        assert!(resp.text.ends_with("\n\nGenerated guidance."));
        assert_eq!(resp.disclaimers.len(), 4);
        assert_eq!(resp.disclaimers[0], URGENT_DISCLAIMER);
        assert_eq!(&resp.disclaimers[1..], &disclaimers_for(Urgency::Routine)[..]);
    }

    #[tokio::test]
    async fn test_generation_failure_is_typed_error() {
        let backend = Arc::new(ScriptedBackend::failing(503, "model overloaded"));
        let err = composer(&backend).respond(fixtures::FLU_TWO_OF_FIVE).await.unwrap_err();

        assert_eq!(err.stage(), Stage::Analyzed);
        assert!(err.elapsed_secs() >= 0.0);
        assert!(err.to_string().contains("model overloaded"));
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn test_response_time_is_rounded() {
        let backend = Arc::new(ScriptedBackend::replying("ok"));
        let resp = composer(&backend).respond(fixtures::GENERAL_QUESTION).await.unwrap();
        assert_eq!(resp.response_time, round_hundredths(resp.response_time));
    }

    #[test]
    fn test_disclaimers_by_urgency() {
        assert_eq!(disclaimers_for(Urgency::Routine).len(), 3);
        assert_eq!(disclaimers_for(Urgency::Urgent)[0], URGENT_DISCLAIMER);
    }
}
