//! `POST /chat`: validate, run the composer, shape the JSON reply.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};

use medassist_common::ApiError;
use medassist_core::composer::BASE_DISCLAIMERS;
use medassist_core::triage::GENERAL_ACTION;
use medassist_core::{ChatResponse, ComposeError, SymptomAnalysis};
use crate::state::{AssistantSlot, SharedState};

pub const APOLOGY: &str = "I apologize, but I'm experiencing technical difficulties. Please try \
     again later or consult with a healthcare professional for your medical concerns.";

/// Characters of the user message that may appear in logs.
const LOG_PREVIEW_CHARS: usize = 50;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    message: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyStatus {
    Success,
    Emergency,
}

/// Body of a 200 reply. Optional fields are omitted per reply kind.
#[derive(Debug, Serialize)]
pub struct ChatPayload {
    pub response: String,
    pub urgency: String,
    pub risk_level: String,
    pub emergency: bool,
    pub confidence: f64,
    pub reasoning: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<String>,
    pub response_time: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disclaimers: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symptom_analysis: Option<SymptomAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<bool>,
    pub status: ReplyStatus,
}

impl From<ChatResponse> for ChatPayload {
    fn from(resp: ChatResponse) -> Self {
        let emergency = resp.emergency;
        Self {
            response: resp.text,
            urgency: resp.triage.urgency.as_str().to_string(),
            risk_level: resp.triage.risk.as_str().to_string(),
            emergency,
            confidence: resp.triage.confidence,
            reasoning: resp.triage.reasoning,
            recommendations: resp.recommended_action,
            response_time: resp.response_time,
            disclaimers: (!emergency).then_some(resp.disclaimers),
            symptom_analysis: resp.symptom_analysis,
            error: None,
            status: if emergency { ReplyStatus::Emergency } else { ReplyStatus::Success },
        }
    }
}

impl ChatPayload {
    /// Apology for a failed composition. Same shape as a normal reply,
    /// flagged with `error: true`.
    pub fn degraded(err: &ComposeError) -> Self {
        Self {
            response: APOLOGY.to_string(),
            urgency: "unknown".to_string(),
            risk_level: "unknown".to_string(),
            emergency: false,
            confidence: 0.0,
            reasoning: format!("System error: {err}"),
            recommendations: Some(GENERAL_ACTION.to_string()),
            response_time: err.elapsed_secs(),
            disclaimers: Some(BASE_DISCLAIMERS.iter().map(|d| d.to_string()).collect()),
            symptom_analysis: None,
            error: Some(true),
            status: ReplyStatus::Success,
        }
    }
}

/// Trim and validate the message. Length is counted in characters.
pub fn validate_message(raw: Option<String>, max_chars: usize) -> Result<String, ApiError> {
    let raw = raw.ok_or_else(|| ApiError::BadRequest("No message provided".to_string()))?;
    let message = raw.trim();
    if message.is_empty() {
        return Err(ApiError::BadRequest("Message cannot be empty".to_string()));
    }
    if message.chars().count() > max_chars {
        return Err(ApiError::BadRequest(format!(
            "Message too long. Please keep it under {max_chars} characters."
        )));
    }
    Ok(message.to_string())
}

pub async fn chat_submit(
    State(state): State<SharedState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatPayload>, ApiError> {
    let message = match payload {
        Ok(Json(req)) => validate_message(req.message, state.max_message_chars)?,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Unreadable chat body");
            return Err(ApiError::BadRequest("No message provided".to_string()));
        }
    };

    let composer = match &state.assistant {
        AssistantSlot::Ready(composer) => composer,
        AssistantSlot::Misconfigured(detail) => {
            return Err(ApiError::Configuration(detail.clone()));
        }
    };

    let preview: String = message.chars().take(LOG_PREVIEW_CHARS).collect();
    tracing::info!(message = %preview, "Processing chat message");

    match composer.respond(&message).await {
        Ok(resp) => {
            tracing::info!(
                urgency = resp.triage.urgency.as_str(),
                response_time = resp.response_time,
                "Generated response"
            );
            if resp.emergency {
                tracing::warn!(reasoning = %resp.triage.reasoning, "Emergency reply sent");
            }
            Ok(Json(resp.into()))
        }
        Err(err) => {
            tracing::error!(error = %err, stage = ?err.stage(), "Chat request degraded");
            Ok(Json(ChatPayload::degraded(&err)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_trims() {
        assert_eq!(validate_message(Some("  hello \n".into()), 1000).unwrap(), "hello");
    }

    #[test]
    fn test_validate_rejects_missing_and_blank() {
        assert_eq!(validate_message(None, 1000).unwrap_err().to_string(), "No message provided");
        assert_eq!(
            validate_message(Some("   ".into()), 1000).unwrap_err().to_string(),
            "Message cannot be empty"
        );
    }

    #[test]
    fn test_validate_counts_characters_not_bytes() {
        // 1000 two-byte characters is within the limit
        let message = "é".repeat(1000);
        assert!(validate_message(Some(message), 1000).is_ok());
        let err = validate_message(Some("a".repeat(1001)), 1000).unwrap_err();
        assert_eq!(err.to_string(), "Message too long. Please keep it under 1000 characters.");
    }
}
