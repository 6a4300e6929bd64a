//! Keyword triage: maps free text to an urgency tier.
//!
//! Tiers are checked in strict priority order (emergency, urgent, routine)
//! and the first tier with any match wins. The tier alone fixes urgency,
//! risk and confidence; the number of matches only affects `reasoning`.

use serde::{Deserialize, Serialize};

use crate::keywords::{
    matches_in, EMERGENCY_KEYWORDS, EMERGENCY_RESULT_CONTACTS, ROUTINE_KEYWORDS, URGENT_KEYWORDS,
    US_CONTACTS,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Emergency,
    /// See a provider within 24 hours.
    Urgent,
    /// Self-care or a scheduled appointment.
    Routine,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Emergency => "emergency",
            Urgency::Urgent    => "urgent",
            Urgency::Routine   => "routine",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    High,
    Medium,
    Low,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::High   => "high",
            RiskLevel::Medium => "medium",
            RiskLevel::Low    => "low",
        }
    }
}

pub const EMERGENCY_ACTION: &str =
    "SEEK IMMEDIATE MEDICAL ATTENTION - Call 911 or go to the nearest emergency room";
pub const URGENT_ACTION: &str =
    "Contact your healthcare provider within 24 hours or visit urgent care";
pub const ROUTINE_ACTION: &str =
    "Monitor symptoms and consider self-care or schedule routine appointment if symptoms persist";
pub const GENERAL_ACTION: &str =
    "General health information provided. Consult healthcare provider if you have specific concerns";
pub const GENERAL_REASONING: &str = "General health inquiry without specific urgent symptoms";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriageResult {
    pub urgency: Urgency,
    pub risk: RiskLevel,
    pub confidence: f64,
    pub reasoning: String,
    pub action_required: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency_contacts: Option<Vec<String>>,
}

impl TriageResult {
    pub fn is_emergency(&self) -> bool {
        self.urgency == Urgency::Emergency
    }

    /// Banner text shown ahead of (or instead of) generated content.
    /// Emergencies and urgent cases get one; routine results do not.
    pub fn safety_notice(&self) -> Option<String> {
        match self.urgency {
            Urgency::Emergency => Some(format!(
                "\n🚨 MEDICAL EMERGENCY DETECTED 🚨\n\n\
                 {action}\n\n\
                 Emergency Contacts:\n\
                 • Call {emergency} immediately for medical emergencies\n\
                 • Call 988 for mental health crises (Suicide & Crisis Lifeline)\n\
                 • Call {poison} for poison emergencies\n\n\
                 IMPORTANT: This AI cannot replace emergency medical services. \
                 If you are experiencing a medical emergency, please call {emergency} or go to \
                 your nearest emergency room immediately.\n\n\
                 Reasoning: {reasoning}\n",
                action = self.action_required,
                emergency = US_CONTACTS.emergency,
                poison = US_CONTACTS.poison_control,
                reasoning = self.reasoning,
            )),
            Urgency::Urgent => Some(format!(
                "\n⚠️ URGENT MEDICAL ATTENTION NEEDED ⚠️\n\n\
                 {action}\n\n\
                 Your symptoms may require prompt medical evaluation. Please:\n\
                 1. Contact your healthcare provider today\n\
                 2. Visit an urgent care center if your doctor is unavailable\n\
                 3. Call {emergency} if symptoms worsen significantly\n\n\
                 Reasoning: {reasoning}\n",
                action = self.action_required,
                emergency = US_CONTACTS.emergency,
                reasoning = self.reasoning,
            )),
            Urgency::Routine => None,
        }
    }
}

/// Scans a message against the emergency, urgent and routine keyword tables.
pub struct TriageClassifier {
    emergency: &'static [&'static str],
    urgent: &'static [&'static str],
    routine: &'static [&'static str],
}

impl Default for TriageClassifier {
    fn default() -> Self {
        Self {
            emergency: EMERGENCY_KEYWORDS,
            urgent: URGENT_KEYWORDS,
            routine: ROUTINE_KEYWORDS,
        }
    }
}

impl TriageClassifier {
    pub fn assess_urgency(&self, message: &str) -> TriageResult {
        let text = message.to_lowercase();

        // Emergency first (highest priority)
        let matched = matches_in(self.emergency, &text);
        if !matched.is_empty() {
            return TriageResult {
                urgency: Urgency::Emergency,
                risk: RiskLevel::High,
                confidence: 0.9,
                reasoning: format!("Emergency keywords detected: {}", matched.join(", ")),
                action_required: EMERGENCY_ACTION.to_string(),
                emergency_contacts: Some(
                    EMERGENCY_RESULT_CONTACTS.iter().map(|c| c.to_string()).collect(),
                ),
            };
        }

        let matched = matches_in(self.urgent, &text);
        if !matched.is_empty() {
            return TriageResult {
                urgency: Urgency::Urgent,
                risk: RiskLevel::Medium,
                confidence: 0.7,
                reasoning: format!("Urgent symptoms detected: {}", matched.join(", ")),
                action_required: URGENT_ACTION.to_string(),
                emergency_contacts: None,
            };
        }

        let matched = matches_in(self.routine, &text);
        if !matched.is_empty() {
            return TriageResult {
                urgency: Urgency::Routine,
                risk: RiskLevel::Low,
                confidence: 0.6,
                reasoning: format!("Common symptoms detected: {}", matched.join(", ")),
                action_required: ROUTINE_ACTION.to_string(),
                emergency_contacts: None,
            };
        }

        TriageResult {
            urgency: Urgency::Routine,
            risk: RiskLevel::Low,
            confidence: 0.4,
            reasoning: GENERAL_REASONING.to_string(),
            action_required: GENERAL_ACTION.to_string(),
            emergency_contacts: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medassist_test_utils::fixtures;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_chest_pain_is_emergency() {
        let result = TriageClassifier::default().assess_urgency("I have chest pain");
        assert_eq!(result.urgency, Urgency::Emergency);
        assert_eq!(result.risk, RiskLevel::High);
        assert_eq!(result.confidence, 0.9);
        assert_eq!(result.action_required, EMERGENCY_ACTION);
        assert_eq!(
            result.emergency_contacts,
            Some(vec!["911".to_string(), "988 (if mental health emergency)".to_string()])
        );
    }

    #[test]
    fn test_emergency_beats_urgent() {
        let result = TriageClassifier::default().assess_urgency(fixtures::EMERGENCY_AND_URGENT);
        assert_eq!(result.urgency, Urgency::Emergency);
        assert_eq!(result.reasoning, "Emergency keywords detected: chest pain");
    }

    #[test]
    fn test_every_emergency_match_is_listed() {
        let result = TriageClassifier::default()
            .assess_urgency("Crushing chest pain, I think it's a heart attack");
        assert_eq!(
            result.reasoning,
            "Emergency keywords detected: chest pain, heart attack, crushing chest pain"
        );
        assert_eq!(result.confidence, 0.9);
    }

    #[test]
    fn test_matching_ignores_case() {
        let result = TriageClassifier::default().assess_urgency("SHORTNESS OF BREATH since noon");
        assert_eq!(result.urgency, Urgency::Emergency);
    }

    #[test]
    fn test_urgent_tier() {
        let result = TriageClassifier::default().assess_urgency(fixtures::URGENT_FEVER);
        assert_eq!(result.urgency, Urgency::Urgent);
        assert_eq!(result.risk, RiskLevel::Medium);
        assert_eq!(result.confidence, 0.7);
        assert_eq!(result.reasoning, "Urgent symptoms detected: persistent fever");
        assert_eq!(result.action_required, URGENT_ACTION);
        assert_eq!(result.emergency_contacts, None);
    }

    #[test]
    fn test_routine_tier_lists_both_matches() {
        let result = TriageClassifier::default().assess_urgency(fixtures::ROUTINE_TWO_KEYWORDS);
        assert_eq!(result.urgency, Urgency::Routine);
        assert_eq!(result.risk, RiskLevel::Low);
        assert_eq!(result.confidence, 0.6);
        assert_eq!(result.reasoning, "Common symptoms detected: mild headache, common cold");
    }

    #[test]
    fn test_no_match_falls_back_to_general() {
        for message in ["", fixtures::GENERAL_QUESTION] {
            let result = TriageClassifier::default().assess_urgency(message);
            assert_eq!(result.urgency, Urgency::Routine);
            assert_eq!(result.confidence, 0.4);
            assert_eq!(result.reasoning, GENERAL_REASONING);
            assert_eq!(result.action_required, GENERAL_ACTION);
        }
    }

    #[test]
    fn test_substring_match_inside_word() {
        let result = TriageClassifier::default().assess_urgency("worried about heatstroke");
        assert_eq!(result.urgency, Urgency::Emergency);
        assert_eq!(result.reasoning, "Emergency keywords detected: stroke");
    }

    #[test]
    fn test_assessment_is_idempotent() {
        let clf = TriageClassifier::default();
        assert_eq!(
            clf.assess_urgency(fixtures::URGENT_FEVER),
            clf.assess_urgency(fixtures::URGENT_FEVER)
        );
    }

    #[test]
    fn test_safety_notice_per_tier() {
        let clf = TriageClassifier::default();

        let emergency = clf.assess_urgency(fixtures::EMERGENCY_CHEST_PAIN).safety_notice().unwrap();
        assert!(emergency.contains("MEDICAL EMERGENCY DETECTED"));
        assert!(emergency.contains(EMERGENCY_ACTION));
        assert!(emergency.contains("1-800-222-1222"));
        assert!(emergency.contains("Reasoning: Emergency keywords detected: chest pain"));
        assert!(emergency.contains(
            "• Call 911 immediately for medical emergencies\n\
             • Call 988 for mental health crises (Suicide & Crisis Lifeline)\n\
             • Call 1-800-222-1222 for poison emergencies\n\n"
        ));
        assert!(emergency.contains(
            "IMPORTANT: This AI cannot replace emergency medical services. If you are \
             experiencing a medical emergency, please call 911 or go to your nearest \
             emergency room immediately.\n\n"
        ));

        let urgent = clf.assess_urgency(fixtures::URGENT_FEVER).safety_notice().unwrap();
        assert!(urgent.contains("URGENT MEDICAL ATTENTION NEEDED"));
        assert!(urgent.contains(URGENT_ACTION));

        assert_eq!(clf.assess_urgency(fixtures::ROUTINE_TWO_KEYWORDS).safety_notice(), None);
    }
}
