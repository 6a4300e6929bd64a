//! Fixed keyword tables for triage. Matching is plain substring search on
//! lower-cased text, so every phrase here must be lower-case.

/// Phrases requiring immediate medical attention.
pub const EMERGENCY_KEYWORDS: &[&str] = &[
    // Cardiac
    "chest pain", "heart attack", "cardiac arrest", "angina",
    "severe chest pressure", "crushing chest pain",
    // Breathing
    "trouble breathing", "shortness of breath", "difficulty breathing",
    "choking", "wheezing severely", "gasping for air",
    // Neurological
    "stroke", "seizure", "unconscious", "paralysis", "facial drooping",
    "severe headache with fever", "sudden severe headache",
    // Mental health
    "suicidal", "suicide", "kill myself", "end my life", "want to die",
    "self harm", "overdose", "poisoning",
    // Severe injuries
    "severe bleeding", "broken bone", "deep cut", "head injury",
    "spinal injury", "severe burn",
    // Other
    "allergic reaction", "anaphylaxis", "severe pain", "fever over 103",
    "vomiting blood", "blood in stool", "severe abdominal pain",
];

/// Phrases that warrant seeing a provider within 24 hours.
pub const URGENT_KEYWORDS: &[&str] = &[
    "persistent fever", "severe headache", "vision problems",
    "hearing loss", "severe nausea", "persistent vomiting",
    "unusual bleeding", "severe fatigue", "weight loss",
    "persistent cough", "difficulty swallowing",
];

/// Common complaints manageable with self-care.
pub const ROUTINE_KEYWORDS: &[&str] = &[
    "mild headache", "common cold", "minor cut", "bruise",
    "muscle soreness", "mild fever", "runny nose", "sore throat",
];

/// US emergency contact directory.
#[derive(Debug, Clone, Copy)]
pub struct EmergencyContacts {
    pub emergency: &'static str,
    pub suicide_prevention: &'static str,
    pub poison_control: &'static str,
    pub domestic_violence: &'static str,
}

pub const US_CONTACTS: EmergencyContacts = EmergencyContacts {
    emergency: "911",
    suicide_prevention: "988 (Suicide & Crisis Lifeline)",
    poison_control: "1-800-222-1222",
    domestic_violence: "1-800-799-7233",
};

/// Contacts attached to every emergency triage result, in display order.
pub const EMERGENCY_RESULT_CONTACTS: &[&str] = &["911", "988 (if mental health emergency)"];

/// Every phrase in `keywords` found anywhere in `text`, in table order.
/// `text` must already be lower-cased.
pub fn matches_in<'a>(keywords: &[&'a str], text: &str) -> Vec<&'a str> {
    keywords.iter().copied().filter(|kw| text.contains(kw)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_are_lower_case() {
        for kw in EMERGENCY_KEYWORDS.iter().chain(URGENT_KEYWORDS).chain(ROUTINE_KEYWORDS) {
            assert_eq!(*kw, kw.to_lowercase(), "keyword '{kw}' must be lower-case");
        }
    }

    #[test]
    fn test_matches_inside_longer_words() {
        // Substring semantics: "stroke" is found inside "heatstroke".
        assert_eq!(matches_in(EMERGENCY_KEYWORDS, "possible heatstroke"), vec!["stroke"]);
    }

    #[test]
    fn test_matches_keep_table_order() {
        let found = matches_in(ROUTINE_KEYWORDS, "sore throat, runny nose and a bruise");
        assert_eq!(found, vec!["bruise", "runny nose", "sore throat"]);
    }
}
