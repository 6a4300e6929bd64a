//! Symptom-to-condition matching.
//!
//! A cluster activates when at least two of its symptom phrases occur in the
//! message. Each condition of an activated cluster is scored as
//! `base_confidence * matched / total`, rounded to hundredths.

use serde::Serialize;

use medassist_common::{round_hundredths, ConfidenceBand};

/// Minimum symptom hits before a cluster contributes conditions.
pub const MIN_CLUSTER_MATCHES: usize = 2;
/// Conditions kept after ranking.
pub const MAX_CONDITIONS: usize = 3;

pub const NO_PATTERN_MESSAGE: &str = "Based on the symptoms described, I cannot identify a specific \
     pattern. Please provide more details about your symptoms.";

const ANALYSIS_FOOTER: &str = "⚠️ **Important:** This analysis is for informational purposes only \
     and should not replace professional medical diagnosis. Please consult with a healthcare \
     provider for proper evaluation and treatment.\n";

#[derive(Debug, Clone, Copy)]
pub struct ConditionTemplate {
    pub name: &'static str,
    pub base_confidence: f64,
    pub reasoning: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct SymptomCluster {
    pub name: &'static str,
    pub symptoms: &'static [&'static str],
    pub conditions: &'static [ConditionTemplate],
}

pub const SYMPTOM_CLUSTERS: &[SymptomCluster] = &[
    SymptomCluster {
        name: "flu_like",
        symptoms: &["fever", "headache", "body aches", "fatigue", "chills"],
        conditions: &[
            ConditionTemplate {
                name: "Influenza (Flu)",
                base_confidence: 0.8,
                reasoning: "Classic flu symptoms include fever, headache, and body aches",
            },
            ConditionTemplate {
                name: "Common Cold",
                base_confidence: 0.6,
                reasoning: "Similar symptoms but usually milder than flu",
            },
            ConditionTemplate {
                name: "COVID-19",
                base_confidence: 0.7,
                reasoning: "Overlapping symptoms with flu, testing recommended",
            },
        ],
    },
    SymptomCluster {
        name: "respiratory",
        symptoms: &["cough", "runny nose", "sore throat", "congestion"],
        conditions: &[
            ConditionTemplate {
                name: "Upper Respiratory Infection",
                base_confidence: 0.8,
                reasoning: "Common cold symptoms affecting upper respiratory tract",
            },
            ConditionTemplate {
                name: "Allergies",
                base_confidence: 0.6,
                reasoning: "Seasonal allergies can cause similar symptoms",
            },
            ConditionTemplate {
                name: "Sinusitis",
                base_confidence: 0.7,
                reasoning: "Sinus infection often presents with congestion and headache",
            },
        ],
    },
    SymptomCluster {
        name: "digestive",
        symptoms: &["nausea", "vomiting", "diarrhea", "stomach pain"],
        conditions: &[
            ConditionTemplate {
                name: "Gastroenteritis",
                base_confidence: 0.8,
                reasoning: "Stomach flu commonly causes nausea, vomiting, and diarrhea",
            },
            ConditionTemplate {
                name: "Food Poisoning",
                base_confidence: 0.7,
                reasoning: "Recent food consumption may be related to symptoms",
            },
            ConditionTemplate {
                name: "Viral Infection",
                base_confidence: 0.6,
                reasoning: "Many viruses can cause digestive symptoms",
            },
        ],
    },
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConditionMatch {
    #[serde(rename = "condition")]
    pub condition_name: String,
    pub confidence: f64,
    pub reasoning: String,
    #[serde(rename = "matched_symptoms")]
    pub matched_symptom_count: usize,
    #[serde(rename = "total_symptoms")]
    pub total_symptom_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisConfidence {
    High,
    /// Also reported when nothing matched at all.
    Moderate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymptomAnalysis {
    pub possible_conditions: Vec<ConditionMatch>,
    pub total_matches: usize,
    pub analysis_confidence: AnalysisConfidence,
}

impl SymptomAnalysis {
    pub fn has_conditions(&self) -> bool {
        !self.possible_conditions.is_empty()
    }
}

pub struct SymptomMatcher {
    clusters: &'static [SymptomCluster],
}

impl Default for SymptomMatcher {
    fn default() -> Self {
        Self { clusters: SYMPTOM_CLUSTERS }
    }
}

impl SymptomMatcher {
    pub fn analyze_symptoms(&self, message: &str) -> SymptomAnalysis {
        let text = message.to_lowercase();
        let mut matched: Vec<ConditionMatch> = Vec::new();

        for cluster in self.clusters {
            let hits = cluster.symptoms.iter().filter(|s| text.contains(*s)).count();
            if hits < MIN_CLUSTER_MATCHES {
                continue;
            }

            let total = cluster.symptoms.len();
            let ratio = hits as f64 / total as f64;
            tracing::debug!(cluster = cluster.name, hits, total, "Symptom cluster activated");

            matched.extend(cluster.conditions.iter().map(|c| ConditionMatch {
                condition_name: c.name.to_string(),
                confidence: round_hundredths(c.base_confidence * ratio),
                reasoning: c.reasoning.to_string(),
                matched_symptom_count: hits,
                total_symptom_count: total,
            }));
        }

        // Stable sort: equal confidences keep insertion order
        matched.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

        let total_matches = matched.len();
        matched.truncate(MAX_CONDITIONS);

        let analysis_confidence = match matched.first() {
            Some(top) if top.confidence > 0.6 => AnalysisConfidence::High,
            _ => AnalysisConfidence::Moderate,
        };

        SymptomAnalysis {
            possible_conditions: matched,
            total_matches,
            analysis_confidence,
        }
    }

    /// Render the analysis as a markdown block for the prompt and the reader.
    pub fn generate_explanation(&self, analysis: &SymptomAnalysis) -> String {
        if !analysis.has_conditions() {
            return NO_PATTERN_MESSAGE.to_string();
        }

        let mut out = String::from("🔍 **Symptom Analysis:**\n\n");
        for (i, c) in analysis.possible_conditions.iter().enumerate() {
            let band = ConfidenceBand::from_confidence(c.confidence);
            out.push_str(&format!(
                "**{}. {}** (Confidence: {} - {})\n",
                i + 1,
                c.condition_name,
                band.as_str(),
                c.confidence
            ));
            out.push_str(&format!("   • Reasoning: {}\n", c.reasoning));
            out.push_str(&format!(
                "   • Symptom match: {}/{} symptoms\n\n",
                c.matched_symptom_count, c.total_symptom_count
            ));
        }
        out.push_str(ANALYSIS_FOOTER);
        out
    }
}
