//! Confidence helpers shared by the triage and symptom scoring code.
//! All confidences are plain `f64` values in [0.0, 1.0].

/// Round to two decimal places, the precision every reported confidence uses.
pub fn round_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Human-readable band for a condition confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceBand {
    High,
    Moderate,
    Low,
}

impl ConfidenceBand {
    /// High above 0.7, Moderate above 0.5, Low otherwise.
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence > 0.7 {
            ConfidenceBand::High
        } else if confidence > 0.5 {
            ConfidenceBand::Moderate
        } else {
            ConfidenceBand::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceBand::High     => "High",
            ConfidenceBand::Moderate => "Moderate",
            ConfidenceBand::Low      => "Low",
        }
    }
}
