/// General wellness tips served by the tips endpoint.
pub const HEALTH_TIPS: [&str; 8] = [
    "Stay hydrated by drinking at least 8 glasses of water daily",
    "Maintain a balanced diet with plenty of fruits and vegetables",
    "Exercise regularly - aim for at least 30 minutes of activity daily",
    "Get 7-9 hours of quality sleep each night",
    "Practice stress management techniques like meditation or deep breathing",
    "Schedule regular check-ups with your healthcare provider",
    "Wash your hands frequently to prevent infections",
    "Limit processed foods and added sugars in your diet",
];

pub fn health_tips() -> Vec<String> {
    HEALTH_TIPS.iter().map(|t| t.to_string()).collect()
}
