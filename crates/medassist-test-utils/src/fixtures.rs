//! Sample user messages covering each triage path.

pub const EMERGENCY_CHEST_PAIN: &str = "I have chest pain and my left arm feels numb";
pub const EMERGENCY_AND_URGENT: &str = "chest pain and persistent fever";
pub const URGENT_FEVER: &str = "I've had a persistent fever for four days";
pub const ROUTINE_TWO_KEYWORDS: &str = "I have a mild headache and a common cold";
pub const FLU_TWO_OF_FIVE: &str = "I have a fever and fatigue";
pub const FOUR_CLUSTER_SYMPTOMS: &str = "fever, headache, cough and a sore throat";
pub const GENERAL_QUESTION: &str = "How much water should I drink each day?";
