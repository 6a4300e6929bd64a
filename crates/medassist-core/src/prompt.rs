//! Prompt assembly for the generation call.

use crate::triage::TriageResult;

pub const NO_PATTERN_PLACEHOLDER: &str = "No specific symptom patterns identified.";

/// Standing instructions sent ahead of every query.
pub const SYSTEM_INSTRUCTIONS: &str = "\
You are a medical information assistant that provides helpful, safe and explainable health information.

CORE PRINCIPLES:
1. SAFETY FIRST: Patient safety always comes before providing information
2. EXPLAIN YOUR REASONING: Walk through your thought process
3. EVIDENCE-BASED: Rely on established medical knowledge
4. HUMBLE: Acknowledge limitations and uncertainty

RESPONSE STRUCTURE:
1. Assessment: Briefly summarise what the user is asking
2. Analysis: Explain your reasoning step by step
3. Information: Provide relevant health information
4. Recommendations: Suggest appropriate next steps
5. Disclaimers: Include the necessary medical disclaimers

SAFETY RULES:
- NEVER provide a specific medical diagnosis
- NEVER recommend specific medications or dosages
- ALWAYS recommend emergency care for serious symptoms
- ALWAYS include appropriate disclaimers
- EXPLAIN why you mention any condition or recommendation

When discussing possible conditions, use this form:
\"Based on your symptoms of [symptoms], this could suggest [condition] because [medical reasoning]. \
However, [uncertainty factors] should also be considered.\"

Keep responses helpful, empathetic and medically responsible.";

/// Build the single prompt sent to the generation backend.
///
/// `symptom_explanation` is `None` when no cluster activated.
pub fn build_prompt(triage: &TriageResult, symptom_explanation: Option<&str>, query: &str) -> String {
    format!(
        "{instructions}\n\n\
         TRIAGE INFORMATION:\n\
         - Urgency Level: {urgency}\n\
         - Risk Level: {risk}\n\
         - Recommended Action: {action}\n\n\
         SYMPTOM ANALYSIS:\n\
         {analysis}\n\n\
         USER QUERY: {query}\n\n\
         Please provide a comprehensive response following the response structure outlined above.",
        instructions = SYSTEM_INSTRUCTIONS,
        urgency = triage.urgency.as_str(),
        risk = triage.risk.as_str(),
        action = triage.action_required,
        analysis = symptom_explanation.unwrap_or(NO_PATTERN_PLACEHOLDER),
        query = query,
    )
}
