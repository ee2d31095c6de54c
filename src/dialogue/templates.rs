use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::enums::InfoCategory;

/// Dedicated pool for allergy follow-ups; used instead of the catalog pool
/// when the topic is allergy-related.
pub const ALLERGY_QUESTIONS: &[&str] = &[
    "During which seasons do you typically experience allergy symptoms?",
    "Which allergy symptoms bother you the most?",
    "Have you identified any specific triggers for your allergies?",
    "Do your symptoms improve when you're indoors with air conditioning?",
    "Have you tried any over-the-counter allergy medications?",
];

const DURATION_TEMPLATES: &[&str] = &[
    "How long have you been experiencing {symptom}?",
    "When did you first notice {symptom}?",
    "Has {symptom} been present continuously or does it come and go?",
    "How long has this been going on?",
    "Did {symptom} start suddenly or gradually develop over time?",
];

const SEVERITY_TEMPLATES: &[&str] = &[
    "On a scale of 1-10, how would you rate the severity of {symptom}?",
    "How severe is {symptom} - mild, moderate, or severe?",
    "How much does {symptom} affect your daily activities?",
    "Does {symptom} interfere with your sleep or work?",
    "Has {symptom} gotten better, worse, or stayed the same over time?",
];

const FREQUENCY_TEMPLATES: &[&str] = &[
    "How often do you experience {symptom}?",
    "Does {symptom} occur at specific times of day or in certain situations?",
    "Is {symptom} constant or does it come and go?",
    "How many times per day/week do you typically experience {symptom}?",
    "Has the frequency of {symptom} changed over time?",
];

const LOCATION_TEMPLATES: &[&str] = &[
    "Where exactly do you experience {symptom}?",
    "Does {symptom} affect one specific area or multiple areas?",
    "Does {symptom} spread or radiate to other parts of your body?",
    "Can you point to exactly where you feel {symptom}?",
    "Does the location of {symptom} change over time?",
];

const TRIGGERS_TEMPLATES: &[&str] = &[
    "Have you noticed anything that triggers or worsens {symptom}?",
    "Does {symptom} occur after certain activities or foods?",
    "Are there any patterns you've noticed with when {symptom} occurs?",
    "What makes {symptom} better or worse?",
    "Are there environmental factors that seem to affect {symptom}?",
];

const ASSOCIATED_SYMPTOMS_TEMPLATES: &[&str] = &[
    "Are there any other symptoms that accompany {symptom}?",
    "Do you notice any other changes in your body when {symptom} occurs?",
    "Have you experienced any fever, fatigue, or other general symptoms alongside {symptom}?",
    "Are there any other symptoms that occur before, during, or after {symptom}?",
    "Have you noticed any unusual changes in your appetite, sleep, or energy level?",
];

const MEDICAL_HISTORY_TEMPLATES: &[&str] = &[
    "Do you have any underlying medical conditions?",
    "Are you currently taking any medications?",
    "Have you had {condition} or similar issues in the past?",
    "Is there a family history of {condition} or related conditions?",
    "Have you recently had any medical procedures or treatments?",
];

const TREATMENT_TEMPLATES: &[&str] = &[
    "What treatments have you already tried for {condition}?",
    "Have any treatments helped with {symptom} so far?",
    "Are you currently taking any medications for {condition}?",
    "What has your healthcare provider recommended for {condition}?",
    "What specific aspects of treatment are you interested in learning about?",
];

const CLARIFICATION_TEMPLATES: &[&str] = &[
    "Could you provide more details about your question regarding {topic}?",
    "What specific aspects of {topic} are you most interested in learning about?",
    "Are you asking about {topic} for yourself or someone else?",
    "What's your main concern regarding {topic}?",
    "What information would be most helpful to you about {topic}?",
];

/// Fallback template pool for a category, used when the catalog has no
/// question list for it. Unknown categories get clarification prompts.
pub fn templates_for(category: InfoCategory) -> &'static [&'static str] {
    match category {
        InfoCategory::Duration => DURATION_TEMPLATES,
        InfoCategory::Severity => SEVERITY_TEMPLATES,
        InfoCategory::Frequency => FREQUENCY_TEMPLATES,
        InfoCategory::Location => LOCATION_TEMPLATES,
        InfoCategory::Triggers => TRIGGERS_TEMPLATES,
        InfoCategory::AssociatedSymptoms => ASSOCIATED_SYMPTOMS_TEMPLATES,
        InfoCategory::MedicalHistory => MEDICAL_HISTORY_TEMPLATES,
        InfoCategory::TriedRemedies => TREATMENT_TEMPLATES,
        _ => CLARIFICATION_TEMPLATES,
    }
}

const COURTEOUS_LEAD_INS: &[&str] = &[
    "To help provide better information, ",
    "If you don't mind sharing, ",
    "To better address your question, ",
    "For more specific information, ",
    "To tailor my response, ",
];

/// Polish a template-pool question: ensure a trailing question mark,
/// capitalize the first letter, and occasionally prepend a courteous
/// lead-in (lower-casing the original opening when one is added).
pub fn polish_question<R: Rng>(rng: &mut R, question: &str, lead_in_probability: f32) -> String {
    let mut polished = question.trim().to_string();
    if !polished.ends_with('?') {
        polished.push('?');
    }
    polished = set_first_letter(&polished, true);

    if rng.gen::<f32>() < lead_in_probability {
        let lead_in = COURTEOUS_LEAD_INS
            .choose(rng)
            .copied()
            .unwrap_or(COURTEOUS_LEAD_INS[0]);
        polished = format!("{}{}", lead_in, set_first_letter(&polished, false));
    }

    polished
}

fn set_first_letter(text: &str, upper: bool) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => {
            let first: String = if upper {
                first.to_uppercase().collect()
            } else {
                first.to_lowercase().collect()
            };
            format!("{}{}", first, chars.as_str())
        }
        None => String::new(),
    }
}
