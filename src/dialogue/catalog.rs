use super::ambiguity;
use crate::models::conversation::MissingInfo;
use crate::models::enums::{AmbiguityKind, InfoCategory, QueryType};

/// One information category: detection keywords, importance weight, and the
/// question pool used when the category is selected for a follow-up.
pub struct CategorySpec {
    pub category: InfoCategory,
    pub keywords: &'static [&'static str],
    pub importance: f32,
    pub questions: &'static [&'static str],
}

/// The static requirement catalog. Order matters: answer-category inference
/// scans it front to back.
pub const INFORMATION_CATEGORIES: &[CategorySpec] = &[
    CategorySpec {
        category: InfoCategory::Duration,
        keywords: &["how long", "duration", "time", "days", "weeks", "months", "years"],
        importance: 0.9,
        questions: &[
            "How long have you been experiencing symptoms of {condition}?",
            "When did these symptoms first appear?",
            "Do your symptoms occur year-round or only during certain seasons?",
        ],
    },
    CategorySpec {
        category: InfoCategory::Severity,
        keywords: &["severe", "mild", "moderate", "intensity", "bad", "serious", "pain level"],
        importance: 0.8,
        questions: &[
            "How would you describe the severity of your {condition} symptoms?",
            "On a scale of 1-10, how would you rate the intensity of your symptoms?",
            "Are your symptoms mild, moderate, or severe?",
            "How much do these symptoms affect your daily activities?",
        ],
    },
    CategorySpec {
        category: InfoCategory::Frequency,
        keywords: &["often", "frequency", "how many times", "daily", "weekly", "occasionally", "regularly"],
        importance: 0.7,
        questions: &[
            "How often do you experience symptoms of {condition}?",
            "Do your symptoms occur regularly or intermittently?",
            "Are there specific times when your symptoms get worse?",
        ],
    },
    CategorySpec {
        category: InfoCategory::Location,
        keywords: &["where", "location", "area", "spot", "part of body", "left", "right", "upper", "lower"],
        importance: 0.8,
        questions: &[
            "Where do you typically experience these symptoms?",
            "Do the symptoms affect specific areas of your body?",
            "Is there a particular location where symptoms are most noticeable?",
        ],
    },
    CategorySpec {
        category: InfoCategory::AssociatedSymptoms,
        keywords: &["other symptoms", "also have", "alongside", "accompanied by", "together with"],
        importance: 0.7,
        questions: &[
            "Are there any other symptoms that accompany your {condition}?",
            "Have you noticed any other changes when experiencing these symptoms?",
            "Do you have any additional symptoms alongside {condition}?",
        ],
    },
    CategorySpec {
        category: InfoCategory::MedicalHistory,
        keywords: &["history", "condition", "diagnosed", "previous", "existing", "chronic"],
        importance: 0.6,
        questions: &[
            "Do you have any underlying medical conditions?",
            "Have you had {condition} or similar issues before?",
            "Is there a family history of {condition} or related conditions?",
        ],
    },
    CategorySpec {
        category: InfoCategory::Triggers,
        keywords: &["trigger", "cause", "makes it worse", "worsens", "improves", "alleviates", "helps"],
        importance: 0.7,
        questions: &[
            "Have you identified any triggers for your {condition}?",
            "Does anything seem to make your symptoms worse?",
            "Have you noticed any patterns related to when symptoms appear?",
        ],
    },
    CategorySpec {
        category: InfoCategory::TriedRemedies,
        keywords: &["tried", "treatment", "medication", "remedy", "relief", "helps", "taken"],
        importance: 0.5,
        questions: &[
            "What treatments have you tried for {condition} so far?",
            "Have any remedies or medications helped with your symptoms?",
            "What approaches have you found effective in managing {condition}?",
        ],
    },
    CategorySpec {
        category: InfoCategory::Allergies,
        keywords: &["allergy", "allergies", "allergic", "allergen", "seasonal"],
        importance: 0.9,
        questions: &[
            "During which seasons do you typically experience your allergy symptoms?",
            "Which symptoms are most bothersome for you? (e.g., runny nose, itchy eyes, sneezing)",
            "Have you noticed any specific triggers for your allergies?",
            "Have you tried any treatments for your allergic symptoms?",
        ],
    },
];

/// Importance assigned when an allergy topic lacks allergy context.
pub const FORCED_ALLERGY_IMPORTANCE: f32 = 0.95;

/// Cues that tell us the user already gave allergy context.
const ALLERGY_CONTEXT_KEYWORDS: &[&str] = &[
    "season",
    "time of year",
    "spring",
    "summer",
    "fall",
    "winter",
    "pollen",
    "dust",
    "mold",
    "pet",
    "food",
    "indoor",
    "outdoor",
];

/// Topics containing any of these probe `location` on symptom queries.
/// Substring match, so "headache" qualifies through "ache".
const PHYSICAL_SYMPTOM_KEYWORDS: &[&str] =
    &["pain", "ache", "discomfort", "rash", "swelling", "tingling", "numbness"];

/// Question terms that map an answer back to the allergies category when
/// the topic is allergy-related.
const ALLERGY_QUESTION_TERMS: &[&str] = &["season", "allergen", "allerg", "trigger"];

pub fn spec_for(category: InfoCategory) -> Option<&'static CategorySpec> {
    INFORMATION_CATEGORIES.iter().find(|s| s.category == category)
}

pub fn is_allergy_topic(topic: &str) -> bool {
    let lower = topic.to_lowercase();
    lower.contains("allerg") || lower.contains("season")
}

/// Identify missing information for an initial query.
///
/// Allergy topics short-circuit with their own probes; queries without a
/// topic yield nothing (no follow-up is warranted). Everything else is
/// probed per query type and then extended with ambiguity detections.
pub fn identify_missing_information(
    message_lower: &str,
    topic: Option<&str>,
    query_type: QueryType,
) -> MissingInfo {
    let mut missing = MissingInfo::default();

    if let Some(topic) = topic {
        if is_allergy_topic(topic) {
            if !contains_any(message_lower, ALLERGY_CONTEXT_KEYWORDS) {
                missing.insert(InfoCategory::Allergies, FORCED_ALLERGY_IMPORTANCE);
            }
            probe(&mut missing, message_lower, InfoCategory::Severity);
            probe(&mut missing, message_lower, InfoCategory::Duration);
            return missing;
        }
    } else {
        return missing;
    }

    match query_type {
        QueryType::Symptoms => {
            probe(&mut missing, message_lower, InfoCategory::Duration);
            probe(&mut missing, message_lower, InfoCategory::Severity);
            probe(&mut missing, message_lower, InfoCategory::Frequency);
            let topic = topic.unwrap_or_default();
            if contains_any(topic, PHYSICAL_SYMPTOM_KEYWORDS) {
                probe(&mut missing, message_lower, InfoCategory::Location);
            }
        }
        QueryType::Treatment => {
            probe(&mut missing, message_lower, InfoCategory::TriedRemedies);
            probe(&mut missing, message_lower, InfoCategory::MedicalHistory);
        }
        QueryType::Prevention => {
            probe(&mut missing, message_lower, InfoCategory::MedicalHistory);
            probe(&mut missing, message_lower, InfoCategory::Triggers);
        }
        _ => {}
    }

    for kind in ambiguity::detect(message_lower) {
        match kind {
            AmbiguityKind::VagueSymptoms => {
                missing.insert(InfoCategory::SymptomSpecification, 0.9);
            }
            AmbiguityKind::MissingContext => {
                missing.insert(InfoCategory::Context, 0.8);
            }
            AmbiguityKind::MultipleConditions => {
                missing.insert(InfoCategory::ConditionClarification, 0.7);
            }
            AmbiguityKind::NeedsDuration => {
                missing.insert(InfoCategory::Duration, 0.8);
            }
            AmbiguityKind::NeedsSeverity => {
                missing.insert(InfoCategory::Severity, 0.7);
            }
        }
    }

    missing
}

/// Add `category` at its catalog importance unless the message already
/// covers it with one of the category's keywords.
fn probe(missing: &mut MissingInfo, message_lower: &str, category: InfoCategory) {
    if let Some(spec) = spec_for(category) {
        if !contains_any(message_lower, spec.keywords) {
            missing.insert(category, spec.importance);
        }
    }
}

/// Infer which category a follow-up question was asking about, by keyword
/// match against the question text.
pub fn infer_question_category(question: &str, topic: Option<&str>) -> Option<InfoCategory> {
    let question_lower = question.to_lowercase();

    if contains_any(&question_lower, ALLERGY_QUESTION_TERMS) {
        if let Some(topic) = topic {
            if topic.contains("allergies") {
                return Some(InfoCategory::Allergies);
            }
        }
    }

    INFORMATION_CATEGORIES
        .iter()
        .find(|spec| contains_any(&question_lower, spec.keywords))
        .map(|spec| spec.category)
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}
