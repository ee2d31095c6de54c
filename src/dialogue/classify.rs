use std::sync::LazyLock;

use regex::Regex;

use crate::models::enums::QueryType;

/// Keyword table for query-type scoring. Each hit adds the type's weight;
/// enumeration order breaks ties, so earlier entries win equal scores.
const QUERY_TYPE_KEYWORDS: &[(QueryType, f32, &[&str])] = &[
    (
        QueryType::Symptoms,
        1.0,
        &["symptom", "feel", "experiencing", "have", "having", "notice", "signs"],
    ),
    (
        QueryType::Treatment,
        1.0,
        &["treat", "cure", "therapy", "remedy", "medication", "manage"],
    ),
    (
        QueryType::Prevention,
        1.0,
        &["prevent", "avoid", "reduce risk", "protect", "stop"],
    ),
    (
        QueryType::Cause,
        1.0,
        &["cause", "reason", "why", "what causes", "from", "due to"],
    ),
    (
        QueryType::Diagnosis,
        1.0,
        &["diagnose", "test", "confirm", "identify", "check"],
    ),
];

/// Allergy questions lean heavily toward symptom clarification.
const ALLERGY_CUE_BONUS: f32 = 2.0;

/// Conditions recognized by direct mention when no extraction pattern fits.
const COMMON_CONDITIONS: &[&str] = &[
    "headache",
    "migraine",
    "cold",
    "flu",
    "fever",
    "cough",
    "asthma",
    "diabetes",
    "hypertension",
    "arthritis",
    "allergy",
    "depression",
    "anxiety",
    "insomnia",
    "heartburn",
    "eczema",
    "acne",
    "rash",
];

/// Topic extraction patterns, tried in order; the capture is the topic.
static TOPIC_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // "what causes the symptoms of X"
        r"what\s+(?:causes|is|are)\s+(?:the\s+)?(?:cause|reason|symptoms|treatment|cure)s?\s+(?:of|for)\s+([a-z\s\-]+)(?:\?|\.|\s|$)",
        // "how to treat X"
        r"how\s+(?:to|do\s+i|can\s+i|should\s+i)\s+(?:treat|manage|handle|deal\s+with|cure|prevent)\s+([a-z\s\-]+)(?:\?|\.|\s|$)",
        // "X symptoms"
        r"([a-z\s\-]+)\s+symptoms(?:\?|\.|\s|$)",
        // generic "about/regarding X" fallback
        r"(?:about|regarding|concerning|for|with)\s+([a-z\s\-]+)(?:\?|\.|\s|$)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("topic pattern must compile"))
    .collect()
});

/// Classify an utterance into a query type and a best-guess topic.
/// Pure function over the lower-cased utterance.
pub fn classify(utterance: &str) -> (QueryType, Option<String>) {
    let lower = utterance.to_lowercase();
    (classify_query_type(&lower), extract_topic(&lower))
}

/// Score each candidate type by keyword hits; the strictly highest score
/// wins, ties resolve to enumeration order, all-zero yields `General`.
pub fn classify_query_type(lower: &str) -> QueryType {
    let allergy_cue = lower.contains("allerg") || lower.contains("seasonal");

    let mut best = QueryType::General;
    let mut best_score = 0.0_f32;
    for (query_type, weight, keywords) in QUERY_TYPE_KEYWORDS {
        let hits = keywords.iter().filter(|k| lower.contains(*k)).count();
        let mut score = hits as f32 * weight;
        if *query_type == QueryType::Symptoms && allergy_cue {
            score += ALLERGY_CUE_BONUS;
        }
        if score > best_score {
            best = *query_type;
            best_score = score;
        }
    }
    best
}

/// Extract the main medical topic, or `None` if nothing matches.
pub fn extract_topic(lower: &str) -> Option<String> {
    // Allergy phrasing is recognized before any pattern matching.
    if let Some(topic) = allergy_topic(lower) {
        return Some(topic);
    }

    for pattern in TOPIC_PATTERNS.iter() {
        if let Some(captures) = pattern.captures(lower) {
            let topic = captures
                .get(1)
                .map(|m| m.as_str().trim())
                .unwrap_or_default();
            // Too-short captures fall through to the next pattern.
            if topic.len() > 3 && !topic.is_empty() {
                if let Some(allergy) = allergy_topic(topic) {
                    return Some(allergy);
                }
                return Some(topic.to_string());
            }
        }
    }

    for condition in COMMON_CONDITIONS {
        if lower.contains(condition) {
            return Some((*condition).to_string());
        }
    }

    // Symptom questions with no named condition.
    if lower.contains("symptoms") && lower.contains("common") {
        return Some("common symptoms".to_string());
    }

    None
}

fn allergy_topic(text: &str) -> Option<String> {
    if text.contains("seasonal allergies")
        || (text.contains("allergies") && text.contains("seasonal"))
    {
        return Some("seasonal allergies".to_string());
    }
    if text.contains("allergies") {
        return Some("allergies".to_string());
    }
    None
}
