use std::sync::LazyLock;

use regex::Regex;

use crate::models::enums::AmbiguityKind;

/// A compiled pattern group contributing one ambiguity kind.
struct AmbiguityGroup {
    kind: AmbiguityKind,
    patterns: Vec<Regex>,
}

fn group(kind: AmbiguityKind, patterns: &[&str]) -> AmbiguityGroup {
    AmbiguityGroup {
        kind,
        patterns: patterns
            .iter()
            .map(|p| Regex::new(p).expect("ambiguity pattern must compile"))
            .collect(),
    }
}

/// Pattern groups are independent: each contributes its kind when any of
/// its patterns matches, so evaluation order never changes the result set.
static AMBIGUITY_GROUPS: LazyLock<Vec<AmbiguityGroup>> = LazyLock::new(|| {
    vec![
        group(
            AmbiguityKind::VagueSymptoms,
            &[
                r"(?i)feel(?:ing)?\s+(?:unwell|bad|off|weird|strange|sick)",
                r"(?i)something\s+(?:wrong|off|weird|strange)",
                r"(?i)not\s+(?:feeling|seeming)\s+right",
                r"(?i)general(?:ly)?\s+(?:unwell|ill)",
                r"(?i)under\s+the\s+weather",
            ],
        ),
        group(
            AmbiguityKind::MissingContext,
            &[
                r"(?i)(?:is|are)\s+(?:this|these|it|that)\s+(?:normal|serious|concerning|bad)",
                r"(?i)(?:should|do)\s+(?:i|one|you)\s+(?:worry|be\s+concerned)",
                r"(?i)what\s+(?:does|could|might|is)\s+(?:this|it|that)",
                r"(?i)why\s+(?:do|does|am|is|are)",
                r"(?i)(?:how|what)\s+(?:to|about)\s+(?:my|this)",
            ],
        ),
        group(
            AmbiguityKind::MultipleConditions,
            &[
                r"(?i)(?:and|or)\s+(?:also|additionally|too)",
                r"(?i)(?:plus|along\s+with|together\s+with|as\s+well\s+as)",
                r"(?i)(?:both|multiple|several|various)\s+(?:issues|problems|symptoms|conditions)",
            ],
        ),
        group(
            AmbiguityKind::NeedsDuration,
            &[
                r"(?i)(?:pain|ache|discomfort|symptom|issue|problem)",
                r"(?i)(?:feeling|experiencing|having)",
                r"(?i)(?:cough|headache|fever|rash)",
            ],
        ),
        group(
            AmbiguityKind::NeedsSeverity,
            &[
                r"(?i)(?:pain|ache|discomfort|hurt)",
                r"(?i)(?:bad|serious|severe|mild)",
                r"(?i)(?:symptom|issue|problem)",
            ],
        ),
    ]
});

/// Flag vague or under-specified phrasing in an utterance. Returns the set
/// of ambiguity kinds that fired, in group order.
pub fn detect(utterance: &str) -> Vec<AmbiguityKind> {
    AMBIGUITY_GROUPS
        .iter()
        .filter(|g| g.patterns.iter().any(|p| p.is_match(utterance)))
        .map(|g| g.kind)
        .collect()
}
