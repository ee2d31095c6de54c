use crate::dialogue::DialogueError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = DialogueError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DialogueError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(QueryType {
    Symptoms => "symptoms",
    Treatment => "treatment",
    Prevention => "prevention",
    Cause => "cause",
    Diagnosis => "diagnosis",
    General => "general",
});

str_enum!(MessageRole {
    User => "user",
    System => "system",
});

str_enum!(MessageKind {
    Response => "response",
    FollowUpQuestion => "follow_up_question",
});

str_enum!(InfoCategory {
    Duration => "duration",
    Severity => "severity",
    Frequency => "frequency",
    Location => "location",
    AssociatedSymptoms => "associated_symptoms",
    MedicalHistory => "medical_history",
    Triggers => "triggers",
    TriedRemedies => "tried_remedies",
    Allergies => "allergies",
    SymptomSpecification => "symptom_specification",
    Context => "context",
    ConditionClarification => "condition_clarification",
});

str_enum!(AmbiguityKind {
    VagueSymptoms => "vague_symptoms",
    MissingContext => "missing_context",
    MultipleConditions => "multiple_conditions",
    NeedsDuration => "needs_duration",
    NeedsSeverity => "needs_severity",
});

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn query_type_round_trips() {
        for qt in [
            QueryType::Symptoms,
            QueryType::Treatment,
            QueryType::Prevention,
            QueryType::Cause,
            QueryType::Diagnosis,
            QueryType::General,
        ] {
            assert_eq!(QueryType::from_str(qt.as_str()).unwrap(), qt);
        }
    }

    #[test]
    fn info_category_uses_snake_case_strings() {
        assert_eq!(InfoCategory::TriedRemedies.as_str(), "tried_remedies");
        assert_eq!(
            InfoCategory::from_str("associated_symptoms").unwrap(),
            InfoCategory::AssociatedSymptoms
        );
    }

    #[test]
    fn unknown_string_is_rejected() {
        assert!(MessageRole::from_str("assistant").is_err());
    }
}
