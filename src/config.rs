use serde::{Deserialize, Serialize};

/// Follow-up questions per conversation before the engine stops asking.
pub const DEFAULT_MAX_FOLLOW_UP_QUESTIONS: u32 = 3;

/// Missing-information entries at or above this importance keep the
/// conversation open.
pub const DEFAULT_CRITICAL_IMPORTANCE: f32 = 0.7;

/// Probability that a generated question gets a courteous lead-in.
pub const DEFAULT_LEAD_IN_PROBABILITY: f32 = 0.4;

/// Default log filter for hosts that use [`crate::init_tracing`].
pub fn default_log_filter() -> &'static str {
    "clarus=info"
}

/// Tunables for [`crate::DialogueEngine`]. Injected at construction; the
/// engine never reads process-wide state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Hard cap on follow-up questions per conversation.
    pub max_follow_up_questions: u32,
    /// Importance threshold above which missing information blocks
    /// completion.
    pub critical_importance: f32,
    /// Chance of prepending a courteous lead-in to template-pool questions.
    pub lead_in_probability: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_follow_up_questions: DEFAULT_MAX_FOLLOW_UP_QUESTIONS,
            critical_importance: DEFAULT_CRITICAL_IMPORTANCE,
            lead_in_probability: DEFAULT_LEAD_IN_PROBABILITY,
        }
    }
}
