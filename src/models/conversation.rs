use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

use super::enums::{InfoCategory, MessageKind, MessageRole, QueryType};

/// One message in a conversation. `kind` is set on system turns only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub role: MessageRole,
    pub content: String,
    pub timestamp: NaiveDateTime,
    pub kind: Option<MessageKind>,
}

/// Insertion-ordered map from information category to importance score.
///
/// Selection breaks importance ties by insertion order (first inserted
/// wins), so the backing store is a `Vec` rather than a hash map.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MissingInfo {
    entries: Vec<(InfoCategory, f32)>,
}

impl MissingInfo {
    /// Insert a category unless it is already tracked. Returns whether the
    /// entry was added.
    pub fn insert(&mut self, category: InfoCategory, importance: f32) -> bool {
        if self.contains(category) {
            return false;
        }
        self.entries.push((category, importance));
        true
    }

    pub fn remove(&mut self, category: InfoCategory) -> Option<f32> {
        let index = self.entries.iter().position(|(c, _)| *c == category)?;
        Some(self.entries.remove(index).1)
    }

    pub fn contains(&self, category: InfoCategory) -> bool {
        self.entries.iter().any(|(c, _)| *c == category)
    }

    pub fn get(&self, category: InfoCategory) -> Option<f32> {
        self.entries
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, importance)| *importance)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (InfoCategory, f32)> + '_ {
        self.entries.iter().copied()
    }

    /// Entries sorted by importance, descending. The sort is stable, so
    /// equal scores keep their insertion order.
    pub fn ranked(&self) -> Vec<(InfoCategory, f32)> {
        let mut ranked = self.entries.clone();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked
    }
}

/// Lifecycle phase, derived from the state rather than stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConversationPhase {
    /// No history yet.
    Fresh,
    /// First user message received, no follow-up asked yet.
    AwaitingInitialAnalysis,
    /// At least one follow-up question is outstanding.
    AwaitingFollowUpAnswer,
    /// Enough information gathered (or the follow-up cap was reached).
    Complete,
}

/// Per-conversation state owned by the engine.
///
/// Mutated turn by turn; callers must serialize turns for a given
/// conversation id. Replaced wholesale on reset, never partially rolled
/// back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationState {
    pub conversation_id: Uuid,
    pub history: Vec<Turn>,
    pub follow_up_count: u32,
    /// First user utterance; set exactly once between resets.
    pub original_query: Option<String>,
    pub current_topic: Option<String>,
    pub current_query_type: Option<QueryType>,
    pub missing_information: MissingInfo,
    /// Answers collected through follow-ups, in collection order.
    pub collected_information: Vec<(InfoCategory, String)>,
    /// Exact question strings already asked and answered.
    pub answered_questions: HashSet<String>,
    /// Monotonic within a conversation; only reset clears it.
    pub is_complete: bool,
}

impl ConversationState {
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4())
    }

    pub fn with_id(conversation_id: Uuid) -> Self {
        Self {
            conversation_id,
            history: Vec::new(),
            follow_up_count: 0,
            original_query: None,
            current_topic: None,
            current_query_type: None,
            missing_information: MissingInfo::default(),
            collected_information: Vec::new(),
            answered_questions: HashSet::new(),
            is_complete: false,
        }
    }

    /// Wipe the conversation and issue a fresh identifier.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn phase(&self) -> ConversationPhase {
        if self.history.is_empty() {
            ConversationPhase::Fresh
        } else if self.is_complete {
            ConversationPhase::Complete
        } else if self.follow_up_count > 0 {
            ConversationPhase::AwaitingFollowUpAnswer
        } else {
            ConversationPhase::AwaitingInitialAnalysis
        }
    }

    pub fn push_user_turn(&mut self, content: &str) {
        self.history.push(Turn {
            role: MessageRole::User,
            content: content.to_string(),
            timestamp: Local::now().naive_local(),
            kind: None,
        });
    }

    pub fn push_system_turn(&mut self, content: &str, kind: MessageKind) {
        self.history.push(Turn {
            role: MessageRole::System,
            content: content.to_string(),
            timestamp: Local::now().naive_local(),
            kind: Some(kind),
        });
    }

    /// The most recent follow-up question, scanning history in reverse.
    pub fn last_follow_up_question(&self) -> Option<&str> {
        self.history
            .iter()
            .rev()
            .find(|turn| {
                turn.role == MessageRole::System && turn.kind == Some(MessageKind::FollowUpQuestion)
            })
            .map(|turn| turn.content.as_str())
    }

    /// Store an answer for a category, overwriting an earlier answer if the
    /// category was re-flagged and asked again.
    pub fn record_collected(&mut self, category: InfoCategory, answer: &str) {
        if let Some(entry) = self
            .collected_information
            .iter_mut()
            .find(|(c, _)| *c == category)
        {
            entry.1 = answer.to_string();
        } else {
            self.collected_information.push((category, answer.to_string()));
        }
    }

    /// Re-evaluate completion. The flag is monotonic: once set it stays set
    /// until reset. Complete when the follow-up cap is reached or when no
    /// remaining missing-information entry is critical.
    pub fn update_completion(&mut self, max_follow_ups: u32, critical_importance: f32) {
        if self.is_complete {
            return;
        }
        if self.follow_up_count >= max_follow_ups {
            self.is_complete = true;
            return;
        }
        let critical_missing = self
            .missing_information
            .iter()
            .any(|(_, importance)| importance >= critical_importance);
        if !critical_missing {
            self.is_complete = true;
        }
    }

    /// Plain-text transcript for display.
    pub fn formatted_history(&self) -> String {
        if self.history.is_empty() {
            return "No conversation history.".to_string();
        }
        let lines: Vec<String> = self
            .history
            .iter()
            .map(|turn| {
                let speaker = match turn.role {
                    MessageRole::User => "You",
                    MessageRole::System => "Assistant",
                };
                format!("{}: {}", speaker, turn.content)
            })
            .collect();
        lines.join("\n\n")
    }

    pub fn summary(&self) -> ConversationSummary {
        ConversationSummary {
            conversation_id: self.conversation_id,
            original_query: self.original_query.clone(),
            query_type: self.current_query_type,
            topic: self.current_topic.clone(),
            follow_up_questions_asked: self.follow_up_count,
            missing_information: self.missing_information.clone(),
            collected_information: self.collected_information.clone(),
            is_complete: self.is_complete,
            message_count: self.history.len(),
        }
    }
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of a conversation for host-side display or persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub conversation_id: Uuid,
    pub original_query: Option<String>,
    pub query_type: Option<QueryType>,
    pub topic: Option<String>,
    pub follow_up_questions_asked: u32,
    pub missing_information: MissingInfo,
    pub collected_information: Vec<(InfoCategory, String)>,
    pub is_complete: bool,
    pub message_count: usize,
}
