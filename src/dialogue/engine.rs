use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use super::{catalog, classify, prompt, selector, DialogueError};
use crate::config::EngineConfig;
use crate::models::conversation::{ConversationState, ConversationSummary};
use crate::models::enums::{InfoCategory, MessageKind};

/// Result of feeding one user message to the engine.
#[derive(Debug, Clone, Serialize)]
pub struct TurnOutcome {
    pub conversation_id: Uuid,
    /// Follow-up question to relay to the user, already recorded in the
    /// conversation history. `None` when no clarification is needed.
    pub next_question: Option<String>,
    pub is_complete: bool,
}

/// Conversation controller: owns per-conversation state, classification,
/// missing-information tracking and follow-up selection.
///
/// All tunables come from [`EngineConfig`] and all randomness from the
/// owned generator, so two engines built with the same config and seed
/// behave identically.
pub struct DialogueEngine {
    config: EngineConfig,
    conversations: HashMap<Uuid, ConversationState>,
    rng: StdRng,
}

impl DialogueEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            conversations: HashMap::new(),
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic engine for tests and replayable sessions.
    pub fn with_seed(config: EngineConfig, seed: u64) -> Self {
        Self {
            config,
            conversations: HashMap::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Look up an existing conversation or create one. With `None`, a fresh
    /// conversation gets a new id.
    pub fn start_or_resume(&mut self, conversation_id: Option<Uuid>) -> Uuid {
        let id = conversation_id.unwrap_or_else(Uuid::new_v4);
        self.conversations.entry(id).or_insert_with(|| {
            info!(conversation_id = %id, "Starting conversation");
            ConversationState::with_id(id)
        });
        id
    }

    pub fn conversation(&self, conversation_id: Uuid) -> Option<&ConversationState> {
        self.conversations.get(&conversation_id)
    }

    /// Feed one user message into a conversation.
    ///
    /// The first message is classified and analyzed for missing
    /// information; later messages are treated as answers to the most
    /// recent follow-up question. If a follow-up is warranted, it is
    /// selected, recorded in history, counted against the cap and returned
    /// in the outcome.
    pub fn submit_user_message(
        &mut self,
        conversation_id: Uuid,
        text: &str,
    ) -> Result<TurnOutcome, DialogueError> {
        if text.trim().is_empty() {
            return Err(DialogueError::EmptyUtterance);
        }
        let state = self
            .conversations
            .get_mut(&conversation_id)
            .ok_or(DialogueError::ConversationNotFound(conversation_id))?;

        let is_initial = state.original_query.is_none();
        state.push_user_turn(text);

        if is_initial {
            state.original_query = Some(text.to_string());
            let (query_type, topic) = classify::classify(text);
            state.current_query_type = Some(query_type);
            state.current_topic = topic;

            let lower = text.to_lowercase();
            state.missing_information = catalog::identify_missing_information(
                &lower,
                state.current_topic.as_deref(),
                query_type,
            );
            // Allergy topics always carry at least the allergy probe.
            if state
                .current_topic
                .as_deref()
                .is_some_and(catalog::is_allergy_topic)
            {
                state
                    .missing_information
                    .insert(InfoCategory::Allergies, catalog::FORCED_ALLERGY_IMPORTANCE);
            }
            debug!(
                conversation_id = %conversation_id,
                query_type = query_type.as_str(),
                topic = state.current_topic.as_deref().unwrap_or("<none>"),
                missing = state.missing_information.len(),
                "Classified initial query"
            );
        } else if state.follow_up_count > 0 {
            if let Some(question) = state.last_follow_up_question().map(str::to_string) {
                state.answered_questions.insert(question.clone());
                if let Some(category) =
                    catalog::infer_question_category(&question, state.current_topic.as_deref())
                {
                    state.record_collected(category, text);
                    state.missing_information.remove(category);
                    debug!(
                        conversation_id = %conversation_id,
                        category = category.as_str(),
                        "Collected follow-up answer"
                    );
                }
            }
        }

        state.update_completion(
            self.config.max_follow_up_questions,
            self.config.critical_importance,
        );

        let next_question = if state.is_complete {
            None
        } else {
            selector::next_question(&mut self.rng, state, &self.config)
        };
        if let Some(question) = next_question.as_deref() {
            state.push_system_turn(question, MessageKind::FollowUpQuestion);
            state.follow_up_count += 1;
            state.update_completion(
                self.config.max_follow_up_questions,
                self.config.critical_importance,
            );
            debug!(conversation_id = %conversation_id, question, "Asking follow-up question");
        }

        Ok(TurnOutcome {
            conversation_id,
            next_question,
            is_complete: state.is_complete,
        })
    }

    /// Select a follow-up question without mutating the conversation.
    /// Repeated calls on unchanged state keep targeting the same category.
    pub fn next_question(
        &mut self,
        conversation_id: Uuid,
    ) -> Result<Option<String>, DialogueError> {
        let state = self
            .conversations
            .get(&conversation_id)
            .ok_or(DialogueError::ConversationNotFound(conversation_id))?;
        Ok(selector::next_question(&mut self.rng, state, &self.config))
    }

    /// Record a system turn produced outside the engine, e.g. a generated
    /// answer or a host-rendered question. Follow-up questions count
    /// against the cap exactly as engine-selected ones do.
    pub fn record_system_message(
        &mut self,
        conversation_id: Uuid,
        text: &str,
        is_follow_up: bool,
    ) -> Result<(), DialogueError> {
        let state = self
            .conversations
            .get_mut(&conversation_id)
            .ok_or(DialogueError::ConversationNotFound(conversation_id))?;
        let kind = if is_follow_up {
            MessageKind::FollowUpQuestion
        } else {
            MessageKind::Response
        };
        state.push_system_turn(text, kind);
        if is_follow_up {
            state.follow_up_count += 1;
            state.update_completion(
                self.config.max_follow_up_questions,
                self.config.critical_importance,
            );
        }
        Ok(())
    }

    /// Context-enriched prompt for final answer generation.
    pub fn build_enhanced_prompt(&self, conversation_id: Uuid) -> Result<String, DialogueError> {
        let state = self
            .conversations
            .get(&conversation_id)
            .ok_or(DialogueError::ConversationNotFound(conversation_id))?;
        Ok(prompt::build_enhanced_prompt(state))
    }

    pub fn summary(&self, conversation_id: Uuid) -> Result<ConversationSummary, DialogueError> {
        let state = self
            .conversations
            .get(&conversation_id)
            .ok_or(DialogueError::ConversationNotFound(conversation_id))?;
        Ok(state.summary())
    }

    /// Wipe a conversation and re-register it under a fresh id. Returns the
    /// new id.
    pub fn reset(&mut self, conversation_id: Uuid) -> Result<Uuid, DialogueError> {
        let mut state = self
            .conversations
            .remove(&conversation_id)
            .ok_or(DialogueError::ConversationNotFound(conversation_id))?;
        state.reset();
        let new_id = state.conversation_id;
        info!(old = %conversation_id, new = %new_id, "Conversation reset");
        self.conversations.insert(new_id, state);
        Ok(new_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogue::templates;
    use crate::models::conversation::ConversationPhase;
    use crate::models::enums::QueryType;

    fn engine() -> DialogueEngine {
        DialogueEngine::with_seed(EngineConfig::default(), 42)
    }

    fn duration_questions_for(topic: &str) -> Vec<String> {
        catalog::spec_for(InfoCategory::Duration)
            .unwrap()
            .questions
            .iter()
            .map(|q| selector::fill_placeholders(q, Some(topic)))
            .collect()
    }

    #[test]
    fn initial_symptom_query_probes_the_expected_slots() {
        let mut engine = engine();
        let id = engine.start_or_resume(None);
        let outcome = engine.submit_user_message(id, "I have a headache").unwrap();

        assert!(outcome.next_question.is_some());
        assert!(!outcome.is_complete);

        let state = engine.conversation(id).unwrap();
        assert_eq!(state.current_query_type, Some(QueryType::Symptoms));
        assert_eq!(state.current_topic.as_deref(), Some("headache"));
        assert_eq!(state.follow_up_count, 1);
        for category in [
            InfoCategory::Duration,
            InfoCategory::Severity,
            InfoCategory::Frequency,
            // "headache" names a physical symptom, so location is probed.
            InfoCategory::Location,
        ] {
            assert!(
                state.missing_information.contains(category),
                "{category:?} should be missing"
            );
        }
    }

    #[test]
    fn allergy_query_asks_an_allergy_question_first() {
        let mut engine = engine();
        let id = engine.start_or_resume(None);
        let outcome = engine
            .submit_user_message(id, "What are common symptoms of seasonal allergies?")
            .unwrap();

        let state = engine.conversation(id).unwrap();
        assert_eq!(state.current_topic.as_deref(), Some("seasonal allergies"));
        assert_eq!(
            state.missing_information.get(InfoCategory::Allergies),
            Some(catalog::FORCED_ALLERGY_IMPORTANCE)
        );

        let question = outcome.next_question.unwrap();
        assert!(templates::ALLERGY_QUESTIONS.contains(&question.as_str()));
    }

    #[test]
    fn conversation_completes_after_three_follow_ups() {
        let mut engine = engine();
        let id = engine.start_or_resume(None);

        let first = engine.submit_user_message(id, "I have a headache").unwrap();
        assert!(first.next_question.is_some());
        assert!(!first.is_complete);

        let second = engine.submit_user_message(id, "about two weeks").unwrap();
        assert!(second.next_question.is_some());

        let third = engine.submit_user_message(id, "it is fairly mild").unwrap();
        assert!(third.next_question.is_some());
        assert!(third.is_complete, "cap reached with the third question");

        let state = engine.conversation(id).unwrap();
        assert_eq!(state.follow_up_count, 3);
        assert_eq!(state.phase(), ConversationPhase::Complete);

        // Further messages are recorded but draw no more questions.
        let fourth = engine.submit_user_message(id, "anything else?").unwrap();
        assert_eq!(fourth.next_question, None);
        assert!(fourth.is_complete);
        assert_eq!(engine.conversation(id).unwrap().follow_up_count, 3);
    }

    #[test]
    fn no_topic_query_completes_immediately() {
        let mut engine = engine();
        let id = engine.start_or_resume(None);
        let outcome = engine.submit_user_message(id, "Hello").unwrap();

        assert_eq!(outcome.next_question, None);
        assert!(outcome.is_complete);
        assert!(engine
            .conversation(id)
            .unwrap()
            .missing_information
            .is_empty());
    }

    #[test]
    fn answered_category_is_collected_and_cleared() {
        let mut engine = engine();
        let id = engine.start_or_resume(None);
        engine.submit_user_message(id, "I have a headache").unwrap();

        let question = "How long have you been experiencing these symptoms?";
        engine.record_system_message(id, question, true).unwrap();
        engine.submit_user_message(id, "about two weeks").unwrap();

        let state = engine.conversation(id).unwrap();
        assert!(!state.missing_information.contains(InfoCategory::Duration));
        assert!(state
            .collected_information
            .iter()
            .any(|(c, answer)| *c == InfoCategory::Duration && answer == "about two weeks"));
        assert!(state.answered_questions.contains(question));
    }

    #[test]
    fn next_question_keeps_targeting_the_top_category() {
        let mut engine = engine();
        let id = engine.start_or_resume(None);
        engine.submit_user_message(id, "I have a headache").unwrap();

        let pool = duration_questions_for("headache");
        let first = engine.next_question(id).unwrap().unwrap();
        let second = engine.next_question(id).unwrap().unwrap();
        assert!(pool.contains(&first), "got: {first}");
        assert!(pool.contains(&second), "got: {second}");
    }

    #[test]
    fn externally_recorded_follow_ups_count_against_the_cap() {
        let mut engine = engine();
        let id = engine.start_or_resume(None);
        engine.submit_user_message(id, "I have a headache").unwrap();

        engine
            .record_system_message(id, "How severe is it?", true)
            .unwrap();
        engine
            .record_system_message(id, "Where exactly does it hurt?", true)
            .unwrap();

        let state = engine.conversation(id).unwrap();
        assert_eq!(state.follow_up_count, 3);
        assert!(state.is_complete);
        assert_eq!(engine.next_question(id).unwrap(), None);
    }

    #[test]
    fn plain_responses_do_not_count_as_follow_ups() {
        let mut engine = engine();
        let id = engine.start_or_resume(None);
        engine.submit_user_message(id, "I have a headache").unwrap();

        engine
            .record_system_message(id, "Here is some general guidance.", false)
            .unwrap();
        assert_eq!(engine.conversation(id).unwrap().follow_up_count, 1);
    }

    #[test]
    fn enhanced_prompt_carries_the_original_question() {
        let mut engine = engine();
        let id = engine.start_or_resume(None);
        engine.submit_user_message(id, "I have a headache").unwrap();
        engine
            .record_system_message(id, "How long have you been experiencing these symptoms?", true)
            .unwrap();
        engine.submit_user_message(id, "about two weeks").unwrap();

        let prompt = engine.build_enhanced_prompt(id).unwrap();
        assert!(prompt.contains("Original question: I have a headache"));
        assert!(prompt.contains("- Duration: about two weeks"));
        assert!(prompt.contains("Topic: headache"));
    }

    #[test]
    fn reset_issues_a_fresh_conversation() {
        let mut engine = engine();
        let id = engine.start_or_resume(None);
        engine.submit_user_message(id, "I have a headache").unwrap();
        engine.submit_user_message(id, "about two weeks").unwrap();

        let new_id = engine.reset(id).unwrap();
        assert_ne!(new_id, id);
        assert!(engine.conversation(id).is_none());

        let state = engine.conversation(new_id).unwrap();
        assert_eq!(state.phase(), ConversationPhase::Fresh);
        assert_eq!(state.follow_up_count, 0);
        assert!(!state.is_complete);
    }

    #[test]
    fn start_or_resume_keeps_existing_state() {
        let mut engine = engine();
        let id = engine.start_or_resume(None);
        engine.submit_user_message(id, "I have a headache").unwrap();

        let same = engine.start_or_resume(Some(id));
        assert_eq!(same, id);
        assert_eq!(
            engine.conversation(id).unwrap().original_query.as_deref(),
            Some("I have a headache")
        );
    }

    #[test]
    fn empty_utterance_is_rejected() {
        let mut engine = engine();
        let id = engine.start_or_resume(None);
        assert!(matches!(
            engine.submit_user_message(id, "   "),
            Err(DialogueError::EmptyUtterance)
        ));
    }

    #[test]
    fn unknown_conversation_is_rejected() {
        let mut engine = engine();
        let missing = Uuid::new_v4();
        assert!(matches!(
            engine.submit_user_message(missing, "hello"),
            Err(DialogueError::ConversationNotFound(id)) if id == missing
        ));
        assert!(engine.summary(missing).is_err());
        assert!(engine.reset(missing).is_err());
    }

    #[test]
    fn summary_reflects_conversation_progress() {
        let mut engine = engine();
        let id = engine.start_or_resume(None);
        engine.submit_user_message(id, "I have a headache").unwrap();

        let summary = engine.summary(id).unwrap();
        assert_eq!(summary.conversation_id, id);
        assert_eq!(summary.original_query.as_deref(), Some("I have a headache"));
        assert_eq!(summary.topic.as_deref(), Some("headache"));
        assert_eq!(summary.follow_up_questions_asked, 1);
        // The user message plus the recorded follow-up question.
        assert_eq!(summary.message_count, 2);
        assert!(!summary.is_complete);
    }
}
