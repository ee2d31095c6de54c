use crate::models::conversation::ConversationState;

/// Assemble the context-enriched prompt used for final answer generation:
/// the original question, every collected follow-up answer, the classified
/// query type and topic, and a closing instruction. Empty until an initial
/// query has been recorded.
pub fn build_enhanced_prompt(state: &ConversationState) -> String {
    let Some(original_query) = state.original_query.as_deref() else {
        return String::new();
    };

    let mut prompt = format!("Original question: {original_query}\n\n");

    if !state.collected_information.is_empty() {
        prompt.push_str("Additional information:\n");
        for (category, answer) in &state.collected_information {
            prompt.push_str(&format!("- {}: {}\n", title_case(category.as_str()), answer));
        }
    }

    if let Some(query_type) = state.current_query_type {
        prompt.push_str(&format!("\nQuery type: {}\n", query_type.as_str()));
    }
    if let Some(topic) = state.current_topic.as_deref() {
        prompt.push_str(&format!("Topic: {topic}\n"));
    }

    prompt.push_str(
        "\nBased on ALL the information above, provide a comprehensive and \
         detailed response to the original question, incorporating the \
         additional context provided through follow-up questions.",
    );

    prompt
}

/// "tried_remedies" -> "Tried Remedies".
fn title_case(snake: &str) -> String {
    snake
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    let upper: String = first.to_uppercase().collect();
                    format!("{}{}", upper, chars.as_str())
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
