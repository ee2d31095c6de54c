pub mod ambiguity;
pub mod catalog;
pub mod classify;
pub mod engine;
pub mod prompt;
pub mod selector;
pub mod templates;

use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum DialogueError {
    #[error("Utterance is empty")]
    EmptyUtterance,

    #[error("Conversation not found: {0}")]
    ConversationNotFound(Uuid),

    #[error("Invalid {field} value: {value}")]
    InvalidEnum { field: String, value: String },
}
