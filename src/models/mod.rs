pub mod conversation;
pub mod enums;

pub use conversation::{ConversationPhase, ConversationState, ConversationSummary, MissingInfo, Turn};
pub use enums::{AmbiguityKind, InfoCategory, MessageKind, MessageRole, QueryType};
