//! Clarus — conversation control core for a single-topic medical Q&A
//! assistant.
//!
//! Given a stream of user utterances, the engine decides whether enough
//! information has been gathered to answer definitively or whether a
//! clarifying follow-up question must be asked first, and selects which
//! question to ask. Model inference, safety filtering and transport are
//! external collaborators; this crate owns only the deterministic control
//! logic in between.

pub mod config;
pub mod dialogue;
pub mod models;

pub use config::EngineConfig;
pub use dialogue::engine::{DialogueEngine, TurnOutcome};
pub use dialogue::DialogueError;
pub use models::conversation::{ConversationPhase, ConversationState, ConversationSummary};

use tracing_subscriber::EnvFilter;

/// Initialize tracing for host applications that do not install their own
/// subscriber. Respects `RUST_LOG` when set.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}
