//! Guided ticket-reporting conversation: state machine, prompts, engine.

pub mod engine;
pub mod prompts;
pub mod state;

pub use engine::ConversationEngine;
pub use state::{ConversationState, ConversationStep};
