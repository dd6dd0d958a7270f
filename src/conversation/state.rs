//! Conversation state machine — tracks which step a user's report is on.

use crate::lang::Locale;

/// The steps of the ticket-reporting conversation.
///
/// Progresses linearly: Init → AwaitingTitle → AwaitingEvidence. The
/// "no conversation" state is implicit — no stored state for the user. The
/// message that arrives during AwaitingEvidence triggers submission, after
/// which the state is deleted regardless of outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationStep {
    Init,
    AwaitingTitle,
    AwaitingEvidence,
}

impl ConversationStep {
    /// The next step in the linear progression, if any.
    pub fn next(&self) -> Option<ConversationStep> {
        match self {
            Self::Init => Some(Self::AwaitingTitle),
            Self::AwaitingTitle => Some(Self::AwaitingEvidence),
            Self::AwaitingEvidence => None,
        }
    }
}

impl std::fmt::Display for ConversationStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Init => "init",
            Self::AwaitingTitle => "awaiting_title",
            Self::AwaitingEvidence => "awaiting_evidence",
        };
        write!(f, "{s}")
    }
}

/// One user's in-progress conversation.
///
/// Fields are populated monotonically as steps advance and never regress.
#[derive(Debug, Clone)]
pub struct ConversationState {
    pub step: ConversationStep,
    pub locale: Locale,
    pub details: Option<String>,
    pub title: Option<String>,
}

impl ConversationState {
    /// Open a fresh conversation in the detected locale.
    pub fn new(locale: Locale) -> Self {
        Self {
            step: ConversationStep::Init,
            locale,
            details: None,
            title: None,
        }
    }
}
