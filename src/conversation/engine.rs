//! Conversation engine — advances a user's conversation one step per inbound
//! message and hands the finished report to the submission pipeline.

use std::sync::Arc;

use crate::attachments;
use crate::channels::IncomingMessage;
use crate::error::PipelineError;
use crate::lang::{self, LanguageClassifier};
use crate::store::ConversationStore;
use crate::tracker::{SubmissionPipeline, SubmissionRequest};

use super::prompts::{messages, success_reply};
use super::state::{ConversationState, ConversationStep};

/// Per-user state machine dispatch.
///
/// Every inbound non-command message produces exactly one reply. External
/// failures never escape: the submission boundary maps them to one of the
/// fixed localized strings and logs the detail.
pub struct ConversationEngine {
    conversations: Arc<dyn ConversationStore>,
    classifier: Arc<dyn LanguageClassifier>,
    pipeline: SubmissionPipeline,
}

impl ConversationEngine {
    pub fn new(
        conversations: Arc<dyn ConversationStore>,
        classifier: Arc<dyn LanguageClassifier>,
        pipeline: SubmissionPipeline,
    ) -> Self {
        Self {
            conversations,
            classifier,
            pipeline,
        }
    }

    /// Advance the sender's conversation by one step and return the reply.
    pub async fn handle(&self, msg: &IncomingMessage) -> String {
        let user_id = msg.reporter.user_id.clone();

        let Some(mut state) = self.conversations.get(&user_id).await else {
            // No open conversation — start one in the detected locale.
            let locale = lang::detect_locale(self.classifier.as_ref(), &msg.text);
            let state = ConversationState::new(locale);
            self.conversations.put(&user_id, state).await;
            tracing::debug!(user = %user_id, ?locale, "Conversation opened");
            return messages(locale).prompt_details.to_string();
        };

        match state.step {
            ConversationStep::Init => {
                state.details = Some(msg.text.clone());
                state.step = ConversationStep::AwaitingTitle;
                let locale = state.locale;
                self.conversations.put(&user_id, state).await;
                messages(locale).prompt_title.to_string()
            }
            ConversationStep::AwaitingTitle => {
                state.title = Some(msg.text.clone());
                state.step = ConversationStep::AwaitingEvidence;
                let locale = state.locale;
                self.conversations.put(&user_id, state).await;
                messages(locale).prompt_evidence.to_string()
            }
            ConversationStep::AwaitingEvidence => {
                let reply = self.submit(&state, msg).await;
                // The conversation is over either way; it cannot be resumed.
                self.conversations.remove(&user_id).await;
                reply
            }
        }
    }

    /// Terminal step: collect evidence, run the pipeline, compose the reply.
    async fn submit(&self, state: &ConversationState, msg: &IncomingMessage) -> String {
        let locale = state.locale;
        let request = SubmissionRequest {
            channel_id: msg.channel_id.clone(),
            channel_name: msg.channel_name.clone(),
            reporter: msg.reporter.clone(),
            details: state.details.clone().unwrap_or_default(),
            title: state.title.clone().unwrap_or_default(),
            attachments: attachments::collect(msg),
            permalink: msg.permalink.clone(),
        };

        match self.pipeline.submit(request).await {
            Ok(outcome) => {
                let failed = outcome.uploads.iter().filter(|u| !u.success).count();
                if failed > 0 {
                    tracing::warn!(
                        task_id = %outcome.task_id,
                        failed,
                        "Task created with failed attachment uploads"
                    );
                }
                success_reply(locale, &outcome.task_id)
            }
            Err(PipelineError::UnconfiguredChannel { channel }) => {
                tracing::info!(channel = %channel, "Submission on unconfigured channel");
                messages(locale).unconfigured.to_string()
            }
            Err(e) => {
                tracing::error!(user = %msg.reporter.user_id, "Task submission failed: {e}");
                messages(locale).failure.to_string()
            }
        }
    }
}
