//! End-to-end scenarios through the bot dispatcher, with a scripted tracker.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use ticketbot::bot::Bot;
use ticketbot::channels::IncomingMessage;
use ticketbot::conversation::ConversationEngine;
use ticketbot::error::TrackerError;
use ticketbot::lang::StopwordClassifier;
use ticketbot::store::{InMemoryBindingStore, InMemoryConversationStore};
use ticketbot::tracker::{CreatedTask, NewTask, SubmissionPipeline, TrackerApi};

/// Counts tracker calls; always succeeds.
#[derive(Default)]
struct CountingTracker {
    created: AtomicUsize,
    uploads: AtomicUsize,
    description_updates: AtomicUsize,
}

#[async_trait]
impl TrackerApi for CountingTracker {
    async fn create_task(&self, _list_id: &str, _task: &NewTask) -> Result<CreatedTask, TrackerError> {
        self.created.fetch_add(1, Ordering::SeqCst);
        Ok(CreatedTask {
            id: "86c2p4k".into(),
        })
    }

    async fn update_description(
        &self,
        _task_id: &str,
        _description: &str,
    ) -> Result<(), TrackerError> {
        self.description_updates.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn add_assignee(&self, _task_id: &str, _assignee_id: &str) -> Result<(), TrackerError> {
        Ok(())
    }

    async fn upload_attachment(
        &self,
        _task_id: &str,
        _file_name: &str,
        _source_url: &str,
    ) -> Result<(), TrackerError> {
        self.uploads.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn build_bot() -> (Arc<Bot>, Arc<CountingTracker>) {
    let bindings = Arc::new(InMemoryBindingStore::new());
    let conversations = Arc::new(InMemoryConversationStore::new());
    let tracker = Arc::new(CountingTracker::default());
    let pipeline = SubmissionPipeline::new(tracker.clone(), bindings.clone(), 3);
    let engine = ConversationEngine::new(conversations, Arc::new(StopwordClassifier), pipeline);
    let bot = Arc::new(Bot::new(bindings, engine));
    (bot, tracker)
}

fn user_msg(text: &str) -> IncomingMessage {
    IncomingMessage::new("discord", "100200300", "42", text)
        .with_channel_name("support")
        .with_reporter("alice", "0420")
        .with_permalink("https://discord.test/channels/1/100200300/7")
}

#[tokio::test]
async fn happy_path_reports_a_ticket_with_an_image() {
    // Shared binding store between the command surface and the pipeline.
    let bindings = Arc::new(InMemoryBindingStore::new());
    let conversations = Arc::new(InMemoryConversationStore::new());
    let tracker = Arc::new(CountingTracker::default());
    let pipeline = SubmissionPipeline::new(tracker.clone(), bindings.clone(), 3);
    let engine = ConversationEngine::new(conversations, Arc::new(StopwordClassifier), pipeline);
    let bot = Bot::new(bindings, engine);

    // Admin binds the channel first.
    let confirm = bot.handle(&user_msg("configure-list 123456789")).await;
    assert!(confirm.contains("123456789"));

    let mappings = bot.handle(&user_msg("list-mappings")).await;
    assert!(mappings.contains("100200300"));
    assert!(mappings.contains("`123456789`"));

    // Guided conversation.
    let p1 = bot.handle(&user_msg("hello")).await;
    assert!(p1.contains("What task or problem"));

    let p2 = bot.handle(&user_msg("site is down at http://x.test")).await;
    assert!(p2.contains("short title"));

    let p3 = bot.handle(&user_msg("Site down")).await;
    assert!(p3.contains("evidence"));

    let done = bot
        .handle(&user_msg("here:").with_attachment("crash.png", "https://cdn.test/crash.png"))
        .await;
    assert!(done.contains("86c2p4k"), "success reply must carry the task id: {done}");

    assert_eq!(tracker.created.load(Ordering::SeqCst), 1);
    assert_eq!(tracker.uploads.load(Ordering::SeqCst), 1);
    assert_eq!(tracker.description_updates.load(Ordering::SeqCst), 0);

    // Conversation is gone: the next message starts over at prompt #1.
    let again = bot.handle(&user_msg("hello again")).await;
    assert!(again.contains("What task or problem"));
}

#[tokio::test]
async fn unconfigured_channel_aborts_the_submission() {
    let (bot, tracker) = build_bot();

    bot.handle(&user_msg("hello")).await;
    bot.handle(&user_msg("details")).await;
    bot.handle(&user_msg("title")).await;
    let reply = bot.handle(&user_msg("evidence")).await;

    assert!(reply.contains("not linked to a task list"));
    assert!(reply.contains("configure-list"));
    assert_eq!(tracker.created.load(Ordering::SeqCst), 0);

    // State was cleared: the next message opens a fresh conversation.
    let fresh = bot.handle(&user_msg("anything")).await;
    assert!(fresh.contains("What task or problem"));
}

#[tokio::test]
async fn url_evidence_amends_the_description() {
    let bindings = Arc::new(InMemoryBindingStore::new());
    let conversations = Arc::new(InMemoryConversationStore::new());
    let tracker = Arc::new(CountingTracker::default());
    let pipeline = SubmissionPipeline::new(tracker.clone(), bindings.clone(), 3);
    let engine = ConversationEngine::new(conversations, Arc::new(StopwordClassifier), pipeline);
    let bot = Bot::new(bindings, engine);

    bot.handle(&user_msg("configure-list 123456789")).await;
    bot.handle(&user_msg("something broke")).await;
    bot.handle(&user_msg("details")).await;
    bot.handle(&user_msg("title")).await;
    let reply = bot
        .handle(&user_msg("recording here https://loom.test/rec/99"))
        .await;

    assert!(reply.contains("86c2p4k"));
    assert_eq!(tracker.uploads.load(Ordering::SeqCst), 0);
    assert_eq!(tracker.description_updates.load(Ordering::SeqCst), 1);
}
