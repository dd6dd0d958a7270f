use std::sync::Arc;

use ticketbot::bot::{self, Bot};
use ticketbot::channels::{Channel, CliChannel, DiscordChannel};
use ticketbot::config::BotConfig;
use ticketbot::conversation::ConversationEngine;
use ticketbot::lang::StopwordClassifier;
use ticketbot::store::{InMemoryBindingStore, InMemoryConversationStore};
use ticketbot::tracker::{ClickUpClient, SubmissionPipeline};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Install rustls crypto provider before any TLS usage
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = BotConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        eprintln!("  export CLICKUP_TOKEN=pk_...");
        eprintln!("  export DISCORD_TOKEN=... (optional, CLI-only without it)");
        std::process::exit(1);
    });

    eprintln!("🎫 ticketbot v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Tracker: {}", config.tracker_base_url);
    eprintln!("   Upload batch: {}", config.upload_batch);

    // ── Stores and pipeline ─────────────────────────────────────────────
    let bindings = Arc::new(InMemoryBindingStore::new());
    let conversations = Arc::new(InMemoryConversationStore::new());
    let tracker = Arc::new(ClickUpClient::new(
        config.tracker_base_url.clone(),
        config.tracker_token.clone(),
    ));
    let pipeline = SubmissionPipeline::new(tracker, bindings.clone(), config.upload_batch);
    let engine = ConversationEngine::new(conversations, Arc::new(StopwordClassifier), pipeline);
    let bot = Arc::new(Bot::new(bindings, engine));

    // ── Channels ────────────────────────────────────────────────────────
    let mut channels: Vec<Arc<dyn Channel>> = vec![Arc::new(CliChannel::new())];
    let mut active = vec!["cli"];

    if let Some(discord_token) = config.discord_token.clone() {
        channels.push(Arc::new(DiscordChannel::new(discord_token)));
        active.push("discord");
    } else {
        eprintln!("   Discord: disabled (DISCORD_TOKEN not set)");
    }

    eprintln!("   Channels: {}\n", active.join(", "));

    bot::run(bot, channels).await?;
    Ok(())
}
