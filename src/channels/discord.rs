//! Discord channel — gateway events in, REST replies out.
//!
//! The gateway client runs on a spawned task and forwards user messages into
//! the bot's inbound stream; replies go through a standalone REST `Http`
//! client so responding never depends on gateway state.

use std::sync::Arc;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serenity::all::{ChannelId, Client, Context, EventHandler, GatewayIntents, Message, Ready};
use serenity::http::Http;
use tokio_stream::wrappers::UnboundedReceiverStream;

use crate::channels::{Channel, IncomingMessage, MessageStream, OutgoingResponse};
use crate::error::ChannelError;

/// Discord channel adapter.
pub struct DiscordChannel {
    token: SecretString,
    http: Arc<Http>,
}

impl DiscordChannel {
    pub fn new(token: SecretString) -> Self {
        let http = Arc::new(Http::new(token.expose_secret()));
        Self { token, http }
    }
}

/// Gateway event handler that forwards messages into the bot.
struct ForwardHandler {
    tx: tokio::sync::mpsc::UnboundedSender<IncomingMessage>,
}

#[async_trait]
impl EventHandler for ForwardHandler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        tracing::info!(user = %ready.user.name, "Discord gateway connected");
    }

    async fn message(&self, ctx: Context, msg: Message) {
        // Never react to bots, ourselves included.
        if msg.author.bot {
            return;
        }

        let channel_name = match msg.guild_id {
            Some(_) => msg
                .channel_id
                .name(&ctx)
                .await
                .unwrap_or_else(|_| msg.channel_id.to_string()),
            None => "Direct Message".to_string(),
        };

        let discriminator = msg
            .author
            .discriminator
            .map(|d| format!("{:04}", d.get()))
            .unwrap_or_else(|| "0".to_string());

        let mut incoming = IncomingMessage::new(
            "discord",
            &msg.channel_id.to_string(),
            &msg.author.id.to_string(),
            &msg.content,
        )
        .with_channel_name(&channel_name)
        .with_reporter(&msg.author.name, &discriminator)
        .with_permalink(&msg.link());

        for att in &msg.attachments {
            incoming = incoming.with_attachment(&att.filename, &att.url);
        }

        if self.tx.send(incoming).is_err() {
            tracing::info!("Discord listener channel closed");
        }
    }
}

#[async_trait]
impl Channel for DiscordChannel {
    fn name(&self) -> &str {
        "discord"
    }

    async fn start(&self) -> Result<MessageStream, ChannelError> {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();

        let intents = GatewayIntents::GUILDS
            | GatewayIntents::GUILD_MESSAGES
            | GatewayIntents::DIRECT_MESSAGES
            | GatewayIntents::MESSAGE_CONTENT;

        let mut client = Client::builder(self.token.expose_secret(), intents)
            .event_handler(ForwardHandler { tx })
            .await
            .map_err(|e| ChannelError::StartupFailed {
                name: "discord".into(),
                reason: e.to_string(),
            })?;

        tokio::spawn(async move {
            if let Err(e) = client.start().await {
                tracing::error!("Discord gateway error: {e}");
            }
        });

        Ok(Box::pin(UnboundedReceiverStream::new(rx)))
    }

    async fn respond(
        &self,
        msg: &IncomingMessage,
        response: OutgoingResponse,
    ) -> Result<(), ChannelError> {
        let channel_id: u64 = msg
            .channel_id
            .parse()
            .ok()
            .filter(|id| *id != 0)
            .ok_or_else(|| ChannelError::SendFailed {
                name: "discord".into(),
                reason: format!("Bad channel id: {}", msg.channel_id),
            })?;

        ChannelId::new(channel_id)
            .say(&self.http, response.content)
            .await
            .map_err(|e| ChannelError::SendFailed {
                name: "discord".into(),
                reason: e.to_string(),
            })?;
        Ok(())
    }
}
