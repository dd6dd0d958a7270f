//! Channel abstraction for message I/O.
//!
//! A channel is an inbound event source plus an outbound reply sink. The bot
//! core is platform-agnostic; Discord and a local CLI REPL are the two
//! adapters shipped here.

pub mod cli;
pub mod discord;

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;

use crate::error::ChannelError;

pub use cli::CliChannel;
pub use discord::DiscordChannel;

/// Who sent a message.
#[derive(Debug, Clone, Default)]
pub struct Reporter {
    pub user_id: String,
    pub username: String,
    /// Platform discriminator/tag; `0` when the platform has none.
    pub discriminator: String,
}

/// A file attached to an inbound message, resolved to a fetchable URL.
#[derive(Debug, Clone)]
pub struct IncomingAttachment {
    pub file_name: String,
    pub url: String,
}

/// A message received from a channel.
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    /// Adapter name (e.g. "discord", "cli").
    pub channel: String,
    /// Platform channel identifier — the key for channel bindings.
    pub channel_id: String,
    /// Human-readable channel name, for replies and task descriptions.
    pub channel_name: String,
    pub reporter: Reporter,
    pub text: String,
    pub attachments: Vec<IncomingAttachment>,
    /// Permanent link to the message, when the platform has one.
    pub permalink: Option<String>,
}

impl IncomingMessage {
    pub fn new(channel: &str, channel_id: &str, user_id: &str, text: &str) -> Self {
        Self {
            channel: channel.to_string(),
            channel_id: channel_id.to_string(),
            channel_name: channel_id.to_string(),
            reporter: Reporter {
                user_id: user_id.to_string(),
                username: user_id.to_string(),
                discriminator: "0".to_string(),
            },
            text: text.to_string(),
            attachments: Vec::new(),
            permalink: None,
        }
    }

    pub fn with_channel_name(mut self, name: &str) -> Self {
        self.channel_name = name.to_string();
        self
    }

    pub fn with_reporter(mut self, username: &str, discriminator: &str) -> Self {
        self.reporter.username = username.to_string();
        self.reporter.discriminator = discriminator.to_string();
        self
    }

    pub fn with_attachment(mut self, file_name: &str, url: &str) -> Self {
        self.attachments.push(IncomingAttachment {
            file_name: file_name.to_string(),
            url: url.to_string(),
        });
        self
    }

    pub fn with_permalink(mut self, permalink: &str) -> Self {
        self.permalink = Some(permalink.to_string());
        self
    }
}

/// A reply to send back on the originating channel.
#[derive(Debug, Clone)]
pub struct OutgoingResponse {
    pub content: String,
}

impl OutgoingResponse {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// Stream of inbound messages produced by a started channel.
pub type MessageStream = Pin<Box<dyn Stream<Item = IncomingMessage> + Send>>;

/// A chat platform adapter.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Unique adapter name.
    fn name(&self) -> &str;

    /// Start the adapter and return its inbound message stream.
    async fn start(&self) -> Result<MessageStream, ChannelError>;

    /// Send a reply to the channel a message arrived on.
    async fn respond(
        &self,
        msg: &IncomingMessage,
        response: OutgoingResponse,
    ) -> Result<(), ChannelError>;

    /// Graceful shutdown.
    async fn shutdown(&self) -> Result<(), ChannelError> {
        Ok(())
    }
}
