//! Message dispatch: commands first, then the conversation engine.

use std::pin::Pin;
use std::sync::Arc;

use futures::{Stream, StreamExt};

use crate::channels::{Channel, IncomingMessage, OutgoingResponse};
use crate::commands;
use crate::conversation::ConversationEngine;
use crate::error::Result;
use crate::store::BindingStore;

/// The bot core: command interpreter + conversation engine over shared
/// stores. One instance serves all channels.
pub struct Bot {
    bindings: Arc<dyn BindingStore>,
    engine: ConversationEngine,
}

impl Bot {
    pub fn new(bindings: Arc<dyn BindingStore>, engine: ConversationEngine) -> Self {
        Self { bindings, engine }
    }

    /// Handle one inbound message and produce the reply text.
    ///
    /// Commands (including malformed ones with a reserved leading token)
    /// short-circuit conversation dispatch entirely.
    pub async fn handle(&self, msg: &IncomingMessage) -> String {
        if let Some(cmd) = commands::parse(&msg.text) {
            return commands::execute(cmd, &msg.channel_id, &msg.channel_name, self.bindings.as_ref())
                .await;
        }
        self.engine.handle(msg).await
    }
}

type TaggedStream = Pin<Box<dyn Stream<Item = (Arc<dyn Channel>, IncomingMessage)> + Send>>;

/// Run the bot over a set of channels until all inbound streams end.
///
/// Each message is handled in its own spawned task; handlers interleave only
/// at await points. Nothing a handler does can propagate a panic-free error
/// back into this loop.
pub async fn run(bot: Arc<Bot>, channels: Vec<Arc<dyn Channel>>) -> Result<()> {
    let mut streams: Vec<TaggedStream> = Vec::with_capacity(channels.len());
    for channel in channels {
        let stream = channel.start().await?;
        tracing::info!(channel = channel.name(), "Channel started");
        let tag = Arc::clone(&channel);
        streams.push(Box::pin(stream.map(move |msg| (Arc::clone(&tag), msg))));
    }

    let mut inbound = futures::stream::select_all(streams);
    while let Some((channel, msg)) = inbound.next().await {
        let bot = Arc::clone(&bot);
        tokio::spawn(async move {
            let reply = bot.handle(&msg).await;
            if let Err(e) = channel.respond(&msg, OutgoingResponse::new(reply)).await {
                tracing::warn!(channel = channel.name(), "Failed to deliver reply: {e}");
            }
        });
    }

    tracing::info!("All channel streams ended; shutting down");
    Ok(())
}
