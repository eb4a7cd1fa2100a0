//! Discord adapter (serenity).
//!
//! Listens to guild messages and feeds them to the Discord inbound adapter,
//! which applies the server/channel allow-list before anything else.

use std::sync::Arc;

use serenity::{
    all::{Client, Context, EventHandler, GatewayIntents, Message, Ready},
    async_trait,
};
use tracing::info;

use carelay_core::{
    domain::{InboundEvent, SourcePlatform},
    inbound::InboundAdapter,
};

/// Required gateway intents.
pub fn intents() -> GatewayIntents {
    GatewayIntents::GUILDS | GatewayIntents::GUILD_MESSAGES | GatewayIntents::MESSAGE_CONTENT
}

pub fn event_from_parts(
    guild_id: Option<u64>,
    channel_id: u64,
    content: &str,
) -> Option<InboundEvent> {
    if content.trim().is_empty() {
        return None;
    }
    Some(InboundEvent {
        platform: SourcePlatform::Discord,
        container_id: guild_id.map(|g| g.to_string()),
        channel_id: channel_id.to_string(),
        text: content.to_string(),
    })
}

pub struct DiscordListener {
    adapter: Arc<InboundAdapter>,
}

impl DiscordListener {
    pub fn new(adapter: Arc<InboundAdapter>) -> Self {
        Self { adapter }
    }
}

#[async_trait]
impl EventHandler for DiscordListener {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!(
            user = %ready.user.name,
            guilds = ready.guilds.len(),
            "discord listener ready"
        );
    }

    async fn message(&self, _ctx: Context, msg: Message) {
        // Bot authors are relayed too: call channels are often fed by bots.
        let Some(event) = event_from_parts(
            msg.guild_id.map(|g| g.get()),
            msg.channel_id.get(),
            &msg.content,
        ) else {
            return;
        };
        self.adapter.process(event).await;
    }
}

/// Connect to the gateway and run until the shard manager stops.
pub async fn run(token: &str, adapter: Arc<InboundAdapter>) -> anyhow::Result<()> {
    let mut client = Client::builder(token, intents())
        .event_handler(DiscordListener::new(adapter))
        .await?;
    client.start().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guild_message_carries_server_and_channel() {
        let ev = event_from_parts(Some(111), 222, "CA below").unwrap();
        assert_eq!(ev.platform, SourcePlatform::Discord);
        assert_eq!(ev.container_id.as_deref(), Some("111"));
        assert_eq!(ev.channel_id, "222");
    }

    #[test]
    fn direct_message_has_no_server() {
        let ev = event_from_parts(None, 5, "hi").unwrap();
        assert!(ev.container_id.is_none());
    }

    #[test]
    fn empty_content_is_dropped() {
        assert!(event_from_parts(Some(1), 2, "  ").is_none());
    }

    #[test]
    fn intents_include_message_content() {
        assert!(intents().contains(GatewayIntents::MESSAGE_CONTENT));
    }
}
