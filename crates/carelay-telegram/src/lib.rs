//! Telegram adapter (teloxide).
//!
//! Implements the `carelay-core` MessagingPort over the Telegram Bot API and
//! feeds chat messages / channel posts into the Telegram inbound adapter.

use async_trait::async_trait;

use teloxide::{prelude::*, types::Recipient};

use tokio::time::sleep;

pub mod handlers;
pub mod router;

use carelay_core::{domain::Destination, errors::Error, messaging::port::MessagingPort, Result};

#[derive(Clone)]
pub struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    pub fn bot(&self) -> Bot {
        self.bot.clone()
    }

    fn map_err(e: teloxide::RequestError) -> Error {
        Error::Send(format!("telegram error: {e}"))
    }

    async fn with_retry<T, Fut>(&self, mut op: impl FnMut() -> Fut) -> Result<T>
    where
        Fut: std::future::IntoFuture<Output = std::result::Result<T, teloxide::RequestError>>,
        Fut::IntoFuture: Send,
    {
        const MAX_RETRIES: usize = 1;
        let mut attempts = 0usize;
        loop {
            match op().await {
                Ok(v) => return Ok(v),
                Err(e) => match e {
                    teloxide::RequestError::RetryAfter(d) if attempts < MAX_RETRIES => {
                        attempts += 1;
                        sleep(d).await;
                        continue;
                    }
                    other => return Err(Self::map_err(other)),
                },
            }
        }
    }
}

/// Numeric ids address a chat directly; anything else is a public username.
pub fn recipient_for(destination: &Destination) -> Recipient {
    let raw = destination.as_str().trim();
    match raw.parse::<i64>() {
        Ok(id) => Recipient::Id(teloxide::types::ChatId(id)),
        Err(_) if raw.starts_with('@') => Recipient::ChannelUsername(raw.to_string()),
        Err(_) => Recipient::ChannelUsername(format!("@{raw}")),
    }
}

#[async_trait]
impl MessagingPort for TelegramMessenger {
    async fn send_text(&self, destination: &Destination, text: &str) -> Result<()> {
        let recipient = recipient_for(destination);
        self.with_retry(|| self.bot.send_message(recipient.clone(), text.to_string()))
            .await?;
        Ok(())
    }
}
