use async_trait::async_trait;

use crate::{domain::Destination, Result};

/// Outbound messaging port.
///
/// Telegram is the only implementation today; the relay only ever sends the
/// bare address as plain text, so the port stays that narrow.
#[async_trait]
pub trait MessagingPort: Send + Sync {
    async fn send_text(&self, destination: &Destination, text: &str) -> Result<()>;
}
