use std::fmt;

/// Chat platform an inbound event came from.
///
/// Each platform gets its own tracking namespace.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SourcePlatform {
    Discord,
    Telegram,
}

impl fmt::Display for SourcePlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourcePlatform::Discord => f.write_str("discord"),
            SourcePlatform::Telegram => f.write_str("telegram"),
        }
    }
}

/// Outbound chat target: a numeric chat id (`-100…`) or a public `@username`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Destination(pub String);

impl Destination {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A message delivered by a source platform.
#[derive(Clone, Debug)]
pub struct InboundEvent {
    pub platform: SourcePlatform,
    /// Discord guild id. `None` for Telegram and Discord DMs.
    pub container_id: Option<String>,
    pub channel_id: String,
    pub text: String,
}
