use teloxide::types::Message;

use carelay_core::domain::{InboundEvent, SourcePlatform};

/// Text body of a message: the text itself, or the caption of a media post.
pub fn message_body<'a>(text: Option<&'a str>, caption: Option<&'a str>) -> Option<&'a str> {
    text.or(caption).filter(|s| !s.trim().is_empty())
}

pub fn event_from_parts(chat_id: i64, body: &str) -> InboundEvent {
    InboundEvent {
        platform: SourcePlatform::Telegram,
        container_id: None,
        channel_id: chat_id.to_string(),
        text: body.to_string(),
    }
}

pub fn inbound_event(msg: &Message) -> Option<InboundEvent> {
    let body = message_body(msg.text(), msg.caption())?;
    Some(event_from_parts(msg.chat.id.0, body))
}
