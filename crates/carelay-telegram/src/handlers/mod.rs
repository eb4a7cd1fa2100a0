//! Telegram update handlers.
//!
//! Group/private messages and channel posts go through the same path: build an
//! `InboundEvent` and hand it to the Telegram inbound adapter. Failures are
//! logged by the adapter and never surface to the dispatcher.

use std::sync::Arc;

use teloxide::{prelude::*, types::Message};

use carelay_core::inbound::InboundAdapter;

mod text;

pub use text::{event_from_parts, inbound_event, message_body};

pub async fn handle_message(msg: Message, adapter: Arc<InboundAdapter>) -> ResponseResult<()> {
    let Some(event) = inbound_event(&msg) else {
        return Ok(());
    };
    adapter.process(event).await;
    Ok(())
}

pub async fn handle_channel_post(
    msg: Message,
    adapter: Arc<InboundAdapter>,
) -> ResponseResult<()> {
    handle_message(msg, adapter).await
}
