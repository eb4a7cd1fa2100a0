use std::sync::Arc;

use teloxide::{dispatching::Dispatcher, dptree, prelude::*};

use carelay_core::inbound::InboundAdapter;

use crate::handlers;

/// Long-poll Telegram and feed every text-bearing update to `adapter`.
///
/// Only returns when the dispatcher shuts down. A failing `getMe` means the
/// token is unusable and is reported as a startup error.
pub async fn run_polling(bot: Bot, adapter: Arc<InboundAdapter>) -> anyhow::Result<()> {
    let me = bot.get_me().await?;
    tracing::info!(bot = %me.username(), "telegram listener started");

    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(handlers::handle_message))
        .branch(Update::filter_channel_post().endpoint(handlers::handle_channel_post));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![adapter])
        .build()
        .dispatch()
        .await;

    Ok(())
}
