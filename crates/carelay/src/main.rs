use std::{sync::Arc, time::Duration};

use carelay_core::{
    config::Config,
    dispatch::RelayDispatcher,
    domain::SourcePlatform,
    extract::AddressExtractor,
    inbound::InboundAdapter,
    messaging::port::MessagingPort,
    store::TrackedAddressStore,
    Error,
};
use carelay_dexscreener::DexScreenerClient;
use carelay_telegram::TelegramMessenger;

#[tokio::main]
async fn main() -> Result<(), Error> {
    carelay_core::logging::init("carelay")?;

    let cfg = Config::load()?;
    tracing::info!(
        config = %cfg.config_path.display(),
        targets = cfg.target_channels.len(),
        "starting relay"
    );

    let lookup = Arc::new(DexScreenerClient::new(cfg.dexscreener_timeout)?);
    let extractor = AddressExtractor::new(lookup);

    let bot = teloxide::Bot::new(cfg.telegram_bot_token.clone());
    let messenger: Arc<dyn MessagingPort> = Arc::new(TelegramMessenger::new(bot.clone()));
    let dispatcher = RelayDispatcher::with_delay(messenger, cfg.relay_delay);

    let discord_store = Arc::new(TrackedAddressStore::new(SourcePlatform::Discord));
    let telegram_store = Arc::new(TrackedAddressStore::new(SourcePlatform::Telegram));

    // Discord calls go to one relay chat; Telegram calls fan out to the target channels.
    let discord = Arc::new(InboundAdapter::new(
        SourcePlatform::Discord,
        cfg.discord_allow_list.clone(),
        vec![cfg.discord_destination.clone()],
        extractor.clone(),
        dispatcher.clone(),
        discord_store.clone(),
    ));
    let telegram = Arc::new(InboundAdapter::new(
        SourcePlatform::Telegram,
        cfg.telegram_allow_list.clone(),
        cfg.target_channels.clone(),
        extractor,
        dispatcher,
        telegram_store.clone(),
    ));

    if let Some(ttl) = cfg.tracking_ttl {
        spawn_eviction(
            vec![discord_store, telegram_store],
            ttl,
            cfg.eviction_interval,
        );
    }

    tokio::select! {
        res = carelay_discord::run(&cfg.discord_token, discord) => {
            res.map_err(|e| Error::External(format!("discord client failed: {e}")))?;
        }
        res = carelay_telegram::router::run_polling(bot, telegram) => {
            res.map_err(|e| Error::External(format!("telegram bot failed: {e}")))?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutting down");
        }
    }

    Ok(())
}

fn spawn_eviction(stores: Vec<Arc<TrackedAddressStore>>, ttl: Duration, every: Duration) {
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(every);
        loop {
            tick.tick().await;
            for store in &stores {
                let removed = store.evict_older_than(ttl);
                if removed > 0 {
                    tracing::info!(
                        platform = %store.platform(),
                        removed,
                        "evicted tracked addresses"
                    );
                }
            }
        }
    });
}
