use std::{
    collections::HashMap,
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;

use crate::{domain::Destination, errors::Error, gating::AllowList, Result};

/// Typed configuration for the relay.
///
/// Credentials and runtime knobs come from the environment (optionally via
/// `.env`); the channel routing comes from a JSON file.
#[derive(Clone, Debug)]
pub struct Config {
    // Credentials
    pub discord_token: String,
    pub telegram_bot_token: String,

    // Routing
    pub config_path: PathBuf,
    /// Where Discord calls are relayed. Must be a chat the Telegram bot can post to.
    pub discord_destination: Destination,
    pub target_channels: Vec<Destination>,
    pub telegram_allow_list: AllowList,
    pub discord_allow_list: AllowList,

    // Relay pacing
    pub relay_delay: Duration,

    // Lookup
    pub dexscreener_timeout: Duration,

    // Tracking maintenance
    pub tracking_ttl: Option<Duration>,
    pub eviction_interval: Duration,
}

/// On-disk routing file (`config.json`).
#[derive(Clone, Debug, Deserialize)]
pub struct RoutingFile {
    pub telegram: TelegramRouting,
    pub discord: DiscordRouting,
}

#[derive(Clone, Debug, Deserialize)]
pub struct TelegramRouting {
    /// Relay target for Discord calls. `bot_username` is accepted for older files.
    #[serde(alias = "bot_username")]
    pub discord_destination: String,
    #[serde(default)]
    pub target_channels: Vec<String>,
    /// Chats to listen to. Absent means every chat the bot sees.
    #[serde(default)]
    pub source_chats: Option<Vec<String>>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct DiscordRouting {
    pub server_channels: Vec<HashMap<String, Vec<String>>>,
}

impl RoutingFile {
    pub fn parse(json: &str) -> Result<Self> {
        let file: RoutingFile = serde_json::from_str(json)?;
        let dest = file.telegram.discord_destination.trim();
        if dest.is_empty() {
            return Err(Error::Config(
                "telegram.discord_destination must not be empty".to_string(),
            ));
        }
        if is_bot_username(dest) {
            return Err(Error::Config(format!(
                "telegram.discord_destination {dest} looks like a bot; \
                 the Bot API cannot message other bots, use a group or channel the bot can post to"
            )));
        }
        Ok(file)
    }

    pub fn read(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("cannot read config file {}: {e}", path.display()))
        })?;
        Self::parse(&raw)
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));

        let discord_token = required("DISCORD_TOKEN")?;
        let telegram_bot_token = required("TELEGRAM_BOT_TOKEN")?;

        let config_path =
            env_path("CARELAY_CONFIG").unwrap_or_else(|| PathBuf::from("config.json"));
        let routing = RoutingFile::read(&config_path)?;

        let mut cfg = Self::from_routing(routing, discord_token, telegram_bot_token);
        cfg.config_path = config_path;

        cfg.relay_delay = Duration::from_millis(env_u64("RELAY_DELAY_MS").unwrap_or(1000));
        cfg.dexscreener_timeout =
            Duration::from_millis(env_u64("DEXSCREENER_TIMEOUT_MS").unwrap_or(10_000));
        cfg.tracking_ttl = env_u64("TRACKING_TTL_SECS")
            .filter(|s| *s > 0)
            .map(Duration::from_secs);
        cfg.eviction_interval =
            Duration::from_secs(env_u64("EVICTION_INTERVAL_SECS").unwrap_or(300).max(1));

        Ok(cfg)
    }

    /// Build a config with default knobs from a parsed routing file.
    pub fn from_routing(
        routing: RoutingFile,
        discord_token: String,
        telegram_bot_token: String,
    ) -> Self {
        let telegram_allow_list = match routing.telegram.source_chats {
            Some(chats) => AllowList::chats(chats),
            None => AllowList::Open,
        };

        Self {
            discord_token,
            telegram_bot_token,
            config_path: PathBuf::from("config.json"),
            discord_destination: Destination::new(routing.telegram.discord_destination),
            target_channels: routing
                .telegram
                .target_channels
                .into_iter()
                .map(Destination::new)
                .collect(),
            telegram_allow_list,
            discord_allow_list: AllowList::ServerChannels(routing.discord.server_channels),
            relay_delay: Duration::from_millis(1000),
            dexscreener_timeout: Duration::from_secs(10),
            tracking_ttl: None,
            eviction_interval: Duration::from_secs(300),
        }
    }
}

/// Telegram requires bot usernames to end in "bot" (case-insensitive).
fn is_bot_username(dest: &str) -> bool {
    let name = dest.trim_start_matches('@');
    name.parse::<i64>().is_err() && name.to_ascii_lowercase().ends_with("bot")
}

fn required(key: &str) -> Result<String> {
    env_str(key)
        .and_then(non_empty)
        .ok_or_else(|| Error::Config(format!("{key} environment variable is required")))
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }
        if env::var_os(key).is_some() {
            continue; // do not override existing env
        }

        env::set_var(key, unquote(v.trim()));
    }
}

fn unquote(val: &str) -> &str {
    if val.len() >= 2
        && ((val.starts_with('"') && val.ends_with('"'))
            || (val.starts_with('\'') && val.ends_with('\'')))
    {
        &val[1..val.len() - 1]
    } else {
        val
    }
}

fn env_u64(key: &str) -> Option<u64> {
    env_str(key).and_then(|s| s.trim().parse::<u64>().ok())
}

fn env_path(key: &str) -> Option<PathBuf> {
    env::var_os(key).map(PathBuf::from)
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
