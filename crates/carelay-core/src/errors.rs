/// Core error type for the relay.
///
/// Adapter crates map their client-specific errors into this type so the
/// pipeline can decide what is recoverable (lookup, send) and what is fatal
/// (config at startup).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("pair lookup failed: {0}")]
    Lookup(String),

    #[error("send failed: {0}")]
    Send(String),

    #[error("external error: {0}")]
    External(String),
}

pub type Result<T> = std::result::Result<T, Error>;
