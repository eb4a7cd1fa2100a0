//! Core detection-and-relay pipeline.
//!
//! This crate is intentionally transport-agnostic. Telegram, Discord and the
//! DexScreener API live behind ports (traits) implemented in adapter crates.

pub mod config;
pub mod dispatch;
pub mod domain;
pub mod errors;
pub mod extract;
pub mod gating;
pub mod inbound;
pub mod logging;
pub mod messaging;
pub mod ports;
pub mod store;

pub use errors::{Error, Result};
