//! Outbound messaging abstractions.

pub mod port;
