use async_trait::async_trait;

use crate::Result;

/// Resolves a DEX pair id to the base token's mint address.
///
/// `Ok(None)` means the service answered but knows no pair under that id.
/// Any transport or decoding problem is an `Err`.
#[async_trait]
pub trait PairLookup: Send + Sync {
    async fn base_token_address(&self, pair_id: &str) -> Result<Option<String>>;
}
