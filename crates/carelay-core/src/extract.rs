//! Solana token address detection in free-form chat text.

use std::sync::{Arc, OnceLock};

use regex::Regex;

use crate::ports::PairLookup;

/// Base-58 alphabet (no `0`, `I`, `O`, `l`), 32 to 44 characters.
pub const ADDRESS_PATTERN: &str = "[1-9A-HJ-NP-Za-km-z]{32,44}";

fn address_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(ADDRESS_PATTERN).expect("valid regex"))
}

fn dexscreener_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(r"dexscreener\.com/solana/({ADDRESS_PATTERN})")).expect("valid regex")
    })
}

/// Every address-shaped substring of `text`, in order of appearance,
/// duplicates included.
pub fn scan_addresses(text: &str) -> Vec<String> {
    address_re()
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Pair id from the first `dexscreener.com/solana/<pair>` link in `text`.
pub fn dexscreener_pair_id(text: &str) -> Option<&str> {
    dexscreener_re()
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

#[derive(Clone)]
pub struct AddressExtractor {
    lookup: Arc<dyn PairLookup>,
}

impl AddressExtractor {
    pub fn new(lookup: Arc<dyn PairLookup>) -> Self {
        Self { lookup }
    }

    /// Candidate token addresses mentioned in `text`.
    ///
    /// A DexScreener link is resolved to its base token. When that resolves,
    /// only the resolved address is returned: the link's pair id would
    /// otherwise be picked up by the generic scan and relayed as if it were a
    /// token. If the lookup fails the pair id is returned alone. If the
    /// service knows no such pair, the generic scan runs over the whole text.
    pub async fn extract(&self, text: &str) -> Vec<String> {
        if let Some(pair_id) = dexscreener_pair_id(text) {
            match self.lookup.base_token_address(pair_id).await {
                Ok(Some(address)) => {
                    tracing::debug!(%pair_id, %address, "resolved dexscreener pair");
                    return vec![address];
                }
                Ok(None) => {
                    tracing::debug!(%pair_id, "dexscreener returned no pairs");
                }
                Err(e) => {
                    tracing::warn!(
                        %pair_id,
                        error = %e,
                        "dexscreener lookup failed, using pair id"
                    );
                    return vec![pair_id.to_string()];
                }
            }
        }

        scan_addresses(text)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::{errors::Error, ports::PairLookup, Result};

    pub enum LookupReply {
        Resolved(String),
        Empty,
        Fail,
    }

    pub struct FakeLookup {
        reply: LookupReply,
        calls: Mutex<Vec<String>>,
    }

    impl FakeLookup {
        pub fn new(reply: LookupReply) -> Self {
            Self {
                reply,
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PairLookup for FakeLookup {
        async fn base_token_address(&self, pair_id: &str) -> Result<Option<String>> {
            self.calls.lock().unwrap().push(pair_id.to_string());
            match &self.reply {
                LookupReply::Resolved(a) => Ok(Some(a.clone())),
                LookupReply::Empty => Ok(None),
                LookupReply::Fail => Err(Error::Lookup("connection refused".to_string())),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{FakeLookup, LookupReply};
    use super::*;

    const PAIR: &str = "5wNu5QhdpRGrL37ffcd6TMMqZugQgxwafgz477rShtHy";
    const TOKEN: &str = "DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263";
    const OTHER: &str = "So11111111111111111111111111111111111111112";

    fn extractor(reply: LookupReply) -> (AddressExtractor, Arc<FakeLookup>) {
        let lookup = Arc::new(FakeLookup::new(reply));
        (AddressExtractor::new(lookup.clone()), lookup)
    }

    #[tokio::test]
    async fn empty_text_yields_nothing() {
        let (ex, lookup) = extractor(LookupReply::Fail);
        assert!(ex.extract("").await.is_empty());
        assert!(lookup.calls().is_empty());
    }

    #[tokio::test]
    async fn text_without_addresses_yields_nothing() {
        let (ex, _) = extractor(LookupReply::Fail);
        let out = ex
            .extract("gm frens, 0OIl0OIl0OIl0OIl0OIl0OIl0OIl0OIl0OIl is not base58")
            .await;
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn short_runs_are_not_addresses() {
        let (ex, _) = extractor(LookupReply::Fail);
        let short = "a".repeat(31);
        assert!(ex.extract(&short).await.is_empty());
    }

    #[tokio::test]
    async fn generic_scan_keeps_order_and_duplicates() {
        let (ex, lookup) = extractor(LookupReply::Fail);
        let text = format!("{TOKEN} foo {OTHER} {TOKEN}");
        let out = ex.extract(&text).await;
        assert_eq!(out, vec![TOKEN, OTHER, TOKEN]);
        assert!(lookup.calls().is_empty());
    }

    #[tokio::test]
    async fn resolved_link_short_circuits_generic_scan() {
        let (ex, lookup) = extractor(LookupReply::Resolved(TOKEN.to_string()));
        let text = format!("ape https://dexscreener.com/solana/{PAIR} also {OTHER}");
        let out = ex.extract(&text).await;
        assert_eq!(out, vec![TOKEN]);
        assert_eq!(lookup.calls(), vec![PAIR.to_string()]);
    }

    #[tokio::test]
    async fn failed_lookup_falls_back_to_pair_id() {
        let (ex, _) = extractor(LookupReply::Fail);
        let text = format!("check https://dexscreener.com/solana/{PAIR} token {OTHER}");
        let out = ex.extract(&text).await;
        assert_eq!(out, vec![PAIR]);
    }

    #[tokio::test]
    async fn empty_lookup_falls_through_to_generic_scan() {
        let (ex, _) = extractor(LookupReply::Empty);
        let text = format!("https://dexscreener.com/solana/{PAIR} and {OTHER}");
        let out = ex.extract(&text).await;
        assert_eq!(out, vec![PAIR, OTHER]);
    }

    #[test]
    fn pair_id_requires_solana_path() {
        assert_eq!(
            dexscreener_pair_id(&format!("dexscreener.com/solana/{PAIR}")),
            Some(PAIR)
        );
        assert_eq!(
            dexscreener_pair_id(&format!("dexscreener.com/ethereum/{PAIR}")),
            None
        );
    }

    #[test]
    fn long_runs_split_into_non_overlapping_matches() {
        let run = "A".repeat(50);
        let out = scan_addresses(&run);
        assert_eq!(out, vec!["A".repeat(44)]);
    }
}
