//! DexScreener adapter (pair → base token resolution).
//!
//! Uses the public `latest/dex/pairs/solana/{pairId}` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use carelay_core::{errors::Error, ports::PairLookup, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.dexscreener.com/latest/dex/pairs/solana";

#[derive(Debug, Deserialize)]
struct PairsResponse {
    #[serde(default)]
    pairs: Option<Vec<Pair>>,
}

#[derive(Debug, Deserialize)]
struct Pair {
    #[serde(rename = "baseToken")]
    base_token: BaseToken,
}

#[derive(Debug, Deserialize)]
struct BaseToken {
    address: String,
}

/// Base token address of the first pair in a response body.
///
/// `pairs` missing, `null` or empty is `Ok(None)`; a first pair without
/// `baseToken.address` is an error.
pub fn parse_pairs_body(body: &str) -> Result<Option<String>> {
    let resp: PairsResponse = serde_json::from_str(body)
        .map_err(|e| Error::Lookup(format!("dexscreener json error: {e}")))?;
    Ok(resp
        .pairs
        .and_then(|pairs| pairs.into_iter().next())
        .map(|p| p.base_token.address))
}

#[derive(Clone, Debug)]
pub struct DexScreenerClient {
    base_url: String,
    http: reqwest::Client,
}

impl DexScreenerClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL, timeout)
    }

    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::External(format!("reqwest client build: {e}")))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    fn pair_url(&self, pair_id: &str) -> String {
        format!("{}/{pair_id}", self.base_url)
    }
}

#[async_trait]
impl PairLookup for DexScreenerClient {
    async fn base_token_address(&self, pair_id: &str) -> Result<Option<String>> {
        let resp = self
            .http
            .get(self.pair_url(pair_id))
            .send()
            .await
            .map_err(|e| Error::Lookup(format!("dexscreener request error: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Lookup(format!(
                "dexscreener returned {status} {}",
                body.chars().take(200).collect::<String>()
            )));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| Error::Lookup(format!("dexscreener body error: {e}")))?;

        let address = parse_pairs_body(&body)?;
        tracing::debug!(%pair_id, resolved = ?address, "dexscreener lookup");
        Ok(address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn first_pair_base_token_is_returned() {
        let body = json!({
            "schemaVersion": "1.0.0",
            "pairs": [
                {
                    "chainId": "solana",
                    "pairAddress": "5wNu5QhdpRGrL37ffcd6TMMqZugQgxwafgz477rShtHy",
                    "baseToken": { "address": "DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263", "symbol": "Bonk" },
                    "quoteToken": { "address": "So11111111111111111111111111111111111111112", "symbol": "SOL" }
                },
                {
                    "baseToken": { "address": "second" }
                }
            ]
        })
        .to_string();

        assert_eq!(
            parse_pairs_body(&body).unwrap().as_deref(),
            Some("DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263")
        );
    }

    #[test]
    fn null_or_empty_pairs_is_none() {
        assert_eq!(parse_pairs_body(r#"{"pairs": null}"#).unwrap(), None);
        assert_eq!(parse_pairs_body(r#"{"pairs": []}"#).unwrap(), None);
        assert_eq!(parse_pairs_body(r#"{"schemaVersion": "1.0.0"}"#).unwrap(), None);
    }

    #[test]
    fn malformed_body_is_lookup_error() {
        assert!(matches!(parse_pairs_body("<html>"), Err(Error::Lookup(_))));
        assert!(matches!(
            parse_pairs_body(r#"{"pairs": [{"baseToken": {}}]}"#),
            Err(Error::Lookup(_))
        ));
    }

    #[test]
    fn pair_url_joins_without_double_slash() {
        let c =
            DexScreenerClient::with_base_url("http://localhost:9/pairs/", Duration::from_secs(1))
                .unwrap();
        assert_eq!(c.pair_url("abc"), "http://localhost:9/pairs/abc");
    }

    #[tokio::test]
    async fn unreachable_service_is_lookup_error() {
        let c = DexScreenerClient::with_base_url("http://127.0.0.1:9", Duration::from_millis(500))
            .unwrap();
        let err = c.base_token_address("abc").await.unwrap_err();
        assert!(matches!(err, Error::Lookup(_)));
    }
}
