//! # REST Quote Provider
//!
//! Primary market-price source over HTTP.
//!
//! Fetches a ticker-style JSON quote (`{"price": "650.25000000"}`) and
//! scales it to an integer price without going through floating point.
//! A local rate limiter keeps bursts from tripping the feed's own
//! limits; the converter's TTL cache absorbs the rejected calls.

use crate::application::services::conversion::{
    NativeQuoteProvider, OracleError, OracleResult,
};
use crate::domain::value_objects::NativeQuote;
use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::num::NonZeroU32;
use std::str::FromStr;

const SOURCE: &str = "rest";

/// Requests allowed per minute against the quote endpoint.
const DEFAULT_REQUESTS_PER_MINUTE: u32 = 30;

#[derive(Debug, Deserialize)]
struct TickerResponse {
    price: String,
}

/// Quote provider backed by a REST market-price feed.
pub struct RestQuoteProvider {
    client: reqwest::Client,
    url: String,
    decimals: u8,
    limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
}

impl RestQuoteProvider {
    /// Creates a provider for the given quote endpoint.
    ///
    /// # Arguments
    ///
    /// * `url` - Endpoint returning `{"price": "<decimal string>"}`
    /// * `decimals` - Decimals to scale the price to
    #[must_use]
    pub fn new(url: impl Into<String>, decimals: u8) -> Self {
        Self::with_rate_limit(url, decimals, DEFAULT_REQUESTS_PER_MINUTE)
    }

    /// Creates a provider with a custom per-minute rate limit.
    ///
    /// A zero limit is clamped to one request per minute.
    #[must_use]
    pub fn with_rate_limit(
        url: impl Into<String>,
        decimals: u8,
        requests_per_minute: u32,
    ) -> Self {
        let per_minute = NonZeroU32::new(requests_per_minute).unwrap_or(NonZeroU32::MIN);
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            decimals,
            limiter: RateLimiter::direct(Quota::per_minute(per_minute)),
        }
    }

    fn scale_price(&self, raw: &str) -> OracleResult<NativeQuote> {
        let price = Decimal::from_str(raw.trim())
            .map_err(|e| OracleError::unavailable(SOURCE, format!("bad price {raw:?}: {e}")))?;
        let scale = Decimal::from(10u64.pow(u32::from(self.decimals)));
        let scaled = (price * scale).trunc();
        let integer = scaled
            .to_u128()
            .ok_or_else(|| OracleError::unavailable(SOURCE, format!("price out of range: {raw}")))?;
        Ok(NativeQuote::new(integer, self.decimals)?)
    }
}

#[async_trait]
impl NativeQuoteProvider for RestQuoteProvider {
    async fn get_quote(&self) -> OracleResult<NativeQuote> {
        if self.limiter.check().is_err() {
            return Err(OracleError::unavailable(SOURCE, "local rate limit exceeded"));
        }

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| OracleError::unavailable(SOURCE, e.to_string()))?;

        if !response.status().is_success() {
            return Err(OracleError::unavailable(
                SOURCE,
                format!("http status {}", response.status()),
            ));
        }

        let ticker: TickerResponse = response
            .json()
            .await
            .map_err(|e| OracleError::unavailable(SOURCE, e.to_string()))?;

        self.scale_price(&ticker.price)
    }

    fn source_name(&self) -> &'static str {
        SOURCE
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn server_with(body: serde_json::Value) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/price"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn parses_and_scales_price() {
        let server = server_with(serde_json::json!({
            "symbol": "BNBUSDT",
            "price": "650.00000000"
        }))
        .await;
        let provider = RestQuoteProvider::new(format!("{}/price", server.uri()), 8);

        let quote = provider.get_quote().await.unwrap();
        assert_eq!(quote.price(), 65_000_000_000);
        assert_eq!(quote.decimals(), 8);
    }

    #[tokio::test]
    async fn truncates_excess_precision() {
        let server = server_with(serde_json::json!({"price": "650.123456789999"})).await;
        let provider = RestQuoteProvider::new(format!("{}/price", server.uri()), 8);

        let quote = provider.get_quote().await.unwrap();
        assert_eq!(quote.price(), 65_012_345_678);
    }

    #[tokio::test]
    async fn zero_price_is_rejected() {
        let server = server_with(serde_json::json!({"price": "0.00000000"})).await;
        let provider = RestQuoteProvider::new(format!("{}/price", server.uri()), 8);

        let result = provider.get_quote().await;
        assert!(matches!(result, Err(ref e) if e.is_zero_price()));
    }

    #[tokio::test]
    async fn garbage_price_is_unavailable() {
        let server = server_with(serde_json::json!({"price": "not-a-number"})).await;
        let provider = RestQuoteProvider::new(format!("{}/price", server.uri()), 8);

        let result = provider.get_quote().await;
        assert!(matches!(result, Err(OracleError::Unavailable { .. })));
    }

    #[tokio::test]
    async fn http_error_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/price"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;
        let provider = RestQuoteProvider::new(format!("{}/price", server.uri()), 8);

        let result = provider.get_quote().await;
        assert!(matches!(result, Err(OracleError::Unavailable { .. })));
    }

    #[tokio::test]
    async fn local_rate_limit_trips() {
        let server = server_with(serde_json::json!({"price": "650.0"})).await;
        let provider =
            RestQuoteProvider::with_rate_limit(format!("{}/price", server.uri()), 8, 1);

        provider.get_quote().await.unwrap();
        let result = provider.get_quote().await;
        assert!(matches!(result, Err(OracleError::Unavailable { .. })));
    }
}
