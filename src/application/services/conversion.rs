//! # Fiat Conversion Service
//!
//! Quote acquisition with fallback and the fiat ⇄ native converter.
//!
//! This module provides:
//! - [`NativeQuoteProvider`]: Async trait for obtaining native-asset quotes
//! - [`FallbackQuoteProvider`]: Primary source with a single fallback retry
//! - [`QuoteCache`]: Explicit TTL cache, constructed once and injected
//! - [`FiatConverter`]: Converts fiat amounts to ledger-native units
//!
//! # Fallback Chain
//!
//! ```text
//! REST market feed → on-chain aggregator feed
//! ```
//!
//! The fallback is consulted exactly once, and only when the primary
//! errors or returns a non-positive price. If both fail the operation
//! aborts: a default price is never substituted into a real
//! transaction.

use crate::domain::value_objects::money::{ConversionError, FiatAmount, NativeAmount, NativeQuote};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Error type for quote acquisition and conversion.
#[derive(Debug, Error)]
pub enum OracleError {
    /// A quote source failed or returned an unusable price.
    #[error("quote source {source_name} unavailable: {message}")]
    Unavailable {
        /// Which source failed.
        source_name: &'static str,
        /// Underlying failure.
        message: String,
    },

    /// Both the primary and the fallback source failed.
    #[error("all quote sources failed (primary: {primary}; fallback: {fallback})")]
    Exhausted {
        /// Primary failure.
        primary: String,
        /// Fallback failure.
        fallback: String,
    },

    /// Conversion arithmetic rejected the quote or amount.
    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

impl OracleError {
    /// Creates an unavailable error for a named source.
    #[must_use]
    pub fn unavailable(source: &'static str, message: impl Into<String>) -> Self {
        Self::Unavailable {
            source_name: source,
            message: message.into(),
        }
    }

    /// Returns true if this is the zero-price guard.
    #[must_use]
    pub fn is_zero_price(&self) -> bool {
        matches!(self, Self::Conversion(ConversionError::ZeroPrice))
    }
}

/// Result type for oracle operations.
pub type OracleResult<T> = Result<T, OracleError>;

/// Trait for obtaining a quote of the native asset in fiat.
///
/// Implementors fetch from a specific source (REST market feed,
/// on-chain aggregator). A non-positive price must be reported as an
/// error, never returned as a quote.
#[async_trait]
pub trait NativeQuoteProvider: Send + Sync {
    /// Returns the current quote.
    ///
    /// # Errors
    ///
    /// Returns an error if the source is unreachable or served an
    /// unusable price.
    async fn get_quote(&self) -> OracleResult<NativeQuote>;

    /// Returns the name of this source, for logging.
    fn source_name(&self) -> &'static str;
}

/// A quote provider that falls back to a secondary source.
///
/// The fallback is tried exactly once, only after the primary fails.
pub struct FallbackQuoteProvider {
    primary: Arc<dyn NativeQuoteProvider>,
    fallback: Arc<dyn NativeQuoteProvider>,
}

impl FallbackQuoteProvider {
    /// Creates a fallback chain from primary and fallback sources.
    #[must_use]
    pub fn new(
        primary: Arc<dyn NativeQuoteProvider>,
        fallback: Arc<dyn NativeQuoteProvider>,
    ) -> Self {
        Self { primary, fallback }
    }
}

#[async_trait]
impl NativeQuoteProvider for FallbackQuoteProvider {
    async fn get_quote(&self) -> OracleResult<NativeQuote> {
        let primary_err = match self.primary.get_quote().await {
            Ok(quote) => return Ok(quote),
            Err(e) => {
                tracing::warn!(
                    source = self.primary.source_name(),
                    error = %e,
                    "primary quote source failed, trying fallback"
                );
                e
            }
        };

        match self.fallback.get_quote().await {
            Ok(quote) => Ok(quote),
            Err(fallback_err) => Err(OracleError::Exhausted {
                primary: primary_err.to_string(),
                fallback: fallback_err.to_string(),
            }),
        }
    }

    fn source_name(&self) -> &'static str {
        "fallback-chain"
    }
}

/// Explicit TTL cache for the last successful quote.
///
/// Constructed once per process and injected into the converter; a
/// slightly stale price within the TTL window is acceptable by
/// contract, and the cache keeps bursty operations from hammering a
/// rate-limited feed.
#[derive(Debug)]
pub struct QuoteCache {
    ttl: Duration,
    slot: Mutex<Option<(Instant, NativeQuote)>>,
}

impl QuoteCache {
    /// Creates a cache with the given TTL.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: Mutex::new(None),
        }
    }

    /// Returns the cached quote if it is still fresh.
    #[must_use]
    pub fn get(&self) -> Option<NativeQuote> {
        let slot = self.slot.lock();
        match *slot {
            Some((fetched_at, quote)) if fetched_at.elapsed() < self.ttl => Some(quote),
            _ => None,
        }
    }

    /// Stores a freshly fetched quote.
    pub fn put(&self, quote: NativeQuote) {
        *self.slot.lock() = Some((Instant::now(), quote));
    }

    /// Drops the cached quote.
    pub fn invalidate(&self) {
        *self.slot.lock() = None;
    }
}

/// Converts fiat amounts to ledger-native units using live quotes.
pub struct FiatConverter {
    provider: Arc<dyn NativeQuoteProvider>,
    cache: QuoteCache,
    native_decimals: u8,
}

impl FiatConverter {
    /// Creates a converter over a quote provider.
    ///
    /// # Arguments
    ///
    /// * `provider` - The quote source (usually a fallback chain)
    /// * `cache` - TTL cache for quotes
    /// * `native_decimals` - Decimals of the ledger's native currency
    #[must_use]
    pub fn new(
        provider: Arc<dyn NativeQuoteProvider>,
        cache: QuoteCache,
        native_decimals: u8,
    ) -> Self {
        Self {
            provider,
            cache,
            native_decimals,
        }
    }

    /// Returns a quote, served from cache within the TTL window.
    ///
    /// # Errors
    ///
    /// Returns an error if no source can produce a usable quote.
    pub async fn quote(&self) -> OracleResult<NativeQuote> {
        if let Some(cached) = self.cache.get() {
            return Ok(cached);
        }
        let quote = self.provider.get_quote().await?;
        self.cache.put(quote);
        Ok(quote)
    }

    /// Converts a fiat amount to native units at the current quote.
    ///
    /// # Errors
    ///
    /// Returns an error if no quote is available or the conversion
    /// rejects the amount.
    pub async fn to_native(&self, fiat: FiatAmount) -> OracleResult<NativeAmount> {
        let quote = self.quote().await?;
        Ok(quote.fiat_to_native(fiat, self.native_decimals)?)
    }

    /// Converts native units back to fiat at the current quote.
    ///
    /// # Errors
    ///
    /// Returns an error if no quote is available or the conversion
    /// overflows.
    pub async fn to_fiat(&self, native: NativeAmount) -> OracleResult<FiatAmount> {
        let quote = self.quote().await?;
        Ok(quote.native_to_fiat(native, self.native_decimals)?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Debug)]
    struct StaticProvider {
        quote: NativeQuote,
        calls: AtomicU32,
    }

    impl StaticProvider {
        fn new(price: u128, decimals: u8) -> Self {
            Self {
                quote: NativeQuote::new(price, decimals).unwrap(),
                calls: AtomicU32::new(0),
            }
        }

        fn call_count(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl NativeQuoteProvider for StaticProvider {
        async fn get_quote(&self) -> OracleResult<NativeQuote> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.quote)
        }

        fn source_name(&self) -> &'static str {
            "static"
        }
    }

    #[derive(Debug)]
    struct FailingProvider;

    #[async_trait]
    impl NativeQuoteProvider for FailingProvider {
        async fn get_quote(&self) -> OracleResult<NativeQuote> {
            Err(OracleError::unavailable("failing", "connection refused"))
        }

        fn source_name(&self) -> &'static str {
            "failing"
        }
    }

    fn converter_with(provider: Arc<dyn NativeQuoteProvider>, ttl: Duration) -> FiatConverter {
        FiatConverter::new(provider, QuoteCache::new(ttl), 18)
    }

    mod fallback {
        use super::*;

        #[tokio::test]
        async fn primary_success_skips_fallback() {
            let primary = Arc::new(StaticProvider::new(65_000_000_000, 8));
            let fallback = Arc::new(StaticProvider::new(1, 8));
            let chain = FallbackQuoteProvider::new(primary.clone(), fallback.clone());

            let quote = chain.get_quote().await.unwrap();
            assert_eq!(quote.price(), 65_000_000_000);
            assert_eq!(fallback.call_count(), 0);
        }

        #[tokio::test]
        async fn primary_failure_uses_fallback_once() {
            let fallback = Arc::new(StaticProvider::new(70_000_000_000, 8));
            let chain = FallbackQuoteProvider::new(Arc::new(FailingProvider), fallback.clone());

            let quote = chain.get_quote().await.unwrap();
            assert_eq!(quote.price(), 70_000_000_000);
            assert_eq!(fallback.call_count(), 1);
        }

        #[tokio::test]
        async fn both_failing_exhausts() {
            let chain =
                FallbackQuoteProvider::new(Arc::new(FailingProvider), Arc::new(FailingProvider));
            let result = chain.get_quote().await;
            assert!(matches!(result, Err(OracleError::Exhausted { .. })));
        }
    }

    mod cache {
        use super::*;

        #[tokio::test]
        async fn fresh_quote_is_served_from_cache() {
            let provider = Arc::new(StaticProvider::new(65_000_000_000, 8));
            let converter = converter_with(provider.clone(), Duration::from_secs(60));

            converter.quote().await.unwrap();
            converter.quote().await.unwrap();
            assert_eq!(provider.call_count(), 1);
        }

        #[tokio::test]
        async fn zero_ttl_always_refetches() {
            let provider = Arc::new(StaticProvider::new(65_000_000_000, 8));
            let converter = converter_with(provider.clone(), Duration::ZERO);

            converter.quote().await.unwrap();
            converter.quote().await.unwrap();
            assert_eq!(provider.call_count(), 2);
        }

        #[tokio::test]
        async fn invalidate_forces_refetch() {
            let provider = Arc::new(StaticProvider::new(65_000_000_000, 8));
            let cache = QuoteCache::new(Duration::from_secs(60));
            let converter = FiatConverter::new(provider.clone(), cache, 18);

            converter.quote().await.unwrap();
            converter.cache.invalidate();
            converter.quote().await.unwrap();
            assert_eq!(provider.call_count(), 2);
        }
    }

    mod convert {
        use super::*;

        #[tokio::test]
        async fn converts_registration_fee() {
            let converter = converter_with(
                Arc::new(StaticProvider::new(65_000_000_000, 8)),
                Duration::from_secs(60),
            );
            let native = converter
                .to_native(FiatAmount::from_major(300))
                .await
                .unwrap();
            assert_eq!(native.value(), 461_538_461_538_461_538);
        }

        #[tokio::test]
        async fn roundtrip_within_one_cent() {
            let converter = converter_with(
                Arc::new(StaticProvider::new(65_000_000_000, 8)),
                Duration::from_secs(60),
            );
            let fiat = FiatAmount::from_major(15_000);
            let native = converter.to_native(fiat).await.unwrap();
            let back = converter.to_fiat(native).await.unwrap();
            assert!(fiat.cents() - back.cents() <= 1);
        }

        #[tokio::test]
        async fn provider_failure_surfaces() {
            let converter =
                converter_with(Arc::new(FailingProvider), Duration::from_secs(60));
            let result = converter.to_native(FiatAmount::from_major(300)).await;
            assert!(matches!(result, Err(OracleError::Unavailable { .. })));
        }
    }
}
