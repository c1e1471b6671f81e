//! # On-Chain Feed Quote Provider
//!
//! Fallback price source reading an on-chain aggregator feed through
//! the ledger client. Consulted only when the REST source fails; a
//! non-positive feed answer is rejected the same way.

use crate::application::services::conversion::{
    NativeQuoteProvider, OracleError, OracleResult,
};
use crate::domain::value_objects::NativeQuote;
use crate::infrastructure::ledger::client::LedgerClient;
use async_trait::async_trait;
use std::sync::Arc;

const SOURCE: &str = "chain-feed";

/// Quote provider backed by an on-chain price aggregator.
#[derive(Debug)]
pub struct ChainFeedQuoteProvider {
    ledger: Arc<dyn LedgerClient>,
    method: String,
    decimals: u8,
}

impl ChainFeedQuoteProvider {
    /// Creates a provider reading the given view method.
    ///
    /// # Arguments
    ///
    /// * `ledger` - Ledger client to read through
    /// * `method` - View method returning the scaled integer price
    /// * `decimals` - Decimals the feed scales its price by
    #[must_use]
    pub fn new(ledger: Arc<dyn LedgerClient>, method: impl Into<String>, decimals: u8) -> Self {
        Self {
            ledger,
            method: method.into(),
            decimals,
        }
    }
}

#[async_trait]
impl NativeQuoteProvider for ChainFeedQuoteProvider {
    async fn get_quote(&self) -> OracleResult<NativeQuote> {
        let value = self
            .ledger
            .read_state(&self.method, &[])
            .await
            .map_err(|e| OracleError::unavailable(SOURCE, e.to_string()))?;
        let price = value
            .as_uint()
            .map_err(|e| OracleError::unavailable(SOURCE, e.to_string()))?;
        Ok(NativeQuote::new(price, self.decimals)?)
    }

    fn source_name(&self) -> &'static str {
        SOURCE
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::infrastructure::ledger::client::CallValue;
    use crate::infrastructure::ledger::mock::MockLedgerClient;

    #[tokio::test]
    async fn reads_feed_price() {
        let ledger = Arc::new(MockLedgerClient::new());
        ledger.set_read_state("latestPrice", CallValue::Uint(65_000_000_000));

        let provider = ChainFeedQuoteProvider::new(ledger, "latestPrice", 8);
        let quote = provider.get_quote().await.unwrap();
        assert_eq!(quote.price(), 65_000_000_000);
        assert_eq!(quote.decimals(), 8);
    }

    #[tokio::test]
    async fn zero_feed_price_is_rejected() {
        let ledger = Arc::new(MockLedgerClient::new());
        ledger.set_read_state("latestPrice", CallValue::Uint(0));

        let provider = ChainFeedQuoteProvider::new(ledger, "latestPrice", 8);
        let result = provider.get_quote().await;
        assert!(matches!(result, Err(ref e) if e.is_zero_price()));
    }

    #[tokio::test]
    async fn missing_feed_is_unavailable() {
        let ledger = Arc::new(MockLedgerClient::new());
        let provider = ChainFeedQuoteProvider::new(ledger, "latestPrice", 8);
        let result = provider.get_quote().await;
        assert!(matches!(result, Err(OracleError::Unavailable { .. })));
    }

    #[tokio::test]
    async fn non_uint_answer_is_unavailable() {
        let ledger = Arc::new(MockLedgerClient::new());
        ledger.set_read_state("latestPrice", CallValue::Bool(true));

        let provider = ChainFeedQuoteProvider::new(ledger, "latestPrice", 8);
        let result = provider.get_quote().await;
        assert!(matches!(result, Err(OracleError::Unavailable { .. })));
    }
}
