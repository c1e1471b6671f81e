//! # Gas Pricing
//!
//! Legacy gas pricing with a safety buffer.
//!
//! BSC, the chain the settlement contract is deployed on, uses
//! legacy gas pricing, so a single `gas_price` covers every supported
//! chain here.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A legacy gas price in smallest units per gas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasPrice {
    /// Price per unit of gas, in the chain's smallest units.
    pub gas_price: u64,
}

impl GasPrice {
    /// Creates a gas price.
    #[must_use]
    pub const fn new(gas_price: u64) -> Self {
        Self { gas_price }
    }

    /// Returns the total fee for a gas limit; widening to u128 keeps
    /// the product from overflowing.
    #[must_use]
    pub const fn total_fee(&self, gas_limit: u64) -> u128 {
        self.gas_price as u128 * gas_limit as u128
    }
}

impl fmt::Display for GasPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.gas_price)
    }
}

/// Gas estimator applying a percentage buffer on top of raw estimates.
///
/// Raw node estimates routinely undershoot on state-dependent calls;
/// the buffer keeps a confirmed-then-changed state from reverting the
/// transaction with out-of-gas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasEstimator {
    buffer_percent: u64,
}

impl GasEstimator {
    /// Default buffer applied on top of raw estimates.
    pub const DEFAULT_BUFFER_PERCENT: u64 = 20;

    /// Creates an estimator with a custom buffer percentage.
    #[must_use]
    pub const fn new(buffer_percent: u64) -> Self {
        Self { buffer_percent }
    }

    /// Returns the configured buffer percentage.
    #[must_use]
    pub const fn buffer_percent(&self) -> u64 {
        self.buffer_percent
    }

    /// Applies the buffer to a raw gas estimate.
    #[must_use]
    pub const fn with_buffer(&self, raw_estimate: u64) -> u64 {
        raw_estimate.saturating_add(raw_estimate / 100 * self.buffer_percent)
    }
}

impl Default for GasEstimator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BUFFER_PERCENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_fee_multiplies() {
        let price = GasPrice::new(5_000_000_000);
        assert_eq!(price.total_fee(21_000), 105_000_000_000_000);
    }

    #[test]
    fn default_buffer_is_twenty_percent() {
        let estimator = GasEstimator::default();
        assert_eq!(estimator.buffer_percent(), 20);
        assert_eq!(estimator.with_buffer(100_000), 120_000);
    }

    #[test]
    fn custom_buffer() {
        let estimator = GasEstimator::new(50);
        assert_eq!(estimator.with_buffer(100_000), 150_000);
    }

    #[test]
    fn buffer_saturates_instead_of_overflowing() {
        let estimator = GasEstimator::new(100);
        assert_eq!(estimator.with_buffer(u64::MAX), u64::MAX);
    }
}
