//! # Application Services
//!
//! Services that orchestrate domain logic and infrastructure.
//!
//! This module provides:
//! - [`SettlementService`]: the settlement state machine (registration
//!   through completion)
//! - [`RefundMonitor`]: deadline-driven refund sweep
//! - [`FiatConverter`]: fiat → ledger-native conversion with quote
//!   fallback and TTL caching

pub mod conversion;
pub mod refund_monitor;
pub mod settlement;

pub use conversion::{
    FallbackQuoteProvider, FiatConverter, NativeQuoteProvider, OracleError, OracleResult,
    QuoteCache,
};
pub use refund_monitor::{
    ProcessedRefund, RefundCandidate, RefundConfig, RefundEligibility, RefundMonitor, RefundSweep,
    DEFAULT_REFUND_PERIOD_DAYS,
};
pub use settlement::{SettlementConfig, SettlementService};
