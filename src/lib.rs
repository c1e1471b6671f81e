//! # WellSwap Settlement
//!
//! Multisig settlement engine for a tokenized insurance-policy resale
//! marketplace on EVM chains.
//!
//! Sellers register transferable insurance policies against a
//! registration fee, the platform attaches an AI valuation and
//! confirms the trade price, and buyers settle through a
//! dual-signature escrow: the buyer's signature carries the payment,
//! the platform's co-signature releases it. Escrow that sits unsettled
//! past a 61-day deadline is returned to the payer by an explicit,
//! administrator-driven refund sweep.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────┐
//! │ application   SettlementService · RefundMonitor       │
//! │               FiatConverter (quote fallback + cache)  │
//! ├───────────────────────────────────────────────────────┤
//! │ domain        Asset · Trade · status state machines   │
//! │               events · money (fixed-point conversion) │
//! ├───────────────────────────────────────────────────────┤
//! │ infrastructure  LedgerClient (ethers / mock)          │
//! │                 repositories (in-memory / postgres)   │
//! │                 quote sources (REST / chain feed)     │
//! │                 notification sinks (tracing / NATS)   │
//! └───────────────────────────────────────────────────────┘
//! ```
//!
//! The ledger is the source of truth: a transition is durable only
//! after its transaction confirms, the repositories mirror confirmed
//! state, and optimistic version locking stands in for any mutex.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use wellswap_settlement::application::services::conversion::{FiatConverter, QuoteCache};
//! use wellswap_settlement::application::services::settlement::{
//!     SettlementConfig, SettlementService,
//! };
//! use wellswap_settlement::domain::value_objects::{AdminSet, SystemClock, WalletAddress};
//! use wellswap_settlement::infrastructure::ledger::mock::MockLedgerClient;
//! use wellswap_settlement::infrastructure::notify::TracingNotificationSink;
//! use wellswap_settlement::infrastructure::oracle::RestQuoteProvider;
//! use wellswap_settlement::infrastructure::persistence::in_memory::{
//!     InMemoryAssetRepository, InMemoryTradeRepository,
//! };
//!
//! let platform = WalletAddress::parse("0x8a627a75d04bf3c709154205dfbbb6f4ed10dcb0")?;
//! let converter = Arc::new(FiatConverter::new(
//!     Arc::new(RestQuoteProvider::new(
//!         "https://api.binance.com/api/v3/ticker/price?symbol=BNBUSDT",
//!         8,
//!     )),
//!     QuoteCache::new(Duration::from_secs(30)),
//!     18,
//! ));
//! let service = SettlementService::new(
//!     Arc::new(MockLedgerClient::new()),
//!     Arc::new(InMemoryAssetRepository::new()),
//!     Arc::new(InMemoryTradeRepository::new()),
//!     converter,
//!     Arc::new(TracingNotificationSink::new()),
//!     AdminSet::new([platform.clone()]),
//!     Arc::new(SystemClock),
//!     SettlementConfig::new(platform),
//! );
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;
