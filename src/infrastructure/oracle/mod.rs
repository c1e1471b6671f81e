//! # Price Oracle Adapters
//!
//! Quote sources behind the
//! [`NativeQuoteProvider`](crate::application::services::conversion::NativeQuoteProvider)
//! port.
//!
//! - [`RestQuoteProvider`]: primary REST market feed, rate limited
//! - [`ChainFeedQuoteProvider`]: fallback on-chain aggregator feed

pub mod chain_feed;
pub mod rest;

pub use chain_feed::ChainFeedQuoteProvider;
pub use rest::RestQuoteProvider;
