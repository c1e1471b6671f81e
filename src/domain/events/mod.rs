//! # Domain Events
//!
//! Events emitted after confirmed transitions, for notification and audit.
//!
//! ## Asset Events
//!
//! - [`AssetRegistered`]: registration payment confirmed
//! - [`AiEvaluationSubmitted`]: AI valuation attached
//! - [`PlatformPriceConfirmed`]: platform confirmed the price
//! - [`AssetListed`]: asset listed for sale
//! - [`AssetCancelled`]: asset withdrawn
//!
//! ## Trade Events
//!
//! - [`TradeCreated`]: trade opened against an asset
//! - [`TradeSigned`]: a role's signature confirmed
//! - [`TradeCompleted`]: escrow released, ownership transferred
//! - [`TradeCancelled`]: trade aborted, escrow refunded
//! - [`RefundProcessed`]: deadline refund executed

pub mod asset_events;
pub mod domain_event;
pub mod trade_events;

pub use asset_events::{
    AiEvaluationSubmitted, AssetCancelled, AssetEvent, AssetListed, AssetRegistered,
    PlatformPriceConfirmed,
};
pub use domain_event::{DomainEvent, EventMetadata, EventType};
pub use trade_events::{
    RefundProcessed, TradeCancelled, TradeCompleted, TradeCreated, TradeEvent, TradeSigned,
};

use serde::{Deserialize, Serialize};

/// Any settlement event, for publication through a notification sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SettlementEvent {
    /// An asset lifecycle event.
    Asset(AssetEvent),
    /// A trade or refund event.
    Trade(TradeEvent),
}

impl SettlementEvent {
    /// Returns the inner event as a [`DomainEvent`].
    #[must_use]
    pub fn as_domain_event(&self) -> &dyn DomainEvent {
        match self {
            Self::Asset(e) => e.as_domain_event(),
            Self::Trade(e) => e.as_domain_event(),
        }
    }

    /// Returns the human-readable name of the inner event.
    #[must_use]
    pub fn event_name(&self) -> &'static str {
        self.as_domain_event().event_name()
    }
}

impl From<AssetEvent> for SettlementEvent {
    fn from(event: AssetEvent) -> Self {
        Self::Asset(event)
    }
}

impl From<TradeEvent> for SettlementEvent {
    fn from(event: TradeEvent) -> Self {
        Self::Trade(event)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{AssetId, FiatAmount, WalletAddress};

    #[test]
    fn settlement_event_exposes_name() {
        let owner =
            WalletAddress::parse("0x8a627a75d04bf3c709154205dfbbb6f4ed10dcb0").unwrap();
        let event: SettlementEvent = AssetEvent::Registered(AssetRegistered::new(
            AssetId::new(1),
            owner,
            "Prudential HK",
            FiatAmount::from_major(300),
            "0xfee",
        ))
        .into();
        assert_eq!(event.event_name(), "AssetRegistered");
    }

    #[test]
    fn serde_tags_event_kind() {
        let event: SettlementEvent = AssetEvent::Cancelled(AssetCancelled::new(
            AssetId::new(1),
        ))
        .into();
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"], "ASSET");
        assert_eq!(json["event"], "CANCELLED");
    }
}
