//! # Asset Events
//!
//! Domain events for the asset lifecycle.
//!
//! # Event Flow
//!
//! ```text
//! AssetRegistered -> AiEvaluationSubmitted -> PlatformPriceConfirmed -> AssetListed
//! ```

use crate::domain::events::domain_event::{DomainEvent, EventMetadata, EventType};
use crate::domain::value_objects::timestamp::Timestamp;
use crate::domain::value_objects::{
    AssetId, ConfidenceScore, EventId, FiatAmount, RiskGrade, WalletAddress,
};
use serde::{Deserialize, Serialize};

/// Event emitted when an asset registration is confirmed on the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRegistered {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// The registered asset.
    pub asset_id: AssetId,
    /// The seller who registered it.
    pub owner: WalletAddress,
    /// Issuing insurance company.
    pub company_name: String,
    /// Registration fee paid, in fiat cents.
    pub registration_fee: FiatAmount,
    /// Hash of the fee-carrying transaction.
    pub fee_tx_hash: String,
}

impl AssetRegistered {
    /// Creates a new `AssetRegistered` event.
    #[must_use]
    pub fn new(
        asset_id: AssetId,
        owner: WalletAddress,
        company_name: impl Into<String>,
        registration_fee: FiatAmount,
        fee_tx_hash: impl Into<String>,
    ) -> Self {
        Self {
            metadata: EventMetadata::for_asset(asset_id),
            asset_id,
            owner,
            company_name: company_name.into(),
            registration_fee,
            fee_tx_hash: fee_tx_hash.into(),
        }
    }
}

impl DomainEvent for AssetRegistered {
    fn event_id(&self) -> EventId {
        self.metadata.event_id
    }

    fn asset_id(&self) -> Option<AssetId> {
        self.metadata.asset_id
    }

    fn timestamp(&self) -> Timestamp {
        self.metadata.timestamp
    }

    fn event_type(&self) -> EventType {
        EventType::Asset
    }

    fn event_name(&self) -> &'static str {
        "AssetRegistered"
    }
}

/// Event emitted when the AI valuation is attached to an asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiEvaluationSubmitted {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// The evaluated asset.
    pub asset_id: AssetId,
    /// AI-estimated value.
    pub ai_value: FiatAmount,
    /// Assigned risk grade.
    pub risk_grade: RiskGrade,
    /// Model confidence.
    pub confidence: ConfidenceScore,
}

impl AiEvaluationSubmitted {
    /// Creates a new `AiEvaluationSubmitted` event.
    #[must_use]
    pub fn new(
        asset_id: AssetId,
        ai_value: FiatAmount,
        risk_grade: RiskGrade,
        confidence: ConfidenceScore,
    ) -> Self {
        Self {
            metadata: EventMetadata::for_asset(asset_id),
            asset_id,
            ai_value,
            risk_grade,
            confidence,
        }
    }
}

impl DomainEvent for AiEvaluationSubmitted {
    fn event_id(&self) -> EventId {
        self.metadata.event_id
    }

    fn asset_id(&self) -> Option<AssetId> {
        self.metadata.asset_id
    }

    fn timestamp(&self) -> Timestamp {
        self.metadata.timestamp
    }

    fn event_type(&self) -> EventType {
        EventType::Asset
    }

    fn event_name(&self) -> &'static str {
        "AiEvaluationSubmitted"
    }
}

/// Event emitted when the platform confirms an asset's price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformPriceConfirmed {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// The confirmed asset.
    pub asset_id: AssetId,
    /// The platform-confirmed price.
    pub confirmed_price: FiatAmount,
}

impl PlatformPriceConfirmed {
    /// Creates a new `PlatformPriceConfirmed` event.
    #[must_use]
    pub fn new(asset_id: AssetId, confirmed_price: FiatAmount) -> Self {
        Self {
            metadata: EventMetadata::for_asset(asset_id),
            asset_id,
            confirmed_price,
        }
    }
}

impl DomainEvent for PlatformPriceConfirmed {
    fn event_id(&self) -> EventId {
        self.metadata.event_id
    }

    fn asset_id(&self) -> Option<AssetId> {
        self.metadata.asset_id
    }

    fn timestamp(&self) -> Timestamp {
        self.metadata.timestamp
    }

    fn event_type(&self) -> EventType {
        EventType::Asset
    }

    fn event_name(&self) -> &'static str {
        "PlatformPriceConfirmed"
    }
}

/// Event emitted when an asset is listed for sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetListed {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// The listed asset.
    pub asset_id: AssetId,
    /// The asking price.
    pub price: FiatAmount,
}

impl AssetListed {
    /// Creates a new `AssetListed` event.
    #[must_use]
    pub fn new(asset_id: AssetId, price: FiatAmount) -> Self {
        Self {
            metadata: EventMetadata::for_asset(asset_id),
            asset_id,
            price,
        }
    }
}

impl DomainEvent for AssetListed {
    fn event_id(&self) -> EventId {
        self.metadata.event_id
    }

    fn asset_id(&self) -> Option<AssetId> {
        self.metadata.asset_id
    }

    fn timestamp(&self) -> Timestamp {
        self.metadata.timestamp
    }

    fn event_type(&self) -> EventType {
        EventType::Asset
    }

    fn event_name(&self) -> &'static str {
        "AssetListed"
    }
}

/// Event emitted when an asset is cancelled (delisted or withdrawn).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetCancelled {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// The cancelled asset.
    pub asset_id: AssetId,
}

impl AssetCancelled {
    /// Creates a new `AssetCancelled` event.
    #[must_use]
    pub fn new(asset_id: AssetId) -> Self {
        Self {
            metadata: EventMetadata::for_asset(asset_id),
            asset_id,
        }
    }
}

impl DomainEvent for AssetCancelled {
    fn event_id(&self) -> EventId {
        self.metadata.event_id
    }

    fn asset_id(&self) -> Option<AssetId> {
        self.metadata.asset_id
    }

    fn timestamp(&self) -> Timestamp {
        self.metadata.timestamp
    }

    fn event_type(&self) -> EventType {
        EventType::Asset
    }

    fn event_name(&self) -> &'static str {
        "AssetCancelled"
    }
}

/// Enum of all asset events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetEvent {
    /// Asset registered on the ledger.
    Registered(AssetRegistered),
    /// AI valuation attached.
    Evaluated(AiEvaluationSubmitted),
    /// Platform price confirmed.
    PriceConfirmed(PlatformPriceConfirmed),
    /// Asset listed for sale.
    Listed(AssetListed),
    /// Asset cancelled.
    Cancelled(AssetCancelled),
}

impl AssetEvent {
    /// Returns the inner event as a [`DomainEvent`].
    #[must_use]
    pub fn as_domain_event(&self) -> &dyn DomainEvent {
        match self {
            Self::Registered(e) => e,
            Self::Evaluated(e) => e,
            Self::PriceConfirmed(e) => e,
            Self::Listed(e) => e,
            Self::Cancelled(e) => e,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn owner() -> WalletAddress {
        WalletAddress::parse("0x8a627a75d04bf3c709154205dfbbb6f4ed10dcb0").unwrap()
    }

    #[test]
    fn asset_registered_carries_fee_details() {
        let event = AssetRegistered::new(
            AssetId::new(1),
            owner(),
            "Prudential HK",
            FiatAmount::from_major(300),
            "0xfee",
        );
        assert_eq!(event.event_name(), "AssetRegistered");
        assert_eq!(event.event_type(), EventType::Asset);
        assert_eq!(event.asset_id(), Some(AssetId::new(1)));
        assert_eq!(event.registration_fee, FiatAmount::from_major(300));
    }

    #[test]
    fn evaluation_event_carries_valuation_fields() {
        let event = AiEvaluationSubmitted::new(
            AssetId::new(2),
            FiatAmount::from_major(18_000),
            RiskGrade::new(2).unwrap(),
            ConfidenceScore::new(87).unwrap(),
        );
        assert_eq!(event.event_name(), "AiEvaluationSubmitted");
        assert_eq!(event.risk_grade.value(), 2);
    }

    #[test]
    fn asset_event_enum_delegates() {
        let event = AssetEvent::PriceConfirmed(PlatformPriceConfirmed::new(
            AssetId::new(3),
            FiatAmount::from_major(15_000),
        ));
        assert_eq!(event.as_domain_event().event_name(), "PlatformPriceConfirmed");
        assert_eq!(event.as_domain_event().asset_id(), Some(AssetId::new(3)));
    }

    #[test]
    fn serde_roundtrip() {
        let event = AssetEvent::Listed(AssetListed::new(
            AssetId::new(4),
            FiatAmount::from_major(15_000),
        ));
        let json = serde_json::to_string(&event).unwrap();
        let back: AssetEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, back);
    }
}
