//! # Trade Events
//!
//! Domain events for trade settlement and refunds.
//!
//! # Event Flow
//!
//! ```text
//! TradeCreated -> TradeSigned (buyer) -> TradeSigned (platform)
//!              -> TradeCompleted | TradeCancelled
//! Sold asset past deadline -> RefundProcessed
//! ```

use crate::domain::events::domain_event::{DomainEvent, EventMetadata, EventType};
use crate::domain::value_objects::timestamp::Timestamp;
use crate::domain::value_objects::{
    AssetId, EventId, FiatAmount, NativeAmount, SignerRole, TradeId, WalletAddress,
};
use serde::{Deserialize, Serialize};

/// Event emitted when a trade is created against an asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeCreated {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// The new trade.
    pub trade_id: TradeId,
    /// The asset under trade.
    pub asset_id: AssetId,
    /// The buyer.
    pub buyer: WalletAddress,
    /// The agreed price.
    pub agreed_price: FiatAmount,
}

impl TradeCreated {
    /// Creates a new `TradeCreated` event.
    #[must_use]
    pub fn new(
        trade_id: TradeId,
        asset_id: AssetId,
        buyer: WalletAddress,
        agreed_price: FiatAmount,
    ) -> Self {
        Self {
            metadata: EventMetadata::for_asset(asset_id),
            trade_id,
            asset_id,
            buyer,
            agreed_price,
        }
    }
}

impl DomainEvent for TradeCreated {
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
        EventType::Trade
    }

    fn event_name(&self) -> &'static str {
        "TradeCreated"
    }
}

/// Event emitted when a role's signature is confirmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeSigned {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// The signed trade.
    pub trade_id: TradeId,
    /// The asset under trade.
    pub asset_id: AssetId,
    /// Which role signed.
    pub role: SignerRole,
    /// Hash of the signature-carrying transaction.
    pub tx_hash: String,
    /// Payment escrowed with the signature, if any.
    pub escrowed: Option<NativeAmount>,
}

impl TradeSigned {
    /// Creates a new `TradeSigned` event.
    #[must_use]
    pub fn new(
        trade_id: TradeId,
        asset_id: AssetId,
        role: SignerRole,
        tx_hash: impl Into<String>,
        escrowed: Option<NativeAmount>,
    ) -> Self {
        Self {
            metadata: EventMetadata::for_asset(asset_id),
            trade_id,
            asset_id,
            role,
            tx_hash: tx_hash.into(),
            escrowed,
        }
    }
}

impl DomainEvent for TradeSigned {
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
        EventType::Trade
    }

    fn event_name(&self) -> &'static str {
        "TradeSigned"
    }
}

/// Event emitted when a trade completes and escrow is released.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeCompleted {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// The completed trade.
    pub trade_id: TradeId,
    /// The sold asset.
    pub asset_id: AssetId,
    /// The seller who received the payout.
    pub seller: WalletAddress,
    /// Escrow released to the seller, net of commission.
    pub payout: NativeAmount,
    /// Hash of the completion transaction.
    pub tx_hash: String,
}

impl TradeCompleted {
    /// Creates a new `TradeCompleted` event.
    #[must_use]
    pub fn new(
        trade_id: TradeId,
        asset_id: AssetId,
        seller: WalletAddress,
        payout: NativeAmount,
        tx_hash: impl Into<String>,
    ) -> Self {
        Self {
            metadata: EventMetadata::for_asset(asset_id),
            trade_id,
            asset_id,
            seller,
            payout,
            tx_hash: tx_hash.into(),
        }
    }
}

impl DomainEvent for TradeCompleted {
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
        EventType::Trade
    }

    fn event_name(&self) -> &'static str {
        "TradeCompleted"
    }
}

/// Event emitted when a trade is cancelled by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeCancelled {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// The cancelled trade.
    pub trade_id: TradeId,
    /// The asset that was under trade.
    pub asset_id: AssetId,
    /// Operator-supplied reason.
    pub reason: String,
    /// Escrow refunded to the buyer, if any had been paid.
    pub refunded: Option<NativeAmount>,
}

impl TradeCancelled {
    /// Creates a new `TradeCancelled` event.
    #[must_use]
    pub fn new(
        trade_id: TradeId,
        asset_id: AssetId,
        reason: impl Into<String>,
        refunded: Option<NativeAmount>,
    ) -> Self {
        Self {
            metadata: EventMetadata::for_asset(asset_id),
            trade_id,
            asset_id,
            reason: reason.into(),
            refunded,
        }
    }
}

impl DomainEvent for TradeCancelled {
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
        EventType::Trade
    }

    fn event_name(&self) -> &'static str {
        "TradeCancelled"
    }
}

/// Event emitted when a deadline-driven refund is processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefundProcessed {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// The refunded asset.
    pub asset_id: AssetId,
    /// The original payer receiving the refund.
    pub recipient: WalletAddress,
    /// Escrow returned.
    pub amount: NativeAmount,
    /// Hash of the refund transaction.
    pub tx_hash: String,
}

impl RefundProcessed {
    /// Creates a new `RefundProcessed` event.
    #[must_use]
    pub fn new(
        asset_id: AssetId,
        recipient: WalletAddress,
        amount: NativeAmount,
        tx_hash: impl Into<String>,
    ) -> Self {
        Self {
            metadata: EventMetadata::for_asset(asset_id),
            asset_id,
            recipient,
            amount,
            tx_hash: tx_hash.into(),
        }
    }
}

impl DomainEvent for RefundProcessed {
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
        EventType::Refund
    }

    fn event_name(&self) -> &'static str {
        "RefundProcessed"
    }
}

/// Enum of all trade and refund events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeEvent {
    /// Trade created.
    Created(TradeCreated),
    /// A role signed.
    Signed(TradeSigned),
    /// Trade completed.
    Completed(TradeCompleted),
    /// Trade cancelled.
    Cancelled(TradeCancelled),
    /// Deadline refund processed.
    RefundProcessed(RefundProcessed),
}

impl TradeEvent {
    /// Returns the inner event as a [`DomainEvent`].
    #[must_use]
    pub fn as_domain_event(&self) -> &dyn DomainEvent {
        match self {
            Self::Created(e) => e,
            Self::Signed(e) => e,
            Self::Completed(e) => e,
            Self::Cancelled(e) => e,
            Self::RefundProcessed(e) => e,
        }
    }
}
