//! # Domain Event Trait
//!
//! Base trait for all domain events.
//!
//! This module provides the [`DomainEvent`] trait that all domain
//! events implement, along with common event metadata. Events are
//! immutable records of confirmed transitions; they are emitted after
//! the ledger confirms, never before.

use crate::domain::value_objects::timestamp::Timestamp;
use crate::domain::value_objects::{AssetId, EventId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Type of domain event.
///
/// Categorizes events by their domain area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    /// Asset lifecycle events.
    Asset,
    /// Trade and settlement events.
    Trade,
    /// Refund events.
    Refund,
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asset => write!(f, "ASSET"),
            Self::Trade => write!(f, "TRADE"),
            Self::Refund => write!(f, "REFUND"),
        }
    }
}

/// Trait for all domain events.
///
/// Domain events represent significant occurrences in the settlement
/// lifecycle that other parts of the system may need to react to.
///
/// # Required Methods
///
/// - [`event_id`](DomainEvent::event_id) - Unique identifier for this event
/// - [`asset_id`](DomainEvent::asset_id) - The asset this event relates to (if any)
/// - [`timestamp`](DomainEvent::timestamp) - When the event occurred
/// - [`event_type`](DomainEvent::event_type) - Category of the event
/// - [`event_name`](DomainEvent::event_name) - Human-readable event name
pub trait DomainEvent: Send + Sync + fmt::Debug {
    /// Returns the unique identifier for this event.
    fn event_id(&self) -> EventId;

    /// Returns the asset this event relates to, if any.
    fn asset_id(&self) -> Option<AssetId>;

    /// Returns when this event occurred.
    fn timestamp(&self) -> Timestamp;

    /// Returns the type/category of this event.
    fn event_type(&self) -> EventType;

    /// Returns the human-readable name of this event.
    fn event_name(&self) -> &'static str;
}

/// Common metadata for all domain events.
///
/// This struct contains the fields common to all events and is
/// embedded in the concrete event types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMetadata {
    /// Unique identifier for this event.
    pub event_id: EventId,
    /// The asset this event relates to.
    pub asset_id: Option<AssetId>,
    /// When this event occurred.
    pub timestamp: Timestamp,
}

impl EventMetadata {
    /// Creates new event metadata with a generated event ID.
    #[must_use]
    pub fn new(asset_id: Option<AssetId>) -> Self {
        Self {
            event_id: EventId::new_v4(),
            asset_id,
            timestamp: Timestamp::now(),
        }
    }

    /// Creates new event metadata for a specific asset.
    #[must_use]
    pub fn for_asset(asset_id: AssetId) -> Self {
        Self::new(Some(asset_id))
    }

    /// Creates event metadata with specific values (for reconstruction).
    #[must_use]
    pub fn from_parts(event_id: EventId, asset_id: Option<AssetId>, timestamp: Timestamp) -> Self {
        Self {
            event_id,
            asset_id,
            timestamp,
        }
    }
}

impl Default for EventMetadata {
    fn default() -> Self {
        Self::new(None)
    }
}
