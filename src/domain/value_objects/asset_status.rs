//! # Asset Status
//!
//! Asset lifecycle state machine.
//!
//! This module provides the [`AssetStatus`] enum representing the
//! lifecycle of a tokenized insurance asset from registration through
//! final settlement.
//!
//! # State Machine
//!
//! ```text
//! Registered → AiEvaluated → PlatformConfirmed → Listed → InTrade → Sold → Refunded
//!      ↓             ↓               ↓     └───────┬────────┘  ↓
//!      └─────────────┴───────────────┴→ Cancelled ←┴───────────┘
//! ```
//!
//! `Sold` can still move to `Refunded` through the refund monitor;
//! `Refunded` and `Cancelled` are terminal.
//!
//! # Examples
//!
//! ```
//! use wellswap_settlement::domain::value_objects::asset_status::AssetStatus;
//!
//! let status = AssetStatus::Registered;
//! assert!(status.can_transition_to(AssetStatus::AiEvaluated));
//! assert!(!status.can_transition_to(AssetStatus::InTrade));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Asset lifecycle state.
///
/// State transitions are enforced via
/// [`can_transition_to`](AssetStatus::can_transition_to).
///
/// # Terminal States
///
/// - [`Refunded`](AssetStatus::Refunded) - escrow was returned to the payer
/// - [`Cancelled`](AssetStatus::Cancelled) - the asset was withdrawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum AssetStatus {
    /// Registered on the ledger, awaiting AI evaluation.
    #[default]
    Registered = 0,

    /// AI valuation attached, awaiting platform price confirmation.
    AiEvaluated = 1,

    /// Platform confirmed the price; the asset may be listed or traded.
    PlatformConfirmed = 2,

    /// Publicly listed for sale.
    Listed = 3,

    /// An open trade exists against this asset.
    InTrade = 4,

    /// The trade completed and ownership transferred.
    Sold = 5,

    /// Escrowed funds were returned to the payer (terminal).
    Refunded = 6,

    /// The asset was withdrawn (terminal).
    Cancelled = 7,
}

impl AssetStatus {
    /// Returns true if this is a terminal state.
    ///
    /// Terminal states cannot transition to any other state. `Sold` is
    /// not terminal: the refund monitor can still move it to `Refunded`.
    #[inline]
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Refunded | Self::Cancelled)
    }

    /// Returns true if a trade may be created against this asset.
    #[inline]
    #[must_use]
    pub const fn can_trade(&self) -> bool {
        matches!(self, Self::PlatformConfirmed | Self::Listed)
    }

    /// Returns true if this state can transition to the target state.
    ///
    /// Enforces the asset state machine rules:
    /// - Registered → AiEvaluated, Cancelled
    /// - AiEvaluated → PlatformConfirmed, Cancelled
    /// - PlatformConfirmed → Listed, InTrade, Cancelled
    /// - Listed → InTrade, Cancelled
    /// - InTrade → Sold, Refunded, Cancelled
    /// - Sold → Refunded
    /// - Terminal states → (none)
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Registered, Self::AiEvaluated)
                | (Self::Registered, Self::Cancelled)
                | (Self::AiEvaluated, Self::PlatformConfirmed)
                | (Self::AiEvaluated, Self::Cancelled)
                | (Self::PlatformConfirmed, Self::Listed)
                | (Self::PlatformConfirmed, Self::InTrade)
                | (Self::PlatformConfirmed, Self::Cancelled)
                | (Self::Listed, Self::InTrade)
                | (Self::Listed, Self::Cancelled)
                | (Self::InTrade, Self::Sold)
                | (Self::InTrade, Self::Refunded)
                | (Self::InTrade, Self::Cancelled)
                | (Self::Sold, Self::Refunded)
        )
    }

    /// Returns the valid next states from this state.
    #[must_use]
    pub fn valid_transitions(&self) -> Vec<Self> {
        match self {
            Self::Registered => vec![Self::AiEvaluated, Self::Cancelled],
            Self::AiEvaluated => vec![Self::PlatformConfirmed, Self::Cancelled],
            Self::PlatformConfirmed => vec![Self::Listed, Self::InTrade, Self::Cancelled],
            Self::Listed => vec![Self::InTrade, Self::Cancelled],
            Self::InTrade => vec![Self::Sold, Self::Refunded, Self::Cancelled],
            Self::Sold => vec![Self::Refunded],
            Self::Refunded | Self::Cancelled => vec![],
        }
    }

    /// Returns the numeric value of this state.
    #[inline]
    #[must_use]
    pub const fn as_u8(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Registered => "REGISTERED",
            Self::AiEvaluated => "AI_EVALUATED",
            Self::PlatformConfirmed => "PLATFORM_CONFIRMED",
            Self::Listed => "LISTED",
            Self::InTrade => "IN_TRADE",
            Self::Sold => "SOLD",
            Self::Refunded => "REFUNDED",
            Self::Cancelled => "CANCELLED",
        };
        write!(f, "{s}")
    }
}

/// Error returned when converting an invalid u8 to [`AssetStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidAssetStatusError(
    /// The invalid u8 value.
    pub u8,
);

impl fmt::Display for InvalidAssetStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid asset status value: {}", self.0)
    }
}

impl std::error::Error for InvalidAssetStatusError {}

impl TryFrom<u8> for AssetStatus {
    type Error = InvalidAssetStatusError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Registered),
            1 => Ok(Self::AiEvaluated),
            2 => Ok(Self::PlatformConfirmed),
            3 => Ok(Self::Listed),
            4 => Ok(Self::InTrade),
            5 => Ok(Self::Sold),
            6 => Ok(Self::Refunded),
            7 => Ok(Self::Cancelled),
            _ => Err(InvalidAssetStatusError(value)),
        }
    }
}
