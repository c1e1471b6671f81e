//! # Domain Errors
//!
//! Error types for business-rule violations.
//!
//! These errors are resolved locally: a domain error means the
//! requested transition or value was rejected before any external call
//! was made.
//!
//! # Examples
//!
//! ```
//! use wellswap_settlement::domain::errors::DomainError;
//! use wellswap_settlement::domain::value_objects::{AssetStatus, SignerRole};
//!
//! let err = DomainError::invalid_asset_transition(
//!     AssetStatus::Registered,
//!     AssetStatus::InTrade,
//! );
//! assert!(err.is_invalid_transition());
//!
//! let err = DomainError::AlreadySigned(SignerRole::Buyer);
//! assert!(err.to_string().contains("BUYER"));
//! ```

use crate::domain::value_objects::{AssetStatus, SignerRole, TradeStatus};
use thiserror::Error;

/// Domain layer error.
///
/// Represents violations of the settlement state machine and value
/// validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Asset state transition not allowed by the lifecycle graph.
    #[error("invalid asset transition: {from} -> {to}")]
    InvalidAssetTransition {
        /// Current state.
        from: AssetStatus,
        /// Requested state.
        to: AssetStatus,
    },

    /// Trade state transition not allowed by the lifecycle graph.
    #[error("invalid trade transition: {from} -> {to}")]
    InvalidTradeTransition {
        /// Current state.
        from: TradeStatus,
        /// Requested state.
        to: TradeStatus,
    },

    /// The role has already signed this trade.
    #[error("already signed by {0}")]
    AlreadySigned(SignerRole),

    /// Completion requested with fewer signatures than required.
    #[error("missing signatures: {present} of {required} present")]
    MissingSignatures {
        /// Signatures currently present.
        present: u8,
        /// Signatures required for completion.
        required: u8,
    },

    /// The trade has already been completed.
    #[error("trade already completed")]
    AlreadyCompleted,

    /// Risk grade outside the allowed 1–5 range.
    #[error("invalid risk grade: {0} (must be 1-5)")]
    InvalidRiskGrade(u8),

    /// Confidence score outside the allowed 0–100 range.
    #[error("invalid confidence score: {0} (must be 0-100)")]
    InvalidConfidence(u8),

    /// A monetary amount failed validation.
    #[error("invalid amount: {0}")]
    InvalidAmount(&'static str),

    /// An asset attribute failed validation.
    #[error("invalid asset data: {0}")]
    InvalidAssetData(&'static str),

    /// Buyer and seller must be distinct parties.
    #[error("buyer and seller must differ")]
    SelfTrade,

    /// An operation required a valuation that has not been attached.
    #[error("asset has no valuation")]
    MissingValuation,

    /// An operation required a confirmed price that has not been set.
    #[error("asset has no confirmed price")]
    MissingConfirmedPrice,
}

impl DomainError {
    /// Creates an invalid asset transition error.
    #[must_use]
    pub const fn invalid_asset_transition(from: AssetStatus, to: AssetStatus) -> Self {
        Self::InvalidAssetTransition { from, to }
    }

    /// Creates an invalid trade transition error.
    #[must_use]
    pub const fn invalid_trade_transition(from: TradeStatus, to: TradeStatus) -> Self {
        Self::InvalidTradeTransition { from, to }
    }

    /// Creates a missing signatures error.
    #[must_use]
    pub const fn missing_signatures(present: u8, required: u8) -> Self {
        Self::MissingSignatures { present, required }
    }

    /// Returns true if this is a state-transition violation.
    #[must_use]
    pub const fn is_invalid_transition(&self) -> bool {
        matches!(
            self,
            Self::InvalidAssetTransition { .. } | Self::InvalidTradeTransition { .. }
        )
    }

    /// Returns true if this is an idempotency guard (the operation had
    /// already happened).
    #[must_use]
    pub const fn is_already_done(&self) -> bool {
        matches!(self, Self::AlreadySigned(_) | Self::AlreadyCompleted)
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
