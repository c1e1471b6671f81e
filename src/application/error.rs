//! # Application Errors
//!
//! Error taxonomy for settlement operations.
//!
//! Every failure maps to a specific cause the caller can act on:
//! insufficient balance, wrong state, already-signed, deadline not
//! reached, never a generic failure. Validation and precondition
//! failures are resolved before any external call; ledger reverts are
//! surfaced verbatim and never retried automatically.
//!
//! # Error Hierarchy
//!
//! ```text
//! SettlementError
//! ├── Domain(DomainError)         - state machine / validation violations
//! ├── Ledger(LedgerError)         - chain unreachable, reverted, timed out
//! ├── Oracle(OracleError)         - no usable price
//! ├── Repository(RepositoryError) - mirror store failures
//! └── ... (specific guard variants)
//! ```

use crate::application::services::conversion::OracleError;
use crate::domain::errors::DomainError;
use crate::domain::value_objects::{AssetId, NativeAmount, TradeId};
use crate::infrastructure::ledger::client::LedgerError;
use crate::infrastructure::persistence::traits::RepositoryError;
use thiserror::Error;

/// Settlement operation error.
#[derive(Debug, Error)]
pub enum SettlementError {
    /// Business-rule violation from the domain layer.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// Ledger interaction failure.
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// Price oracle failure.
    #[error("oracle error: {0}")]
    Oracle(#[from] OracleError),

    /// Mirror store failure.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Request validation failed before any external call.
    #[error("validation error: {0}")]
    Validation(String),

    /// Caller lacks the required role for this operation.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Asset not found.
    #[error("asset not found: {0}")]
    AssetNotFound(AssetId),

    /// Trade not found.
    #[error("trade not found: {0}")]
    TradeNotFound(TradeId),

    /// The asset already has an open trade or was claimed concurrently.
    #[error("asset not available for trading: {0}")]
    AssetNotAvailable(AssetId),

    /// Caller's balance is below the payment plus estimated fees.
    #[error("insufficient funds: required {required}, available {available}")]
    InsufficientFunds {
        /// Amount needed in smallest units.
        required: NativeAmount,
        /// Balance in smallest units.
        available: NativeAmount,
    },

    /// The operation has already been processed for this asset.
    #[error("already processed for asset {0}")]
    AlreadyProcessed(AssetId),

    /// The refund deadline has not passed yet.
    #[error("refund deadline not reached: {days_remaining} day(s) remaining")]
    DeadlineNotReached {
        /// Whole days until the asset becomes eligible.
        days_remaining: u32,
    },

    /// Escrow held on the ledger is below the refund amount.
    #[error("insufficient escrow: held {held}, required {required}")]
    InsufficientEscrow {
        /// Escrow currently held.
        held: NativeAmount,
        /// Refund amount required.
        required: NativeAmount,
    },
}

impl SettlementError {
    /// Creates a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates an unauthorized error.
    #[must_use]
    pub fn unauthorized(action: impl Into<String>) -> Self {
        Self::Unauthorized(action.into())
    }

    /// Creates an insufficient funds error.
    #[must_use]
    pub const fn insufficient_funds(required: NativeAmount, available: NativeAmount) -> Self {
        Self::InsufficientFunds {
            required,
            available,
        }
    }

    /// Returns true if the failure may succeed on plain retry.
    ///
    /// Reverts and guard failures never qualify.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Ledger(e) => e.is_retryable(),
            Self::Repository(e) => matches!(e, RepositoryError::Connection(_)),
            _ => false,
        }
    }

    /// Returns true if this is a not-found error.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::AssetNotFound(_) | Self::TradeNotFound(_))
    }

    /// Returns true if this is a precondition failure (wrong state for
    /// the requested transition), resolved before any external call.
    #[must_use]
    pub fn is_precondition_failure(&self) -> bool {
        match self {
            Self::Domain(e) => e.is_invalid_transition() || e.is_already_done(),
            Self::AssetNotAvailable(_) => true,
            _ => false,
        }
    }

    /// Returns true if this is an idempotency guard.
    #[must_use]
    pub fn is_already_done(&self) -> bool {
        match self {
            Self::Domain(e) => e.is_already_done(),
            Self::AlreadyProcessed(_) => true,
            _ => false,
        }
    }
}

/// Result type for settlement operations.
pub type SettlementResult<T> = Result<T, SettlementError>;
