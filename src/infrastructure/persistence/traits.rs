//! # Repository Traits
//!
//! Port definitions for persistence abstraction.
//!
//! The store is an eventually-consistent mirror of the ledger: on
//! disagreement the ledger wins and the mirror is resynchronized.
//! Optimistic version locking on `save` is the concurrency discipline:
//! a lost race surfaces as [`RepositoryError::VersionConflict`], never
//! as silently overwritten state.
//!
//! # Available Repositories
//!
//! - [`AssetRepository`]: Persistence for Asset aggregates
//! - [`TradeRepository`]: Persistence for Trade aggregates

use crate::domain::entities::asset::Asset;
use crate::domain::entities::trade::Trade;
use crate::domain::value_objects::{AssetId, AssetStatus, IdempotencyKey, TradeId, TradeStatus, WalletAddress};
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Error type for repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Entity not found.
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound {
        /// Type of entity.
        entity_type: &'static str,
        /// Entity identifier.
        id: String,
    },

    /// Duplicate entity.
    #[error("Duplicate entity: {entity_type} with id {id} already exists")]
    Duplicate {
        /// Type of entity.
        entity_type: &'static str,
        /// Entity identifier.
        id: String,
    },

    /// Optimistic locking conflict.
    #[error("Version conflict: {entity_type} with id {id} has been modified")]
    VersionConflict {
        /// Type of entity.
        entity_type: &'static str,
        /// Entity identifier.
        id: String,
        /// Expected version.
        expected: u64,
        /// Actual version.
        actual: u64,
    },

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query error.
    #[error("Query error: {0}")]
    Query(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RepositoryError {
    /// Creates a not found error.
    #[must_use]
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a duplicate error.
    #[must_use]
    pub fn duplicate(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::Duplicate {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a version conflict error.
    #[must_use]
    pub fn version_conflict(
        entity_type: &'static str,
        id: impl Into<String>,
        expected: u64,
        actual: u64,
    ) -> Self {
        Self::VersionConflict {
            entity_type,
            id: id.into(),
            expected,
            actual,
        }
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a query error.
    #[must_use]
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Creates a serialization error.
    #[must_use]
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns true if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if this is a duplicate error.
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate { .. })
    }

    /// Returns true if this is a version conflict error.
    #[must_use]
    pub fn is_version_conflict(&self) -> bool {
        matches!(self, Self::VersionConflict { .. })
    }
}

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Repository for Asset aggregates.
///
/// # Version Discipline
///
/// `save` expects the aggregate's version to be exactly one ahead of
/// the stored version (entities bump their version on every mutation).
/// Anything else is a [`RepositoryError::VersionConflict`].
#[async_trait]
pub trait AssetRepository: Send + Sync + fmt::Debug {
    /// Saves an asset.
    ///
    /// Inserts when the asset is new (version 1); otherwise replaces
    /// the stored copy if the versions line up.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::VersionConflict` if the asset has been
    /// modified since it was loaded.
    async fn save(&self, asset: &Asset) -> RepositoryResult<()>;

    /// Gets an asset by ID.
    ///
    /// Returns `None` if the asset does not exist.
    async fn get(&self, id: AssetId) -> RepositoryResult<Option<Asset>>;

    /// Finds assets in the given status.
    async fn find_by_status(&self, status: AssetStatus) -> RepositoryResult<Vec<Asset>>;

    /// Finds assets owned by the given wallet.
    async fn find_by_owner(&self, owner: &WalletAddress) -> RepositoryResult<Vec<Asset>>;

    /// Finds the asset registered under the given idempotency key.
    ///
    /// Returns `None` if no registration used the key.
    async fn find_by_idempotency_key(
        &self,
        key: &IdempotencyKey,
    ) -> RepositoryResult<Option<Asset>>;

    /// Counts all assets.
    async fn count(&self) -> RepositoryResult<u64>;
}

/// Repository for Trade aggregates.
#[async_trait]
pub trait TradeRepository: Send + Sync + fmt::Debug {
    /// Saves a trade.
    ///
    /// Same version discipline as [`AssetRepository::save`].
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::VersionConflict` if the trade has been
    /// modified since it was loaded.
    async fn save(&self, trade: &Trade) -> RepositoryResult<()>;

    /// Gets a trade by ID.
    ///
    /// Returns `None` if the trade does not exist.
    async fn get(&self, id: TradeId) -> RepositoryResult<Option<Trade>>;

    /// Finds the open (non-terminal) trade against an asset, if any.
    ///
    /// At most one open trade per asset is a system invariant.
    async fn find_open_by_asset(&self, asset_id: AssetId) -> RepositoryResult<Option<Trade>>;

    /// Finds every trade against an asset, open or settled.
    async fn find_by_asset(&self, asset_id: AssetId) -> RepositoryResult<Vec<Trade>>;

    /// Finds trades in the given status.
    async fn find_by_status(&self, status: TradeStatus) -> RepositoryResult<Vec<Trade>>;

    /// Counts all trades.
    async fn count(&self) -> RepositoryResult<u64>;
}
