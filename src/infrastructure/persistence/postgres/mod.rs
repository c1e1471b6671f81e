//! # PostgreSQL Repositories
//!
//! Durable sqlx-backed implementations of the repository ports.
//!
//! Aggregates are stored as serialized payloads next to the indexed
//! columns the queries filter on; optimistic locking is enforced with
//! version-guarded updates.

pub mod asset_repository;
pub mod trade_repository;

pub use asset_repository::PostgresAssetRepository;
pub use trade_repository::PostgresTradeRepository;
