//! # Value Objects
//!
//! Immutable types with validation and domain semantics.
//!
//! ## Identity Types
//!
//! - [`AssetId`], [`TradeId`]: ledger-assigned u64 identifiers
//! - [`EventId`]: domain event identifier
//! - [`IdempotencyKey`]: client-supplied registration dedup key
//!
//! ## Money
//!
//! - [`FiatAmount`]: integer fiat cents
//! - [`NativeAmount`]: integer ledger smallest units
//! - [`NativeQuote`]: fixed-point fiat ⇄ native conversion
//!
//! ## State Machines
//!
//! - [`AssetStatus`]: asset lifecycle
//! - [`TradeStatus`], [`SignerRole`]: trade lifecycle and signatures
//!
//! ## Arithmetic
//!
//! - [`ArithmeticError`], [`CheckedArithmetic`]: safe integer arithmetic

pub mod address;
pub mod admin;
pub mod arithmetic;
pub mod asset_status;
pub mod ids;
pub mod money;
pub mod timestamp;
pub mod trade_status;
pub mod valuation;

pub use address::WalletAddress;
pub use admin::AdminSet;
pub use arithmetic::{ArithmeticError, ArithmeticResult, CheckedArithmetic};
pub use asset_status::AssetStatus;
pub use ids::{AssetId, EventId, IdempotencyKey, TradeId};
pub use money::{FiatAmount, NativeAmount, NativeQuote};
pub use timestamp::{Clock, FixedClock, SystemClock, Timestamp};
pub use trade_status::{SignerRole, TradeStatus};
pub use valuation::{ConfidenceScore, RiskGrade, Valuation};
