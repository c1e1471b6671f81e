//! # Ledger Client Trait
//!
//! Port definition for settlement-ledger interactions.
//!
//! This module defines the [`LedgerClient`] trait that abstracts the
//! on-chain settlement contract: payment submission, state-mutating
//! calls, confirmation waiting and state reads. A transition is only
//! durable once [`wait_for_confirmation`](LedgerClient::wait_for_confirmation)
//! returns a successful receipt; submission alone proves nothing.

use crate::domain::value_objects::{NativeAmount, WalletAddress};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::gas::GasPrice;

/// Supported settlement chains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChainId {
    /// BNB Smart Chain mainnet (chain ID 56).
    Bsc,
    /// BNB Smart Chain testnet (chain ID 97).
    BscTestnet,
    /// Ethereum mainnet (chain ID 1).
    Ethereum,
}

impl ChainId {
    /// Returns the numeric chain ID.
    #[must_use]
    pub const fn as_u64(&self) -> u64 {
        match self {
            Self::Bsc => 56,
            Self::BscTestnet => 97,
            Self::Ethereum => 1,
        }
    }

    /// Creates a `ChainId` from a numeric chain ID.
    ///
    /// # Returns
    ///
    /// `Some(ChainId)` if the chain ID is supported, `None` otherwise.
    #[must_use]
    pub const fn from_u64(chain_id: u64) -> Option<Self> {
        match chain_id {
            56 => Some(Self::Bsc),
            97 => Some(Self::BscTestnet),
            1 => Some(Self::Ethereum),
            _ => None,
        }
    }

    /// Returns the chain name as a string.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Bsc => "bsc",
            Self::BscTestnet => "bsc-testnet",
            Self::Ethereum => "ethereum",
        }
    }

    /// Returns the average block time in milliseconds.
    #[must_use]
    pub const fn block_time_ms(&self) -> u64 {
        match self {
            Self::Bsc | Self::BscTestnet => 3000,
            Self::Ethereum => 12000,
        }
    }

    /// Returns the number of decimals of the native currency.
    #[must_use]
    pub const fn native_decimals(&self) -> u8 {
        18
    }

    /// Returns the symbol of the native currency.
    #[must_use]
    pub const fn native_symbol(&self) -> &'static str {
        match self {
            Self::Bsc => "BNB",
            Self::BscTestnet => "tBNB",
            Self::Ethereum => "ETH",
        }
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Transaction priority for gas pricing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxPriority {
    /// Low priority - slower confirmation.
    Low,
    /// Medium priority - standard confirmation.
    #[default]
    Medium,
    /// High priority - faster confirmation.
    High,
}

impl fmt::Display for TxPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

/// Transaction hash.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxHash(pub String);

impl TxHash {
    /// Creates a new transaction hash.
    #[must_use]
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    /// Returns the hash as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for TxHash {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Transaction receipt with confirmation details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    /// Transaction hash.
    pub tx_hash: TxHash,
    /// Block number where the transaction was included.
    pub block_number: u64,
    /// Gas used by the transaction.
    pub gas_used: u64,
    /// Effective gas price paid.
    pub effective_gas_price: u64,
    /// Whether the transaction succeeded.
    pub success: bool,
}

/// A value crossing the contract boundary, as an argument or a
/// state-read result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallValue {
    /// Unsigned integer (uint256 on the wire).
    Uint(u128),
    /// Wallet address.
    Address(WalletAddress),
    /// UTF-8 string.
    Str(String),
    /// Boolean.
    Bool(bool),
}

impl CallValue {
    /// Extracts an unsigned integer.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Internal` if this value is not a `Uint`.
    pub fn as_uint(&self) -> LedgerResult<u128> {
        match self {
            Self::Uint(v) => Ok(*v),
            other => Err(LedgerError::internal(format!(
                "expected uint, got {other:?}"
            ))),
        }
    }

    /// Extracts a boolean.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Internal` if this value is not a `Bool`.
    pub fn as_bool(&self) -> LedgerResult<bool> {
        match self {
            Self::Bool(v) => Ok(*v),
            other => Err(LedgerError::internal(format!(
                "expected bool, got {other:?}"
            ))),
        }
    }
}

/// Error type for ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// RPC connection error.
    #[error("connection error: {0}")]
    Connection(String),

    /// Transaction submission error.
    #[error("submission error: {0}")]
    Submission(String),

    /// Transaction reverted on-chain; carries the raw revert reason.
    #[error("transaction reverted: {0}")]
    Reverted(String),

    /// No contract code at the configured address.
    #[error("no contract code at {0}")]
    NoContractCode(String),

    /// Caller's balance is below the required value plus fees.
    #[error("insufficient funds on ledger")]
    InsufficientFunds,

    /// Gas estimation error.
    #[error("gas estimation error: {0}")]
    GasEstimation(String),

    /// Timeout waiting for confirmation.
    #[error("timeout: {0}")]
    Timeout(String),

    /// Chain not supported.
    #[error("unsupported chain: {0}")]
    UnsupportedChain(String),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl LedgerError {
    /// Creates a connection error.
    #[must_use]
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a submission error.
    #[must_use]
    pub fn submission(msg: impl Into<String>) -> Self {
        Self::Submission(msg.into())
    }

    /// Creates a reverted error, preserving the raw reason.
    #[must_use]
    pub fn reverted(reason: impl Into<String>) -> Self {
        Self::Reverted(reason.into())
    }

    /// Creates a no-contract-code error.
    #[must_use]
    pub fn no_contract_code(address: impl Into<String>) -> Self {
        Self::NoContractCode(address.into())
    }

    /// Creates a gas estimation error.
    #[must_use]
    pub fn gas_estimation(msg: impl Into<String>) -> Self {
        Self::GasEstimation(msg.into())
    }

    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    /// Creates an unsupported chain error.
    #[must_use]
    pub fn unsupported_chain(msg: impl Into<String>) -> Self {
        Self::UnsupportedChain(msg.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns true if this error is retryable.
    ///
    /// Reverts are never retryable: a funds-moving call must not be
    /// blindly resubmitted.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Timeout(_))
    }
}

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Trait for settlement-ledger operations.
///
/// Provides an abstraction over the on-chain settlement contract so
/// the state machine is independent of the ledger technology.
#[async_trait]
pub trait LedgerClient: Send + Sync + fmt::Debug {
    /// Returns the chain this client is connected to.
    fn chain_id(&self) -> ChainId;

    /// Returns the balance of an address in smallest units.
    ///
    /// # Errors
    ///
    /// Returns an error if the RPC call fails.
    async fn get_balance(&self, address: &WalletAddress) -> LedgerResult<u128>;

    /// Estimates gas for a contract call.
    ///
    /// # Arguments
    ///
    /// * `method` - Contract method name
    /// * `args` - Call arguments
    /// * `value` - Attached value in smallest units
    ///
    /// # Errors
    ///
    /// Returns an error if gas estimation fails.
    async fn estimate_gas(
        &self,
        method: &str,
        args: &[CallValue],
        value: u128,
    ) -> LedgerResult<u64>;

    /// Returns the current gas price.
    ///
    /// # Errors
    ///
    /// Returns an error if the RPC call fails.
    async fn get_gas_price(&self, priority: TxPriority) -> LedgerResult<GasPrice>;

    /// Submits a plain value transfer.
    ///
    /// # Errors
    ///
    /// Returns an error if submission fails.
    async fn submit_payment(
        &self,
        to: &WalletAddress,
        amount: NativeAmount,
    ) -> LedgerResult<TxHash>;

    /// Submits a contract call, optionally carrying value.
    ///
    /// # Errors
    ///
    /// Returns an error if submission fails.
    async fn call(
        &self,
        method: &str,
        args: &[CallValue],
        value: Option<NativeAmount>,
    ) -> LedgerResult<TxHash>;

    /// Reads contract state without submitting a transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the RPC call fails or the contract is absent.
    async fn read_state(&self, method: &str, args: &[CallValue]) -> LedgerResult<CallValue>;

    /// Waits for a transaction to be confirmed.
    ///
    /// # Arguments
    ///
    /// * `tx_hash` - Transaction hash to wait for
    /// * `confirmations` - Number of confirmations to wait for
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Reverted` if the transaction failed, or
    /// `LedgerError::Timeout` if confirmation did not arrive in time.
    async fn wait_for_confirmation(
        &self,
        tx_hash: &TxHash,
        confirmations: u64,
    ) -> LedgerResult<TxReceipt>;

    /// Returns true if contract code exists at the address.
    ///
    /// # Errors
    ///
    /// Returns an error if the RPC call fails.
    async fn has_contract_code(&self, address: &WalletAddress) -> LedgerResult<bool>;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn chain_id_as_u64() {
        assert_eq!(ChainId::Bsc.as_u64(), 56);
        assert_eq!(ChainId::BscTestnet.as_u64(), 97);
        assert_eq!(ChainId::Ethereum.as_u64(), 1);
    }

    #[test]
    fn chain_id_from_u64() {
        assert_eq!(ChainId::from_u64(97), Some(ChainId::BscTestnet));
        assert_eq!(ChainId::from_u64(56), Some(ChainId::Bsc));
        assert_eq!(ChainId::from_u64(1), Some(ChainId::Ethereum));
        assert_eq!(ChainId::from_u64(999), None);
    }

    #[test]
    fn chain_id_display_and_symbol() {
        assert_eq!(ChainId::BscTestnet.to_string(), "bsc-testnet");
        assert_eq!(ChainId::BscTestnet.native_symbol(), "tBNB");
        assert_eq!(ChainId::Bsc.native_symbol(), "BNB");
        assert_eq!(ChainId::Ethereum.native_decimals(), 18);
    }

    #[test]
    fn tx_hash_display() {
        let hash = TxHash::new("0x1234");
        assert_eq!(hash.to_string(), "0x1234");
        assert_eq!(hash.as_str(), "0x1234");
    }

    #[test]
    fn call_value_accessors() {
        assert_eq!(CallValue::Uint(42).as_uint().unwrap(), 42);
        assert!(CallValue::Bool(true).as_bool().unwrap());
        assert!(CallValue::Str("x".into()).as_uint().is_err());
        assert!(CallValue::Uint(1).as_bool().is_err());
    }

    #[test]
    fn reverted_is_never_retryable() {
        assert!(!LedgerError::reverted("out of gas").is_retryable());
        assert!(!LedgerError::InsufficientFunds.is_retryable());
        assert!(LedgerError::connection("refused").is_retryable());
        assert!(LedgerError::timeout("30s").is_retryable());
    }

    #[test]
    fn ledger_error_display() {
        assert_eq!(
            LedgerError::reverted("asset not available").to_string(),
            "transaction reverted: asset not available"
        );
        assert_eq!(
            LedgerError::no_contract_code("0xdead").to_string(),
            "no contract code at 0xdead"
        );
    }

    #[test]
    fn chain_id_serde_roundtrip() {
        let chain = ChainId::BscTestnet;
        let json = serde_json::to_string(&chain).unwrap();
        assert_eq!(json, "\"bsc-testnet\"");
        let deserialized: ChainId = serde_json::from_str(&json).unwrap();
        assert_eq!(chain, deserialized);
    }
}
