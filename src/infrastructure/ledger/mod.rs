//! # Ledger Clients
//!
//! Clients for on-chain settlement on EVM networks.
//!
//! ## Available Components
//!
//! - [`LedgerClient`]: Trait for settlement-ledger interactions
//! - [`EvmLedgerClient`]: ethers-based EVM implementation
//! - [`MockLedgerClient`]: scriptable test double
//! - [`GasPrice`], [`GasEstimator`]: legacy gas pricing with buffer
//! - [`ChainId`]: supported chains (BSC mainnet/testnet, Ethereum)

pub mod client;
pub mod evm;
pub mod gas;
pub mod mock;

pub use client::{
    CallValue, ChainId, LedgerClient, LedgerError, LedgerResult, TxHash, TxPriority, TxReceipt,
};
pub use evm::EvmLedgerClient;
pub use gas::{GasEstimator, GasPrice};
pub use mock::{MockLedgerClient, RecordedCall};
