//! # Infrastructure Layer
//!
//! Adapters behind the domain and application ports.
//!
//! - [`ledger`]: EVM settlement ledger (ethers) plus a scriptable mock
//! - [`oracle`]: REST and on-chain quote sources
//! - [`persistence`]: in-memory and PostgreSQL mirror repositories
//! - [`notify`]: fire-and-forget notification sinks
//! - [`config`]: layered settings

pub mod config;
pub mod ledger;
pub mod notify;
pub mod oracle;
pub mod persistence;
