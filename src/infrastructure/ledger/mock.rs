//! # Mock Ledger Client
//!
//! Scriptable in-process [`LedgerClient`] for tests and benches.
//!
//! Records every submitted call and payment, serves configured
//! balances and state reads, and can be told to fail the next
//! submission. Confirmation always succeeds immediately unless a
//! failure was injected.

use super::client::{
    CallValue, ChainId, LedgerClient, LedgerError, LedgerResult, TxHash, TxPriority, TxReceipt,
};
use super::gas::GasPrice;
use crate::domain::value_objects::{NativeAmount, WalletAddress};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;

/// A contract call recorded by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// Contract method name.
    pub method: String,
    /// Call arguments.
    pub args: Vec<CallValue>,
    /// Attached value, if any.
    pub value: Option<NativeAmount>,
}

/// In-process ledger double.
///
/// # Examples
///
/// ```
/// use wellswap_settlement::infrastructure::ledger::mock::MockLedgerClient;
/// use wellswap_settlement::infrastructure::ledger::client::CallValue;
///
/// let ledger = MockLedgerClient::new();
/// ledger.set_read_state("lastAssetId", CallValue::Uint(1));
/// ```
#[derive(Debug, Default)]
pub struct MockLedgerClient {
    balances: Mutex<HashMap<WalletAddress, u128>>,
    reads: Mutex<HashMap<String, CallValue>>,
    calls: Mutex<Vec<RecordedCall>>,
    payments: Mutex<Vec<(WalletAddress, NativeAmount)>>,
    fail_next: Mutex<Option<LedgerError>>,
    tx_counter: Mutex<u64>,
    gas_price: Mutex<u64>,
}

impl MockLedgerClient {
    /// Balance served for addresses with no configured balance.
    pub const DEFAULT_BALANCE: u128 = 1_000_000_000_000_000_000_000;

    /// Gas the mock reports for every estimate.
    pub const GAS_ESTIMATE: u64 = 100_000;

    /// Creates a mock with default balances and a 1 gwei gas price.
    #[must_use]
    pub fn new() -> Self {
        Self {
            gas_price: Mutex::new(1_000_000_000),
            ..Self::default()
        }
    }

    /// Sets the balance served for an address.
    pub fn set_balance(&self, address: WalletAddress, balance: u128) {
        self.balances.lock().insert(address, balance);
    }

    /// Sets the value served by `read_state` for a method.
    pub fn set_read_state(&self, method: impl Into<String>, value: CallValue) {
        self.reads.lock().insert(method.into(), value);
    }

    /// Makes the next submitted call or payment fail with the error.
    pub fn fail_next_call(&self, error: LedgerError) {
        *self.fail_next.lock() = Some(error);
    }

    /// Returns every recorded contract call.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    /// Returns recorded calls to a specific method.
    #[must_use]
    pub fn calls_to(&self, method: &str) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.method == method)
            .cloned()
            .collect()
    }

    /// Returns every recorded plain payment.
    #[must_use]
    pub fn payments(&self) -> Vec<(WalletAddress, NativeAmount)> {
        self.payments.lock().clone()
    }

    fn take_injected_failure(&self) -> Option<LedgerError> {
        self.fail_next.lock().take()
    }

    fn next_tx_hash(&self) -> TxHash {
        let mut counter = self.tx_counter.lock();
        *counter += 1;
        TxHash::new(format!("0xmock{counter:04}"))
    }
}

#[async_trait]
impl LedgerClient for MockLedgerClient {
    fn chain_id(&self) -> ChainId {
        ChainId::BscTestnet
    }

    async fn get_balance(&self, address: &WalletAddress) -> LedgerResult<u128> {
        Ok(self
            .balances
            .lock()
            .get(address)
            .copied()
            .unwrap_or(Self::DEFAULT_BALANCE))
    }

    async fn estimate_gas(
        &self,
        _method: &str,
        _args: &[CallValue],
        _value: u128,
    ) -> LedgerResult<u64> {
        Ok(Self::GAS_ESTIMATE)
    }

    async fn get_gas_price(&self, _priority: TxPriority) -> LedgerResult<GasPrice> {
        Ok(GasPrice::new(*self.gas_price.lock()))
    }

    async fn submit_payment(
        &self,
        to: &WalletAddress,
        amount: NativeAmount,
    ) -> LedgerResult<TxHash> {
        if let Some(error) = self.take_injected_failure() {
            return Err(error);
        }
        self.payments.lock().push((to.clone(), amount));
        Ok(self.next_tx_hash())
    }

    async fn call(
        &self,
        method: &str,
        args: &[CallValue],
        value: Option<NativeAmount>,
    ) -> LedgerResult<TxHash> {
        if let Some(error) = self.take_injected_failure() {
            return Err(error);
        }
        self.calls.lock().push(RecordedCall {
            method: method.to_string(),
            args: args.to_vec(),
            value,
        });
        Ok(self.next_tx_hash())
    }

    async fn read_state(&self, method: &str, _args: &[CallValue]) -> LedgerResult<CallValue> {
        self.reads
            .lock()
            .get(method)
            .cloned()
            .ok_or_else(|| LedgerError::internal(format!("no mock state for {method}")))
    }

    async fn wait_for_confirmation(
        &self,
        tx_hash: &TxHash,
        _confirmations: u64,
    ) -> LedgerResult<TxReceipt> {
        if let Some(error) = self.take_injected_failure() {
            return Err(error);
        }
        Ok(TxReceipt {
            tx_hash: tx_hash.clone(),
            block_number: 1,
            gas_used: Self::GAS_ESTIMATE,
            effective_gas_price: *self.gas_price.lock(),
            success: true,
        })
    }

    async fn has_contract_code(&self, _address: &WalletAddress) -> LedgerResult<bool> {
        Ok(true)
    }
}
