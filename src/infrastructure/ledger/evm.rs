//! # EVM Ledger Client
//!
//! EVM client implementation using ethers-rs.
//!
//! Targets the BSC deployment of the settlement contract; Ethereum
//! mainnet is supported with the same legacy gas pricing. Provides RPC
//! failover across backup endpoints and buffered gas estimation.

use super::client::{
    CallValue, ChainId, LedgerClient, LedgerError, LedgerResult, TxHash, TxPriority, TxReceipt,
};
use super::gas::{GasEstimator, GasPrice};
use crate::domain::value_objects::{NativeAmount, WalletAddress};
use async_trait::async_trait;
use ethers::abi::{parse_abi, Token};
use ethers::contract::BaseContract;
use ethers::prelude::*;
use ethers::types::transaction::eip2718::TypedTransaction;
use std::fmt;
use std::time::Duration;

/// Human-readable ABI of the settlement contract surface this client
/// drives. Kept minimal: only the methods the state machine calls.
const SETTLEMENT_ABI: &[&str] = &[
    "function registerAsset(string companyName, string productName, string category, uint256 contractDate, uint256 contractPeriodMonths, uint256 paidPeriodMonths, uint256 annualPremiumCents, uint256 totalPaidCents) payable",
    "function updateAiEvaluation(uint256 assetId, uint256 aiValueCents, uint256 riskGrade, uint256 confidence)",
    "function confirmPlatformPrice(uint256 assetId, uint256 priceCents)",
    "function listAsset(uint256 assetId)",
    "function cancelListing(uint256 assetId)",
    "function createTrade(uint256 assetId, address buyer, uint256 agreedPriceCents)",
    "function signTrade(uint256 tradeId, uint256 totalPaymentCents) payable",
    "function platformSign(uint256 tradeId)",
    "function completeTrade(uint256 tradeId)",
    "function cancelTrade(uint256 tradeId, string reason)",
    "function processRefund(uint256 assetId)",
    "function escrowOf(address payer) view returns (uint256)",
    "function lastAssetId() view returns (uint256)",
    "function lastTradeId() view returns (uint256)",
];

/// How many poll intervals to wait for a confirmation before timing out.
const CONFIRMATION_POLL_LIMIT: u64 = 40;

/// EVM ledger client backed by ethers-rs.
///
/// Submits signed transactions through a [`SignerMiddleware`] and polls
/// for receipts until the requested confirmation depth is reached.
pub struct EvmLedgerClient {
    chain_id: ChainId,
    client: SignerMiddleware<Provider<Http>, LocalWallet>,
    backup_urls: Vec<String>,
    contract_address: Address,
    contract: BaseContract,
    gas_estimator: GasEstimator,
}

impl EvmLedgerClient {
    /// Creates a new EVM ledger client.
    ///
    /// # Arguments
    ///
    /// * `chain_id` - The chain to connect to
    /// * `rpc_url` - Primary RPC endpoint URL
    /// * `backup_urls` - Backup RPC URLs for failover
    /// * `contract_address` - Deployed settlement contract address
    /// * `signer_key` - Hex private key of the submitting wallet
    ///
    /// # Errors
    ///
    /// Returns an error if the provider, wallet or ABI cannot be built.
    pub fn new(
        chain_id: ChainId,
        rpc_url: &str,
        backup_urls: Vec<String>,
        contract_address: &WalletAddress,
        signer_key: &str,
    ) -> LedgerResult<Self> {
        let provider = Provider::<Http>::try_from(rpc_url)
            .map_err(|e| LedgerError::connection(e.to_string()))?;
        let wallet = signer_key
            .parse::<LocalWallet>()
            .map_err(|e| LedgerError::internal(format!("invalid signer key: {e}")))?
            .with_chain_id(chain_id.as_u64());
        let client = SignerMiddleware::new(provider, wallet);
        let abi = parse_abi(SETTLEMENT_ABI)
            .map_err(|e| LedgerError::internal(format!("abi parse failed: {e}")))?;
        let contract_address = parse_address(contract_address)?;

        Ok(Self {
            chain_id,
            client,
            backup_urls,
            contract_address,
            contract: BaseContract::from(abi),
            gas_estimator: GasEstimator::default(),
        })
    }

    /// Returns the gas estimator.
    #[must_use]
    pub fn gas_estimator(&self) -> &GasEstimator {
        &self.gas_estimator
    }

    /// Returns the backup RPC URLs.
    #[must_use]
    pub fn backup_urls(&self) -> &[String] {
        &self.backup_urls
    }

    /// Attempts to switch to a backup provider.
    ///
    /// # Errors
    ///
    /// Returns an error if no backup providers are available or all fail.
    pub async fn try_failover(&mut self) -> LedgerResult<()> {
        for url in &self.backup_urls {
            match Provider::<Http>::try_from(url.as_str()) {
                Ok(provider) => {
                    if provider.get_block_number().await.is_ok() {
                        let wallet = self.client.signer().clone();
                        self.client = SignerMiddleware::new(provider, wallet);
                        return Ok(());
                    }
                }
                Err(_) => continue,
            }
        }

        Err(LedgerError::connection(
            "all backup providers failed".to_string(),
        ))
    }

    fn encode_call(&self, method: &str, args: &[CallValue]) -> LedgerResult<Bytes> {
        let tokens = args
            .iter()
            .map(to_token)
            .collect::<LedgerResult<Vec<Token>>>()?;
        self.contract
            .encode(method, tokens)
            .map_err(|e| LedgerError::internal(format!("encode {method} failed: {e}")))
    }

    fn build_tx(&self, data: Bytes, value: u128) -> TypedTransaction {
        TransactionRequest::new()
            .to(self.contract_address)
            .data(data)
            .value(U256::from(value))
            .into()
    }

    async fn send(&self, tx: TypedTransaction) -> LedgerResult<TxHash> {
        let pending = self
            .client
            .send_transaction(tx, None)
            .await
            .map_err(|e| map_send_error(e.to_string()))?;
        Ok(TxHash::new(format!("{:#x}", *pending)))
    }
}

impl fmt::Debug for EvmLedgerClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvmLedgerClient")
            .field("chain_id", &self.chain_id)
            .field("contract_address", &self.contract_address)
            .field("backup_urls", &self.backup_urls.len())
            .finish()
    }
}

#[async_trait]
impl LedgerClient for EvmLedgerClient {
    fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    async fn get_balance(&self, address: &WalletAddress) -> LedgerResult<u128> {
        let addr = parse_address(address)?;
        let balance = self
            .client
            .get_balance(addr, None)
            .await
            .map_err(|e| LedgerError::connection(e.to_string()))?;
        Ok(balance.as_u128())
    }

    async fn estimate_gas(
        &self,
        method: &str,
        args: &[CallValue],
        value: u128,
    ) -> LedgerResult<u64> {
        let data = self.encode_call(method, args)?;
        let tx = self.build_tx(data, value);
        let raw = self
            .client
            .estimate_gas(&tx, None)
            .await
            .map_err(|e| LedgerError::gas_estimation(e.to_string()))?;
        Ok(self.gas_estimator.with_buffer(raw.as_u64()))
    }

    async fn get_gas_price(&self, priority: TxPriority) -> LedgerResult<GasPrice> {
        let base = self
            .client
            .get_gas_price()
            .await
            .map_err(|e| LedgerError::connection(e.to_string()))?;

        let multiplier = match priority {
            TxPriority::Low => 90,
            TxPriority::Medium => 100,
            TxPriority::High => 120,
        };
        let adjusted = base.as_u64() / 100 * multiplier;
        Ok(GasPrice::new(adjusted))
    }

    async fn submit_payment(
        &self,
        to: &WalletAddress,
        amount: NativeAmount,
    ) -> LedgerResult<TxHash> {
        let to = parse_address(to)?;
        let tx: TypedTransaction = TransactionRequest::new()
            .to(to)
            .value(U256::from(amount.value()))
            .into();
        self.send(tx).await
    }

    async fn call(
        &self,
        method: &str,
        args: &[CallValue],
        value: Option<NativeAmount>,
    ) -> LedgerResult<TxHash> {
        let data = self.encode_call(method, args)?;
        let tx = self.build_tx(data, value.map_or(0, |v| v.value()));
        self.send(tx).await
    }

    async fn read_state(&self, method: &str, args: &[CallValue]) -> LedgerResult<CallValue> {
        if !self.has_contract_code(&evm_wallet_address(self.contract_address)?).await? {
            return Err(LedgerError::no_contract_code(format!(
                "{:#x}",
                self.contract_address
            )));
        }
        let data = self.encode_call(method, args)?;
        let tx = self.build_tx(data, 0);
        let output = self
            .client
            .call(&tx, None)
            .await
            .map_err(|e| LedgerError::connection(e.to_string()))?;

        let function = self
            .contract
            .abi()
            .function(method)
            .map_err(|e| LedgerError::internal(format!("unknown method {method}: {e}")))?;
        let mut tokens = function
            .decode_output(&output)
            .map_err(|e| LedgerError::internal(format!("decode {method} failed: {e}")))?;
        let token = tokens
            .pop()
            .ok_or_else(|| LedgerError::internal(format!("{method} returned no value")))?;
        from_token(token)
    }

    async fn wait_for_confirmation(
        &self,
        tx_hash: &TxHash,
        confirmations: u64,
    ) -> LedgerResult<TxReceipt> {
        let hash: H256 = tx_hash
            .as_str()
            .parse()
            .map_err(|_| LedgerError::internal(format!("bad tx hash: {tx_hash}")))?;
        let poll_interval = Duration::from_millis(self.chain_id.block_time_ms());

        for _ in 0..CONFIRMATION_POLL_LIMIT.saturating_mul(confirmations.max(1)) {
            let receipt = self
                .client
                .get_transaction_receipt(hash)
                .await
                .map_err(|e| LedgerError::connection(e.to_string()))?;

            if let Some(receipt) = receipt {
                let mined_in = receipt
                    .block_number
                    .ok_or_else(|| LedgerError::internal("receipt without block number"))?
                    .as_u64();
                let head = self
                    .client
                    .get_block_number()
                    .await
                    .map_err(|e| LedgerError::connection(e.to_string()))?
                    .as_u64();

                if head.saturating_sub(mined_in) + 1 >= confirmations.max(1) {
                    let success = receipt.status == Some(1.into());
                    let result = TxReceipt {
                        tx_hash: tx_hash.clone(),
                        block_number: mined_in,
                        gas_used: receipt.gas_used.unwrap_or_default().as_u64(),
                        effective_gas_price: receipt
                            .effective_gas_price
                            .unwrap_or_default()
                            .as_u64(),
                        success,
                    };
                    if !success {
                        return Err(LedgerError::reverted(format!(
                            "transaction {tx_hash} reverted in block {mined_in}"
                        )));
                    }
                    return Ok(result);
                }
            }
            tokio::time::sleep(poll_interval).await;
        }

        Err(LedgerError::timeout(format!(
            "no confirmation for {tx_hash} after {CONFIRMATION_POLL_LIMIT} polls"
        )))
    }

    async fn has_contract_code(&self, address: &WalletAddress) -> LedgerResult<bool> {
        let addr = parse_address(address)?;
        let code = self
            .client
            .get_code(addr, None)
            .await
            .map_err(|e| LedgerError::connection(e.to_string()))?;
        Ok(!code.is_empty())
    }
}

fn parse_address(address: &WalletAddress) -> LedgerResult<Address> {
    address
        .as_str()
        .parse()
        .map_err(|_| LedgerError::internal(format!("bad address: {address}")))
}

fn evm_wallet_address(address: Address) -> LedgerResult<WalletAddress> {
    WalletAddress::parse(format!("{address:#x}"))
        .map_err(|e| LedgerError::internal(e.to_string()))
}

fn to_token(value: &CallValue) -> LedgerResult<Token> {
    Ok(match value {
        CallValue::Uint(v) => Token::Uint(U256::from(*v)),
        CallValue::Address(addr) => Token::Address(parse_address(addr)?),
        CallValue::Str(s) => Token::String(s.clone()),
        CallValue::Bool(b) => Token::Bool(*b),
    })
}

fn from_token(token: Token) -> LedgerResult<CallValue> {
    match token {
        Token::Uint(v) => Ok(CallValue::Uint(v.as_u128())),
        Token::Address(addr) => Ok(CallValue::Address(evm_wallet_address(addr)?)),
        Token::String(s) => Ok(CallValue::Str(s)),
        Token::Bool(b) => Ok(CallValue::Bool(b)),
        other => Err(LedgerError::internal(format!(
            "unsupported return token: {other:?}"
        ))),
    }
}

fn map_send_error(message: String) -> LedgerError {
    let lower = message.to_lowercase();
    if lower.contains("revert") {
        LedgerError::reverted(message)
    } else if lower.contains("insufficient funds") {
        LedgerError::InsufficientFunds
    } else {
        LedgerError::submission(message)
    }
}
