//! # Settlement Service
//!
//! Orchestrates the multi-stage multisig settlement of insurance
//! assets: registration → AI evaluation → price confirmation → listing
//! → trade creation → dual signature → completion or cancellation.
//!
//! # Two-Phase Discipline
//!
//! Every state-changing operation follows the same shape:
//!
//! 1. validate locally and re-read current state (status guard);
//! 2. submit the ledger call and block until it confirms;
//! 3. only then persist the mirror and emit the notification.
//!
//! Submission is not success: a failed or timed-out call leaves the
//! prior confirmed state untouched. Notification delivery is
//! fire-and-forget: a sink failure is logged and never rolls back the
//! transition.
//!
//! # Stage Diagram
//!
//! ```text
//! register_asset        seller pays the registration fee
//! submit_evaluation     admin attaches the AI valuation
//! confirm_platform_price  admin fixes the trade price
//! list_asset            owner lists for sale
//! create_trade          buyer is matched, asset reserved
//! sign_as_buyer         payment escrowed with the signature
//! sign_as_platform      co-signature reaches the threshold
//! complete_trade        escrow released to seller minus commission
//! cancel_trade          platform abort, escrow refunded
//! ```

use crate::application::error::{SettlementError, SettlementResult};
use crate::application::services::conversion::FiatConverter;
use crate::domain::entities::asset::{Asset, AssetDraft};
use crate::domain::entities::trade::Trade;
use crate::domain::errors::DomainError;
use crate::domain::events::asset_events::{
    AiEvaluationSubmitted, AssetCancelled, AssetEvent, AssetListed, AssetRegistered,
    PlatformPriceConfirmed,
};
use crate::domain::events::trade_events::{
    TradeCancelled, TradeCompleted, TradeCreated, TradeEvent, TradeSigned,
};
use crate::domain::events::SettlementEvent;
use crate::domain::value_objects::{
    AdminSet, AssetId, AssetStatus, Clock, FiatAmount, IdempotencyKey, NativeAmount, SignerRole,
    TradeId, Valuation, WalletAddress,
};
use crate::infrastructure::ledger::client::{
    CallValue, LedgerClient, TxHash, TxPriority, TxReceipt,
};
use crate::infrastructure::notify::NotificationSink;
use crate::infrastructure::persistence::traits::{
    AssetRepository, RepositoryError, TradeRepository,
};
use std::sync::Arc;

/// Configuration for the settlement service.
#[derive(Debug, Clone)]
pub struct SettlementConfig {
    /// Wallet receiving registration fees and commissions.
    pub platform_wallet: WalletAddress,
    /// Flat registration fee charged to sellers.
    pub registration_fee: FiatAmount,
    /// Flat platform fee added to the buyer's payment.
    pub platform_fee: FiatAmount,
    /// Commission on escrow release, in basis points.
    pub commission_bps: u32,
    /// Confirmation depth required before a transition is durable.
    pub confirmations: u64,
}

impl SettlementConfig {
    /// Registration fee charged when none is configured: 300 USD.
    pub const DEFAULT_REGISTRATION_FEE: FiatAmount = FiatAmount::from_cents(30_000);

    /// Default commission: 1% of the escrow.
    pub const DEFAULT_COMMISSION_BPS: u32 = 100;

    /// Creates a config with default fees and a single confirmation.
    #[must_use]
    pub fn new(platform_wallet: WalletAddress) -> Self {
        Self {
            platform_wallet,
            registration_fee: Self::DEFAULT_REGISTRATION_FEE,
            platform_fee: FiatAmount::ZERO,
            commission_bps: Self::DEFAULT_COMMISSION_BPS,
            confirmations: 1,
        }
    }
}

/// The settlement state machine, wired to its collaborators.
///
/// Holds the ledger client (source of truth), the mirror repositories,
/// the fiat converter, the notification sink and the admin allow-list.
pub struct SettlementService {
    ledger: Arc<dyn LedgerClient>,
    assets: Arc<dyn AssetRepository>,
    trades: Arc<dyn TradeRepository>,
    converter: Arc<FiatConverter>,
    notifier: Arc<dyn NotificationSink>,
    admins: AdminSet,
    clock: Arc<dyn Clock>,
    config: SettlementConfig,
}

impl SettlementService {
    /// Creates a settlement service.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        ledger: Arc<dyn LedgerClient>,
        assets: Arc<dyn AssetRepository>,
        trades: Arc<dyn TradeRepository>,
        converter: Arc<FiatConverter>,
        notifier: Arc<dyn NotificationSink>,
        admins: AdminSet,
        clock: Arc<dyn Clock>,
        config: SettlementConfig,
    ) -> Self {
        Self {
            ledger,
            assets,
            trades,
            converter,
            notifier,
            admins,
            clock,
            config,
        }
    }

    /// Registers a new asset, paying the registration fee.
    ///
    /// Converts the configured fee to native units, checks the seller's
    /// balance against fee plus gas, submits the payment-carrying
    /// `registerAsset` call and persists the asset once confirmed.
    ///
    /// # Errors
    ///
    /// `AlreadyProcessed` for a duplicate idempotency key,
    /// `InsufficientFunds` if the balance cannot cover fee plus gas,
    /// an oracle error if no price source responds, and a ledger error
    /// for any on-chain rejection (raw reason preserved).
    pub async fn register_asset(
        &self,
        seller: WalletAddress,
        draft: AssetDraft,
        idempotency_key: Option<IdempotencyKey>,
    ) -> SettlementResult<Asset> {
        draft.validate()?;
        if let Some(key) = &idempotency_key {
            if let Some(existing) = self.assets.find_by_idempotency_key(key).await? {
                return Err(SettlementError::AlreadyProcessed(existing.id()));
            }
        }

        let fee_native = self.converter.to_native(self.config.registration_fee).await?;
        let contract_date = u128::try_from(draft.contract_date.timestamp_secs())
            .map_err(|_| SettlementError::validation("contract date before epoch"))?;
        let args = vec![
            CallValue::Str(draft.company_name.clone()),
            CallValue::Str(draft.product_name.clone()),
            CallValue::Str(draft.category.clone()),
            CallValue::Uint(contract_date),
            CallValue::Uint(u128::from(draft.contract_period_months)),
            CallValue::Uint(u128::from(draft.paid_period_months)),
            CallValue::Uint(u128::from(draft.annual_premium.cents())),
            CallValue::Uint(u128::from(draft.total_paid.cents())),
        ];
        self.ensure_funds(&seller, fee_native, "registerAsset", &args)
            .await?;

        let tx = self
            .ledger
            .call("registerAsset", &args, Some(fee_native))
            .await?;
        self.confirm(&tx).await?;

        let asset_id = AssetId::new(self.read_u64("lastAssetId").await?);
        let asset = Asset::register(
            asset_id,
            seller.clone(),
            draft,
            idempotency_key,
            self.clock.now(),
        )?;
        self.assets.save(&asset).await?;

        tracing::info!(
            asset_id = %asset_id,
            seller = %seller,
            fee = %self.config.registration_fee,
            tx = %tx,
            "asset registered"
        );
        self.notify(AssetEvent::Registered(AssetRegistered::new(
            asset_id,
            seller,
            asset.draft().company_name.clone(),
            self.config.registration_fee,
            tx.as_str(),
        )))
        .await;

        Ok(asset)
    }

    /// Attaches the AI valuation to a registered asset. Admin-only.
    ///
    /// # Errors
    ///
    /// `Unauthorized` for non-admin callers, a domain error unless the
    /// asset is in `Registered`, and ledger errors on rejection.
    pub async fn submit_evaluation(
        &self,
        caller: &WalletAddress,
        asset_id: AssetId,
        valuation: Valuation,
    ) -> SettlementResult<Asset> {
        self.ensure_admin(caller, "submit evaluation")?;
        let asset = self.load_asset(asset_id).await?;

        let mut updated = asset.clone();
        updated.submit_evaluation(valuation.clone())?;

        let args = vec![
            CallValue::Uint(u128::from(asset_id.value())),
            CallValue::Uint(u128::from(valuation.ai_value().cents())),
            CallValue::Uint(u128::from(valuation.risk_grade().value())),
            CallValue::Uint(u128::from(valuation.confidence().value())),
        ];
        let tx = self.ledger.call("updateAiEvaluation", &args, None).await?;
        self.confirm(&tx).await?;

        self.assets.save(&updated).await?;
        tracing::info!(asset_id = %asset_id, ai_value = %valuation.ai_value(), "evaluation submitted");
        self.notify(AssetEvent::Evaluated(AiEvaluationSubmitted::new(
            asset_id,
            valuation.ai_value(),
            valuation.risk_grade(),
            valuation.confidence(),
        )))
        .await;

        Ok(updated)
    }

    /// Confirms the platform price for an evaluated asset. Admin-only.
    ///
    /// The confirmed price becomes the agreed price of any trade
    /// created against this asset.
    ///
    /// # Errors
    ///
    /// `Unauthorized` for non-admin callers, a domain error unless the
    /// asset is in `AiEvaluated`, and ledger errors on rejection.
    pub async fn confirm_platform_price(
        &self,
        caller: &WalletAddress,
        asset_id: AssetId,
        price: FiatAmount,
    ) -> SettlementResult<Asset> {
        self.ensure_admin(caller, "confirm platform price")?;
        let asset = self.load_asset(asset_id).await?;

        let mut updated = asset.clone();
        updated.confirm_price(price)?;

        let args = vec![
            CallValue::Uint(u128::from(asset_id.value())),
            CallValue::Uint(u128::from(price.cents())),
        ];
        let tx = self.ledger.call("confirmPlatformPrice", &args, None).await?;
        self.confirm(&tx).await?;

        self.assets.save(&updated).await?;
        tracing::info!(asset_id = %asset_id, price = %price, "platform price confirmed");
        self.notify(AssetEvent::PriceConfirmed(PlatformPriceConfirmed::new(
            asset_id, price,
        )))
        .await;

        Ok(updated)
    }

    /// Lists a price-confirmed asset for sale. Owner-only.
    ///
    /// # Errors
    ///
    /// `Unauthorized` unless the caller owns the asset, a domain error
    /// unless the asset is in `PlatformConfirmed`.
    pub async fn list_asset(
        &self,
        caller: &WalletAddress,
        asset_id: AssetId,
    ) -> SettlementResult<Asset> {
        let asset = self.load_asset(asset_id).await?;
        if asset.owner() != caller {
            return Err(SettlementError::unauthorized(
                "only the owner can list an asset",
            ));
        }
        let price = asset
            .confirmed_price()
            .ok_or(DomainError::MissingConfirmedPrice)?;

        let mut updated = asset;
        updated.list_for_sale()?;

        let args = vec![CallValue::Uint(u128::from(asset_id.value()))];
        let tx = self.ledger.call("listAsset", &args, None).await?;
        self.confirm(&tx).await?;

        self.assets.save(&updated).await?;
        tracing::info!(asset_id = %asset_id, price = %price, "asset listed");
        self.notify(AssetEvent::Listed(AssetListed::new(asset_id, price)))
            .await;

        Ok(updated)
    }

    /// Withdraws a listed asset from sale. Owner-only.
    ///
    /// Delisting is terminal: the asset moves to `Cancelled`.
    ///
    /// # Errors
    ///
    /// `Unauthorized` unless the caller owns the asset, a validation
    /// error unless the asset is currently `Listed`.
    pub async fn cancel_listing(
        &self,
        caller: &WalletAddress,
        asset_id: AssetId,
    ) -> SettlementResult<Asset> {
        let asset = self.load_asset(asset_id).await?;
        if asset.owner() != caller {
            return Err(SettlementError::unauthorized(
                "only the owner can cancel a listing",
            ));
        }
        if asset.status() != AssetStatus::Listed {
            return Err(SettlementError::validation(format!(
                "asset {asset_id} is not listed"
            )));
        }

        let mut updated = asset;
        updated.cancel()?;

        let args = vec![CallValue::Uint(u128::from(asset_id.value()))];
        let tx = self.ledger.call("cancelListing", &args, None).await?;
        self.confirm(&tx).await?;

        self.assets.save(&updated).await?;
        tracing::info!(asset_id = %asset_id, "listing cancelled");
        self.notify(AssetEvent::Cancelled(AssetCancelled::new(asset_id)))
            .await;

        Ok(updated)
    }

    /// Creates a trade against a confirmed or listed asset.
    ///
    /// Exactly one open trade per asset is permitted; a concurrent
    /// claim loses the optimistic save and surfaces as
    /// `AssetNotAvailable`.
    ///
    /// # Errors
    ///
    /// `AssetNotAvailable` if the asset already has an open trade or
    /// was claimed concurrently, a validation error if the agreed price
    /// differs from the platform-confirmed price, and domain errors for
    /// assets not yet tradeable.
    pub async fn create_trade(
        &self,
        asset_id: AssetId,
        buyer: WalletAddress,
        agreed_price: FiatAmount,
    ) -> SettlementResult<Trade> {
        let asset = self.load_asset(asset_id).await?;

        let mut updated_asset = asset.clone();
        updated_asset.begin_trade()?;

        let confirmed = asset
            .confirmed_price()
            .ok_or(DomainError::MissingConfirmedPrice)?;
        if agreed_price != confirmed {
            return Err(SettlementError::validation(format!(
                "agreed price {agreed_price} differs from confirmed price {confirmed}"
            )));
        }
        if &buyer == asset.owner() {
            return Err(DomainError::SelfTrade.into());
        }
        if self.trades.find_open_by_asset(asset_id).await?.is_some() {
            return Err(SettlementError::AssetNotAvailable(asset_id));
        }

        let args = vec![
            CallValue::Uint(u128::from(asset_id.value())),
            CallValue::Address(buyer.clone()),
            CallValue::Uint(u128::from(agreed_price.cents())),
        ];
        let tx = self.ledger.call("createTrade", &args, None).await?;
        self.confirm(&tx).await?;

        let trade_id = TradeId::new(self.read_u64("lastTradeId").await?);
        let trade = Trade::create(
            trade_id,
            asset_id,
            asset.owner().clone(),
            buyer.clone(),
            agreed_price,
            self.clock.now(),
        )?;

        match self.assets.save(&updated_asset).await {
            Ok(()) => {}
            Err(RepositoryError::VersionConflict { .. }) => {
                return Err(SettlementError::AssetNotAvailable(asset_id));
            }
            Err(e) => return Err(e.into()),
        }
        self.trades.save(&trade).await?;

        tracing::info!(trade_id = %trade_id, asset_id = %asset_id, buyer = %buyer, "trade created");
        self.notify(TradeEvent::Created(TradeCreated::new(
            trade_id,
            asset_id,
            buyer,
            agreed_price,
        )))
        .await;

        Ok(trade)
    }

    /// Records the buyer's payment-carrying signature.
    ///
    /// `total_payment` must equal the agreed price plus the flat
    /// platform fee; the converted native amount is attached as the
    /// call value, so a mismatch is also rejected by the ledger.
    ///
    /// # Errors
    ///
    /// `Unauthorized` unless the caller is the buyer, `AlreadySigned`
    /// on a duplicate signature, a validation error on a payment
    /// mismatch, `InsufficientFunds` if the balance cannot cover
    /// payment plus gas.
    pub async fn sign_as_buyer(
        &self,
        caller: &WalletAddress,
        trade_id: TradeId,
        total_payment: FiatAmount,
    ) -> SettlementResult<Trade> {
        let trade = self.load_trade(trade_id).await?;
        if trade.buyer() != caller {
            return Err(SettlementError::unauthorized(
                "only the buyer can sign this trade",
            ));
        }
        trade.ensure_can_sign(SignerRole::Buyer)?;

        let expected = trade
            .agreed_price()
            .safe_add(self.config.platform_fee)
            .map_err(|e| SettlementError::validation(format!("fee arithmetic failed: {e}")))?;
        if total_payment != expected {
            return Err(SettlementError::validation(format!(
                "total payment {total_payment} does not match agreed price plus platform fee {expected}"
            )));
        }

        let payment = self.converter.to_native(total_payment).await?;
        let args = vec![
            CallValue::Uint(u128::from(trade_id.value())),
            CallValue::Uint(u128::from(total_payment.cents())),
        ];
        self.ensure_funds(caller, payment, "signTrade", &args)
            .await?;

        let tx = self.ledger.call("signTrade", &args, Some(payment)).await?;
        self.confirm(&tx).await?;

        let mut updated = trade;
        updated.sign_as_buyer(payment, tx.as_str(), self.clock.now())?;
        self.trades.save(&updated).await?;

        tracing::info!(trade_id = %trade_id, payment = %payment, tx = %tx, "buyer signed");
        self.notify(TradeEvent::Signed(TradeSigned::new(
            trade_id,
            updated.asset_id(),
            SignerRole::Buyer,
            tx.as_str(),
            Some(payment),
        )))
        .await;

        Ok(updated)
    }

    /// Records the platform's co-signature. Admin-only, no payment.
    ///
    /// When the signature count reaches the required threshold the
    /// trade advances to `PlatformSigned` automatically.
    ///
    /// # Errors
    ///
    /// `Unauthorized` for non-admin callers, `AlreadySigned` on a
    /// duplicate signature, a domain error unless the trade is in
    /// `BuyerSigned`.
    pub async fn sign_as_platform(
        &self,
        caller: &WalletAddress,
        trade_id: TradeId,
    ) -> SettlementResult<Trade> {
        self.ensure_admin(caller, "co-sign trade")?;
        let trade = self.load_trade(trade_id).await?;
        trade.ensure_can_sign(SignerRole::Platform)?;

        let args = vec![CallValue::Uint(u128::from(trade_id.value()))];
        let tx = self.ledger.call("platformSign", &args, None).await?;
        self.confirm(&tx).await?;

        let mut updated = trade;
        updated.sign_as_platform(tx.as_str(), self.clock.now())?;
        self.trades.save(&updated).await?;

        tracing::info!(trade_id = %trade_id, tx = %tx, "platform signed");
        self.notify(TradeEvent::Signed(TradeSigned::new(
            trade_id,
            updated.asset_id(),
            SignerRole::Platform,
            tx.as_str(),
            None,
        )))
        .await;

        Ok(updated)
    }

    /// Completes a fully-signed trade, releasing escrow to the seller
    /// net of commission. Admin-only.
    ///
    /// # Errors
    ///
    /// `MissingSignatures` before the threshold is met,
    /// `AlreadyCompleted` on a repeat call, ledger errors on rejection.
    pub async fn complete_trade(
        &self,
        caller: &WalletAddress,
        trade_id: TradeId,
    ) -> SettlementResult<Trade> {
        self.ensure_admin(caller, "complete trade")?;
        let trade = self.load_trade(trade_id).await?;

        let mut updated = trade.clone();
        updated.complete(self.clock.now())?;

        let escrow = trade
            .escrowed()
            .ok_or_else(|| SettlementError::validation("no escrow recorded for trade"))?;
        let commission = escrow
            .bps_share(self.config.commission_bps)
            .map_err(|e| SettlementError::validation(format!("commission arithmetic failed: {e}")))?;
        let payout = escrow
            .safe_sub(commission)
            .map_err(|e| SettlementError::validation(format!("payout arithmetic failed: {e}")))?;

        let args = vec![CallValue::Uint(u128::from(trade_id.value()))];
        let tx = self.ledger.call("completeTrade", &args, None).await?;
        self.confirm(&tx).await?;

        let asset = self.load_asset(trade.asset_id()).await?;
        let mut updated_asset = asset;
        updated_asset.mark_sold(self.clock.now())?;

        self.trades.save(&updated).await?;
        self.assets.save(&updated_asset).await?;

        tracing::info!(
            trade_id = %trade_id,
            asset_id = %trade.asset_id(),
            payout = %payout,
            commission = %commission,
            "trade completed"
        );
        self.notify(TradeEvent::Completed(TradeCompleted::new(
            trade_id,
            trade.asset_id(),
            trade.seller().clone(),
            payout,
            tx.as_str(),
        )))
        .await;

        Ok(updated)
    }

    /// Cancels a trade from any non-terminal state, refunding escrowed
    /// payment. Platform-only emergency operation; the reason is always
    /// logged.
    ///
    /// # Errors
    ///
    /// `Unauthorized` for non-admin callers, `AlreadyCompleted` for a
    /// completed trade, a domain error if already cancelled.
    pub async fn cancel_trade(
        &self,
        caller: &WalletAddress,
        trade_id: TradeId,
        reason: &str,
    ) -> SettlementResult<Trade> {
        self.ensure_admin(caller, "cancel trade")?;
        let trade = self.load_trade(trade_id).await?;

        tracing::warn!(trade_id = %trade_id, reason, "trade cancellation requested");

        let mut updated = trade.clone();
        updated.cancel()?;

        let args = vec![
            CallValue::Uint(u128::from(trade_id.value())),
            CallValue::Str(reason.to_string()),
        ];
        let tx = self.ledger.call("cancelTrade", &args, None).await?;
        self.confirm(&tx).await?;

        self.trades.save(&updated).await?;

        let asset = self.load_asset(trade.asset_id()).await?;
        let mut updated_asset = asset;
        updated_asset.cancel()?;
        self.assets.save(&updated_asset).await?;

        self.notify(TradeEvent::Cancelled(TradeCancelled::new(
            trade_id,
            trade.asset_id(),
            reason,
            trade.escrowed(),
        )))
        .await;

        Ok(updated)
    }

    fn ensure_admin(&self, caller: &WalletAddress, action: &str) -> SettlementResult<()> {
        if self.admins.is_admin(caller) {
            Ok(())
        } else {
            Err(SettlementError::unauthorized(format!(
                "{action} requires platform administrator rights"
            )))
        }
    }

    async fn load_asset(&self, id: AssetId) -> SettlementResult<Asset> {
        self.assets
            .get(id)
            .await?
            .ok_or(SettlementError::AssetNotFound(id))
    }

    async fn load_trade(&self, id: TradeId) -> SettlementResult<Trade> {
        self.trades
            .get(id)
            .await?
            .ok_or(SettlementError::TradeNotFound(id))
    }

    async fn read_u64(&self, method: &str) -> SettlementResult<u64> {
        let value = self.ledger.read_state(method, &[]).await?.as_uint()?;
        u64::try_from(value).map_err(|_| {
            SettlementError::validation(format!("{method} out of range: {value}"))
        })
    }

    async fn confirm(&self, tx: &TxHash) -> SettlementResult<TxReceipt> {
        Ok(self
            .ledger
            .wait_for_confirmation(tx, self.config.confirmations)
            .await?)
    }

    async fn ensure_funds(
        &self,
        payer: &WalletAddress,
        value: NativeAmount,
        method: &str,
        args: &[CallValue],
    ) -> SettlementResult<()> {
        let gas = self.ledger.estimate_gas(method, args, value.value()).await?;
        let gas_price = self.ledger.get_gas_price(TxPriority::Medium).await?;
        let required = value
            .value()
            .checked_add(gas_price.total_fee(gas))
            .ok_or_else(|| SettlementError::validation("fee arithmetic overflow"))?;
        let available = self.ledger.get_balance(payer).await?;
        if available < required {
            return Err(SettlementError::insufficient_funds(
                NativeAmount::new(required),
                NativeAmount::new(available),
            ));
        }
        Ok(())
    }

    async fn notify(&self, event: impl Into<SettlementEvent>) {
        let event = event.into();
        if let Err(e) = self.notifier.publish(&event).await {
            tracing::warn!(event = event.event_name(), error = %e, "notification delivery failed");
        }
    }
}
