//! # Auto-Refund Monitor
//!
//! Identifies sold assets whose escrow sat past the refund deadline
//! and triggers the refund settlement.
//!
//! Eligibility is a pure function of the clock and the asset record:
//! an asset qualifies once it has been `Sold` for more than the
//! configured window (61 days) without a refund having been processed.
//! The monitor is pull-based: an administrator (or the `refund_sweep`
//! bin on a schedule) invokes the scan and each per-asset refund
//! explicitly; a missed deadline never silently loses funds.

use crate::application::error::{SettlementError, SettlementResult};
use crate::domain::entities::asset::Asset;
use crate::domain::events::trade_events::{RefundProcessed, TradeEvent};
use crate::domain::events::SettlementEvent;
use crate::domain::value_objects::timestamp::SECS_PER_DAY;
use crate::domain::value_objects::{
    AssetId, AssetStatus, Clock, NativeAmount, TradeStatus, WalletAddress,
};
use crate::infrastructure::ledger::client::{CallValue, LedgerClient, TxHash};
use crate::infrastructure::notify::NotificationSink;
use crate::infrastructure::persistence::traits::{AssetRepository, TradeRepository};
use futures::future::try_join_all;
use std::sync::Arc;

/// Days an asset may sit in escrow after sale before refund.
pub const DEFAULT_REFUND_PERIOD_DAYS: u32 = 61;

/// Configuration for the refund monitor.
#[derive(Debug, Clone, Copy)]
pub struct RefundConfig {
    /// Refund window in days after the sale.
    pub refund_period_days: u32,
    /// Confirmation depth for the refund transaction.
    pub confirmations: u64,
}

impl Default for RefundConfig {
    fn default() -> Self {
        Self {
            refund_period_days: DEFAULT_REFUND_PERIOD_DAYS,
            confirmations: 1,
        }
    }
}

/// Result of an eligibility check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefundEligibility {
    /// True once the deadline has passed and no refund was processed.
    pub eligible: bool,
    /// Whole days until eligibility, clamped at 0 once eligible.
    pub days_remaining: u32,
}

/// A refund candidate surfaced by a sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefundCandidate {
    /// The eligible asset.
    pub asset_id: AssetId,
    /// The buyer whose escrow would be returned.
    pub recipient: WalletAddress,
    /// Escrowed amount to return.
    pub amount: NativeAmount,
}

/// Outcome of a sweep over all sold assets.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RefundSweep {
    /// Assets currently eligible for refund.
    pub candidates: Vec<RefundCandidate>,
    /// Total escrow across all candidates.
    pub total_amount: NativeAmount,
}

/// A processed refund.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedRefund {
    /// The refunded asset.
    pub asset_id: AssetId,
    /// The buyer who received the escrow back.
    pub recipient: WalletAddress,
    /// Amount returned.
    pub amount: NativeAmount,
    /// Hash of the refund transaction.
    pub tx_hash: TxHash,
}

/// Deadline-driven refund monitor.
pub struct RefundMonitor {
    ledger: Arc<dyn LedgerClient>,
    assets: Arc<dyn AssetRepository>,
    trades: Arc<dyn TradeRepository>,
    notifier: Arc<dyn NotificationSink>,
    clock: Arc<dyn Clock>,
    config: RefundConfig,
}

impl RefundMonitor {
    /// Creates a refund monitor.
    #[must_use]
    pub fn new(
        ledger: Arc<dyn LedgerClient>,
        assets: Arc<dyn AssetRepository>,
        trades: Arc<dyn TradeRepository>,
        notifier: Arc<dyn NotificationSink>,
        clock: Arc<dyn Clock>,
        config: RefundConfig,
    ) -> Self {
        Self {
            ledger,
            assets,
            trades,
            notifier,
            clock,
            config,
        }
    }

    /// Checks whether an asset is eligible for automatic refund.
    ///
    /// # Errors
    ///
    /// Returns `AssetNotFound` if the asset does not exist.
    pub async fn check_eligibility(&self, asset_id: AssetId) -> SettlementResult<RefundEligibility> {
        let asset = self
            .assets
            .get(asset_id)
            .await?
            .ok_or(SettlementError::AssetNotFound(asset_id))?;
        Ok(self.eligibility_of(&asset))
    }

    /// Computes eligibility from the asset record and the clock.
    fn eligibility_of(&self, asset: &Asset) -> RefundEligibility {
        if asset.refund_processed() || asset.status() != AssetStatus::Sold {
            return RefundEligibility {
                eligible: false,
                days_remaining: self.config.refund_period_days,
            };
        }
        let Some(sold_at) = asset.sold_at() else {
            return RefundEligibility {
                eligible: false,
                days_remaining: self.config.refund_period_days,
            };
        };

        let deadline = sold_at.add_days(i64::from(self.config.refund_period_days));
        let now = self.clock.now();
        if now.is_after(&deadline) {
            return RefundEligibility {
                eligible: true,
                days_remaining: 0,
            };
        }
        let remaining_secs = deadline.seconds_since(&now).max(0);
        let days_remaining =
            u32::try_from((remaining_secs as u64).div_ceil(SECS_PER_DAY as u64)).unwrap_or(u32::MAX);
        RefundEligibility {
            eligible: false,
            days_remaining,
        }
    }

    /// Processes the refund for one eligible asset.
    ///
    /// Moves the escrowed funds back to the buyer and marks the asset
    /// `Refunded`. Idempotent: a second call fails without moving funds
    /// again.
    ///
    /// # Errors
    ///
    /// `AlreadyProcessed` if a refund already succeeded for this asset,
    /// `DeadlineNotReached` if called early, `InsufficientEscrow` if the
    /// ledger holds less than the refund amount.
    pub async fn process_refund(&self, asset_id: AssetId) -> SettlementResult<ProcessedRefund> {
        let asset = self
            .assets
            .get(asset_id)
            .await?
            .ok_or(SettlementError::AssetNotFound(asset_id))?;

        if asset.refund_processed() || asset.status() == AssetStatus::Refunded {
            return Err(SettlementError::AlreadyProcessed(asset_id));
        }

        let eligibility = self.eligibility_of(&asset);
        if !eligibility.eligible {
            return Err(SettlementError::DeadlineNotReached {
                days_remaining: eligibility.days_remaining,
            });
        }

        let (recipient, amount) = self.escrow_source(asset_id).await?;
        let held = self
            .ledger
            .read_state("escrowOf", &[CallValue::Address(recipient.clone())])
            .await?
            .as_uint()?;
        if held < amount.value() {
            return Err(SettlementError::InsufficientEscrow {
                held: NativeAmount::new(held),
                required: amount,
            });
        }

        let args = vec![CallValue::Uint(u128::from(asset_id.value()))];
        let tx = self.ledger.call("processRefund", &args, None).await?;
        self.ledger
            .wait_for_confirmation(&tx, self.config.confirmations)
            .await?;

        let mut updated = asset;
        updated.mark_refunded()?;
        self.assets.save(&updated).await?;

        tracing::info!(
            asset_id = %asset_id,
            recipient = %recipient,
            amount = %amount,
            tx = %tx,
            "refund processed"
        );
        let event: SettlementEvent = TradeEvent::RefundProcessed(RefundProcessed::new(
            asset_id,
            recipient.clone(),
            amount,
            tx.as_str(),
        ))
        .into();
        if let Err(e) = self.notifier.publish(&event).await {
            tracing::warn!(event = event.event_name(), error = %e, "notification delivery failed");
        }

        Ok(ProcessedRefund {
            asset_id,
            recipient,
            amount,
            tx_hash: tx,
        })
    }

    /// Sweeps all sold assets and returns the eligible candidates with
    /// their total refundable escrow.
    ///
    /// # Errors
    ///
    /// Returns repository errors from the candidate queries.
    pub async fn scan(&self) -> SettlementResult<RefundSweep> {
        let sold = self.assets.find_by_status(AssetStatus::Sold).await?;
        let eligible: Vec<&Asset> = sold
            .iter()
            .filter(|asset| self.eligibility_of(asset).eligible)
            .collect();

        let candidates = try_join_all(eligible.into_iter().map(|asset| async move {
            let (recipient, amount) = self.escrow_source(asset.id()).await?;
            Ok::<RefundCandidate, SettlementError>(RefundCandidate {
                asset_id: asset.id(),
                recipient,
                amount,
            })
        }))
        .await?;

        let mut total = NativeAmount::ZERO;
        for candidate in &candidates {
            total = total
                .safe_add(candidate.amount)
                .map_err(|e| SettlementError::validation(format!("sweep total overflow: {e}")))?;
        }

        tracing::info!(
            candidates = candidates.len(),
            total = %total,
            "refund sweep completed"
        );
        Ok(RefundSweep {
            candidates,
            total_amount: total,
        })
    }

    /// Finds the buyer and escrow amount behind a sold asset.
    async fn escrow_source(
        &self,
        asset_id: AssetId,
    ) -> SettlementResult<(WalletAddress, NativeAmount)> {
        let trades = self.trades.find_by_asset(asset_id).await?;
        let completed = trades
            .into_iter()
            .find(|t| t.status() == TradeStatus::Completed)
            .ok_or_else(|| {
                SettlementError::validation(format!(
                    "no completed trade recorded for asset {asset_id}"
                ))
            })?;
        let amount = completed.escrowed().ok_or_else(|| {
            SettlementError::validation(format!("no escrow recorded for asset {asset_id}"))
        })?;
        Ok((completed.buyer().clone(), amount))
    }
}
