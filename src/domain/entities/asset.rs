//! # Asset Entity
//!
//! Aggregate root for a tokenized insurance policy.
//!
//! An asset is created when the seller's registration payment is
//! confirmed on the ledger, then moves through AI evaluation, platform
//! price confirmation and listing before it can be traded. Every
//! transition is checked against
//! [`AssetStatus::can_transition_to`](crate::domain::value_objects::AssetStatus::can_transition_to);
//! a rejected transition leaves the asset untouched.
//!
//! # Examples
//!
//! ```
//! use wellswap_settlement::domain::entities::asset::{Asset, AssetDraft};
//! use wellswap_settlement::domain::value_objects::{
//!     AssetId, AssetStatus, FiatAmount, Timestamp, WalletAddress,
//! };
//!
//! let seller = WalletAddress::parse("0x8a627a75d04bf3c709154205dfbbb6f4ed10dcb0").unwrap();
//! let draft = AssetDraft {
//!     company_name: "Prudential HK".into(),
//!     product_name: "Wealth Builder".into(),
//!     category: "savings".into(),
//!     contract_date: Timestamp::from_secs(1_600_000_000).unwrap(),
//!     contract_period_months: 120,
//!     paid_period_months: 36,
//!     annual_premium: FiatAmount::from_major(3_000),
//!     total_paid: FiatAmount::from_major(9_000),
//!     supplemental: None,
//! };
//! let asset = Asset::register(AssetId::new(1), seller, draft, None,
//!     Timestamp::from_secs(1_700_000_000).unwrap()).unwrap();
//! assert_eq!(asset.status(), AssetStatus::Registered);
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{
    AssetId, AssetStatus, FiatAmount, IdempotencyKey, Timestamp, Valuation, WalletAddress,
};
use serde::{Deserialize, Serialize};

/// Registration input for a new asset.
///
/// Validated by [`Asset::register`]; field access is open because the
/// draft is a plain input record, not an aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetDraft {
    /// Issuing insurance company.
    pub company_name: String,
    /// Product name.
    pub product_name: String,
    /// Product category.
    pub category: String,
    /// Contract start date.
    pub contract_date: Timestamp,
    /// Total contract period in months.
    pub contract_period_months: u32,
    /// Months of premium already paid.
    pub paid_period_months: u32,
    /// Annual premium in fiat cents.
    pub annual_premium: FiatAmount,
    /// Total premium paid to date in fiat cents.
    pub total_paid: FiatAmount,
    /// Free-form supplemental data.
    pub supplemental: Option<serde_json::Value>,
}

impl AssetDraft {
    /// Validates the draft.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidAssetData` or
    /// `DomainError::InvalidAmount` if a field is out of range.
    pub fn validate(&self) -> DomainResult<()> {
        if self.company_name.trim().is_empty() {
            return Err(DomainError::InvalidAssetData("company name is empty"));
        }
        if self.product_name.trim().is_empty() {
            return Err(DomainError::InvalidAssetData("product name is empty"));
        }
        if self.contract_period_months == 0 {
            return Err(DomainError::InvalidAssetData("contract period is zero"));
        }
        if self.paid_period_months > self.contract_period_months {
            return Err(DomainError::InvalidAssetData(
                "paid period exceeds contract period",
            ));
        }
        if self.annual_premium.is_zero() {
            return Err(DomainError::InvalidAmount("annual premium is zero"));
        }
        if self.total_paid.is_zero() {
            return Err(DomainError::InvalidAmount("total paid is zero"));
        }
        Ok(())
    }
}

/// A tokenized insurance policy offered for transfer.
///
/// # Invariants
///
/// - `status` only moves along the asset lifecycle graph
/// - `valuation` is present from `AiEvaluated` onwards
/// - `confirmed_price` is present from `PlatformConfirmed` onwards
/// - `sold_at` is present exactly when the asset has been sold
/// - `version` increases by one on every successful mutation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    id: AssetId,
    owner: WalletAddress,
    draft: AssetDraft,
    valuation: Option<Valuation>,
    confirmed_price: Option<FiatAmount>,
    status: AssetStatus,
    created_at: Timestamp,
    sold_at: Option<Timestamp>,
    refund_processed: bool,
    idempotency_key: Option<IdempotencyKey>,
    version: u64,
}

impl Asset {
    /// Creates a newly registered asset after validating the draft.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the draft is inconsistent.
    pub fn register(
        id: AssetId,
        owner: WalletAddress,
        draft: AssetDraft,
        idempotency_key: Option<IdempotencyKey>,
        now: Timestamp,
    ) -> DomainResult<Self> {
        draft.validate()?;
        Ok(Self {
            id,
            owner,
            draft,
            valuation: None,
            confirmed_price: None,
            status: AssetStatus::Registered,
            created_at: now,
            sold_at: None,
            refund_processed: false,
            idempotency_key,
            version: 1,
        })
    }

    /// Attaches the AI valuation and moves to `AiEvaluated`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidAssetTransition` unless the asset
    /// is in `Registered`.
    pub fn submit_evaluation(&mut self, valuation: Valuation) -> DomainResult<()> {
        self.transition(AssetStatus::AiEvaluated)?;
        self.valuation = Some(valuation);
        Ok(())
    }

    /// Confirms the platform price and moves to `PlatformConfirmed`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidAmount` if the price is zero, or an
    /// invalid-transition error unless the asset is in `AiEvaluated`.
    pub fn confirm_price(&mut self, price: FiatAmount) -> DomainResult<()> {
        if price.is_zero() {
            return Err(DomainError::InvalidAmount("confirmed price is zero"));
        }
        self.transition(AssetStatus::PlatformConfirmed)?;
        self.confirmed_price = Some(price);
        Ok(())
    }

    /// Lists the asset for sale.
    ///
    /// # Errors
    ///
    /// Returns an invalid-transition error unless the asset is in
    /// `PlatformConfirmed`.
    pub fn list_for_sale(&mut self) -> DomainResult<()> {
        self.transition(AssetStatus::Listed)
    }

    /// Reserves the asset for an open trade.
    ///
    /// # Errors
    ///
    /// Returns an invalid-transition error unless the asset is in
    /// `PlatformConfirmed` or `Listed`.
    pub fn begin_trade(&mut self) -> DomainResult<()> {
        self.transition(AssetStatus::InTrade)
    }

    /// Marks the asset sold at the given instant.
    ///
    /// # Errors
    ///
    /// Returns an invalid-transition error unless the asset is in `InTrade`.
    pub fn mark_sold(&mut self, at: Timestamp) -> DomainResult<()> {
        self.transition(AssetStatus::Sold)?;
        self.sold_at = Some(at);
        Ok(())
    }

    /// Marks the escrow refunded.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AlreadyCompleted` semantics via the
    /// transition graph: only `Sold` or `InTrade` assets can be refunded.
    pub fn mark_refunded(&mut self) -> DomainResult<()> {
        self.transition(AssetStatus::Refunded)?;
        self.refund_processed = true;
        Ok(())
    }

    /// Cancels the asset.
    ///
    /// # Errors
    ///
    /// Returns an invalid-transition error if the asset is already sold
    /// or terminal.
    pub fn cancel(&mut self) -> DomainResult<()> {
        self.transition(AssetStatus::Cancelled)
    }

    fn transition(&mut self, to: AssetStatus) -> DomainResult<()> {
        if !self.status.can_transition_to(to) {
            return Err(DomainError::invalid_asset_transition(self.status, to));
        }
        self.status = to;
        self.version += 1;
        Ok(())
    }

    /// Returns the asset id.
    #[must_use]
    pub const fn id(&self) -> AssetId {
        self.id
    }

    /// Returns the current owner.
    #[must_use]
    pub const fn owner(&self) -> &WalletAddress {
        &self.owner
    }

    /// Returns the registration data.
    #[must_use]
    pub const fn draft(&self) -> &AssetDraft {
        &self.draft
    }

    /// Returns the AI valuation, if attached.
    #[must_use]
    pub const fn valuation(&self) -> Option<&Valuation> {
        self.valuation.as_ref()
    }

    /// Returns the platform-confirmed price, if set.
    #[must_use]
    pub const fn confirmed_price(&self) -> Option<FiatAmount> {
        self.confirmed_price
    }

    /// Returns the current status.
    #[must_use]
    pub const fn status(&self) -> AssetStatus {
        self.status
    }

    /// Returns when the asset was registered.
    #[must_use]
    pub const fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Returns when the asset was sold, if it has been.
    #[must_use]
    pub const fn sold_at(&self) -> Option<Timestamp> {
        self.sold_at
    }

    /// Returns true if a refund has been processed for this asset.
    #[must_use]
    pub const fn refund_processed(&self) -> bool {
        self.refund_processed
    }

    /// Returns the registration idempotency key, if one was supplied.
    #[must_use]
    pub const fn idempotency_key(&self) -> Option<&IdempotencyKey> {
        self.idempotency_key.as_ref()
    }

    /// Returns the optimistic-lock version.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{ConfidenceScore, RiskGrade};

    fn seller() -> WalletAddress {
        WalletAddress::parse("0x8a627a75d04bf3c709154205dfbbb6f4ed10dcb0").unwrap()
    }

    fn draft() -> AssetDraft {
        AssetDraft {
            company_name: "Prudential HK".into(),
            product_name: "Wealth Builder".into(),
            category: "savings".into(),
            contract_date: Timestamp::from_secs(1_600_000_000).unwrap(),
            contract_period_months: 120,
            paid_period_months: 36,
            annual_premium: FiatAmount::from_major(3_000),
            total_paid: FiatAmount::from_major(9_000),
            supplemental: None,
        }
    }

    fn valuation() -> Valuation {
        Valuation::new(
            FiatAmount::from_major(18_000),
            RiskGrade::new(2).unwrap(),
            ConfidenceScore::new(87).unwrap(),
            None,
        )
    }

    fn registered() -> Asset {
        Asset::register(
            AssetId::new(1),
            seller(),
            draft(),
            None,
            Timestamp::from_secs(1_700_000_000).unwrap(),
        )
        .unwrap()
    }

    mod registration {
        use super::*;

        #[test]
        fn register_starts_in_registered() {
            let asset = registered();
            assert_eq!(asset.status(), AssetStatus::Registered);
            assert_eq!(asset.version(), 1);
            assert!(asset.valuation().is_none());
            assert!(asset.sold_at().is_none());
            assert!(!asset.refund_processed());
        }

        #[test]
        fn empty_company_rejected() {
            let mut d = draft();
            d.company_name = "  ".into();
            let result = Asset::register(
                AssetId::new(1),
                seller(),
                d,
                None,
                Timestamp::from_secs(0).unwrap(),
            );
            assert!(matches!(result, Err(DomainError::InvalidAssetData(_))));
        }

        #[test]
        fn paid_period_beyond_contract_rejected() {
            let mut d = draft();
            d.paid_period_months = 240;
            assert!(d.validate().is_err());
        }

        #[test]
        fn zero_premium_rejected() {
            let mut d = draft();
            d.annual_premium = FiatAmount::ZERO;
            assert!(matches!(
                d.validate(),
                Err(DomainError::InvalidAmount("annual premium is zero"))
            ));
        }
    }

    mod lifecycle {
        use super::*;

        #[test]
        fn full_happy_path() {
            let mut asset = registered();

            asset.submit_evaluation(valuation()).unwrap();
            assert_eq!(asset.status(), AssetStatus::AiEvaluated);
            assert!(asset.valuation().is_some());

            asset.confirm_price(FiatAmount::from_major(15_000)).unwrap();
            assert_eq!(asset.status(), AssetStatus::PlatformConfirmed);
            assert_eq!(
                asset.confirmed_price(),
                Some(FiatAmount::from_major(15_000))
            );

            asset.list_for_sale().unwrap();
            assert_eq!(asset.status(), AssetStatus::Listed);

            asset.begin_trade().unwrap();
            assert_eq!(asset.status(), AssetStatus::InTrade);

            let sold_at = Timestamp::from_secs(1_701_000_000).unwrap();
            asset.mark_sold(sold_at).unwrap();
            assert_eq!(asset.status(), AssetStatus::Sold);
            assert_eq!(asset.sold_at(), Some(sold_at));

            asset.mark_refunded().unwrap();
            assert_eq!(asset.status(), AssetStatus::Refunded);
            assert!(asset.refund_processed());
        }

        #[test]
        fn evaluation_cannot_be_skipped() {
            let mut asset = registered();
            let result = asset.confirm_price(FiatAmount::from_major(15_000));
            assert!(matches!(
                result,
                Err(DomainError::InvalidAssetTransition {
                    from: AssetStatus::Registered,
                    to: AssetStatus::PlatformConfirmed,
                })
            ));
            // Failed transition leaves the asset untouched.
            assert_eq!(asset.status(), AssetStatus::Registered);
            assert_eq!(asset.version(), 1);
            assert!(asset.confirmed_price().is_none());
        }

        #[test]
        fn trade_cannot_start_from_registered() {
            let mut asset = registered();
            assert!(asset.begin_trade().is_err());
        }

        #[test]
        fn trade_can_start_without_listing() {
            // PlatformConfirmed -> InTrade is a legal shortcut.
            let mut asset = registered();
            asset.submit_evaluation(valuation()).unwrap();
            asset.confirm_price(FiatAmount::from_major(15_000)).unwrap();
            asset.begin_trade().unwrap();
            assert_eq!(asset.status(), AssetStatus::InTrade);
        }

        #[test]
        fn zero_confirmed_price_rejected() {
            let mut asset = registered();
            asset.submit_evaluation(valuation()).unwrap();
            let result = asset.confirm_price(FiatAmount::ZERO);
            assert!(matches!(result, Err(DomainError::InvalidAmount(_))));
            assert_eq!(asset.status(), AssetStatus::AiEvaluated);
        }

        #[test]
        fn sold_asset_cannot_be_cancelled() {
            let mut asset = registered();
            asset.submit_evaluation(valuation()).unwrap();
            asset.confirm_price(FiatAmount::from_major(15_000)).unwrap();
            asset.begin_trade().unwrap();
            asset
                .mark_sold(Timestamp::from_secs(1_701_000_000).unwrap())
                .unwrap();
            assert!(asset.cancel().is_err());
        }

        #[test]
        fn version_increments_per_mutation() {
            let mut asset = registered();
            assert_eq!(asset.version(), 1);
            asset.submit_evaluation(valuation()).unwrap();
            assert_eq!(asset.version(), 2);
            asset.confirm_price(FiatAmount::from_major(15_000)).unwrap();
            assert_eq!(asset.version(), 3);
        }
    }

    mod serde_tests {
        use super::*;

        #[test]
        fn aggregate_roundtrips_through_json() {
            let mut asset = registered();
            asset.submit_evaluation(valuation()).unwrap();
            let json = serde_json::to_string(&asset).unwrap();
            let back: Asset = serde_json::from_str(&json).unwrap();
            assert_eq!(asset, back);
        }
    }
}
