//! # Trade Entity
//!
//! Aggregate root for a dual-signature trade against one asset.
//!
//! A trade collects one signature per role. The buyer's signature
//! carries the payment into escrow; the platform's co-signature brings
//! the count to the required threshold. Only then does completion
//! release the escrow to the seller.
//!
//! # Examples
//!
//! ```
//! use wellswap_settlement::domain::entities::trade::Trade;
//! use wellswap_settlement::domain::value_objects::{
//!     AssetId, FiatAmount, NativeAmount, Timestamp, TradeId, TradeStatus, WalletAddress,
//! };
//!
//! let seller = WalletAddress::parse("0x1111111111111111111111111111111111111111").unwrap();
//! let buyer = WalletAddress::parse("0x2222222222222222222222222222222222222222").unwrap();
//! let now = Timestamp::from_secs(1_700_000_000).unwrap();
//! let trade = Trade::create(
//!     TradeId::new(1),
//!     AssetId::new(1),
//!     seller,
//!     buyer,
//!     FiatAmount::from_major(15_000),
//!     now,
//! ).unwrap();
//! assert_eq!(trade.status(), TradeStatus::Created);
//! assert_eq!(trade.required_signatures(), 2);
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{
    AssetId, FiatAmount, NativeAmount, SignerRole, Timestamp, TradeId, TradeStatus, WalletAddress,
};
use serde::{Deserialize, Serialize};

/// Signatures required before a trade can complete: buyer + platform.
pub const REQUIRED_SIGNATURES: u8 = 2;

/// A recorded signature: the confirming transaction and when it landed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureRecord {
    /// Hash of the ledger transaction that carried the signature.
    pub tx_hash: String,
    /// When the signature was confirmed.
    pub signed_at: Timestamp,
}

/// A proposed exchange of one asset at an agreed price.
///
/// # Invariants
///
/// - `status` only moves along the trade lifecycle graph
/// - `Completed` is unreachable with fewer than
///   [`required_signatures`](Trade::required_signatures) signatures
/// - each role signs at most once
/// - `escrowed` is present from `BuyerSigned` onwards
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    id: TradeId,
    asset_id: AssetId,
    seller: WalletAddress,
    buyer: WalletAddress,
    agreed_price: FiatAmount,
    required_signatures: u8,
    buyer_signature: Option<SignatureRecord>,
    platform_signature: Option<SignatureRecord>,
    escrowed: Option<NativeAmount>,
    status: TradeStatus,
    created_at: Timestamp,
    completed_at: Option<Timestamp>,
    version: u64,
}

impl Trade {
    /// Creates a new trade in `Created` status.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidAmount` for a zero price and
    /// `DomainError::SelfTrade` if buyer and seller coincide.
    pub fn create(
        id: TradeId,
        asset_id: AssetId,
        seller: WalletAddress,
        buyer: WalletAddress,
        agreed_price: FiatAmount,
        now: Timestamp,
    ) -> DomainResult<Self> {
        if agreed_price.is_zero() {
            return Err(DomainError::InvalidAmount("agreed price is zero"));
        }
        if seller == buyer {
            return Err(DomainError::SelfTrade);
        }
        Ok(Self {
            id,
            asset_id,
            seller,
            buyer,
            agreed_price,
            required_signatures: REQUIRED_SIGNATURES,
            buyer_signature: None,
            platform_signature: None,
            escrowed: None,
            status: TradeStatus::Created,
            created_at: now,
            completed_at: None,
            version: 1,
        })
    }

    /// Checks whether the given role may sign now, without mutating.
    ///
    /// Used to reject a doomed signing attempt before submitting the
    /// ledger call that would carry it.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AlreadySigned` if the role has signed, or
    /// an invalid-transition error if the trade is not in the state the
    /// role signs from.
    pub fn ensure_can_sign(&self, role: SignerRole) -> DomainResult<()> {
        match role {
            SignerRole::Buyer => {
                if self.buyer_signature.is_some() {
                    return Err(DomainError::AlreadySigned(SignerRole::Buyer));
                }
                if !self.status.can_transition_to(TradeStatus::BuyerSigned) {
                    return Err(DomainError::invalid_trade_transition(
                        self.status,
                        TradeStatus::BuyerSigned,
                    ));
                }
            }
            SignerRole::Platform => {
                if self.platform_signature.is_some() {
                    return Err(DomainError::AlreadySigned(SignerRole::Platform));
                }
                if !self.status.can_transition_to(TradeStatus::PlatformSigned) {
                    return Err(DomainError::invalid_trade_transition(
                        self.status,
                        TradeStatus::PlatformSigned,
                    ));
                }
            }
        }
        Ok(())
    }

    /// Records the buyer's payment-carrying signature.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AlreadySigned` on a duplicate signature,
    /// `DomainError::InvalidAmount` for a zero payment, or an
    /// invalid-transition error from the wrong state.
    pub fn sign_as_buyer(
        &mut self,
        payment: NativeAmount,
        tx_hash: impl Into<String>,
        now: Timestamp,
    ) -> DomainResult<()> {
        self.ensure_can_sign(SignerRole::Buyer)?;
        if payment.is_zero() {
            return Err(DomainError::InvalidAmount("buyer payment is zero"));
        }
        self.transition(TradeStatus::BuyerSigned)?;
        self.buyer_signature = Some(SignatureRecord {
            tx_hash: tx_hash.into(),
            signed_at: now,
        });
        self.escrowed = Some(payment);
        Ok(())
    }

    /// Records the platform's co-signature.
    ///
    /// When the signature count reaches the required threshold the
    /// trade advances to `PlatformSigned` automatically.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AlreadySigned` on a duplicate signature or
    /// an invalid-transition error from the wrong state.
    pub fn sign_as_platform(
        &mut self,
        tx_hash: impl Into<String>,
        now: Timestamp,
    ) -> DomainResult<()> {
        self.ensure_can_sign(SignerRole::Platform)?;
        self.platform_signature = Some(SignatureRecord {
            tx_hash: tx_hash.into(),
            signed_at: now,
        });
        if self.signature_count() >= self.required_signatures {
            self.transition(TradeStatus::PlatformSigned)?;
        }
        Ok(())
    }

    /// Completes the trade.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AlreadyCompleted` on a repeat call,
    /// `DomainError::MissingSignatures` if the threshold has not been
    /// met, or an invalid-transition error otherwise.
    pub fn complete(&mut self, now: Timestamp) -> DomainResult<()> {
        if self.status == TradeStatus::Completed {
            return Err(DomainError::AlreadyCompleted);
        }
        if self.signature_count() < self.required_signatures {
            return Err(DomainError::missing_signatures(
                self.signature_count(),
                self.required_signatures,
            ));
        }
        self.transition(TradeStatus::Completed)?;
        self.completed_at = Some(now);
        Ok(())
    }

    /// Cancels the trade from any non-terminal state.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AlreadyCompleted` for a completed trade or
    /// an invalid-transition error if already cancelled.
    pub fn cancel(&mut self) -> DomainResult<()> {
        if self.status == TradeStatus::Completed {
            return Err(DomainError::AlreadyCompleted);
        }
        self.transition(TradeStatus::Cancelled)
    }

    fn transition(&mut self, to: TradeStatus) -> DomainResult<()> {
        if !self.status.can_transition_to(to) {
            return Err(DomainError::invalid_trade_transition(self.status, to));
        }
        self.status = to;
        self.version += 1;
        Ok(())
    }

    /// Returns the number of signatures present.
    #[must_use]
    pub fn signature_count(&self) -> u8 {
        u8::from(self.buyer_signature.is_some()) + u8::from(self.platform_signature.is_some())
    }

    /// Returns true if every required signature is present.
    #[must_use]
    pub fn is_fully_signed(&self) -> bool {
        self.signature_count() >= self.required_signatures
    }

    /// Returns the trade id.
    #[must_use]
    pub const fn id(&self) -> TradeId {
        self.id
    }

    /// Returns the asset this trade is against.
    #[must_use]
    pub const fn asset_id(&self) -> AssetId {
        self.asset_id
    }

    /// Returns the seller.
    #[must_use]
    pub const fn seller(&self) -> &WalletAddress {
        &self.seller
    }

    /// Returns the buyer.
    #[must_use]
    pub const fn buyer(&self) -> &WalletAddress {
        &self.buyer
    }

    /// Returns the agreed price.
    #[must_use]
    pub const fn agreed_price(&self) -> FiatAmount {
        self.agreed_price
    }

    /// Returns the number of signatures required for completion.
    #[must_use]
    pub const fn required_signatures(&self) -> u8 {
        self.required_signatures
    }

    /// Returns the buyer's signature, if present.
    #[must_use]
    pub const fn buyer_signature(&self) -> Option<&SignatureRecord> {
        self.buyer_signature.as_ref()
    }

    /// Returns the platform's signature, if present.
    #[must_use]
    pub const fn platform_signature(&self) -> Option<&SignatureRecord> {
        self.platform_signature.as_ref()
    }

    /// Returns the escrowed payment, if the buyer has signed.
    #[must_use]
    pub const fn escrowed(&self) -> Option<NativeAmount> {
        self.escrowed
    }

    /// Returns the current status.
    #[must_use]
    pub const fn status(&self) -> TradeStatus {
        self.status
    }

    /// Returns when the trade was created.
    #[must_use]
    pub const fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Returns when the trade completed, if it has.
    #[must_use]
    pub const fn completed_at(&self) -> Option<Timestamp> {
        self.completed_at
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

    fn seller() -> WalletAddress {
        WalletAddress::parse("0x1111111111111111111111111111111111111111").unwrap()
    }

    fn buyer() -> WalletAddress {
        WalletAddress::parse("0x2222222222222222222222222222222222222222").unwrap()
    }

    fn now() -> Timestamp {
        Timestamp::from_secs(1_700_000_000).unwrap()
    }

    fn trade() -> Trade {
        Trade::create(
            TradeId::new(1),
            AssetId::new(1),
            seller(),
            buyer(),
            FiatAmount::from_major(15_000),
            now(),
        )
        .unwrap()
    }

    fn payment() -> NativeAmount {
        NativeAmount::new(23_076_923_076_923_076_900)
    }

    mod creation {
        use super::*;

        #[test]
        fn starts_in_created_with_two_required_signatures() {
            let t = trade();
            assert_eq!(t.status(), TradeStatus::Created);
            assert_eq!(t.required_signatures(), 2);
            assert_eq!(t.signature_count(), 0);
            assert!(!t.is_fully_signed());
        }

        #[test]
        fn zero_price_rejected() {
            let result = Trade::create(
                TradeId::new(1),
                AssetId::new(1),
                seller(),
                buyer(),
                FiatAmount::ZERO,
                now(),
            );
            assert!(matches!(result, Err(DomainError::InvalidAmount(_))));
        }

        #[test]
        fn self_trade_rejected() {
            let result = Trade::create(
                TradeId::new(1),
                AssetId::new(1),
                seller(),
                seller(),
                FiatAmount::from_major(100),
                now(),
            );
            assert!(matches!(result, Err(DomainError::SelfTrade)));
        }
    }

    mod signing {
        use super::*;

        #[test]
        fn buyer_then_platform_reaches_platform_signed() {
            let mut t = trade();
            t.sign_as_buyer(payment(), "0xaa", now()).unwrap();
            assert_eq!(t.status(), TradeStatus::BuyerSigned);
            assert_eq!(t.escrowed(), Some(payment()));

            t.sign_as_platform("0xbb", now()).unwrap();
            assert_eq!(t.status(), TradeStatus::PlatformSigned);
            assert!(t.is_fully_signed());
        }

        #[test]
        fn platform_cannot_sign_first() {
            let mut t = trade();
            let result = t.sign_as_platform("0xbb", now());
            assert!(matches!(
                result,
                Err(DomainError::InvalidTradeTransition { .. })
            ));
            assert_eq!(t.status(), TradeStatus::Created);
        }

        #[test]
        fn buyer_cannot_sign_twice() {
            let mut t = trade();
            t.sign_as_buyer(payment(), "0xaa", now()).unwrap();
            let result = t.sign_as_buyer(payment(), "0xcc", now());
            assert!(matches!(
                result,
                Err(DomainError::AlreadySigned(SignerRole::Buyer))
            ));
            // First signature wins; escrow unchanged.
            assert_eq!(t.buyer_signature().unwrap().tx_hash, "0xaa");
        }

        #[test]
        fn platform_cannot_sign_twice() {
            let mut t = trade();
            t.sign_as_buyer(payment(), "0xaa", now()).unwrap();
            t.sign_as_platform("0xbb", now()).unwrap();
            let result = t.sign_as_platform("0xdd", now());
            assert!(matches!(
                result,
                Err(DomainError::AlreadySigned(SignerRole::Platform))
            ));
        }

        #[test]
        fn zero_payment_rejected() {
            let mut t = trade();
            let result = t.sign_as_buyer(NativeAmount::ZERO, "0xaa", now());
            assert!(matches!(result, Err(DomainError::InvalidAmount(_))));
            assert_eq!(t.status(), TradeStatus::Created);
        }

        #[test]
        fn ensure_can_sign_does_not_mutate() {
            let t = trade();
            assert!(t.ensure_can_sign(SignerRole::Buyer).is_ok());
            assert!(t.ensure_can_sign(SignerRole::Platform).is_err());
            assert_eq!(t.status(), TradeStatus::Created);
            assert_eq!(t.version(), 1);
        }
    }

    mod completion {
        use super::*;

        #[test]
        fn completes_when_fully_signed() {
            let mut t = trade();
            t.sign_as_buyer(payment(), "0xaa", now()).unwrap();
            t.sign_as_platform("0xbb", now()).unwrap();
            t.complete(now().add_secs(60)).unwrap();
            assert_eq!(t.status(), TradeStatus::Completed);
            assert_eq!(t.completed_at(), Some(now().add_secs(60)));
        }

        #[test]
        fn never_completes_with_missing_signatures() {
            // Regardless of call order, completion requires the full set.
            let mut unsigned = trade();
            assert!(matches!(
                unsigned.complete(now()),
                Err(DomainError::MissingSignatures {
                    present: 0,
                    required: 2,
                })
            ));

            let mut buyer_only = trade();
            buyer_only.sign_as_buyer(payment(), "0xaa", now()).unwrap();
            assert!(matches!(
                buyer_only.complete(now()),
                Err(DomainError::MissingSignatures {
                    present: 1,
                    required: 2,
                })
            ));
            assert_eq!(buyer_only.status(), TradeStatus::BuyerSigned);
        }

        #[test]
        fn double_completion_rejected() {
            let mut t = trade();
            t.sign_as_buyer(payment(), "0xaa", now()).unwrap();
            t.sign_as_platform("0xbb", now()).unwrap();
            t.complete(now()).unwrap();
            assert!(matches!(t.complete(now()), Err(DomainError::AlreadyCompleted)));
        }
    }

    mod cancellation {
        use super::*;

        #[test]
        fn cancel_from_any_non_terminal_state() {
            let mut fresh = trade();
            fresh.cancel().unwrap();
            assert_eq!(fresh.status(), TradeStatus::Cancelled);

            let mut signed = trade();
            signed.sign_as_buyer(payment(), "0xaa", now()).unwrap();
            signed.cancel().unwrap();
            assert_eq!(signed.status(), TradeStatus::Cancelled);
        }

        #[test]
        fn cancel_after_completion_rejected() {
            let mut t = trade();
            t.sign_as_buyer(payment(), "0xaa", now()).unwrap();
            t.sign_as_platform("0xbb", now()).unwrap();
            t.complete(now()).unwrap();
            assert!(matches!(t.cancel(), Err(DomainError::AlreadyCompleted)));
        }

        #[test]
        fn double_cancel_rejected() {
            let mut t = trade();
            t.cancel().unwrap();
            assert!(t.cancel().is_err());
        }

        #[test]
        fn cancelled_trade_cannot_be_signed() {
            let mut t = trade();
            t.cancel().unwrap();
            assert!(t.sign_as_buyer(payment(), "0xaa", now()).is_err());
        }
    }

    mod serde_tests {
        use super::*;

        #[test]
        fn aggregate_roundtrips_through_json() {
            let mut t = trade();
            t.sign_as_buyer(payment(), "0xaa", now()).unwrap();
            let json = serde_json::to_string(&t).unwrap();
            let back: Trade = serde_json::from_str(&json).unwrap();
            assert_eq!(t, back);
        }
    }
}
