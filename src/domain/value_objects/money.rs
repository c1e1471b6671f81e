//! # Money Types
//!
//! Integer money types and the fiat ⇄ ledger-native conversion.
//!
//! Fiat amounts are integer cents; ledger amounts are integers in the
//! chain's smallest unit. Floating point never appears in a value that
//! funds a transaction; conversion is pure fixed-point arithmetic:
//!
//! ```text
//! native = floor(fiat_cents · 10^price_decimals · 10^native_decimals
//!               / (price · 100))
//! ```
//!
//! # Examples
//!
//! ```
//! use wellswap_settlement::domain::value_objects::money::{FiatAmount, NativeQuote};
//!
//! // 300 USD at 650 USD per native token (8 quote decimals, 18 native decimals)
//! let fee = FiatAmount::from_cents(30_000);
//! let quote = NativeQuote::new(65_000_000_000, 8).unwrap();
//! let native = quote.fiat_to_native(fee, 18).unwrap();
//! assert_eq!(native.value(), 461_538_461_538_461_538);
//! ```

use crate::domain::value_objects::arithmetic::{ArithmeticError, CheckedArithmetic};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error type for fiat ⇄ native conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// The quoted price is non-positive, or the converted amount came
    /// out as zero. Either way the feed is misconfigured: a legitimate
    /// transfer is never worth zero smallest units.
    #[error("zero price or zero-valued conversion")]
    ZeroPrice,

    /// Intermediate arithmetic overflowed.
    #[error("conversion arithmetic failed: {0}")]
    Arithmetic(#[from] ArithmeticError),
}

/// Result type for conversion operations.
pub type ConversionResult<T> = Result<T, ConversionError>;

/// A fiat amount in integer cents.
///
/// # Examples
///
/// ```
/// use wellswap_settlement::domain::value_objects::money::FiatAmount;
///
/// let price = FiatAmount::from_major(15_000);
/// assert_eq!(price.cents(), 1_500_000);
/// assert_eq!(price.to_string(), "15000.00");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct FiatAmount(u64);

impl FiatAmount {
    /// Zero fiat.
    pub const ZERO: Self = Self(0);

    /// Creates an amount from integer cents.
    #[must_use]
    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Creates an amount from whole fiat units (e.g. dollars).
    #[must_use]
    pub const fn from_major(major: u64) -> Self {
        Self(major * 100)
    }

    /// Returns the amount in cents.
    #[must_use]
    pub const fn cents(&self) -> u64 {
        self.0
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checked addition.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Overflow` on overflow.
    pub fn safe_add(self, rhs: Self) -> Result<Self, ArithmeticError> {
        Ok(Self(self.0.safe_add(rhs.0)?))
    }

    /// Checked subtraction.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Underflow` on underflow.
    pub fn safe_sub(self, rhs: Self) -> Result<Self, ArithmeticError> {
        Ok(Self(self.0.safe_sub(rhs.0)?))
    }
}

impl fmt::Display for FiatAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Decimal::from_i128_with_scale(i128::from(self.0), 2))
    }
}

/// A ledger amount in the chain's smallest indivisible unit.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct NativeAmount(u128);

impl NativeAmount {
    /// Zero native units.
    pub const ZERO: Self = Self(0);

    /// Creates an amount from smallest units.
    #[must_use]
    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    /// Returns the amount in smallest units.
    #[must_use]
    pub const fn value(&self) -> u128 {
        self.0
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checked addition.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Overflow` on overflow.
    pub fn safe_add(self, rhs: Self) -> Result<Self, ArithmeticError> {
        Ok(Self(self.0.safe_add(rhs.0)?))
    }

    /// Checked subtraction.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Underflow` on underflow.
    pub fn safe_sub(self, rhs: Self) -> Result<Self, ArithmeticError> {
        Ok(Self(self.0.safe_sub(rhs.0)?))
    }

    /// Returns the given basis-point share of this amount, rounded down.
    ///
    /// Used for the platform commission on escrow release.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Overflow` if the intermediate product
    /// overflows.
    pub fn bps_share(self, bps: u32) -> Result<Self, ArithmeticError> {
        let scaled = self.0.safe_mul(u128::from(bps))?;
        Ok(Self(scaled / 10_000))
    }
}

impl fmt::Display for NativeAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A quote of the ledger's native asset in fiat.
///
/// `price` is an integer scaled by `10^decimals`; e.g. 650 USD with 8
/// quote decimals is `65_000_000_000`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeQuote {
    /// Integer price of one native token in fiat, scaled by `10^decimals`.
    price: u128,
    /// Number of decimals the price is scaled by.
    decimals: u8,
}

impl NativeQuote {
    /// Creates a quote, rejecting non-positive prices.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::ZeroPrice`] if `price` is zero.
    pub fn new(price: u128, decimals: u8) -> ConversionResult<Self> {
        if price == 0 {
            return Err(ConversionError::ZeroPrice);
        }
        Ok(Self { price, decimals })
    }

    /// Returns the scaled integer price.
    #[must_use]
    pub const fn price(&self) -> u128 {
        self.price
    }

    /// Returns the number of price decimals.
    #[must_use]
    pub const fn decimals(&self) -> u8 {
        self.decimals
    }

    /// Converts a fiat amount to ledger smallest units, rounding down.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::ZeroPrice`] if the converted amount is
    /// zero, or an arithmetic error if the fixed-point product overflows.
    pub fn fiat_to_native(
        &self,
        fiat: FiatAmount,
        native_decimals: u8,
    ) -> ConversionResult<NativeAmount> {
        let numerator = u128::from(fiat.cents())
            .safe_mul(pow10(self.decimals)?)?
            .safe_mul(pow10(native_decimals)?)?;
        let denominator = self.price.safe_mul(100)?;
        let native = numerator.safe_div(denominator)?;
        if native == 0 {
            return Err(ConversionError::ZeroPrice);
        }
        Ok(NativeAmount::new(native))
    }

    /// Converts ledger smallest units back to fiat cents, rounding down.
    ///
    /// Inverse of [`fiat_to_native`](Self::fiat_to_native) within one
    /// rounding unit.
    ///
    /// # Errors
    ///
    /// Returns an arithmetic error if the fixed-point product overflows.
    pub fn native_to_fiat(
        &self,
        native: NativeAmount,
        native_decimals: u8,
    ) -> ConversionResult<FiatAmount> {
        let numerator = native.value().safe_mul(self.price)?.safe_mul(100)?;
        let denominator = pow10(self.decimals)?.safe_mul(pow10(native_decimals)?)?;
        let cents = numerator.safe_div(denominator)?;
        let cents = u64::try_from(cents).map_err(|_| ArithmeticError::Overflow)?;
        Ok(FiatAmount::from_cents(cents))
    }
}

fn pow10(exp: u8) -> Result<u128, ArithmeticError> {
    10u128
        .checked_pow(u32::from(exp))
        .ok_or(ArithmeticError::Overflow)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    mod fiat_amount {
        use super::*;

        #[test]
        fn from_major_scales_to_cents() {
            assert_eq!(FiatAmount::from_major(300).cents(), 30_000);
        }

        #[test]
        fn display_shows_two_decimals() {
            assert_eq!(FiatAmount::from_cents(30_000).to_string(), "300.00");
            assert_eq!(FiatAmount::from_cents(1).to_string(), "0.01");
            assert_eq!(FiatAmount::from_major(15_000).to_string(), "15000.00");
        }

        #[test]
        fn safe_add_overflow_fails() {
            let max = FiatAmount::from_cents(u64::MAX);
            assert!(max.safe_add(FiatAmount::from_cents(1)).is_err());
        }
    }

    mod native_amount {
        use super::*;

        #[test]
        fn bps_share_computes_commission() {
            // 1% of the escrow.
            let escrow = NativeAmount::new(1_000_000_000_000_000_000);
            let commission = escrow.bps_share(100).unwrap();
            assert_eq!(commission.value(), 10_000_000_000_000_000);
        }

        #[test]
        fn bps_share_rounds_down() {
            let amount = NativeAmount::new(33);
            assert_eq!(amount.bps_share(100).unwrap().value(), 0);
        }

        #[test]
        fn safe_sub_underflow_fails() {
            let result = NativeAmount::ZERO.safe_sub(NativeAmount::new(1));
            assert!(result.is_err());
        }
    }

    mod quote {
        use super::*;

        #[test]
        fn zero_price_rejected() {
            assert_eq!(NativeQuote::new(0, 8), Err(ConversionError::ZeroPrice));
        }

        #[test]
        fn registration_fee_conversion() {
            // 300 USD at 650 USD/native, 8 quote decimals, 18 native decimals:
            // floor(30000 * 10^8 * 10^18 / (65_000_000_000 * 100))
            let quote = NativeQuote::new(65_000_000_000, 8).unwrap();
            let native = quote
                .fiat_to_native(FiatAmount::from_major(300), 18)
                .unwrap();
            assert_eq!(native.value(), 461_538_461_538_461_538);
        }

        #[test]
        fn exact_division_has_no_remainder() {
            // 650 USD at 650 USD/native is exactly one token.
            let quote = NativeQuote::new(65_000_000_000, 8).unwrap();
            let native = quote
                .fiat_to_native(FiatAmount::from_major(650), 18)
                .unwrap();
            assert_eq!(native.value(), 1_000_000_000_000_000_000);
        }

        #[test]
        fn dust_amount_converts_to_zero_and_fails() {
            // One cent against an astronomically high price rounds to zero.
            let quote = NativeQuote::new(u128::from(u64::MAX), 0).unwrap();
            let result = quote.fiat_to_native(FiatAmount::from_cents(1), 0);
            assert_eq!(result, Err(ConversionError::ZeroPrice));
        }

        #[test]
        fn overflow_is_reported() {
            let quote = NativeQuote::new(1, 30).unwrap();
            let result = quote.fiat_to_native(FiatAmount::from_cents(u64::MAX), 30);
            assert!(matches!(result, Err(ConversionError::Arithmetic(_))));
        }

        #[test]
        fn native_to_fiat_inverts_within_one_cent() {
            let quote = NativeQuote::new(65_000_000_000, 8).unwrap();
            for cents in [1u64, 300, 15_000, 1_000_000, 1_500_000] {
                let fiat = FiatAmount::from_cents(cents);
                let native = quote.fiat_to_native(fiat, 18).unwrap();
                let back = quote.native_to_fiat(native, 18).unwrap();
                assert!(
                    cents - back.cents() <= 1,
                    "{cents} cents round-tripped to {}",
                    back.cents()
                );
            }
        }
    }

    proptest! {
        #[test]
        fn conversion_roundtrip_within_one_cent(
            cents in 1u64..1_000_000_000_000,
            price in 1u128..100_000_000_000_000,
        ) {
            let quote = NativeQuote::new(price, 8).unwrap();
            if let Ok(native) = quote.fiat_to_native(FiatAmount::from_cents(cents), 18) {
                let back = quote.native_to_fiat(native, 18).unwrap();
                prop_assert!(back.cents() <= cents);
                prop_assert!(cents - back.cents() <= 1);
            }
        }
    }
}
