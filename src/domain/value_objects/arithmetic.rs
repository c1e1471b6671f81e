//! # Checked Arithmetic
//!
//! Traits and utilities for safe arithmetic on funded values.
//!
//! This module provides:
//! - [`ArithmeticError`] - Error type for arithmetic failures
//! - [`CheckedArithmetic`] - Trait for safe arithmetic operations
//!
//! Every value that can end up attached to a ledger transaction is an
//! integer (fiat cents or ledger smallest units), so only the integer
//! types are covered here.
//!
//! # Examples
//!
//! ```
//! use wellswap_settlement::domain::value_objects::arithmetic::CheckedArithmetic;
//!
//! let total = 30_000u64.safe_add(1_500).unwrap();
//! assert_eq!(total, 31_500);
//! ```

use thiserror::Error;

/// Error type for arithmetic operations.
///
/// Represents failures that can occur during checked arithmetic,
/// including overflow, underflow, division by zero, and invalid values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ArithmeticError {
    /// Arithmetic operation resulted in overflow.
    #[error("arithmetic overflow")]
    Overflow,

    /// Arithmetic operation resulted in underflow.
    #[error("arithmetic underflow")]
    Underflow,

    /// Division by zero attempted.
    #[error("division by zero")]
    DivisionByZero,

    /// Invalid value provided (e.g., zero when positive required).
    #[error("invalid value: {0}")]
    InvalidValue(&'static str),
}

/// Result type for arithmetic operations.
pub type ArithmeticResult<T> = Result<T, ArithmeticError>;

/// Trait for checked arithmetic operations.
///
/// Provides safe arithmetic methods that return `Result` instead of
/// panicking on overflow, underflow, or division by zero.
pub trait CheckedArithmetic: Sized {
    /// Safely add two values.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Overflow` if the result would overflow.
    fn safe_add(self, rhs: Self) -> ArithmeticResult<Self>;

    /// Safely subtract two values.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Underflow` if the result would underflow.
    fn safe_sub(self, rhs: Self) -> ArithmeticResult<Self>;

    /// Safely multiply two values.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Overflow` if the result would overflow.
    fn safe_mul(self, rhs: Self) -> ArithmeticResult<Self>;

    /// Safely divide two values.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::DivisionByZero` if the divisor is zero.
    fn safe_div(self, rhs: Self) -> ArithmeticResult<Self>;
}

macro_rules! impl_checked_arithmetic {
    ($($ty:ty),*) => {
        $(
            impl CheckedArithmetic for $ty {
                #[inline]
                fn safe_add(self, rhs: Self) -> ArithmeticResult<Self> {
                    self.checked_add(rhs).ok_or(ArithmeticError::Overflow)
                }

                #[inline]
                fn safe_sub(self, rhs: Self) -> ArithmeticResult<Self> {
                    self.checked_sub(rhs).ok_or(ArithmeticError::Underflow)
                }

                #[inline]
                fn safe_mul(self, rhs: Self) -> ArithmeticResult<Self> {
                    self.checked_mul(rhs).ok_or(ArithmeticError::Overflow)
                }

                #[inline]
                fn safe_div(self, rhs: Self) -> ArithmeticResult<Self> {
                    self.checked_div(rhs).ok_or(ArithmeticError::DivisionByZero)
                }
            }
        )*
    };
}

impl_checked_arithmetic!(u64, u128, i64);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod arithmetic_error {
        use super::*;

        #[test]
        fn display_formats_correctly() {
            assert_eq!(ArithmeticError::Overflow.to_string(), "arithmetic overflow");
            assert_eq!(
                ArithmeticError::Underflow.to_string(),
                "arithmetic underflow"
            );
            assert_eq!(
                ArithmeticError::DivisionByZero.to_string(),
                "division by zero"
            );
            assert_eq!(
                ArithmeticError::InvalidValue("zero fee").to_string(),
                "invalid value: zero fee"
            );
        }
    }

    mod checked_arithmetic_u64 {
        use super::*;

        #[test]
        fn safe_add_works() {
            assert_eq!(100u64.safe_add(50).unwrap(), 150);
        }

        #[test]
        fn safe_add_overflow_fails() {
            assert_eq!(u64::MAX.safe_add(1), Err(ArithmeticError::Overflow));
        }

        #[test]
        fn safe_sub_works() {
            assert_eq!(100u64.safe_sub(50).unwrap(), 50);
        }

        #[test]
        fn safe_sub_underflow_fails() {
            assert_eq!(0u64.safe_sub(1), Err(ArithmeticError::Underflow));
        }

        #[test]
        fn safe_mul_overflow_fails() {
            assert_eq!(u64::MAX.safe_mul(2), Err(ArithmeticError::Overflow));
        }

        #[test]
        fn safe_div_by_zero_fails() {
            assert_eq!(100u64.safe_div(0), Err(ArithmeticError::DivisionByZero));
        }
    }

    mod checked_arithmetic_u128 {
        use super::*;

        #[test]
        fn safe_add_works() {
            assert_eq!(10u128.pow(18).safe_add(1).unwrap(), 10u128.pow(18) + 1);
        }

        #[test]
        fn safe_mul_works_at_ledger_scale() {
            // A wei-scale amount times a basis-point factor stays in range.
            let escrow = 461_538_461_538_461_538u128;
            assert_eq!(escrow.safe_mul(100).unwrap(), escrow * 100);
        }

        #[test]
        fn safe_mul_overflow_fails() {
            assert_eq!(u128::MAX.safe_mul(2), Err(ArithmeticError::Overflow));
        }

        #[test]
        fn safe_sub_underflow_fails() {
            assert_eq!(0u128.safe_sub(1), Err(ArithmeticError::Underflow));
        }

        #[test]
        fn safe_div_by_zero_fails() {
            assert_eq!(100u128.safe_div(0), Err(ArithmeticError::DivisionByZero));
        }
    }

    mod checked_arithmetic_i64 {
        use super::*;

        #[test]
        fn safe_add_overflow_fails() {
            assert_eq!(i64::MAX.safe_add(1), Err(ArithmeticError::Overflow));
        }

        #[test]
        fn safe_sub_underflow_fails() {
            assert_eq!(i64::MIN.safe_sub(1), Err(ArithmeticError::Underflow));
        }

        #[test]
        fn safe_div_by_zero_fails() {
            assert_eq!(100i64.safe_div(0), Err(ArithmeticError::DivisionByZero));
        }
    }
}
