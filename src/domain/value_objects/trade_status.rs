//! # Trade Status
//!
//! Trade lifecycle state machine and signer roles.
//!
//! This module provides the [`TradeStatus`] enum representing the
//! dual-signature settlement of a single trade, and the [`SignerRole`]
//! enum identifying which party a signature belongs to.
//!
//! # State Machine
//!
//! ```text
//! Created → BuyerSigned → PlatformSigned → Completed
//!    ↓           ↓              ↓
//!    └───────────┴──────────────┴→ Cancelled
//! ```
//!
//! # Examples
//!
//! ```
//! use wellswap_settlement::domain::value_objects::trade_status::TradeStatus;
//!
//! let status = TradeStatus::Created;
//! assert!(status.can_transition_to(TradeStatus::BuyerSigned));
//! assert!(!status.can_transition_to(TradeStatus::Completed));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Trade lifecycle state.
///
/// State transitions are enforced via
/// [`can_transition_to`](TradeStatus::can_transition_to). A trade can
/// only reach [`Completed`](TradeStatus::Completed) once every required
/// signature is present.
///
/// # Terminal States
///
/// - [`Completed`](TradeStatus::Completed) - funds released, ownership transferred
/// - [`Cancelled`](TradeStatus::Cancelled) - trade aborted, escrow refunded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum TradeStatus {
    /// Trade created, awaiting the buyer's payment-carrying signature.
    #[default]
    Created = 0,

    /// Buyer signed and escrowed the payment.
    BuyerSigned = 1,

    /// Platform co-signed; all required signatures present.
    PlatformSigned = 2,

    /// Settlement completed (terminal).
    Completed = 3,

    /// Trade cancelled, escrow refunded (terminal).
    Cancelled = 4,
}

impl TradeStatus {
    /// Returns true if this is a terminal state.
    #[inline]
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Returns true if this state can transition to the target state.
    ///
    /// Enforces the trade state machine rules:
    /// - Created → BuyerSigned, Cancelled
    /// - BuyerSigned → PlatformSigned, Cancelled
    /// - PlatformSigned → Completed, Cancelled
    /// - Terminal states → (none)
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Created, Self::BuyerSigned)
                | (Self::Created, Self::Cancelled)
                | (Self::BuyerSigned, Self::PlatformSigned)
                | (Self::BuyerSigned, Self::Cancelled)
                | (Self::PlatformSigned, Self::Completed)
                | (Self::PlatformSigned, Self::Cancelled)
        )
    }

    /// Returns the valid next states from this state.
    #[must_use]
    pub fn valid_transitions(&self) -> Vec<Self> {
        match self {
            Self::Created => vec![Self::BuyerSigned, Self::Cancelled],
            Self::BuyerSigned => vec![Self::PlatformSigned, Self::Cancelled],
            Self::PlatformSigned => vec![Self::Completed, Self::Cancelled],
            Self::Completed | Self::Cancelled => vec![],
        }
    }

    /// Returns the numeric value of this state.
    #[inline]
    #[must_use]
    pub const fn as_u8(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Created => "CREATED",
            Self::BuyerSigned => "BUYER_SIGNED",
            Self::PlatformSigned => "PLATFORM_SIGNED",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        };
        write!(f, "{s}")
    }
}

/// Error returned when converting an invalid u8 to [`TradeStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidTradeStatusError(
    /// The invalid u8 value.
    pub u8,
);

impl fmt::Display for InvalidTradeStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid trade status value: {}", self.0)
    }
}

impl std::error::Error for InvalidTradeStatusError {}

impl TryFrom<u8> for TradeStatus {
    type Error = InvalidTradeStatusError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Created),
            1 => Ok(Self::BuyerSigned),
            2 => Ok(Self::PlatformSigned),
            3 => Ok(Self::Completed),
            4 => Ok(Self::Cancelled),
            _ => Err(InvalidTradeStatusError(value)),
        }
    }
}

/// The party a trade signature belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignerRole {
    /// The buyer, whose signature carries the payment.
    Buyer,
    /// The platform, whose co-signature releases the escrow.
    Platform,
}

impl fmt::Display for SignerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buyer => write!(f, "BUYER"),
            Self::Platform => write!(f, "PLATFORM"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const ALL: [TradeStatus; 5] = [
        TradeStatus::Created,
        TradeStatus::BuyerSigned,
        TradeStatus::PlatformSigned,
        TradeStatus::Completed,
        TradeStatus::Cancelled,
    ];

    mod transitions {
        use super::*;

        #[test]
        fn signing_path_is_legal() {
            assert!(TradeStatus::Created.can_transition_to(TradeStatus::BuyerSigned));
            assert!(TradeStatus::BuyerSigned.can_transition_to(TradeStatus::PlatformSigned));
            assert!(TradeStatus::PlatformSigned.can_transition_to(TradeStatus::Completed));
        }

        #[test]
        fn completion_cannot_be_reached_early() {
            assert!(!TradeStatus::Created.can_transition_to(TradeStatus::Completed));
            assert!(!TradeStatus::BuyerSigned.can_transition_to(TradeStatus::Completed));
        }

        #[test]
        fn any_non_terminal_state_can_cancel() {
            for status in [
                TradeStatus::Created,
                TradeStatus::BuyerSigned,
                TradeStatus::PlatformSigned,
            ] {
                assert!(status.can_transition_to(TradeStatus::Cancelled), "{status}");
            }
        }

        #[test]
        fn terminal_states_have_no_transitions() {
            for terminal in [TradeStatus::Completed, TradeStatus::Cancelled] {
                assert!(terminal.is_terminal());
                assert!(terminal.valid_transitions().is_empty());
                for target in ALL {
                    assert!(!terminal.can_transition_to(target));
                }
            }
        }

        #[test]
        fn valid_transitions_agrees_with_predicate() {
            for from in ALL {
                for to in ALL {
                    assert_eq!(
                        from.valid_transitions().contains(&to),
                        from.can_transition_to(to),
                        "{from} -> {to}"
                    );
                }
            }
        }
    }

    mod display {
        use super::*;

        #[test]
        fn display_formats() {
            assert_eq!(TradeStatus::Created.to_string(), "CREATED");
            assert_eq!(TradeStatus::BuyerSigned.to_string(), "BUYER_SIGNED");
            assert_eq!(TradeStatus::PlatformSigned.to_string(), "PLATFORM_SIGNED");
            assert_eq!(SignerRole::Buyer.to_string(), "BUYER");
            assert_eq!(SignerRole::Platform.to_string(), "PLATFORM");
        }
    }

    mod try_from {
        use super::*;

        #[test]
        fn valid_values_roundtrip() {
            for status in ALL {
                assert_eq!(TradeStatus::try_from(status.as_u8()).unwrap(), status);
            }
        }

        #[test]
        fn invalid_value() {
            let result = TradeStatus::try_from(5u8);
            assert!(matches!(result, Err(InvalidTradeStatusError(5))));
        }
    }

    mod serde {
        use super::*;

        #[test]
        fn serde_roundtrip() {
            for status in ALL {
                let json = serde_json::to_string(&status).unwrap();
                let deserialized: TradeStatus = serde_json::from_str(&json).unwrap();
                assert_eq!(status, deserialized);
            }
        }
    }
}
