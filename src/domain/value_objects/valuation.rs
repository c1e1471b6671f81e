//! # Valuation
//!
//! AI valuation attached to an asset in the evaluation stage.
//!
//! # Examples
//!
//! ```
//! use wellswap_settlement::domain::value_objects::valuation::{
//!     ConfidenceScore, RiskGrade, Valuation,
//! };
//! use wellswap_settlement::domain::value_objects::money::FiatAmount;
//!
//! let valuation = Valuation::new(
//!     FiatAmount::from_major(18_000),
//!     RiskGrade::new(2).unwrap(),
//!     ConfidenceScore::new(87).unwrap(),
//!     None,
//! );
//! assert_eq!(valuation.risk_grade().value(), 2);
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::money::FiatAmount;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordinal risk grade, 1 (lowest risk) through 5 (highest risk).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RiskGrade(u8);

impl RiskGrade {
    /// Lowest allowed grade.
    pub const MIN: u8 = 1;
    /// Highest allowed grade.
    pub const MAX: u8 = 5;

    /// Creates a risk grade.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidRiskGrade` if the grade is outside 1–5.
    pub fn new(grade: u8) -> DomainResult<Self> {
        if !(Self::MIN..=Self::MAX).contains(&grade) {
            return Err(DomainError::InvalidRiskGrade(grade));
        }
        Ok(Self(grade))
    }

    /// Returns the numeric grade.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for RiskGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Model confidence score, 0 through 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfidenceScore(u8);

impl ConfidenceScore {
    /// Highest allowed score.
    pub const MAX: u8 = 100;

    /// Creates a confidence score.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidConfidence` if the score exceeds 100.
    pub fn new(score: u8) -> DomainResult<Self> {
        if score > Self::MAX {
            return Err(DomainError::InvalidConfidence(score));
        }
        Ok(Self(score))
    }

    /// Returns the numeric score.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for ConfidenceScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// AI valuation of an asset: estimated value, risk grade, confidence,
/// and the raw analysis payload produced by the valuation model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Valuation {
    /// AI-estimated value in fiat cents.
    ai_value: FiatAmount,
    /// Risk grade assigned by the model.
    risk_grade: RiskGrade,
    /// Confidence of the valuation.
    confidence: ConfidenceScore,
    /// Free-form analysis payload.
    analysis: Option<serde_json::Value>,
}

impl Valuation {
    /// Creates a valuation.
    #[must_use]
    pub fn new(
        ai_value: FiatAmount,
        risk_grade: RiskGrade,
        confidence: ConfidenceScore,
        analysis: Option<serde_json::Value>,
    ) -> Self {
        Self {
            ai_value,
            risk_grade,
            confidence,
            analysis,
        }
    }

    /// Returns the AI-estimated value.
    #[must_use]
    pub const fn ai_value(&self) -> FiatAmount {
        self.ai_value
    }

    /// Returns the risk grade.
    #[must_use]
    pub const fn risk_grade(&self) -> RiskGrade {
        self.risk_grade
    }

    /// Returns the confidence score.
    #[must_use]
    pub const fn confidence(&self) -> ConfidenceScore {
        self.confidence
    }

    /// Returns the analysis payload, if any.
    #[must_use]
    pub const fn analysis(&self) -> Option<&serde_json::Value> {
        self.analysis.as_ref()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn risk_grade_accepts_bounds() {
        assert_eq!(RiskGrade::new(1).unwrap().value(), 1);
        assert_eq!(RiskGrade::new(5).unwrap().value(), 5);
    }

    #[test]
    fn risk_grade_rejects_out_of_range() {
        assert!(matches!(
            RiskGrade::new(0),
            Err(DomainError::InvalidRiskGrade(0))
        ));
        assert!(matches!(
            RiskGrade::new(6),
            Err(DomainError::InvalidRiskGrade(6))
        ));
    }

    #[test]
    fn confidence_accepts_bounds() {
        assert_eq!(ConfidenceScore::new(0).unwrap().value(), 0);
        assert_eq!(ConfidenceScore::new(100).unwrap().value(), 100);
    }

    #[test]
    fn confidence_rejects_out_of_range() {
        assert!(matches!(
            ConfidenceScore::new(101),
            Err(DomainError::InvalidConfidence(101))
        ));
    }

    #[test]
    fn valuation_carries_analysis_payload() {
        let valuation = Valuation::new(
            FiatAmount::from_major(18_000),
            RiskGrade::new(2).unwrap(),
            ConfidenceScore::new(87).unwrap(),
            Some(serde_json::json!({"method": "surrender-value-dcf"})),
        );
        assert!(valuation.analysis().is_some());
        assert_eq!(valuation.ai_value(), FiatAmount::from_major(18_000));
    }

    #[test]
    fn serde_roundtrip() {
        let valuation = Valuation::new(
            FiatAmount::from_major(18_000),
            RiskGrade::new(3).unwrap(),
            ConfidenceScore::new(72).unwrap(),
            None,
        );
        let json = serde_json::to_string(&valuation).unwrap();
        let back: Valuation = serde_json::from_str(&json).unwrap();
        assert_eq!(valuation, back);
    }
}
