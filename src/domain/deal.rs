//! Candidate deals offered to the allocator.
//!
//! A [`Deal`] is a read-only input: one investment opportunity tied to a
//! single sector, with a full size and three risk sub-scores. The allocator
//! decides what fraction of each deal to take; it never mutates deals.

use std::result::Result;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::ValidationError;
use super::id::{DealId, SectorId};

/// An investment opportunity in one sector.
///
/// The three risk sub-scores are summed into a composite score `R`, used as an
/// inverse-risk weight: accepting `y` of the deal costs `size * y / R` in the
/// objective, so a higher composite score makes the deal cheaper to take.
///
/// # Example
///
/// ```
/// use bundlefit::domain::Deal;
/// use rust_decimal_macros::dec;
///
/// let deal = Deal::try_new("D2", "Defence", dec!(4000000), dec!(5), dec!(5), dec!(5)).unwrap();
/// assert_eq!(deal.risk_score(), dec!(15));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deal {
    deal_id: DealId,
    sector: SectorId,
    size: Decimal,
    r1: Decimal,
    r2: Decimal,
    r3: Decimal,
}

impl Deal {
    /// Create a deal without validation.
    ///
    /// Invariants are checked when the deal is used to build an allocation
    /// model; use [`Deal::try_new`] to fail at construction instead.
    pub fn new(
        deal_id: impl Into<DealId>,
        sector: impl Into<SectorId>,
        size: Decimal,
        r1: Decimal,
        r2: Decimal,
        r3: Decimal,
    ) -> Self {
        Self {
            deal_id: deal_id.into(),
            sector: sector.into(),
            size,
            r1,
            r2,
            r3,
        }
    }

    /// Create a deal with domain invariant validation.
    ///
    /// # Domain Invariants
    ///
    /// - `size` must be positive (> 0)
    /// - each risk sub-score must be non-negative
    /// - `r1 + r2 + r3` must be positive (> 0)
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any invariant is violated.
    pub fn try_new(
        deal_id: impl Into<DealId>,
        sector: impl Into<SectorId>,
        size: Decimal,
        r1: Decimal,
        r2: Decimal,
        r3: Decimal,
    ) -> Result<Self, ValidationError> {
        let deal = Self::new(deal_id, sector, size, r1, r2, r3);
        deal.validate()?;
        Ok(deal)
    }

    /// Check the deal's own invariants (sector membership is checked by the request).
    ///
    /// # Errors
    ///
    /// Returns `InvalidDealSize`, `InvalidRiskScore`, or `AmountOverflow` when
    /// the score or `size / R` does not fit in a `Decimal`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.size <= Decimal::ZERO {
            return Err(ValidationError::InvalidDealSize {
                deal_id: self.deal_id.clone(),
                size: self.size,
            });
        }

        let invalid_score = |score| ValidationError::InvalidRiskScore {
            deal_id: self.deal_id.clone(),
            score,
        };
        if let Some(r) = [self.r1, self.r2, self.r3].into_iter().find(|r| *r < Decimal::ZERO) {
            return Err(invalid_score(r));
        }
        let score = self
            .r1
            .checked_add(self.r2)
            .and_then(|s| s.checked_add(self.r3))
            .ok_or(ValidationError::AmountOverflow {
                quantity: "deal risk score",
            })?;
        if score <= Decimal::ZERO {
            return Err(invalid_score(score));
        }
        if self.size.checked_div(score).is_none() {
            return Err(ValidationError::AmountOverflow {
                quantity: "deal risk cost",
            });
        }

        Ok(())
    }

    /// Get the deal identifier.
    #[must_use]
    pub const fn deal_id(&self) -> &DealId {
        &self.deal_id
    }

    /// Get the sector this deal belongs to.
    #[must_use]
    pub const fn sector(&self) -> &SectorId {
        &self.sector
    }

    /// Get the full deal size in currency units.
    #[must_use]
    pub const fn size(&self) -> Decimal {
        self.size
    }

    /// Get the three risk sub-scores.
    #[must_use]
    pub const fn risk_components(&self) -> [Decimal; 3] {
        [self.r1, self.r2, self.r3]
    }

    /// Composite risk score `r1 + r2 + r3`.
    #[must_use]
    pub fn risk_score(&self) -> Decimal {
        self.r1 + self.r2 + self.r3
    }

    /// Objective coefficient for this deal's acceptance fraction: `size / R`.
    ///
    /// Returns zero when the risk score is not positive; such deals never
    /// pass validation, so the value is not used by the model.
    #[must_use]
    pub fn risk_cost(&self) -> Decimal {
        let score = self.risk_score();
        if score <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        self.size / score
    }

    /// Capital committed if `fraction` of the deal is accepted.
    #[must_use]
    pub fn committed(&self, fraction: Decimal) -> Decimal {
        self.size * fraction
    }
}
