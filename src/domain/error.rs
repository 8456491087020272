//! Domain validation errors for allocation inputs.
//!
//! These errors are raised when an [`AllocationRequest`](super::AllocationRequest)
//! or a [`Deal`](super::Deal) violates an invariant. They are produced before
//! any solver work starts, so a failing request never reaches a backend.
//!
//! # Examples
//!
//! ```
//! use bundlefit::domain::error::ValidationError;
//! use bundlefit::domain::Deal;
//! use rust_decimal_macros::dec;
//!
//! let result = Deal::try_new("D1", "Retail", dec!(1000), dec!(0), dec!(0), dec!(0));
//! assert!(matches!(result, Err(ValidationError::InvalidRiskScore { .. })));
//! ```

use rust_decimal::Decimal;
use thiserror::Error;

use super::id::{DealId, SectorId};

/// Which per-sector entry is absent from a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectorEntry {
    /// Current capital `C_i`.
    Capital,
    /// Desired weight `d_i`.
    Weight,
}

impl std::fmt::Display for SectorEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Capital => write!(f, "current capital"),
            Self::Weight => write!(f, "desired weight"),
        }
    }
}

/// Errors that occur when allocation inputs violate domain invariants.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A sector lacks a capital or weight entry.
    #[error("missing {entry} for sector '{sector}'")]
    MissingSectorData {
        /// The sector with the missing entry.
        sector: SectorId,
        /// Which entry is missing.
        entry: SectorEntry,
    },

    /// Desired weights do not sum to one within tolerance.
    #[error("desired weights must sum to 1, got {sum}")]
    InvalidWeightDistribution {
        /// The actual sum of the desired weights.
        sum: Decimal,
    },

    /// A deal references a sector outside the sector set.
    #[error("deal '{deal_id}' references unknown sector '{sector}'")]
    UnknownSectorReference {
        /// The offending deal.
        deal_id: DealId,
        /// The sector it names.
        sector: SectorId,
    },

    /// A deal's size is not strictly positive.
    #[error("deal '{deal_id}' has non-positive size {size}")]
    InvalidDealSize {
        /// The offending deal.
        deal_id: DealId,
        /// The invalid size.
        size: Decimal,
    },

    /// A deal's risk score sum is not strictly positive, or a sub-score is negative.
    #[error("deal '{deal_id}' has invalid risk score r1+r2+r3={score}")]
    InvalidRiskScore {
        /// The offending deal.
        deal_id: DealId,
        /// The risk score sum.
        score: Decimal,
    },

    /// The same sector is listed twice.
    #[error("sector '{sector}' is listed more than once")]
    DuplicateSector {
        /// The repeated sector.
        sector: SectorId,
    },

    /// The same deal id is used twice.
    #[error("deal id '{deal_id}' is used more than once")]
    DuplicateDeal {
        /// The repeated deal id.
        deal_id: DealId,
    },

    /// Budget is not strictly positive.
    #[error("budget must be positive, got {budget}")]
    InvalidBudget {
        /// The invalid budget.
        budget: Decimal,
    },

    /// Current capital for a sector is negative.
    #[error("current capital for sector '{sector}' must be non-negative, got {capital}")]
    NegativeCapital {
        /// The offending sector.
        sector: SectorId,
        /// The negative amount.
        capital: Decimal,
    },

    /// A desired weight lies outside `[0, 1]`.
    #[error("desired weight for sector '{sector}' must be within [0, 1], got {weight}")]
    InvalidWeight {
        /// The offending sector.
        sector: SectorId,
        /// The out-of-range weight.
        weight: Decimal,
    },

    /// A quantity derived from the inputs does not fit in a `Decimal`.
    #[error("{quantity} is too large to represent")]
    AmountOverflow {
        /// What overflowed, e.g. `total current capital`.
        quantity: &'static str,
    },
}
