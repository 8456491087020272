//! Linear rows and column bounds, independent of any LP backend.
//!
//! The allocation model is expressed entirely in these types; a solver
//! adapter translates them into its own representation.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Comparison between a row's left-hand side and its right-hand side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstraintSense {
    GreaterEqual,
    LessEqual,
    Equal,
}

impl fmt::Display for ConstraintSense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Self::GreaterEqual => ">=",
            Self::LessEqual => "<=",
            Self::Equal => "=",
        };
        f.write_str(symbol)
    }
}

/// One row `Σ a_k · v_k (sense) rhs` over the model's columns.
///
/// `coefficients` is dense: entry `k` multiplies column `k`, and columns a
/// row does not touch carry zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub coefficients: Vec<Decimal>,
    pub sense: ConstraintSense,
    pub rhs: Decimal,
}

impl Constraint {
    #[must_use]
    pub const fn new(coefficients: Vec<Decimal>, sense: ConstraintSense, rhs: Decimal) -> Self {
        Self {
            coefficients,
            sense,
            rhs,
        }
    }

    /// `Σ a_k · v_k >= rhs`.
    #[must_use]
    pub const fn geq(coefficients: Vec<Decimal>, rhs: Decimal) -> Self {
        Self::new(coefficients, ConstraintSense::GreaterEqual, rhs)
    }

    /// `Σ a_k · v_k <= rhs`.
    #[must_use]
    pub const fn leq(coefficients: Vec<Decimal>, rhs: Decimal) -> Self {
        Self::new(coefficients, ConstraintSense::LessEqual, rhs)
    }

    /// `Σ a_k · v_k = rhs`.
    #[must_use]
    pub const fn eq(coefficients: Vec<Decimal>, rhs: Decimal) -> Self {
        Self::new(coefficients, ConstraintSense::Equal, rhs)
    }

    /// Row activity at the point `values`; columns past its end count as zero.
    #[must_use]
    pub fn lhs(&self, values: &[Decimal]) -> Decimal {
        self.coefficients
            .iter()
            .zip(values)
            .map(|(a, v)| *a * *v)
            .sum()
    }

    /// Amount by which `values` violate this row, zero when satisfied.
    #[must_use]
    pub fn violation(&self, values: &[Decimal]) -> Decimal {
        let gap = self.lhs(values) - self.rhs;
        match self.sense {
            ConstraintSense::GreaterEqual => (-gap).max(Decimal::ZERO),
            ConstraintSense::LessEqual => gap.max(Decimal::ZERO),
            ConstraintSense::Equal => gap.abs(),
        }
    }

    #[must_use]
    pub fn is_satisfied(&self, values: &[Decimal], tolerance: Decimal) -> bool {
        self.violation(values) <= tolerance
    }
}

/// Column bounds; `None` on either side means unbounded in that direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariableBounds {
    pub lower: Option<Decimal>,
    pub upper: Option<Decimal>,
}

/// Columns default to `[0, ∞)`.
impl Default for VariableBounds {
    fn default() -> Self {
        Self::non_negative()
    }
}

impl VariableBounds {
    /// `[0, 1]`, the range of an acceptance fraction.
    #[must_use]
    pub const fn unit() -> Self {
        Self {
            lower: Some(Decimal::ZERO),
            upper: Some(Decimal::ONE),
        }
    }

    #[must_use]
    pub const fn non_negative() -> Self {
        Self {
            lower: Some(Decimal::ZERO),
            upper: None,
        }
    }

    /// `[lower, upper]`.
    #[must_use]
    pub const fn bounded(lower: Decimal, upper: Decimal) -> Self {
        Self {
            lower: Some(lower),
            upper: Some(upper),
        }
    }

    #[must_use]
    pub const fn free() -> Self {
        Self {
            lower: None,
            upper: None,
        }
    }

    /// Whether `value` lies inside the bounds widened by `tolerance`.
    #[must_use]
    pub fn contains(&self, value: Decimal, tolerance: Decimal) -> bool {
        self.lower.map_or(true, |lo| value >= lo - tolerance)
            && self.upper.map_or(true, |hi| value <= hi + tolerance)
    }
}
