//! Allocation results and the quantities derived from them.
//!
//! - [`Allocation`] - Accepted fraction per deal, as returned by a solve
//! - [`AllocationOutcome`] - Top-ups, totals, and deviations recomputed from
//!   an allocation and its request
//!
//! The solver's auxiliary variables (`x_i`, `X`, `t`, `u_i`) are never exposed;
//! [`AllocationOutcome::evaluate`] recomputes their values from the returned
//! fractions so callers can verify constraint satisfaction independently.

use rust_decimal::Decimal;
use serde::Serialize;

use super::id::{DealId, SectorId};
use super::request::AllocationRequest;

/// Accepted fraction of one deal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DealFraction {
    /// The deal.
    pub deal_id: DealId,
    /// Fraction of the deal's size taken, in `[0, 1]`.
    pub fraction: Decimal,
}

/// Result of one allocation solve.
///
/// Holds a fraction for every input deal in request order, including deals
/// that were not taken (fraction zero).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Allocation {
    fractions: Vec<DealFraction>,
    objective: Decimal,
    optimal: bool,
}

impl Allocation {
    /// Create an allocation from per-deal fractions.
    ///
    /// `optimal` is false when the backend stopped at a feasible point without
    /// proving optimality (e.g. a time-limited solve).
    pub fn new(fractions: Vec<DealFraction>, objective: Decimal, optimal: bool) -> Self {
        Self {
            fractions,
            objective,
            optimal,
        }
    }

    /// Fraction accepted for `deal_id`, if the deal was part of the request.
    #[must_use]
    pub fn fraction(&self, deal_id: &DealId) -> Option<Decimal> {
        self.fractions
            .iter()
            .find(|f| &f.deal_id == deal_id)
            .map(|f| f.fraction)
    }

    /// Iterate over deal fractions in request order.
    pub fn iter(&self) -> impl Iterator<Item = &DealFraction> {
        self.fractions.iter()
    }

    /// Number of deals in the allocation.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fractions.len()
    }

    /// True when the request had no deals.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fractions.is_empty()
    }

    /// Objective value reported for the solve.
    #[must_use]
    pub const fn objective(&self) -> Decimal {
        self.objective
    }

    /// Whether the solver proved optimality.
    #[must_use]
    pub const fn is_optimal(&self) -> bool {
        self.optimal
    }

    /// Consume into a `deal_id -> fraction` map.
    #[must_use]
    pub fn into_map(self) -> std::collections::HashMap<DealId, Decimal> {
        self.fractions
            .into_iter()
            .map(|f| (f.deal_id, f.fraction))
            .collect()
    }
}

/// Post-allocation figures for one sector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectorOutcome {
    /// The sector.
    pub sector: SectorId,
    /// Capital before the round, `C_i`.
    pub current: Decimal,
    /// New capital routed into the sector, `x_i`.
    pub top_up: Decimal,
    /// Capital after the round, `C_i + x_i`.
    pub after: Decimal,
    /// Desired weight `d_i`.
    pub target_weight: Decimal,
    /// Actual weight after the round, `(C_i + x_i) / t`.
    pub weight_after: Decimal,
    /// Signed deviation from target in currency, `g_i = (C_i + x_i) − d_i·t`.
    pub deviation: Decimal,
}

impl SectorOutcome {
    /// Absolute deviation `|g_i|`.
    #[must_use]
    pub fn abs_deviation(&self) -> Decimal {
        self.deviation.abs()
    }
}

/// Derived quantities recomputed from an allocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationOutcome {
    /// Per-sector figures in request sector order.
    pub sectors: Vec<SectorOutcome>,
    /// Total capital before the round, `C`.
    pub total_capital: Decimal,
    /// Total new investment, `X`.
    pub total_new: Decimal,
    /// Portfolio value after the round, `t = C + X`.
    pub total_after: Decimal,
    /// Unspent budget, `B − X`.
    pub budget_remaining: Decimal,
    /// Sum of absolute deviations, `Σ |g_i|`.
    pub tracking_error: Decimal,
    /// Risk-adjusted cost, `Σ size_j·y_j / R_j`.
    pub risk_cost: Decimal,
}

impl AllocationOutcome {
    /// Recompute derived quantities for `allocation` against `request`.
    ///
    /// Deals absent from the allocation count as not taken. `x_i` is summed
    /// per sector and `X` over all deals independently, so callers can check
    /// `Σ x_i = X` as an identity.
    #[must_use]
    pub fn evaluate(request: &AllocationRequest, allocation: &Allocation) -> Self {
        let taken = |deal_id: &DealId| allocation.fraction(deal_id).unwrap_or(Decimal::ZERO);

        let total_capital = request.total_capital();
        let total_new: Decimal = request
            .deals
            .iter()
            .map(|d| d.committed(taken(d.deal_id())))
            .sum();
        let total_after = total_capital + total_new;

        let sectors: Vec<SectorOutcome> = request
            .sectors
            .iter()
            .map(|sector| {
                let current = request.capital(sector).unwrap_or(Decimal::ZERO);
                let target_weight = request.weight(sector).unwrap_or(Decimal::ZERO);
                let top_up: Decimal = request
                    .deals_in(sector)
                    .map(|d| d.committed(taken(d.deal_id())))
                    .sum();
                let after = current + top_up;
                let weight_after = if total_after > Decimal::ZERO {
                    after / total_after
                } else {
                    Decimal::ZERO
                };

                SectorOutcome {
                    sector: sector.clone(),
                    current,
                    top_up,
                    after,
                    target_weight,
                    weight_after,
                    deviation: after - target_weight * total_after,
                }
            })
            .collect();

        let tracking_error = sectors.iter().map(SectorOutcome::abs_deviation).sum();
        let risk_cost = request
            .deals
            .iter()
            .map(|d| d.risk_cost() * taken(d.deal_id()))
            .sum();

        Self {
            sectors,
            total_capital,
            total_new,
            total_after,
            budget_remaining: request.budget - total_new,
            tracking_error,
            risk_cost,
        }
    }

    /// Sum of per-sector top-ups, `Σ x_i`.
    #[must_use]
    pub fn top_up_sum(&self) -> Decimal {
        self.sectors.iter().map(|s| s.top_up).sum()
    }

    /// Objective value implied by the allocation: tracking error plus risk cost.
    #[must_use]
    pub fn objective(&self) -> Decimal {
        self.tracking_error + self.risk_cost
    }

    /// Figures for `sector`, if it was part of the request.
    #[must_use]
    pub fn sector(&self, sector: &SectorId) -> Option<&SectorOutcome> {
        self.sectors.iter().find(|s| &s.sector == sector)
    }
}
