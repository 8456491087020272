//! Allocation request: the caller's inputs for one solve.
//!
//! A request bundles the sector policy (current capital and desired weight per
//! sector), the deal catalogue, and the spending cap. It is supplied fresh for
//! every call; nothing is retained between solves.

use std::collections::{BTreeMap, HashSet};
use std::result::Result;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::deal::Deal;
use super::error::{SectorEntry, ValidationError};
use super::id::SectorId;

/// Absolute tolerance on `|Σ d_i − 1|`.
pub const WEIGHT_SUM_TOLERANCE: Decimal = dec!(0.00000001);

/// Inputs for one allocation solve.
///
/// Sector order is significant: it fixes the order of sector variables in
/// the model and of rows in reports. Deal order is preserved in the result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationRequest {
    /// Ordered, unique sector names.
    pub sectors: Vec<SectorId>,

    /// Current capital `C_i` per sector.
    pub current_capital: BTreeMap<SectorId, Decimal>,

    /// Desired post-investment weight `d_i` per sector.
    pub desired_weights: BTreeMap<SectorId, Decimal>,

    /// Candidate deals.
    #[serde(default)]
    pub deals: Vec<Deal>,

    /// Cap on total new capital deployed.
    pub budget: Decimal,
}

impl AllocationRequest {
    /// Create a request from its parts.
    pub fn new(
        sectors: impl IntoIterator<Item = impl Into<SectorId>>,
        current_capital: impl IntoIterator<Item = (impl Into<SectorId>, Decimal)>,
        desired_weights: impl IntoIterator<Item = (impl Into<SectorId>, Decimal)>,
        deals: Vec<Deal>,
        budget: Decimal,
    ) -> Self {
        Self {
            sectors: sectors.into_iter().map(Into::into).collect(),
            current_capital: current_capital
                .into_iter()
                .map(|(s, c)| (s.into(), c))
                .collect(),
            desired_weights: desired_weights
                .into_iter()
                .map(|(s, w)| (s.into(), w))
                .collect(),
            deals,
            budget,
        }
    }

    /// Return a copy of this request with a different budget.
    #[must_use]
    pub fn with_budget(mut self, budget: Decimal) -> Self {
        self.budget = budget;
        self
    }

    /// Current capital for a sector, if present.
    #[must_use]
    pub fn capital(&self, sector: &SectorId) -> Option<Decimal> {
        self.current_capital.get(sector).copied()
    }

    /// Desired weight for a sector, if present.
    #[must_use]
    pub fn weight(&self, sector: &SectorId) -> Option<Decimal> {
        self.desired_weights.get(sector).copied()
    }

    /// Total current capital `C = Σ C_i` over the listed sectors.
    #[must_use]
    pub fn total_capital(&self) -> Decimal {
        self.sectors
            .iter()
            .filter_map(|s| self.capital(s))
            .sum()
    }

    /// Sum of desired weights over the listed sectors.
    #[must_use]
    pub fn weight_sum(&self) -> Decimal {
        self.sectors.iter().filter_map(|s| self.weight(s)).sum()
    }

    /// Deals belonging to `sector`, in request order.
    pub fn deals_in<'a>(&'a self, sector: &'a SectorId) -> impl Iterator<Item = &'a Deal> + 'a {
        self.deals.iter().filter(move |d| d.sector() == sector)
    }

    /// Validate with the default weight-sum tolerance.
    ///
    /// # Errors
    ///
    /// See [`AllocationRequest::validate_with_tolerance`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.validate_with_tolerance(WEIGHT_SUM_TOLERANCE)
    }

    /// Validate all request invariants, failing on the first violation.
    ///
    /// Checks run in this order: duplicate sectors, per-sector data (missing,
    /// negative capital, weight range), map keys outside the sector list,
    /// weight sum, deals (duplicate id, unknown sector, size, risk score),
    /// magnitudes of the derived totals, and finally the budget.
    ///
    /// # Errors
    ///
    /// Returns the first `ValidationError` encountered.
    pub fn validate_with_tolerance(&self, tolerance: Decimal) -> Result<(), ValidationError> {
        let mut seen = HashSet::with_capacity(self.sectors.len());
        for sector in &self.sectors {
            if !seen.insert(sector) {
                return Err(ValidationError::DuplicateSector {
                    sector: sector.clone(),
                });
            }
        }

        for sector in &self.sectors {
            let capital = self
                .capital(sector)
                .ok_or_else(|| missing(sector, SectorEntry::Capital))?;
            let weight = self
                .weight(sector)
                .ok_or_else(|| missing(sector, SectorEntry::Weight))?;

            if capital < Decimal::ZERO {
                return Err(ValidationError::NegativeCapital {
                    sector: sector.clone(),
                    capital,
                });
            }
            if weight < Decimal::ZERO || weight > Decimal::ONE {
                return Err(ValidationError::InvalidWeight {
                    sector: sector.clone(),
                    weight,
                });
            }
        }

        // A sector named in one map must appear in the other as well.
        for sector in self.current_capital.keys() {
            if !self.desired_weights.contains_key(sector) {
                return Err(missing(sector, SectorEntry::Weight));
            }
        }
        for sector in self.desired_weights.keys() {
            if !self.current_capital.contains_key(sector) {
                return Err(missing(sector, SectorEntry::Capital));
            }
        }

        let sum = self.weight_sum();
        if (sum - Decimal::ONE).abs() > tolerance {
            return Err(ValidationError::InvalidWeightDistribution { sum });
        }

        let mut deal_ids = HashSet::with_capacity(self.deals.len());
        for deal in &self.deals {
            if !deal_ids.insert(deal.deal_id()) {
                return Err(ValidationError::DuplicateDeal {
                    deal_id: deal.deal_id().clone(),
                });
            }
            if !seen.contains(deal.sector()) {
                return Err(ValidationError::UnknownSectorReference {
                    deal_id: deal.deal_id().clone(),
                    sector: deal.sector().clone(),
                });
            }
            deal.validate()?;
        }

        self.check_magnitudes()?;

        if self.budget <= Decimal::ZERO {
            return Err(ValidationError::InvalidBudget {
                budget: self.budget,
            });
        }

        Ok(())
    }
}

impl AllocationRequest {
    /// Reject inputs whose model quantities would not fit in a `Decimal`.
    ///
    /// Bounds `t = C + Σ size_j`, the tracking error `Σ|g_i| <= 2t`, and the
    /// objective. Assumes the per-deal checks have passed.
    fn check_magnitudes(&self) -> Result<(), ValidationError> {
        let overflow = |quantity| ValidationError::AmountOverflow { quantity };

        let capital = self
            .sectors
            .iter()
            .filter_map(|s| self.capital(s))
            .try_fold(Decimal::ZERO, Decimal::checked_add)
            .ok_or_else(|| overflow("total current capital"))?;
        let offered = self
            .deals
            .iter()
            .try_fold(Decimal::ZERO, |acc, d| acc.checked_add(d.size()))
            .ok_or_else(|| overflow("total deal size"))?;
        let after = capital
            .checked_add(offered)
            .ok_or_else(|| overflow("portfolio value after investment"))?;
        let deviation = after
            .checked_mul(dec!(2))
            .ok_or_else(|| overflow("tracking error"))?;
        self.deals
            .iter()
            .try_fold(deviation, |acc, d| acc.checked_add(d.risk_cost()))
            .ok_or_else(|| overflow("objective"))?;

        Ok(())
    }
}

fn missing(sector: &SectorId, entry: SectorEntry) -> ValidationError {
    ValidationError::MissingSectorData {
        sector: sector.clone(),
        entry,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deal(id: &str, sector: &str, size: Decimal) -> Deal {
        Deal::new(id, sector, size, dec!(1), dec!(1), dec!(1))
    }

    fn two_sector_request() -> AllocationRequest {
        AllocationRequest::new(
            ["A", "B"],
            [("A", dec!(100)), ("B", dec!(0))],
            [("A", dec!(0.5)), ("B", dec!(0.5))],
            vec![deal("D1", "B", dec!(50))],
            dec!(50),
        )
    }

    #[test]
    fn capital_too_large_to_total_is_rejected() {
        let half = Decimal::MAX / dec!(2) + Decimal::ONE;
        let mut request = two_sector_request();
        request.current_capital = [("A".into(), half), ("B".into(), half)].into();

        assert_eq!(
            request.validate(),
            Err(ValidationError::AmountOverflow {
                quantity: "total current capital"
            })
        );
    }

    #[test]
    fn capital_plus_deals_too_large_is_rejected() {
        let mut request = two_sector_request();
        request.current_capital.insert("A".into(), Decimal::MAX);

        assert_eq!(
            request.validate(),
            Err(ValidationError::AmountOverflow {
                quantity: "portfolio value after investment"
            })
        );
    }

    #[test]
    fn valid_request_passes() {
        assert_eq!(two_sector_request().validate(), Ok(()));
    }

    #[test]
    fn total_capital_sums_listed_sectors() {
        assert_eq!(two_sector_request().total_capital(), dec!(100));
    }

    #[test]
    fn missing_capital_names_sector() {
        let mut request = two_sector_request();
        request.current_capital.remove(&SectorId::from("B"));

        assert_eq!(
            request.validate(),
            Err(ValidationError::MissingSectorData {
                sector: SectorId::from("B"),
                entry: SectorEntry::Capital,
            })
        );
    }

    #[test]
    fn missing_weight_names_sector() {
        let mut request = two_sector_request();
        request.desired_weights.remove(&SectorId::from("A"));

        assert_eq!(
            request.validate(),
            Err(ValidationError::MissingSectorData {
                sector: SectorId::from("A"),
                entry: SectorEntry::Weight,
            })
        );
    }

    #[test]
    fn weights_summing_to_099_are_rejected() {
        let mut request = two_sector_request();
        request
            .desired_weights
            .insert(SectorId::from("B"), dec!(0.49));

        assert_eq!(
            request.validate(),
            Err(ValidationError::InvalidWeightDistribution { sum: dec!(0.99) })
        );
    }

    #[test]
    fn weights_within_tolerance_are_accepted() {
        let mut request = two_sector_request();
        request
            .desired_weights
            .insert(SectorId::from("B"), dec!(0.50000001));

        assert_eq!(request.validate(), Ok(()));
    }

    #[test]
    fn unknown_sector_reference_is_rejected() {
        let mut request = two_sector_request();
        request.deals.push(deal("D9", "Mining", dec!(10)));

        assert_eq!(
            request.validate(),
            Err(ValidationError::UnknownSectorReference {
                deal_id: "D9".into(),
                sector: "Mining".into(),
            })
        );
    }

    #[test]
    fn zero_risk_deal_is_rejected() {
        let mut request = two_sector_request();
        request.deals.push(Deal::new(
            "D2",
            "A",
            dec!(10),
            Decimal::ZERO,
            Decimal::ZERO,
            Decimal::ZERO,
        ));

        assert!(matches!(
            request.validate(),
            Err(ValidationError::InvalidRiskScore { .. })
        ));
    }

    #[test]
    fn duplicate_sector_is_rejected() {
        let mut request = two_sector_request();
        request.sectors.push("A".into());

        assert_eq!(
            request.validate(),
            Err(ValidationError::DuplicateSector { sector: "A".into() })
        );
    }

    #[test]
    fn duplicate_deal_id_is_rejected() {
        let mut request = two_sector_request();
        request.deals.push(deal("D1", "A", dec!(10)));

        assert_eq!(
            request.validate(),
            Err(ValidationError::DuplicateDeal {
                deal_id: "D1".into()
            })
        );
    }

    #[test]
    fn non_positive_budget_is_rejected() {
        let request = two_sector_request().with_budget(Decimal::ZERO);

        assert_eq!(
            request.validate(),
            Err(ValidationError::InvalidBudget {
                budget: Decimal::ZERO
            })
        );
    }

    #[test]
    fn negative_capital_is_rejected() {
        let mut request = two_sector_request();
        request
            .current_capital
            .insert(SectorId::from("A"), dec!(-1));

        assert!(matches!(
            request.validate(),
            Err(ValidationError::NegativeCapital { .. })
        ));
    }

    #[test]
    fn deals_in_filters_by_sector() {
        let mut request = two_sector_request();
        request.deals.push(deal("D2", "A", dec!(10)));
        request.deals.push(deal("D3", "B", dec!(20)));

        let b = SectorId::from("B");
        let ids: Vec<&str> = request.deals_in(&b).map(|d| d.deal_id().as_str()).collect();
        assert_eq!(ids, vec!["D1", "D3"]);
    }

    #[test]
    fn request_deserializes_from_toml() {
        let toml = r#"
sectors = ["A", "B"]
budget = 50

[current_capital]
A = 100
B = 0

[desired_weights]
A = 0.5
B = 0.5

[[deals]]
deal_id = "D1"
sector = "B"
size = 50
r1 = 1
r2 = 1
r3 = 1
"#;
        let request: AllocationRequest = toml::from_str(toml).unwrap();
        assert_eq!(request, two_sector_request());
    }
}
