//! Linear-program construction for sector rebalancing.
//!
//! Turns a validated [`AllocationRequest`] into an [`LpProblem`]:
//!
//! ```text
//! minimize    Σ_i u_i + Σ_j (size_j / R_j) · y_j
//! subject to  x_i − Σ_{j∈i} size_j · y_j = 0          per sector
//!             X − Σ_j size_j · y_j = 0
//!             t − X = C
//!             X <= B
//!             x_i − d_i·t − u_i <= −C_i                per sector
//!             d_i·t − x_i − u_i <= C_i                 per sector
//!             0 <= y_j <= 1, x_i, X, t, u_i >= 0
//! ```
//!
//! The two deviation rows force `u_i >= |(C_i + x_i) − d_i·t|`; since `u_i`
//! appears only with a positive objective coefficient, it is tight at optimum.
//! Building is pure: no I/O and no state shared between calls.

use std::collections::HashMap;

use rust_decimal::Decimal;
use tracing::debug;

use crate::domain::constraint::{Constraint, VariableBounds};
use crate::domain::error::ValidationError;
use crate::domain::request::{AllocationRequest, WEIGHT_SUM_TOLERANCE};
use crate::domain::{DealId, SectorId};
use crate::port::outbound::solver::LpProblem;

/// Column positions of every model variable.
///
/// Variables are laid out as one contiguous arena:
/// `[y_0..y_D) [x_0..x_S) X t [u_0..u_S)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariableLayout {
    deals: usize,
    sectors: usize,
}

impl VariableLayout {
    /// Layout for `deals` deals and `sectors` sectors.
    #[must_use]
    pub const fn new(deals: usize, sectors: usize) -> Self {
        Self { deals, sectors }
    }

    /// Column of `y_j`, the accepted fraction of deal `j`.
    #[must_use]
    pub const fn fraction(&self, deal: usize) -> usize {
        deal
    }

    /// Column of `x_i`, the top-up routed into sector `i`.
    #[must_use]
    pub const fn top_up(&self, sector: usize) -> usize {
        self.deals + sector
    }

    /// Column of `X`, total new investment.
    #[must_use]
    pub const fn total_new(&self) -> usize {
        self.deals + self.sectors
    }

    /// Column of `t`, portfolio value after the round.
    #[must_use]
    pub const fn total_after(&self) -> usize {
        self.deals + self.sectors + 1
    }

    /// Column of `u_i`, the absolute deviation of sector `i`.
    #[must_use]
    pub const fn deviation(&self, sector: usize) -> usize {
        self.deals + self.sectors + 2 + sector
    }

    /// Total number of columns.
    #[must_use]
    pub const fn column_count(&self) -> usize {
        self.deals + 2 * self.sectors + 2
    }

    /// Number of deal columns.
    #[must_use]
    pub const fn deal_count(&self) -> usize {
        self.deals
    }

    /// Number of sectors.
    #[must_use]
    pub const fn sector_count(&self) -> usize {
        self.sectors
    }
}

/// What a constraint row enforces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowKind {
    /// `x_i = Σ_{j∈i} size_j · y_j`.
    SectorTopUp(SectorId),
    /// `X = Σ_j size_j · y_j`.
    TotalNew,
    /// `t = C + X`.
    TotalAfter,
    /// `X <= B`.
    Budget,
    /// `(C_i + x_i) − d_i·t <= u_i`.
    DeviationAbove(SectorId),
    /// `d_i·t − (C_i + x_i) <= u_i`.
    DeviationBelow(SectorId),
}

/// A complete allocation model ready for a solver.
#[derive(Debug, Clone)]
pub struct AllocationModel {
    layout: VariableLayout,
    problem: LpProblem,
    rows: Vec<RowKind>,
    deal_ids: Vec<DealId>,
    sectors: Vec<SectorId>,
}

impl AllocationModel {
    /// Build the model with the default weight-sum tolerance.
    ///
    /// # Errors
    ///
    /// Returns the first `ValidationError` found in the request; no partial
    /// model is produced.
    pub fn build(request: &AllocationRequest) -> Result<Self, ValidationError> {
        Self::build_with_tolerance(request, WEIGHT_SUM_TOLERANCE)
    }

    /// Build the model, accepting weight sums within `tolerance` of one.
    ///
    /// # Errors
    ///
    /// Returns the first `ValidationError` found in the request.
    pub fn build_with_tolerance(
        request: &AllocationRequest,
        tolerance: Decimal,
    ) -> Result<Self, ValidationError> {
        request.validate_with_tolerance(tolerance)?;

        let layout = VariableLayout::new(request.deals.len(), request.sectors.len());
        let mut problem = LpProblem::new(layout.column_count());

        // Objective: unit weight on every u_i plus size/R on every y_j.
        for (j, deal) in request.deals.iter().enumerate() {
            problem.bounds[layout.fraction(j)] = VariableBounds::unit();
            problem.objective[layout.fraction(j)] = deal.risk_cost();
        }
        for i in 0..layout.sector_count() {
            problem.objective[layout.deviation(i)] = Decimal::ONE;
        }

        let sector_index: HashMap<&SectorId, usize> = request
            .sectors
            .iter()
            .enumerate()
            .map(|(i, s)| (s, i))
            .collect();

        let row_count = 3 * layout.sector_count() + 3;
        let mut rows: Vec<RowKind> = Vec::with_capacity(row_count);
        let mut constraints: Vec<Constraint> = Vec::with_capacity(row_count);
        let zeros = || vec![Decimal::ZERO; layout.column_count()];

        // x_i − Σ_{j∈i} size_j y_j = 0
        let mut top_up_rows: Vec<Vec<Decimal>> = (0..layout.sector_count())
            .map(|i| {
                let mut row = zeros();
                row[layout.top_up(i)] = Decimal::ONE;
                row
            })
            .collect();
        for (j, deal) in request.deals.iter().enumerate() {
            // Validation guarantees the sector is known.
            if let Some(&i) = sector_index.get(deal.sector()) {
                top_up_rows[i][layout.fraction(j)] = -deal.size();
            }
        }
        for (i, row) in top_up_rows.into_iter().enumerate() {
            constraints.push(Constraint::eq(row, Decimal::ZERO));
            rows.push(RowKind::SectorTopUp(request.sectors[i].clone()));
        }

        // X − Σ_j size_j y_j = 0
        let mut row = zeros();
        row[layout.total_new()] = Decimal::ONE;
        for (j, deal) in request.deals.iter().enumerate() {
            row[layout.fraction(j)] = -deal.size();
        }
        constraints.push(Constraint::eq(row, Decimal::ZERO));
        rows.push(RowKind::TotalNew);

        // t − X = C
        let total_capital = request.total_capital();
        let mut row = zeros();
        row[layout.total_after()] = Decimal::ONE;
        row[layout.total_new()] = -Decimal::ONE;
        constraints.push(Constraint::eq(row, total_capital));
        rows.push(RowKind::TotalAfter);

        // X <= B
        let mut row = zeros();
        row[layout.total_new()] = Decimal::ONE;
        constraints.push(Constraint::leq(row, request.budget));
        rows.push(RowKind::Budget);

        for (i, sector) in request.sectors.iter().enumerate() {
            let capital = request.capital(sector).unwrap_or_default();
            let weight = request.weight(sector).unwrap_or_default();

            // x_i − d_i t − u_i <= −C_i
            let mut above = zeros();
            above[layout.top_up(i)] = Decimal::ONE;
            above[layout.total_after()] = -weight;
            above[layout.deviation(i)] = -Decimal::ONE;
            constraints.push(Constraint::leq(above, -capital));
            rows.push(RowKind::DeviationAbove(sector.clone()));

            // d_i t − x_i − u_i <= C_i
            let mut below = zeros();
            below[layout.top_up(i)] = -Decimal::ONE;
            below[layout.total_after()] = weight;
            below[layout.deviation(i)] = -Decimal::ONE;
            constraints.push(Constraint::leq(below, capital));
            rows.push(RowKind::DeviationBelow(sector.clone()));
        }

        problem.constraints = constraints;

        debug!(
            deals = layout.deal_count(),
            sectors = layout.sector_count(),
            variables = layout.column_count(),
            constraints = rows.len(),
            total_capital = %total_capital,
            budget = %request.budget,
            "Built allocation model"
        );

        Ok(Self {
            layout,
            problem,
            rows,
            deal_ids: request.deals.iter().map(|d| d.deal_id().clone()).collect(),
            sectors: request.sectors.clone(),
        })
    }

    /// The linear program to hand to a solver.
    #[must_use]
    pub const fn problem(&self) -> &LpProblem {
        &self.problem
    }

    /// Column positions of the model variables.
    #[must_use]
    pub const fn layout(&self) -> &VariableLayout {
        &self.layout
    }

    /// Row kinds, parallel to `problem().constraints`.
    #[must_use]
    pub fn rows(&self) -> &[RowKind] {
        &self.rows
    }

    /// Deal ids in column order of their `y_j` variables.
    #[must_use]
    pub fn deal_ids(&self) -> &[DealId] {
        &self.deal_ids
    }

    /// Sectors in column order of their `x_i` / `u_i` variables.
    #[must_use]
    pub fn sectors(&self) -> &[SectorId] {
        &self.sectors
    }

    /// The constraint row of the given kind, if present.
    #[must_use]
    pub fn row(&self, kind: &RowKind) -> Option<&Constraint> {
        self.rows
            .iter()
            .position(|k| k == kind)
            .map(|idx| &self.problem.constraints[idx])
    }

    /// Complete variable vector implied by deal fractions `y`.
    ///
    /// Fills `x_i`, `X`, `t` from their defining equalities and sets each
    /// `u_i` to its tight value `|g_i|`. Useful for checking that a candidate
    /// allocation is feasible for the model.
    #[must_use]
    pub fn point_for(&self, request: &AllocationRequest, fractions: &[Decimal]) -> Vec<Decimal> {
        let layout = self.layout;
        let mut point = vec![Decimal::ZERO; layout.column_count()];

        let mut total_new = Decimal::ZERO;
        for (j, deal) in request.deals.iter().enumerate() {
            let y = fractions.get(j).copied().unwrap_or_default();
            point[layout.fraction(j)] = y;
            let committed = deal.committed(y);
            total_new += committed;
            if let Some(i) = self.sectors.iter().position(|s| s == deal.sector()) {
                point[layout.top_up(i)] += committed;
            }
        }

        let total_after = request.total_capital() + total_new;
        point[layout.total_new()] = total_new;
        point[layout.total_after()] = total_after;

        for (i, sector) in self.sectors.iter().enumerate() {
            let capital = request.capital(sector).unwrap_or_default();
            let weight = request.weight(sector).unwrap_or_default();
            let gap = capital + point[layout.top_up(i)] - weight * total_after;
            point[layout.deviation(i)] = gap.abs();
        }

        point
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::constraint::ConstraintSense;
    use crate::domain::Deal;
    use rust_decimal_macros::dec;

    fn request() -> AllocationRequest {
        AllocationRequest::new(
            ["Retail", "Defence", "Finance"],
            [
                ("Retail", dec!(7000000)),
                ("Defence", dec!(0)),
                ("Finance", dec!(2000000)),
            ],
            [
                ("Retail", dec!(0.50)),
                ("Defence", dec!(0.30)),
                ("Finance", dec!(0.20)),
            ],
            vec![
                Deal::new("D1", "Retail", dec!(5000000), dec!(2), dec!(3), dec!(4)),
                Deal::new("D2", "Defence", dec!(4000000), dec!(5), dec!(5), dec!(5)),
                Deal::new("D3", "Finance", dec!(3000000), dec!(1), dec!(2), dec!(2)),
            ],
            dec!(6000000),
        )
    }

    #[test]
    fn layout_assigns_disjoint_columns() {
        let layout = VariableLayout::new(3, 2);
        let mut columns = vec![
            layout.fraction(0),
            layout.fraction(1),
            layout.fraction(2),
            layout.top_up(0),
            layout.top_up(1),
            layout.total_new(),
            layout.total_after(),
            layout.deviation(0),
            layout.deviation(1),
        ];
        columns.sort_unstable();
        columns.dedup();
        assert_eq!(columns, (0..layout.column_count()).collect::<Vec<_>>());
    }

    #[test]
    fn model_has_expected_shape() {
        let model = AllocationModel::build(&request()).unwrap();
        let problem = model.problem();

        assert_eq!(problem.num_vars(), 3 + 2 * 3 + 2);
        assert_eq!(problem.constraints.len(), 3 + 3 + 2 * 3);
        assert_eq!(model.rows().len(), problem.constraints.len());
        assert_eq!(model.deal_ids().len(), 3);
    }

    #[test]
    fn fractions_are_bounded_to_unit_interval() {
        let model = AllocationModel::build(&request()).unwrap();
        let layout = model.layout();
        for j in 0..3 {
            assert_eq!(
                model.problem().bounds[layout.fraction(j)],
                VariableBounds::unit()
            );
        }
        assert_eq!(
            model.problem().bounds[layout.total_after()],
            VariableBounds::non_negative()
        );
    }

    #[test]
    fn objective_sums_deviations_and_risk_cost() {
        let model = AllocationModel::build(&request()).unwrap();
        let layout = model.layout();
        let objective = &model.problem().objective;

        assert_eq!(objective[layout.fraction(1)], dec!(4000000) / dec!(15));
        assert_eq!(objective[layout.fraction(2)], dec!(600000));
        for i in 0..3 {
            assert_eq!(objective[layout.deviation(i)], Decimal::ONE);
            assert_eq!(objective[layout.top_up(i)], Decimal::ZERO);
        }
        assert_eq!(objective[layout.total_new()], Decimal::ZERO);
    }

    #[test]
    fn budget_row_caps_total_new() {
        let model = AllocationModel::build(&request()).unwrap();
        let budget = model.row(&RowKind::Budget).unwrap();

        assert_eq!(budget.sense, ConstraintSense::LessEqual);
        assert_eq!(budget.rhs, dec!(6000000));
        assert_eq!(budget.coefficients[model.layout().total_new()], Decimal::ONE);
    }

    #[test]
    fn total_after_row_carries_current_capital() {
        let model = AllocationModel::build(&request()).unwrap();
        let row = model.row(&RowKind::TotalAfter).unwrap();

        assert_eq!(row.sense, ConstraintSense::Equal);
        assert_eq!(row.rhs, dec!(9000000));
    }

    #[test]
    fn sector_rows_only_touch_their_own_deals() {
        let model = AllocationModel::build(&request()).unwrap();
        let layout = model.layout();
        let row = model
            .row(&RowKind::SectorTopUp("Defence".into()))
            .unwrap();

        assert_eq!(row.coefficients[layout.top_up(1)], Decimal::ONE);
        assert_eq!(row.coefficients[layout.fraction(1)], dec!(-4000000));
        assert_eq!(row.coefficients[layout.fraction(0)], Decimal::ZERO);
        assert_eq!(row.coefficients[layout.fraction(2)], Decimal::ZERO);
    }

    #[test]
    fn deviation_rows_bracket_the_gap() {
        let model = AllocationModel::build(&request()).unwrap();
        let above = model
            .row(&RowKind::DeviationAbove("Finance".into()))
            .unwrap();
        let below = model
            .row(&RowKind::DeviationBelow("Finance".into()))
            .unwrap();

        assert_eq!(above.rhs, dec!(-2000000));
        assert_eq!(below.rhs, dec!(2000000));
        assert_eq!(above.coefficients[model.layout().total_after()], dec!(-0.20));
        assert_eq!(below.coefficients[model.layout().total_after()], dec!(0.20));
    }

    #[test]
    fn implied_point_is_feasible() {
        let request = request();
        let model = AllocationModel::build(&request).unwrap();
        let point = model.point_for(&request, &[dec!(0.2), dec!(1), dec!(0)]);

        assert!(model.problem().is_feasible(&point, dec!(0.000001)));
        assert_eq!(point[model.layout().total_new()], dec!(5000000));
    }

    #[test]
    fn over_budget_point_is_infeasible() {
        let request = request();
        let model = AllocationModel::build(&request).unwrap();
        let point = model.point_for(&request, &[dec!(1), dec!(1), dec!(0)]);

        assert!(!model.problem().is_feasible(&point, dec!(0.000001)));
    }

    #[test]
    fn validation_failure_produces_no_model() {
        let mut request = request();
        request.desired_weights.insert("Finance".into(), dec!(0.19));

        assert_eq!(
            AllocationModel::build(&request).unwrap_err(),
            ValidationError::InvalidWeightDistribution { sum: dec!(0.99) }
        );
    }

    #[test]
    fn model_without_deals_still_builds() {
        let mut request = request();
        request.deals.clear();
        let model = AllocationModel::build(&request).unwrap();

        assert_eq!(model.problem().num_vars(), 2 * 3 + 2);
        assert!(model.deal_ids().is_empty());
    }
}
