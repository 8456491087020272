//! Allocation use case: build the model, solve it, read back fractions.

use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{debug, info, warn};

use super::model::AllocationModel;
use crate::domain::allocation::{Allocation, DealFraction};
use crate::domain::request::{AllocationRequest, WEIGHT_SUM_TOLERANCE};
use crate::error::{AllocationError, Result};
use crate::port::outbound::solver::{SolveOptions, Solver};

/// Default distance from 0 or 1 within which a returned fraction snaps to the bound.
pub const CLAMP_TOLERANCE: Decimal = dec!(0.000001);

/// Settings for the allocation service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocationSettings {
    /// Accepted distance of the desired-weight sum from one.
    pub weight_tolerance: Decimal,
    /// Solver noise tolerance on returned fractions.
    pub clamp_tolerance: Decimal,
    /// Options passed to the solver on every call.
    pub solve: SolveOptions,
}

impl Default for AllocationSettings {
    fn default() -> Self {
        Self {
            weight_tolerance: WEIGHT_SUM_TOLERANCE,
            clamp_tolerance: CLAMP_TOLERANCE,
            solve: SolveOptions::default(),
        }
    }
}

/// Computes deal acceptance fractions with a pluggable LP solver.
///
/// Holds no per-request state; one instance can serve concurrent callers.
pub struct AllocationService {
    solver: Arc<dyn Solver>,
    settings: AllocationSettings,
}

impl AllocationService {
    /// Create a new service around `solver`.
    pub fn new(solver: Arc<dyn Solver>, settings: AllocationSettings) -> Self {
        Self { solver, settings }
    }

    /// Name of the configured solver backend.
    #[must_use]
    pub fn solver_name(&self) -> &'static str {
        self.solver.name()
    }

    /// Active settings.
    #[must_use]
    pub const fn settings(&self) -> &AllocationSettings {
        &self.settings
    }

    /// Validate `request`, solve it, and return a fraction for every deal.
    ///
    /// # Errors
    ///
    /// Returns `AllocationError::Validation` before any solver call if the
    /// request is invalid, `AllocationError::SolveFailed` if the solver
    /// reports anything other than optimal or feasible, and
    /// `AllocationError::FractionOutOfRange` if a returned fraction lies
    /// outside `[0, 1]` beyond the clamp tolerance.
    pub fn allocate(&self, request: &AllocationRequest) -> Result<Allocation> {
        let model = AllocationModel::build_with_tolerance(request, self.settings.weight_tolerance)
            .map_err(AllocationError::from)?;
        self.solve(&model)
    }

    /// Solve an already-built model.
    ///
    /// The model's problem is handed to the solver unmodified.
    ///
    /// # Errors
    ///
    /// See [`AllocationService::allocate`].
    pub fn solve(&self, model: &AllocationModel) -> Result<Allocation> {
        let problem = model.problem();
        debug!(
            solver = self.solver.name(),
            variables = problem.num_vars(),
            constraints = problem.constraints.len(),
            "Solving allocation model"
        );

        let solution = self.solver.solve_lp(problem, &self.settings.solve)?;

        if !solution.status.is_success() {
            warn!(
                solver = self.solver.name(),
                status = %solution.status,
                "Allocation solve failed"
            );
            return Err(AllocationError::SolveFailed {
                status: solution.status,
            }
            .into());
        }

        if solution.values.len() != problem.num_vars() {
            return Err(AllocationError::MalformedSolution {
                expected: problem.num_vars(),
                found: solution.values.len(),
            }
            .into());
        }

        let layout = model.layout();
        let tolerance = self.settings.clamp_tolerance;
        let fractions = model
            .deal_ids()
            .iter()
            .enumerate()
            .map(|(j, deal_id)| {
                let raw = solution.values[layout.fraction(j)];
                clamp_fraction(raw, tolerance)
                    .map(|fraction| DealFraction {
                        deal_id: deal_id.clone(),
                        fraction,
                    })
                    .ok_or_else(|| AllocationError::FractionOutOfRange {
                        deal_id: deal_id.clone(),
                        value: raw,
                    })
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let accepted = fractions
            .iter()
            .filter(|f| f.fraction > Decimal::ZERO)
            .count();
        info!(
            solver = self.solver.name(),
            status = %solution.status,
            objective = %solution.objective,
            deals = fractions.len(),
            accepted,
            "Allocation solved"
        );

        Ok(Allocation::new(
            fractions,
            solution.objective,
            solution.is_optimal(),
        ))
    }
}

/// Snap solver noise onto `[0, 1]`.
///
/// Values within `tolerance` of 0 or 1 become exactly 0 or 1; other values in
/// `[0, 1]` pass through; anything further outside returns `None`.
#[must_use]
pub fn clamp_fraction(value: Decimal, tolerance: Decimal) -> Option<Decimal> {
    if value.abs() <= tolerance {
        return Some(Decimal::ZERO);
    }
    if (value - Decimal::ONE).abs() <= tolerance {
        return Some(Decimal::ONE);
    }
    (Decimal::ZERO..=Decimal::ONE)
        .contains(&value)
        .then_some(value)
}
