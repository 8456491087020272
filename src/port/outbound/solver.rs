//! Solver port for linear programming.
//!
//! Defines the contract an LP backend must satisfy to serve the allocator:
//! minimize a linear objective subject to linear equality/inequality rows and
//! per-variable bounds, then report a status and the variable values.
//!
//! # Overview
//!
//! - [`Solver`]: Core LP solver interface
//! - [`LpProblem`]: Problem definition
//! - [`SolveOptions`]: Per-call backend settings
//! - [`LpSolution`] / [`SolutionStatus`]: Solution representation

use std::fmt;
use std::time::Duration;

use rust_decimal::Decimal;

use crate::domain::constraint::{Constraint, VariableBounds};
use crate::error::Result;

/// Linear programming solver.
///
/// Implementations wrap specific solver backends (HiGHS, CBC, GLPK, etc.)
/// and provide a unified interface for optimization problems.
///
/// # Thread Safety
///
/// Implementations must be thread-safe (`Send + Sync`) so one solver handle
/// can serve concurrent allocation requests.
///
/// # Implementation Notes
///
/// - Infeasible and unbounded problems are reported through
///   [`SolutionStatus`], not as `Err`; `Err` is reserved for failures to run
///   the backend at all.
/// - A solve stopped by a time or iteration limit that still holds a feasible
///   point reports [`SolutionStatus::Feasible`].
pub trait Solver: Send + Sync {
    /// Return the solver name for logging and configuration.
    fn name(&self) -> &'static str;

    /// Solve a linear programming problem.
    ///
    /// Minimizes the objective function `c * x` subject to the constraints.
    ///
    /// # Arguments
    ///
    /// * `problem` - The LP problem definition.
    /// * `options` - Backend settings for this call.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend could not be invoked.
    fn solve_lp(&self, problem: &LpProblem, options: &SolveOptions) -> Result<LpSolution>;
}

/// Per-call solver settings, passed through to the backend unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolveOptions {
    /// Let the backend print its own progress log.
    pub verbose: bool,

    /// Wall-clock limit for one solve.
    pub time_limit: Option<Duration>,
}

impl SolveOptions {
    /// Options with backend output enabled or disabled.
    #[must_use]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Options with a time limit.
    #[must_use]
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }
}

/// Linear programming problem definition.
///
/// Represents a minimization problem of the form:
///
/// ```text
/// minimize    c^T * x
/// subject to  constraints
///             bounds on x
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LpProblem {
    /// Objective function coefficients.
    ///
    /// The solver minimizes `c^T * x` where `c` is this vector.
    pub objective: Vec<Decimal>,

    /// Linear constraints on the variables.
    pub constraints: Vec<Constraint>,

    /// Lower and upper bounds for each variable.
    pub bounds: Vec<VariableBounds>,
}

impl LpProblem {
    /// Create a new LP problem with the specified number of variables.
    ///
    /// Initializes all objective coefficients to zero and all variable bounds
    /// to their defaults.
    ///
    /// # Arguments
    ///
    /// * `num_vars` - Number of decision variables.
    #[must_use]
    pub fn new(num_vars: usize) -> Self {
        Self {
            objective: vec![Decimal::ZERO; num_vars],
            constraints: Vec::new(),
            bounds: vec![VariableBounds::default(); num_vars],
        }
    }

    /// Return the number of decision variables.
    #[must_use]
    pub fn num_vars(&self) -> usize {
        self.objective.len()
    }

    /// Evaluate the objective at `values`.
    #[must_use]
    pub fn objective_value(&self, values: &[Decimal]) -> Decimal {
        self.objective
            .iter()
            .zip(values.iter())
            .map(|(c, v)| *c * *v)
            .sum()
    }

    /// Check all constraints and bounds at `values` within `tolerance`.
    #[must_use]
    pub fn is_feasible(&self, values: &[Decimal], tolerance: Decimal) -> bool {
        values.len() == self.num_vars()
            && self
                .bounds
                .iter()
                .zip(values.iter())
                .all(|(b, v)| b.contains(*v, tolerance))
            && self
                .constraints
                .iter()
                .all(|c| c.is_satisfied(values, tolerance))
    }
}

/// Solution to a linear programming problem.
#[derive(Debug, Clone, PartialEq)]
pub struct LpSolution {
    /// Values for each decision variable.
    pub values: Vec<Decimal>,

    /// Objective function value at `values`.
    pub objective: Decimal,

    /// Termination status of the solver.
    pub status: SolutionStatus,
}

impl LpSolution {
    /// A solution carrying no usable point.
    #[must_use]
    pub fn failed(status: SolutionStatus, num_vars: usize) -> Self {
        Self {
            values: vec![Decimal::ZERO; num_vars],
            objective: Decimal::ZERO,
            status,
        }
    }

    /// Return `true` if the solver found an optimal solution.
    #[must_use]
    pub fn is_optimal(&self) -> bool {
        self.status == SolutionStatus::Optimal
    }
}

/// Termination status of an optimization solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolutionStatus {
    /// Solver found a globally optimal solution.
    Optimal,

    /// Solver stopped with a feasible point not proven optimal.
    Feasible,

    /// No feasible solution exists.
    Infeasible,

    /// Objective function is unbounded.
    Unbounded,

    /// Solver encountered an internal error.
    Error,
}

impl SolutionStatus {
    /// Whether the solution's values may be used.
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Optimal | Self::Feasible)
    }

    /// Raw status text.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Optimal => "Optimal",
            Self::Feasible => "Feasible",
            Self::Infeasible => "Infeasible",
            Self::Unbounded => "Unbounded",
            Self::Error => "Error",
        }
    }
}

impl fmt::Display for SolutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
