//! HiGHS solver implementation via good_lp.
//!
//! HiGHS is a high-performance open-source linear programming solver.
//! This implementation wraps it using the good_lp crate; decimals are
//! converted to `f64` only at this boundary.

use good_lp::solvers::highs::highs;
use good_lp::{
    constraint, variable, variables, Expression, ResolutionError, Solution, SolverModel, Variable,
};
use good_lp::SolutionStatus as HighsStatus;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::domain::constraint::ConstraintSense;
use crate::error::{Result, SolverError};
use crate::port::outbound::solver::{LpProblem, LpSolution, SolutionStatus, SolveOptions, Solver};

/// HiGHS-based LP solver.
#[derive(Debug, Default, Clone)]
pub struct HighsSolver;

impl HighsSolver {
    /// Create a new HiGHS solver instance.
    pub fn new() -> Self {
        Self
    }
}

impl Solver for HighsSolver {
    fn name(&self) -> &'static str {
        "highs"
    }

    fn solve_lp(&self, problem: &LpProblem, options: &SolveOptions) -> Result<LpSolution> {
        solve_with_good_lp(problem, options)
    }
}

fn to_f64(index: usize, value: Decimal) -> Result<f64> {
    value.to_f64().ok_or_else(|| {
        SolverError::Conversion {
            index,
            value: value.to_string(),
        }
        .into()
    })
}

fn from_f64(index: usize, value: f64) -> Result<Decimal> {
    Decimal::try_from(value).map_err(|_| {
        SolverError::Conversion {
            index,
            value: value.to_string(),
        }
        .into()
    })
}

/// Status of a solve that returned a primal solution.
///
/// HiGHS hands back its incumbent when it stops on a time, iteration or gap
/// limit; that point is feasible but not proven optimal.
fn solved_status(status: HighsStatus) -> SolutionStatus {
    match status {
        HighsStatus::Optimal => SolutionStatus::Optimal,
        HighsStatus::TimeLimit | HighsStatus::GapLimit => SolutionStatus::Feasible,
    }
}

fn linear(vars: &[Variable], coefficients: &[Decimal]) -> Result<Expression> {
    let coefficients = coefficients
        .iter()
        .enumerate()
        .map(|(i, c)| to_f64(i, *c))
        .collect::<Result<Vec<f64>>>()?;

    Ok(vars
        .iter()
        .zip(coefficients)
        .map(|(v, c)| c * *v)
        .sum())
}

fn solve_with_good_lp(problem: &LpProblem, options: &SolveOptions) -> Result<LpSolution> {
    let n = problem.num_vars();

    if n == 0 {
        return Ok(LpSolution {
            values: vec![],
            objective: Decimal::ZERO,
            status: SolutionStatus::Optimal,
        });
    }

    let mut vars = variables!();
    let mut var_list = Vec::with_capacity(n);

    for (i, bounds) in problem.bounds.iter().enumerate() {
        let mut v = variable();
        if let Some(lb) = bounds.lower {
            v = v.min(to_f64(i, lb)?);
        }
        if let Some(ub) = bounds.upper {
            v = v.max(to_f64(i, ub)?);
        }
        var_list.push(vars.add(v));
    }

    let objective = linear(&var_list, &problem.objective)?;

    let mut model = vars.minimise(&objective).using(highs);
    model.set_verbose(options.verbose);
    if let Some(limit) = options.time_limit {
        model = model.set_option("time_limit", limit.as_secs_f64());
    }

    for (row, constr) in problem.constraints.iter().enumerate() {
        let lhs = linear(&var_list, &constr.coefficients)?;
        let rhs = constr.rhs.to_f64().ok_or_else(|| SolverError::RhsConversion {
            row,
            value: constr.rhs.to_string(),
        })?;

        model = match constr.sense {
            ConstraintSense::GreaterEqual => model.with(constraint!(lhs >= rhs)),
            ConstraintSense::LessEqual => model.with(constraint!(lhs <= rhs)),
            ConstraintSense::Equal => model.with(constraint!(lhs == rhs)),
        };
    }

    debug!(
        variables = n,
        constraints = problem.constraints.len(),
        "Running HiGHS"
    );

    match model.solve() {
        Ok(solution) => {
            let values = var_list
                .iter()
                .enumerate()
                .map(|(i, v)| from_f64(i, solution.value(*v)))
                .collect::<Result<Vec<Decimal>>>()?;
            let objective = problem.objective_value(&values);
            let status = solved_status(solution.status());
            if status != SolutionStatus::Optimal {
                warn!(%status, "HiGHS stopped on a limit before proving optimality");
            }

            Ok(LpSolution {
                values,
                objective,
                status,
            })
        }
        Err(err) => {
            let status = match err {
                ResolutionError::Infeasible => SolutionStatus::Infeasible,
                ResolutionError::Unbounded => SolutionStatus::Unbounded,
                other => {
                    warn!(error = %other, "HiGHS reported an error");
                    SolutionStatus::Error
                }
            };
            Ok(LpSolution::failed(status, n))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::constraint::{Constraint, VariableBounds};
    use rust_decimal_macros::dec;

    fn solve(problem: &LpProblem) -> LpSolution {
        HighsSolver::new()
            .solve_lp(problem, &SolveOptions::default())
            .unwrap()
    }

    #[test]
    fn test_limit_stops_are_feasible_not_optimal() {
        assert_eq!(solved_status(HighsStatus::Optimal), SolutionStatus::Optimal);
        assert_eq!(solved_status(HighsStatus::TimeLimit), SolutionStatus::Feasible);
        assert_eq!(solved_status(HighsStatus::GapLimit), SolutionStatus::Feasible);
    }

    #[test]
    fn test_non_finite_values_are_conversion_errors() {
        assert!(matches!(
            from_f64(3, f64::NAN),
            Err(crate::error::Error::Solver(SolverError::Conversion { index: 3, .. }))
        ));
        assert!(from_f64(0, f64::INFINITY).is_err());
        assert_eq!(from_f64(0, 0.25).unwrap(), dec!(0.25));
    }

    #[test]
    fn test_rhs_conversion_error_names_the_row() {
        let err = SolverError::RhsConversion {
            row: 4,
            value: "7".into(),
        };
        assert_eq!(err.to_string(), "right-hand side 7 of row 4 cannot be represented");
    }

    #[test]
    fn test_solver_name() {
        assert_eq!(HighsSolver::new().name(), "highs");
    }

    #[test]
    fn test_simple_lp() {
        // Minimize: x + y
        // Subject to: x + y >= 1
        let problem = LpProblem {
            objective: vec![Decimal::ONE, Decimal::ONE],
            constraints: vec![Constraint::geq(
                vec![Decimal::ONE, Decimal::ONE],
                Decimal::ONE,
            )],
            bounds: vec![VariableBounds::non_negative(); 2],
        };

        let solution = solve(&problem);

        assert!(solution.is_optimal());
        let sum: Decimal = solution.values.iter().sum();
        assert!((sum - Decimal::ONE).abs() < dec!(0.01), "sum was {sum}");
        assert!((solution.objective - Decimal::ONE).abs() < dec!(0.01));
    }

    #[test]
    fn test_equality_constraint() {
        // Minimize: x
        // Subject to: x + y = 2
        let problem = LpProblem {
            objective: vec![Decimal::ONE, Decimal::ZERO],
            constraints: vec![Constraint::eq(vec![Decimal::ONE, Decimal::ONE], dec!(2))],
            bounds: vec![VariableBounds::non_negative(); 2],
        };

        let solution = solve(&problem);

        assert!(solution.is_optimal());
        assert!(solution.values[0].abs() < dec!(0.01));
        assert!((solution.values[1] - dec!(2)).abs() < dec!(0.01));
    }

    #[test]
    fn test_free_variable_with_absolute_value_split() {
        // Minimize u subject to u >= x - 3, u >= 3 - x, x = 1 (x free)
        let problem = LpProblem {
            objective: vec![Decimal::ZERO, Decimal::ONE],
            constraints: vec![
                Constraint::eq(vec![Decimal::ONE, Decimal::ZERO], Decimal::ONE),
                Constraint::leq(vec![Decimal::ONE, -Decimal::ONE], dec!(3)),
                Constraint::leq(vec![-Decimal::ONE, -Decimal::ONE], dec!(-3)),
            ],
            bounds: vec![VariableBounds::free(), VariableBounds::non_negative()],
        };

        let solution = solve(&problem);

        assert!(solution.is_optimal());
        assert!((solution.values[1] - dec!(2)).abs() < dec!(0.0001));
    }

    #[test]
    fn test_empty_problem() {
        let solution = solve(&LpProblem::new(0));

        assert!(solution.is_optimal());
        assert!(solution.values.is_empty());
    }

    #[test]
    fn test_infeasible_problem_reports_status() {
        // x <= 1 and x >= 2
        let problem = LpProblem {
            objective: vec![Decimal::ONE],
            constraints: vec![
                Constraint::leq(vec![Decimal::ONE], Decimal::ONE),
                Constraint::geq(vec![Decimal::ONE], dec!(2)),
            ],
            bounds: vec![VariableBounds::non_negative()],
        };

        let solution = solve(&problem);

        assert_eq!(solution.status, SolutionStatus::Infeasible);
        assert!(!solution.status.is_success());
    }

    #[test]
    fn test_verbose_and_time_limit_still_solve() {
        let problem = LpProblem {
            objective: vec![Decimal::ONE],
            constraints: vec![Constraint::geq(vec![Decimal::ONE], dec!(0.5))],
            bounds: vec![VariableBounds::unit()],
        };
        let options = SolveOptions::default()
            .verbose(false)
            .with_time_limit(std::time::Duration::from_secs(10));

        let solution = HighsSolver::new().solve_lp(&problem, &options).unwrap();

        assert!(solution.is_optimal());
        assert!((solution.values[0] - dec!(0.5)).abs() < dec!(0.0001));
    }
}
