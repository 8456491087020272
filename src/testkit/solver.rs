//! Scripted solver for exercising the allocation service without HiGHS.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use rust_decimal::Decimal;

use crate::error::Result;
use crate::port::outbound::solver::{LpProblem, LpSolution, SolutionStatus, SolveOptions, Solver};

#[derive(Debug, Clone)]
enum Script {
    /// Leading values, padded with zeros to the problem size.
    Prefix(Vec<Decimal>),
    /// Values returned verbatim.
    Exact(Vec<Decimal>),
}

/// A [`Solver`] that returns a fixed status and values.
///
/// Counts calls and remembers the last [`SolveOptions`] it received.
#[derive(Debug)]
pub struct ScriptedSolver {
    status: SolutionStatus,
    script: Script,
    calls: AtomicUsize,
    last_options: Mutex<Option<SolveOptions>>,
}

impl ScriptedSolver {
    /// Return exactly `values` with `status`.
    pub fn new(status: SolutionStatus, values: Vec<Decimal>) -> Self {
        Self::scripted(status, Script::Exact(values))
    }

    /// Return `fractions` in the leading columns and zero elsewhere.
    ///
    /// Allocation models place the deal fractions first, so this scripts
    /// the per-deal answer directly.
    pub fn with_fractions(status: SolutionStatus, fractions: &[Decimal]) -> Self {
        Self::scripted(status, Script::Prefix(fractions.to_vec()))
    }

    /// Report `status` with an all-zero point.
    pub fn failing(status: SolutionStatus) -> Self {
        Self::scripted(status, Script::Prefix(Vec::new()))
    }

    fn scripted(status: SolutionStatus, script: Script) -> Self {
        Self {
            status,
            script,
            calls: AtomicUsize::new(0),
            last_options: Mutex::new(None),
        }
    }

    /// Number of `solve_lp` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Options passed on the most recent call.
    pub fn last_options(&self) -> Option<SolveOptions> {
        self.last_options.lock().map(|o| *o).unwrap_or(None)
    }
}

impl Solver for ScriptedSolver {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn solve_lp(&self, problem: &LpProblem, options: &SolveOptions) -> Result<LpSolution> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_options.lock() {
            *last = Some(*options);
        }

        let values = match &self.script {
            Script::Exact(values) => values.clone(),
            Script::Prefix(prefix) => {
                let mut values = vec![Decimal::ZERO; problem.num_vars()];
                for (slot, v) in values.iter_mut().zip(prefix) {
                    *slot = *v;
                }
                values
            }
        };
        let objective = problem.objective_value(&values);

        Ok(LpSolution {
            values,
            objective,
            status: self.status,
        })
    }
}
