//! Solver backend configuration.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::port::outbound::solver::SolveOptions;

/// Supported LP backends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SolverBackend {
    /// HiGHS via good_lp.
    #[default]
    Highs,
}

impl fmt::Display for SolverBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Highs => write!(f, "highs"),
        }
    }
}

/// `[solver]` section.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Backend used for allocation solves.
    pub backend: SolverBackend,

    /// Let the backend print its own progress log.
    pub verbose: bool,

    /// Wall-clock limit per solve, in seconds. Unlimited when absent.
    pub time_limit_secs: Option<f64>,
}

impl SolverConfig {
    /// Options passed to the backend on every solve.
    #[must_use]
    pub fn options(&self) -> SolveOptions {
        let options = SolveOptions::default().verbose(self.verbose);
        match self.time_limit_secs {
            Some(secs) => match Duration::try_from_secs_f64(secs) {
                Ok(limit) => options.with_time_limit(limit),
                Err(_) => options,
            },
            None => options,
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if let Some(secs) = self.time_limit_secs {
            if !secs.is_finite() || secs <= 0.0 {
                return Err(ConfigError::InvalidValue {
                    field: "solver.time_limit_secs",
                    reason: "must be greater than 0".to_string(),
                }
                .into());
            }
        }
        Ok(())
    }
}
