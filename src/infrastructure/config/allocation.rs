//! Allocation tolerances.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::solver::SolverConfig;
use crate::application::allocation::{AllocationSettings, CLAMP_TOLERANCE};
use crate::domain::request::WEIGHT_SUM_TOLERANCE;
use crate::error::{ConfigError, Result};

/// `[allocation]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct AllocationConfig {
    /// Accepted distance of the desired-weight sum from one.
    pub weight_tolerance: Decimal,

    /// Distance from 0 or 1 within which solver output snaps to the bound.
    pub clamp_tolerance: Decimal,
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            weight_tolerance: WEIGHT_SUM_TOLERANCE,
            clamp_tolerance: CLAMP_TOLERANCE,
        }
    }
}

impl AllocationConfig {
    /// Service settings combining these tolerances with solver options.
    #[must_use]
    pub fn settings(&self, solver: &SolverConfig) -> AllocationSettings {
        AllocationSettings {
            weight_tolerance: self.weight_tolerance,
            clamp_tolerance: self.clamp_tolerance,
            solve: solver.options(),
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        check_tolerance("allocation.weight_tolerance", self.weight_tolerance)?;
        check_tolerance("allocation.clamp_tolerance", self.clamp_tolerance)
    }
}

fn check_tolerance(field: &'static str, value: Decimal) -> Result<()> {
    if value <= Decimal::ZERO || value >= Decimal::ONE {
        return Err(ConfigError::InvalidValue {
            field,
            reason: "must be greater than 0 and less than 1".to_string(),
        }
        .into());
    }
    Ok(())
}
