use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::error::ValidationError;
use crate::domain::thesis::ThesisError;
use crate::domain::DealId;
use crate::port::outbound::solver::SolutionStatus;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Allocation errors: invalid inputs or an unusable solver result.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AllocationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("solve failed: solver status {status}")]
    SolveFailed { status: SolutionStatus },

    #[error("solver returned {value} for deal '{deal_id}', outside [0, 1]")]
    FractionOutOfRange { deal_id: DealId, value: Decimal },

    #[error("solver returned {found} values for a model with {expected} variables")]
    MalformedSolution { expected: usize, found: usize },
}

/// Errors reading an uploaded portfolio.
#[derive(Error, Debug)]
pub enum PortfolioError {
    #[error("failed to read portfolio: {0}")]
    Csv(#[from] csv::Error),

    #[error("row {row}: invalid {column} '{value}'")]
    InvalidField {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("row {row}: invested amount {invested} is negative")]
    NegativeInvested { row: usize, invested: Decimal },
}

/// Failures inside a solver backend (distinct from infeasible/unbounded statuses).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolverError {
    #[error("value {value} for variable {index} cannot be represented")]
    Conversion { index: usize, value: String },

    #[error("right-hand side {value} of row {row} cannot be represented")]
    RhsConversion { row: usize, value: String },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Allocation(#[from] AllocationError),

    #[error(transparent)]
    Portfolio(#[from] PortfolioError),

    #[error(transparent)]
    Thesis(#[from] ThesisError),

    #[error(transparent)]
    Solver(#[from] SolverError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<ValidationError> for Error {
    fn from(err: ValidationError) -> Self {
        Error::Allocation(AllocationError::Validation(err))
    }
}
