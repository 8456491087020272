//! Solver factory.
//!
//! Provides factory functions for constructing the LP solver and the
//! allocation service that drives it.

use std::sync::Arc;

use crate::adapter::outbound::solver::HighsSolver;
use crate::application::allocation::AllocationService;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::config::solver::{SolverBackend, SolverConfig};
use crate::port::outbound::solver::Solver;

/// Build the configured LP solver backend.
pub fn build_solver(config: &SolverConfig) -> Arc<dyn Solver> {
    match config.backend {
        SolverBackend::Highs => Arc::new(HighsSolver::new()),
    }
}

/// Build an allocation service from application configuration.
pub fn build_allocation_service(config: &Config) -> AllocationService {
    AllocationService::new(build_solver(&config.solver), config.allocation_settings())
}
