//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`domain`] - Builders for requests and deals, including the
//!   Retail / Defence / Finance walkthrough.
//! - [`solver`] - [`ScriptedSolver`](solver::ScriptedSolver), a fake
//!   [`Solver`](crate::port::outbound::solver::Solver) that returns a fixed
//!   status and records its calls.

pub mod domain;
pub mod solver;
