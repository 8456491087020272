//! Solver backends implementing the `port::outbound::solver::Solver` trait.

pub mod highs;

pub use highs::HighsSolver;
