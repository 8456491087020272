//! Outbound adapters (driven side): implementations of outbound ports and
//! readers for external files.

pub mod portfolio;
pub mod solver;
