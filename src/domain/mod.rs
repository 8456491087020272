//! Solver-agnostic domain types.

mod deal;
mod id;

pub mod allocation;
pub mod constraint;
pub mod error;
pub mod holding;
pub mod request;
pub mod thesis;

pub use allocation::{Allocation, AllocationOutcome, DealFraction, SectorOutcome};
pub use deal::Deal;
pub use id::{DealId, SectorId};
pub use request::AllocationRequest;
