//! Capital allocation: LP model construction and solve orchestration.

pub mod model;
pub mod service;

pub use model::{AllocationModel, RowKind, VariableLayout};
pub use service::{clamp_fraction, AllocationService, AllocationSettings, CLAMP_TOLERANCE};
