//! Infrastructure configuration modules.

pub mod allocation;
pub mod logging;
pub mod settings;
pub mod solver;
