//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! # Available Ports
//!
//! - [`outbound::solver::Solver`] - LP optimization backend
//!
//! The CLI drives the application services directly, so there are no
//! inbound ports.

pub mod outbound;
