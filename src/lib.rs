//! Bundlefit - sector-rebalancing capital allocation.
//!
//! Given a portfolio's current capital per sector, target sector weights, a
//! budget of new capital and a set of candidate deals, bundlefit decides what
//! fraction of each deal to accept. The choice is a linear program: minimize
//! the total deviation from target weights plus a risk-adjusted cost of the
//! capital committed, subject to the budget.
//!
//! # Architecture
//!
//! The crate follows a hexagonal layout:
//!
//! - **`domain`** - Requests, deals, allocations, holdings and thesis
//!   summaries. No I/O.
//! - **`port`** - The [`Solver`](port::outbound::solver::Solver) trait every
//!   LP backend implements.
//! - **`application`** - [`AllocationModel`](application::allocation::AllocationModel)
//!   builds the LP and [`AllocationService`](application::allocation::AllocationService)
//!   solves it and reads back fractions.
//! - **`adapter`** - HiGHS via `good_lp`, the holdings CSV reader, and the CLI.
//! - **`infrastructure`** - Configuration, logging and component factories.
//!
//! # Example
//!
//! ```no_run
//! use bundlefit::infrastructure::config::settings::Config;
//! use bundlefit::infrastructure::factory::solver::build_allocation_service;
//! use bundlefit::domain::{AllocationRequest, Deal};
//! use rust_decimal_macros::dec;
//!
//! let request = AllocationRequest::new(
//!     ["A", "B"],
//!     [("A", dec!(100)), ("B", dec!(0))],
//!     [("A", dec!(0.5)), ("B", dec!(0.5))],
//!     vec![Deal::new("D1", "B", dec!(50), dec!(1), dec!(1), dec!(1))],
//!     dec!(50),
//! );
//!
//! let service = build_allocation_service(&Config::default());
//! let allocation = service.allocate(&request).unwrap();
//! println!("{:?}", allocation.fraction(&"D1".into()));
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
