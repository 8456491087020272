//! Builders for domain primitives used across tests.
//!
//! Provides concise factory functions so tests focus on assertions rather
//! than construction boilerplate.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::domain::{AllocationRequest, Deal};

/// Create a deal whose three risk sub-scores are all `risk`.
pub fn deal(id: &str, sector: &str, size: Decimal, risk: Decimal) -> Deal {
    Deal::new(id, sector, size, risk, risk, risk)
}

/// Retail / Defence / Finance walkthrough.
///
/// Current capital 7m / 0 / 2m with targets 50% / 30% / 20%, a 6m budget and
/// one deal per sector: D1 Retail 5m (risk 9), D2 Defence 4m (risk 15),
/// D3 Finance 3m (risk 5).
pub fn example_request() -> AllocationRequest {
    AllocationRequest::new(
        ["Retail", "Defence", "Finance"],
        [
            ("Retail", dec!(7000000)),
            ("Defence", dec!(0)),
            ("Finance", dec!(2000000)),
        ],
        [
            ("Retail", dec!(0.50)),
            ("Defence", dec!(0.30)),
            ("Finance", dec!(0.20)),
        ],
        vec![
            Deal::new("D1", "Retail", dec!(5000000), dec!(2), dec!(3), dec!(4)),
            Deal::new("D2", "Defence", dec!(4000000), dec!(5), dec!(5), dec!(5)),
            Deal::new("D3", "Finance", dec!(3000000), dec!(1), dec!(2), dec!(2)),
        ],
        dec!(6000000),
    )
}

/// Two sectors with all capital in `A` and an even target split.
///
/// A single deal `D1` in `B` of size 50 with risk 3 and a budget of 50. The
/// target cannot be reached, and every unit taken narrows the gap, so the
/// deal should be fully taken.
pub fn unreachable_target_request() -> AllocationRequest {
    AllocationRequest::new(
        ["A", "B"],
        [("A", dec!(100)), ("B", dec!(0))],
        [("A", dec!(0.5)), ("B", dec!(0.5))],
        vec![deal("D1", "B", dec!(50), dec!(1))],
        dec!(50),
    )
}

/// Two balanced sectors with the given weights and no deals.
pub fn two_sector_request(weight_a: Decimal, weight_b: Decimal) -> AllocationRequest {
    AllocationRequest::new(
        ["A", "B"],
        [("A", dec!(100)), ("B", dec!(100))],
        [("A", weight_a), ("B", weight_b)],
        Vec::new(),
        dec!(100),
    )
}
