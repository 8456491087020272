use bundlefit::domain::Allocation;
use rust_decimal::Decimal;

/// Fail unless `actual` is within `tolerance` of `expected`.
pub fn assert_decimal_near(actual: Decimal, expected: Decimal, tolerance: Decimal) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected} (±{tolerance}), got {actual}"
    );
}

/// Fail unless deal `deal_id` was allocated `expected` within `tolerance`.
pub fn assert_fraction_near(
    allocation: &Allocation,
    deal_id: &str,
    expected: Decimal,
    tolerance: Decimal,
) {
    let fraction = allocation
        .fraction(&deal_id.into())
        .unwrap_or_else(|| panic!("no fraction for deal {deal_id}"));
    assert!(
        (fraction - expected).abs() <= tolerance,
        "deal {deal_id}: expected fraction {expected} (±{tolerance}), got {fraction}"
    );
}
