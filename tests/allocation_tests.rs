//! End-to-end allocation tests against the HiGHS backend.

mod support;

use std::sync::Arc;

use bundlefit::application::allocation::{AllocationModel, AllocationService, AllocationSettings};
use bundlefit::domain::error::ValidationError;
use bundlefit::domain::{Allocation, AllocationOutcome, AllocationRequest, Deal};
use bundlefit::error::{AllocationError, Error};
use bundlefit::infrastructure::config::settings::Config;
use bundlefit::infrastructure::factory::solver::build_allocation_service;
use bundlefit::port::outbound::solver::SolutionStatus;
use bundlefit::testkit::domain::{
    deal, example_request, two_sector_request, unreachable_target_request,
};
use bundlefit::testkit::solver::ScriptedSolver;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use support::assertions::{assert_decimal_near, assert_fraction_near};

fn service() -> AllocationService {
    build_allocation_service(&Config::default())
}

fn solve(request: &AllocationRequest) -> Allocation {
    service().allocate(request).expect("allocation should solve")
}

fn assert_well_formed(request: &AllocationRequest, allocation: &Allocation) {
    assert_eq!(allocation.len(), request.deals.len());
    for deal in &request.deals {
        let fraction = allocation
            .fraction(deal.deal_id())
            .unwrap_or_else(|| panic!("missing fraction for {}", deal.deal_id()));
        assert!(
            (Decimal::ZERO..=Decimal::ONE).contains(&fraction),
            "fraction {fraction} for {} outside [0, 1]",
            deal.deal_id()
        );
    }

    let outcome = AllocationOutcome::evaluate(request, allocation);
    assert_decimal_near(outcome.top_up_sum(), outcome.total_new, dec!(0.000001));
    assert!(
        outcome.total_new <= request.budget + dec!(0.000001),
        "spent {} of {}",
        outcome.total_new,
        request.budget
    );
}

#[test]
fn example_prefers_the_defence_deal() {
    let request = example_request();
    let allocation = solve(&request);
    assert_well_formed(&request, &allocation);

    let y1 = allocation.fraction(&"D1".into()).unwrap();
    let y2 = allocation.fraction(&"D2".into()).unwrap();
    let y3 = allocation.fraction(&"D3".into()).unwrap();

    assert!(y2 > y3, "expected y2 > y3, got {y2} vs {y3}");
    assert_fraction_near(&allocation, "D1", Decimal::ZERO, dec!(0.0001));
    assert_fraction_near(&allocation, "D2", Decimal::ONE, dec!(0.0001));
    assert_fraction_near(&allocation, "D3", dec!(0.25), dec!(0.0001));

    let spent = dec!(5000000) * y1 + dec!(4000000) * y2 + dec!(3000000) * y3;
    assert!(spent <= dec!(6000000) + dec!(0.000001));
}

#[test]
fn example_objective_matches_recomputed_outcome() {
    let request = example_request();
    let allocation = solve(&request);
    let outcome = AllocationOutcome::evaluate(&request, &allocation);

    assert!(allocation.is_optimal());
    assert_decimal_near(allocation.objective(), outcome.objective(), dec!(1));
    assert_decimal_near(outcome.objective(), dec!(666666.67), dec!(1));
}

#[test]
fn unreachable_target_takes_the_whole_deal() {
    let request = unreachable_target_request();
    let allocation = solve(&request);
    assert_well_formed(&request, &allocation);

    assert_fraction_near(&allocation, "D1", Decimal::ONE, dec!(0.000001));

    // With y = 1: t = 150, u_A = |100 - 75| = 25, u_B = |50 - 75| = 25.
    let outcome = AllocationOutcome::evaluate(&request, &allocation);
    assert_decimal_near(outcome.total_after, dec!(150), dec!(0.0001));
    assert_decimal_near(outcome.tracking_error, dec!(50), dec!(0.0001));
}

#[test]
fn solved_point_satisfies_every_model_row() {
    let request = example_request();
    let model = AllocationModel::build(&request).unwrap();
    let allocation = service().solve(&model).unwrap();

    let fractions: Vec<Decimal> = model
        .deal_ids()
        .iter()
        .map(|id| allocation.fraction(id).unwrap())
        .collect();
    let point = model.point_for(&request, &fractions);

    assert!(model.problem().is_feasible(&point, dec!(0.01)));
}

#[test]
fn tight_budget_is_respected() {
    let request = example_request().with_budget(dec!(1000000));
    let allocation = solve(&request);
    assert_well_formed(&request, &allocation);

    let outcome = AllocationOutcome::evaluate(&request, &allocation);
    assert!(outcome.total_new > Decimal::ZERO);
}

#[test]
fn weight_sum_off_by_a_percent_is_rejected() {
    let result = service().allocate(&two_sector_request(dec!(0.49), dec!(0.50)));

    assert!(matches!(
        result,
        Err(Error::Allocation(AllocationError::Validation(
            ValidationError::InvalidWeightDistribution { .. }
        )))
    ));
}

#[test]
fn weight_sum_within_tolerance_is_accepted() {
    let allocation = solve(&two_sector_request(dec!(0.5), dec!(0.50000001)));
    assert!(allocation.is_empty());
}

#[test]
fn zero_risk_deal_is_rejected_before_solving() {
    let solver = Arc::new(ScriptedSolver::failing(SolutionStatus::Error));
    let service = AllocationService::new(solver.clone(), AllocationSettings::default());

    let mut request = example_request();
    request.deals.push(deal("D4", "Retail", dec!(1000), Decimal::ZERO));

    let result = service.allocate(&request);

    assert!(matches!(
        result,
        Err(Error::Allocation(AllocationError::Validation(
            ValidationError::InvalidRiskScore { .. }
        )))
    ));
    assert_eq!(solver.calls(), 0);
}

#[test]
fn deal_in_unknown_sector_is_rejected() {
    let mut request = example_request();
    request.deals.push(Deal::new(
        "D9",
        "Energy",
        dec!(1000),
        dec!(1),
        dec!(1),
        dec!(1),
    ));

    let result = service().allocate(&request);

    assert!(matches!(
        result,
        Err(Error::Allocation(AllocationError::Validation(
            ValidationError::UnknownSectorReference { .. }
        )))
    ));
}

#[test]
fn solves_are_repeatable_and_share_one_service() {
    let service = Arc::new(service());
    let request = example_request();
    let first = service.allocate(&request).unwrap();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| service.allocate(&request).unwrap()))
            .collect();
        for handle in handles {
            let allocation = handle.join().unwrap();
            for f in first.iter() {
                assert_fraction_near(
                    &allocation,
                    f.deal_id.as_str(),
                    f.fraction,
                    dec!(0.000001),
                );
            }
        }
    });
}
