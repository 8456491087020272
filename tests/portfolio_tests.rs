//! Holdings CSV to sector exposure.

mod support;

use bundlefit::adapter::outbound::portfolio::{parse_holdings, read_holdings};
use bundlefit::domain::holding::{sector_exposure, total_invested};
use bundlefit::domain::{AllocationRequest, SectorId};
use rust_decimal_macros::dec;

use support::files;

#[test]
fn demo_holdings_aggregate_by_sector() {
    let holdings = read_holdings(files::demo("holdings.csv")).unwrap();
    let exposure = sector_exposure(&holdings);

    assert_eq!(holdings.len(), 3);
    assert_eq!(total_invested(&holdings), dec!(9000000));
    assert_eq!(exposure.len(), 2);
    assert_eq!(exposure[0].sector, SectorId::from("Retail"));
    assert_eq!(exposure[0].capital, dec!(7000000));
    assert_eq!(exposure[1].capital, dec!(2000000));
}

#[test]
fn exposure_seeds_an_allocation_request() {
    let holdings = read_holdings(files::demo("holdings.csv")).unwrap();
    let exposure = sector_exposure(&holdings);

    let request = AllocationRequest::new(
        exposure.iter().map(|e| e.sector.clone()),
        exposure.iter().map(|e| (e.sector.clone(), e.capital)),
        [("Retail", dec!(0.6)), ("Finance", dec!(0.4))],
        Vec::new(),
        dec!(1000000),
    );

    assert!(request.validate().is_ok());
    assert_eq!(request.total_capital(), dec!(9000000));
}

#[test]
fn header_only_file_has_no_holdings() {
    let holdings = parse_holdings("ID,Asset,Sector,Location,Invested,ROI,Date\n".as_bytes()).unwrap();
    assert!(holdings.is_empty());
    assert!(sector_exposure(&holdings).is_empty());
}
