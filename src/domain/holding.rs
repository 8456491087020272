//! Portfolio holdings and their aggregation into sector exposure.
//!
//! Uploaded portfolios arrive as one row per asset. The allocator only needs
//! current capital per sector, so [`sector_exposure`] folds holdings into
//! [`SectorExposure`] rows that can seed an
//! [`AllocationRequest`](super::AllocationRequest).

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use super::id::SectorId;

/// One asset row from an uploaded portfolio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Holding {
    /// Asset identifier as given in the upload.
    pub asset_id: String,
    /// Asset name.
    pub asset: String,
    /// Sector the asset is classified under.
    pub sector: SectorId,
    /// Location label.
    pub location: String,
    /// Capital invested, in currency units.
    pub invested: Decimal,
    /// Reported return on investment, in percent.
    pub roi: Decimal,
    /// Investment date, when present.
    pub date: Option<NaiveDate>,
}

/// Current capital held in one sector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectorExposure {
    /// The sector.
    pub sector: SectorId,
    /// Total invested capital.
    pub capital: Decimal,
    /// Share of total portfolio capital.
    pub weight: Decimal,
    /// Number of holdings in the sector.
    pub holdings: usize,
}

/// Aggregate holdings by sector, in order of first appearance.
///
/// Weights are zero when the portfolio holds no capital.
#[must_use]
pub fn sector_exposure(holdings: &[Holding]) -> Vec<SectorExposure> {
    let mut exposure: Vec<SectorExposure> = Vec::new();

    for holding in holdings {
        match exposure.iter_mut().find(|e| e.sector == holding.sector) {
            Some(entry) => {
                entry.capital += holding.invested;
                entry.holdings += 1;
            }
            None => exposure.push(SectorExposure {
                sector: holding.sector.clone(),
                capital: holding.invested,
                weight: Decimal::ZERO,
                holdings: 1,
            }),
        }
    }

    let total: Decimal = exposure.iter().map(|e| e.capital).sum();
    if total > Decimal::ZERO {
        for entry in &mut exposure {
            entry.weight = entry.capital / total;
        }
    }

    exposure
}

/// Total invested capital across holdings.
#[must_use]
pub fn total_invested(holdings: &[Holding]) -> Decimal {
    holdings.iter().map(|h| h.invested).sum()
}
