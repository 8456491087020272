//! CSV reader for portfolio uploads.
//!
//! Expected header: `ID,Asset,Sector,Location,Invested,ROI,Date`. Amounts may
//! carry a currency symbol, thousands separators or a trailing `%` (ROI).
//! Dates use `YYYY-MM-DD`; an empty date cell is allowed.

use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use crate::domain::holding::Holding;
use crate::error::{PortfolioError, Result};

#[derive(Debug, Deserialize)]
struct HoldingRow {
    #[serde(rename = "ID")]
    id: String,
    #[serde(rename = "Asset")]
    asset: String,
    #[serde(rename = "Sector")]
    sector: String,
    #[serde(rename = "Location", default)]
    location: String,
    #[serde(rename = "Invested")]
    invested: String,
    #[serde(rename = "ROI", default)]
    roi: String,
    #[serde(rename = "Date", default)]
    date: String,
}

/// Read holdings from a CSV file.
///
/// # Errors
///
/// Returns `PortfolioError` if the file cannot be read or a row is invalid.
pub fn read_holdings(path: impl AsRef<Path>) -> Result<Vec<Holding>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)?;
    let holdings = parse_holdings(file)?;
    debug!(path = %path.display(), rows = holdings.len(), "Read portfolio");
    Ok(holdings)
}

/// Parse holdings from any CSV source.
///
/// Row numbers in errors count the header as row 1.
///
/// # Errors
///
/// Returns `PortfolioError` on malformed CSV, unparseable amounts or dates,
/// and negative invested amounts.
pub fn parse_holdings<R: Read>(reader: R) -> Result<Vec<Holding>> {
    let mut csv = ::csv::ReaderBuilder::new()
        .trim(::csv::Trim::All)
        .from_reader(reader);

    let mut holdings = Vec::new();
    for (i, record) in csv.deserialize::<HoldingRow>().enumerate() {
        let row = i + 2;
        let record = record.map_err(PortfolioError::from)?;
        holdings.push(to_holding(row, record)?);
    }
    Ok(holdings)
}

fn to_holding(row: usize, record: HoldingRow) -> std::result::Result<Holding, PortfolioError> {
    let invested = parse_amount(&record.invested).ok_or_else(|| PortfolioError::InvalidField {
        row,
        column: "Invested",
        value: record.invested.clone(),
    })?;
    if invested < Decimal::ZERO {
        return Err(PortfolioError::NegativeInvested { row, invested });
    }

    let roi = if record.roi.is_empty() {
        Decimal::ZERO
    } else {
        parse_amount(&record.roi).ok_or_else(|| PortfolioError::InvalidField {
            row,
            column: "ROI",
            value: record.roi.clone(),
        })?
    };

    let date = if record.date.is_empty() {
        None
    } else {
        Some(
            NaiveDate::parse_from_str(&record.date, "%Y-%m-%d").map_err(|_| {
                PortfolioError::InvalidField {
                    row,
                    column: "Date",
                    value: record.date.clone(),
                }
            })?,
        )
    };

    Ok(Holding {
        asset_id: record.id,
        asset: record.asset,
        sector: record.sector.into(),
        location: record.location,
        invested,
        roi,
        date,
    })
}

fn parse_amount(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, ',' | '£' | '$' | '€' | '%') && !c.is_whitespace())
        .collect();
    Decimal::from_str(&cleaned).ok()
}
