//! Handler for `bundlefit portfolio`.

use std::path::Path;

use serde_json::json;
use tabled::Tabled;

use super::output;
use crate::adapter::outbound::portfolio::read_holdings;
use crate::domain::holding::{sector_exposure, total_invested};
use crate::error::Result;

#[derive(Tabled)]
struct ExposureRow {
    #[tabled(rename = "Sector")]
    sector: String,
    #[tabled(rename = "Holdings")]
    holdings: usize,
    #[tabled(rename = "Capital")]
    capital: String,
    #[tabled(rename = "Weight")]
    weight: String,
}

/// Execute `portfolio summary`.
pub fn execute_summary(path: &Path) -> Result<()> {
    let holdings = read_holdings(path)?;
    let exposure = sector_exposure(&holdings);
    let total = total_invested(&holdings);

    if output::is_json() {
        output::report(
            "portfolio.summary",
            json!({
                "holdings": holdings.len(),
                "total_invested": total,
                "sectors": serde_json::to_value(&exposure)?,
            }),
        );
        return Ok(());
    }
    if output::is_quiet() {
        return Ok(());
    }

    output::header(env!("CARGO_PKG_VERSION"));
    output::section("Portfolio");
    output::field("File", path.display());
    output::field("Holdings", holdings.len());
    output::field("Invested", output::highlight(output::money(total)));

    if exposure.is_empty() {
        output::note("(no holdings)");
        return Ok(());
    }

    output::section("Sectors");
    let rows: Vec<ExposureRow> = exposure
        .iter()
        .map(|e| ExposureRow {
            sector: e.sector.to_string(),
            holdings: e.holdings,
            capital: output::money(e.capital),
            weight: output::percent(e.weight),
        })
        .collect();
    output::table(rows);

    Ok(())
}
