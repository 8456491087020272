//! Handler for `bundlefit thesis`.

use std::path::Path;

use serde_json::json;

use super::output;
use crate::domain::thesis::ThesisSummary;
use crate::error::Result;

/// Execute `thesis parse`.
pub fn execute_parse(path: &Path) -> Result<()> {
    let thesis = ThesisSummary::parse(&std::fs::read_to_string(path)?)?;

    if output::is_json() {
        output::report(
            "thesis.parse",
            json!({
                "thesis": serde_json::to_value(&thesis)?,
                "budget": thesis.budget(),
            }),
        );
        return Ok(());
    }
    if output::is_quiet() {
        return Ok(());
    }

    output::section("Thesis");
    output::field("Direction", thesis.direction);
    output::field("Amount", output::highlight(thesis.amount.normalize()));
    let sectors = if thesis.sectors.is_empty() {
        "(none)".to_string()
    } else {
        thesis
            .sectors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    };
    output::field("Sectors", sectors);
    output::field("Summary", &thesis.summary);
    match thesis.budget() {
        Some(budget) => output::note(&format!(
            "usable as budget: bundlefit allocate <request> --thesis {}  ({})",
            path.display(),
            budget.normalize()
        )),
        None => output::note("sell theses do not produce an allocation budget"),
    }

    Ok(())
}
