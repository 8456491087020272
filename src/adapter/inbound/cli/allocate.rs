//! Handler for `bundlefit allocate`.

use std::path::Path;

use rust_decimal::Decimal;
use serde_json::json;
use tabled::Tabled;
use tracing::info;

use super::command::AllocateArgs;
use super::diagnostic::RequestError;
use super::output::{self, money, percent};
use super::load_config;
use crate::application::allocation::AllocationService;
use crate::domain::thesis::ThesisSummary;
use crate::domain::{Allocation, AllocationOutcome, AllocationRequest};
use crate::error::{Error, Result};
use crate::infrastructure::factory::solver::build_solver;

#[derive(Tabled)]
struct DealRow {
    #[tabled(rename = "Deal")]
    deal: String,
    #[tabled(rename = "Sector")]
    sector: String,
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "Risk")]
    risk: String,
    #[tabled(rename = "Fraction")]
    fraction: String,
    #[tabled(rename = "Committed")]
    committed: String,
}

#[derive(Tabled)]
struct SectorRow {
    #[tabled(rename = "Sector")]
    sector: String,
    #[tabled(rename = "Current")]
    current: String,
    #[tabled(rename = "Top-up")]
    top_up: String,
    #[tabled(rename = "After")]
    after: String,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Weight after")]
    weight_after: String,
}

/// Execute `allocate`.
pub fn execute(args: &AllocateArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(secs) = args.time_limit {
        config.solver.time_limit_secs = Some(secs);
        config.solver.validate()?;
    }

    let mut request = read_request(&args.request)?;
    if let Some(budget) = args.budget {
        request = request.with_budget(budget);
    }
    if let Some(path) = &args.thesis {
        let thesis = ThesisSummary::parse(&std::fs::read_to_string(path)?)?;
        match thesis.budget() {
            Some(budget) => request = request.with_budget(budget),
            None => output::warning(&format!(
                "thesis is a {} of {}; keeping the request budget",
                thesis.direction, thesis.amount
            )),
        }
    }

    let service = AllocationService::new(build_solver(&config.solver), config.allocation_settings());
    info!(
        sectors = request.sectors.len(),
        deals = request.deals.len(),
        budget = %request.budget,
        "Allocating"
    );
    let allocation = service.allocate(&request)?;
    let outcome = AllocationOutcome::evaluate(&request, &allocation);

    if output::is_json() {
        output::report("allocate", json_report(&allocation, &outcome)?);
        return Ok(());
    }
    if output::is_quiet() {
        return Ok(());
    }

    render(&request, &allocation, &outcome);
    Ok(())
}

/// Read a request file, rendering parse errors against the source.
///
/// Files ending in `.json` are read as JSON, everything else as TOML.
pub fn read_request(path: &Path) -> Result<AllocationRequest> {
    let src = std::fs::read_to_string(path)?;
    let name = path.display().to_string();
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let parsed = if is_json {
        serde_json::from_str(&src).map_err(|e| RequestError::from_json(&name, &src, &e))
    } else {
        toml::from_str(&src).map_err(|e| RequestError::from_toml(&name, &src, &e))
    };

    parsed.map_err(|diagnostic| {
        let message = format!("invalid request file {name}: {}", diagnostic.message);
        if !output::is_json() {
            eprintln!("{:?}", miette::Report::new(diagnostic));
        }
        Error::Parse(message)
    })
}

fn json_report(allocation: &Allocation, outcome: &AllocationOutcome) -> Result<serde_json::Value> {
    let fractions: serde_json::Map<String, serde_json::Value> = allocation
        .iter()
        .map(|f| (f.deal_id.to_string(), json!(f.fraction)))
        .collect();

    Ok(json!({
        "optimal": allocation.is_optimal(),
        "objective": allocation.objective(),
        "fractions": fractions,
        "outcome": serde_json::to_value(outcome)?,
    }))
}

fn render(request: &AllocationRequest, allocation: &Allocation, outcome: &AllocationOutcome) {
    output::header(env!("CARGO_PKG_VERSION"));
    output::section("Deals");

    let deals: Vec<DealRow> = request
        .deals
        .iter()
        .map(|deal| {
            let fraction = allocation.fraction(deal.deal_id()).unwrap_or(Decimal::ZERO);
            DealRow {
                deal: deal.deal_id().to_string(),
                sector: deal.sector().to_string(),
                size: money(deal.size()),
                risk: deal.risk_score().normalize().to_string(),
                fraction: format!("{:.4}", fraction),
                committed: money(deal.committed(fraction)),
            }
        })
        .collect();
    output::table(deals);

    output::section("Sectors");
    let sectors: Vec<SectorRow> = outcome
        .sectors
        .iter()
        .map(|s| SectorRow {
            sector: s.sector.to_string(),
            current: money(s.current),
            top_up: money(s.top_up),
            after: money(s.after),
            target: percent(s.target_weight),
            weight_after: percent(s.weight_after),
        })
        .collect();
    output::table(sectors);

    output::section("Summary");
    output::field("New capital", output::highlight(money(outcome.total_new)));
    output::field("Budget left", money(outcome.budget_remaining));
    output::field("Tracking error", money(outcome.tracking_error));
    output::field("Risk cost", money(outcome.risk_cost));
    output::field("Objective", format!("{:.2}", allocation.objective()));
    if allocation.is_optimal() {
        output::success("Optimal allocation found");
    } else {
        output::warning("Solver stopped with a feasible, not proven optimal, allocation");
    }
}
