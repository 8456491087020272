//! Investment thesis summaries.
//!
//! A document-analysis service condenses an investment thesis into exactly
//! three lines:
//!
//! ```text
//! 5m
//! defence, clean energy
//! Two to three sentences of prose.
//! ```
//!
//! Line one is a signed amount in millions (negative means sell), line two a
//! comma-separated sector list (`[]` when none apply), line three the prose.
//! [`ThesisSummary::parse`] turns that text into typed values; the allocator
//! only ever consumes the amount and sector list.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use thiserror::Error;

use super::id::SectorId;

/// Errors raised while parsing a thesis summary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ThesisError {
    /// The text does not contain exactly three non-blank lines.
    #[error("expected 3 lines (amount, sectors, summary), found {found}")]
    LineCount {
        /// Number of non-blank lines found.
        found: usize,
    },

    /// The amount line could not be parsed.
    #[error("invalid amount '{line}'")]
    InvalidAmount {
        /// The offending line.
        line: String,
    },
}

/// Whether the thesis proposes investing or divesting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Deploy new capital.
    Buy,
    /// Release capital.
    Sell,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "buy"),
            Self::Sell => write!(f, "sell"),
        }
    }
}

/// Parsed three-line thesis summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThesisSummary {
    /// Absolute amount in currency units.
    pub amount: Decimal,
    /// Buy for a positive amount, sell for a negative one.
    pub direction: Direction,
    /// Sectors named by the thesis, deduplicated in order of appearance.
    pub sectors: Vec<SectorId>,
    /// Prose summary.
    pub summary: String,
}

impl ThesisSummary {
    /// Parse the three-line summary format.
    ///
    /// Blank lines are ignored. The amount accepts an optional sign, an
    /// optional currency symbol, thousands separators, and a scale suffix
    /// (`k`, `m`, `bn`); a bare number is read in millions.
    ///
    /// # Errors
    ///
    /// Returns `ThesisError` if the line count or the amount is invalid.
    pub fn parse(text: &str) -> Result<Self, ThesisError> {
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();

        let [amount_line, sectors_line, summary] = lines.as_slice() else {
            return Err(ThesisError::LineCount { found: lines.len() });
        };

        let signed = parse_amount(amount_line).ok_or_else(|| ThesisError::InvalidAmount {
            line: (*amount_line).to_string(),
        })?;

        let direction = if signed < Decimal::ZERO {
            Direction::Sell
        } else {
            Direction::Buy
        };

        Ok(Self {
            amount: signed.abs(),
            direction,
            sectors: parse_sectors(sectors_line),
            summary: (*summary).to_string(),
        })
    }

    /// Budget implied by the thesis: the amount for a positive buy, otherwise none.
    ///
    /// The allocator is additions-only, so a sell thesis never yields a budget.
    #[must_use]
    pub fn budget(&self) -> Option<Decimal> {
        (self.direction == Direction::Buy && self.amount > Decimal::ZERO).then_some(self.amount)
    }
}

fn parse_amount(line: &str) -> Option<Decimal> {
    let mut s: String = line
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .collect::<String>()
        .replace('\u{2212}', "-")
        .to_ascii_lowercase();

    let negative = s.starts_with('-');
    s = s.trim_start_matches(['-', '+']).to_string();
    s = s.trim_start_matches(['£', '$', '€']).to_string();

    let (digits, scale) = if let Some(d) = s.strip_suffix("bn") {
        (d, dec!(1000000000))
    } else if let Some(d) = s.strip_suffix('b') {
        (d, dec!(1000000000))
    } else if let Some(d) = s.strip_suffix('m') {
        (d, dec!(1000000))
    } else if let Some(d) = s.strip_suffix('k') {
        (d, dec!(1000))
    } else {
        (s.as_str(), dec!(1000000))
    };

    let value = Decimal::from_str(digits).ok()?;
    if value < Decimal::ZERO {
        return None;
    }
    let amount = value.checked_mul(scale)?;
    Some(if negative { -amount } else { amount })
}

fn parse_sectors(line: &str) -> Vec<SectorId> {
    let inner = line.trim().trim_start_matches('[').trim_end_matches(']');
    let mut sectors: Vec<SectorId> = Vec::new();
    for name in inner.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let id = SectorId::from(name);
        if !sectors.contains(&id) {
            sectors.push(id);
        }
    }
    sectors
}
