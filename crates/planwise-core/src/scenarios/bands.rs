use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::PlanwiseError;
use crate::rates::{periodic_rate, round_money};
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::PlanwiseResult;

/// Fixed multiplicative offsets applied to the single deterministic
/// projection to produce the min/q1/median/q3/max bands. These are not
/// sampled distributions and are intentionally kept that way.
pub const SCENARIO_BAND_MULTIPLIERS: [Decimal; 5] =
    [dec!(0.6), dec!(0.8), dec!(1.0), dec!(1.2), dec!(1.4)];

const MONTHS_PER_YEAR: u32 = 12;
const MAX_YEARS: u32 = 50;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BandsInput {
    pub starting_balance: Money,
    pub monthly_contribution: Money,
    /// Annual percent (7 = 7%).
    pub annual_growth_percent: Rate,
    pub years: u32,
}

/// One annual sample of the banded projection, rounded to whole units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandRow {
    pub year: u32,
    pub min: Money,
    pub q1: Money,
    pub median: Money,
    pub q3: Money,
    pub max: Money,
}

/// Project a single deterministic monthly-compounded balance and spread it
/// into scenario bands with the fixed multipliers, sampled annually.
pub fn project_bands(input: &BandsInput) -> PlanwiseResult<ComputationOutput<Vec<BandRow>>> {
    let start = Instant::now();

    if input.years == 0 || input.years > MAX_YEARS {
        return Err(PlanwiseError::InvalidInput {
            field: "years".into(),
            reason: format!("must be between 1 and {MAX_YEARS}"),
        });
    }
    if input.starting_balance < Decimal::ZERO || input.monthly_contribution < Decimal::ZERO {
        return Err(PlanwiseError::InvalidInput {
            field: "starting_balance".into(),
            reason: "balance and contribution must be >= 0".into(),
        });
    }

    let rate = periodic_rate(input.annual_growth_percent);
    let mut balance = input.starting_balance;
    let mut rows = Vec::with_capacity(input.years as usize + 1);
    rows.push(band_row(0, balance));

    for year in 1..=input.years {
        for _ in 0..MONTHS_PER_YEAR {
            balance += input.monthly_contribution;
            balance += balance * rate;
        }
        rows.push(band_row(year, balance));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Deterministic compounding projection with fixed multiplicative scenario bands",
        &serde_json::json!({
            "annual_growth_percent": input.annual_growth_percent.to_string(),
            "band_multipliers": SCENARIO_BAND_MULTIPLIERS
                .iter()
                .map(|m| m.to_string())
                .collect::<Vec<_>>(),
        }),
        Vec::new(),
        elapsed,
        rows,
    ))
}

fn band_row(year: u32, balance: Decimal) -> BandRow {
    let [min, q1, median, q3, max] =
        SCENARIO_BAND_MULTIPLIERS.map(|m| round_money(balance * m));
    BandRow {
        year,
        min,
        q1,
        median,
        q3,
        max,
    }
}
