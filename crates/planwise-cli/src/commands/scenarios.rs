use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use planwise_core::scenarios::{self, BandsInput};

/// Arguments for retirement scenario bands
#[derive(Args)]
pub struct BandsArgs {
    /// Current portfolio balance
    #[arg(long)]
    pub starting_balance: Decimal,

    /// Monthly contribution
    #[arg(long, default_value = "0")]
    pub monthly_contribution: Decimal,

    /// Annual growth rate percent (e.g. 7)
    #[arg(long, default_value = "7")]
    pub growth: Decimal,

    /// Projection length in years
    #[arg(long, default_value = "30")]
    pub years: u32,
}

pub fn run_bands(args: BandsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let input = BandsInput {
        starting_balance: args.starting_balance,
        monthly_contribution: args.monthly_contribution,
        annual_growth_percent: args.growth,
        years: args.years,
    };
    let result = scenarios::project_bands(&input)?;
    Ok(serde_json::to_value(result)?)
}
