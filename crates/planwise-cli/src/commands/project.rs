use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use planwise_core::projection::{self, PlanSnapshot};
use planwise_core::tax::{FlatRate, FALLBACK_TAX_RATE_PERCENT};

use crate::input;

/// Arguments for the account growth projection
#[derive(Args)]
pub struct ProjectArgs {
    /// Path to JSON/YAML snapshot file
    #[arg(long)]
    pub input: Option<String>,

    /// Effective tax rate percent applied for the whole horizon
    /// (defaults to the engine's 25% fallback)
    #[arg(long)]
    pub tax_rate: Option<Decimal>,
}

pub fn run_project(args: ProjectArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let snapshot: PlanSnapshot = if let Some(ref path) = args.input {
        input::file::read_structured(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <file.json> or stdin required for projection".into());
    };

    let provider = FlatRate(args.tax_rate.unwrap_or(FALLBACK_TAX_RATE_PERCENT));
    let result = projection::project(&snapshot, &provider)?;
    Ok(serde_json::to_value(result)?)
}
