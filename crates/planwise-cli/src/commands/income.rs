use clap::Args;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use planwise_core::income::{gross_annual_income, net_monthly_income, EmploymentKind, IncomeInput};
use planwise_core::rates::round_cents;
use planwise_core::tax::FALLBACK_TAX_RATE_PERCENT;

/// Arguments for the income summary
#[derive(Args)]
pub struct IncomeArgs {
    /// Employment type: salaried or hourly
    #[arg(long, default_value = "salaried")]
    pub employment: String,

    /// Annual salary (salaried)
    #[arg(long, default_value = "0")]
    pub annual_salary: Decimal,

    /// Hourly rate (hourly)
    #[arg(long, default_value = "0")]
    pub hourly_rate: Decimal,

    /// Hours worked per week (hourly)
    #[arg(long, default_value = "40")]
    pub hours_per_week: Decimal,

    /// Monthly business income
    #[arg(long, default_value = "0")]
    pub monthly_business: Decimal,

    /// Monthly other income
    #[arg(long, default_value = "0")]
    pub monthly_other: Decimal,

    /// Effective tax rate percent
    #[arg(long)]
    pub tax_rate: Option<Decimal>,
}

#[derive(Debug, Serialize, Deserialize)]
struct IncomeOutput {
    gross_annual_income: Decimal,
    gross_monthly_income: Decimal,
    net_monthly_income: Decimal,
    effective_tax_rate_percent: Decimal,
}

pub fn run_income(args: IncomeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let employment = match args.employment.to_lowercase().as_str() {
        "salaried" | "salary" => EmploymentKind::Salaried,
        "hourly" => EmploymentKind::Hourly,
        other => {
            return Err(format!("Unknown employment type '{other}'. Use: salaried, hourly").into())
        }
    };

    let input = IncomeInput {
        employment,
        annual_salary: args.annual_salary,
        hourly_rate: args.hourly_rate,
        hours_per_week: args.hours_per_week,
        monthly_business_income: args.monthly_business,
        monthly_other_income: args.monthly_other,
    };

    let tax_rate = args.tax_rate.unwrap_or(FALLBACK_TAX_RATE_PERCENT);
    let gross_annual = gross_annual_income(&input)?;
    let output = IncomeOutput {
        gross_annual_income: round_cents(gross_annual),
        gross_monthly_income: round_cents(gross_annual / Decimal::from(12)),
        net_monthly_income: round_cents(net_monthly_income(gross_annual, tax_rate)),
        effective_tax_rate_percent: tax_rate,
    };
    Ok(serde_json::to_value(output)?)
}
