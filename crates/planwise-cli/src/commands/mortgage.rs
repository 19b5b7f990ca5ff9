use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;
use std::io;

use planwise_core::mortgage::{self, export, AffordabilityInput, MortgageInput};

/// Arguments for mortgage amortization analysis
#[derive(Args)]
pub struct MortgageArgs {
    /// Home purchase price
    #[arg(long)]
    pub home_price: Decimal,

    /// Loan principal
    #[arg(long)]
    pub loan_amount: Decimal,

    /// Annual interest rate percent (e.g. 6.5)
    #[arg(long)]
    pub rate: Decimal,

    /// Loan term in years
    #[arg(long, default_value = "30")]
    pub term_years: u32,

    /// Calendar year of the first payment
    #[arg(long, default_value = "2026")]
    pub start_year: i32,

    /// Annual property tax
    #[arg(long, default_value = "0")]
    pub property_tax: Decimal,

    /// Annual homeowner's insurance
    #[arg(long, default_value = "0")]
    pub insurance: Decimal,

    /// Annual HOA dues
    #[arg(long, default_value = "0")]
    pub hoa: Decimal,

    /// Annual PMI rate percent (defaults to 0.5 when LTV > 80%)
    #[arg(long)]
    pub pmi_rate: Option<Decimal>,

    /// Recurring extra principal per payment
    #[arg(long, default_value = "0")]
    pub extra: Decimal,

    /// Bi-weekly accelerated cadence
    #[arg(long)]
    pub biweekly: bool,
}

/// Arguments for the affordability assessment
#[derive(Args)]
pub struct AffordabilityArgs {
    /// Monthly gross income
    #[arg(long)]
    pub monthly_income: Decimal,

    /// Existing non-housing monthly debt obligations
    #[arg(long, default_value = "0")]
    pub monthly_debts: Decimal,

    /// Proposed total housing payment
    #[arg(long)]
    pub payment: Decimal,

    /// Front-end DTI ceiling as a fraction (default 0.28)
    #[arg(long)]
    pub housing_ratio: Option<Decimal>,

    /// Back-end DTI ceiling as a fraction (default 0.36)
    #[arg(long)]
    pub total_ratio: Option<Decimal>,
}

/// Arguments for contract-CSV schedule export
#[derive(Args)]
pub struct AmortizationCsvArgs {
    #[command(flatten)]
    pub mortgage: MortgageArgs,
}

fn to_input(args: &MortgageArgs) -> MortgageInput {
    MortgageInput {
        home_price: args.home_price,
        loan_amount: args.loan_amount,
        annual_rate_percent: args.rate,
        term_years: args.term_years,
        start_year: args.start_year,
        property_tax_annual: args.property_tax,
        insurance_annual: args.insurance,
        hoa_annual: args.hoa,
        pmi_rate_percent: args.pmi_rate,
        extra_payment: args.extra,
        biweekly: args.biweekly,
    }
}

pub fn run_mortgage(args: MortgageArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let result = mortgage::analyze_mortgage(&to_input(&args))?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_affordability(args: AffordabilityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let input = AffordabilityInput {
        monthly_gross_income: args.monthly_income,
        existing_monthly_debts: args.monthly_debts,
        proposed_payment: args.payment,
        housing_ratio: args.housing_ratio,
        total_ratio: args.total_ratio,
    };
    let result = mortgage::assess_affordability(&input)?;
    Ok(serde_json::to_value(result)?)
}

/// Write the schedule to stdout in the export contract's column order.
pub fn run_amortization_csv(args: AmortizationCsvArgs) -> Result<(), Box<dyn std::error::Error>> {
    let result = mortgage::analyze_mortgage(&to_input(&args.mortgage))?;

    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());
    wtr.write_record(export::CSV_HEADER)?;
    for row in export::csv_rows(&result.result.schedule) {
        wtr.write_record(&row)?;
    }
    wtr.flush()?;
    Ok(())
}
