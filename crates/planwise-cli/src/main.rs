mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::income::IncomeArgs;
use commands::mortgage::{AffordabilityArgs, AmortizationCsvArgs, MortgageArgs};
use commands::project::ProjectArgs;
use commands::scenarios::BandsArgs;

/// Personal-finance projection and amortization calculations
#[derive(Parser)]
#[command(
    name = "planwise",
    version,
    about = "Personal-finance projection and amortization calculations",
    long_about = "A CLI for personal-finance planning with decimal precision. \
                  Projects account balances, debt paydown, and net worth over a \
                  monthly horizon, amortizes fixed-payment mortgages with \
                  extra-payment and bi-weekly acceleration, and evaluates \
                  affordability against DTI ceilings."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Project account balances, debts, and net worth over a monthly horizon
    Project(ProjectArgs),
    /// Amortize a fixed-payment mortgage with escrow, PMI, and payoff comparison
    Mortgage(MortgageArgs),
    /// Evaluate a proposed housing payment against DTI ceilings
    Affordability(AffordabilityArgs),
    /// Print the amortization schedule as contract CSV
    AmortizationCsv(AmortizationCsvArgs),
    /// Compute gross annual and net monthly income
    Income(IncomeArgs),
    /// Project retirement scenario bands (fixed multiplicative offsets)
    RetirementBands(BandsArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Project(args) => commands::project::run_project(args),
        Commands::Mortgage(args) => commands::mortgage::run_mortgage(args),
        Commands::Affordability(args) => commands::mortgage::run_affordability(args),
        Commands::AmortizationCsv(args) => {
            // Contract CSV goes straight to stdout, bypassing --output.
            match commands::mortgage::run_amortization_csv(args) {
                Ok(()) => return,
                Err(e) => {
                    eprintln!("{}: {}", "error".red().bold(), e);
                    process::exit(1);
                }
            }
        }
        Commands::Income(args) => commands::income::run_income(args),
        Commands::RetirementBands(args) => commands::scenarios::run_bands(args),
        Commands::Version => {
            println!("planwise {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
