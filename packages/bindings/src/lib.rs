use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use planwise_core::tax::{FlatRate, FALLBACK_TAX_RATE_PERCENT};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct ProjectPlanRequest {
    snapshot: planwise_core::projection::PlanSnapshot,
    effective_tax_rate_percent: Option<Decimal>,
}

#[napi]
pub fn project_plan(input_json: String) -> NapiResult<String> {
    let request: ProjectPlanRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let provider = FlatRate(
        request
            .effective_tax_rate_percent
            .unwrap_or(FALLBACK_TAX_RATE_PERCENT),
    );
    let output =
        planwise_core::projection::project(&request.snapshot, &provider).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Mortgage
// ---------------------------------------------------------------------------

#[napi]
pub fn analyze_mortgage(input_json: String) -> NapiResult<String> {
    let input: planwise_core::mortgage::MortgageInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = planwise_core::mortgage::analyze_mortgage(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn assess_affordability(input_json: String) -> NapiResult<String> {
    let input: planwise_core::mortgage::AffordabilityInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = planwise_core::mortgage::assess_affordability(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Amortize a mortgage and return the schedule as CSV text in the export
/// contract's column order.
#[napi]
pub fn amortization_csv(input_json: String) -> NapiResult<String> {
    let input: planwise_core::mortgage::MortgageInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = planwise_core::mortgage::analyze_mortgage(&input).map_err(to_napi_error)?;

    let mut csv = planwise_core::mortgage::export::CSV_HEADER.join(",");
    csv.push('\n');
    for row in planwise_core::mortgage::export::csv_rows(&output.result.schedule) {
        csv.push_str(&row.join(","));
        csv.push('\n');
    }
    Ok(csv)
}

// ---------------------------------------------------------------------------
// Income
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct IncomeSummaryRequest {
    #[serde(flatten)]
    income: planwise_core::income::IncomeInput,
    effective_tax_rate_percent: Option<Decimal>,
}

#[derive(Serialize)]
struct IncomeSummary {
    gross_annual_income: Decimal,
    gross_monthly_income: Decimal,
    net_monthly_income: Decimal,
    effective_tax_rate_percent: Decimal,
}

#[napi]
pub fn income_summary(input_json: String) -> NapiResult<String> {
    let request: IncomeSummaryRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let tax_rate = request
        .effective_tax_rate_percent
        .unwrap_or(FALLBACK_TAX_RATE_PERCENT);

    let gross_annual =
        planwise_core::income::gross_annual_income(&request.income).map_err(to_napi_error)?;
    let summary = IncomeSummary {
        gross_annual_income: planwise_core::rates::round_cents(gross_annual),
        gross_monthly_income: planwise_core::rates::round_cents(gross_annual / Decimal::from(12)),
        net_monthly_income: planwise_core::rates::round_cents(
            planwise_core::income::net_monthly_income(gross_annual, tax_rate),
        ),
        effective_tax_rate_percent: tax_rate,
    };
    serde_json::to_string(&summary).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[napi]
pub fn retirement_bands(input_json: String) -> NapiResult<String> {
    let input: planwise_core::scenarios::BandsInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = planwise_core::scenarios::project_bands(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
