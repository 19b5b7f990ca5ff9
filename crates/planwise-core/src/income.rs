use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::PlanwiseError;
use crate::types::{Money, Rate};
use crate::PlanwiseResult;

const WEEKS_PER_YEAR: Decimal = dec!(52);
const MONTHS_PER_YEAR: Decimal = dec!(12);

/// How the primary income line is earned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentKind {
    Salaried,
    Hourly,
}

/// Heterogeneous income inputs, all in today's dollars.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeInput {
    pub employment: EmploymentKind,
    /// Used when employment is Salaried.
    #[serde(default)]
    pub annual_salary: Money,
    /// Used when employment is Hourly.
    #[serde(default)]
    pub hourly_rate: Money,
    #[serde(default)]
    pub hours_per_week: Decimal,
    #[serde(default)]
    pub monthly_business_income: Money,
    #[serde(default)]
    pub monthly_other_income: Money,
}

/// Annual gross income: salary or hourly × hours × 52, plus annualized
/// business and other income.
pub fn gross_annual_income(input: &IncomeInput) -> PlanwiseResult<Money> {
    let earned = match input.employment {
        EmploymentKind::Salaried => input.annual_salary,
        EmploymentKind::Hourly => input.hourly_rate * input.hours_per_week * WEEKS_PER_YEAR,
    };
    if earned < Decimal::ZERO {
        return Err(PlanwiseError::InvalidInput {
            field: "income".into(),
            reason: "earned income must be >= 0".into(),
        });
    }
    Ok(earned
        + input.monthly_business_income * MONTHS_PER_YEAR
        + input.monthly_other_income * MONTHS_PER_YEAR)
}

/// Net monthly income after applying an effective tax rate percentage.
pub fn net_monthly_income(gross_annual: Money, effective_tax_rate_percent: Rate) -> Money {
    let retained = Decimal::ONE - effective_tax_rate_percent / dec!(100);
    gross_annual * retained / MONTHS_PER_YEAR
}
