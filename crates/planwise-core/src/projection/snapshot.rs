use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::PlanwiseError;
use crate::income::IncomeInput;
use crate::rates::{validate_balance, validate_rate};
use crate::tax::FilingStatus;
use crate::types::{Money, Rate};
use crate::PlanwiseResult;

/// Projection horizons are monthly, capped at 30 years.
pub const MAX_HORIZON_MONTHS: u32 = 360;

/// Liquid accounts. Checking intentionally carries no rate: it earns nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiquidAccounts {
    pub checking_balance: Money,
    pub savings_balance: Money,
    /// Annual percent (4.5 = 4.5% APY).
    pub savings_rate_percent: Rate,
    pub brokerage_balance: Money,
    pub brokerage_rate_percent: Rate,
}

/// Tax-advantaged retirement buckets, each with its own annual growth rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetirementAccounts {
    pub traditional_401k_balance: Money,
    pub traditional_401k_rate_percent: Rate,
    pub roth_ira_balance: Money,
    pub roth_ira_rate_percent: Rate,
    pub traditional_ira_balance: Money,
    pub traditional_ira_rate_percent: Rate,
    pub pension_balance: Money,
    pub pension_rate_percent: Rate,
}

/// Physical assets. Vehicle depreciation is expressed as a positive annual
/// percent decline; the simulated value is clamped at zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicalAssets {
    pub home_value: Money,
    pub home_appreciation_percent: Rate,
    pub vehicle_value: Money,
    pub vehicle_depreciation_percent: Rate,
    pub other_assets_value: Money,
    pub other_assets_rate_percent: Rate,
}

/// Outstanding debts by category. Paydown fractions are engine constants,
/// not inputs (see `projection::engine`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebtBalances {
    pub mortgage_balance: Money,
    pub mortgage_rate_percent: Rate,
    pub auto_loan_balance: Money,
    pub auto_loan_rate_percent: Rate,
    pub credit_card_balance: Money,
    pub credit_card_rate_percent: Rate,
    pub student_loan_balance: Money,
    pub student_loan_rate_percent: Rate,
    pub other_debt_balance: Money,
    pub other_debt_rate_percent: Rate,
}

/// Where each month's money goes. Liquid allocations are percentages of net
/// monthly income; the 401k deferral and employer match are percentages of
/// gross monthly income; IRA contributions are fixed annual dollar amounts
/// split evenly across the year's periods.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContributionPlan {
    pub checking_allocation_percent: Rate,
    pub savings_allocation_percent: Rate,
    pub brokerage_allocation_percent: Rate,
    pub employee_401k_percent: Rate,
    /// Capped at the employee's own deferral each period.
    pub employer_match_percent: Rate,
    pub traditional_ira_annual: Money,
    pub roth_ira_annual: Money,
    pub pension_monthly: Money,
}

/// A flat recurring monthly expense line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseEntry {
    pub label: String,
    pub monthly_amount: Money,
}

/// Immutable input to `projection::project`. The engine allocates its own
/// working state from this snapshot on every call and discards it on return;
/// callers persist inputs, never engine-internal running state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanSnapshot {
    pub income: IncomeInput,
    pub filing_status: FilingStatus,
    pub state: String,
    /// Calendar anchor for emitted rows (period 0 = this date).
    pub start_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
    /// Annual gross-income raise, applied every 12 periods (3 = 3%).
    pub annual_raise_percent: Rate,
    /// 1 to 360 months.
    pub horizon_months: u32,
    pub liquid: LiquidAccounts,
    pub retirement: RetirementAccounts,
    pub assets: PhysicalAssets,
    pub debts: DebtBalances,
    pub contributions: ContributionPlan,
    pub monthly_expenses: Vec<ExpenseEntry>,
}

impl PlanSnapshot {
    /// Reject malformed snapshots before the simulation loop starts.
    pub fn validate(&self) -> PlanwiseResult<()> {
        if self.horizon_months == 0 || self.horizon_months > MAX_HORIZON_MONTHS {
            return Err(PlanwiseError::InvalidInput {
                field: "horizon_months".into(),
                reason: format!("must be between 1 and {MAX_HORIZON_MONTHS}"),
            });
        }

        validate_balance("checking_balance", self.liquid.checking_balance)?;
        validate_balance("savings_balance", self.liquid.savings_balance)?;
        validate_balance("brokerage_balance", self.liquid.brokerage_balance)?;
        validate_rate("savings_rate_percent", self.liquid.savings_rate_percent)?;
        validate_rate("brokerage_rate_percent", self.liquid.brokerage_rate_percent)?;

        validate_balance("traditional_401k_balance", self.retirement.traditional_401k_balance)?;
        validate_balance("roth_ira_balance", self.retirement.roth_ira_balance)?;
        validate_balance("traditional_ira_balance", self.retirement.traditional_ira_balance)?;
        validate_balance("pension_balance", self.retirement.pension_balance)?;
        validate_rate("traditional_401k_rate_percent", self.retirement.traditional_401k_rate_percent)?;
        validate_rate("roth_ira_rate_percent", self.retirement.roth_ira_rate_percent)?;
        validate_rate("traditional_ira_rate_percent", self.retirement.traditional_ira_rate_percent)?;
        validate_rate("pension_rate_percent", self.retirement.pension_rate_percent)?;

        validate_balance("home_value", self.assets.home_value)?;
        validate_balance("vehicle_value", self.assets.vehicle_value)?;
        validate_balance("other_assets_value", self.assets.other_assets_value)?;
        validate_rate("home_appreciation_percent", self.assets.home_appreciation_percent)?;
        validate_rate("vehicle_depreciation_percent", self.assets.vehicle_depreciation_percent)?;
        validate_rate("other_assets_rate_percent", self.assets.other_assets_rate_percent)?;

        validate_balance("mortgage_balance", self.debts.mortgage_balance)?;
        validate_balance("auto_loan_balance", self.debts.auto_loan_balance)?;
        validate_balance("credit_card_balance", self.debts.credit_card_balance)?;
        validate_balance("student_loan_balance", self.debts.student_loan_balance)?;
        validate_balance("other_debt_balance", self.debts.other_debt_balance)?;
        validate_rate("mortgage_rate_percent", self.debts.mortgage_rate_percent)?;
        validate_rate("auto_loan_rate_percent", self.debts.auto_loan_rate_percent)?;
        validate_rate("credit_card_rate_percent", self.debts.credit_card_rate_percent)?;
        validate_rate("student_loan_rate_percent", self.debts.student_loan_rate_percent)?;
        validate_rate("other_debt_rate_percent", self.debts.other_debt_rate_percent)?;

        let c = &self.contributions;
        for (field, pct) in [
            ("checking_allocation_percent", c.checking_allocation_percent),
            ("savings_allocation_percent", c.savings_allocation_percent),
            ("brokerage_allocation_percent", c.brokerage_allocation_percent),
            ("employee_401k_percent", c.employee_401k_percent),
            ("employer_match_percent", c.employer_match_percent),
        ] {
            if pct < Decimal::ZERO {
                return Err(PlanwiseError::InvalidInput {
                    field: field.into(),
                    reason: "allocation percentage must be >= 0".into(),
                });
            }
        }
        validate_balance("traditional_ira_annual", c.traditional_ira_annual)?;
        validate_balance("roth_ira_annual", c.roth_ira_annual)?;
        validate_balance("pension_monthly", c.pension_monthly)?;

        validate_rate("annual_raise_percent", self.annual_raise_percent)?;

        for entry in &self.monthly_expenses {
            if entry.monthly_amount < Decimal::ZERO {
                return Err(PlanwiseError::InvalidInput {
                    field: format!("monthly_expenses[{}]", entry.label),
                    reason: "expense amount must be >= 0".into(),
                });
            }
        }

        Ok(())
    }

    /// Sum of all flat monthly expense lines.
    pub fn total_monthly_expenses(&self) -> Money {
        self.monthly_expenses
            .iter()
            .map(|e| e.monthly_amount)
            .sum()
    }
}
