use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::projection::engine::{
    AUTO_LOAN_PAYDOWN_FRACTION, CREDIT_CARD_PAYDOWN_FRACTION, MORTGAGE_PAYDOWN_FRACTION,
    OTHER_DEBT_PAYDOWN_FRACTION, STUDENT_LOAN_PAYDOWN_FRACTION,
};
use crate::projection::sampler::ProjectionRow;
use crate::projection::snapshot::PlanSnapshot;
use crate::rates::round_cents;
use crate::types::{Money, Rate};

/// Headline metrics derived once from the first and last emitted rows plus
/// the static inputs. Never recomputed mid-loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryMetrics {
    pub current_net_worth: Money,
    pub projected_net_worth: Money,
    /// Net monthly income at period 0.
    pub monthly_income: Money,
    pub monthly_expenses: Money,
    /// Net income minus flat expenses.
    pub monthly_cash_flow: Money,
    /// First-period debt obligations over gross monthly income, as a percent.
    pub debt_to_income_percent: Rate,
    /// All monthly saving (savings/brokerage allocations plus retirement
    /// contributions) over gross monthly income, as a percent.
    pub savings_rate_percent: Rate,
}

pub fn compute(
    snapshot: &PlanSnapshot,
    gross_monthly: Money,
    net_monthly: Money,
    rows: &[ProjectionRow],
) -> SummaryMetrics {
    let current_net_worth = rows.first().map(|r| r.net_worth).unwrap_or_default();
    let projected_net_worth = rows.last().map(|r| r.net_worth).unwrap_or_default();

    let monthly_expenses = snapshot.total_monthly_expenses();
    let monthly_cash_flow = net_monthly - monthly_expenses;

    let d = &snapshot.debts;
    let monthly_debt_obligations = d.mortgage_balance * MORTGAGE_PAYDOWN_FRACTION
        + d.auto_loan_balance * AUTO_LOAN_PAYDOWN_FRACTION
        + d.credit_card_balance * CREDIT_CARD_PAYDOWN_FRACTION
        + d.student_loan_balance * STUDENT_LOAN_PAYDOWN_FRACTION
        + d.other_debt_balance * OTHER_DEBT_PAYDOWN_FRACTION;

    let c = &snapshot.contributions;
    let percent = dec!(100);
    let twelve = dec!(12);
    let monthly_saving = net_monthly * c.savings_allocation_percent / percent
        + net_monthly * c.brokerage_allocation_percent / percent
        + gross_monthly * c.employee_401k_percent / percent
        + c.traditional_ira_annual / twelve
        + c.roth_ira_annual / twelve
        + c.pension_monthly;

    let (debt_to_income_percent, savings_rate_percent) = if gross_monthly > Decimal::ZERO {
        (
            round_cents(monthly_debt_obligations / gross_monthly * percent),
            round_cents(monthly_saving / gross_monthly * percent),
        )
    } else {
        (Decimal::ZERO, Decimal::ZERO)
    };

    SummaryMetrics {
        current_net_worth,
        projected_net_worth,
        monthly_income: round_cents(net_monthly),
        monthly_expenses: round_cents(monthly_expenses),
        monthly_cash_flow: round_cents(monthly_cash_flow),
        debt_to_income_percent,
        savings_rate_percent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::{project, PlanSnapshot};
    use crate::tax::FlatRate;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn snapshot() -> PlanSnapshot {
        let mut s: PlanSnapshot = serde_json::from_value(serde_json::json!({
            "income": { "employment": "salaried", "annual_salary": "120000" },
            "filing_status": "single",
            "state": "CO",
            "start_date": "2026-01-01",
            "annual_raise_percent": "0",
            "horizon_months": 12,
            "liquid": {
                "checking_balance": "5000", "savings_balance": "10000",
                "savings_rate_percent": "4", "brokerage_balance": "0",
                "brokerage_rate_percent": "0"
            },
            "retirement": {
                "traditional_401k_balance": "0", "traditional_401k_rate_percent": "0",
                "roth_ira_balance": "0", "roth_ira_rate_percent": "0",
                "traditional_ira_balance": "0", "traditional_ira_rate_percent": "0",
                "pension_balance": "0", "pension_rate_percent": "0"
            },
            "assets": {
                "home_value": "0", "home_appreciation_percent": "0",
                "vehicle_value": "0", "vehicle_depreciation_percent": "0",
                "other_assets_value": "0", "other_assets_rate_percent": "0"
            },
            "debts": {
                "mortgage_balance": "200000", "mortgage_rate_percent": "5",
                "auto_loan_balance": "0", "auto_loan_rate_percent": "0",
                "credit_card_balance": "0", "credit_card_rate_percent": "0",
                "student_loan_balance": "0", "student_loan_rate_percent": "0",
                "other_debt_balance": "0", "other_debt_rate_percent": "0"
            },
            "contributions": {
                "checking_allocation_percent": "0",
                "savings_allocation_percent": "10",
                "brokerage_allocation_percent": "0",
                "employee_401k_percent": "5",
                "employer_match_percent": "0",
                "traditional_ira_annual": "0",
                "roth_ira_annual": "0",
                "pension_monthly": "0"
            },
            "monthly_expenses": [
                { "label": "rent", "monthly_amount": "2000" }
            ]
        }))
        .unwrap();
        s.start_date = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        s
    }

    #[test]
    fn test_summary_income_and_cash_flow() {
        let result = project(&snapshot(), &FlatRate(dec!(25))).unwrap();
        let summary = &result.result.summary;
        // 120,000 * 0.75 / 12 = 7,500 net; 7,500 - 2,000 expenses.
        assert_eq!(summary.monthly_income, dec!(7500.00));
        assert_eq!(summary.monthly_expenses, dec!(2000.00));
        assert_eq!(summary.monthly_cash_flow, dec!(5500.00));
    }

    #[test]
    fn test_summary_dti_uses_paydown_fractions() {
        let result = project(&snapshot(), &FlatRate(dec!(25))).unwrap();
        // Mortgage obligation 200,000 * 0.005 = 1,000 on 10,000 gross = 10%.
        assert_eq!(result.result.summary.debt_to_income_percent, dec!(10.00));
    }

    #[test]
    fn test_summary_savings_rate() {
        let result = project(&snapshot(), &FlatRate(dec!(25))).unwrap();
        // Savings 10% of 7,500 net = 750, plus 5% of 10,000 gross = 500.
        // 1,250 / 10,000 gross = 12.5%.
        assert_eq!(result.result.summary.savings_rate_percent, dec!(12.50));
    }

    #[test]
    fn test_summary_net_worth_endpoints_match_rows() {
        let result = project(&snapshot(), &FlatRate(dec!(25))).unwrap();
        let rows = &result.result.rows;
        let summary = &result.result.summary;
        assert_eq!(summary.current_net_worth, rows.first().unwrap().net_worth);
        assert_eq!(summary.projected_net_worth, rows.last().unwrap().net_worth);
    }
}
