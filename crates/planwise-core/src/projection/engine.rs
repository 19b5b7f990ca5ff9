use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::income::{gross_annual_income, net_monthly_income};
use crate::projection::sampler::{self, RowContext};
use crate::projection::snapshot::{ContributionPlan, PlanSnapshot};
use crate::projection::summary::{self, SummaryMetrics};
use crate::rates::periodic_rate;
use crate::tax::{effective_rate_or_fallback, TaxQuery, TaxRateProvider};
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::PlanwiseResult;

pub use crate::projection::sampler::ProjectionRow;

// ---------------------------------------------------------------------------
// Engine constants
// ---------------------------------------------------------------------------

/// Fraction of the post-interest balance paid down each period, per debt
/// category. These are engine behavior, not user inputs.
pub const MORTGAGE_PAYDOWN_FRACTION: Decimal = dec!(0.005);
pub const AUTO_LOAN_PAYDOWN_FRACTION: Decimal = dec!(0.02);
pub const CREDIT_CARD_PAYDOWN_FRACTION: Decimal = dec!(0.03);
pub const STUDENT_LOAN_PAYDOWN_FRACTION: Decimal = dec!(0.01);
pub const OTHER_DEBT_PAYDOWN_FRACTION: Decimal = dec!(0.015);

/// Which balance a retirement bucket's periodic growth applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GrowthBase {
    /// The period's contribution joins the growth base immediately.
    WithContribution,
    /// Growth applies to the pre-contribution balance only.
    PriorBalance,
}

/// Employer plans (401k, pension) compound the period's contribution in the
/// same period it lands.
const EMPLOYER_PLAN_GROWTH_BASE: GrowthBase = GrowthBase::WithContribution;

/// Fixed annual IRA/Roth contributions start earning growth the following
/// period.
const IRA_GROWTH_BASE: GrowthBase = GrowthBase::PriorBalance;

const MONTHS_PER_YEAR: u32 = 12;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Unrounded balances after one simulated period. Internal to the projector;
/// the sampler turns these into public `ProjectionRow`s.
#[derive(Debug, Clone)]
pub struct PeriodState {
    pub checking: Decimal,
    pub savings: Decimal,
    pub brokerage: Decimal,
    pub traditional_401k: Decimal,
    pub roth_ira: Decimal,
    pub traditional_ira: Decimal,
    pub pension: Decimal,
    pub home_value: Decimal,
    pub vehicle_value: Decimal,
    pub other_assets: Decimal,
    pub mortgage: Decimal,
    pub auto_loan: Decimal,
    pub credit_card: Decimal,
    pub student_loan: Decimal,
    pub other_debt: Decimal,
}

/// Result of a full projection run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionOutput {
    pub rows: Vec<ProjectionRow>,
    pub summary: SummaryMetrics,
}

/// Per-period dollar flows derived from income and the contribution plan.
/// Rebuilt after every annual raise; the tax rate stays frozen.
#[derive(Debug, Clone)]
struct MonthlyFlows {
    net_monthly: Money,
    checking_allocation: Money,
    savings_allocation: Money,
    brokerage_allocation: Money,
    employee_401k: Money,
    employer_match: Money,
    traditional_ira: Money,
    roth_ira: Money,
    pension: Money,
}

/// Per-period growth fractions, converted once from annual percentages.
#[derive(Debug, Clone)]
struct PeriodicRates {
    savings: Rate,
    brokerage: Rate,
    traditional_401k: Rate,
    roth_ira: Rate,
    traditional_ira: Rate,
    pension: Rate,
    home: Rate,
    vehicle: Rate,
    other_assets: Rate,
    mortgage: Rate,
    auto_loan: Rate,
    credit_card: Rate,
    student_loan: Rate,
    other_debt: Rate,
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Simulate every account and debt bucket month by month over the snapshot's
/// horizon and aggregate the results into sampled rows plus summary metrics.
///
/// The effective tax rate is obtained once, before period 0, and held for the
/// whole horizon; annual raises grow gross income but reuse the frozen rate.
/// A provider failure degrades to the fixed fallback rate with a warning.
pub fn project(
    snapshot: &PlanSnapshot,
    tax_provider: &dyn TaxRateProvider,
) -> PlanwiseResult<ComputationOutput<ProjectionOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    snapshot.validate()?;

    // --- Income and the single tax-rate lookup ---
    let mut gross_annual = gross_annual_income(&snapshot.income)?;
    let initial_gross_monthly = gross_annual / Decimal::from(MONTHS_PER_YEAR);

    let query = TaxQuery {
        gross_income: gross_annual,
        filing_status: snapshot.filing_status,
        state: snapshot.state.clone(),
        pretax_401k: gross_annual * snapshot.contributions.employee_401k_percent / dec!(100),
        pretax_ira: snapshot.contributions.traditional_ira_annual,
    };
    let (tax_rate_percent, tax_warning) = effective_rate_or_fallback(tax_provider, &query);
    if let Some(w) = tax_warning {
        warnings.push(w);
    }

    let mut flows = monthly_flows(gross_annual, tax_rate_percent, &snapshot.contributions);
    let initial_net_monthly = flows.net_monthly;

    let rates = PeriodicRates {
        savings: periodic_rate(snapshot.liquid.savings_rate_percent),
        brokerage: periodic_rate(snapshot.liquid.brokerage_rate_percent),
        traditional_401k: periodic_rate(snapshot.retirement.traditional_401k_rate_percent),
        roth_ira: periodic_rate(snapshot.retirement.roth_ira_rate_percent),
        traditional_ira: periodic_rate(snapshot.retirement.traditional_ira_rate_percent),
        pension: periodic_rate(snapshot.retirement.pension_rate_percent),
        home: periodic_rate(snapshot.assets.home_appreciation_percent),
        vehicle: periodic_rate(snapshot.assets.vehicle_depreciation_percent),
        other_assets: periodic_rate(snapshot.assets.other_assets_rate_percent),
        mortgage: periodic_rate(snapshot.debts.mortgage_rate_percent),
        auto_loan: periodic_rate(snapshot.debts.auto_loan_rate_percent),
        credit_card: periodic_rate(snapshot.debts.credit_card_rate_percent),
        student_loan: periodic_rate(snapshot.debts.student_loan_rate_percent),
        other_debt: periodic_rate(snapshot.debts.other_debt_rate_percent),
    };

    let expenses = snapshot.total_monthly_expenses();
    let raise_fraction = snapshot.annual_raise_percent / dec!(100);

    // --- Simulation loop ---
    let mut state = initial_state(snapshot);
    let mut states: Vec<PeriodState> = Vec::with_capacity(snapshot.horizon_months as usize + 1);
    states.push(state.clone());

    for period in 1..=snapshot.horizon_months {
        step(&mut state, &flows, &rates, expenses);
        states.push(state.clone());

        // Annual raise: gross grows, net is re-derived with the frozen rate.
        if period % MONTHS_PER_YEAR == 0 {
            gross_annual *= Decimal::ONE + raise_fraction;
            flows = monthly_flows(gross_annual, tax_rate_percent, &snapshot.contributions);
        }
    }

    // --- Emission ---
    let ctx = RowContext {
        start_date: snapshot.start_date,
        birth_date: snapshot.birth_date,
        stride: sampler::sampling_stride(snapshot.horizon_months),
    };
    let rows = sampler::sample(&states, &ctx);
    let summary = summary::compute(snapshot, initial_gross_monthly, initial_net_monthly, &rows);

    let output = ProjectionOutput { rows, summary };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Monthly account growth projection (effective tax rate frozen at period 0)",
        &serde_json::json!({
            "horizon_months": snapshot.horizon_months,
            "sampling_stride": ctx.stride.get(),
            "effective_tax_rate_percent": tax_rate_percent.to_string(),
            "annual_raise_percent": snapshot.annual_raise_percent.to_string(),
            "paydown_fractions": {
                "mortgage": MORTGAGE_PAYDOWN_FRACTION.to_string(),
                "auto_loan": AUTO_LOAN_PAYDOWN_FRACTION.to_string(),
                "credit_card": CREDIT_CARD_PAYDOWN_FRACTION.to_string(),
                "student_loan": STUDENT_LOAN_PAYDOWN_FRACTION.to_string(),
                "other_debt": OTHER_DEBT_PAYDOWN_FRACTION.to_string(),
            },
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Per-period step
// ---------------------------------------------------------------------------

/// One simulated month, in the documented order: contributions, expenses,
/// overdraft cover, liquid growth, retirement buckets, physical assets, debts.
fn step(state: &mut PeriodState, flows: &MonthlyFlows, rates: &PeriodicRates, expenses: Money) {
    // 1. Liquid allocations from net income.
    state.checking += flows.checking_allocation;
    state.savings += flows.savings_allocation;
    state.brokerage += flows.brokerage_allocation;

    // 2. Flat expenses hit checking only.
    state.checking -= expenses;

    // 3. Overdraft cover: savings absorbs the deficit, both floored at zero.
    if state.checking < Decimal::ZERO {
        let deficit = -state.checking;
        state.savings = (state.savings - deficit).max(Decimal::ZERO);
        state.checking = Decimal::ZERO;
    }

    // 4. Liquid growth. Checking earns nothing.
    state.savings += state.savings * rates.savings;
    state.brokerage += state.brokerage * rates.brokerage;

    // 5. Retirement buckets.
    state.traditional_401k = grow_retirement(
        state.traditional_401k,
        flows.employee_401k + flows.employer_match,
        rates.traditional_401k,
        EMPLOYER_PLAN_GROWTH_BASE,
    );
    state.pension = grow_retirement(
        state.pension,
        flows.pension,
        rates.pension,
        EMPLOYER_PLAN_GROWTH_BASE,
    );
    state.traditional_ira = grow_retirement(
        state.traditional_ira,
        flows.traditional_ira,
        rates.traditional_ira,
        IRA_GROWTH_BASE,
    );
    state.roth_ira = grow_retirement(
        state.roth_ira,
        flows.roth_ira,
        rates.roth_ira,
        IRA_GROWTH_BASE,
    );

    // 6. Physical assets. Vehicle value cannot go negative.
    state.home_value += state.home_value * rates.home;
    state.vehicle_value = (state.vehicle_value - state.vehicle_value * rates.vehicle)
        .max(Decimal::ZERO);
    state.other_assets += state.other_assets * rates.other_assets;

    // 7. Debts: interest accrues, then the category fraction of the
    //    post-interest balance is paid, floored at zero.
    state.mortgage = pay_down(state.mortgage, rates.mortgage, MORTGAGE_PAYDOWN_FRACTION);
    state.auto_loan = pay_down(state.auto_loan, rates.auto_loan, AUTO_LOAN_PAYDOWN_FRACTION);
    state.credit_card = pay_down(state.credit_card, rates.credit_card, CREDIT_CARD_PAYDOWN_FRACTION);
    state.student_loan = pay_down(state.student_loan, rates.student_loan, STUDENT_LOAN_PAYDOWN_FRACTION);
    state.other_debt = pay_down(state.other_debt, rates.other_debt, OTHER_DEBT_PAYDOWN_FRACTION);
}

fn grow_retirement(
    balance: Decimal,
    contribution: Money,
    rate: Rate,
    base: GrowthBase,
) -> Decimal {
    match base {
        GrowthBase::WithContribution => {
            let with_contribution = balance + contribution;
            with_contribution + with_contribution * rate
        }
        GrowthBase::PriorBalance => balance + balance * rate + contribution,
    }
}

fn pay_down(balance: Decimal, rate: Rate, fraction: Decimal) -> Decimal {
    let accrued = balance + balance * rate;
    let payment = (accrued * fraction).min(accrued);
    (accrued - payment).max(Decimal::ZERO)
}

fn monthly_flows(gross_annual: Money, tax_rate_percent: Rate, plan: &ContributionPlan) -> MonthlyFlows {
    let months = Decimal::from(MONTHS_PER_YEAR);
    let percent = dec!(100);
    let gross_monthly = gross_annual / months;
    let net_monthly = net_monthly_income(gross_annual, tax_rate_percent);

    let employee_401k = gross_monthly * plan.employee_401k_percent / percent;
    // Match never exceeds the employee's own deferral.
    let employer_match = (gross_monthly * plan.employer_match_percent / percent).min(employee_401k);

    MonthlyFlows {
        net_monthly,
        checking_allocation: net_monthly * plan.checking_allocation_percent / percent,
        savings_allocation: net_monthly * plan.savings_allocation_percent / percent,
        brokerage_allocation: net_monthly * plan.brokerage_allocation_percent / percent,
        employee_401k,
        employer_match,
        traditional_ira: plan.traditional_ira_annual / months,
        roth_ira: plan.roth_ira_annual / months,
        pension: plan.pension_monthly,
    }
}

fn initial_state(snapshot: &PlanSnapshot) -> PeriodState {
    PeriodState {
        checking: snapshot.liquid.checking_balance,
        savings: snapshot.liquid.savings_balance,
        brokerage: snapshot.liquid.brokerage_balance,
        traditional_401k: snapshot.retirement.traditional_401k_balance,
        roth_ira: snapshot.retirement.roth_ira_balance,
        traditional_ira: snapshot.retirement.traditional_ira_balance,
        pension: snapshot.retirement.pension_balance,
        home_value: snapshot.assets.home_value,
        vehicle_value: snapshot.assets.vehicle_value,
        other_assets: snapshot.assets.other_assets_value,
        mortgage: snapshot.debts.mortgage_balance,
        auto_loan: snapshot.debts.auto_loan_balance,
        credit_card: snapshot.debts.credit_card_balance,
        student_loan: snapshot.debts.student_loan_balance,
        other_debt: snapshot.debts.other_debt_balance,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::income::{EmploymentKind, IncomeInput};
    use crate::projection::snapshot::{
        ContributionPlan, DebtBalances, ExpenseEntry, LiquidAccounts, PhysicalAssets,
        RetirementAccounts,
    };
    use crate::tax::{FilingStatus, FlatRate, TaxQuery, TaxRateProvider};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    /// Zeroed-out snapshot suitable for most tests. Override fields as needed.
    fn empty_snapshot(horizon_months: u32) -> PlanSnapshot {
        PlanSnapshot {
            income: IncomeInput {
                employment: EmploymentKind::Salaried,
                annual_salary: Decimal::ZERO,
                hourly_rate: Decimal::ZERO,
                hours_per_week: Decimal::ZERO,
                monthly_business_income: Decimal::ZERO,
                monthly_other_income: Decimal::ZERO,
            },
            filing_status: FilingStatus::Single,
            state: "CO".into(),
            start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            birth_date: None,
            annual_raise_percent: Decimal::ZERO,
            horizon_months,
            liquid: LiquidAccounts {
                checking_balance: Decimal::ZERO,
                savings_balance: Decimal::ZERO,
                savings_rate_percent: Decimal::ZERO,
                brokerage_balance: Decimal::ZERO,
                brokerage_rate_percent: Decimal::ZERO,
            },
            retirement: RetirementAccounts {
                traditional_401k_balance: Decimal::ZERO,
                traditional_401k_rate_percent: Decimal::ZERO,
                roth_ira_balance: Decimal::ZERO,
                roth_ira_rate_percent: Decimal::ZERO,
                traditional_ira_balance: Decimal::ZERO,
                traditional_ira_rate_percent: Decimal::ZERO,
                pension_balance: Decimal::ZERO,
                pension_rate_percent: Decimal::ZERO,
            },
            assets: PhysicalAssets {
                home_value: Decimal::ZERO,
                home_appreciation_percent: Decimal::ZERO,
                vehicle_value: Decimal::ZERO,
                vehicle_depreciation_percent: Decimal::ZERO,
                other_assets_value: Decimal::ZERO,
                other_assets_rate_percent: Decimal::ZERO,
            },
            debts: DebtBalances {
                mortgage_balance: Decimal::ZERO,
                mortgage_rate_percent: Decimal::ZERO,
                auto_loan_balance: Decimal::ZERO,
                auto_loan_rate_percent: Decimal::ZERO,
                credit_card_balance: Decimal::ZERO,
                credit_card_rate_percent: Decimal::ZERO,
                student_loan_balance: Decimal::ZERO,
                student_loan_rate_percent: Decimal::ZERO,
                other_debt_balance: Decimal::ZERO,
                other_debt_rate_percent: Decimal::ZERO,
            },
            contributions: ContributionPlan {
                checking_allocation_percent: Decimal::ZERO,
                savings_allocation_percent: Decimal::ZERO,
                brokerage_allocation_percent: Decimal::ZERO,
                employee_401k_percent: Decimal::ZERO,
                employer_match_percent: Decimal::ZERO,
                traditional_ira_annual: Decimal::ZERO,
                roth_ira_annual: Decimal::ZERO,
                pension_monthly: Decimal::ZERO,
            },
            monthly_expenses: Vec::new(),
        }
    }

    fn flat_25() -> FlatRate {
        FlatRate(dec!(25))
    }

    struct FailingProvider;

    impl TaxRateProvider for FailingProvider {
        fn effective_tax_rate(&self, _query: &TaxQuery) -> crate::PlanwiseResult<Rate> {
            Err(crate::PlanwiseError::TaxProviderFailure("offline".into()))
        }
    }

    // ---------------------------------------------------------------
    // 1. Validation: horizon bounds
    // ---------------------------------------------------------------
    #[test]
    fn test_zero_horizon_rejected() {
        let snapshot = empty_snapshot(0);
        assert!(project(&snapshot, &flat_25()).is_err());
    }

    #[test]
    fn test_horizon_over_360_rejected() {
        let snapshot = empty_snapshot(361);
        assert!(project(&snapshot, &flat_25()).is_err());
    }

    #[test]
    fn test_negative_balance_rejected() {
        let mut snapshot = empty_snapshot(12);
        snapshot.liquid.savings_balance = dec!(-100);
        assert!(project(&snapshot, &flat_25()).is_err());
    }

    // ---------------------------------------------------------------
    // 2. Sampling stride boundaries
    // ---------------------------------------------------------------
    #[test]
    fn test_72_month_horizon_samples_every_third_period() {
        let snapshot = empty_snapshot(72);
        let result = project(&snapshot, &flat_25()).unwrap();
        let periods: Vec<u32> = result.result.rows.iter().map(|r| r.period).collect();
        let expected: Vec<u32> = (0..=72).filter(|p| p % 3 == 0).collect();
        assert_eq!(periods, expected);
    }

    #[test]
    fn test_48_month_horizon_samples_every_period() {
        let snapshot = empty_snapshot(48);
        let result = project(&snapshot, &flat_25()).unwrap();
        let periods: Vec<u32> = result.result.rows.iter().map(|r| r.period).collect();
        let expected: Vec<u32> = (0..=48).collect();
        assert_eq!(periods, expected);
    }

    // ---------------------------------------------------------------
    // 3. Determinism: identical inputs, identical rows
    // ---------------------------------------------------------------
    #[test]
    fn test_projection_is_deterministic() {
        let mut snapshot = empty_snapshot(120);
        snapshot.income.annual_salary = dec!(95_000);
        snapshot.liquid.checking_balance = dec!(4_000);
        snapshot.liquid.savings_balance = dec!(20_000);
        snapshot.liquid.savings_rate_percent = dec!(4.2);
        snapshot.liquid.brokerage_balance = dec!(15_000);
        snapshot.liquid.brokerage_rate_percent = dec!(7);
        snapshot.retirement.traditional_401k_balance = dec!(60_000);
        snapshot.retirement.traditional_401k_rate_percent = dec!(7);
        snapshot.debts.credit_card_balance = dec!(3_500);
        snapshot.debts.credit_card_rate_percent = dec!(22);
        snapshot.contributions.checking_allocation_percent = dec!(50);
        snapshot.contributions.savings_allocation_percent = dec!(20);
        snapshot.contributions.employee_401k_percent = dec!(6);
        snapshot.contributions.employer_match_percent = dec!(3);
        snapshot.annual_raise_percent = dec!(3);
        snapshot.monthly_expenses = vec![ExpenseEntry {
            label: "rent".into(),
            monthly_amount: dec!(1_800),
        }];

        let first = project(&snapshot, &flat_25()).unwrap();
        let second = project(&snapshot, &flat_25()).unwrap();
        assert_eq!(first.result.rows, second.result.rows);
    }

    // ---------------------------------------------------------------
    // 4. Overdraft cover: savings absorbs the checking deficit once
    // ---------------------------------------------------------------
    #[test]
    fn test_overdraft_covered_from_savings() {
        let mut snapshot = empty_snapshot(1);
        snapshot.liquid.checking_balance = dec!(100);
        snapshot.liquid.savings_balance = dec!(1_000);
        snapshot.monthly_expenses = vec![ExpenseEntry {
            label: "rent".into(),
            monthly_amount: dec!(300),
        }];

        let result = project(&snapshot, &flat_25()).unwrap();
        let row = &result.result.rows[1];
        assert_eq!(row.checking, Decimal::ZERO);
        // Deficit of 200 moved out of savings exactly once.
        assert_eq!(row.savings, dec!(800));
    }

    #[test]
    fn test_overdraft_floors_savings_at_zero() {
        let mut snapshot = empty_snapshot(1);
        snapshot.liquid.checking_balance = dec!(50);
        snapshot.liquid.savings_balance = dec!(60);
        snapshot.monthly_expenses = vec![ExpenseEntry {
            label: "rent".into(),
            monthly_amount: dec!(500),
        }];

        let result = project(&snapshot, &flat_25()).unwrap();
        let row = &result.result.rows[1];
        assert_eq!(row.checking, Decimal::ZERO);
        assert_eq!(row.savings, Decimal::ZERO);
    }

    // ---------------------------------------------------------------
    // 5. Checking earns no growth
    // ---------------------------------------------------------------
    #[test]
    fn test_checking_earns_no_growth() {
        let mut snapshot = empty_snapshot(24);
        snapshot.liquid.checking_balance = dec!(5_000);
        // A savings rate exists but checking has no rate to apply.
        snapshot.liquid.savings_balance = dec!(5_000);
        snapshot.liquid.savings_rate_percent = dec!(6);

        let result = project(&snapshot, &flat_25()).unwrap();
        let last = result.result.rows.last().unwrap();
        assert_eq!(last.checking, dec!(5_000));
        assert!(last.savings > dec!(5_000));
    }

    // ---------------------------------------------------------------
    // 6. Employer match is capped at the employee deferral
    // ---------------------------------------------------------------
    #[test]
    fn test_employer_match_capped_at_employee_contribution() {
        let mut snapshot = empty_snapshot(1);
        snapshot.income.annual_salary = dec!(120_000); // 10,000/month gross
        snapshot.contributions.employee_401k_percent = dec!(4);
        snapshot.contributions.employer_match_percent = dec!(10);

        let result = project(&snapshot, &flat_25()).unwrap();
        let row = &result.result.rows[1];
        // Employee 400 + match capped at 400 = 800, no growth.
        assert_eq!(row.traditional_401k, dec!(800));
    }

    #[test]
    fn test_employer_match_below_cap_pays_in_full() {
        let mut snapshot = empty_snapshot(1);
        snapshot.income.annual_salary = dec!(120_000);
        snapshot.contributions.employee_401k_percent = dec!(6);
        snapshot.contributions.employer_match_percent = dec!(3);

        let result = project(&snapshot, &flat_25()).unwrap();
        let row = &result.result.rows[1];
        // 600 employee + 300 match.
        assert_eq!(row.traditional_401k, dec!(900));
    }

    // ---------------------------------------------------------------
    // 7. Retirement growth-base rules
    // ---------------------------------------------------------------
    #[test]
    fn test_401k_contribution_compounds_same_period() {
        let mut snapshot = empty_snapshot(1);
        snapshot.income.annual_salary = dec!(120_000);
        snapshot.contributions.employee_401k_percent = dec!(10); // 1,000/month
        snapshot.retirement.traditional_401k_balance = dec!(10_000);
        snapshot.retirement.traditional_401k_rate_percent = dec!(12); // 1%/month

        let result = project(&snapshot, &flat_25()).unwrap();
        let row = &result.result.rows[1];
        // (10,000 + 1,000) * 1.01 = 11,110
        assert_eq!(row.traditional_401k, dec!(11_110));
    }

    #[test]
    fn test_ira_contribution_grows_from_next_period() {
        let mut snapshot = empty_snapshot(1);
        snapshot.contributions.roth_ira_annual = dec!(6_000); // 500/month
        snapshot.retirement.roth_ira_balance = dec!(10_000);
        snapshot.retirement.roth_ira_rate_percent = dec!(12); // 1%/month

        let result = project(&snapshot, &flat_25()).unwrap();
        let row = &result.result.rows[1];
        // 10,000 * 1.01 + 500 = 10,600 (contribution not in this period's base)
        assert_eq!(row.roth_ira, dec!(10_600));
    }

    // ---------------------------------------------------------------
    // 8. Vehicle depreciation clamps at zero
    // ---------------------------------------------------------------
    #[test]
    fn test_vehicle_value_never_negative() {
        let mut snapshot = empty_snapshot(360);
        snapshot.assets.vehicle_value = dec!(30_000);
        snapshot.assets.vehicle_depreciation_percent = dec!(18);

        let result = project(&snapshot, &flat_25()).unwrap();
        for row in &result.result.rows {
            assert!(row.vehicle_value >= Decimal::ZERO, "period {}", row.period);
        }
    }

    // ---------------------------------------------------------------
    // 9. Debt paydown: monotonic, floored, reaches zero
    // ---------------------------------------------------------------
    #[test]
    fn test_debt_balances_non_increasing() {
        let mut snapshot = empty_snapshot(360);
        snapshot.debts.credit_card_balance = dec!(8_000);
        snapshot.debts.credit_card_rate_percent = dec!(22);
        snapshot.debts.auto_loan_balance = dec!(18_000);
        snapshot.debts.auto_loan_rate_percent = dec!(7);
        snapshot.debts.mortgage_balance = dec!(250_000);
        snapshot.debts.mortgage_rate_percent = dec!(5);

        let result = project(&snapshot, &flat_25()).unwrap();
        let rows = &result.result.rows;
        for pair in rows.windows(2) {
            assert!(pair[1].credit_card <= pair[0].credit_card);
            assert!(pair[1].auto_loan <= pair[0].auto_loan);
            assert!(pair[1].mortgage <= pair[0].mortgage);
        }
        let last = rows.last().unwrap();
        assert!(last.credit_card >= Decimal::ZERO);
        assert!(last.auto_loan >= Decimal::ZERO);
        assert!(last.mortgage >= Decimal::ZERO);
    }

    #[test]
    fn test_zero_rate_credit_card_pays_off_within_horizon() {
        let mut snapshot = empty_snapshot(360);
        snapshot.debts.credit_card_balance = dec!(1_000);

        let result = project(&snapshot, &flat_25()).unwrap();
        // 3% of the balance each month for 30 years rounds to zero.
        assert_eq!(result.result.rows.last().unwrap().credit_card, Decimal::ZERO);
    }

    // ---------------------------------------------------------------
    // 10. Annual raise grows contributions from period 13
    // ---------------------------------------------------------------
    #[test]
    fn test_annual_raise_increases_net_income() {
        let mut snapshot = empty_snapshot(24);
        snapshot.income.annual_salary = dec!(120_000);
        snapshot.annual_raise_percent = dec!(10);
        snapshot.contributions.checking_allocation_percent = dec!(100);

        // Zero tax keeps the arithmetic exact: 10,000/month year one,
        // 11,000/month year two.
        let result = project(&snapshot, &FlatRate(Decimal::ZERO)).unwrap();
        let rows = &result.result.rows;
        assert_eq!(rows[12].checking, dec!(120_000));
        assert_eq!(rows[24].checking, dec!(120_000) + dec!(132_000));
    }

    // ---------------------------------------------------------------
    // 11. Tax provider failure degrades to the 25% fallback
    // ---------------------------------------------------------------
    #[test]
    fn test_tax_fallback_on_provider_failure() {
        let mut snapshot = empty_snapshot(1);
        snapshot.income.annual_salary = dec!(120_000);
        snapshot.contributions.checking_allocation_percent = dec!(100);

        let result = project(&snapshot, &FailingProvider).unwrap();
        assert!(!result.warnings.is_empty());
        // Net at fallback 25%: 120,000 * 0.75 / 12 = 7,500.
        assert_eq!(result.result.rows[1].checking, dec!(7_500));
    }

    // ---------------------------------------------------------------
    // 12. Aggregates and net worth
    // ---------------------------------------------------------------
    #[test]
    fn test_net_worth_aggregates() {
        let mut snapshot = empty_snapshot(1);
        snapshot.liquid.checking_balance = dec!(1_000);
        snapshot.liquid.savings_balance = dec!(2_000);
        snapshot.liquid.brokerage_balance = dec!(3_000);
        snapshot.retirement.traditional_401k_balance = dec!(10_000);
        snapshot.assets.home_value = dec!(300_000);
        snapshot.debts.mortgage_balance = dec!(200_000);

        let result = project(&snapshot, &flat_25()).unwrap();
        let row = &result.result.rows[0];
        assert_eq!(row.total_liquid, dec!(6_000));
        assert_eq!(row.total_retirement, dec!(10_000));
        assert_eq!(row.total_assets, dec!(316_000));
        assert_eq!(row.total_debts, dec!(200_000));
        assert_eq!(row.net_worth, dec!(116_000));
    }

    // ---------------------------------------------------------------
    // 13. Calendar and age stamping
    // ---------------------------------------------------------------
    #[test]
    fn test_calendar_rollover_and_age() {
        let mut snapshot = empty_snapshot(14);
        snapshot.start_date = NaiveDate::from_ymd_opt(2026, 11, 1).unwrap();
        snapshot.birth_date = NaiveDate::from_ymd_opt(1990, 6, 15);

        let result = project(&snapshot, &flat_25()).unwrap();
        let rows = &result.result.rows;
        assert_eq!((rows[0].year, rows[0].month), (2026, 11));
        assert_eq!((rows[2].year, rows[2].month), (2027, 1));
        assert_eq!((rows[14].year, rows[14].month), (2028, 1));
        // January 2028: born June 1990 -> still 37.
        assert_eq!(rows[14].age, Some(37));
    }
}
