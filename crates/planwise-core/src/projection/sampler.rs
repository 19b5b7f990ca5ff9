use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;

use crate::projection::engine::PeriodState;
use crate::rates::round_money;
use crate::types::Money;

/// Horizons past this many months are downsampled for charting.
pub const SAMPLING_STRIDE_THRESHOLD_MONTHS: u32 = 60;

/// Reporting cadence for long horizons: every third period.
pub const COARSE_SAMPLING_STRIDE: NonZeroU32 = match NonZeroU32::new(3) {
    Some(stride) => stride,
    None => unreachable!(),
};

/// A read-only reporting snapshot of one sampled period. Balances are whole
/// currency units; rounding happens here and nowhere earlier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionRow {
    pub period: u32,
    pub year: i32,
    pub month: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    pub checking: Money,
    pub savings: Money,
    pub brokerage: Money,
    pub traditional_401k: Money,
    pub roth_ira: Money,
    pub traditional_ira: Money,
    pub pension: Money,
    pub home_value: Money,
    pub vehicle_value: Money,
    pub other_assets: Money,
    pub mortgage: Money,
    pub auto_loan: Money,
    pub credit_card: Money,
    pub student_loan: Money,
    pub other_debt: Money,
    pub total_liquid: Money,
    pub total_retirement: Money,
    pub total_assets: Money,
    pub total_debts: Money,
    pub net_worth: Money,
}

/// Calendar context for row emission. The stride is non-zero by
/// construction, so the emission filter can never divide by zero.
#[derive(Debug, Clone)]
pub struct RowContext {
    pub start_date: NaiveDate,
    pub birth_date: Option<NaiveDate>,
    pub stride: NonZeroU32,
}

/// Reporting stride for a horizon: every third period once the horizon
/// exceeds the threshold, otherwise every period.
pub fn sampling_stride(horizon_months: u32) -> NonZeroU32 {
    if horizon_months > SAMPLING_STRIDE_THRESHOLD_MONTHS {
        COARSE_SAMPLING_STRIDE
    } else {
        NonZeroU32::MIN
    }
}

/// Downsample completed internal states into public rows. Pure and
/// idempotent: the same states and context always produce identical rows.
/// Period 0 is always emitted, then every `stride`th period.
pub fn sample(states: &[PeriodState], ctx: &RowContext) -> Vec<ProjectionRow> {
    states
        .iter()
        .enumerate()
        .filter(|(period, _)| *period == 0 || *period as u32 % ctx.stride.get() == 0)
        .map(|(period, state)| make_row(period as u32, state, ctx))
        .collect()
}

fn make_row(period: u32, state: &PeriodState, ctx: &RowContext) -> ProjectionRow {
    let (year, month) = calendar_at(ctx.start_date, period);
    let age = ctx.birth_date.map(|b| age_at(b, year, month));

    let checking = round_money(state.checking);
    let savings = round_money(state.savings);
    let brokerage = round_money(state.brokerage);
    let traditional_401k = round_money(state.traditional_401k);
    let roth_ira = round_money(state.roth_ira);
    let traditional_ira = round_money(state.traditional_ira);
    let pension = round_money(state.pension);
    let home_value = round_money(state.home_value);
    let vehicle_value = round_money(state.vehicle_value);
    let other_assets = round_money(state.other_assets);
    let mortgage = round_money(state.mortgage);
    let auto_loan = round_money(state.auto_loan);
    let credit_card = round_money(state.credit_card);
    let student_loan = round_money(state.student_loan);
    let other_debt = round_money(state.other_debt);

    let total_liquid = checking + savings + brokerage;
    let total_retirement = traditional_401k + roth_ira + traditional_ira + pension;
    let total_assets = total_liquid + total_retirement + home_value + vehicle_value + other_assets;
    let total_debts = mortgage + auto_loan + credit_card + student_loan + other_debt;

    ProjectionRow {
        period,
        year,
        month,
        age,
        checking,
        savings,
        brokerage,
        traditional_401k,
        roth_ira,
        traditional_ira,
        pension,
        home_value,
        vehicle_value,
        other_assets,
        mortgage,
        auto_loan,
        credit_card,
        student_loan,
        other_debt,
        total_liquid,
        total_retirement,
        total_assets,
        total_debts,
        net_worth: total_assets - total_debts,
    }
}

fn calendar_at(start: NaiveDate, period: u32) -> (i32, u32) {
    let months = start.month0() + period;
    (start.year() + (months / 12) as i32, months % 12 + 1)
}

fn age_at(birth: NaiveDate, year: i32, month: u32) -> u32 {
    let mut age = year - birth.year();
    // The row is stamped at the first of the month.
    if month < birth.month() || (month == birth.month() && birth.day() > 1) {
        age -= 1;
    }
    age.max(0) as u32
}
