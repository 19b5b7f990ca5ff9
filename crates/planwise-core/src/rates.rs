use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::error::PlanwiseError;
use crate::types::Rate;
use crate::PlanwiseResult;

const MONTHS_PER_YEAR: Decimal = dec!(12);
const PERCENT: Decimal = dec!(100);

/// Convert an annual percentage rate to a per-month fraction: annual / 12 / 100.
pub fn periodic_rate(annual_percent: Rate) -> Rate {
    annual_percent / MONTHS_PER_YEAR / PERCENT
}

/// Convert an annual percentage rate to an annual fraction: annual / 100.
pub fn annual_fraction(annual_percent: Rate) -> Rate {
    annual_percent / PERCENT
}

/// Compute (1 + r)^n via iterative multiplication (avoids Decimal::powd drift).
pub fn compound(rate: Decimal, n: u32) -> Decimal {
    let mut result = Decimal::ONE;
    let factor = Decimal::ONE + rate;
    for _ in 0..n {
        result *= factor;
    }
    result
}

/// Round to whole currency units. Applied only when emitting projection rows.
/// Half-up, not banker's rounding: $1234.50 displays as $1235.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Round to cents. Applied only when emitting amortization entries.
pub fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Reject negative annual-percent rates at the API boundary.
pub fn validate_rate(field: &str, annual_percent: Rate) -> PlanwiseResult<()> {
    if annual_percent < Decimal::ZERO {
        return Err(PlanwiseError::InvalidInput {
            field: field.into(),
            reason: "annual rate must be >= 0 percent".into(),
        });
    }
    Ok(())
}

/// Reject negative balances at the API boundary.
pub fn validate_balance(field: &str, balance: Decimal) -> PlanwiseResult<()> {
    if balance < Decimal::ZERO {
        return Err(PlanwiseError::InvalidInput {
            field: field.into(),
            reason: "balance must be >= 0".into(),
        });
    }
    Ok(())
}
