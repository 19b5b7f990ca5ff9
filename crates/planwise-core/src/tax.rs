use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Rate};
use crate::PlanwiseResult;

/// Effective rate substituted whenever the external provider fails or
/// returns a value outside [0, 100).
pub const FALLBACK_TAX_RATE_PERCENT: Decimal = dec!(25);

/// Filing status passed through to the tax rate provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilingStatus {
    Single,
    MarriedJoint,
    MarriedSeparate,
    HeadOfHousehold,
}

/// Everything the external tax collaborator needs to produce an effective rate.
/// Pre-tax contributions reduce the taxable base on the provider side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxQuery {
    pub gross_income: Money,
    pub filing_status: FilingStatus,
    pub state: String,
    pub pretax_401k: Money,
    pub pretax_ira: Money,
}

/// External collaborator boundary. Implementations may fail; callers inside
/// the engine must degrade to `FALLBACK_TAX_RATE_PERCENT` rather than
/// propagate the failure.
pub trait TaxRateProvider {
    /// Effective tax rate as an annual percentage (25 = 25%).
    fn effective_tax_rate(&self, query: &TaxQuery) -> PlanwiseResult<Rate>;
}

/// Fixed-rate provider for CLI and bindings callers that supply their own
/// effective rate instead of a bracket table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlatRate(pub Rate);

impl TaxRateProvider for FlatRate {
    fn effective_tax_rate(&self, _query: &TaxQuery) -> PlanwiseResult<Rate> {
        Ok(self.0)
    }
}

/// Query the provider, substituting the fixed fallback rate on any failure
/// or out-of-range result. Returns the rate plus an optional warning for the
/// computation envelope. This is the only place the engine silently degrades.
pub fn effective_rate_or_fallback(
    provider: &dyn TaxRateProvider,
    query: &TaxQuery,
) -> (Rate, Option<String>) {
    match provider.effective_tax_rate(query) {
        Ok(rate) if rate >= Decimal::ZERO && rate < dec!(100) => (rate, None),
        Ok(rate) => (
            FALLBACK_TAX_RATE_PERCENT,
            Some(format!(
                "Tax provider returned out-of-range rate {rate}%; using fallback {FALLBACK_TAX_RATE_PERCENT}%"
            )),
        ),
        Err(e) => (
            FALLBACK_TAX_RATE_PERCENT,
            Some(format!(
                "Tax provider failed ({e}); using fallback {FALLBACK_TAX_RATE_PERCENT}%"
            )),
        ),
    }
}
