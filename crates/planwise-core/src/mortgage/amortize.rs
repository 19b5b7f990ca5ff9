use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::PlanwiseError;
use crate::rates::{compound, periodic_rate, round_cents};
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::PlanwiseResult;

/// PMI applies only while loan-to-value strictly exceeds this fraction.
pub const PMI_LTV_THRESHOLD: Decimal = dec!(0.80);

/// Default annual PMI rate as a percent of the loan amount.
pub const DEFAULT_PMI_RATE_PERCENT: Decimal = dec!(0.5);

/// A schedule is complete once the balance is within one cent of zero.
pub const PAYOFF_EPSILON: Decimal = dec!(0.01);

const MONTHS_PER_YEAR: u32 = 12;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input for a single fixed-payment amortizing loan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MortgageInput {
    pub home_price: Money,
    pub loan_amount: Money,
    /// Annual percent (6.5 = 6.5%).
    pub annual_rate_percent: Rate,
    pub term_years: u32,
    /// Calendar year stamped on the first payment.
    pub start_year: i32,
    #[serde(default)]
    pub property_tax_annual: Money,
    #[serde(default)]
    pub insurance_annual: Money,
    #[serde(default)]
    pub hoa_annual: Money,
    /// Overrides `DEFAULT_PMI_RATE_PERCENT` when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pmi_rate_percent: Option<Rate>,
    /// Recurring extra principal added to every period's principal portion.
    #[serde(default)]
    pub extra_payment: Money,
    /// Accelerated cadence: half the payment and periodic rate, twice the
    /// iteration cap.
    #[serde(default)]
    pub biweekly: bool,
}

/// One payment event. Money fields are rounded to cents at emission; the
/// running balance stays unrounded inside the loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationEntry {
    pub number: u32,
    pub year: i32,
    pub payment: Money,
    pub principal: Money,
    pub interest: Money,
    pub cumulative_interest: Money,
    pub remaining_balance: Money,
    pub year_end: bool,
}

/// Escrow-inclusive monthly payment breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentBreakdown {
    pub principal_and_interest: Money,
    pub property_tax: Money,
    pub insurance: Money,
    pub pmi: Money,
    pub hoa: Money,
    pub total: Money,
    pub ltv_percent: Rate,
}

/// Payoff length and total interest for one schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayoffStats {
    pub periods: u32,
    pub years: Decimal,
    pub total_interest: Money,
}

/// Interest and time saved versus the zero-extra monthly baseline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayoffSavings {
    pub interest_saved: Money,
    pub periods_saved: u32,
    pub years_saved: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MortgageOutput {
    pub breakdown: PaymentBreakdown,
    pub schedule: Vec<AmortizationEntry>,
    pub payoff: PayoffStats,
    pub baseline: PayoffStats,
    /// Present when an extra payment or bi-weekly cadence is configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub savings: Option<PayoffSavings>,
}

// ---------------------------------------------------------------------------
// Payment and PMI primitives
// ---------------------------------------------------------------------------

/// Fixed monthly payment via the annuity formula
/// `P * r(1+r)^n / ((1+r)^n - 1)`, with `r = 0` solved as `P / n`.
pub fn monthly_payment(principal: Money, monthly_rate: Rate, n_months: u32) -> PlanwiseResult<Money> {
    if n_months == 0 {
        return Err(PlanwiseError::InvalidInput {
            field: "n_months".into(),
            reason: "number of payments must be > 0".into(),
        });
    }
    if monthly_rate.is_zero() {
        return Ok(principal / Decimal::from(n_months));
    }

    let factor = compound(monthly_rate, n_months);
    let denominator = factor - Decimal::ONE;
    if denominator.is_zero() {
        return Err(PlanwiseError::DivisionByZero {
            context: "annuity factor".into(),
        });
    }
    Ok(principal * monthly_rate * factor / denominator)
}

/// Annual PMI: `loan * rate` while LTV strictly exceeds 80%, else zero.
pub fn annual_pmi(loan_amount: Money, home_value: Money, pmi_rate_percent: Rate) -> Money {
    if home_value <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let ltv = loan_amount / home_value;
    if ltv > PMI_LTV_THRESHOLD {
        (loan_amount * pmi_rate_percent / dec!(100)).max(Decimal::ZERO)
    } else {
        Decimal::ZERO
    }
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Full mortgage analysis: payment breakdown with escrow, the amortization
/// schedule under the caller's extra-payment/bi-weekly configuration, and
/// interest/time savings versus the zero-extra monthly baseline.
pub fn analyze_mortgage(input: &MortgageInput) -> PlanwiseResult<ComputationOutput<MortgageOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate(input)?;

    let monthly_rate = periodic_rate(input.annual_rate_percent);
    let term_months = input.term_years * MONTHS_PER_YEAR;
    let base_payment = monthly_payment(input.loan_amount, monthly_rate, term_months)?;

    // --- Escrow-inclusive breakdown ---
    let pmi_rate = input.pmi_rate_percent.unwrap_or(DEFAULT_PMI_RATE_PERCENT);
    let pmi_annual = annual_pmi(input.loan_amount, input.home_price, pmi_rate);
    if pmi_annual > Decimal::ZERO {
        warnings.push(
            "Loan-to-value exceeds 80%; PMI applies until the balance amortizes below the threshold"
                .into(),
        );
    }

    let twelve = Decimal::from(MONTHS_PER_YEAR);
    let tax_monthly = input.property_tax_annual / twelve;
    let insurance_monthly = input.insurance_annual / twelve;
    let pmi_monthly = pmi_annual / twelve;
    let hoa_monthly = input.hoa_annual / twelve;
    let ltv_percent = if input.home_price > Decimal::ZERO {
        round_cents(input.loan_amount / input.home_price * dec!(100))
    } else {
        Decimal::ZERO
    };

    let breakdown = PaymentBreakdown {
        principal_and_interest: round_cents(base_payment),
        property_tax: round_cents(tax_monthly),
        insurance: round_cents(insurance_monthly),
        pmi: round_cents(pmi_monthly),
        hoa: round_cents(hoa_monthly),
        total: round_cents(base_payment + tax_monthly + insurance_monthly + pmi_monthly + hoa_monthly),
        ltv_percent,
    };

    // --- Caller-configured schedule ---
    let plan = if input.biweekly {
        SchedulePlan {
            periodic_rate: monthly_rate / dec!(2),
            payment: base_payment / dec!(2),
            extra_payment: input.extra_payment,
            iteration_cap: term_months * 2,
            payments_per_year: MONTHS_PER_YEAR * 2,
        }
    } else {
        SchedulePlan {
            periodic_rate: monthly_rate,
            payment: base_payment,
            extra_payment: input.extra_payment,
            iteration_cap: term_months,
            payments_per_year: MONTHS_PER_YEAR,
        }
    };
    let schedule = build_schedule(input.loan_amount, &plan, input.start_year);
    let payoff = stats_of(&schedule, plan.payments_per_year);

    // --- Zero-extra monthly baseline for the savings comparison ---
    let accelerated = input.biweekly || input.extra_payment > Decimal::ZERO;
    let (baseline, savings) = if accelerated {
        let baseline_plan = SchedulePlan {
            periodic_rate: monthly_rate,
            payment: base_payment,
            extra_payment: Decimal::ZERO,
            iteration_cap: term_months,
            payments_per_year: MONTHS_PER_YEAR,
        };
        let baseline_schedule = build_schedule(input.loan_amount, &baseline_plan, input.start_year);
        let baseline = stats_of(&baseline_schedule, MONTHS_PER_YEAR);
        // Compare payoff dates in years since the cadences differ.
        let savings = PayoffSavings {
            interest_saved: round_cents(baseline.total_interest - payoff.total_interest),
            periods_saved: baseline.periods.saturating_sub(
                payoff.periods * MONTHS_PER_YEAR / plan.payments_per_year,
            ),
            years_saved: baseline.years - payoff.years,
        };
        (baseline, Some(savings))
    } else {
        (payoff.clone(), None)
    };

    let output = MortgageOutput {
        breakdown,
        schedule,
        payoff,
        baseline,
        savings,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Fixed-payment annuity amortization with escrow, PMI, and accelerated-payoff comparison",
        &serde_json::json!({
            "annual_rate_percent": input.annual_rate_percent.to_string(),
            "term_years": input.term_years,
            "biweekly": input.biweekly,
            "extra_payment": input.extra_payment.to_string(),
            "pmi_rate_percent": pmi_rate.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Schedule loop
// ---------------------------------------------------------------------------

struct SchedulePlan {
    periodic_rate: Rate,
    payment: Money,
    extra_payment: Money,
    iteration_cap: u32,
    payments_per_year: u32,
}

/// Run the payment loop until the balance is within one cent of zero or the
/// safety cap is reached. The running balance stays at full precision;
/// entries are rounded as they are emitted.
fn build_schedule(principal: Money, plan: &SchedulePlan, start_year: i32) -> Vec<AmortizationEntry> {
    let mut entries = Vec::with_capacity(plan.iteration_cap as usize);
    let mut balance = principal;
    let mut cumulative_interest = Decimal::ZERO;
    let mut number: u32 = 0;

    while balance > PAYOFF_EPSILON && number < plan.iteration_cap {
        number += 1;

        let interest = balance * plan.periodic_rate;
        cumulative_interest += interest;

        // Extra principal never overpays the remaining balance.
        let principal_portion = (plan.payment - interest + plan.extra_payment)
            .max(Decimal::ZERO)
            .min(balance);
        balance -= principal_portion;

        entries.push(AmortizationEntry {
            number,
            year: start_year + ((number - 1) / plan.payments_per_year) as i32,
            payment: round_cents(interest + principal_portion),
            principal: round_cents(principal_portion),
            interest: round_cents(interest),
            cumulative_interest: round_cents(cumulative_interest),
            remaining_balance: round_cents(balance.max(Decimal::ZERO)),
            year_end: number % plan.payments_per_year == 0,
        });
    }

    entries
}

fn stats_of(entries: &[AmortizationEntry], payments_per_year: u32) -> PayoffStats {
    let periods = entries.len() as u32;
    let total_interest = entries
        .last()
        .map(|e| e.cumulative_interest)
        .unwrap_or_default();
    PayoffStats {
        periods,
        years: round_cents(Decimal::from(periods) / Decimal::from(payments_per_year)),
        total_interest,
    }
}

fn validate(input: &MortgageInput) -> PlanwiseResult<()> {
    if input.loan_amount <= Decimal::ZERO {
        return Err(PlanwiseError::InvalidInput {
            field: "loan_amount".into(),
            reason: "loan amount must be > 0".into(),
        });
    }
    if input.term_years == 0 || input.term_years > 50 {
        return Err(PlanwiseError::InvalidInput {
            field: "term_years".into(),
            reason: "term must be between 1 and 50 years".into(),
        });
    }
    if input.annual_rate_percent < Decimal::ZERO {
        return Err(PlanwiseError::InvalidInput {
            field: "annual_rate_percent".into(),
            reason: "rate must be >= 0 percent".into(),
        });
    }
    if input.extra_payment < Decimal::ZERO {
        return Err(PlanwiseError::InvalidInput {
            field: "extra_payment".into(),
            reason: "extra payment must be >= 0".into(),
        });
    }
    if input.home_price < Decimal::ZERO {
        return Err(PlanwiseError::InvalidInput {
            field: "home_price".into(),
            reason: "home price must be >= 0".into(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
