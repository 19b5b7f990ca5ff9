use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::PlanwiseError;
use crate::rates::round_cents;
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::PlanwiseResult;

/// Conventional front-end (housing) debt-to-income ceiling.
pub const DEFAULT_HOUSING_RATIO: Decimal = dec!(0.28);

/// Conventional back-end (total) debt-to-income ceiling.
pub const DEFAULT_TOTAL_RATIO: Decimal = dec!(0.36);

/// DTI classification bands. Thresholds are inclusive: a total DTI of
/// exactly 28% is Excellent, exactly 36% is Good, exactly 43% is Fair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DtiBand {
    Excellent,
    Good,
    Fair,
    Poor,
}

/// Classify a total debt-to-income percentage.
pub fn classify_dti(total_dti_percent: Rate) -> DtiBand {
    if total_dti_percent <= dec!(28) {
        DtiBand::Excellent
    } else if total_dti_percent <= dec!(36) {
        DtiBand::Good
    } else if total_dti_percent <= dec!(43) {
        DtiBand::Fair
    } else {
        DtiBand::Poor
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffordabilityInput {
    pub monthly_gross_income: Money,
    /// Existing non-housing monthly debt obligations.
    #[serde(default)]
    pub existing_monthly_debts: Money,
    /// The proposed total housing payment being evaluated.
    pub proposed_payment: Money,
    /// Overrides `DEFAULT_HOUSING_RATIO` (as a fraction, 0.28 = 28%).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub housing_ratio: Option<Decimal>,
    /// Overrides `DEFAULT_TOTAL_RATIO`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_ratio: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffordabilityOutput {
    /// `min(income × housing_ratio, income × total_ratio − existing debts)`,
    /// floored at zero.
    pub max_affordable_payment: Money,
    /// Proposed payment over gross income.
    pub housing_dti_percent: Rate,
    /// Proposed payment plus existing debts, over gross income.
    pub total_dti_percent: Rate,
    pub band: DtiBand,
    pub within_budget: bool,
}

/// Evaluate a proposed housing payment against the caller's income, existing
/// obligations, and DTI ceilings.
pub fn assess_affordability(
    input: &AffordabilityInput,
) -> PlanwiseResult<ComputationOutput<AffordabilityOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.monthly_gross_income <= Decimal::ZERO {
        return Err(PlanwiseError::InvalidInput {
            field: "monthly_gross_income".into(),
            reason: "monthly gross income must be > 0".into(),
        });
    }
    if input.proposed_payment < Decimal::ZERO || input.existing_monthly_debts < Decimal::ZERO {
        return Err(PlanwiseError::InvalidInput {
            field: "proposed_payment".into(),
            reason: "payments and debts must be >= 0".into(),
        });
    }

    let housing_ratio = input.housing_ratio.unwrap_or(DEFAULT_HOUSING_RATIO);
    let total_ratio = input.total_ratio.unwrap_or(DEFAULT_TOTAL_RATIO);

    let housing_cap = input.monthly_gross_income * housing_ratio;
    let total_cap = input.monthly_gross_income * total_ratio - input.existing_monthly_debts;
    let max_affordable_payment = housing_cap.min(total_cap).max(Decimal::ZERO);

    if total_cap <= Decimal::ZERO {
        warnings.push(
            "Existing debts already consume the total debt-to-income ceiling".into(),
        );
    }

    let percent = dec!(100);
    let housing_dti_percent =
        round_cents(input.proposed_payment / input.monthly_gross_income * percent);
    let total_dti_percent = round_cents(
        (input.proposed_payment + input.existing_monthly_debts) / input.monthly_gross_income
            * percent,
    );
    let band = classify_dti(total_dti_percent);

    let output = AffordabilityOutput {
        max_affordable_payment: round_cents(max_affordable_payment),
        housing_dti_percent,
        total_dti_percent,
        band,
        within_budget: input.proposed_payment <= max_affordable_payment,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Housing affordability via front-end/back-end DTI ceilings",
        &serde_json::json!({
            "housing_ratio": housing_ratio.to_string(),
            "total_ratio": total_ratio.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn input(payment: Decimal) -> AffordabilityInput {
        AffordabilityInput {
            monthly_gross_income: dec!(10_000),
            existing_monthly_debts: dec!(500),
            proposed_payment: payment,
            housing_ratio: None,
            total_ratio: None,
        }
    }

    #[test]
    fn test_max_affordable_payment() {
        let result = assess_affordability(&input(dec!(2_000))).unwrap();
        // min(10,000 * 0.28, 10,000 * 0.36 - 500) = min(2,800, 3,100).
        assert_eq!(result.result.max_affordable_payment, dec!(2800.00));
    }

    #[test]
    fn test_total_ceiling_binds_with_heavy_debts() {
        let mut i = input(dec!(2_000));
        i.existing_monthly_debts = dec!(1_500);
        let result = assess_affordability(&i).unwrap();
        // min(2,800, 3,600 - 1,500) = 2,100.
        assert_eq!(result.result.max_affordable_payment, dec!(2100.00));
    }

    #[test]
    fn test_max_affordable_floors_at_zero() {
        let mut i = input(dec!(1_000));
        i.existing_monthly_debts = dec!(5_000);
        let result = assess_affordability(&i).unwrap();
        assert_eq!(result.result.max_affordable_payment, Decimal::ZERO);
        assert!(!result.warnings.is_empty());
    }

    #[test]
    fn test_band_boundaries_are_inclusive() {
        // No existing debts so total DTI equals the payment ratio exactly.
        let mut i = input(Decimal::ZERO);
        i.existing_monthly_debts = Decimal::ZERO;

        i.proposed_payment = dec!(2_800); // 28.00%
        assert_eq!(
            assess_affordability(&i).unwrap().result.band,
            DtiBand::Excellent
        );

        i.proposed_payment = dec!(3_600); // 36.00%
        assert_eq!(assess_affordability(&i).unwrap().result.band, DtiBand::Good);

        i.proposed_payment = dec!(4_300); // 43.00%
        assert_eq!(assess_affordability(&i).unwrap().result.band, DtiBand::Fair);

        i.proposed_payment = dec!(4_301); // 43.01%
        assert_eq!(assess_affordability(&i).unwrap().result.band, DtiBand::Poor);
    }

    #[test]
    fn test_existing_debts_count_toward_total_dti() {
        let result = assess_affordability(&input(dec!(2_500))).unwrap();
        assert_eq!(result.result.housing_dti_percent, dec!(25.00));
        assert_eq!(result.result.total_dti_percent, dec!(30.00));
        assert_eq!(result.result.band, DtiBand::Good);
    }

    #[test]
    fn test_within_budget_flag() {
        assert!(assess_affordability(&input(dec!(2_000))).unwrap().result.within_budget);
        assert!(!assess_affordability(&input(dec!(3_000))).unwrap().result.within_budget);
    }

    #[test]
    fn test_custom_ratios() {
        let mut i = input(dec!(2_000));
        i.housing_ratio = Some(dec!(0.31));
        i.total_ratio = Some(dec!(0.43));
        let result = assess_affordability(&i).unwrap();
        // min(3,100, 4,300 - 500) = 3,100.
        assert_eq!(result.result.max_affordable_payment, dec!(3100.00));
    }

    #[test]
    fn test_zero_income_rejected() {
        let mut i = input(dec!(2_000));
        i.monthly_gross_income = Decimal::ZERO;
        assert!(assess_affordability(&i).is_err());
    }
}
