use rust_decimal::Decimal;

use crate::mortgage::amortize::AmortizationEntry;

/// Column order of the amortization CSV contract.
pub const CSV_HEADER: [&str; 7] = [
    "Month",
    "Year",
    "Payment",
    "Principal",
    "Interest",
    "Total Interest",
    "Remaining Balance",
];

/// One CSV row per payment event. Money fields are plain decimal strings
/// with two decimals and no currency symbols; the external writer owns the
/// actual file encoding.
pub fn csv_rows(entries: &[AmortizationEntry]) -> Vec<[String; 7]> {
    entries
        .iter()
        .map(|e| {
            [
                e.number.to_string(),
                e.year.to_string(),
                money_string(e.payment),
                money_string(e.principal),
                money_string(e.interest),
                money_string(e.cumulative_interest),
                money_string(e.remaining_balance),
            ]
        })
        .collect()
}

fn money_string(value: Decimal) -> String {
    format!("{:.2}", value)
}
