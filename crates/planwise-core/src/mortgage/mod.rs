pub mod affordability;
pub mod amortize;
pub mod export;

pub use affordability::{assess_affordability, AffordabilityInput, DtiBand};
pub use amortize::{analyze_mortgage, AmortizationEntry, MortgageInput, MortgageOutput};
