pub mod error;
pub mod income;
pub mod rates;
pub mod tax;
pub mod types;

#[cfg(feature = "projection")]
pub mod projection;

#[cfg(feature = "mortgage")]
pub mod mortgage;

#[cfg(feature = "scenarios")]
pub mod scenarios;

pub use error::PlanwiseError;
pub use types::*;

/// Standard result type for all planwise operations
pub type PlanwiseResult<T> = Result<T, PlanwiseError>;
