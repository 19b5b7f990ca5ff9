use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlanwiseError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Tax provider failure: {0}")]
    TaxProviderFailure(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for PlanwiseError {
    fn from(e: serde_json::Error) -> Self {
        PlanwiseError::SerializationError(e.to_string())
    }
}
