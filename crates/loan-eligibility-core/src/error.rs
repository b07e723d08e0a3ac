use thiserror::Error;

#[derive(Debug, Error)]
pub enum EligibilityError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Rate table unavailable: {0}")]
    ConfigurationMissing(String),

    #[error("Numeric overflow in {context}")]
    NumericOverflow { context: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },
}

impl EligibilityError {
    pub(crate) fn overflow(context: impl Into<String>) -> Self {
        EligibilityError::NumericOverflow {
            context: context.into(),
        }
    }
}
