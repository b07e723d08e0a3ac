pub mod amortization;
pub mod error;
pub mod types;

#[cfg(feature = "eligibility")]
pub mod eligibility;

pub use error::EligibilityError;
pub use types::*;

/// Standard result type for all loan-eligibility operations
pub type LoanResult<T> = Result<T, EligibilityError>;
