pub mod affordability;
pub mod assessment;
pub mod evaluator;
pub mod profile;
pub mod rates;

pub use affordability::estimate_gross_affordability;
pub use assessment::assess_eligibility;
pub use evaluator::{evaluate, EligibilityResult, EligibilityStatus};
pub use profile::BuyerProfile;
pub use rates::{BankRateRecord, BankRateRow};
