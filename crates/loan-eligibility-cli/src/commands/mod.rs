pub mod eligibility;
pub mod installment;
