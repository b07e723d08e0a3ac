use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::affordability::{
    affordability_breakdown, resolve_assumptions, AffordabilityOutput,
    NEGATIVE_AFFORDABILITY_WARNING,
};
use super::evaluator::{evaluate_bank, EligibilityResult};
use super::profile::BuyerProfile;
use super::rates::{resolve_rows, BankRateRow};
use crate::amortization::monthly_rate;
use crate::types::*;
use crate::LoanResult;

pub const NO_BANKS_WARNING: &str = "No banks evaluated: the rate table is empty";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EligibilityInput {
    pub profile: BuyerProfile,
    /// Rate table rows in display order.
    #[serde(default)]
    pub banks: Vec<BankRateRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flat_dsr_fraction: Option<Rate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assumed_annual_rate_pct: Option<Percent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EligibilityOutput {
    pub loan_amount: Money,
    pub gross_affordability: AffordabilityOutput,
    pub results: Vec<EligibilityResult>,
    pub approved_count: usize,
    pub declined_count: usize,
}

/// Match one buyer against every bank in the rate table.
///
/// Every bank is reported whether it approves or declines. An empty table
/// is not an error but is flagged in the warnings.
pub fn assess_eligibility(
    input: &EligibilityInput,
) -> LoanResult<ComputationOutput<EligibilityOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    input.profile.validate()?;

    let (fraction, annual_pct) =
        resolve_assumptions(input.flat_dsr_fraction, input.assumed_annual_rate_pct);
    let gross = affordability_breakdown(&input.profile, fraction, monthly_rate(annual_pct))?;
    if gross.available_income < Decimal::ZERO {
        warnings.push(NEGATIVE_AFFORDABILITY_WARNING.into());
    }

    let records = resolve_rows(input.banks.clone());
    let results = records
        .iter()
        .map(|record| evaluate_bank(&input.profile, record))
        .collect::<LoanResult<Vec<_>>>()?;
    if results.is_empty() {
        warnings.push(NO_BANKS_WARNING.into());
    }

    let approved_count = results.iter().filter(|r| r.status.is_approved()).count();
    let declined_count = results.len() - approved_count;

    let output = EligibilityOutput {
        loan_amount: input.profile.loan_amount(),
        gross_affordability: gross,
        results,
        approved_count,
        declined_count,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "flat_dsr_fraction": fraction.to_string(),
        "assumed_annual_rate_pct": annual_pct.to_string(),
        "bank_count": records.len(),
        "approval_rule": "dsr_pct <= dsr_max_pct",
    });

    Ok(with_metadata(
        "Per-bank DSR eligibility (fixed-payment annuity)",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}
