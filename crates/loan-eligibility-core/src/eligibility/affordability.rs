use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::warn;

use super::profile::BuyerProfile;
use crate::amortization::{max_principal, monthly_rate};
use crate::error::EligibilityError;
use crate::types::*;
use crate::LoanResult;

/// Share of post-commitment income assumed available for a new installment.
pub const DEFAULT_FLAT_DSR_FRACTION: Rate = dec!(0.70);

/// Nominal annual rate used when no bank is specified.
pub const DEFAULT_ASSUMED_ANNUAL_RATE_PCT: Percent = dec!(3.2);

pub const NEGATIVE_AFFORDABILITY_WARNING: &str =
    "Monthly commitments exceed income; gross affordability is negative";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffordabilityInput {
    pub profile: BuyerProfile,
    /// Defaults to 0.70.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flat_dsr_fraction: Option<Rate>,
    /// Defaults to 3.2.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assumed_annual_rate_pct: Option<Percent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffordabilityOutput {
    pub available_income: Money,
    pub max_monthly_installment: Money,
    pub max_loan: Money,
}

/// Rough maximum loan from income left after existing commitments, at a
/// single assumed rate. Informational only; it never gates a bank decision.
///
/// A negative available income is passed through and yields a negative
/// estimate.
pub fn estimate_gross_affordability(
    profile: &BuyerProfile,
    flat_dsr_fraction: Rate,
    assumed_monthly_rate: Rate,
) -> LoanResult<Money> {
    profile.validate()?;
    Ok(affordability_breakdown(profile, flat_dsr_fraction, assumed_monthly_rate)?.max_loan)
}

/// The profile must already be validated.
pub(crate) fn affordability_breakdown(
    profile: &BuyerProfile,
    flat_dsr_fraction: Rate,
    assumed_monthly_rate: Rate,
) -> LoanResult<AffordabilityOutput> {
    if flat_dsr_fraction < Decimal::ZERO || flat_dsr_fraction > Decimal::ONE {
        return Err(EligibilityError::InvalidInput {
            field: "flat_dsr_fraction".into(),
            reason: "Flat DSR fraction must be between 0 and 1".into(),
        });
    }

    let available_income = profile.available_income();
    let max_monthly_installment = available_income * flat_dsr_fraction;
    let max_loan = max_principal(
        max_monthly_installment,
        assumed_monthly_rate,
        profile.tenure_months(),
    )?;

    if available_income < Decimal::ZERO {
        warn!(%available_income, %max_loan, "negative gross affordability");
    }

    Ok(AffordabilityOutput {
        available_income,
        max_monthly_installment,
        max_loan,
    })
}

/// Resolve the optional knobs to the rate and fraction actually used.
pub(crate) fn resolve_assumptions(
    flat_dsr_fraction: Option<Rate>,
    assumed_annual_rate_pct: Option<Percent>,
) -> (Rate, Percent) {
    (
        flat_dsr_fraction.unwrap_or(DEFAULT_FLAT_DSR_FRACTION),
        assumed_annual_rate_pct.unwrap_or(DEFAULT_ASSUMED_ANNUAL_RATE_PCT),
    )
}

/// Gross affordability with its intermediate figures.
pub fn calculate_gross_affordability(
    input: &AffordabilityInput,
) -> LoanResult<ComputationOutput<AffordabilityOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    input.profile.validate()?;
    let (fraction, annual_pct) =
        resolve_assumptions(input.flat_dsr_fraction, input.assumed_annual_rate_pct);
    let output = affordability_breakdown(&input.profile, fraction, monthly_rate(annual_pct))?;

    if output.available_income < Decimal::ZERO {
        warnings.push(NEGATIVE_AFFORDABILITY_WARNING.into());
    }

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "flat_dsr_fraction": fraction.to_string(),
        "assumed_annual_rate_pct": annual_pct.to_string(),
        "months": input.profile.tenure_months(),
    });

    Ok(with_metadata(
        "Gross affordability (inverse annuity on flat DSR)",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> BuyerProfile {
        BuyerProfile {
            property_price: dec!(500_000),
            financing_margin_pct: dec!(90),
            tenure_years: 30,
            monthly_income: dec!(5000),
            monthly_commitment: dec!(1500),
        }
    }

    #[test]
    fn test_default_estimate() {
        // (5000 - 1500) * 0.7 = 2450 per month at 3.2% over 360 months ≈ 566,517
        let max_loan = estimate_gross_affordability(
            &profile(),
            DEFAULT_FLAT_DSR_FRACTION,
            monthly_rate(DEFAULT_ASSUMED_ANNUAL_RATE_PCT),
        )
        .unwrap();
        assert!((max_loan - dec!(566_517.39)).abs() < dec!(0.01), "got {max_loan}");
    }

    #[test]
    fn test_zero_rate_estimate() {
        let max_loan = estimate_gross_affordability(&profile(), dec!(0.70), Decimal::ZERO).unwrap();
        assert_eq!(max_loan, dec!(2450) * dec!(360));
    }

    #[test]
    fn test_negative_available_income_passes_through() {
        let mut p = profile();
        p.monthly_commitment = dec!(6000);
        let out = calculate_gross_affordability(&AffordabilityInput {
            profile: p,
            flat_dsr_fraction: None,
            assumed_annual_rate_pct: None,
        })
        .unwrap();
        assert_eq!(out.result.available_income, dec!(-1000));
        assert_eq!(out.result.max_monthly_installment, dec!(-700));
        assert!(out.result.max_loan < Decimal::ZERO);
        assert_eq!(out.warnings, vec![NEGATIVE_AFFORDABILITY_WARNING.to_string()]);
    }

    #[test]
    fn test_fraction_out_of_range_rejected() {
        let err = estimate_gross_affordability(&profile(), dec!(1.5), Decimal::ZERO).unwrap_err();
        match err {
            EligibilityError::InvalidInput { field, .. } => assert_eq!(field, "flat_dsr_fraction"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_profile_rejected() {
        let mut p = profile();
        p.tenure_years = 40;
        let err = calculate_gross_affordability(&AffordabilityInput {
            profile: p.clone(),
            flat_dsr_fraction: None,
            assumed_annual_rate_pct: None,
        })
        .unwrap_err();
        match err {
            EligibilityError::InvalidInput { field, .. } => assert_eq!(field, "tenure_years"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
        assert!(estimate_gross_affordability(&p, dec!(0.7), Decimal::ZERO).is_err());
    }

    #[test]
    fn test_assumptions_recorded() {
        let out = calculate_gross_affordability(&AffordabilityInput {
            profile: profile(),
            flat_dsr_fraction: Some(dec!(0.6)),
            assumed_annual_rate_pct: Some(dec!(4)),
        })
        .unwrap();
        assert_eq!(out.assumptions["flat_dsr_fraction"], "0.6");
        assert_eq!(out.assumptions["assumed_annual_rate_pct"], "4");
        assert_eq!(out.assumptions["months"], 360);
        assert!(out.warnings.is_empty());
    }
}
