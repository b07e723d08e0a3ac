use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::EligibilityError;
use crate::types::*;
use crate::LoanResult;

const MONTHS_PER_YEAR: u32 = 12;

/// Monthly periodic rate for a nominal annual percentage (3.8 -> 0.0031666...).
pub fn monthly_rate(annual_rate_pct: Percent) -> Rate {
    percent_to_rate(annual_rate_pct) / Decimal::from(MONTHS_PER_YEAR)
}

/// Fixed monthly installment that fully amortises `principal` over `years`.
///
/// Returns the unrounded amount; rounding for display belongs to the caller.
pub fn monthly_installment(
    principal: Money,
    annual_rate_pct: Percent,
    years: u32,
) -> LoanResult<Money> {
    if principal < Decimal::ZERO {
        return Err(EligibilityError::InvalidInput {
            field: "principal".into(),
            reason: "Principal cannot be negative".into(),
        });
    }
    if years == 0 {
        return Err(EligibilityError::InvalidInput {
            field: "years".into(),
            reason: "Tenure must be at least 1 year".into(),
        });
    }
    if annual_rate_pct < Decimal::ZERO {
        return Err(EligibilityError::InvalidInput {
            field: "annual_rate_pct".into(),
            reason: "Interest rate cannot be negative".into(),
        });
    }

    let r = monthly_rate(annual_rate_pct);
    let n = years
        .checked_mul(MONTHS_PER_YEAR)
        .ok_or_else(|| EligibilityError::InvalidInput {
            field: "years".into(),
            reason: format!("Tenure of {years} years is out of range"),
        })?;

    if r.is_zero() {
        return Ok(principal / Decimal::from(n));
    }

    let factor = compound_factor(r, n)?;
    let denom = factor - Decimal::ONE;
    if denom.is_zero() {
        return Err(EligibilityError::DivisionByZero {
            context: "installment annuity factor".into(),
        });
    }

    // factor / (factor - 1) stays close to 1 even when factor nears Decimal::MAX.
    factor
        .checked_div(denom)
        .and_then(|ratio| ratio.checked_mul(r))
        .and_then(|per_unit| per_unit.checked_mul(principal))
        .ok_or_else(|| EligibilityError::overflow("monthly installment"))
}

/// Inverse of the annuity formula: the principal a given monthly installment
/// can service at `monthly_rate` over `months` periods.
///
/// Negative installments are not rejected and produce a negative principal.
pub fn max_principal(installment: Money, monthly_rate: Rate, months: u32) -> LoanResult<Money> {
    if months == 0 {
        return Err(EligibilityError::InvalidInput {
            field: "months".into(),
            reason: "Number of periods must be > 0".into(),
        });
    }
    if monthly_rate < Decimal::ZERO {
        return Err(EligibilityError::InvalidInput {
            field: "monthly_rate".into(),
            reason: "Assumed rate cannot be negative".into(),
        });
    }

    if monthly_rate.is_zero() {
        return Ok(installment * Decimal::from(months));
    }

    let factor = compound_factor(monthly_rate, months)?;

    // ((1+r)^n - 1) / (r * (1+r)^n) == (1 - 1/(1+r)^n) / r
    let discount = Decimal::ONE
        .checked_div(factor)
        .ok_or_else(|| EligibilityError::overflow("inverse annuity discount"))?;
    let annuity = (Decimal::ONE - discount)
        .checked_div(monthly_rate)
        .ok_or_else(|| EligibilityError::overflow("inverse annuity factor"))?;

    installment
        .checked_mul(annuity)
        .ok_or_else(|| EligibilityError::overflow("maximum principal"))
}

/// (1 + r)^n
fn compound_factor(r: Rate, n: u32) -> LoanResult<Decimal> {
    (Decimal::ONE + r)
        .checked_powu(u64::from(n))
        .ok_or_else(|| EligibilityError::overflow(format!("(1 + {r})^{n}")))
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallmentInput {
    pub principal: Money,
    pub annual_rate_pct: Percent,
    pub years: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallmentOutput {
    pub installment: Money,
    pub months: u32,
    /// Installment multiplied by the number of payments.
    pub total_repayment: Money,
    pub total_interest: Money,
}

/// Monthly installment plus lifetime repayment totals.
pub fn calculate_installment(
    input: &InstallmentInput,
) -> LoanResult<ComputationOutput<InstallmentOutput>> {
    let start = Instant::now();

    let installment = monthly_installment(input.principal, input.annual_rate_pct, input.years)?;
    // Cannot overflow: monthly_installment already checked it.
    let months = input.years * MONTHS_PER_YEAR;
    let total_repayment = installment
        .checked_mul(Decimal::from(months))
        .ok_or_else(|| EligibilityError::overflow("total repayment"))?;

    let output = InstallmentOutput {
        installment,
        months,
        total_repayment,
        total_interest: total_repayment - input.principal,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "compounding": "monthly",
        "monthly_rate": monthly_rate(input.annual_rate_pct).to_string(),
    });

    Ok(with_metadata(
        "Fixed-payment annuity (fully amortising)",
        &assumptions,
        Vec::new(),
        elapsed,
        output,
    ))
}
