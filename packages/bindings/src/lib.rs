use napi::Result as NapiResult;
use napi_derive::napi;

use loan_eligibility_core::amortization;
use loan_eligibility_core::eligibility::{affordability, assessment};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Eligibility
// ---------------------------------------------------------------------------

/// Full per-bank assessment. The rate table travels inside the input as `banks`.
#[napi]
pub fn assess_eligibility(input_json: String) -> NapiResult<String> {
    let input: assessment::EligibilityInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = assessment::assess_eligibility(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn gross_affordability(input_json: String) -> NapiResult<String> {
    let input: affordability::AffordabilityInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        affordability::calculate_gross_affordability(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Amortisation
// ---------------------------------------------------------------------------

/// Bare installment as a decimal string, for callers that only need the figure.
#[napi]
pub fn monthly_installment(input_json: String) -> NapiResult<String> {
    let input: amortization::InstallmentInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let installment =
        amortization::monthly_installment(input.principal, input.annual_rate_pct, input.years)
            .map_err(to_napi_error)?;
    Ok(installment.to_string())
}

#[napi]
pub fn calculate_installment(input_json: String) -> NapiResult<String> {
    let input: amortization::InstallmentInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = amortization::calculate_installment(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
