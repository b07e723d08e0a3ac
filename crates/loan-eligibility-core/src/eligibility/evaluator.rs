use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use super::profile::BuyerProfile;
use super::rates::BankRateRecord;
use crate::amortization::monthly_installment;
use crate::error::EligibilityError;
use crate::types::*;
use crate::LoanResult;

/// Outcome of a single bank's DSR test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EligibilityStatus {
    Approve,
    Decline,
}

impl EligibilityStatus {
    /// A DSR exactly at the ceiling is approved.
    pub fn from_dsr(dsr_pct: Percent, dsr_max_pct: Percent) -> Self {
        if dsr_pct <= dsr_max_pct {
            EligibilityStatus::Approve
        } else {
            EligibilityStatus::Decline
        }
    }

    pub fn is_approved(self) -> bool {
        self == EligibilityStatus::Approve
    }
}

impl fmt::Display for EligibilityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EligibilityStatus::Approve => write!(f, "APPROVE"),
            EligibilityStatus::Decline => write!(f, "DECLINE"),
        }
    }
}

/// Per-bank decision. Amounts are unrounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityResult {
    pub bank_name: String,
    pub annual_rate_pct: Percent,
    pub installment: Money,
    pub ndi: Money,
    /// Existing commitment + new installment + NDI.
    pub total_commitment: Money,
    pub dsr_pct: Percent,
    pub dsr_max_pct: Percent,
    pub status: EligibilityStatus,
}

/// Run the DSR test for one bank. The profile must already be validated.
pub fn evaluate_bank(
    profile: &BuyerProfile,
    record: &BankRateRecord,
) -> LoanResult<EligibilityResult> {
    let installment = monthly_installment(
        profile.loan_amount(),
        record.annual_rate_pct,
        profile.tenure_years,
    )?;
    let total_commitment = profile
        .monthly_commitment
        .checked_add(installment)
        .and_then(|total| total.checked_add(record.ndi))
        .ok_or_else(|| {
            EligibilityError::overflow(format!("total commitment for {}", record.bank_name))
        })?;
    let dsr_pct = total_commitment
        .checked_div(profile.monthly_income)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .ok_or_else(|| EligibilityError::overflow(format!("DSR for {}", record.bank_name)))?;
    let status = EligibilityStatus::from_dsr(dsr_pct, record.dsr_max_pct);

    debug!(
        bank = %record.bank_name,
        %installment,
        %dsr_pct,
        dsr_max_pct = %record.dsr_max_pct,
        %status,
        "evaluated bank"
    );

    Ok(EligibilityResult {
        bank_name: record.bank_name.clone(),
        annual_rate_pct: record.annual_rate_pct,
        installment,
        ndi: record.ndi,
        total_commitment,
        dsr_pct,
        dsr_max_pct: record.dsr_max_pct,
        status,
    })
}

/// Evaluate every bank in the order supplied, one result per record.
///
/// An empty rate table yields an empty result list.
pub fn evaluate(
    profile: &BuyerProfile,
    bank_rates: &[BankRateRecord],
) -> LoanResult<Vec<EligibilityResult>> {
    profile.validate()?;
    bank_rates
        .iter()
        .map(|record| evaluate_bank(profile, record))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn profile() -> BuyerProfile {
        BuyerProfile {
            property_price: dec!(500_000),
            financing_margin_pct: dec!(90),
            tenure_years: 30,
            monthly_income: dec!(5000),
            monthly_commitment: dec!(1500),
        }
    }

    fn bank(name: &str, rate: Decimal, ndi: Decimal, dsr_max: Decimal) -> BankRateRecord {
        BankRateRecord {
            bank_name: name.into(),
            annual_rate_pct: rate,
            ndi,
            dsr_max_pct: dsr_max,
        }
    }

    #[test]
    fn test_reference_scenario_declines() {
        let result = evaluate_bank(&profile(), &bank("A", dec!(3.8), dec!(200), dec!(70))).unwrap();
        assert!((result.installment - dec!(2096.81)).abs() < dec!(0.01));
        assert!((result.total_commitment - dec!(3796.81)).abs() < dec!(0.01));
        assert!((result.dsr_pct - dec!(75.94)).abs() < dec!(0.01));
        assert_eq!(result.status, EligibilityStatus::Decline);
    }

    #[test]
    fn test_dsr_at_ceiling_approves() {
        // Zero rate: installment = 360_000 / 360 = 1000; total = 1500 + 1000 + 500 = 3000
        let mut p = profile();
        p.property_price = dec!(400_000);
        p.financing_margin_pct = dec!(90);
        let result = evaluate_bank(&p, &bank("Edge", Decimal::ZERO, dec!(500), dec!(60))).unwrap();
        assert_eq!(result.dsr_pct, dec!(60));
        assert_eq!(result.status, EligibilityStatus::Approve);
    }

    #[test]
    fn test_status_rule() {
        assert_eq!(
            EligibilityStatus::from_dsr(dec!(70), dec!(70)),
            EligibilityStatus::Approve
        );
        assert_eq!(
            EligibilityStatus::from_dsr(dec!(70.0001), dec!(70)),
            EligibilityStatus::Decline
        );
        assert!(EligibilityStatus::from_dsr(dec!(10), dec!(70)).is_approved());
    }

    #[test]
    fn test_status_serialises_upper_case() {
        let json = serde_json::to_string(&EligibilityStatus::Approve).unwrap();
        assert_eq!(json, "\"APPROVE\"");
        assert_eq!(EligibilityStatus::Decline.to_string(), "DECLINE");
    }

    #[test]
    fn test_empty_rates() {
        let results = evaluate(&profile(), &[]).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_invalid_profile_fails_before_banks() {
        let mut p = profile();
        p.monthly_income = Decimal::ZERO;
        let err = evaluate(&p, &[bank("A", dec!(4), dec!(0), dec!(70))]).unwrap_err();
        assert!(matches!(err, EligibilityError::InvalidInput { .. }));
    }

    #[test]
    fn test_extreme_bank_rate_declines() {
        let results =
            evaluate(&profile(), &[bank("Loan shark", dec!(200), dec!(0), dec!(70))]).unwrap();
        assert!((results[0].installment - dec!(75_000)).abs() < dec!(0.01));
        assert_eq!(results[0].status, EligibilityStatus::Decline);
    }

    #[test]
    fn test_rate_beyond_decimal_range_is_an_error() {
        let err = evaluate(&profile(), &[bank("Bad", dec!(1000), dec!(0), dec!(70))]).unwrap_err();
        assert!(matches!(err, EligibilityError::NumericOverflow { .. }));
    }

    #[test]
    fn test_tiny_income_dsr_overflow_is_an_error() {
        let mut p = profile();
        p.monthly_income = dec!(0.0000000000000000000000001);
        let err = evaluate(&p, &[bank("A", dec!(3.8), dec!(200), dec!(70))]).unwrap_err();
        match err {
            EligibilityError::NumericOverflow { context } => assert!(context.contains("DSR")),
            other => panic!("Expected NumericOverflow, got {other:?}"),
        }
    }

    #[test]
    fn test_negative_bank_rate_propagates_error() {
        let err = evaluate(&profile(), &[bank("Bad", dec!(-1), dec!(0), dec!(70))]).unwrap_err();
        match err {
            EligibilityError::InvalidInput { field, .. } => assert_eq!(field, "annual_rate_pct"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }
}
