use loan_eligibility_core::amortization::{self, monthly_installment};
use loan_eligibility_core::EligibilityError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Installment properties
// ===========================================================================

const PRINCIPALS: [Decimal; 4] = [dec!(0), dec!(50_000), dec!(450_000), dec!(1_250_000)];
const RATES: [Decimal; 5] = [dec!(0), dec!(0.5), dec!(3.2), dec!(4.75), dec!(12)];
const TENURES: [u32; 4] = [5, 10, 30, 35];

#[test]
fn test_zero_rate_matches_straight_line_exactly() {
    for principal in PRINCIPALS {
        for years in TENURES {
            let result = monthly_installment(principal, Decimal::ZERO, years).unwrap();
            assert_eq!(result, principal / Decimal::from(years * 12));
        }
    }
}

#[test]
fn test_interest_exceeds_straight_line() {
    for principal in PRINCIPALS.iter().filter(|p| !p.is_zero()) {
        for rate in RATES.iter().filter(|r| !r.is_zero()) {
            for years in TENURES {
                let with_interest = monthly_installment(*principal, *rate, years).unwrap();
                let straight = *principal / Decimal::from(years * 12);
                assert!(
                    with_interest > straight,
                    "{principal} at {rate}% over {years}y: {with_interest} <= {straight}"
                );
            }
        }
    }
}

#[test]
fn test_monotonic_in_rate() {
    for principal in PRINCIPALS {
        for years in TENURES {
            let installments: Vec<Decimal> = RATES
                .iter()
                .map(|r| monthly_installment(principal, *r, years).unwrap())
                .collect();
            for pair in installments.windows(2) {
                assert!(pair[0] <= pair[1], "not monotonic in rate: {pair:?}");
            }
        }
    }
}

#[test]
fn test_monotonic_in_principal() {
    for rate in RATES {
        for years in TENURES {
            let installments: Vec<Decimal> = PRINCIPALS
                .iter()
                .map(|p| monthly_installment(*p, rate, years).unwrap())
                .collect();
            for pair in installments.windows(2) {
                assert!(pair[0] <= pair[1], "not monotonic in principal: {pair:?}");
            }
        }
    }
}

#[test]
fn test_longer_tenure_lowers_installment() {
    let short = monthly_installment(dec!(450_000), dec!(3.8), 20).unwrap();
    let long = monthly_installment(dec!(450_000), dec!(3.8), 35).unwrap();
    assert!(long < short);
}

#[test]
fn test_zero_tenure_is_an_error_not_infinity() {
    let err = monthly_installment(dec!(450_000), Decimal::ZERO, 0).unwrap_err();
    assert!(matches!(err, EligibilityError::InvalidInput { .. }));
}

#[test]
fn test_installment_envelope_interest_total() {
    let out = amortization::calculate_installment(&amortization::InstallmentInput {
        principal: dec!(450_000),
        annual_rate_pct: dec!(3.8),
        years: 30,
    })
    .unwrap();
    let r = &out.result;
    assert_eq!(r.months, 360);
    assert_eq!(r.total_repayment, r.installment * dec!(360));
    // ≈ 2096.81 * 360 - 450,000 ≈ 304,851
    assert!((r.total_interest - dec!(304_850.91)).abs() < dec!(1));
    assert!(!out.methodology.is_empty());
}
