use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::EligibilityError;
use crate::types::*;
use crate::LoanResult;

pub const MIN_MARGIN_PCT: Percent = dec!(70);
pub const MAX_MARGIN_PCT: Percent = dec!(100);
pub const MIN_TENURE_YEARS: u32 = 5;
pub const MAX_TENURE_YEARS: u32 = 35;

/// A buyer's financial position and the loan they are asking for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuyerProfile {
    pub property_price: Money,
    /// Share of the property price financed, 70–100.
    pub financing_margin_pct: Percent,
    pub tenure_years: u32,
    pub monthly_income: Money,
    /// Existing monthly debt obligations.
    pub monthly_commitment: Money,
}

impl BuyerProfile {
    pub fn loan_amount(&self) -> Money {
        self.property_price * percent_to_rate(self.financing_margin_pct)
    }

    pub fn tenure_months(&self) -> u32 {
        self.tenure_years * 12
    }

    /// Income left after existing commitments. Not clamped; may be negative.
    pub fn available_income(&self) -> Money {
        self.monthly_income - self.monthly_commitment
    }

    pub fn validate(&self) -> LoanResult<()> {
        if self.property_price <= Decimal::ZERO {
            return Err(EligibilityError::InvalidInput {
                field: "property_price".into(),
                reason: "Property price must be positive".into(),
            });
        }
        if self.financing_margin_pct < MIN_MARGIN_PCT || self.financing_margin_pct > MAX_MARGIN_PCT
        {
            return Err(EligibilityError::InvalidInput {
                field: "financing_margin_pct".into(),
                reason: format!(
                    "Margin of financing must be between {MIN_MARGIN_PCT}% and {MAX_MARGIN_PCT}%, got {}%",
                    self.financing_margin_pct
                ),
            });
        }
        if !(MIN_TENURE_YEARS..=MAX_TENURE_YEARS).contains(&self.tenure_years) {
            return Err(EligibilityError::InvalidInput {
                field: "tenure_years".into(),
                reason: format!(
                    "Tenure must be between {MIN_TENURE_YEARS} and {MAX_TENURE_YEARS} years, got {}",
                    self.tenure_years
                ),
            });
        }
        if self.monthly_income <= Decimal::ZERO {
            return Err(EligibilityError::InvalidInput {
                field: "monthly_income".into(),
                reason: "Monthly income must be positive".into(),
            });
        }
        if self.monthly_commitment < Decimal::ZERO {
            return Err(EligibilityError::InvalidInput {
                field: "monthly_commitment".into(),
                reason: "Monthly commitment cannot be negative".into(),
            });
        }
        Ok(())
    }
}
