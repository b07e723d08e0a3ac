use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;
use std::path::Path;

use loan_eligibility_core::eligibility::affordability::{self, AffordabilityInput};
use loan_eligibility_core::eligibility::assessment::{
    self, EligibilityInput, EligibilityOutput,
};
use loan_eligibility_core::eligibility::BuyerProfile;
use loan_eligibility_core::ComputationOutput;

use crate::input;
use crate::input::rate_table::{load_rate_table, RateTable};

/// Buyer details shared by the eligibility and affordability commands
#[derive(Args)]
pub struct BuyerArgs {
    /// Property price
    #[arg(long)]
    pub property_price: Option<Decimal>,

    /// Margin of financing in percent (70–100)
    #[arg(long, alias = "margin", default_value = "90")]
    pub financing_margin: Decimal,

    /// Loan tenure in years (5–35)
    #[arg(long, alias = "tenure", default_value_t = 30)]
    pub tenure_years: u32,

    /// Net monthly income
    #[arg(long, alias = "income")]
    pub monthly_income: Option<Decimal>,

    /// Existing monthly commitments
    #[arg(long, alias = "commitment", default_value = "0")]
    pub monthly_commitment: Decimal,

    /// Share of post-commitment income available for a new installment (default 0.70)
    #[arg(long)]
    pub flat_dsr: Option<Decimal>,

    /// Annual rate in percent assumed for the gross estimate (default 3.2)
    #[arg(long)]
    pub assumed_rate: Option<Decimal>,
}

impl BuyerArgs {
    fn profile(&self) -> Result<BuyerProfile, Box<dyn std::error::Error>> {
        Ok(BuyerProfile {
            property_price: self
                .property_price
                .ok_or("--property-price is required (or provide --input)")?,
            financing_margin_pct: self.financing_margin,
            tenure_years: self.tenure_years,
            monthly_income: self
                .monthly_income
                .ok_or("--monthly-income is required (or provide --input)")?,
            monthly_commitment: self.monthly_commitment,
        })
    }
}

/// Arguments for per-bank eligibility
#[derive(Args)]
pub struct EligibilityArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Rate table (CSV or JSON); used when the input carries no banks
    #[arg(long, env = "LOAN_RATES_PATH", default_value = "bank_rates.csv")]
    pub rates: String,

    #[command(flatten)]
    pub buyer: BuyerArgs,
}

/// Arguments for the bank-independent gross affordability estimate
#[derive(Args)]
pub struct AffordabilityArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    #[command(flatten)]
    pub buyer: BuyerArgs,
}

pub fn run_eligibility(args: EligibilityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let eligibility_input: EligibilityInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin::<EligibilityInput>()? {
        data
    } else {
        EligibilityInput {
            profile: args.buyer.profile()?,
            banks: Vec::new(),
            flat_dsr_fraction: args.buyer.flat_dsr,
            assumed_annual_rate_pct: args.buyer.assumed_rate,
        }
    };

    let output = if eligibility_input.banks.is_empty() {
        let table = load_rate_table(Path::new(&args.rates));
        assess_with_rate_table(eligibility_input, table)?
    } else {
        assessment::assess_eligibility(&eligibility_input)?
    };
    Ok(serde_json::to_value(output)?)
}

/// Assess against a loaded rate table. A loader failure is reported ahead
/// of the assessment's own warnings.
fn assess_with_rate_table(
    mut eligibility_input: EligibilityInput,
    table: RateTable,
) -> Result<ComputationOutput<EligibilityOutput>, Box<dyn std::error::Error>> {
    eligibility_input.banks = table.rows;
    let mut output = assessment::assess_eligibility(&eligibility_input)?;
    if let Some(warning) = table.warning {
        output.warnings.insert(0, warning);
    }
    Ok(output)
}

pub fn run_affordability(args: AffordabilityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let affordability_input: AffordabilityInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin::<AffordabilityInput>()? {
        data
    } else {
        AffordabilityInput {
            profile: args.buyer.profile()?,
            flat_dsr_fraction: args.buyer.flat_dsr,
            assumed_annual_rate_pct: args.buyer.assumed_rate,
        }
    };

    let output = affordability::calculate_gross_affordability(&affordability_input)?;
    Ok(serde_json::to_value(output)?)
}
