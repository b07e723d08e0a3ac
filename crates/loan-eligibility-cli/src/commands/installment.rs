use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use loan_eligibility_core::amortization::{self, InstallmentInput};

use crate::input;

/// Arguments for a single installment calculation
#[derive(Args)]
pub struct InstallmentArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan principal
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (e.g. 3.8)
    #[arg(long, alias = "rate")]
    pub annual_rate: Option<Decimal>,

    /// Tenure in years
    #[arg(long)]
    pub years: Option<u32>,
}

pub fn run_installment(args: InstallmentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let installment_input: InstallmentInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin::<InstallmentInput>()? {
        data
    } else {
        InstallmentInput {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_rate_pct: args
                .annual_rate
                .ok_or("--annual-rate is required (or provide --input)")?,
            years: args.years.ok_or("--years is required (or provide --input)")?,
        }
    };

    let output = amortization::calculate_installment(&installment_input)?;
    Ok(serde_json::to_value(output)?)
}
