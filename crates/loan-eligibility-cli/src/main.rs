mod commands;
mod input;
mod output;
mod telemetry;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::eligibility::{AffordabilityArgs, EligibilityArgs};
use commands::installment::InstallmentArgs;

/// Property loan eligibility against bank lending criteria
#[derive(Parser)]
#[command(
    name = "loanelig",
    version,
    about = "Property loan eligibility against bank lending criteria",
    long_about = "Matches a property buyer against a table of banks, each with its own \
                  interest rate, DSR ceiling and NDI deduction. Computes the monthly \
                  installment per bank, the resulting debt service ratio, and an \
                  approve/decline decision, plus a bank-independent gross affordability \
                  estimate."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log filter when RUST_LOG is unset (e.g. "info", "loan_eligibility_core=debug")
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a buyer against every bank in the rate table
    Eligibility(EligibilityArgs),
    /// Estimate the maximum loan from income alone, independent of any bank
    Affordability(AffordabilityArgs),
    /// Calculate the fixed monthly installment for a loan
    Installment(InstallmentArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = telemetry::init(&cli.log_level) {
        eprintln!("{}: {}", "warning".yellow().bold(), e);
    }

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Eligibility(args) => commands::eligibility::run_eligibility(args),
        Commands::Affordability(args) => commands::eligibility::run_affordability(args),
        Commands::Installment(args) => commands::installment::run_installment(args),
        Commands::Version => {
            println!("loanelig {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
