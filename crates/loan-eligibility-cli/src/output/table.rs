use colored::Colorize;
use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::bank_results;
use super::format::format_value;

const BANK_COLUMNS: [(&str, &str); 7] = [
    ("bank_name", "Bank"),
    ("annual_rate_pct", "Rate (%)"),
    ("installment", "Installment"),
    ("ndi", "NDI"),
    ("total_commitment", "Total Commitment"),
    ("dsr_pct", "DSR (%)"),
    ("dsr_max_pct", "DSR Max (%)"),
];

/// Format output as tables using the tabled crate.
pub fn print_table(value: &Value) {
    let Value::Object(envelope) = value else {
        println!("{}", value);
        return;
    };

    if let Some(results) = bank_results(value) {
        print_eligibility(&value["result"], results);
    } else if let Some(result) = envelope.get("result") {
        print_field_table(result);
    } else {
        print_field_table(value);
    }

    print_footer(envelope);
}

fn print_eligibility(result: &Value, results: &[Value]) {
    let mut summary = Builder::default();
    summary.push_record(["Field", "Value"]);
    summary.push_record(["Loan amount", &format_value(&result["loan_amount"])]);
    summary.push_record([
        "Gross affordability",
        &format_value(&result["gross_affordability"]["max_loan"]),
    ]);
    println!("{}", Table::from(summary));

    if results.is_empty() {
        println!("\n{}", "No banks evaluated.".yellow().bold());
        return;
    }

    let mut builder = Builder::default();
    let mut header = vec![String::new()];
    header.extend(BANK_COLUMNS.iter().map(|(_, title)| title.to_string()));
    header.push("Status".to_string());
    builder.push_record(header);

    for item in results {
        let approved = item["status"] == "APPROVE";
        let mut row = vec![if approved { "✅" } else { "❌" }.to_string()];
        row.extend(BANK_COLUMNS.iter().map(|(key, _)| format_value(&item[*key])));
        row.push(format_value(&item["status"]));
        builder.push_record(row);
    }
    println!("\n{}", Table::from(builder));

    let approved = result["approved_count"].as_u64().unwrap_or(0);
    let line = format!("{} of {} banks approve", approved, results.len());
    if approved > 0 {
        println!("{}", line.green().bold());
    } else {
        println!("{}", line.red().bold());
    }
}

fn print_field_table(value: &Value) {
    match value {
        Value::Object(map) => {
            let mut builder = Builder::default();
            builder.push_record(["Field", "Value"]);
            for (key, val) in map {
                builder.push_record([key.as_str(), &format_value(val)]);
            }
            println!("{}", Table::from(builder));
        }
        _ => println!("{}", format_value(value)),
    }
}

fn print_footer(envelope: &Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\n{}", "Warnings:".yellow().bold());
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}
