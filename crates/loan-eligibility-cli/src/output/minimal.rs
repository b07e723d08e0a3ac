use serde_json::Value;

use super::bank_results;
use super::format::format_value;

/// Print just the headline figure.
///
/// Eligibility runs print one `bank: STATUS` line per bank; other commands
/// print the first well-known result field present.
pub fn print_minimal(value: &Value) {
    if let Some(results) = bank_results(value) {
        if results.is_empty() {
            println!("no banks evaluated");
        }
        for item in results {
            println!(
                "{}: {}",
                format_value(&item["bank_name"]),
                format_value(&item["status"])
            );
        }
        return;
    }

    let result_obj = value.get("result").unwrap_or(value);
    let priority_keys = ["installment", "max_loan"];

    if let Value::Object(map) = result_obj {
        for key in &priority_keys {
            if let Some(val) = map.get(*key).filter(|v| !v.is_null()) {
                println!("{}", format_value(val));
                return;
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_value(val));
            return;
        }
    }

    println!("{}", format_value(result_obj));
}
