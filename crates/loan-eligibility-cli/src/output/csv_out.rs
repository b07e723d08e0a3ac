use serde_json::Value;
use std::io;

use super::bank_results;
use super::format::plain_value;

/// Write output as CSV to stdout. Eligibility runs produce one row per bank.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    if let Some(results) = bank_results(value) {
        write_rows(&mut wtr, results);
    } else {
        let fields = value.get("result").unwrap_or(value);
        if let Value::Object(map) = fields {
            let _ = wtr.write_record(["field", "value"]);
            for (key, val) in map {
                let _ = wtr.write_record([key.as_str(), &plain_value(val)]);
            }
        } else {
            let _ = wtr.write_record([&plain_value(fields)]);
        }
    }

    let _ = wtr.flush();
}

fn write_rows<W: io::Write>(wtr: &mut csv::Writer<W>, rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        return;
    };

    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    let _ = wtr.write_record(&headers);

    for item in rows {
        let row: Vec<String> = headers
            .iter()
            .map(|h| item.get(*h).map(plain_value).unwrap_or_default())
            .collect();
        let _ = wtr.write_record(&row);
    }
}
