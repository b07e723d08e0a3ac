use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

/// Decimals arrive as JSON strings; parse them back for display.
pub fn as_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::String(s) => Decimal::from_str(s).ok(),
        Value::Number(n) if n.is_f64() => Decimal::from_str(&n.to_string()).ok(),
        _ => None,
    }
}

/// Two decimal places with thousands separators: 2096.8080 -> "2,096.81".
pub fn format_amount(amount: Decimal) -> String {
    let s = format!("{:.2}", amount.round_dp(2));
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s.as_str()),
    };
    let (int_part, frac) = digits.split_once('.').unwrap_or((digits, "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}{grouped}.{frac}")
}

/// Human-readable cell text.
pub fn format_value(value: &Value) -> String {
    if let Some(d) = as_decimal(value) {
        return format_amount(d);
    }
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

/// Machine-readable cell text: rounded to 2 dp, no grouping.
pub fn plain_value(value: &Value) -> String {
    if let Some(d) = as_decimal(value) {
        return d.round_dp(2).to_string();
    }
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
