use serde_json::Value;

use super::{flatten, format_cell};

/// Headline figure of each command, most specific first.
const PRIORITY_KEYS: [&str; 7] = [
    "token",
    "break_even_volume",
    "deltas.total_payout",
    "company_margin",
    "total_payout",
    "override_total",
    "id",
];

/// Print just the key answer from the output.
///
/// Looks for a known headline field (skipping nulls), then falls back to the
/// first field. Array results print one compact row per line.
pub fn print_minimal(value: &Value) {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result {
        Value::Object(_) => println!("{}", headline(result)),
        Value::Array(rows) => {
            for row in rows {
                println!("{}", serde_json::to_string(row).unwrap_or_default());
            }
        }
        other => println!("{}", format_cell(other)),
    }
}

fn headline(result: &Value) -> String {
    let flat = flatten(result);
    for key in PRIORITY_KEYS {
        if let Some(val) = flat.get(key) {
            if !val.is_null() {
                return format_cell(val);
            }
        }
    }
    match flat.iter().next() {
        Some((key, val)) => format!("{}: {}", key, format_cell(val)),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_headline_skips_null_break_even() {
        let result = json!({
            "break_even_volume": null,
            "deltas": {"total_payout": "64560"},
        });
        assert_eq!(headline(&result), "64560");
    }

    #[test]
    fn test_headline_prefers_margin_on_dashboards() {
        let result = json!({"total_revenue": "2226000", "company_margin": "892200", "total_payout": "1333800"});
        assert_eq!(headline(&result), "892200");
    }
}
