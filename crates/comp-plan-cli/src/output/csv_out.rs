use serde_json::Value;
use std::io;

use super::{flatten, format_cell};

/// Write output as CSV to stdout.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Array(rows)) => write_array_csv(&mut wtr, rows),
            Some(result @ Value::Object(_)) => write_field_csv(&mut wtr, result),
            _ => write_field_csv(&mut wtr, value),
        },
        Value::Array(arr) => write_array_csv(&mut wtr, arr),
        _ => {
            let _ = wtr.write_record([&format_cell(value)]);
        }
    }

    let _ = wtr.flush();
}

fn write_field_csv(wtr: &mut csv::Writer<io::StdoutLock<'_>>, value: &Value) {
    let _ = wtr.write_record(["field", "value"]);
    for (key, val) in flatten(value) {
        let _ = wtr.write_record([key.as_str(), &format_cell(&val)]);
    }
}

fn write_array_csv(wtr: &mut csv::Writer<io::StdoutLock<'_>>, arr: &[Value]) {
    if arr.is_empty() {
        return;
    }

    if let Some(first @ Value::Object(_)) = arr.first() {
        let headers: Vec<String> = flatten(first).keys().cloned().collect();
        let _ = wtr.write_record(&headers);

        for item in arr {
            let flat = flatten(item);
            let row: Vec<String> = headers
                .iter()
                .map(|h| flat.get(h).map(format_cell).unwrap_or_default())
                .collect();
            let _ = wtr.write_record(&row);
        }
    } else {
        for item in arr {
            let _ = wtr.write_record([&format_cell(item)]);
        }
    }
}
