use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{flatten, format_cell};

/// Format output as a table using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result_table(result, map);
            } else {
                print_field_table(value);
            }
        }
        Value::Array(arr) => print_array_table(arr),
        _ => println!("{}", value),
    }
}

fn print_result_table(result: &Value, envelope: &Map<String, Value>) {
    match result {
        Value::Array(rows) => print_array_table(rows),
        Value::Object(_) => print_field_table(result),
        other => println!("{}", format_cell(other)),
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

/// Two-column field/value table over the flattened object.
fn print_field_table(value: &Value) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in flatten(value) {
        builder.push_record([key, format_cell(&val)]);
    }
    println!("{}", Table::from(builder));
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(first @ Value::Object(_)) = arr.first() {
        let headers: Vec<String> = flatten(first).keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(headers.clone());

        for item in arr {
            let flat = flatten(item);
            let row: Vec<String> = headers
                .iter()
                .map(|h| flat.get(h).map(format_cell).unwrap_or_default())
                .collect();
            builder.push_record(row);
        }

        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", format_cell(item));
        }
    }
}
