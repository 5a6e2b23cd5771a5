use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::format_scalar;

/// Format output as tables using the tabled crate.
///
/// Scalars of the result are gathered into one Field/Value table; nested
/// objects and lists of records (ratios, alerts, score details) each get
/// their own titled table.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result(result, map);
            } else {
                print_object("", map);
            }
        }
        Value::Array(arr) => print_array_table(arr),
        _ => println!("{value}"),
    }
}

fn print_result(result: &Value, envelope: &Map<String, Value>) {
    match result {
        Value::Object(res_map) => print_object("", res_map),
        Value::Array(arr) => print_array_table(arr),
        other => println!("{other}"),
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {w}");
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {meth}");
    }
}

fn print_object(title: &str, map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    let mut sections: Vec<(&String, &Value)> = Vec::new();
    let mut has_scalars = false;

    for (key, val) in map {
        if is_section(val) {
            sections.push((key, val));
        } else {
            builder.push_record([key.as_str(), &format_scalar(val, "-")]);
            has_scalars = true;
        }
    }

    if has_scalars {
        if !title.is_empty() {
            println!("\n{title}");
        }
        println!("{}", Table::from(builder));
    }

    for (key, val) in sections {
        let heading = if title.is_empty() {
            key.clone()
        } else {
            format!("{title}.{key}")
        };
        match val {
            Value::Object(inner) => print_object(&heading, inner),
            Value::Array(arr) => {
                println!("\n{heading}");
                print_array_table(arr);
            }
            _ => {}
        }
    }
}

/// Objects and lists of records are printed as their own tables.
fn is_section(value: &Value) -> bool {
    match value {
        Value::Object(_) => true,
        Value::Array(arr) => arr.iter().any(Value::is_object),
        _ => false,
    }
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| {
                        map.get(h.as_str())
                            .map(|v| format_scalar(v, "-"))
                            .unwrap_or_default()
                    })
                    .collect();
                builder.push_record(row);
            }
        }

        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", format_scalar(item, "-"));
        }
    }
}
