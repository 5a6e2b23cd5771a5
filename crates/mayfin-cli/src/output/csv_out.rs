use serde_json::Value;
use std::io;

use super::format_scalar;

/// Write output as CSV to stdout.
///
/// A list result (ratios, alerts) becomes one row per record; an object
/// result becomes `field,value` rows with nested fields dotted.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result {
        Value::Array(arr) => write_array_csv(&mut wtr, arr),
        Value::Object(_) => {
            let _ = wtr.write_record(["field", "value"]);
            write_flattened(&mut wtr, "", result);
        }
        _ => {
            let _ = wtr.write_record([&format_scalar(result, "")]);
        }
    }

    let _ = wtr.flush();
}

fn write_flattened(wtr: &mut csv::Writer<io::StdoutLock<'_>>, prefix: &str, value: &Value) {
    match value {
        Value::Object(map) => {
            for (key, val) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                write_flattened(wtr, &path, val);
            }
        }
        Value::Array(arr) if arr.iter().any(Value::is_object) => {
            for (i, item) in arr.iter().enumerate() {
                write_flattened(wtr, &format!("{prefix}[{i}]"), item);
            }
        }
        _ => {
            let _ = wtr.write_record([prefix, &format_scalar(value, "")]);
        }
    }
}

fn write_array_csv(wtr: &mut csv::Writer<io::StdoutLock<'_>>, arr: &[Value]) {
    if arr.is_empty() {
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
        let _ = wtr.write_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(*h).map(|v| format_scalar(v, "")).unwrap_or_default())
                    .collect();
                let _ = wtr.write_record(&row);
            }
        }
    } else {
        for item in arr {
            let _ = wtr.write_record([&format_scalar(item, "")]);
        }
    }
}
