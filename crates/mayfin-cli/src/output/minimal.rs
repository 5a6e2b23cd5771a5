use serde_json::Value;

use super::format_scalar;

/// Fields worth printing on their own, most important first.
const PRIORITY_KEYS: [&str; 7] = [
    "global_score",
    "status",
    "financeable_amount",
    "estimated_monthly_payment",
    "decision_label",
    "max_leverage_years",
    "alert_messages",
];

/// Print just the headline values of the output.
///
/// Priority fields are looked up in the result and one level below it
/// (`scoring`, `recommendation`), then joined on one line. A list result
/// prints its length; anything else falls back to the first field.
pub fn print_minimal(value: &Value) {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result {
        Value::Object(map) => {
            let mut found: Vec<String> = Vec::new();
            for key in PRIORITY_KEYS {
                let hit = map.get(key).or_else(|| {
                    map.values()
                        .filter_map(Value::as_object)
                        .find_map(|inner| inner.get(key))
                });
                if let Some(val) = hit.filter(|v| !v.is_null()) {
                    found.push(format!("{key}={}", format_scalar(val, "null")));
                }
            }

            if !found.is_empty() {
                println!("{}", found.join(" "));
            } else if let Some((key, val)) = map.iter().next() {
                println!("{key}: {}", format_scalar(val, "null"));
            }
        }
        Value::Array(arr) => println!("{}", arr.len()),
        other => println!("{}", format_scalar(other, "null")),
    }
}
