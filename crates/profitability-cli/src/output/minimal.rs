use serde_json::Value;

use super::scalar_text;

/// Fields tried in order; the first non-null one is printed.
const PRIORITY_KEYS: [&str; 4] = [
    "net_profit",
    "target_profit_label",
    "units_to_break_even",
    "break_even_units",
];

/// Print just the key answer value from the output.
///
/// A full report answers with its formatted net profit. Other results are
/// searched for the priority fields, then fall back to their first field.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let Value::Object(map) = result_obj else {
        println!("{}", scalar_text(result_obj));
        return;
    };

    let search = map.get("formatted").and_then(Value::as_object).unwrap_or(map);
    for key in PRIORITY_KEYS {
        if let Some(val) = search.get(key) {
            if !val.is_null() {
                println!("{}", scalar_text(val));
                return;
            }
        }
    }

    if let Some((key, val)) = map.iter().next() {
        println!("{}: {}", key, scalar_text(val));
    }
}
