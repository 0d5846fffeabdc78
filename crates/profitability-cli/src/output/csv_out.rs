use serde_json::{Map, Value};
use std::io;

use super::scalar_text;

/// Write output as a two-column `field,value` CSV to stdout. Nested report
/// sections are flattened into dotted field names (`formatted.net_profit`).
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let _ = wtr.write_record(["field", "value"]);
    let body = value
        .as_object()
        .and_then(|map| map.get("result"))
        .unwrap_or(value);

    let mut rows = Vec::new();
    match body {
        Value::Object(map) => flatten_into(&mut rows, "", map),
        other => rows.push((String::from("value"), scalar_text(other))),
    }
    if let Some(Value::Array(warnings)) = value.get("warnings") {
        for (i, w) in warnings.iter().enumerate() {
            rows.push((format!("warnings.{}", i), scalar_text(w)));
        }
    }

    for (field, val) in &rows {
        let _ = wtr.write_record([field.as_str(), val.as_str()]);
    }
    let _ = wtr.flush();
}

fn flatten_into(rows: &mut Vec<(String, String)>, prefix: &str, map: &Map<String, Value>) {
    for (key, val) in map {
        let field = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        match val {
            Value::Object(inner) => flatten_into(rows, &field, inner),
            Value::Array(items) => {
                let joined: Vec<String> = items.iter().map(scalar_text).collect();
                rows.push((field, joined.join("; ")));
            }
            _ => rows.push((field, scalar_text(val))),
        }
    }
}
