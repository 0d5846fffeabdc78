use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::scalar_text;

/// Format output as tables using the tabled crate. A report with nested
/// sections (results, formatted, targets) prints one table per section.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result_tables(result, map);
            } else {
                print_sections(map);
            }
        }
        _ => println!("{}", scalar_text(value)),
    }
}

fn print_result_tables(result: &Value, envelope: &Map<String, Value>) {
    if let Some(Value::Object(assumptions)) = envelope.get("assumptions") {
        if let (Some(period), Some(currency)) =
            (assumptions.get("time_period"), assumptions.get("currency"))
        {
            println!(
                "Period: {}  Currency: {}\n",
                scalar_text(period),
                scalar_text(currency)
            );
        }
    }

    match result {
        Value::Object(res_map) => print_sections(res_map),
        other => println!("{}", scalar_text(other)),
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                println!("  - {}", scalar_text(w));
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

/// Scalars go in a leading Field/Value table; each nested object gets its
/// own titled table.
fn print_sections(map: &Map<String, Value>) {
    let scalars: Vec<(&String, &Value)> = map.iter().filter(|(_, v)| !v.is_object()).collect();
    if !scalars.is_empty() {
        println!("{}", field_table(scalars));
    }

    for (key, val) in map {
        if let Value::Object(section) = val {
            println!("\n{}", section_title(key));
            println!("{}", field_table(section.iter().collect()));
        }
    }
}

fn field_table(rows: Vec<(&String, &Value)>) -> Table {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in rows {
        builder.push_record([key.as_str(), &format_value(val)]);
    }
    builder.build()
}

/// `cost_structure` -> `Cost Structure`
fn section_title(key: &str) -> String {
    key.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        other => scalar_text(other),
    }
}
