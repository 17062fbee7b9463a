use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::cell;

/// Format output as tables using the tabled crate.
///
/// Nested result sections (loan, yields, cash flow, ...) each get their own
/// titled table; arrays of records such as the amortisation breakdown print
/// one row per record.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result(result);
                print_envelope_notes(map);
            } else {
                print_section(None, map);
            }
        }
        Value::Array(arr) => print_array_table(arr),
        _ => println!("{value}"),
    }
}

fn print_result(result: &Value) {
    match result {
        Value::Object(map) => print_section(None, map),
        Value::Array(arr) => print_array_table(arr),
        other => println!("{}", cell(other, "null")),
    }
}

/// Scalars first as a Field/Value table, then each nested object or record
/// list under its own heading.
fn print_section(title: Option<&str>, map: &Map<String, Value>) {
    if let Some(title) = title {
        println!("\n{}", heading(title));
    }

    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    let mut scalars = 0;
    for (key, val) in map {
        if !is_nested(val) {
            builder.push_record([key.as_str(), &cell(val, "-")]);
            scalars += 1;
        }
    }
    if scalars > 0 {
        println!("{}", Table::from(builder));
    }

    for (key, val) in map {
        let path = match title {
            Some(parent) => format!("{parent}.{key}"),
            None => key.clone(),
        };
        match val {
            Value::Object(child) => print_section(Some(&path), child),
            Value::Array(items) if is_record_list(items) => {
                println!("\n{}", heading(&path));
                print_array_table(items);
            }
            _ => {}
        }
    }
}

fn print_envelope_notes(envelope: &Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {s}");
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {meth}");
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
                    .map(|h| map.get(h.as_str()).map(|v| cell(v, "-")).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }

        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", cell(item, "-"));
        }
    }
}

fn is_nested(value: &Value) -> bool {
    match value {
        Value::Object(_) => true,
        Value::Array(items) => is_record_list(items),
        _ => false,
    }
}

fn is_record_list(items: &[Value]) -> bool {
    matches!(items.first(), Some(Value::Object(_)))
}

/// `cash_flow` -> `Cash Flow`, `projection.summary` -> `Projection / Summary`
fn heading(path: &str) -> String {
    path.split('.')
        .map(|part| {
            part.split('_')
                .map(|word| {
                    let mut chars = word.chars();
                    match chars.next() {
                        Some(first) => first.to_uppercase().chain(chars).collect(),
                        None => String::new(),
                    }
                })
                .collect::<Vec<String>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join(" / ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_heading() {
        assert_eq!(heading("cash_flow"), "Cash Flow");
        assert_eq!(heading("projection.summary"), "Projection / Summary");
    }

    #[test]
    fn test_record_lists_are_nested() {
        assert!(is_nested(&json!([{"year": 1}])));
        assert!(!is_nested(&json!([3, 5, 7])));
        assert!(!is_nested(&json!("4.51")));
    }
}
