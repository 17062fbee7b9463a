use serde_json::{Map, Value};
use std::io;

use super::cell;

/// Write output as CSV to stdout.
///
/// Record lists become one row per record. Objects become two-column
/// `field,value` rows with nested keys joined by dots
/// (`cash_flow.monthly_cash_flow`).
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let body = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match body {
        Value::Array(arr) => write_array_csv(&mut wtr, arr),
        Value::Object(map) => {
            let _ = wtr.write_record(["field", "value"]);
            let mut rows = Vec::new();
            flatten(None, map, &mut rows);
            for (field, val) in rows {
                let _ = wtr.write_record([field.as_str(), val.as_str()]);
            }
        }
        other => {
            let _ = wtr.write_record([&cell(other, "")]);
        }
    }

    let _ = wtr.flush();
}

fn flatten(prefix: Option<&str>, map: &Map<String, Value>, rows: &mut Vec<(String, String)>) {
    for (key, val) in map {
        let field = match prefix {
            Some(p) => format!("{p}.{key}"),
            None => key.clone(),
        };
        match val {
            Value::Object(child) => flatten(Some(&field), child, rows),
            other => rows.push((field, cell(other, ""))),
        }
    }
}

fn write_array_csv<W: io::Write>(wtr: &mut csv::Writer<W>, arr: &[Value]) {
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
                    .map(|h| map.get(*h).map(|v| cell(v, "")).unwrap_or_default())
                    .collect();
                let _ = wtr.write_record(&row);
            }
        }
    } else {
        for item in arr {
            let _ = wtr.write_record([&cell(item, "")]);
        }
    }
}
