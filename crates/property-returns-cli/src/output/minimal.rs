use serde_json::Value;

use super::cell;

/// Headline figure per command, most specific first. Paths are JSON
/// pointers into the `result` object.
const PRIORITY_PATHS: [&str; 10] = [
    "/monthly_payment",
    "/cash_flow/monthly_cash_flow",
    "/yields/gross_yield_percent",
    "/projection/summary/final_equity",
    "/loan/monthly_payment",
    "/assessment/investment_score",
    "/interest_saved_by_largest_deposit",
    "/best_period_years",
    "/final_value",
    "/price",
];

/// Print just the key answer value from the output.
///
/// Looks for well-known result fields in priority order (skipping nulls),
/// then falls back to the first field in the result object.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Some(found) = headline(result_obj) {
        println!("{}", cell(found, "null"));
        return;
    }

    if let Value::Object(map) = result_obj {
        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, cell(val, "null"));
            return;
        }
    }

    println!("{}", cell(result_obj, "null"));
}

fn headline(result: &Value) -> Option<&Value> {
    PRIORITY_PATHS
        .iter()
        .filter_map(|path| result.pointer(path))
        .find(|v| !v.is_null())
}
