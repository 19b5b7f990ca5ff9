use serde_json::Value;

/// Print just the headline answer from the output.
///
/// Heuristic: look for well-known result fields in priority order, checking
/// nested summary/breakdown sections too, then fall back to the first
/// scalar field in the result object.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let priority_keys = [
        "projected_net_worth",
        "net_worth",
        "max_affordable_payment",
        "total",
        "monthly_payment",
        "net_monthly_income",
        "gross_annual_income",
        "median",
    ];

    if let Value::Object(map) = result_obj {
        for key in &priority_keys {
            if let Some(val) = lookup(map, key) {
                if !val.is_null() {
                    println!("{}", format_minimal(val));
                    return;
                }
            }
        }

        // Fall back to the first scalar field
        if let Some((key, val)) = map.iter().find(|(_, v)| !v.is_object() && !v.is_array()) {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    println!("{}", format_minimal(result_obj));
}

/// Look for a key at the top level, then one level down inside the
/// summary and breakdown sections.
fn lookup<'a>(map: &'a serde_json::Map<String, Value>, key: &str) -> Option<&'a Value> {
    if let Some(val) = map.get(key) {
        return Some(val);
    }
    for section in ["summary", "breakdown"] {
        if let Some(Value::Object(inner)) = map.get(section) {
            if let Some(val) = inner.get(key) {
                return Some(val);
            }
        }
    }
    None
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
