use serde_json::Value;
use tabled::{Table, builder::Builder};

/// Keys whose value is the main tabular body of a result (projection rows,
/// amortization schedules, scenario bands). These are rendered as a full
/// table after the scalar fields.
const ROW_ARRAY_KEYS: [&str; 3] = ["rows", "schedule", "bands"];

/// Keys holding nested scalar sections worth their own Field/Value block.
const SECTION_KEYS: [&str; 5] = ["summary", "breakdown", "payoff", "baseline", "savings"];

/// Format output as tables using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result(result, map);
            } else {
                print_scalar_block(None, value);
            }
        }
        Value::Array(arr) => {
            print_array_table(arr);
        }
        _ => {
            println!("{}", value);
        }
    }
}

fn print_result(result: &Value, envelope: &serde_json::Map<String, Value>) {
    match result {
        Value::Object(res_map) => {
            // Scalar fields first (skip nested sections and row arrays).
            let scalars: Vec<(&String, &Value)> = res_map
                .iter()
                .filter(|(k, v)| {
                    !ROW_ARRAY_KEYS.contains(&k.as_str())
                        && !SECTION_KEYS.contains(&k.as_str())
                        && !v.is_object()
                })
                .collect();
            if !scalars.is_empty() {
                let mut builder = Builder::default();
                builder.push_record(["Field", "Value"]);
                for (key, val) in scalars {
                    builder.push_record([key.as_str(), &format_value(val)]);
                }
                println!("{}", Table::from(builder));
            }

            for key in SECTION_KEYS {
                if let Some(section @ Value::Object(_)) = res_map.get(key) {
                    print_scalar_block(Some(key), section);
                }
            }

            for key in ROW_ARRAY_KEYS {
                if let Some(Value::Array(rows)) = res_map.get(key) {
                    println!("\n{}:", title_case(key));
                    print_array_table(rows);
                }
            }
        }
        Value::Array(rows) => print_array_table(rows),
        _ => println!("{}", format_value(result)),
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_scalar_block(heading: Option<&str>, value: &Value) {
    if let Value::Object(map) = value {
        if let Some(h) = heading {
            println!("\n{}:", title_case(h));
        }
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in map {
            builder.push_record([key.as_str(), &format_value(val)]);
        }
        println!("{}", Table::from(builder));
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
                            .map(|v| format_value(v))
                            .unwrap_or_default()
                    })
                    .collect();
                builder.push_record(row);
            }
        }

        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", format_value(item));
        }
    }
}

fn title_case(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(|v| format_value(v)).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
