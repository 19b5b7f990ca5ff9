use serde_json::Value;

/// Pretty-print the full computation envelope as JSON. Decimal balances are
/// already serialized as strings upstream, so the output is copy-paste safe.
pub fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("JSON serialization error: {}", e),
    }
}
