use serde_json::Value;

/// Identifiers arrive as strings or numbers depending on the service and
/// endpoint; normalize both to a string key.
pub(crate) fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
