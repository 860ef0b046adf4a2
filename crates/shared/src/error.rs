use serde_json::Value;

/// Banner text for a non-2xx body that parsed as JSON. Uses the `error`
/// field when present, otherwise the whole body as JSON text.
pub fn error_message_from_body(body: &Value) -> String {
    match body.get("error") {
        Some(Value::String(message)) => message.clone(),
        Some(other) => other.to_string(),
        None => body.to_string(),
    }
}
