use serde::Serialize;
use serde_json::Value;

pub fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

/// Renders a log message: strings as-is, anything else as compact JSON.
pub fn format_message<T: Serialize + ?Sized>(message: &T) -> String {
    match serde_json::to_value(message) {
        Ok(Value::String(text)) => text,
        Ok(value) => value.to_string(),
        Err(_) => String::new(),
    }
}

/// JavaScript-style truthiness, used when coercing loosely typed options.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().map_or(false, |n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Truthiness for environment variables, where `0`, `false`, `no` and `off`
/// switch a flag off.
pub fn env_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_lowercase().as_str(),
        "" | "0" | "false" | "no" | "off"
    )
}
