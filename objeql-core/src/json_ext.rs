use serde_json::Value;

/// A json object
pub type Object = serde_json::Map<String, Value>;

/// Returns true if the value is a JSON primitive (null, bool, number or
/// string) as opposed to an array or object.
pub(crate) fn is_primitive(value: &Value) -> bool {
    matches!(
        value,
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_)
    )
}
