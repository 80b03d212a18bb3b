//! The built-in scalar types every schema starts with.

use crate::schema::{InvalidValue, Primitive, ScalarType};
use serde_json::{Number, Value};

/// `true`/`false`, with lenient input coercion from `0`/`1` and a
/// truthiness-style output coercion.
pub fn boolean() -> ScalarType {
    ScalarType::new("boolean")
        .description("True or False")
        .primitive(Primitive::Boolean)
        .parse_value(|value| match value {
            Value::Bool(b) => Ok(Value::Bool(*b)),
            Value::Number(n) => match n.as_i64() {
                Some(0) => Ok(Value::Bool(false)),
                Some(1) => Ok(Value::Bool(true)),
                _ => Err(InvalidValue),
            },
            _ => Err(InvalidValue),
        })
        .serialize(|value| Ok(Value::Bool(truthy(value))))
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Any JSON number. Numeric strings are coerced on input, preferring an
/// integer representation when the text is integral.
pub fn number() -> ScalarType {
    ScalarType::new("number")
        .description("Numeric value")
        .primitive(Primitive::Number)
        .parse_value(|value| match value {
            Value::Number(n) => Ok(Value::Number(n.clone())),
            Value::String(s) => parse_number(s).ok_or(InvalidValue),
            Value::Bool(b) => Ok(Value::Number(Number::from(*b as i64))),
            _ => Err(InvalidValue),
        })
        .serialize(|value| match value {
            Value::Number(n) => Ok(Value::Number(n.clone())),
            _ => Err(InvalidValue),
        })
}

fn parse_number(text: &str) -> Option<Value> {
    if let Ok(i) = text.parse::<i64>() {
        return Some(Value::Number(Number::from(i)));
    }
    let f = text.parse::<f64>().ok()?;
    Number::from_f64(f).map(Value::Number)
}

/// Any JSON string. No coercion in either direction.
pub fn string() -> ScalarType {
    ScalarType::new("string")
        .description("String value")
        .primitive(Primitive::String)
        .parse_value(|value| match value {
            Value::String(s) => Ok(Value::String(s.clone())),
            _ => Err(InvalidValue),
        })
        .serialize(|value| match value {
            Value::String(s) => Ok(Value::String(s.clone())),
            _ => Err(InvalidValue),
        })
}

/// Anything at all. Values pass through untouched in both directions.
pub fn unknown() -> ScalarType {
    ScalarType::new("unknown")
        .description("Unknown value")
        .primitive(Primitive::Unknown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(scalar: &ScalarType, value: Value) -> Result<Value, InvalidValue> {
        (scalar.parse_value.as_ref().unwrap())(&value)
    }

    fn serialize(scalar: &ScalarType, value: Value) -> Result<Value, InvalidValue> {
        (scalar.serialize.as_ref().unwrap())(&value)
    }

    #[test]
    fn boolean_parse_accepts_bools_and_bits() {
        let b = boolean();
        assert_eq!(parse(&b, json!(true)).unwrap(), json!(true));
        assert_eq!(parse(&b, json!(0)).unwrap(), json!(false));
        assert_eq!(parse(&b, json!(1)).unwrap(), json!(true));
        assert!(parse(&b, json!(2)).is_err());
        assert!(parse(&b, json!("true")).is_err());
    }

    #[test]
    fn boolean_serialize_is_truthiness() {
        let b = boolean();
        assert_eq!(serialize(&b, json!(null)).unwrap(), json!(false));
        assert_eq!(serialize(&b, json!(0)).unwrap(), json!(false));
        assert_eq!(serialize(&b, json!("")).unwrap(), json!(false));
        assert_eq!(serialize(&b, json!("no")).unwrap(), json!(true));
        assert_eq!(serialize(&b, json!([])).unwrap(), json!(true));
        // serializing an already-serialized value changes nothing
        assert_eq!(serialize(&b, json!(true)).unwrap(), json!(true));
    }

    #[test]
    fn number_parse_coerces_numeric_strings() {
        let n = number();
        assert_eq!(parse(&n, json!(42)).unwrap(), json!(42));
        assert_eq!(parse(&n, json!("42")).unwrap(), json!(42));
        assert_eq!(parse(&n, json!("4.5")).unwrap(), json!(4.5));
        assert_eq!(parse(&n, json!(true)).unwrap(), json!(1));
        assert!(parse(&n, json!("forty-two")).is_err());
        assert!(parse(&n, json!(null)).is_err());
    }

    #[test]
    fn number_serialize_rejects_non_numbers() {
        let n = number();
        assert_eq!(serialize(&n, json!(7)).unwrap(), json!(7));
        assert!(serialize(&n, json!("7")).is_err());
    }

    #[test]
    fn string_is_strict_both_ways() {
        let s = string();
        assert_eq!(parse(&s, json!("hi")).unwrap(), json!("hi"));
        assert!(parse(&s, json!(42)).is_err());
        assert!(serialize(&s, json!(42)).is_err());
    }

    #[test]
    fn unknown_has_no_coercion() {
        let u = unknown();
        assert!(u.parse_value.is_none());
        assert!(u.serialize.is_none());
    }
}
