use crate::error::{ArgsErrorKind, FieldPath, ObjeqlError};
use crate::json_ext::Object;
use crate::schema::{ArgDef, InputType, ResolvedInput, Schema};
use serde_json::Value;

/// Validates a caller-supplied arguments value against its declaration,
/// producing the coerced value. The input is never mutated; the same query
/// object may be shared across concurrent requests.
///
/// `Ok(None)` means "no arguments": nothing was supplied and nothing was
/// required.
pub fn validate_args(
    raw: Option<&Value>,
    def: Option<&ArgDef>,
    path: &FieldPath,
    schema: &Schema,
) -> Result<Option<Value>, ObjeqlError> {
    let def = match def {
        Some(def) => def,
        None => {
            return if raw.is_some() {
                Err(ObjeqlError::args(ArgsErrorKind::Unexpected, path))
            } else {
                Ok(None)
            }
        }
    };

    let raw = match raw {
        Some(raw) => raw,
        None => {
            return if def.required {
                Err(ObjeqlError::args(ArgsErrorKind::Required, path))
            } else {
                Ok(None)
            }
        }
    };

    if def.is_array && !raw.is_array() {
        return Err(ObjeqlError::args(ArgsErrorKind::ArrayExpected, path));
    }

    let resolved = def.type_ref.resolve(schema).ok_or_else(|| {
        ObjeqlError::args(
            ArgsErrorKind::UnknownInputType(def.type_ref.describe().to_string()),
            path,
        )
    })?;

    match resolved {
        ResolvedInput::Input(input) => {
            if let (true, Value::Array(elements)) = (def.is_array, raw) {
                let mut out = Vec::with_capacity(elements.len());
                for element in elements {
                    out.push(validate_input_object(element, &input, path, schema)?);
                }
                Ok(Some(Value::Array(out)))
            } else {
                Ok(Some(validate_input_object(raw, &input, path, schema)?))
            }
        }
        ResolvedInput::Scalar(scalar) => {
            let parse = match &scalar.parse_value {
                Some(parse) => parse,
                None => return Ok(Some(raw.clone())),
            };
            // null passes through uncoerced
            if raw.is_null() {
                return Ok(Some(Value::Null));
            }
            let invalid = || {
                ObjeqlError::args(
                    ArgsErrorKind::InvalidScalarValue(scalar.name().to_string()),
                    path,
                )
            };
            if let (true, Value::Array(elements)) = (def.is_array, raw) {
                let mut out = Vec::with_capacity(elements.len());
                for element in elements {
                    out.push(parse(element).map_err(|_| invalid())?);
                }
                Ok(Some(Value::Array(out)))
            } else {
                Ok(Some(parse(raw).map_err(|_| invalid())?))
            }
        }
    }
}

/// One element of an input-typed argument: every declared field validated
/// recursively, unknown keys rejected, then the cross-field validator.
fn validate_input_object(
    raw: &Value,
    input: &InputType,
    path: &FieldPath,
    schema: &Schema,
) -> Result<Value, ObjeqlError> {
    let supplied = raw
        .as_object()
        .ok_or_else(|| ObjeqlError::args(ArgsErrorKind::ObjectExpected, path))?;

    let mut out = Object::new();
    for (name, arg_def) in input.fields() {
        if let Some(value) =
            validate_args(supplied.get(name), Some(arg_def), &path.child(name), schema)?
        {
            out.insert(name.clone(), value);
        }
    }

    let unknown = supplied
        .keys()
        .filter(|key| !input.fields().contains_key(key.as_str()))
        .cloned()
        .collect::<Vec<_>>();
    if !unknown.is_empty() {
        return Err(ObjeqlError::args(
            ArgsErrorKind::UnknownArgs(unknown.join(",")),
            path,
        ));
    }

    if let Some(validator) = &input.validator {
        validator(&out, path)?;
    }

    Ok(Value::Object(out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> Schema {
        let mut schema = Schema::new();
        schema
            .register_input(
                InputType::new("userFilter")
                    .field("id", ArgDef::new("number").required())
                    .field("name", ArgDef::new("string"))
                    .field("tags", ArgDef::new("string").list()),
            )
            .expect("input registration");
        schema
    }

    fn validate(raw: Value, def: &ArgDef, schema: &Schema) -> Result<Option<Value>, ObjeqlError> {
        validate_args(Some(&raw), Some(def), &FieldPath::root("op"), schema)
    }

    #[test]
    fn undeclared_args_are_unexpected() {
        let schema = schema();
        let err = validate_args(
            Some(&json!({"id": 5})),
            None,
            &FieldPath::root("op"),
            &schema,
        )
        .unwrap_err();
        assert_eq!(err.message(), "Not expecting any args");
        // and nothing supplied against nothing declared is fine
        assert_eq!(
            validate_args(None, None, &FieldPath::root("op"), &schema).unwrap(),
            None
        );
    }

    #[test]
    fn required_args_must_be_supplied() {
        let schema = schema();
        let def = ArgDef::new("userFilter").required();
        let err = validate_args(None, Some(&def), &FieldPath::root("op"), &schema).unwrap_err();
        assert_eq!(err.message(), "Args is required");
    }

    #[test]
    fn declared_fields_are_coerced_and_missing_ones_omitted() {
        let schema = schema();
        let def = ArgDef::new("userFilter");
        let validated = validate(json!({"id": "5"}), &def, &schema)
            .expect("valid args")
            .expect("some args");
        // the numeric string coerces and the optional fields do not appear
        assert_eq!(validated, json!({"id": 5}));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let schema = schema();
        let def = ArgDef::new("userFilter");
        let err = validate(json!({"id": 1, "ssn": "x", "dob": "y"}), &def, &schema).unwrap_err();
        assert_eq!(err.message(), "Unknown args 'ssn,dob'");
    }

    #[test]
    fn array_declarations_enforce_arrays() {
        let schema = schema();
        let def = ArgDef::new("number").list();
        let err = validate(json!(5), &def, &schema).unwrap_err();
        assert_eq!(err.message(), "Array expected");
        let validated = validate(json!(["1", 2]), &def, &schema)
            .expect("valid args")
            .expect("some args");
        assert_eq!(validated, json!([1, 2]));
    }

    #[test]
    fn scalar_coercion_failure_names_the_scalar() {
        let schema = schema();
        let def = ArgDef::new("number");
        let err = validate(json!("not a number"), &def, &schema).unwrap_err();
        assert_eq!(err.message(), "Invalid scalar value for 'number'");
        assert_eq!(
            err.field_path().map(FieldPath::segments),
            Some(&["op".to_string()][..])
        );
    }

    #[test]
    fn nested_errors_extend_the_path() {
        let schema = schema();
        let def = ArgDef::new("userFilter");
        let err = validate(json!({"id": "oops"}), &def, &schema).unwrap_err();
        assert_eq!(
            err.field_path().map(FieldPath::segments),
            Some(&["op".to_string(), "id".to_string()][..])
        );
    }

    #[test]
    fn cross_field_validator_runs_last() {
        let mut schema = Schema::new();
        schema
            .register_input(
                InputType::new("range")
                    .field("first", ArgDef::new("number"))
                    .field("last", ArgDef::new("number"))
                    .validator(|args, path| {
                        if args.contains_key("first") && args.contains_key("last") {
                            return Err(ObjeqlError::args(
                                ArgsErrorKind::Invalid(
                                    "first and last cannot both be set".to_string(),
                                ),
                                path,
                            ));
                        }
                        Ok(())
                    }),
            )
            .expect("input registration");
        let def = ArgDef::new("range");
        assert!(validate(json!({"first": 1}), &def, &schema).is_ok());
        let err = validate(json!({"first": 1, "last": 2}), &def, &schema).unwrap_err();
        assert_eq!(err.message(), "first and last cannot both be set");
    }

    #[test]
    fn unresolvable_input_type_is_reported() {
        let schema = Schema::new();
        let def = ArgDef::new("noSuchInput");
        let err = validate(json!({}), &def, &schema).unwrap_err();
        assert_eq!(err.message(), "Unknown input type 'noSuchInput'");
    }
}
