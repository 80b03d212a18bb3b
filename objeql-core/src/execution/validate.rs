use super::build::ResolverNode;
use crate::error::{FieldPath, ObjeqlError, QueryErrorKind, ResultErrorKind};
use crate::json_ext::Object;
use crate::schema::{FieldDef, ResolvedType, Schema};
use indexmap::IndexMap;
use serde_json::Value;

/// Walks resolved data in tandem with its resolution tree, enforcing
/// nullability and cardinality and applying scalar serialization.
///
/// Only requested fields survive into the output; anything else a resolver
/// returned is dropped here.
pub fn validate_results(
    value: Value,
    node: &ResolverNode,
    path: &FieldPath,
    schema: &Schema,
) -> Result<Value, ObjeqlError> {
    let children = match &node.nested {
        Some(children) => children,
        None => return validate_leaf(value, &node.field, path, schema),
    };

    // a null parent cuts the tree short regardless of what its children
    // would have required
    if value.is_null() {
        return Ok(Value::Null);
    }

    if node.field.is_array {
        let elements = match value {
            Value::Array(elements) => elements,
            _ => return Err(ObjeqlError::result(ResultErrorKind::ArrayExpected, path)),
        };
        let mut out = Vec::with_capacity(elements.len());
        for element in elements {
            out.push(Value::Object(validate_children(
                &element, children, path, schema,
            )?));
        }
        Ok(Value::Array(out))
    } else {
        match value {
            Value::Object(_) => {}
            _ => return Err(ObjeqlError::result(ResultErrorKind::ObjectExpected, path)),
        }
        Ok(Value::Object(validate_children(
            &value, children, path, schema,
        )?))
    }
}

fn validate_children(
    record: &Value,
    children: &IndexMap<String, ResolverNode>,
    path: &FieldPath,
    schema: &Schema,
) -> Result<Object, ObjeqlError> {
    let mut out = Object::new();
    for (name, child) in children {
        let field_value = record.get(name.as_str()).cloned().unwrap_or(Value::Null);
        out.insert(
            name.clone(),
            validate_results(field_value, child, &path.child(name), schema)?,
        );
    }
    Ok(out)
}

fn validate_leaf(
    value: Value,
    field: &FieldDef,
    path: &FieldPath,
    schema: &Schema,
) -> Result<Value, ObjeqlError> {
    validate_result_shape(&value, field, path)?;

    let resolved = field.type_ref.resolve(schema).ok_or_else(|| {
        ObjeqlError::query(
            QueryErrorKind::TypeNotFound(field.type_ref.describe().to_string()),
            path,
        )
    })?;
    let scalar = match resolved {
        // an object-typed node without attached children passes through;
        // its resolver owned the shaping
        ResolvedType::Object(_) => return Ok(value),
        ResolvedType::Scalar(scalar) => scalar,
    };
    let serialize = match &scalar.serialize {
        Some(serialize) => serialize,
        None => return Ok(value),
    };
    if value.is_null() {
        return Ok(value);
    }

    let invalid = || {
        ObjeqlError::result(
            ResultErrorKind::InvalidScalarValue(scalar.name().to_string()),
            path,
        )
    };
    match (&value, field.is_array) {
        (Value::Array(elements), true) => {
            let mut out = Vec::with_capacity(elements.len());
            for element in elements {
                out.push(serialize(element).map_err(|_| invalid())?);
            }
            Ok(Value::Array(out))
        }
        _ => serialize(&value).map_err(|_| invalid()),
    }
}

/// Enforces a field's declared cardinality and nullability against a raw
/// value: arrays must be arrays, and null appears only where allowed.
pub fn validate_result_shape(
    value: &Value,
    field: &FieldDef,
    path: &FieldPath,
) -> Result<(), ObjeqlError> {
    if field.is_array {
        let elements = value
            .as_array()
            .ok_or_else(|| ObjeqlError::result(ResultErrorKind::ArrayExpected, path))?;
        for element in elements {
            validate_nullability(element, field, path)?;
        }
        Ok(())
    } else {
        validate_nullability(value, field, path)
    }
}

fn validate_nullability(
    value: &Value,
    field: &FieldDef,
    path: &FieldPath,
) -> Result<(), ObjeqlError> {
    if value.is_null() && !field.allow_null {
        return Err(ObjeqlError::result(
            ResultErrorKind::NullValueNotAllowed,
            path,
        ));
    }
    Ok(())
}
