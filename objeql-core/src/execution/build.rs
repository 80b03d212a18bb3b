use super::args::validate_args;
use crate::error::{FieldPath, ObjeqlError, QueryErrorKind};
use crate::json_ext::Object;
use crate::schema::{FieldDef, ResolvedType, Schema, WILDCARD_FIELD};
use indexmap::IndexMap;
use serde_json::Value;

/// The reserved selection key carrying a field's arguments.
pub const ARGS_FIELD: &str = "__args";

/// One node of a resolution tree: the requested shape of a single field,
/// validated against the schema.
#[derive(Debug)]
pub struct ResolverNode {
    /// The definition this node was validated against.
    pub field: FieldDef,
    /// The residual sub-query below this node, arguments removed and
    /// wildcards expanded.
    pub query: Object,
    /// Coerced arguments, when any were supplied or defaulted.
    pub args: Option<Value>,
    /// Child nodes, present on every non-leaf node. Left empty (not
    /// recursed into) when this node's own resolver owns its subtree and a
    /// full tree was not requested.
    pub nested: Option<IndexMap<String, ResolverNode>>,
}

/// Walks a requested selection against a field definition, validating the
/// whole shape and producing the tree the executor and validator run over.
///
/// With `full_tree` unset, children of a field that declares its own
/// resolver are validated but not attached; that resolver produces and
/// shapes its own subtree at execution time.
pub fn build_tree(
    field_value: &Value,
    field: &FieldDef,
    path: &FieldPath,
    full_tree: bool,
    schema: &Schema,
) -> Result<ResolverNode, ObjeqlError> {
    let resolved = field.type_ref.resolve(schema).ok_or_else(|| {
        ObjeqlError::query(
            QueryErrorKind::TypeNotFound(field.type_ref.describe().to_string()),
            path,
        )
    })?;

    let is_lookup = schema.is_lookup(field_value);
    let selection = field_value.as_object();

    // a field's RHS is either the lookup sentinel or a sub-selection object
    if !is_lookup && selection.is_none() {
        return Err(ObjeqlError::query(QueryErrorKind::InvalidFieldValue, path));
    }

    let object_type = match &resolved {
        ResolvedType::Object(object) => Some(object.clone()),
        ResolvedType::Scalar(_) => None,
    };

    match (&object_type, selection) {
        (None, Some(selection)) => {
            if selection.len() != 1 || !selection.contains_key(ARGS_FIELD) {
                return Err(ObjeqlError::query(QueryErrorKind::LeafWithSubfields, path));
            }
        }
        (None, None) => {
            if field.args.as_ref().map(|args| args.required).unwrap_or(false) {
                return Err(ObjeqlError::query(QueryErrorKind::ArgsRequired, path));
            }
        }
        (Some(_), None) => {
            return Err(ObjeqlError::query(QueryErrorKind::LookupOnObject, path));
        }
        (Some(_), Some(_)) => {}
    }

    let mut query = Object::new();
    let mut raw_args = None;
    if let Some(selection) = selection {
        for (key, value) in selection {
            if key == ARGS_FIELD {
                raw_args = Some(value);
            } else {
                query.insert(key.clone(), value.clone());
            }
        }
    }

    let args = validate_args(raw_args, field.args.as_ref(), &path.child(ARGS_FIELD), schema)?;

    let mut nested = None;
    if let Some(object_type) = object_type {
        // wildcard expands to every visible argument-free field not already
        // selected, before the per-field walk
        let wildcard = query
            .get(WILDCARD_FIELD)
            .map(|value| schema.is_lookup(value))
            .unwrap_or(false);
        if wildcard {
            query.remove(WILDCARD_FIELD);
            for (name, child_field) in object_type.fields() {
                if child_field.hidden || child_field.args.is_some() || query.contains_key(name) {
                    continue;
                }
                // only leaves are selectable by bare sentinel; object fields
                // need an explicit sub-selection
                let is_leaf = matches!(
                    child_field.type_ref.resolve(schema),
                    Some(ResolvedType::Scalar(_))
                );
                if !is_leaf {
                    continue;
                }
                query.insert(name.clone(), schema.lookup_value().clone());
            }
        }

        let mut children = IndexMap::new();
        for (name, value) in &query {
            let child_path = path.child(name);
            let child_field = object_type
                .fields()
                .get(name)
                .ok_or_else(|| ObjeqlError::query(QueryErrorKind::UnknownField, &child_path))?;
            if child_field.hidden {
                return Err(ObjeqlError::query(QueryErrorKind::HiddenField, &child_path));
            }

            // validation is total over the requested shape even when the
            // child will not be attached
            let child = build_tree(value, child_field, &child_path, full_tree, schema)?;
            if full_tree || field.resolver.is_none() {
                children.insert(name.clone(), child);
            }
        }
        nested = Some(children);
    }

    Ok(ResolverNode {
        field: field.clone(),
        query,
        args,
        nested,
    })
}
