//! The request engine: selection validation, tree construction, async
//! execution, batch joining, and result validation.

mod aggregate;
mod args;
mod build;
mod execute;
mod validate;

pub use aggregate::*;
pub use args::*;
pub use build::*;
pub use execute::*;
pub use validate::*;

use crate::error::{FieldPath, ObjeqlError, QueryErrorKind};
use crate::json_ext::Object;
use crate::schema::Schema;
use crate::traits::RequestContext;
use serde_json::Value;

/// Runs one named root operation end to end: build the full resolution
/// tree, execute it from a null root, then validate and serialize the
/// result shape.
#[tracing::instrument(skip(schema, request, query), level = "debug")]
pub async fn execute_query(
    schema: &Schema,
    request: &RequestContext,
    operation: &str,
    query: &Value,
) -> Result<Value, ObjeqlError> {
    let root = schema.root_resolver(operation).ok_or_else(|| {
        ObjeqlError::query(
            QueryErrorKind::UnknownOperation(operation.to_string()),
            &FieldPath::new(),
        )
    })?;

    let path = FieldPath::root(operation);
    let tree = build_tree(query, root.field(), &path, true, schema)?;

    let data = Value::Object(Object::new());
    let ctx = ExecuteContext {
        request,
        schema,
        data: &data,
    };
    let resolved = execute_tree(&tree, Value::Null, ctx, &path).await?;

    validate_results(resolved, &tree, &path, schema)
}
