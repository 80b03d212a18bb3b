use super::aggregate::aggregate;
use super::build::ResolverNode;
use crate::error::{FieldPath, ObjeqlError};
use crate::schema::Schema;
use crate::traits::{RequestContext, ResolverInfo};
use futures::future::{try_join_all, BoxFuture};
use futures::FutureExt;
use serde_json::Value;

/// Everything shared by every node of one request's tree walk. Copied
/// freely into child futures.
#[derive(Clone, Copy, Debug)]
pub struct ExecuteContext<'a> {
    pub request: &'a RequestContext,
    pub schema: &'a Schema,
    /// Read-only scratch value handed to every resolver.
    pub data: &'a Value,
}

/// Runs a resolution tree over a single root value.
pub async fn execute_tree(
    node: &ResolverNode,
    value: Value,
    ctx: ExecuteContext<'_>,
    path: &FieldPath,
) -> Result<Value, ObjeqlError> {
    execute_node(node, value, None, ctx, path.clone()).await
}

/// Runs a resolution tree over an array of homogeneous sibling records
/// concurrently, in order, then joins any batch-loaded fields across the
/// whole array.
pub async fn execute_trees(
    node: &ResolverNode,
    values: Vec<Value>,
    ctx: ExecuteContext<'_>,
    path: &FieldPath,
) -> Result<Vec<Value>, ObjeqlError> {
    let tasks = values
        .into_iter()
        .map(|value| execute_node(node, value, None, ctx, path.clone()));
    let mut results = try_join_all(tasks).await?;
    aggregate(&mut results, node, ctx, path).await?;
    Ok(results)
}

fn execute_node<'a>(
    node: &'a ResolverNode,
    value: Value,
    parent: Option<&'a Value>,
    ctx: ExecuteContext<'a>,
    path: FieldPath,
) -> BoxFuture<'a, Result<Value, ObjeqlError>> {
    async move {
        if let Some(resolver) = &node.field.resolver {
            // a deferred node is populated by an ancestor's resolver; its
            // current value passes through untouched
            if node.field.defer {
                return Ok(value);
            }
            let info = ResolverInfo {
                request: ctx.request,
                field_path: &path,
                args: node.args.as_ref(),
                query: &node.query,
                field_value: &value,
                parent_value: parent,
                data: ctx.data,
            };
            return resolver.resolve(info).await;
        }

        match (&node.nested, value) {
            (Some(children), Value::Object(mut record)) => {
                // children see the parent as it stood before any sibling
                // resolved, so concurrent siblings observe a stable view
                let snapshot = Value::Object(record.clone());
                let tasks = children.iter().map(|(name, child)| {
                    let field_value = record.get(name.as_str()).cloned().unwrap_or(Value::Null);
                    execute_node(child, field_value, Some(&snapshot), ctx, path.child(name))
                });
                let resolved = try_join_all(tasks).await?;
                for (name, resolved) in children.keys().zip(resolved) {
                    record.insert(name.clone(), resolved);
                }
                Ok(Value::Object(record))
            }
            (_, value) => Ok(value),
        }
    }
    .boxed()
}
