use super::build::ResolverNode;
use super::execute::ExecuteContext;
use crate::error::{FieldPath, ObjeqlError};
use crate::traits::LoaderInfo;
use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::mem;

/// Joins batch-loaded fields across an array of homogeneous sibling
/// records.
///
/// For every nested field declaring a loader and a non-empty sub-query, the
/// raw key values present across all records are collected, de-duplicated,
/// and loaded in a single call; each record's key is then replaced by its
/// loaded record. A key with no match resolves to null and is left to
/// nullability validation. Loader-less nested fields recurse, flattening
/// one array level so grandchildren join across the whole set.
pub fn aggregate<'a>(
    results: &'a mut [Value],
    node: &'a ResolverNode,
    ctx: ExecuteContext<'a>,
    path: &'a FieldPath,
) -> BoxFuture<'a, Result<(), ObjeqlError>> {
    async move {
        let children = match &node.nested {
            Some(children) => children,
            None => return Ok(()),
        };

        for (name, child) in children {
            let child_path = path.child(name);
            if let Some(loader) = &child.field.loader {
                if child.query.is_empty() {
                    continue;
                }

                let mut keys: Vec<Value> = Vec::new();
                for record in results.iter() {
                    if let Some(key) = record.get(name.as_str()) {
                        if !key.is_null() && !keys.contains(key) {
                            keys.push(key.clone());
                        }
                    }
                }
                if keys.is_empty() {
                    continue;
                }

                tracing::trace!(field = %child_path, keys = keys.len(), "batch load");
                let args = json!({ "id": keys });
                let info = LoaderInfo {
                    request: ctx.request,
                    field_path: &child_path,
                    args: &args,
                    query: &child.query,
                };
                let loaded = match loader.load(info).await? {
                    Value::Array(records) => records,
                    _ => {
                        return Err(ObjeqlError::resolver(
                            "batch loader must return an array of records",
                        ))
                    }
                };

                let mut by_key: HashMap<String, Value> = HashMap::new();
                for record in loaded {
                    let key = record.get("id").map(key_string);
                    if let Some(key) = key {
                        by_key.insert(key, record);
                    }
                }

                for record in results.iter_mut() {
                    if let Some(slot) = record.get_mut(name.as_str()) {
                        if !slot.is_null() {
                            let joined = by_key.get(&key_string(slot)).cloned();
                            *slot = joined.unwrap_or(Value::Null);
                        }
                    }
                }
            } else if child.nested.is_some() {
                // pull each record's value at this field (spreading arrays)
                // into one flat working set, recurse, then write back
                let mut flattened: Vec<Value> = Vec::new();
                let mut layout: Vec<(usize, bool, usize)> = Vec::new();
                for (index, record) in results.iter_mut().enumerate() {
                    match record.get_mut(name.as_str()) {
                        Some(Value::Array(items)) => {
                            layout.push((index, true, items.len()));
                            flattened.append(items);
                        }
                        Some(value) => {
                            layout.push((index, false, 1));
                            flattened.push(mem::take(value));
                        }
                        None => {}
                    }
                }
                if flattened.is_empty() {
                    continue;
                }

                aggregate(&mut flattened, child, ctx, &child_path).await?;

                let mut drained = flattened.into_iter();
                for (index, is_array, len) in layout {
                    let restored = if is_array {
                        Value::Array(drained.by_ref().take(len).collect())
                    } else {
                        drained.next().unwrap_or(Value::Null)
                    };
                    if let Some(slot) = results[index].get_mut(name.as_str()) {
                        *slot = restored;
                    }
                }
            }
        }
        Ok(())
    }
    .boxed()
}

// keys are compared by their JSON text so 5 and 5.0 style mismatches from a
// backend cannot silently split a batch
fn key_string(value: &Value) -> String {
    value.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FieldPath;
    use crate::execution::build::build_tree;
    use crate::schema::{FieldDef, ObjectType, Schema};
    use crate::traits::{Loader, RequestContext, ResolveFuture};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::sync::Mutex;

    struct RecordingLoader {
        calls: Arc<AtomicUsize>,
        seen_keys: Arc<Mutex<Vec<Value>>>,
        records: Vec<Value>,
    }

    impl Loader for RecordingLoader {
        fn load<'a>(&'a self, info: LoaderInfo<'a>) -> ResolveFuture<'a> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(keys) = info.args.get("id").and_then(Value::as_array) {
                self.seen_keys
                    .lock()
                    .expect("lock")
                    .extend(keys.iter().cloned());
            }
            let records = self.records.clone();
            async move { Ok(Value::Array(records)) }.boxed()
        }
    }

    fn org_schema(loader: RecordingLoader) -> Schema {
        let mut schema = Schema::new();
        schema
            .register_object(
                ObjectType::new("organization")
                    .field("id", FieldDef::new("number"))
                    .field("name", FieldDef::new("string")),
            )
            .expect("object registration");
        schema
            .register_object(
                ObjectType::new("user")
                    .field("id", FieldDef::new("number"))
                    .field("organization", FieldDef::new("organization").loader(loader)),
            )
            .expect("object registration");
        schema
    }

    fn loader_fixture() -> (Arc<AtomicUsize>, Arc<Mutex<Vec<Value>>>, RecordingLoader) {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen_keys = Arc::new(Mutex::new(Vec::new()));
        let loader = RecordingLoader {
            calls: calls.clone(),
            seen_keys: seen_keys.clone(),
            records: vec![
                json!({"id": 10, "name": "acme"}),
                json!({"id": 20, "name": "globex"}),
            ],
        };
        (calls, seen_keys, loader)
    }

    async fn run(schema: &Schema, results: &mut [Value], query: Value) {
        let node = build_tree(
            &query,
            &FieldDef::anonymous("user").list(),
            &FieldPath::root("getUsers"),
            true,
            schema,
        )
        .expect("tree");
        let request = RequestContext::default();
        let data = Value::Null;
        let ctx = ExecuteContext {
            request: &request,
            schema,
            data: &data,
        };
        aggregate(results, &node, ctx, &FieldPath::root("getUsers"))
            .await
            .expect("aggregation");
    }

    #[tokio::test]
    async fn one_load_joins_distinct_keys_across_siblings() {
        let (calls, seen_keys, loader) = loader_fixture();
        let schema = org_schema(loader);
        let mut results = vec![
            json!({"id": 1, "organization": 10}),
            json!({"id": 2, "organization": 20}),
            json!({"id": 3, "organization": 10}),
            json!({"id": 4, "organization": 99}),
        ];
        run(
            &schema,
            &mut results,
            json!({"id": true, "organization": {"id": true, "name": true}}),
        )
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(*seen_keys.lock().expect("lock"), vec![json!(10), json!(20), json!(99)]);
        assert_eq!(results[0]["organization"], json!({"id": 10, "name": "acme"}));
        assert_eq!(results[1]["organization"], json!({"id": 20, "name": "globex"}));
        assert_eq!(results[2]["organization"], json!({"id": 10, "name": "acme"}));
        // an unmatched key resolves to null, not an error
        assert_eq!(results[3]["organization"], Value::Null);
    }

    #[tokio::test]
    async fn null_keys_are_skipped_and_stay_null() {
        let (calls, _seen, loader) = loader_fixture();
        let schema = org_schema(loader);
        let mut results = vec![
            json!({"id": 1, "organization": null}),
            json!({"id": 2, "organization": null}),
        ];
        run(
            &schema,
            &mut results,
            json!({"id": true, "organization": {"name": true}}),
        )
        .await;

        // no keys means no load at all
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(results[0]["organization"], Value::Null);
    }

    #[tokio::test]
    async fn nested_records_join_through_a_parent_field() {
        let (calls, seen_keys, loader) = loader_fixture();
        let mut schema = org_schema(loader);
        schema
            .register_object(
                ObjectType::new("team")
                    .field("id", FieldDef::new("number"))
                    .field("members", FieldDef::new("user").list().allow_null()),
            )
            .expect("object registration");

        let node = build_tree(
            &json!({"id": true, "members": {"id": true, "organization": {"name": true}}}),
            &FieldDef::anonymous("team").list(),
            &FieldPath::root("getTeams"),
            true,
            &schema,
        )
        .expect("tree");
        let request = RequestContext::default();
        let data = Value::Null;
        let ctx = ExecuteContext {
            request: &request,
            schema: &schema,
            data: &data,
        };
        let mut results = vec![
            json!({"id": 1, "members": [{"id": 1, "organization": 10}, {"id": 2, "organization": 20}]}),
            json!({"id": 2, "members": [{"id": 3, "organization": 10}]}),
        ];
        aggregate(&mut results, &node, ctx, &FieldPath::root("getTeams"))
            .await
            .expect("aggregation");

        // one load across both teams' members
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(*seen_keys.lock().expect("lock"), vec![json!(10), json!(20)]);
        assert_eq!(
            results[0]["members"][1]["organization"],
            json!({"id": 20, "name": "globex"})
        );
        assert_eq!(
            results[1]["members"][0]["organization"],
            json!({"id": 10, "name": "acme"})
        );
        // array shapes are restored after the flattening round-trip
        assert_eq!(results[0]["members"].as_array().map(Vec::len), Some(2));
        assert_eq!(results[1]["members"].as_array().map(Vec::len), Some(1));
    }
}
