use axum::extract::{Extension, Path, Query};
use axum::routing::{on, post, MethodFilter};
use axum::{Json, Router};
use http::{HeaderMap, Method, StatusCode};
use objeql_core::{
    execute_query, FieldPath, Object, ObjeqlError, QueryErrorKind, Request, RequestContext,
    Response, Schema,
};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use typed_builder::TypedBuilder;

/// Configuration for the HTTP binding.
#[derive(Clone, Debug, TypedBuilder)]
pub struct RouterConfig {
    /// Where the single-endpoint POST handler is mounted.
    #[builder(default = "/objeql".to_string(), setter(into))]
    pub path: String,

    /// Expose internal error detail in the response envelope.
    #[builder(default)]
    pub debug: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        RouterConfig::builder().build()
    }
}

struct ServerState {
    schema: Arc<Schema>,
    debug: bool,
}

/// Builds the axum router for a schema: the single endpoint accepting
/// `{ "<operation>": { ...selection } }` bodies, plus one route per root
/// resolver carrying REST metadata.
pub fn router(schema: Arc<Schema>, config: RouterConfig) -> Result<Router, ObjeqlError> {
    if !config.path.starts_with('/') {
        return Err(ObjeqlError::Initialization(format!(
            "endpoint path '{}' must start with '/'",
            config.path
        )));
    }

    let state = Arc::new(ServerState {
        schema: schema.clone(),
        debug: config.debug,
    });

    let mut router = Router::new().route(&config.path, post(single_endpoint));

    for root in schema.root_resolvers() {
        if let Some(rest) = root.rest_metadata() {
            let filter = method_filter(&rest.method)?;
            let operation = root.name().to_string();
            router = router.route(
                &rest.route,
                on(filter, {
                    move |Extension(state): Extension<Arc<ServerState>>,
                          headers: HeaderMap,
                          Query(query_params): Query<HashMap<String, String>>,
                          Path(path_params): Path<HashMap<String, String>>| {
                        rest_endpoint(state, headers, query_params, path_params, operation.clone())
                    }
                }),
            );
        }
    }

    Ok(router.layer(Extension(state)))
}

fn method_filter(method: &Method) -> Result<MethodFilter, ObjeqlError> {
    MethodFilter::try_from(method.clone()).map_err(|_| {
        ObjeqlError::Initialization(format!("unsupported REST method '{}'", method))
    })
}

async fn single_endpoint(
    Extension(state): Extension<Arc<ServerState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Response>) {
    let request = match body {
        Value::Object(body) => Request::new(body),
        _ => {
            return respond(
                Err(ObjeqlError::query(
                    QueryErrorKind::BodyNotObject,
                    &FieldPath::new(),
                )),
                state.debug,
            )
        }
    };
    let (operation, query) = match request.operation() {
        Ok(pair) => pair,
        Err(err) => return respond(Err(err), state.debug),
    };

    let ctx = RequestContext {
        headers,
        ..Default::default()
    };
    respond(
        execute_query(&state.schema, &ctx, operation, query).await,
        state.debug,
    )
}

async fn rest_endpoint(
    state: Arc<ServerState>,
    headers: HeaderMap,
    query_params: HashMap<String, String>,
    path_params: HashMap<String, String>,
    operation: String,
) -> (StatusCode, Json<Response>) {
    let rest = match state
        .schema
        .root_resolver(&operation)
        .and_then(|root| root.rest_metadata().cloned())
    {
        Some(rest) => rest,
        None => {
            return respond(
                Err(ObjeqlError::query(
                    QueryErrorKind::UnknownOperation(operation),
                    &FieldPath::new(),
                )),
                state.debug,
            )
        }
    };

    // path captures override query-string duplicates
    let mut params = Object::new();
    for (key, value) in query_params {
        params.insert(key, Value::String(value));
    }
    for (key, value) in path_params {
        params.insert(key, Value::String(value));
    }

    let mut query = rest
        .query
        .clone()
        .unwrap_or_else(|| Value::Object(Object::new()));
    if rest.args_transformer.is_some() || !params.is_empty() {
        let args = match &rest.args_transformer {
            Some(transform) => transform(params),
            None => Value::Object(params),
        };
        if let Some(selection) = query.as_object_mut() {
            selection.insert("__args".to_string(), args);
        }
    }

    let ctx = RequestContext {
        headers,
        ..Default::default()
    };
    respond(
        execute_query(&state.schema, &ctx, &operation, &query).await,
        state.debug,
    )
}

fn respond(result: Result<Value, ObjeqlError>, debug: bool) -> (StatusCode, Json<Response>) {
    match result {
        Ok(data) => (StatusCode::OK, Json(Response::from_data(data))),
        Err(err) => {
            tracing::debug!(error = %err, "request failed");
            (err.status_code(), Json(Response::from_error(&err, debug)))
        }
    }
}
