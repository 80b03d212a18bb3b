use super::object_type::FieldDef;
use crate::error::ObjeqlError;
use crate::json_ext::Object;
use derivative::Derivative;
use http::Method;
use serde_json::Value;
use std::sync::Arc;

/// Transforms the merged query-string/path parameters of a REST-style
/// request into the arguments value passed to the resolver.
pub type ArgsTransformFn = Arc<dyn Fn(Object) -> Value + Send + Sync>;

/// Optional REST exposure for a root resolver: mounted by the HTTP binding
/// in addition to the single-endpoint handler.
#[derive(Clone, Derivative)]
#[derivative(Debug)]
pub struct RestMetadata {
    pub method: Method,
    /// Route template, e.g. `/user/:id`.
    pub route: String,
    /// Preset selection shape to run when none arrives with the request.
    pub query: Option<Value>,
    #[derivative(Debug = "ignore")]
    pub args_transformer: Option<ArgsTransformFn>,
}

impl RestMetadata {
    pub fn new(method: Method, route: impl Into<String>) -> Self {
        RestMetadata {
            method,
            route: route.into(),
            query: None,
            args_transformer: None,
        }
    }

    pub fn query(mut self, query: Value) -> Self {
        self.query = Some(query);
        self
    }

    pub fn args_transformer<F>(mut self, f: F) -> Self
    where
        F: Fn(Object) -> Value + Send + Sync + 'static,
    {
        self.args_transformer = Some(Arc::new(f));
        self
    }
}

/// A root operation: a named entry point producing the root value for a
/// request, plus the declared shape of that value.
#[derive(Clone, Derivative)]
#[derivative(Debug)]
pub struct RootResolver {
    name: String,
    field: FieldDef,
    rest: Option<RestMetadata>,
}

impl RootResolver {
    /// The field definition must carry a resolver function; there is no
    /// parent to populate a root value otherwise.
    pub fn new(name: impl Into<String>, field: FieldDef) -> Result<Self, ObjeqlError> {
        let name = name.into();
        if field.resolver.is_none() {
            return Err(ObjeqlError::Initialization(format!(
                "root resolver '{}' must declare a resolver function",
                name
            )));
        }
        Ok(RootResolver {
            name,
            field,
            rest: None,
        })
    }

    pub fn rest(mut self, rest: RestMetadata) -> Self {
        self.rest = Some(rest);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field(&self) -> &FieldDef {
        &self.field
    }

    pub fn rest_metadata(&self) -> Option<&RestMetadata> {
        self.rest.as_ref()
    }
}
