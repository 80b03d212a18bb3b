use derivative::Derivative;
use serde_json::Value;
use std::sync::Arc;

/// Marker returned by scalar coercion functions on unacceptable input.
///
/// Callers rewrap it into an args or result error naming the scalar, so the
/// functions themselves stay oblivious to field paths.
#[derive(Debug)]
pub struct InvalidValue;

/// A scalar coercion function: input coercion (`parse_value`) or output
/// coercion (`serialize`).
pub type ScalarFn = Arc<dyn Fn(&Value) -> Result<Value, InvalidValue> + Send + Sync>;

/// The JSON primitive kinds a scalar may occupy. Documentation/codegen
/// metadata only; coercion is entirely driven by the scalar's functions.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Primitive {
    String,
    Number,
    Boolean,
    Unknown,
}

/// A scalar type definition: a leaf in the selection tree.
#[derive(Clone, Derivative)]
#[derivative(Debug)]
pub struct ScalarType {
    name: String,
    description: Option<String>,
    primitives: Vec<Primitive>,
    #[derivative(Debug = "ignore")]
    pub(crate) parse_value: Option<ScalarFn>,
    #[derivative(Debug = "ignore")]
    pub(crate) serialize: Option<ScalarFn>,
}

impl ScalarType {
    pub fn new(name: impl Into<String>) -> Self {
        ScalarType {
            name: name.into(),
            description: None,
            primitives: Vec::new(),
            parse_value: None,
            serialize: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn primitive(mut self, primitive: Primitive) -> Self {
        self.primitives.push(primitive);
        self
    }

    /// Input coercion applied to argument values; errors become argument
    /// errors naming this scalar.
    pub fn parse_value<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, InvalidValue> + Send + Sync + 'static,
    {
        self.parse_value = Some(Arc::new(f));
        self
    }

    /// Output coercion applied to resolved values; errors become result
    /// errors naming this scalar.
    pub fn serialize<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, InvalidValue> + Send + Sync + 'static,
    {
        self.serialize = Some(Arc::new(f));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn describe(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }
}
