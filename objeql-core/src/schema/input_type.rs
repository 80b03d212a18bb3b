use super::scalar::ScalarType;
use super::Schema;
use crate::error::{FieldPath, ObjeqlError};
use crate::json_ext::Object;
use derivative::Derivative;
use indexmap::IndexMap;
use std::sync::Arc;

/// An argument's type reference. Mirrors [`super::TypeRef`] but resolves
/// into the input-type namespace.
#[derive(Clone, Derivative)]
#[derivative(Debug)]
pub enum InputRef {
    Input(Arc<InputType>),
    Scalar(Arc<ScalarType>),
    Lookup(String),
}

#[derive(Clone, Debug)]
pub(crate) enum ResolvedInput {
    Input(Arc<InputType>),
    Scalar(Arc<ScalarType>),
}

impl InputRef {
    pub(crate) fn resolve(&self, schema: &Schema) -> Option<ResolvedInput> {
        match self {
            InputRef::Input(input) => Some(ResolvedInput::Input(input.clone())),
            InputRef::Scalar(scalar) => Some(ResolvedInput::Scalar(scalar.clone())),
            InputRef::Lookup(name) => {
                if let Some(input) = schema.input_type(name) {
                    Some(ResolvedInput::Input(input.clone()))
                } else {
                    schema
                        .scalar(name)
                        .map(|scalar| ResolvedInput::Scalar(scalar.clone()))
                }
            }
        }
    }

    pub fn describe(&self) -> &str {
        match self {
            InputRef::Input(input) => input.name(),
            InputRef::Scalar(scalar) => scalar.name(),
            InputRef::Lookup(name) => name,
        }
    }
}

impl From<Arc<InputType>> for InputRef {
    fn from(input: Arc<InputType>) -> Self {
        InputRef::Input(input)
    }
}

impl From<InputType> for InputRef {
    fn from(input: InputType) -> Self {
        InputRef::Input(Arc::new(input))
    }
}

impl From<Arc<ScalarType>> for InputRef {
    fn from(scalar: Arc<ScalarType>) -> Self {
        InputRef::Scalar(scalar)
    }
}

impl From<ScalarType> for InputRef {
    fn from(scalar: ScalarType) -> Self {
        InputRef::Scalar(Arc::new(scalar))
    }
}

impl From<&str> for InputRef {
    fn from(name: &str) -> Self {
        InputRef::Lookup(name.to_string())
    }
}

impl From<String> for InputRef {
    fn from(name: String) -> Self {
        InputRef::Lookup(name)
    }
}

/// Declares one argument: its type, whether it must be supplied, and
/// whether it is an array of that type.
#[derive(Clone, Derivative)]
#[derivative(Debug)]
pub struct ArgDef {
    pub type_ref: InputRef,
    pub required: bool,
    pub is_array: bool,
}

impl ArgDef {
    pub fn new(type_ref: impl Into<InputRef>) -> Self {
        ArgDef {
            type_ref: type_ref.into(),
            required: false,
            is_array: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn list(mut self) -> Self {
        self.is_array = true;
        self
    }
}

/// A cross-field validator, invoked once per input object after all
/// per-field validation has passed.
pub type InputValidatorFn =
    Arc<dyn Fn(&Object, &FieldPath) -> Result<(), ObjeqlError> + Send + Sync>;

/// An input type definition: the declared shape of an arguments object.
#[derive(Clone, Derivative)]
#[derivative(Debug)]
pub struct InputType {
    name: String,
    description: Option<String>,
    fields: IndexMap<String, ArgDef>,
    #[derivative(Debug = "ignore")]
    pub(crate) validator: Option<InputValidatorFn>,
}

impl InputType {
    pub fn new(name: impl Into<String>) -> Self {
        InputType {
            name: name.into(),
            description: None,
            fields: IndexMap::new(),
            validator: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn field(mut self, name: impl Into<String>, def: ArgDef) -> Self {
        self.fields.insert(name.into(), def);
        self
    }

    /// Cross-field validation run after every declared field has been
    /// individually validated and coerced.
    pub fn validator<F>(mut self, f: F) -> Self
    where
        F: Fn(&Object, &FieldPath) -> Result<(), ObjeqlError> + Send + Sync + 'static,
    {
        self.validator = Some(Arc::new(f));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &IndexMap<String, ArgDef> {
        &self.fields
    }
}
