use super::input_type::ArgDef;
use super::scalar::ScalarType;
use super::Schema;
use crate::traits::{Loader, Resolver};
use derivative::Derivative;
use indexmap::IndexMap;
use std::sync::Arc;

/// A field's type reference. `Lookup` defers resolution by name until tree
/// build time, which is what allows object types to reference each other
/// before the referent is registered.
#[derive(Clone, Derivative)]
#[derivative(Debug)]
pub enum TypeRef {
    Scalar(Arc<ScalarType>),
    Object(Arc<ObjectType>),
    Lookup(String),
}

/// A type reference resolved against the schema: either a leaf or a node
/// with sub-selectable fields.
#[derive(Clone, Debug)]
pub(crate) enum ResolvedType {
    Scalar(Arc<ScalarType>),
    Object(Arc<ObjectType>),
}

impl TypeRef {
    /// Resolve one level of by-name indirection. Object types shadow
    /// scalars when both carry the same name.
    pub(crate) fn resolve(&self, schema: &Schema) -> Option<ResolvedType> {
        match self {
            TypeRef::Scalar(scalar) => Some(ResolvedType::Scalar(scalar.clone())),
            TypeRef::Object(object) => Some(ResolvedType::Object(object.clone())),
            TypeRef::Lookup(name) => {
                if let Some(object) = schema.object_type(name) {
                    Some(ResolvedType::Object(object.clone()))
                } else {
                    schema
                        .scalar(name)
                        .map(|scalar| ResolvedType::Scalar(scalar.clone()))
                }
            }
        }
    }

    /// The name to report when resolution fails.
    pub fn describe(&self) -> &str {
        match self {
            TypeRef::Scalar(scalar) => scalar.name(),
            TypeRef::Object(object) => object.name(),
            TypeRef::Lookup(name) => name,
        }
    }
}

impl From<Arc<ScalarType>> for TypeRef {
    fn from(scalar: Arc<ScalarType>) -> Self {
        TypeRef::Scalar(scalar)
    }
}

impl From<ScalarType> for TypeRef {
    fn from(scalar: ScalarType) -> Self {
        TypeRef::Scalar(Arc::new(scalar))
    }
}

impl From<Arc<ObjectType>> for TypeRef {
    fn from(object: Arc<ObjectType>) -> Self {
        TypeRef::Object(object)
    }
}

impl From<ObjectType> for TypeRef {
    fn from(object: ObjectType) -> Self {
        TypeRef::Object(Arc::new(object))
    }
}

impl From<&str> for TypeRef {
    fn from(name: &str) -> Self {
        TypeRef::Lookup(name.to_string())
    }
}

impl From<String> for TypeRef {
    fn from(name: String) -> Self {
        TypeRef::Lookup(name)
    }
}

/// One field of an object type (or the result shape of a root resolver).
///
/// Cheap to clone: everything behind it is either plain data or an `Arc`.
#[derive(Clone, Derivative)]
#[derivative(Debug)]
pub struct FieldDef {
    pub type_ref: TypeRef,
    pub is_array: bool,
    pub allow_null: bool,
    /// Required on write paths; metadata for hosts and codegen.
    pub required: bool,
    /// Hidden fields are invisible to queries and rejected at build time.
    pub hidden: bool,
    /// Skip this node's own resolver; an ancestor resolver populates it.
    pub defer: bool,
    pub args: Option<ArgDef>,
    pub description: Option<String>,
    #[derivative(Debug = "ignore")]
    pub resolver: Option<Arc<dyn Resolver>>,
    #[derivative(Debug = "ignore")]
    pub loader: Option<Arc<dyn Loader>>,
}

impl FieldDef {
    pub fn new(type_ref: impl Into<TypeRef>) -> Self {
        FieldDef {
            type_ref: type_ref.into(),
            is_array: false,
            allow_null: false,
            required: false,
            hidden: false,
            defer: false,
            args: None,
            description: None,
            resolver: None,
            loader: None,
        }
    }

    /// An anonymous nullable field wrapping a bare type, used to start a
    /// tree build without a named parent field.
    pub fn anonymous(type_ref: impl Into<TypeRef>) -> Self {
        FieldDef::new(type_ref).allow_null()
    }

    pub fn list(mut self) -> Self {
        self.is_array = true;
        self
    }

    pub fn allow_null(mut self) -> Self {
        self.allow_null = true;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn defer(mut self) -> Self {
        self.defer = true;
        self
    }

    pub fn args(mut self, args: ArgDef) -> Self {
        self.args = Some(args);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn resolver(mut self, resolver: impl Resolver + 'static) -> Self {
        self.resolver = Some(Arc::new(resolver));
        self
    }

    pub fn loader(mut self, loader: impl Loader + 'static) -> Self {
        self.loader = Some(Arc::new(loader));
        self
    }
}

/// An object type definition: a named, fixed set of fields. Immutable once
/// registered.
#[derive(Clone, Derivative)]
#[derivative(Debug)]
pub struct ObjectType {
    name: String,
    description: Option<String>,
    fields: IndexMap<String, FieldDef>,
}

impl ObjectType {
    pub fn new(name: impl Into<String>) -> Self {
        ObjectType {
            name: name.into(),
            description: None,
            fields: IndexMap::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn field(mut self, name: impl Into<String>, def: FieldDef) -> Self {
        self.fields.insert(name.into(), def);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn describe(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn fields(&self) -> &IndexMap<String, FieldDef> {
        &self.fields
    }
}
