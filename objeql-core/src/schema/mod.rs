mod input_type;
mod object_type;
mod root_resolver;
mod scalar;

pub use input_type::*;
pub use object_type::*;
pub use root_resolver::*;
pub use scalar::*;

use crate::error::ObjeqlError;
use crate::json_ext::is_primitive;
use crate::scalars;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// The reserved field name expanding to every selectable field of a type.
pub const WILDCARD_FIELD: &str = "*";

/// The internal lookup symbol: always accepted as a leaf selection marker,
/// regardless of the configured lookup value.
pub const LOOKUP_SYMBOL: &str = "__lookup";

/// The registry of every type and root operation the engine knows about.
///
/// Built once by the host at bootstrap and shared read-only between
/// concurrent requests; nothing in the engine mutates it after that.
#[derive(Debug)]
pub struct Schema {
    object_types: HashMap<String, Arc<ObjectType>>,
    input_types: HashMap<String, Arc<InputType>>,
    scalars: HashMap<String, Arc<ScalarType>>,
    root_resolvers: HashMap<String, Arc<RootResolver>>,
    lookup_value: Value,
}

impl Default for Schema {
    fn default() -> Self {
        Schema::new()
    }
}

impl Schema {
    /// An empty schema with the built-in scalars pre-registered and the
    /// lookup sentinel set to `true`.
    pub fn new() -> Self {
        let mut schema = Schema {
            object_types: HashMap::new(),
            input_types: HashMap::new(),
            scalars: HashMap::new(),
            root_resolvers: HashMap::new(),
            lookup_value: Value::Bool(true),
        };
        for scalar in [
            scalars::boolean(),
            scalars::number(),
            scalars::string(),
            scalars::unknown(),
        ] {
            schema
                .scalars
                .insert(scalar.name().to_string(), Arc::new(scalar));
        }
        schema
    }

    /// The configured "select this field" sentinel. Must be a JSON
    /// primitive so it can never be confused with a sub-selection.
    pub fn set_lookup_value(&mut self, value: Value) -> Result<(), ObjeqlError> {
        if !is_primitive(&value) {
            return Err(ObjeqlError::Initialization(
                "lookup value must be a JSON primitive".to_string(),
            ));
        }
        self.lookup_value = value;
        Ok(())
    }

    pub fn lookup_value(&self) -> &Value {
        &self.lookup_value
    }

    /// True if the query value marks "select this field's raw value":
    /// either the configured sentinel or the internal lookup symbol.
    pub fn is_lookup(&self, value: &Value) -> bool {
        *value == self.lookup_value
            || matches!(value, Value::String(s) if s == LOOKUP_SYMBOL)
    }

    pub fn register_object(&mut self, ty: ObjectType) -> Result<Arc<ObjectType>, ObjeqlError> {
        if self.object_types.contains_key(ty.name()) {
            return Err(already_registered("object type", ty.name()));
        }
        Ok(self.replace_object(ty))
    }

    /// Registration with the override flag set: replaces any existing
    /// definition of the same name.
    pub fn replace_object(&mut self, ty: ObjectType) -> Arc<ObjectType> {
        let ty = Arc::new(ty);
        self.object_types.insert(ty.name().to_string(), ty.clone());
        ty
    }

    pub fn register_input(&mut self, ty: InputType) -> Result<Arc<InputType>, ObjeqlError> {
        if self.input_types.contains_key(ty.name()) {
            return Err(already_registered("input type", ty.name()));
        }
        Ok(self.replace_input(ty))
    }

    pub fn replace_input(&mut self, ty: InputType) -> Arc<InputType> {
        let ty = Arc::new(ty);
        self.input_types.insert(ty.name().to_string(), ty.clone());
        ty
    }

    pub fn register_scalar(&mut self, ty: ScalarType) -> Result<Arc<ScalarType>, ObjeqlError> {
        if self.scalars.contains_key(ty.name()) {
            return Err(already_registered("scalar", ty.name()));
        }
        Ok(self.replace_scalar(ty))
    }

    pub fn replace_scalar(&mut self, ty: ScalarType) -> Arc<ScalarType> {
        let ty = Arc::new(ty);
        self.scalars.insert(ty.name().to_string(), ty.clone());
        ty
    }

    pub fn register_root_resolver(
        &mut self,
        resolver: RootResolver,
    ) -> Result<Arc<RootResolver>, ObjeqlError> {
        if self.root_resolvers.contains_key(resolver.name()) {
            return Err(already_registered("root resolver", resolver.name()));
        }
        let resolver = Arc::new(resolver);
        self.root_resolvers
            .insert(resolver.name().to_string(), resolver.clone());
        Ok(resolver)
    }

    pub fn object_type(&self, name: &str) -> Option<&Arc<ObjectType>> {
        self.object_types.get(name)
    }

    pub fn input_type(&self, name: &str) -> Option<&Arc<InputType>> {
        self.input_types.get(name)
    }

    pub fn scalar(&self, name: &str) -> Option<&Arc<ScalarType>> {
        self.scalars.get(name)
    }

    pub fn root_resolver(&self, name: &str) -> Option<&Arc<RootResolver>> {
        self.root_resolvers.get(name)
    }

    pub fn root_resolvers(&self) -> impl Iterator<Item = &Arc<RootResolver>> {
        self.root_resolvers.values()
    }
}

fn already_registered(what: &str, name: &str) -> ObjeqlError {
    ObjeqlError::Initialization(format!("{} '{}' already registered", what, name))
}
