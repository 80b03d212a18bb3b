use displaydoc::Display;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The ordered chain of field names from the query root to a point in the
/// selection, used to locate errors precisely.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    pub fn new() -> Self {
        Self::default()
    }

    /// A path rooted at a single operation name.
    pub fn root(name: impl Into<String>) -> Self {
        FieldPath(vec![name.into()])
    }

    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldPath(segments.into_iter().map(Into::into).collect())
    }

    /// Returns a new path extended by one field name.
    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(name.into());
        FieldPath(segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FieldPath {
    // rendered the way clients see it: `root.user.name`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "root")?;
        for segment in &self.0 {
            write!(f, ".{}", segment)?;
        }
        Ok(())
    }
}

/// Errors raised while walking a selection shape against the schema.
#[derive(Clone, Debug, Display, Eq, PartialEq)]
pub enum QueryErrorKind {
    /// Type '{0}' not found
    TypeNotFound(String),
    /// Unknown field
    UnknownField,
    /// Hidden field
    HiddenField,
    /// Invalid field RHS
    InvalidFieldValue,
    /// Scalar node can only accept __args and no other field
    LeafWithSubfields,
    /// Resolved node must be an object with nested fields
    LookupOnObject,
    /// Args required
    ArgsRequired,
    /// Request body must be object
    BodyNotObject,
    /// Exactly 1 root operation required
    ExactlyOneOperation,
    /// Unrecognized root operation '{0}'
    UnknownOperation(String),
}

/// Errors raised while validating and coercing arguments.
#[derive(Clone, Debug, Display, Eq, PartialEq)]
pub enum ArgsErrorKind {
    /// Not expecting any args
    Unexpected,
    /// Args is required
    Required,
    /// Array expected
    ArrayExpected,
    /// Object expected
    ObjectExpected,
    /// Unknown input type '{0}'
    UnknownInputType(String),
    /// Unknown args '{0}'
    UnknownArgs(String),
    /// Invalid scalar value for '{0}'
    InvalidScalarValue(String),
    /// {0}
    Invalid(String),
}

/// Errors raised while validating and serializing resolved results.
#[derive(Clone, Debug, Display, Eq, PartialEq)]
pub enum ResultErrorKind {
    /// Array expected
    ArrayExpected,
    /// Object expected
    ObjectExpected,
    /// Null value not allowed
    NullValueNotAllowed,
    /// Invalid scalar value for '{0}'
    InvalidScalarValue(String),
}

/// Any error produced by the engine.
///
/// Every request-time variant carries the field path locating the failure;
/// `Initialization` is only ever raised while the schema is being built and
/// is fatal to bootstrap.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ObjeqlError {
    /// Schema registration or configuration failure.
    #[error("{0}")]
    Initialization(String),

    /// The requested selection shape does not match the schema.
    #[error("{kind} at field '{path}'")]
    Query { kind: QueryErrorKind, path: FieldPath },

    /// The supplied arguments do not match their declared input type.
    #[error("{kind} at field '{path}'")]
    Args { kind: ArgsErrorKind, path: FieldPath },

    /// The resolved data does not match the declared result shape.
    #[error("{kind} at field '{path}'")]
    Result { kind: ResultErrorKind, path: FieldPath },

    /// An error escaping a resolver or loader that is not one of the
    /// defined kinds, wrapped with its original message.
    #[error("{message} at field '{path}'")]
    Resolver { message: String, path: FieldPath },
}

impl ObjeqlError {
    pub fn query(kind: QueryErrorKind, path: &FieldPath) -> Self {
        ObjeqlError::Query {
            kind,
            path: path.clone(),
        }
    }

    pub fn args(kind: ArgsErrorKind, path: &FieldPath) -> Self {
        ObjeqlError::Args {
            kind,
            path: path.clone(),
        }
    }

    pub fn result(kind: ResultErrorKind, path: &FieldPath) -> Self {
        ObjeqlError::Result {
            kind,
            path: path.clone(),
        }
    }

    /// Wrap an arbitrary resolver/loader failure message.
    pub fn resolver(message: impl Into<String>) -> Self {
        ObjeqlError::Resolver {
            message: message.into(),
            path: FieldPath::new(),
        }
    }

    /// The message without the field-path suffix, as sent on the wire.
    pub fn message(&self) -> String {
        match self {
            ObjeqlError::Initialization(message) => message.clone(),
            ObjeqlError::Query { kind, .. } => kind.to_string(),
            ObjeqlError::Args { kind, .. } => kind.to_string(),
            ObjeqlError::Result { kind, .. } => kind.to_string(),
            ObjeqlError::Resolver { message, .. } => message.clone(),
        }
    }

    pub fn field_path(&self) -> Option<&FieldPath> {
        match self {
            ObjeqlError::Initialization(_) => None,
            ObjeqlError::Query { path, .. }
            | ObjeqlError::Args { path, .. }
            | ObjeqlError::Result { path, .. }
            | ObjeqlError::Resolver { path, .. } => Some(path),
        }
    }

    /// All defined taxonomy kinds are client-input errors; anything escaping
    /// a resolver unclassified is a server-side failure.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ObjeqlError::Query { .. }
            | ObjeqlError::Args { .. }
            | ObjeqlError::Result { .. } => StatusCode::BAD_REQUEST,
            ObjeqlError::Initialization(_) | ObjeqlError::Resolver { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}
