//! Query-description engine: callers submit a nested selection object
//! describing which fields of a registered schema they want; the engine
//! validates the selection, builds a resolution tree, executes resolver and
//! batch-loader functions over it, and validates/serializes the result.

mod error;
mod execution;
mod json_ext;
mod request;
mod response;
pub mod scalars;
mod schema;
mod traits;

pub use error::*;
pub use execution::*;
pub use json_ext::Object;
pub use request::*;
pub use response::*;
pub use schema::*;
pub use traits::*;
