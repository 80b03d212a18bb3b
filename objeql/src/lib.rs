//! HTTP binding for the objeql engine: a single-endpoint POST handler plus
//! optional REST-style routes, built on axum.

mod router;

pub use objeql_core::*;
pub use router::*;
