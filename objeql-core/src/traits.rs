use crate::error::{FieldPath, ObjeqlError};
use crate::json_ext::Object;
use futures::future::BoxFuture;
use serde_json::Value;

/// Transport-level request state shared read-only with every resolver and
/// loader for the duration of one request.
#[derive(Debug, Default)]
pub struct RequestContext {
    /// The incoming request headers, when the request arrived over HTTP.
    pub headers: http::HeaderMap,

    /// Arbitrary host-supplied data (auth principal, locale, ...).
    pub extensions: Object,
}

/// The standardized input handed to every [`Resolver`].
///
/// One struct for all callback kinds so schema authors only learn a single
/// shape; unused members are simply ignored.
#[derive(Clone, Copy, Debug)]
pub struct ResolverInfo<'a> {
    pub request: &'a RequestContext,
    pub field_path: &'a FieldPath,
    /// Parsed, coerced arguments for this node, if any were supplied.
    pub args: Option<&'a Value>,
    /// The residual sub-query below this node (without `__args`).
    pub query: &'a Object,
    /// The value currently materialized at this node, if any.
    pub field_value: &'a Value,
    /// A snapshot of the parent object, taken before sibling resolution.
    pub parent_value: Option<&'a Value>,
    /// Per-request scratch value threaded through the whole tree walk.
    pub data: &'a Value,
}

/// The input handed to a [`Loader`] for one batched lookup.
#[derive(Clone, Copy, Debug)]
pub struct LoaderInfo<'a> {
    pub request: &'a RequestContext,
    pub field_path: &'a FieldPath,
    /// `{"id": [k1, k2, ...]}` — the distinct keys to load.
    pub args: &'a Value,
    /// The sub-query describing which fields of each record are wanted.
    pub query: &'a Object,
}

pub type ResolveFuture<'a> = BoxFuture<'a, Result<Value, ObjeqlError>>;

/// A field- or root-level resolver function.
///
/// Resolvers may suspend on I/O; the executor awaits them one node at a time
/// while sibling nodes run concurrently.
pub trait Resolver: Send + Sync {
    fn resolve<'a>(&'a self, info: ResolverInfo<'a>) -> ResolveFuture<'a>;
}

// we need this so plain functions returning boxed futures can be used as
// resolvers without a wrapper struct
impl<F> Resolver for F
where
    F: for<'a> Fn(ResolverInfo<'a>) -> ResolveFuture<'a>,
    F: Send + Sync,
{
    fn resolve<'a>(&'a self, info: ResolverInfo<'a>) -> ResolveFuture<'a> {
        (self)(info)
    }
}

/// A batched lookup resolving many sibling records' values for one field in
/// a single call, keyed by a shared identifier.
///
/// Must return an array of records each carrying an `"id"` member; the
/// aggregator joins them back to the siblings by that key.
pub trait Loader: Send + Sync {
    fn load<'a>(&'a self, info: LoaderInfo<'a>) -> ResolveFuture<'a>;
}

impl<F> Loader for F
where
    F: for<'a> Fn(LoaderInfo<'a>) -> ResolveFuture<'a>,
    F: Send + Sync,
{
    fn load<'a>(&'a self, info: LoaderInfo<'a>) -> ResolveFuture<'a> {
        (self)(info)
    }
}
