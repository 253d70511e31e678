//! Route registry: maps request paths to JSON handlers.
//!
//! The table is assembled once at startup and frozen behind an `Arc`. Lookup
//! is an exact match on the request path; anything unmatched goes to the
//! catch-all fallback, which produces the not-found error.

use std::collections::HashMap;
use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use tokio_util::sync::CancellationToken;
use tower::Service;

use super::error::{ApiError, BuildError};
use super::handler::JsonHandler;
use super::operation::OperationContext;

/// Route id reported for requests served by the catch-all.
pub const CATCH_ALL_ROUTE: &str = "*";

// ---------------------------------------------------------------------------
// RouteTable
// ---------------------------------------------------------------------------

/// Frozen path -> handler mapping plus the catch-all.
#[derive(Debug)]
pub struct RouteTable {
    routes: HashMap<&'static str, JsonHandler>,
    fallback: JsonHandler,
}

impl RouteTable {
    /// Starts a table whose unmatched paths answer with `not found`.
    #[must_use]
    pub fn builder() -> RouteTableBuilder {
        RouteTableBuilder::new(JsonHandler::fail(ApiError::not_found))
    }

    /// Returns the handler registered for `path`, or the catch-all.
    #[must_use]
    pub fn resolve(&self, path: &str) -> (&'static str, &JsonHandler) {
        match self.routes.get_key_value(path) {
            Some((route, handler)) => (route, handler),
            None => (CATCH_ALL_ROUTE, &self.fallback),
        }
    }

    /// Registered path equal to `path`, if any. The catch-all never matches.
    #[must_use]
    pub fn route_id(&self, path: &str) -> Option<&'static str> {
        self.routes.get_key_value(path).map(|(route, _)| *route)
    }

    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.routes.contains_key(path)
    }

    /// Registered paths in lexicographic order.
    #[must_use]
    pub fn paths(&self) -> Vec<&'static str> {
        let mut paths: Vec<_> = self.routes.keys().copied().collect();
        paths.sort_unstable();
        paths
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

// ---------------------------------------------------------------------------
// RouteTableBuilder
// ---------------------------------------------------------------------------

/// Collects registrations. Registering a path twice is a build error.
#[derive(Debug)]
pub struct RouteTableBuilder {
    routes: HashMap<&'static str, JsonHandler>,
    fallback: JsonHandler,
}

impl RouteTableBuilder {
    #[must_use]
    pub fn new(fallback: JsonHandler) -> Self {
        Self {
            routes: HashMap::new(),
            fallback,
        }
    }

    /// Registers `handler` under `path`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidPath`] if `path` is not of the form
    /// `/segment[/segment...]` with lowercase ASCII letters, digits and
    /// dashes, and [`BuildError::DuplicateRoute`] if it is already taken.
    pub fn route(&mut self, path: &'static str, handler: JsonHandler) -> Result<&mut Self, BuildError> {
        if !is_valid_path(path) {
            return Err(BuildError::InvalidPath(path));
        }
        if self.routes.contains_key(path) {
            return Err(BuildError::DuplicateRoute(path));
        }
        self.routes.insert(path, handler);
        Ok(self)
    }

    #[must_use]
    pub fn build(self) -> RouteTable {
        RouteTable {
            routes: self.routes,
            fallback: self.fallback,
        }
    }
}

fn is_valid_path(path: &str) -> bool {
    let Some(rest) = path.strip_prefix('/') else {
        return false;
    };
    !rest.is_empty()
        && rest.split('/').all(|segment| {
            !segment.is_empty()
                && segment
                    .bytes()
                    .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
        })
}

// ---------------------------------------------------------------------------
// RouteDispatch
// ---------------------------------------------------------------------------

/// Innermost service of the chain: resolves the path and runs the handler.
///
/// Every request gets a cancellation token that fires if the transport drops
/// the response future before the handler finishes.
#[derive(Debug, Clone)]
pub struct RouteDispatch {
    table: Arc<RouteTable>,
}

impl RouteDispatch {
    #[must_use]
    pub fn new(table: Arc<RouteTable>) -> Self {
        Self { table }
    }
}

impl Service<Request<Body>> for RouteDispatch {
    type Response = Response;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Response, Infallible>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let table = Arc::clone(&self.table);
        Box::pin(async move {
            let (parts, body) = req.into_parts();
            let (route, handler) = table.resolve(parts.uri.path());

            let cancel = CancellationToken::new();
            let guard = cancel.clone().drop_guard();
            let ctx = OperationContext::from_parts(route, &parts, cancel);

            let resp = handler.handle(ctx, body).await;
            guard.disarm();
            Ok(resp)
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
