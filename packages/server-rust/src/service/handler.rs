//! JSON handler adapter.
//!
//! Turns a typed operation into a uniform request handler. Operations come
//! in a closed set of shapes, chosen by the constructor used at registration:
//!
//! | Constructor            | Input            | Success body       |
//! |------------------------|------------------|--------------------|
//! | [`JsonHandler::query`] | none (body unread) | JSON result      |
//! | [`JsonHandler::call`]  | JSON-decoded `I` | JSON result        |
//! | [`JsonHandler::exec`]  | JSON-decoded `I` | empty              |
//! | [`JsonHandler::fail`]  | none             | never succeeds     |
//!
//! The constructors are generic over the operation's input, output and error
//! types, so an operation whose signature cannot be bridged fails to compile
//! instead of failing per request.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::error::ApiError;
use super::middleware::body_limit::body_read_rejection;
use super::operation::OperationContext;

// ---------------------------------------------------------------------------
// Type-erased invocation
// ---------------------------------------------------------------------------

type BoxedFuture = Pin<Box<dyn Future<Output = Result<Reply, ApiError>> + Send>>;

type Invoke = Arc<dyn Fn(OperationContext, Bytes) -> BoxedFuture + Send + Sync>;

/// Encoded outcome of a successful operation.
enum Reply {
    Json(Vec<u8>),
    Empty,
}

/// Input/output shape of a registered operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Query,
    Call,
    Exec,
    Fail,
}

impl Shape {
    /// Whether the request body is read and decoded for this shape.
    #[must_use]
    pub fn takes_input(self) -> bool {
        matches!(self, Self::Call | Self::Exec)
    }
}

// ---------------------------------------------------------------------------
// JsonHandler
// ---------------------------------------------------------------------------

/// A typed operation bridged to JSON in, JSON out.
///
/// Cloning is cheap: the operation is shared behind an `Arc`.
#[derive(Clone)]
pub struct JsonHandler {
    shape: Shape,
    invoke: Invoke,
}

impl JsonHandler {
    /// Bridges an operation that takes no input.
    pub fn query<S, F, Fut, O, E>(state: S, op: F) -> Self
    where
        S: Clone + Send + Sync + 'static,
        F: Fn(S, OperationContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<O, E>> + Send + 'static,
        O: Serialize,
        E: Into<ApiError>,
    {
        let invoke = move |ctx: OperationContext, _body: Bytes| -> BoxedFuture {
            let fut = op(state.clone(), ctx);
            Box::pin(async move { encode(&fut.await.map_err(Into::into)?) })
        };
        Self {
            shape: Shape::Query,
            invoke: Arc::new(invoke),
        }
    }

    /// Bridges an operation that decodes `I` from the body and returns a result.
    pub fn call<S, F, Fut, I, O, E>(state: S, op: F) -> Self
    where
        S: Clone + Send + Sync + 'static,
        F: Fn(S, OperationContext, I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<O, E>> + Send + 'static,
        I: DeserializeOwned,
        O: Serialize,
        E: Into<ApiError>,
    {
        let invoke = move |ctx: OperationContext, body: Bytes| -> BoxedFuture {
            let input = match decode::<I>(&body) {
                Ok(input) => input,
                Err(err) => return Box::pin(async move { Err(err) }),
            };
            let fut = op(state.clone(), ctx, input);
            Box::pin(async move { encode(&fut.await.map_err(Into::into)?) })
        };
        Self {
            shape: Shape::Call,
            invoke: Arc::new(invoke),
        }
    }

    /// Bridges an operation that decodes `I` from the body and produces no result.
    pub fn exec<S, F, Fut, I, E>(state: S, op: F) -> Self
    where
        S: Clone + Send + Sync + 'static,
        F: Fn(S, OperationContext, I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        I: DeserializeOwned,
        E: Into<ApiError>,
    {
        let invoke = move |ctx: OperationContext, body: Bytes| -> BoxedFuture {
            let input = match decode::<I>(&body) {
                Ok(input) => input,
                Err(err) => return Box::pin(async move { Err(err) }),
            };
            let fut = op(state.clone(), ctx, input);
            Box::pin(async move {
                fut.await.map_err(Into::into)?;
                Ok(Reply::Empty)
            })
        };
        Self {
            shape: Shape::Exec,
            invoke: Arc::new(invoke),
        }
    }

    /// A handler that always fails with the error produced by `make`.
    #[must_use]
    pub fn fail(make: fn() -> ApiError) -> Self {
        let invoke = move |_ctx: OperationContext, _body: Bytes| -> BoxedFuture {
            Box::pin(async move { Err(make()) })
        };
        Self {
            shape: Shape::Fail,
            invoke: Arc::new(invoke),
        }
    }

    #[must_use]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Reads the body (only if the shape takes input), invokes the operation
    /// and writes exactly one response.
    pub async fn handle(&self, ctx: OperationContext, body: Body) -> Response {
        let input = if self.shape.takes_input() {
            match axum::body::to_bytes(body, usize::MAX).await {
                Ok(bytes) => bytes,
                Err(err) => return body_read_rejection(&err),
            }
        } else {
            Bytes::new()
        };

        match (self.invoke)(ctx, input).await {
            Ok(Reply::Json(bytes)) => {
                (StatusCode::OK, [(CONTENT_TYPE, "application/json")], bytes).into_response()
            }
            Ok(Reply::Empty) => StatusCode::OK.into_response(),
            Err(err) => err.into_response(),
        }
    }
}

impl fmt::Debug for JsonHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonHandler")
            .field("shape", &self.shape)
            .finish_non_exhaustive()
    }
}

fn decode<I: DeserializeOwned>(body: &[u8]) -> Result<I, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::bad_request(e.to_string()))
}

fn encode<O: Serialize>(out: &O) -> Result<Reply, ApiError> {
    serde_json::to_vec(out)
        .map(Reply::Json)
        .map_err(|e| ApiError::internal(format!("failed to encode response: {e}")))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
