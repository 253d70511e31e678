//! Request body ceiling.
//!
//! Requests that declare an oversized `Content-Length` are refused up front.
//! All other bodies are wrapped in [`Limited`], so a chunked or lying client
//! fails on the first chunk that crosses the ceiling instead of being
//! buffered in full. The resulting read error is turned into a plain-text
//! `413` by [`body_read_rejection`].

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::http::header::CONTENT_LENGTH;
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use http_body_util::{LengthLimitError, Limited};
use tower::{Layer, Service};

/// Default ceiling, in bytes.
pub const DEFAULT_MAX_BODY_BYTES: usize = 10_000_000;

// ---------------------------------------------------------------------------
// BodyLimitLayer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub struct BodyLimitLayer {
    max_bytes: usize,
}

impl BodyLimitLayer {
    #[must_use]
    pub fn new(max_bytes: usize) -> Self {
        Self { max_bytes }
    }
}

impl Default for BodyLimitLayer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_BODY_BYTES)
    }
}

impl<S> Layer<S> for BodyLimitLayer {
    type Service = BodyLimitService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        BodyLimitService {
            inner,
            max_bytes: self.max_bytes,
        }
    }
}

// ---------------------------------------------------------------------------
// BodyLimitService
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct BodyLimitService<S> {
    inner: S,
    max_bytes: usize,
}

impl<S> Service<Request<Body>> for BodyLimitService<S>
where
    S: Service<Request<Body>, Response = Response> + Send,
    S::Future: Send + 'static,
    S::Error: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Response, S::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let declared = req
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());

        let max = u64::try_from(self.max_bytes).unwrap_or(u64::MAX);
        if declared.is_some_and(|len| len > max) {
            tracing::debug!(
                declared = declared,
                max_bytes = self.max_bytes,
                "request body exceeds ceiling"
            );
            return Box::pin(async { Ok(payload_too_large()) });
        }

        let max_bytes = self.max_bytes;
        let req = req.map(|body| Body::new(Limited::new(body, max_bytes)));
        Box::pin(self.inner.call(req))
    }
}

/// Maps a failed body read to a plain-text client error.
///
/// Reads that failed because the ceiling was crossed answer `413`; any other
/// transport failure answers `400`.
#[must_use]
pub fn body_read_rejection(err: &axum::Error) -> Response {
    let mut source: Option<&(dyn StdError + 'static)> = Some(err);
    while let Some(e) = source {
        if e.is::<LengthLimitError>() {
            return payload_too_large();
        }
        source = e.source();
    }
    tracing::debug!(error = %err, "failed to read request body");
    (StatusCode::BAD_REQUEST, "failed to read request body").into_response()
}

fn payload_too_large() -> Response {
    (StatusCode::PAYLOAD_TOO_LARGE, "length limit exceeded").into_response()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
