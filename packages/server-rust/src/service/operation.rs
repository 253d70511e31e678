//! Request-scoped context handed to every operation.

use std::time::{Duration, Instant};

use axum::http::request::Parts;
use noderpc_core::Principal;
use tokio_util::sync::CancellationToken;

/// Header carrying the per-request identifier.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Context carried with every operation invocation.
///
/// `cancel` fires when the transport drops the request before a response was
/// produced. Long-running operations should observe it; the dispatcher never
/// interrupts them on its own.
#[derive(Debug, Clone)]
pub struct OperationContext {
    /// Value of `x-request-id`, or a fresh UUID when the header is absent.
    pub request_id: String,
    /// Registered path this operation is bound to.
    pub route: &'static str,
    /// Authenticated caller. `None` when no authentication layer is installed.
    pub principal: Option<Principal>,
    pub received_at: Instant,
    pub cancel: CancellationToken,
}

impl OperationContext {
    /// Creates a context with a fresh request id and no caller identity.
    #[must_use]
    pub fn new(route: &'static str) -> Self {
        Self {
            request_id: uuid::Uuid::new_v4().to_string(),
            route,
            principal: None,
            received_at: Instant::now(),
            cancel: CancellationToken::new(),
        }
    }

    /// Builds the context from the request head: request id header and the
    /// principal inserted by the authentication middleware.
    #[must_use]
    pub fn from_parts(route: &'static str, parts: &Parts, cancel: CancellationToken) -> Self {
        let request_id = parts
            .headers
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map_or_else(|| uuid::Uuid::new_v4().to_string(), str::to_string);

        Self {
            request_id,
            route,
            principal: parts.extensions.get::<Principal>().cloned(),
            received_at: Instant::now(),
            cancel,
        }
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.received_at.elapsed()
    }
}
