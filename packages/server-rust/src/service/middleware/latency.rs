//! Per-route latency capture.
//!
//! Wraps dispatch. For a request whose path is a registered route, the time
//! from just before dispatch until the handler has produced its response
//! (JSON decode and encode included) is handed to a [`LatencySink`] under the
//! route's path. Failures, timeouts and dropped requests are timed like
//! successes, exactly once each. Catch-all requests are never timed.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use tower::{Layer, Service};

use crate::service::router::RouteTable;

/// Histogram name used by [`MetricsLatencySink`].
pub const REQUEST_DURATION_METRIC: &str = "noderpc_request_duration_seconds";

// ---------------------------------------------------------------------------
// LatencySink
// ---------------------------------------------------------------------------

/// Receiver of latency samples. Called concurrently from every in-flight
/// request; implementations synchronize themselves.
pub trait LatencySink: Send + Sync {
    fn record(&self, route: &'static str, elapsed: Duration);
}

/// Records samples into the `metrics` facade as a histogram labelled by route.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsLatencySink;

impl LatencySink for MetricsLatencySink {
    fn record(&self, route: &'static str, elapsed: Duration) {
        metrics::histogram!(REQUEST_DURATION_METRIC, "route" => route).record(elapsed.as_secs_f64());
    }
}

// ---------------------------------------------------------------------------
// LatencyLayer
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct LatencyLayer {
    table: Arc<RouteTable>,
    sink: Arc<dyn LatencySink>,
}

impl LatencyLayer {
    #[must_use]
    pub fn new(table: Arc<RouteTable>, sink: Arc<dyn LatencySink>) -> Self {
        Self { table, sink }
    }
}

impl<S> Layer<S> for LatencyLayer {
    type Service = LatencyService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        LatencyService {
            inner,
            table: Arc::clone(&self.table),
            sink: Arc::clone(&self.sink),
        }
    }
}

// ---------------------------------------------------------------------------
// LatencyService
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct LatencyService<S> {
    inner: S,
    table: Arc<RouteTable>,
    sink: Arc<dyn LatencySink>,
}

impl<S> Service<Request<Body>> for LatencyService<S>
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
        let Some(route) = self.table.route_id(req.uri().path()) else {
            return Box::pin(self.inner.call(req));
        };

        let timer = RouteTimer {
            sink: Arc::clone(&self.sink),
            route,
            start: Instant::now(),
        };
        let fut = self.inner.call(req);

        Box::pin(async move {
            let result = fut.await;
            if let Ok(resp) = &result {
                #[allow(clippy::cast_possible_truncation)]
                let duration_ms = timer.start.elapsed().as_millis() as u64;
                tracing::debug!(
                    route,
                    status = resp.status().as_u16(),
                    duration_ms,
                    "request complete"
                );
            }
            drop(timer);
            result
        })
    }
}

/// Records one sample when dropped, so a request abandoned by a timeout or a
/// disconnect is timed like one that completed.
struct RouteTimer {
    sink: Arc<dyn LatencySink>,
    route: &'static str,
    start: Instant,
}

impl Drop for RouteTimer {
    fn drop(&mut self) {
        self.sink.record(self.route, self.start.elapsed());
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use noderpc_core::ServiceError;
    use tokio::sync::Notify;
    use tower::ServiceExt;
    use tower_http::timeout::TimeoutLayer;

    use super::*;
    use crate::service::handler::JsonHandler;
    use crate::service::router::RouteDispatch;
    use crate::testing::RecordingSink;

    fn table() -> Arc<RouteTable> {
        let mut builder = RouteTable::builder();
        builder
            .route(
                "/ok",
                JsonHandler::query((), |(), _ctx| async { Ok::<_, ServiceError>(1) }),
            )
            .unwrap()
            .route(
                "/fails",
                JsonHandler::query((), |(), _ctx| async {
                    Err::<u8, _>(ServiceError::Unavailable("syncing".into()))
                }),
            )
            .unwrap();
        Arc::new(builder.build())
    }

    async fn send(sink: &Arc<RecordingSink>, path: &str) -> StatusCode {
        let table = table();
        let svc = LatencyLayer::new(Arc::clone(&table), Arc::clone(sink) as Arc<dyn LatencySink>)
            .layer(RouteDispatch::new(table));
        let req = Request::post(path).body(Body::empty()).unwrap();
        svc.oneshot(req).await.unwrap().status()
    }

    #[tokio::test]
    async fn records_successful_requests_once() {
        let sink = Arc::new(RecordingSink::default());
        assert_eq!(send(&sink, "/ok").await, StatusCode::OK);
        assert_eq!(sink.routes(), vec!["/ok"]);
    }

    #[tokio::test]
    async fn records_failing_requests() {
        let sink = Arc::new(RecordingSink::default());
        assert_eq!(send(&sink, "/fails").await, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(sink.routes(), vec!["/fails"]);
    }

    #[tokio::test]
    async fn never_records_catch_all() {
        let sink = Arc::new(RecordingSink::default());
        assert_eq!(send(&sink, "/unknown").await, StatusCode::NOT_FOUND);
        assert!(sink.routes().is_empty());
    }

    fn slow_table(entered: Arc<Notify>) -> Arc<RouteTable> {
        let mut builder = RouteTable::builder();
        builder
            .route(
                "/build-transaction",
                JsonHandler::query(entered, |entered, _ctx| async move {
                    entered.notify_one();
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    Ok::<_, ServiceError>(())
                }),
            )
            .unwrap();
        Arc::new(builder.build())
    }

    #[tokio::test(start_paused = true)]
    async fn records_requests_cut_off_by_timeout() {
        let sink = Arc::new(RecordingSink::default());
        let table = slow_table(Arc::new(Notify::new()));
        let svc = tower::ServiceBuilder::new()
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                Duration::from_secs(30),
            ))
            .layer(LatencyLayer::new(
                Arc::clone(&table),
                Arc::clone(&sink) as Arc<dyn LatencySink>,
            ))
            .service(RouteDispatch::new(table));

        let req = Request::post("/build-transaction").body(Body::empty()).unwrap();
        let resp = svc.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(sink.routes(), vec!["/build-transaction"]);
    }

    #[tokio::test]
    async fn records_requests_dropped_mid_flight() {
        let sink = Arc::new(RecordingSink::default());
        let entered = Arc::new(Notify::new());
        let table = slow_table(Arc::clone(&entered));
        let svc = LatencyLayer::new(Arc::clone(&table), Arc::clone(&sink) as Arc<dyn LatencySink>)
            .layer(RouteDispatch::new(table));

        let req = Request::post("/build-transaction").body(Body::empty()).unwrap();
        let pending = tokio::spawn(svc.oneshot(req));
        entered.notified().await;
        assert!(sink.routes().is_empty());

        pending.abort();
        let _ = pending.await;
        assert_eq!(sink.routes(), vec!["/build-transaction"]);
    }

    #[test]
    fn metrics_sink_records_without_recorder() {
        // No global recorder installed: the facade is a no-op and must not panic.
        MetricsLatencySink.record("/info", Duration::from_millis(3));
    }
}
