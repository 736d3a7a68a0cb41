//! HTTP server setup and handlers.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, timeout, request ID, request metrics)
//! - Turn query strings into ranked router lists
//! - Serve until the shutdown signal fires

use axum::{
    body::Body,
    extract::{RawQuery, State},
    http::{HeaderMap, Request},
    middleware::{self, Next},
    response::Response,
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::availability::AvailabilityStore;
use crate::config::LocatorConfig;
use crate::http::request::{request_id, UuidRequestId};
use crate::http::response::{HealthStatus, LocateResponse, SnapshotSummary};
use crate::observability::metrics;
use crate::routing::{QueryBuilder, QueryMatcher, QueryParams};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<AvailabilityStore>,
    pub matcher: Arc<QueryMatcher>,
}

impl AppState {
    pub fn new(store: Arc<AvailabilityStore>) -> Self {
        Self {
            store,
            matcher: Arc::new(QueryMatcher::new()),
        }
    }
}

/// HTTP server for the locator.
pub struct LocatorServer {
    router: Router,
}

impl LocatorServer {
    pub fn new(config: &LocatorConfig, store: Arc<AvailabilityStore>) -> Self {
        let timeout = Duration::from_secs(config.timeouts.request_secs);
        Self {
            router: build_router(AppState::new(store), timeout),
        }
    }

    /// The fully layered router, e.g. for driving with `oneshot` in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
#[allow(deprecated)]
pub fn build_router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/", get(locate_handler))
        .route("/locate", get(locate_handler))
        .route("/routers", get(routers_handler))
        .route("/health", get(health_handler))
        .with_state(state)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(middleware::from_fn(track_requests))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %req.method(),
                    uri = %req.uri(),
                    request_id = %request_id(req.headers()),
                )
            }),
        )
        .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
}

/// Count every response by its final status, timeouts and 404s included.
async fn track_requests(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let response = next.run(request).await;
    metrics::record_request(response.status().as_u16(), start);
    response
}

/// Build queries from the query string and match each against the
/// current snapshot.
async fn locate_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    RawQuery(qs): RawQuery,
) -> Json<LocateResponse> {
    let params = QueryParams::from_query_string(qs.as_deref().unwrap_or(""));
    let built = QueryBuilder::build(&params);

    for diag in &built.diagnostics {
        tracing::debug!(
            request_id = %request_id(&headers),
            param = diag.param(),
            detail = %diag,
            "Request parameter defaulted"
        );
        metrics::record_param_defaulted(diag.param());
    }

    let snapshot = state.store.load();
    let results = state.matcher.execute_all(&built.queries, &snapshot.routers);

    for (query, routers) in built.queries.iter().zip(&results) {
        metrics::record_query(&query.transport, routers.len());
    }

    tracing::debug!(
        request_id = %request_id(&headers),
        queries = built.queries.len(),
        generation = snapshot.generation,
        candidates = snapshot.routers.len(),
        "Queries matched"
    );

    let response = LocateResponse::encode(
        snapshot.generation,
        &built.queries,
        &results,
        state.matcher.distance(),
    );
    Json(response)
}

async fn routers_handler(State(state): State<AppState>) -> Json<SnapshotSummary> {
    let snapshot = state.store.load();
    Json(SnapshotSummary {
        generation: snapshot.generation,
        routers: snapshot.routers.len(),
        ids: snapshot.routers.iter().map(|r| r.id.clone()).collect(),
    })
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
        generation: state.store.load().generation,
    })
}
