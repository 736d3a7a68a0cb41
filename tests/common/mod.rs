//! Shared fixtures for integration tests.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

use relay_locator::availability::AvailabilityStore;
use relay_locator::http::{build_router, AppState};
use relay_locator::model::{CapabilitySet, IpFamily, LonLat, RouterAvail, Transport};

/// A small world of routers with mixed capabilities.
///
/// | id        | position          | capabilities           |
/// |-----------|-------------------|------------------------|
/// | paris     | 2.35, 48.86       | udp4 udp6 tcp4         |
/// | frankfurt | 8.68, 50.11       | udp4 wss6              |
/// | nyc       | -74.0, 40.71      | udp6 tcp4 tcp6         |
/// | tokyo     | 139.69, 35.69     | udp4 udp6 tcp4 tcp6    |
pub fn sample_routers() -> Vec<RouterAvail> {
    use IpFamily::{V4, V6};
    use Transport::{Tcp, Udp, WebSocket};

    vec![
        RouterAvail::new(
            "paris",
            LonLat::new(2.35, 48.86),
            CapabilitySet::new().with(Udp, V4).with(Udp, V6).with(Tcp, V4),
        ),
        RouterAvail::new(
            "frankfurt",
            LonLat::new(8.68, 50.11),
            CapabilitySet::new().with(Udp, V4).with(WebSocket, V6),
        ),
        RouterAvail::new(
            "nyc",
            LonLat::new(-74.0, 40.71),
            CapabilitySet::new().with(Udp, V6).with(Tcp, V4).with(Tcp, V6),
        ),
        RouterAvail::new(
            "tokyo",
            LonLat::new(139.69, 35.69),
            CapabilitySet::new()
                .with(Udp, V4)
                .with(Udp, V6)
                .with(Tcp, V4)
                .with(Tcp, V6),
        ),
    ]
}

/// Router plus the store behind it, so tests can publish new snapshots.
pub fn test_app() -> (Router, Arc<AvailabilityStore>) {
    let store = Arc::new(AvailabilityStore::with_routers(sample_routers()));
    let router = build_router(AppState::new(store.clone()), Duration::from_secs(5));
    (router, store)
}

/// Send a GET and decode the JSON body.
pub async fn get_json<T: DeserializeOwned>(app: &Router, uri: &str) -> (StatusCode, T) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}
