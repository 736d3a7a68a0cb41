//! Startup orchestration.
//!
//! # Responsibilities
//! - Initialize subsystems in dependency order
//! - Load the first router snapshot
//! - Start background tasks (file watcher, metrics)
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listeners start last (traffic only when ready)

use notify::RecommendedWatcher;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::availability::{load_routers, AvailabilityStore, SnapshotWatcher};
use crate::config::LocatorConfig;
use crate::error::{LocatorError, LocatorResult};
use crate::observability::metrics;

/// Subsystems that must stay alive while the server runs.
pub struct Started {
    pub store: Arc<AvailabilityStore>,
    /// Dropping this stops hot reload.
    pub watcher: Option<RecommendedWatcher>,
}

/// Bring up metrics and availability for `config`.
pub fn start(config: &LocatorConfig) -> LocatorResult<Started> {
    if config.observability.metrics_enabled {
        let addr: SocketAddr = config
            .observability
            .metrics_address
            .parse()
            .map_err(|_| LocatorError::Address(config.observability.metrics_address.clone()))?;
        metrics::init_metrics(addr);
    }

    let path = Path::new(&config.availability.path);
    let routers = load_routers(path)?;
    tracing::info!(path = %path.display(), routers = routers.len(), "Router list loaded");
    let store = Arc::new(AvailabilityStore::with_routers(routers));

    let watcher = if config.availability.watch {
        let poll = Duration::from_secs(config.availability.poll_interval_secs);
        Some(SnapshotWatcher::new(path, store.clone(), poll).run()?)
    } else {
        None
    };

    Ok(Started { store, watcher })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_router_list_is_fatal() {
        let mut config = LocatorConfig::default();
        config.observability.metrics_enabled = false;
        config.availability.path = "/definitely/not/routers.json".into();

        assert!(matches!(start(&config), Err(LocatorError::Source(_))));
    }

    #[test]
    fn test_start_without_watch() {
        let path = std::env::temp_dir().join(format!(
            "relay_locator_startup_test_{}_{}.json",
            std::process::id(),
            fastrand::u32(..)
        ));
        std::fs::write(&path, r#"[{"id": "a", "position": [0, 0]}]"#).unwrap();

        let mut config = LocatorConfig::default();
        config.observability.metrics_enabled = false;
        config.availability.watch = false;
        config.availability.path = path.to_string_lossy().into_owned();

        let started = start(&config).unwrap();
        assert!(started.watcher.is_none());
        assert_eq!(started.store.load().routers.len(), 1);

        std::fs::remove_file(&path).unwrap_or_default();
    }
}
