//! Router list watcher for hot reload.
//!
//! The parent directory is watched rather than the file itself. A
//! write-then-rename replacement swaps the inode, and a watch on the old
//! inode would go quiet after the first swap.

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::availability::source::load_routers;
use crate::availability::store::AvailabilityStore;
use crate::observability::metrics;

/// Monitors the router list file and republishes it on change.
pub struct SnapshotWatcher {
    path: PathBuf,
    store: Arc<AvailabilityStore>,
    poll_interval: Duration,
}

impl SnapshotWatcher {
    pub fn new(path: &Path, store: Arc<AvailabilityStore>, poll_interval: Duration) -> Self {
        Self {
            path: path.to_path_buf(),
            store,
            poll_interval,
        }
    }

    /// Reload the file once. On failure the current snapshot is kept.
    pub fn reload(&self) -> bool {
        reload_into(&self.path, &self.store)
    }

    /// Start watching the file in a background thread.
    ///
    /// The returned watcher must be kept alive for as long as reloads
    /// are wanted.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let path = self.path.clone();
        let store = self.store.clone();
        let (dir, file_name) = watch_target(&self.path)?;

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    let relevant = event.kind.is_create() || event.kind.is_modify();
                    let ours = event
                        .paths
                        .iter()
                        .any(|p| p.file_name() == Some(file_name.as_os_str()));
                    if relevant && ours {
                        tracing::info!(path = ?path, "Router list change detected, reloading");
                        reload_into(&path, &store);
                    }
                }
                Err(e) => tracing::error!(error = ?e, "Watch error"),
            },
            Config::default().with_poll_interval(self.poll_interval),
        )?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, dir = ?dir, "Router list watcher started");
        Ok(watcher)
    }
}

/// Directory to watch and the file name to filter its events by.
fn watch_target(path: &Path) -> Result<(PathBuf, OsString), notify::Error> {
    let file_name = path.file_name().map(|n| n.to_os_string()).ok_or_else(|| {
        notify::Error::generic("router list path has no file name").add_path(path.to_path_buf())
    })?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((dir, file_name))
}

fn reload_into(path: &Path, store: &AvailabilityStore) -> bool {
    match load_routers(path) {
        Ok(routers) => {
            store.publish(routers);
            metrics::record_reload("ok");
            true
        }
        Err(e) => {
            tracing::error!(path = ?path, error = %e, "Failed to reload router list, keeping current snapshot");
            metrics::record_reload("error");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::Instant;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "relay_locator_{}_{}_{}",
            name,
            std::process::id(),
            fastrand::u32(..)
        ));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn ids(store: &AvailabilityStore) -> Vec<String> {
        store.load().routers.iter().map(|r| r.id.clone()).collect()
    }

    fn wait_for_ids(store: &AvailabilityStore, expected: &[&str]) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if ids(store) == expected {
                return true;
            }
            std::thread::sleep(Duration::from_millis(50));
        }
        false
    }

    fn replace_by_rename(target: &Path, content: &str) {
        let staged = target.with_extension("json.tmp");
        fs::write(&staged, content).unwrap();
        fs::rename(&staged, target).unwrap();
    }

    #[test]
    fn test_reload_keeps_snapshot_on_error() {
        let dir = scratch_dir("watcher_reload");
        let path = dir.join("routers.json");
        fs::write(&path, r#"[{"id": "a", "position": [0, 0]}]"#).unwrap();

        let store = Arc::new(AvailabilityStore::new());
        let watcher = SnapshotWatcher::new(&path, store.clone(), Duration::from_secs(1));

        assert!(watcher.reload());
        assert_eq!(store.load().generation, 1);

        fs::write(&path, "not json").unwrap();
        assert!(!watcher.reload());
        let snap = store.load();
        assert_eq!(snap.generation, 1);
        assert_eq!(snap.routers[0].id, "a");

        fs::remove_dir_all(&dir).unwrap_or_default();
    }

    #[test]
    fn test_run_follows_repeated_rename_replacements() {
        let dir = scratch_dir("watcher_rename");
        let path = dir.join("routers.json");
        fs::write(&path, r#"[{"id": "v1", "position": [0, 0]}]"#).unwrap();

        let store = Arc::new(AvailabilityStore::new());
        let watcher = SnapshotWatcher::new(&path, store.clone(), Duration::from_millis(100));
        assert!(watcher.reload());
        let _guard = watcher.run().unwrap();

        replace_by_rename(&path, r#"[{"id": "v2", "position": [1, 1]}]"#);
        assert!(wait_for_ids(&store, &["v2"]), "first replacement missed: {:?}", ids(&store));
        let after_first = store.load().generation;
        assert!(after_first > 1);

        replace_by_rename(&path, r#"[{"id": "v3", "position": [2, 2]}]"#);
        assert!(wait_for_ids(&store, &["v3"]), "second replacement missed: {:?}", ids(&store));
        assert!(store.load().generation > after_first);

        fs::remove_dir_all(&dir).unwrap_or_default();
    }

    #[test]
    fn test_watch_target_splits_path() {
        let (dir, name) = watch_target(Path::new("/srv/locator/routers.json")).unwrap();
        assert_eq!(dir, PathBuf::from("/srv/locator"));
        assert_eq!(name, OsString::from("routers.json"));

        let (dir, _) = watch_target(Path::new("routers.json")).unwrap();
        assert_eq!(dir, PathBuf::from("."));

        assert!(watch_target(Path::new("/")).is_err());
    }
}
