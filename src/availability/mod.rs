//! Candidate router availability.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     routers.json
//!     → source.rs (parse & check ids)
//!     → store.rs (publish generation 1)
//!
//! On file change:
//!     watcher.rs detects change
//!     → source.rs loads new list
//!     → store.rs swaps in a new Arc<Snapshot>
//!     → next request sees the new generation
//! ```
//!
//! # Design Decisions
//! - Snapshots are read-only; refresh is by replacement, never mutation
//! - A bad file never replaces a good snapshot
//! - Routers are not probed here; the file is the source of truth

pub mod source;
pub mod store;
pub mod watcher;

pub use source::{load_routers, SourceError};
pub use store::{AvailabilityStore, Snapshot};
pub use watcher::SnapshotWatcher;
