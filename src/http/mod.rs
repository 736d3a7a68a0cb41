//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID)
//!     → routing (build queries, match against snapshot)
//!     → response.rs (JSON encoding)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{UuidRequestId, X_REQUEST_ID};
pub use response::{HealthStatus, LocateResponse, QueryResult, RouterEntry, SnapshotSummary};
pub use server::{build_router, AppState, LocatorServer};
