//! Query construction and router selection.
//!
//! # Data Flow
//! ```text
//! Request parameters (ipv4, ipv6, k, lon, lat, cap...)
//!     → query.rs (defaults, fail-soft parsing, one Query per cap)
//!     → matcher.rs (filter by capability, rank by distance, truncate)
//!     → Return: one ranked router list per Query
//! ```
//!
//! # Design Decisions
//! - Both stages are pure and synchronous; no locks, no I/O
//! - Matching runs against an immutable snapshot of candidates
//! - Deterministic: same parameters and snapshot give the same answer

pub mod matcher;
pub mod query;

pub use matcher::{compare_by_proximity, matches, QueryMatcher};
pub use query::{BuiltQueries, ParamDiagnostic, Query, QueryBuilder, QueryParams};
