//! Relay locator library.
//!
//! Picks the candidate routers that best satisfy a client's request for a
//! transport, IP family and location.

pub mod availability;
pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod model;
pub mod observability;
pub mod routing;

pub use config::LocatorConfig;
pub use error::{LocatorError, LocatorResult};
pub use http::LocatorServer;
pub use lifecycle::Shutdown;
pub use model::{CapabilitySet, IpFamily, LonLat, RouterAvail, Transport};
pub use routing::{Query, QueryBuilder, QueryMatcher};
