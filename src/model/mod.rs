//! Domain types shared by the query builder, matcher and availability store.

pub mod geo;
pub mod router;
pub mod transport;

pub use geo::{Distance, Haversine, LonLat};
pub use router::{CapabilitySet, RouterAvail};
pub use transport::{IpFamily, Transport, TransportIpFamily};
