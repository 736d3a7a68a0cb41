//! Candidate router records.
//!
//! # Responsibilities
//! - Represent one router's position and supported (transport, family) pairs
//! - Answer exact capability lookups
//!
//! Records are produced by the availability source and never mutated
//! afterwards; they live inside an immutable snapshot.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::model::geo::LonLat;
use crate::model::transport::{IpFamily, Transport, TransportIpFamily};

/// Set of (transport, family) pairs a router supports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapabilitySet(HashSet<TransportIpFamily>);

impl CapabilitySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, transport: Transport, family: IpFamily) -> Self {
        self.insert(transport, family);
        self
    }

    pub fn insert(&mut self, transport: Transport, family: IpFamily) -> bool {
        self.0.insert(TransportIpFamily::new(transport, family))
    }

    /// Exact presence test. No fallback across transports.
    pub fn supports(&self, transport: &Transport, family: IpFamily) -> bool {
        // Unknown tokens never match, even if a record happens to carry one.
        if !transport.is_known() {
            return false;
        }
        self.0.contains(&TransportIpFamily::new(transport.clone(), family))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TransportIpFamily> {
        self.0.iter()
    }
}

impl FromIterator<TransportIpFamily> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = TransportIpFamily>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A candidate router.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouterAvail {
    /// Unique identifier (hostname, URI...). Secondary ranking key.
    pub id: String,
    pub position: LonLat,
    #[serde(default)]
    pub capabilities: CapabilitySet,
}

impl RouterAvail {
    pub fn new(id: impl Into<String>, position: LonLat, capabilities: CapabilitySet) -> Self {
        Self {
            id: id.into(),
            position,
            capabilities,
        }
    }
}
