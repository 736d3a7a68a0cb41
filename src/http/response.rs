//! Response encoding.
//!
//! Turns matcher output into the JSON body returned to clients. One
//! `QueryResult` per query, in the order the `cap` parameters were given.

use serde::{Deserialize, Serialize};

use crate::model::{Distance, LonLat, RouterAvail, Transport};
use crate::routing::Query;

/// Body of `GET /locate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocateResponse {
    /// Snapshot generation the answer was computed against.
    pub generation: u64,
    pub results: Vec<QueryResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub transport: Transport,
    pub routers: Vec<RouterEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouterEntry {
    pub id: String,
    pub position: LonLat,
    pub distance_km: f64,
}

impl LocateResponse {
    /// Pair each query with its ranked routers.
    pub fn encode<D: Distance>(
        generation: u64,
        queries: &[Query],
        results: &[Vec<&RouterAvail>],
        distance: &D,
    ) -> Self {
        let results = queries
            .iter()
            .zip(results)
            .map(|(query, routers)| QueryResult {
                transport: query.transport.clone(),
                routers: routers
                    .iter()
                    .map(|r| RouterEntry {
                        id: r.id.clone(),
                        position: r.position,
                        distance_km: distance.distance(query.position, r.position),
                    })
                    .collect(),
            })
            .collect();

        Self {
            generation,
            results,
        }
    }
}

/// Body of `GET /routers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotSummary {
    pub generation: u64,
    pub routers: usize,
    pub ids: Vec<String>,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub generation: u64,
}
