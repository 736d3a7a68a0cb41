//! Router matching and proximity ranking.
//!
//! # Responsibilities
//! - Decide whether a router offers the requested transport/family
//! - Rank eligible routers by distance from the query position
//! - Truncate to the requested count
//!
//! # Design Decisions
//! - Family test is an inclusive OR: one requested family is enough
//! - Capability lookup is exact, no fallback across transports
//! - Distance ties are broken by router id so results are reproducible
//! - Empty output is a normal result, never an error

use std::cmp::Ordering;

use crate::model::{Distance, Haversine, IpFamily, LonLat, RouterAvail};
use crate::routing::query::Query;

/// Returns true if `router` can serve `query`.
pub fn matches(query: &Query, router: &RouterAvail) -> bool {
    let caps = &router.capabilities;
    (query.want_ipv4 && caps.supports(&query.transport, IpFamily::V4))
        || (query.want_ipv6 && caps.supports(&query.transport, IpFamily::V6))
}

/// Orders two routers by distance from `origin`, then by id.
pub fn compare_by_proximity<D: Distance + ?Sized>(
    distance: &D,
    origin: LonLat,
    a: &RouterAvail,
    b: &RouterAvail,
) -> Ordering {
    let da = distance.distance(origin, a.position);
    let db = distance.distance(origin, b.position);
    da.total_cmp(&db).then_with(|| a.id.cmp(&b.id))
}

/// Selects and ranks candidate routers for queries.
#[derive(Debug, Clone, Default)]
pub struct QueryMatcher<D = Haversine> {
    distance: D,
}

impl QueryMatcher<Haversine> {
    /// Matcher using great-circle distance.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<D: Distance> QueryMatcher<D> {
    /// Matcher using a custom distance primitive.
    pub fn with_distance(distance: D) -> Self {
        Self { distance }
    }

    pub fn distance(&self) -> &D {
        &self.distance
    }

    /// Filter, rank and truncate `candidates` for one query.
    pub fn execute<'a>(&self, query: &Query, candidates: &'a [RouterAvail]) -> Vec<&'a RouterAvail> {
        let mut res: Vec<&RouterAvail> = candidates.iter().filter(|r| matches(query, r)).collect();

        res.sort_by(|a, b| compare_by_proximity(&self.distance, query.position, a, b));
        res.truncate(query.count);
        res
    }

    /// Run every query against the same candidate set, one result per query.
    pub fn execute_all<'a>(
        &self,
        queries: &[Query],
        candidates: &'a [RouterAvail],
    ) -> Vec<Vec<&'a RouterAvail>> {
        queries.iter().map(|q| self.execute(q, candidates)).collect()
    }
}
