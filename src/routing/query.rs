//! Query construction from request parameters.
//!
//! # Responsibilities
//! - Collect a flat key → multi-value parameter set
//! - Apply defaults and fail-soft correction
//! - Emit one `Query` per requested transport (`cap`)
//! - Report which parameters were replaced by a default
//!
//! # Design Decisions
//! - Never fails: malformed input degrades to the default value
//! - IP families are opt-out: only the literal `"0"` disables one
//! - `k` is floored at 1 but has no ceiling
//! - Diagnostics are a side channel; the queries are identical with or
//!   without looking at them

use std::collections::HashMap;
use std::fmt;

use crate::model::{LonLat, Transport};

/// One matching request.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    /// Maximum number of routers to return.
    pub count: usize,
    pub transport: Transport,
    pub want_ipv4: bool,
    pub want_ipv6: bool,
    /// Reference point for proximity ranking.
    pub position: LonLat,
}

impl Default for Query {
    fn default() -> Self {
        Self {
            count: 1,
            transport: Transport::Udp,
            want_ipv4: true,
            want_ipv6: true,
            position: LonLat::default(),
        }
    }
}

/// Raw request parameters, keeping every value of repeated keys in order.
#[derive(Debug, Clone, Default)]
pub struct QueryParams {
    values: HashMap<String, Vec<String>>,
}

impl QueryParams {
    /// Decode a URL query string (`a=1&b=2`). A leading `?` is ignored.
    pub fn from_query_string(qs: &str) -> Self {
        let qs = qs.strip_prefix('?').unwrap_or(qs);
        url::form_urlencoded::parse(qs.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    /// First value for `key`, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .and_then(|v| v.first())
            .map(String::as_str)
    }

    /// All values for `key`, in occurrence order.
    pub fn get_all(&self, key: &str) -> &[String] {
        self.values.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.entry(key.into()).or_default().push(value.into());
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::default();
        for (k, v) in iter {
            params.push(k, v);
        }
        params
    }
}

/// A parameter that was present but replaced by (or clamped to) a default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamDiagnostic {
    /// `k` did not parse as an unsigned integer; count stays 1.
    InvalidCount(String),
    /// `k=0` was raised to 1.
    CountFloored,
    /// `lon` or `lat` did not parse; the coordinate became 0.
    InvalidCoordinate { param: &'static str, value: String },
    /// `cap` named a transport we do not recognise. The query is still
    /// emitted but can never match.
    UnknownTransport(String),
}

impl ParamDiagnostic {
    /// Name of the offending parameter.
    pub fn param(&self) -> &'static str {
        match self {
            ParamDiagnostic::InvalidCount(_) | ParamDiagnostic::CountFloored => "k",
            ParamDiagnostic::InvalidCoordinate { param, .. } => *param,
            ParamDiagnostic::UnknownTransport(_) => "cap",
        }
    }
}

impl fmt::Display for ParamDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamDiagnostic::InvalidCount(v) => write!(f, "k={:?} is not a count, using 1", v),
            ParamDiagnostic::CountFloored => write!(f, "k=0 raised to 1"),
            ParamDiagnostic::InvalidCoordinate { param, value } => {
                write!(f, "{}={:?} is not a number, using 0", param, value)
            }
            ParamDiagnostic::UnknownTransport(t) => write!(f, "cap={:?} is not a known transport", t),
        }
    }
}

/// Queries built from one parameter set, plus what was defaulted.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltQueries {
    /// Never empty.
    pub queries: Vec<Query>,
    pub diagnostics: Vec<ParamDiagnostic>,
}

/// Builds `Query` values from request parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryBuilder;

impl QueryBuilder {
    /// Build queries from a URL query string.
    pub fn parse(qs: &str) -> Vec<Query> {
        Self::build(&QueryParams::from_query_string(qs)).queries
    }

    /// Build queries and collect diagnostics.
    pub fn build(params: &QueryParams) -> BuiltQueries {
        let mut diagnostics = Vec::new();
        let mut template = Query {
            want_ipv4: params.get("ipv4") != Some("0"),
            want_ipv6: params.get("ipv6") != Some("0"),
            ..Query::default()
        };

        if let Some(k) = params.get("k") {
            match k.parse::<u32>() {
                Ok(0) => diagnostics.push(ParamDiagnostic::CountFloored),
                Ok(n) => template.count = n as usize,
                Err(_) => diagnostics.push(ParamDiagnostic::InvalidCount(k.to_string())),
            }
        }

        template.position = LonLat::new(
            parse_coordinate(params, "lon", &mut diagnostics),
            parse_coordinate(params, "lat", &mut diagnostics),
        );

        let caps = params.get_all("cap");
        if caps.is_empty() {
            return BuiltQueries {
                queries: vec![template],
                diagnostics,
            };
        }

        let queries = caps
            .iter()
            .map(|token| {
                let transport = Transport::from(token.as_str());
                if !transport.is_known() {
                    diagnostics.push(ParamDiagnostic::UnknownTransport(token.clone()));
                }
                Query {
                    transport,
                    ..template.clone()
                }
            })
            .collect();

        BuiltQueries {
            queries,
            diagnostics,
        }
    }
}

fn parse_coordinate(
    params: &QueryParams,
    param: &'static str,
    diagnostics: &mut Vec<ParamDiagnostic>,
) -> f64 {
    match params.get(param) {
        None => 0.0,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            diagnostics.push(ParamDiagnostic::InvalidCoordinate {
                param,
                value: raw.to_string(),
            });
            0.0
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_string() {
        let queries = QueryBuilder::parse("");
        assert_eq!(queries, vec![Query::default()]);

        let q = &queries[0];
        assert_eq!(q.count, 1);
        assert_eq!(q.transport, Transport::Udp);
        assert!(q.want_ipv4);
        assert!(q.want_ipv6);
        assert_eq!(q.position, LonLat::new(0.0, 0.0));
    }

    #[test]
    fn test_full_query_string() {
        let queries = QueryBuilder::parse("ipv4=0&ipv6=1&k=3&lon=10&lat=20&cap=UDP&cap=TCP");
        assert_eq!(queries.len(), 2);

        for q in &queries {
            assert_eq!(q.count, 3);
            assert_eq!(q.position, LonLat::new(10.0, 20.0));
            assert!(!q.want_ipv4);
            assert!(q.want_ipv6);
        }
        assert_eq!(queries[0].transport, Transport::Udp);
        assert_eq!(queries[1].transport, Transport::Tcp);
    }

    #[test]
    fn test_family_opt_out_requires_literal_zero() {
        let q = &QueryBuilder::parse("ipv4=false&ipv6=00")[0];
        assert!(q.want_ipv4);
        assert!(q.want_ipv6);

        let q = &QueryBuilder::parse("ipv4=0&ipv6=0")[0];
        assert!(!q.want_ipv4);
        assert!(!q.want_ipv6);
    }

    #[test]
    fn test_first_value_wins_for_single_keys() {
        let q = &QueryBuilder::parse("k=4&k=9&ipv4=1&ipv4=0")[0];
        assert_eq!(q.count, 4);
        assert!(q.want_ipv4);
    }

    #[test]
    fn test_count_floor_and_no_ceiling() {
        let built = QueryBuilder::build(&QueryParams::from_query_string("k=0"));
        assert_eq!(built.queries[0].count, 1);
        assert_eq!(built.diagnostics, vec![ParamDiagnostic::CountFloored]);

        assert_eq!(QueryBuilder::parse("k=1000000")[0].count, 1_000_000);
    }

    #[test]
    fn test_bad_count_falls_back() {
        for qs in ["k=-2", "k=abc", "k=1.5", "k=4294967296"] {
            let built = QueryBuilder::build(&QueryParams::from_query_string(qs));
            assert_eq!(built.queries[0].count, 1, "{}", qs);
            assert!(matches!(built.diagnostics[0], ParamDiagnostic::InvalidCount(_)));
        }
    }

    #[test]
    fn test_bad_coordinates_become_zero() {
        let built = QueryBuilder::build(&QueryParams::from_query_string("lon=east&lat=-33.5"));
        assert_eq!(built.queries[0].position, LonLat::new(0.0, -33.5));
        assert_eq!(
            built.diagnostics,
            vec![ParamDiagnostic::InvalidCoordinate {
                param: "lon",
                value: "east".to_string()
            }]
        );
    }

    #[test]
    fn test_explicit_zero_has_no_diagnostic() {
        let built = QueryBuilder::build(&QueryParams::from_query_string("lon=0&lat=0"));
        assert_eq!(built.queries[0].position, LonLat::default());
        assert!(built.diagnostics.is_empty());
    }

    #[test]
    fn test_unknown_cap_is_kept() {
        let built = QueryBuilder::build(&QueryParams::from_query_string("cap=udp&cap=smoke-signal"));
        assert_eq!(built.queries.len(), 2);
        assert_eq!(
            built.queries[1].transport,
            Transport::Unknown("smoke-signal".to_string())
        );
        assert_eq!(
            built.diagnostics,
            vec![ParamDiagnostic::UnknownTransport("smoke-signal".to_string())]
        );
        assert_eq!(built.diagnostics[0].param(), "cap");
    }

    #[test]
    fn test_unknown_keys_ignored_and_question_mark_stripped() {
        let queries = QueryBuilder::parse("?foo=bar&k=2");
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].count, 2);
    }

    #[test]
    fn test_params_from_pairs() {
        let params: QueryParams = vec![("cap", "tcp"), ("cap", "http3"), ("lat", "1.5")]
            .into_iter()
            .collect();
        let queries = QueryBuilder::build(&params).queries;
        assert_eq!(queries.len(), 2);
        assert_eq!(queries[0].transport, Transport::Tcp);
        assert_eq!(queries[1].transport, Transport::Http3);
        assert_eq!(queries[1].position, LonLat::new(0.0, 1.5));
    }

    #[test]
    fn test_percent_decoding() {
        let q = &QueryBuilder::parse("lon=%2D12.25&cap=%55DP")[0];
        assert_eq!(q.position.lon, -12.25);
        assert_eq!(q.transport, Transport::Udp);
    }
}
