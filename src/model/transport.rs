//! Transport protocols and IP families.
//!
//! # Design Decisions
//! - Tokens are matched case-insensitively (`UDP` == `udp`)
//! - Unrecognised tokens are preserved as `Transport::Unknown` instead of
//!   being rejected, so a client asking for a transport we have never heard
//!   of simply gets no matches
//! - `TransportIpFamily` is the only key used for capability lookup

use serde::{Deserialize, Serialize};
use std::fmt;

/// A transport protocol a router can serve.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Transport {
    #[default]
    Udp,
    Tcp,
    WebSocket,
    Http3,
    /// Token that does not name a known transport. Kept verbatim.
    Unknown(String),
}

impl Transport {
    /// Canonical lowercase token.
    pub fn as_str(&self) -> &str {
        match self {
            Transport::Udp => "udp",
            Transport::Tcp => "tcp",
            Transport::WebSocket => "wss",
            Transport::Http3 => "http3",
            Transport::Unknown(token) => token,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Transport::Unknown(_))
    }
}

impl From<&str> for Transport {
    fn from(token: &str) -> Self {
        match token.to_ascii_lowercase().as_str() {
            "udp" => Transport::Udp,
            "tcp" => Transport::Tcp,
            "wss" | "websocket" => Transport::WebSocket,
            "http3" => Transport::Http3,
            _ => Transport::Unknown(token.to_string()),
        }
    }
}

impl From<String> for Transport {
    fn from(token: String) -> Self {
        Transport::from(token.as_str())
    }
}

impl From<Transport> for String {
    fn from(transport: Transport) -> Self {
        match transport {
            Transport::Unknown(token) => token,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// IP address family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IpFamily {
    #[serde(rename = "ipv4")]
    V4,
    #[serde(rename = "ipv6")]
    V6,
}

impl fmt::Display for IpFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IpFamily::V4 => f.write_str("ipv4"),
            IpFamily::V6 => f.write_str("ipv6"),
        }
    }
}

/// Capability lookup key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransportIpFamily {
    pub transport: Transport,
    pub family: IpFamily,
}

impl TransportIpFamily {
    pub fn new(transport: Transport, family: IpFamily) -> Self {
        Self { transport, family }
    }
}
