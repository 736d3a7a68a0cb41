//! Router list loading from disk.
//!
//! The file is a JSON array of router records:
//! ```json
//! [
//!   {
//!     "id": "hub.example.net",
//!     "position": [2.35, 48.85],
//!     "capabilities": [{"transport": "udp", "family": "ipv4"}]
//!   }
//! ]
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::model::RouterAvail;

/// Error type for router list loading.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Duplicate router id {0:?}")]
    DuplicateId(String),
}

/// Parse a router list from JSON text.
pub fn parse_routers(content: &str) -> Result<Vec<RouterAvail>, SourceError> {
    let routers: Vec<RouterAvail> = serde_json::from_str(content)?;

    let mut seen = HashSet::with_capacity(routers.len());
    for router in &routers {
        if !seen.insert(router.id.as_str()) {
            return Err(SourceError::DuplicateId(router.id.clone()));
        }
        if router.capabilities.is_empty() {
            tracing::warn!(router = %router.id, "Router has no capabilities and will never match");
        }
    }

    Ok(routers)
}

/// Load a router list from a JSON file.
pub fn load_routers(path: &Path) -> Result<Vec<RouterAvail>, SourceError> {
    let content = fs::read_to_string(path)?;
    parse_routers(&content)
}
