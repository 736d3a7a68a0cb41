//! Service-level errors.
//!
//! The query builder and matcher never fail; everything here comes from
//! startup and I/O.

use thiserror::Error;

use crate::availability::SourceError;
use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum LocatorError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("router list: {0}")]
    Source(#[from] SourceError),

    #[error("file watcher: {0}")]
    Watch(#[from] notify::Error),

    #[error("invalid address {0:?}")]
    Address(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type LocatorResult<T> = Result<T, LocatorError>;
