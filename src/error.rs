use crate::sync::Timeout;
use std::io;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A wait was requested with something other than an infinite timeout.
    #[error("unsupported wait timeout {0}, only infinite waits are supported")]
    UnsupportedTimeout(Timeout),

    #[error("failed to query process memory: {0}")]
    MemoryQuery(#[from] io::Error),

    #[error("{0} is not supported on this platform")]
    Unsupported(&'static str),

    #[error("invalid trace level {0:?}")]
    InvalidLevel(String),
}
