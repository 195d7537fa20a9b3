//! Dataset transport seam.
//!
//! The dashboard only needs "give me the raw delimited text"; how it arrives
//! is the shell's concern. The web shell bundles the CSV as an asset, so its
//! source never fails; a network transport slots in behind the same trait.

use std::fmt;

use futures::future::LocalBoxFuture;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Non-success status from a remote source.
    Status(u16),
    /// Transport-level failure (network down, resource missing).
    Unavailable(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(code) => write!(f, "dataset request returned status {code}"),
            Self::Unavailable(reason) => write!(f, "dataset unavailable: {reason}"),
        }
    }
}

impl std::error::Error for FetchError {}

pub trait DatasetSource {
    fn load(&self) -> LocalBoxFuture<'_, Result<String, FetchError>>;
}

/// A dataset compiled into the binary. Never fails.
pub struct EmbeddedSource {
    csv: &'static str,
}

impl EmbeddedSource {
    pub fn new(csv: &'static str) -> Self {
        Self { csv }
    }
}

impl DatasetSource for EmbeddedSource {
    fn load(&self) -> LocalBoxFuture<'_, Result<String, FetchError>> {
        Box::pin(async move { Ok(self.csv.to_string()) })
    }
}
