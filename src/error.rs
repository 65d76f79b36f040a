use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::stats::ScanResult;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(
        "failed to write to output after {} new emails across {} domains: {source}",
        .partial.found,
        .partial.scanned
    )]
    Sink {
        partial: ScanResult,
        #[source]
        source: io::Error,
    },
}

/// Per-domain fetch failure. Never fatal to a run.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid domain '{domain}': {reason}")]
    InvalidUrl { domain: String, reason: String },

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP {0}")]
    Status(u16),
}
