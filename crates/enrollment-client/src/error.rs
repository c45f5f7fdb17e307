use std::path::PathBuf;

use thiserror::Error;

/// Failures below the HTTP status level. A non-2xx status is a [`Reply`](crate::Reply), not an error.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("cannot read upload file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Other(String),
}
