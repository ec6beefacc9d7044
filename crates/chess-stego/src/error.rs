//! Codec error types

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StegoError {
    #[error("Configuration error: {0}")]
    InvalidConfig(String),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not decode {0} with any supported text encoding")]
    UnsupportedEncoding(PathBuf),
}
