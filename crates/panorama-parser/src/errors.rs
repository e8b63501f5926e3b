use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} could not be decoded as UTF-8 or WINDOWS-1252")]
    Decode { path: PathBuf },

    #[error("CSV error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to build metric frame for {source_file}: {source}")]
    Frame {
        source_file: String,
        #[source]
        source: polars::error::PolarsError,
    },
}
