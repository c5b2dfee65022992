use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading, reshaping or plotting a ppm log
#[derive(Error, Debug)]
pub enum PpmError {
    #[error("could not read input {path}: {source}")]
    InputNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("no timestamp/ppm_log pair to plot")]
    EmptyTable,

    #[error("plotting error: {0}")]
    Plot(String),
}

pub type Result<T> = std::result::Result<T, PpmError>;
