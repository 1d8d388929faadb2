use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading route or day-list data
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("could not find column with names: {0:?}")]
    MissingColumn(&'static [&'static str]),

    #[error("invalid coordinate at row {row}: {value:?}")]
    InvalidCoordinate { row: usize, value: String },

    #[error("route contains no points")]
    Empty,

    #[error("unknown input format: {0}")]
    UnknownFormat(PathBuf),
}

pub type RouteResult<T> = Result<T, RouteError>;
