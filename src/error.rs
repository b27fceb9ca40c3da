// src/error.rs

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, IngestError>;

#[derive(Error, Debug)]
pub enum IngestError {
    /// Normalization was asked for on a path whose name is not a raw export.
    #[error("invalid input: {} is not a raw game export", .0.display())]
    InvalidInput(PathBuf),

    #[error("raw directory {} does not exist or is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("{}: missing column `{column}`", file.display())]
    MissingColumn { file: PathBuf, column: String },

    #[error("{}: line {line}, column `{column}`: cannot parse {value:?}", file.display())]
    InvalidValue {
        file: PathBuf,
        line: u64,
        column: String,
        value: String,
    },

    #[error("{}: line {line} has {found} fields, header has {expected}", file.display())]
    RaggedRow {
        file: PathBuf,
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("{}: malformed CSV: {source}", file.display())]
    Csv {
        file: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
}

impl IngestError {
    /// True for errors caused by the contents of a raw export rather than by
    /// the caller or the filesystem.
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            IngestError::MissingColumn { .. }
                | IngestError::InvalidValue { .. }
                | IngestError::RaggedRow { .. }
                | IngestError::Csv { .. }
        )
    }
}
