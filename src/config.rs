// src/config.rs

use std::path::PathBuf;

use crate::error::{IngestError, Result};

/// Everything a run needs to know about where to read and write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding the raw `<year> - game <n> - <kind>.csv` exports.
    pub raw_dir: PathBuf,
    /// SQLite database file; created if missing, its four game tables replaced.
    pub out_file: PathBuf,
    /// Optional JSON mirror of the four tables.
    pub json_file: Option<PathBuf>,
    /// Optional directory receiving one Parquet file per table.
    pub parquet_dir: Option<PathBuf>,
}

impl Config {
    pub fn new(raw_dir: impl Into<PathBuf>, out_file: impl Into<PathBuf>) -> Self {
        Self {
            raw_dir: raw_dir.into(),
            out_file: out_file.into(),
            json_file: None,
            parquet_dir: None,
        }
    }

    pub fn with_json(mut self, path: impl Into<PathBuf>) -> Self {
        self.json_file = Some(path.into());
        self
    }

    pub fn with_parquet_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.parquet_dir = Some(dir.into());
        self
    }

    /// Check the input side before any file is read.
    pub fn validate(&self) -> Result<()> {
        if !self.raw_dir.is_dir() {
            return Err(IngestError::NotADirectory(self.raw_dir.clone()));
        }
        Ok(())
    }
}
