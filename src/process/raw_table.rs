use csv::ReaderBuilder;
use std::{
    fs::File,
    io::Read,
    path::{Path, PathBuf},
};
use tracing::{instrument, trace};

use crate::error::{IngestError, Result};
use crate::process::utils::header_key;

/// A wide export exactly as read from disk.
#[derive(Debug)]
pub struct RawTable {
    /// File the table came from, carried into every data error.
    pub source: PathBuf,
    /// Column names from the header row, trimmed.
    pub headers: Vec<String>,
    /// Each data row, one String per header column.
    pub rows: Vec<Vec<String>>,
    /// 1-based line in the file where each row starts, parallel to `rows`.
    pub lines: Vec<u64>,
}

impl RawTable {
    /// Read a header-first CSV file.
    #[instrument(level = "debug", skip(path), fields(path = %path.as_ref().display()))]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        Self::from_reader(path, file)
    }

    /// Parse CSV bytes from `reader`, attributing errors to `source`.
    pub fn from_reader<R: Read>(source: &Path, reader: R) -> Result<Self> {
        let csv_err = |e: csv::Error| IngestError::Csv {
            file: source.to_path_buf(),
            source: e,
        };

        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = rdr
            .headers()
            .map_err(csv_err)?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').to_string())
            .collect();

        let mut rows = Vec::new();
        let mut lines = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(csv_err)?;
            // spreadsheet exports pad the tail with all-empty rows
            if record.iter().all(str::is_empty) {
                continue;
            }
            let line = record.position().map_or(0, |p| p.line());
            if record.len() > headers.len() {
                return Err(IngestError::RaggedRow {
                    file: source.to_path_buf(),
                    line,
                    expected: headers.len(),
                    found: record.len(),
                });
            }
            // trailing empty cells are dropped by some exporters; treat them as empty
            let mut row: Vec<String> = record.iter().map(str::to_string).collect();
            row.resize(headers.len(), String::new());
            rows.push(row);
            lines.push(line);
        }
        trace!(columns = headers.len(), rows = rows.len(), "loaded csv");

        Ok(Self {
            source: source.to_path_buf(),
            headers,
            rows,
            lines,
        })
    }

    /// Index of the first header whose normalized name is one of `keys`.
    pub fn find_column(&self, keys: &[&str]) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| keys.contains(&header_key(h).as_str()))
    }

    /// Like [`find_column`](Self::find_column) but a miss is a data error
    /// naming `display` as the expected column.
    pub fn require_column(&self, keys: &[&str], display: &str) -> Result<usize> {
        self.find_column(keys)
            .ok_or_else(|| IngestError::MissingColumn {
                file: self.source.clone(),
                column: display.to_string(),
            })
    }
}
