// src/gather.rs

use serde::Serialize;
use std::{collections::BTreeMap, path::Path, time::Instant};
use tracing::{info, instrument};

use crate::config::Config;
use crate::error::Result;
use crate::process::{normalize, LongRecord};
use crate::raw::{scan_raw_files, TableKind};
use crate::sink;

/// Per-kind lists of per-file long tables, in processing order.
#[derive(Debug, Clone, PartialEq)]
pub struct GameTables(BTreeMap<TableKind, Vec<Vec<LongRecord>>>);

impl GameTables {
    /// Every kind present, each with no files.
    pub fn empty() -> Self {
        Self(TableKind::ALL.into_iter().map(|k| (k, Vec::new())).collect())
    }

    pub fn push(&mut self, kind: TableKind, records: Vec<LongRecord>) {
        self.0.entry(kind).or_default().push(records);
    }

    /// Per-file tables gathered for `kind`.
    pub fn files(&self, kind: TableKind) -> &[Vec<LongRecord>] {
        self.0.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl Default for GameTables {
    fn default() -> Self {
        Self::empty()
    }
}

/// One concatenated long table per kind. Serializes as
/// `{"orders": [...], "inventory": [...], ...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Tables(BTreeMap<TableKind, Vec<LongRecord>>);

impl Tables {
    pub fn get(&self, kind: TableKind) -> &[LongRecord] {
        self.0.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Kinds with their rows, in [`TableKind::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (TableKind, &[LongRecord])> {
        self.0.iter().map(|(k, v)| (*k, v.as_slice()))
    }

    pub fn total_rows(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }
}

/// Normalize every raw export directly inside `dir`, grouping by kind.
#[instrument(level = "info", skip(dir), fields(dir = %dir.as_ref().display()))]
pub fn gather<P: AsRef<Path>>(dir: P) -> Result<GameTables> {
    let mut tables = GameTables::empty();
    for (path, raw) in scan_raw_files(dir)? {
        let (kind, records) = normalize(&path, &raw)?;
        tables.push(kind, records);
    }
    Ok(tables)
}

/// Concatenate each kind's per-file tables, file order then row order.
/// A kind with no files becomes an empty table.
pub fn materialize(tables: GameTables) -> Tables {
    let mut out: BTreeMap<TableKind, Vec<LongRecord>> =
        TableKind::ALL.into_iter().map(|k| (k, Vec::new())).collect();
    for (kind, files) in tables.0 {
        out.entry(kind).or_default().extend(files.into_iter().flatten());
    }
    Tables(out)
}

/// Gather `config.raw_dir`, then replace the database tables and write any
/// configured mirrors.
pub fn run(config: &Config) -> Result<Tables> {
    config.validate()?;
    let start = Instant::now();
    info!(raw_dir = %config.raw_dir.display(), "gathering raw exports");

    let gathered = gather(&config.raw_dir)?;
    for kind in TableKind::ALL {
        info!(kind = %kind, files = gathered.files(kind).len(), "gathered");
    }
    let tables = materialize(gathered);

    sink::sqlite::write_tables(&config.out_file, &tables)?;
    if let Some(json_file) = &config.json_file {
        sink::json::write_tables(json_file, &tables)?;
    }
    if let Some(dir) = &config.parquet_dir {
        sink::parquet::write_tables(dir, &tables)?;
    }

    info!(
        rows = tables.total_rows(),
        elapsed = ?start.elapsed(),
        "run complete"
    );
    Ok(tables)
}
