// src/process/mod.rs
pub mod melt;
pub mod raw_table;
pub mod utils;

use serde::Serialize;
use std::{fmt, path::Path, str::FromStr};
use tracing::{debug, instrument};

use crate::error::{IngestError, Result};
use crate::raw::{classify, RawFile, TableKind};
use raw_table::RawTable;

/// A position in the simulated supply chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Role {
    Factory,
    Retailer,
    Wholesaler,
    Distributor,
    Consumer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Factory => "Factory",
            Role::Retailer => "Retailer",
            Role::Wholesaler => "Wholesaler",
            Role::Distributor => "Distributor",
            Role::Consumer => "Consumer",
        }
    }

    /// Lookup key of the role's column header.
    pub fn key(&self) -> &'static str {
        match self {
            Role::Factory => "factory",
            Role::Retailer => "retailer",
            Role::Wholesaler => "wholesaler",
            Role::Distributor => "distributor",
            Role::Consumer => "consumer",
        }
    }

    /// Role columns melted for `kind`, in output order. Empty when the kind
    /// has no role dimension.
    pub fn for_kind(kind: TableKind) -> &'static [Role] {
        const CHAIN: [Role; 4] = [
            Role::Factory,
            Role::Retailer,
            Role::Wholesaler,
            Role::Distributor,
        ];
        const WITH_CONSUMER: [Role; 5] = [
            Role::Factory,
            Role::Retailer,
            Role::Wholesaler,
            Role::Distributor,
            Role::Consumer,
        ];
        match kind {
            TableKind::Orders => &WITH_CONSUMER,
            TableKind::Inventory | TableKind::Surplus => &CHAIN,
            TableKind::SupplyChainCost => &[],
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::for_kind(TableKind::Orders)
            .iter()
            .copied()
            .find(|r| r.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown role {s:?}"))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One observation of one role in one week of one game.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LongRecord {
    pub year: String,
    pub game_num: u32,
    pub week_num: i64,
    /// `None` for kinds without a role dimension.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// `None` for an empty cell.
    pub value: Option<f64>,
}

/// Reshape an already-loaded wide table into long records for `raw.kind`.
pub fn reshape(table: &RawTable, raw: &RawFile) -> Result<Vec<LongRecord>> {
    if raw.kind.has_roles() {
        melt::melt_roles(table, raw, Role::for_kind(raw.kind))
    } else {
        melt::single_value(table, raw)
    }
}

/// Load the export at `path` and reshape it according to `raw`.
#[instrument(level = "info", skip(path, raw), fields(path = %path.as_ref().display(), kind = %raw.kind))]
pub fn normalize<P: AsRef<Path>>(path: P, raw: &RawFile) -> Result<(TableKind, Vec<LongRecord>)> {
    let table = RawTable::load(path)?;
    let records = reshape(&table, raw)?;
    debug!(
        year = %raw.year,
        game = raw.game_num,
        rows_in = table.rows.len(),
        rows_out = records.len(),
        "normalized"
    );
    Ok((raw.kind, records))
}

/// Classify `path` by its file name, then [`normalize`] it.
///
/// A name outside the raw export grammar is [`IngestError::InvalidInput`];
/// the file is not opened.
pub fn process_file<P: AsRef<Path>>(path: P) -> Result<(TableKind, Vec<LongRecord>)> {
    let path = path.as_ref();
    let raw = path
        .file_name()
        .and_then(|n| n.to_str())
        .and_then(classify)
        .ok_or_else(|| IngestError::InvalidInput(path.to_path_buf()))?;
    normalize(path, &raw)
}
