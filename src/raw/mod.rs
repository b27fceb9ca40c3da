// src/raw/mod.rs

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::{
    fmt, fs,
    path::{Path, PathBuf},
};
use tracing::{debug, instrument, trace};

use crate::error::Result;

/// `<year> - game <game_num> - <kind>.csv`, case-insensitive.
static RAW_FILE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(\w+) - game (\d+) - (orders|inventory|surplus|supply_chain_cost)\.csv$")
        .expect("raw file pattern is valid")
});

/// The four simulation outputs a raw export can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    Orders,
    Inventory,
    Surplus,
    SupplyChainCost,
}

impl TableKind {
    pub const ALL: [TableKind; 4] = [
        TableKind::Orders,
        TableKind::Inventory,
        TableKind::Surplus,
        TableKind::SupplyChainCost,
    ];

    /// Table name in every sink, and the token used in file names.
    pub fn as_str(&self) -> &'static str {
        match self {
            TableKind::Orders => "orders",
            TableKind::Inventory => "inventory",
            TableKind::Surplus => "surplus",
            TableKind::SupplyChainCost => "supply_chain_cost",
        }
    }

    pub fn from_token(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s))
    }

    /// Whether rows of this kind carry a role dimension.
    pub fn has_roles(&self) -> bool {
        !matches!(self, TableKind::SupplyChainCost)
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata carried by a raw export's file name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RawFile {
    /// Season token as written in the name; not validated beyond `\w+`.
    pub year: String,
    pub game_num: u32,
    pub kind: TableKind,
}

/// Match a bare file name against the raw export grammar.
///
/// Returns `None` for anything that does not fully match, including a game
/// number too large to represent.
pub fn classify(filename: &str) -> Option<RawFile> {
    let caps = RAW_FILE_RE.captures(filename)?;
    let year = caps.get(1)?.as_str().to_string();
    let game_num = caps.get(2)?.as_str().parse::<u32>().ok()?;
    let kind = TableKind::from_token(caps.get(3)?.as_str())?;
    Some(RawFile {
        year,
        game_num,
        kind,
    })
}

/// Classify the immediate entries of `dir`, sorted by year, game, kind, then name.
#[instrument(level = "debug", skip(dir), fields(dir = %dir.as_ref().display()))]
pub fn scan_raw_files<P: AsRef<Path>>(dir: P) -> Result<Vec<(PathBuf, RawFile)>> {
    let mut found = Vec::new();
    for entry in fs::read_dir(dir.as_ref())? {
        let path = entry?.path();
        // follows symlinks, so a linked export counts as a file
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        match classify(name) {
            Some(raw) => {
                trace!(file = name, year = %raw.year, game = raw.game_num, kind = %raw.kind, "matched");
                found.push((path, raw));
            }
            None => trace!(file = name, "skipping non-export"),
        }
    }

    found.sort_by(|(pa, a), (pb, b)| {
        (&a.year, a.game_num, a.kind, pa.file_name()).cmp(&(
            &b.year,
            b.game_num,
            b.kind,
            pb.file_name(),
        ))
    });
    debug!(count = found.len(), "raw exports found");
    Ok(found)
}

/// File names in `dir` that [`classify`] accepts, in processing order.
pub fn list_raw_files<P: AsRef<Path>>(dir: P) -> Result<Vec<String>> {
    Ok(scan_raw_files(dir)?
        .into_iter()
        .filter_map(|(path, _)| {
            path.file_name()
                .and_then(|n| n.to_str())
                .map(str::to_string)
        })
        .collect())
}
