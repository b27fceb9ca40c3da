use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::Path,
};
use tracing::{info, instrument};

use crate::error::Result;
use crate::gather::Tables;

/// Write all tables as one JSON document, `{"orders": [...], ...}`, indented
/// four spaces.
///
/// Written to a sibling `.tmp` file first and renamed over `path`.
#[instrument(level = "info", skip(path, tables), fields(path = %path.as_ref().display()))]
pub fn write_tables<P: AsRef<Path>>(path: P, tables: &Tables) -> Result<()> {
    let path = path.as_ref();
    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    {
        let mut out = BufWriter::new(File::create(&tmp_path)?);
        let mut ser = Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
        tables.serialize(&mut ser)?;
        out.write_all(b"\n")?;
        out.flush()?;
    }
    fs::rename(&tmp_path, path)?;

    info!(rows = tables.total_rows(), "json written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gather::{materialize, GameTables};
    use crate::process::{LongRecord, Role};
    use crate::raw::TableKind;
    use anyhow::Result;
    use serde_json::Value;
    use tempfile::tempdir;

    #[test]
    fn one_array_per_kind() -> Result<()> {
        let mut gathered = GameTables::empty();
        gathered.push(
            TableKind::Surplus,
            vec![LongRecord {
                year: "2025".into(),
                game_num: 2,
                week_num: 4,
                role: Some(Role::Wholesaler),
                value: Some(-3.0),
            }],
        );
        gathered.push(
            TableKind::SupplyChainCost,
            vec![LongRecord {
                year: "2025".into(),
                game_num: 2,
                week_num: 4,
                role: None,
                value: None,
            }],
        );
        let tables = materialize(gathered);

        let dir = tempdir()?;
        let path = dir.path().join("game-data.json");
        write_tables(&path, &tables)?;

        let text = fs::read_to_string(&path)?;
        assert!(text.starts_with("{\n    \"orders\": []"), "{text}");
        assert!(!dir.path().join("game-data.json.tmp").exists());

        let doc: Value = serde_json::from_str(&text)?;
        let obj = doc.as_object().expect("top-level object");
        let keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        assert_eq!(keys.len(), 4);
        for kind in TableKind::ALL {
            assert!(obj.contains_key(kind.as_str()), "{kind}");
        }

        assert_eq!(doc["surplus"][0]["role"], "Wholesaler");
        assert_eq!(doc["surplus"][0]["value"], -3.0);
        let cost = doc["supply_chain_cost"][0].as_object().expect("record");
        assert!(!cost.contains_key("role"));
        assert!(cost["value"].is_null());
        Ok(())
    }
}
