use rusqlite::{params, Connection, Transaction};
use std::path::Path;
use tracing::{debug, info, instrument};

use crate::error::Result;
use crate::gather::Tables;
use crate::process::{LongRecord, Role};
use crate::raw::TableKind;
use crate::schema::{columns, create_table_sql};

/// Replace the four game tables in the database at `path` in one transaction.
///
/// The file is created if missing. Tables other than the four game tables are
/// left alone.
#[instrument(level = "info", skip(path, tables), fields(path = %path.as_ref().display()))]
pub fn write_tables<P: AsRef<Path>>(path: P, tables: &Tables) -> Result<()> {
    let mut conn = Connection::open(path.as_ref())?;
    let tx = conn.transaction()?;
    for (kind, rows) in tables.iter() {
        let written = replace_table(&tx, kind, rows)?;
        debug!(table = %kind, rows = written, "replaced table");
    }
    tx.commit()?;
    info!(rows = tables.total_rows(), "database written");
    Ok(())
}

fn insert_sql(kind: TableKind) -> String {
    let cols = columns(kind);
    let names: Vec<&str> = cols.iter().map(|c| c.name).collect();
    let marks: Vec<String> = (1..=cols.len()).map(|i| format!("?{i}")).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        kind.as_str(),
        names.join(", "),
        marks.join(", ")
    )
}

/// Drop, recreate and fill `kind`'s table. Returns rows inserted.
pub fn replace_table(tx: &Transaction<'_>, kind: TableKind, rows: &[LongRecord]) -> Result<usize> {
    tx.execute(&format!("DROP TABLE IF EXISTS {}", kind.as_str()), [])?;
    tx.execute(&create_table_sql(kind), [])?;

    let mut stmt = tx.prepare(&insert_sql(kind))?;
    for r in rows {
        if kind.has_roles() {
            stmt.execute(params![
                r.year,
                r.game_num,
                r.week_num,
                r.role.as_ref().map(Role::as_str),
                r.value
            ])?;
        } else {
            stmt.execute(params![r.year, r.game_num, r.week_num, r.value])?;
        }
    }
    Ok(rows.len())
}

/// Read `kind`'s table back in insertion order.
pub fn read_table(conn: &Connection, kind: TableKind) -> Result<Vec<LongRecord>> {
    let has_roles = kind.has_roles();
    let names: Vec<&str> = columns(kind).iter().map(|c| c.name).collect();
    let sql = format!(
        "SELECT {} FROM {} ORDER BY rowid",
        names.join(", "),
        kind.as_str()
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], |row| {
            let (role, value) = if has_roles {
                let role: String = row.get(3)?;
                let role = role.parse::<Role>().map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(
                        3,
                        rusqlite::types::Type::Text,
                        e.into(),
                    )
                })?;
                (Some(role), row.get(4)?)
            } else {
                (None, row.get(3)?)
            };
            Ok(LongRecord {
                year: row.get(0)?,
                game_num: row.get(1)?,
                week_num: row.get(2)?,
                role,
                value,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gather::{materialize, GameTables};
    use anyhow::Result;
    use tempfile::tempdir;

    fn sample() -> Tables {
        let mut gathered = GameTables::empty();
        gathered.push(
            TableKind::Orders,
            vec![
                LongRecord {
                    year: "2025".into(),
                    game_num: 3,
                    week_num: 1,
                    role: Some(Role::Factory),
                    value: Some(10.0),
                },
                LongRecord {
                    year: "2025".into(),
                    game_num: 3,
                    week_num: 1,
                    role: Some(Role::Retailer),
                    value: None,
                },
            ],
        );
        gathered.push(
            TableKind::SupplyChainCost,
            vec![LongRecord {
                year: "abc".into(),
                game_num: 1,
                week_num: 1,
                role: None,
                value: Some(500.0),
            }],
        );
        materialize(gathered)
    }

    #[test]
    fn writes_and_reads_back() -> Result<()> {
        let dir = tempdir()?;
        let db = dir.path().join("game-data.db");
        let tables = sample();
        write_tables(&db, &tables)?;

        let conn = Connection::open(&db)?;
        for kind in TableKind::ALL {
            assert_eq!(read_table(&conn, kind)?, tables.get(kind), "{kind}");
        }

        let cost_cols: Vec<String> = conn
            .prepare("SELECT name FROM pragma_table_info('supply_chain_cost')")?
            .query_map([], |r| r.get(0))?
            .collect::<rusqlite::Result<_>>()?;
        assert_eq!(cost_cols, vec!["year", "game_num", "week_num", "value"]);
        Ok(())
    }

    #[test]
    fn rewriting_replaces_instead_of_appending() -> Result<()> {
        let dir = tempdir()?;
        let db = dir.path().join("game-data.db");
        let tables = sample();
        write_tables(&db, &tables)?;
        write_tables(&db, &tables)?;

        let conn = Connection::open(&db)?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM orders", [], |r| r.get(0))?;
        assert_eq!(n, 2);
        assert_eq!(read_table(&conn, TableKind::Orders)?, tables.get(TableKind::Orders));
        Ok(())
    }

    #[test]
    fn empty_kinds_become_empty_tables_and_others_survive() -> Result<()> {
        let dir = tempdir()?;
        let db = dir.path().join("game-data.db");
        {
            let conn = Connection::open(&db)?;
            conn.execute_batch(
                "CREATE TABLE notes (body TEXT); INSERT INTO notes VALUES ('keep me');
                 CREATE TABLE inventory (stale INTEGER); INSERT INTO inventory VALUES (1);",
            )?;
        }
        write_tables(&db, &sample())?;

        let conn = Connection::open(&db)?;
        let inv: i64 = conn.query_row("SELECT COUNT(*) FROM inventory", [], |r| r.get(0))?;
        assert_eq!(inv, 0);
        let notes: String = conn.query_row("SELECT body FROM notes", [], |r| r.get(0))?;
        assert_eq!(notes, "keep me");
        Ok(())
    }
}
