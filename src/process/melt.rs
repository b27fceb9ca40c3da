use tracing::trace;

use crate::error::{IngestError, Result};
use crate::process::raw_table::RawTable;
use crate::process::utils::{parse_value, parse_week};
use crate::process::{LongRecord, Role};
use crate::raw::RawFile;

/// Names the time-period column goes by; `category` is the export's own name.
pub const WEEK_KEYS: &[&str] = &["week_num", "category"];
/// Names the single value column of a supply chain cost export goes by.
pub const COST_KEYS: &[&str] = &["supply_chain_cost"];

fn week_at(table: &RawTable, row_idx: usize, row: &[String], col: usize) -> Result<i64> {
    let cell = &row[col];
    parse_week(cell).ok_or_else(|| IngestError::InvalidValue {
        file: table.source.clone(),
        line: table.lines[row_idx],
        column: table.headers[col].clone(),
        value: cell.clone(),
    })
}

fn value_at(table: &RawTable, row_idx: usize, row: &[String], col: usize) -> Result<Option<f64>> {
    let cell = &row[col];
    parse_value(cell).map_err(|_| IngestError::InvalidValue {
        file: table.source.clone(),
        line: table.lines[row_idx],
        column: table.headers[col].clone(),
        value: cell.clone(),
    })
}

/// Wide to long over `roles`: one record per (row, role present in the file).
///
/// Records come out role-major: every week for the first role, then the next.
/// Roles absent from the header are skipped; none present at all is an error.
pub fn melt_roles(table: &RawTable, raw: &RawFile, roles: &[Role]) -> Result<Vec<LongRecord>> {
    let week_col = table.require_column(WEEK_KEYS, "week_num")?;

    let role_cols: Vec<(Role, usize)> = roles
        .iter()
        .filter_map(|&role| table.find_column(&[role.key()]).map(|idx| (role, idx)))
        .collect();
    if role_cols.is_empty() {
        return Err(IngestError::MissingColumn {
            file: table.source.clone(),
            column: roles
                .iter()
                .map(Role::as_str)
                .collect::<Vec<_>>()
                .join("|"),
        });
    }
    trace!(roles = role_cols.len(), rows = table.rows.len(), "melting");

    let weeks = table
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| week_at(table, i, row, week_col))
        .collect::<Result<Vec<_>>>()?;

    let mut out = Vec::with_capacity(role_cols.len() * table.rows.len());
    for (role, col) in role_cols {
        for (i, (row, &week_num)) in table.rows.iter().zip(&weeks).enumerate() {
            out.push(LongRecord {
                year: raw.year.clone(),
                game_num: raw.game_num,
                week_num,
                role: Some(role),
                value: value_at(table, i, row, col)?,
            });
        }
    }
    Ok(out)
}

/// Keep the time period and the single value column; everything else,
/// `Target` included, is dropped.
pub fn single_value(table: &RawTable, raw: &RawFile) -> Result<Vec<LongRecord>> {
    let week_col = table.require_column(WEEK_KEYS, "week_num")?;
    let value_col = table.require_column(COST_KEYS, "Supply Chain Cost")?;

    table
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            Ok(LongRecord {
                year: raw.year.clone(),
                game_num: raw.game_num,
                week_num: week_at(table, i, row, week_col)?,
                role: None,
                value: value_at(table, i, row, value_col)?,
            })
        })
        .collect()
}
