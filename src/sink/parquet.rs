use arrow::{
    array::{ArrayRef, Float64Array, Int64Array, StringArray},
    record_batch::RecordBatch,
};
use parquet::{
    arrow::ArrowWriter,
    basic::Compression,
    file::properties::WriterProperties,
};
use std::{
    fs::{self, File},
    io::BufWriter,
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::{debug, info, instrument};

use crate::error::Result;
use crate::gather::Tables;
use crate::process::LongRecord;
use crate::raw::TableKind;
use crate::schema::build_arrow_schema;

/// Build the single record batch holding `rows` for `kind`.
pub fn to_record_batch(kind: TableKind, rows: &[LongRecord]) -> Result<RecordBatch> {
    let schema = build_arrow_schema(kind);

    let mut cols: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.year.as_str()))),
        Arc::new(Int64Array::from_iter_values(
            rows.iter().map(|r| i64::from(r.game_num)),
        )),
        Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.week_num))),
    ];
    if kind.has_roles() {
        cols.push(Arc::new(StringArray::from_iter(
            rows.iter().map(|r| r.role.map(|role| role.as_str())),
        )));
    }
    cols.push(Arc::new(Float64Array::from_iter(rows.iter().map(|r| r.value))));

    Ok(RecordBatch::try_new(schema, cols)?)
}

/// Write `<dir>/<kind>.parquet` for every kind, each via a `.tmp` rename.
#[instrument(level = "info", skip(dir, tables), fields(dir = %dir.as_ref().display()))]
pub fn write_tables<P: AsRef<Path>>(dir: P, tables: &Tables) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();

    let mut written = Vec::with_capacity(TableKind::ALL.len());
    for (kind, rows) in tables.iter() {
        let batch = to_record_batch(kind, rows)?;
        let final_path = dir.join(format!("{}.parquet", kind.as_str()));
        let tmp_path = dir.join(format!("{}.parquet.tmp", kind.as_str()));

        let file = BufWriter::new(File::create(&tmp_path)?);
        let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props.clone()))?;
        writer.write(&batch)?;
        writer.close()?;
        fs::rename(&tmp_path, &final_path)?;

        debug!(table = %kind, rows = rows.len(), path = %final_path.display(), "parquet written");
        written.push(final_path);
    }
    info!(files = written.len(), "parquet mirror written");
    Ok(written)
}
