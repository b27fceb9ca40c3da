// src/sink/mod.rs
//
// Every sink writes the same four tables with the columns from `crate::schema`.
pub mod json;
pub mod parquet;
pub mod sqlite;
