pub mod config;
pub mod error;
pub mod gather;
pub mod process;
pub mod raw;
pub mod schema;
pub mod sink;

pub use config::Config;
pub use error::{IngestError, Result};
pub use gather::{gather, materialize, run, GameTables, Tables};
pub use process::{normalize, process_file, LongRecord, Role};
pub use raw::{classify, list_raw_files, RawFile, TableKind};
