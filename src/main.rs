use anyhow::{Context, Result};
use clap::Parser;
use soda_game_data::{run, Config, TableKind};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Reshape raw game exports into long-form tables in a SQLite database.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Directory of `<year> - game <n> - <kind>.csv` exports
    #[arg(value_name = "RAWDIR")]
    raw_dir: PathBuf,

    /// SQLite file to write; created if missing, game tables replaced
    #[arg(value_name = "OUTFILE")]
    out_file: PathBuf,

    /// Also write every table into one JSON document
    #[arg(long, value_name = "PATH")]
    json: Option<PathBuf>,

    /// Also write `<kind>.parquet` per table into this directory
    #[arg(long, value_name = "DIR")]
    parquet_dir: Option<PathBuf>,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        let mut config = Config::new(args.raw_dir, args.out_file);
        if let Some(path) = args.json {
            config = config.with_json(path);
        }
        if let Some(dir) = args.parquet_dir {
            config = config.with_parquet_dir(dir);
        }
        config
    }
}

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // ─── 2) config ───────────────────────────────────────────────────
    let config: Config = Args::parse().into();
    info!(?config, "startup");

    // ─── 3) gather, reshape, write ───────────────────────────────────
    let tables = run(&config).with_context(|| {
        format!(
            "processing {} into {}",
            config.raw_dir.display(),
            config.out_file.display()
        )
    })?;

    for kind in TableKind::ALL {
        info!(table = %kind, rows = tables.get(kind).len(), "written");
    }
    Ok(())
}
