//! pqdiff command-line interface

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use termcolor::{ColorChoice, NoColor, StandardStream, WriteColor};

use pqdiff::decode::{load, ColumnSource, ParquetSource};
use pqdiff::diff::diff_tables;
use pqdiff::filter::ColumnFilter;
use pqdiff::model::Table;
use pqdiff::output::{render_diffs, render_json, render_table};

/// Inspect and compare parquet files by key columns
#[derive(Parser, Debug)]
#[command(name = "pqdiff")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output file for results (defaults to standard out)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show column names and row count of a parquet file
    Info {
        file: PathBuf,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Dump the rows of a parquet file
    Cat {
        file: PathBuf,

        /// Load at most this many rows
        #[arg(short, long)]
        limit: Option<usize>,

        /// Columns to include, comma separated; wildcard prefix/suffix
        /// patterns accepted (e.g. "Foo,*Tier")
        #[arg(short, long, value_delimiter = ',')]
        include: Vec<String>,

        /// Columns to exclude, comma separated; wildcard patterns accepted
        #[arg(short = 'x', long, value_delimiter = ',')]
        exclude: Vec<String>,

        /// Sort rows by these columns before printing
        #[arg(short, long, value_delimiter = ',')]
        sort: Vec<String>,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Diff two parquet files joined on key columns
    Diff {
        left: PathBuf,
        right: PathBuf,

        /// Key column names joining the files, comma separated
        /// (e.g. "MessageId,SenderAccountId")
        #[arg(short, long, value_delimiter = ',', required = true)]
        keys: Vec<String>,

        /// Columns to include, comma separated; wildcard patterns accepted
        #[arg(short, long, value_delimiter = ',')]
        include: Vec<String>,

        /// Columns to exclude, comma separated; wildcard patterns accepted
        #[arg(short = 'x', long, value_delimiter = ',')]
        exclude: Vec<String>,

        /// Columns to skip when comparing rows; wildcard patterns accepted
        #[arg(long, value_delimiter = ',')]
        ignore: Vec<String>,

        /// Stop after this many diff records (0 for no limit)
        #[arg(short, long, default_value_t = 20)]
        limit: usize,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct FileInfo {
    columns: Vec<String>,
    total_rows: u64,
}

fn main() -> ExitCode {
    env_logger::init();
    match run() {
        Ok(differences_found) => {
            if differences_found {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<bool> {
    let cli = Cli::parse();
    let mut out = open_output(&cli.output)?;

    match cli.command {
        Command::Info { file, json } => {
            let source = ParquetSource::open(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let info = FileInfo {
                columns: source.columns().into_iter().map(|c| c.name).collect(),
                total_rows: source.row_count(),
            };
            if json {
                render_json(&info, &mut out)?;
            } else {
                writeln!(out, "Columns: {}", info.columns.join(" | "))?;
                writeln!(out, "Rows: {}", info.total_rows)?;
            }
            Ok(false)
        }

        Command::Cat {
            file,
            limit,
            include,
            exclude,
            sort,
            json,
        } => {
            let filter = ColumnFilter::new(&include, &exclude);
            let mut source = ParquetSource::open(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let mut table = load(&mut source, &filter, limit);
            table.sort(&sort);
            if json {
                render_json(&table.rows, &mut out)?;
            } else {
                render_table(&table, &mut out)?;
            }
            Ok(false)
        }

        Command::Diff {
            left,
            right,
            keys,
            include,
            exclude,
            ignore,
            limit,
            json,
        } => {
            let filter = ColumnFilter::new(&include, &exclude);
            // the two sides have no data dependency, load them in parallel
            let (left_table, right_table) = rayon::join(
                || load_sorted(&left, &filter, &keys),
                || load_sorted(&right, &filter, &keys),
            );
            let left_table = left_table?;
            let right_table = right_table?;

            let records = diff_tables(
                &left_table,
                &right_table,
                &keys,
                &ignore,
                (limit > 0).then_some(limit),
            )?;

            if json {
                render_json(&records, &mut out)?;
            } else {
                render_diffs(&records, &mut out)?;
            }
            Ok(!records.is_empty())
        }
    }
}

fn load_sorted(path: &Path, filter: &ColumnFilter, keys: &[String]) -> Result<Table> {
    let mut source = ParquetSource::open(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let mut table = load(&mut source, filter, None);
    table.sort(keys);
    Ok(table)
}

fn open_output(path: &Option<PathBuf>) -> Result<Box<dyn WriteColor>> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Box::new(NoColor::new(file)))
        }
        None => Ok(Box::new(StandardStream::stdout(ColorChoice::Auto))),
    }
}
