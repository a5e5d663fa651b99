//! pqdiff - inspect and compare parquet files
//!
//! Loads parquet rows into an in-memory table, with optional column
//! filtering and row limits, and diffs two such tables by key columns via
//! a sort-merge join.

pub mod decode;
pub mod diff;
pub mod error;
pub mod filter;
pub mod model;
pub mod output;

pub use decode::{load, ColumnSource, ParquetSource};
pub use diff::{diff_tables, DiffRecord, Differ};
pub use error::Error;
pub use filter::ColumnFilter;
pub use model::{Row, Table, Value};
