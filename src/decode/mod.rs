//! Decoding layer: column sources and the table loader

mod parquet;

use log::{debug, warn};

use crate::error::Result;
use crate::filter::ColumnFilter;
use crate::model::{Row, Table, Value};

pub use self::parquet::ParquetSource;

/// A declared column of a source.
#[derive(Debug, Clone)]
pub struct ColumnInfo {
    pub name: String,
    /// Nested deeper than the flat row/column model supports.
    pub nested: bool,
}

/// A column-oriented source of decoded values.
///
/// Fatal conditions (file unreadable, schema metadata unreadable) belong in
/// the source's constructor. `read_column` failing is a soft, per-column
/// condition: the loader logs it and drops the column.
pub trait ColumnSource {
    /// Declared columns, in declaration order.
    fn columns(&self) -> Vec<ColumnInfo>;

    /// Total number of rows the source declares.
    fn row_count(&self) -> u64;

    /// Read up to `limit` values of one column, in row order.
    fn read_column(&mut self, column: &str, limit: usize) -> Result<Vec<Value>>;
}

/// Load a table from a source, applying a column filter and row limit.
///
/// The schema is the filter-surviving, readable columns in declaration
/// order. Nested and unreadable columns are logged and dropped; loading
/// itself never fails once the source is open. A row limit that is zero or
/// exceeds the declared row count loads everything.
pub fn load<S: ColumnSource + ?Sized>(
    source: &mut S,
    filter: &ColumnFilter,
    row_limit: Option<usize>,
) -> Table {
    let total = source.row_count();
    let max = match row_limit {
        Some(limit) if limit > 0 && (limit as u64) < total => limit,
        _ => total as usize,
    };

    let mut loaded: Vec<(String, Vec<Value>)> = Vec::new();
    for info in source.columns() {
        if info.nested {
            warn!("ignoring nested column {}", info.name);
            continue;
        }
        if !filter.keep(&info.name) {
            debug!("filtered out column {}", info.name);
            continue;
        }
        match source.read_column(&info.name, max) {
            Ok(values) => {
                debug!("loaded column {} ({} values)", info.name, values.len());
                loaded.push((info.name, values));
            }
            Err(err) => warn!("skipping unreadable column {}: {err}", info.name),
        }
    }

    let schema = loaded.iter().map(|(name, _)| name.clone()).collect();
    let mut table = Table::new(schema);
    table.total_rows = total;

    for i in 0..max {
        let mut row = Row::new();
        for (name, values) in &loaded {
            // a short column leaves its cell absent rather than padding
            if let Some(value) = values.get(i) {
                row.insert(name.clone(), value.clone());
            }
        }
        table.push_row(row);
    }

    table
}
