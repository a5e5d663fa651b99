//! Sort-merge diff engine

mod row_diff;

use std::cmp::Ordering;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::filter::ColumnFilter;
use crate::model::{Row, Table, Value};

use row_diff::row_diff;

/// Note attached to a record for a row present on both sides with
/// differing fields.
pub const NOTE_ROW_DIFFERS: &str = "row has differences";
/// Note attached to a record for a key present only in the left table.
pub const NOTE_ONLY_LEFT: &str = "row present only in left";
/// Note attached to a record for a key present only in the right table.
pub const NOTE_ONLY_RIGHT: &str = "row present only in right";

/// One row-level difference: parallel column/left/right lists plus a note.
///
/// A passive data holder; the differ fills it and presenters read it. The
/// three lists always have the same length.
#[derive(Debug, Clone, Serialize)]
pub struct DiffRecord {
    pub note: String,
    pub columns: Vec<String>,
    pub left: Vec<Value>,
    pub right: Vec<Value>,
}

impl DiffRecord {
    pub fn new(note: impl Into<String>) -> Self {
        Self {
            note: note.into(),
            columns: Vec::new(),
            left: Vec::new(),
            right: Vec::new(),
        }
    }

    pub fn push(&mut self, column: impl Into<String>, left: Value, right: Value) {
        self.columns.push(column.into());
        self.left.push(left);
        self.right.push(right);
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Sort-merge differ over two tables.
///
/// Both tables must already be sorted ascending by the composite key over
/// `key_columns` (see [`Table::sort`]); the differ does not sort. Duplicate
/// keys within one side pair positionally, an accepted limitation.
pub struct Differ<'a> {
    left: &'a Table,
    right: &'a Table,
    key_columns: &'a [String],
    ignore: ColumnFilter,
    limit: Option<usize>,
}

impl<'a> Differ<'a> {
    /// Rejects a diff without key columns before any work is done.
    pub fn new(
        left: &'a Table,
        right: &'a Table,
        key_columns: &'a [String],
        ignore_columns: &[String],
        limit: Option<usize>,
    ) -> Result<Self> {
        if key_columns.is_empty() {
            return Err(Error::NoKeyColumns);
        }
        Ok(Self {
            left,
            right,
            key_columns,
            ignore: ColumnFilter::excluding(ignore_columns),
            limit,
        })
    }

    /// Run the merge join and return the ordered differences.
    ///
    /// Each iteration advances at least one cursor, so the walk is
    /// O(left + right) regardless of the limit.
    pub fn diff(&self) -> Vec<DiffRecord> {
        let mut records = Vec::new();
        let mut li = 0usize;
        let mut ri = 0usize;

        loop {
            if let Some(limit) = self.limit {
                if limit > 0 && records.len() >= limit {
                    break;
                }
            }
            match (self.left.rows.get(li), self.right.rows.get(ri)) {
                (None, None) => break,
                (None, Some(row)) => {
                    records.push(self.orphan(NOTE_ONLY_RIGHT, None, Some(row)));
                    ri += 1;
                }
                (Some(row), None) => {
                    records.push(self.orphan(NOTE_ONLY_LEFT, Some(row), None));
                    li += 1;
                }
                (Some(left), Some(right)) => {
                    let lk = left.composite_key(self.key_columns);
                    let rk = right.composite_key(self.key_columns);
                    match lk.cmp(&rk) {
                        Ordering::Equal => {
                            if let Some(record) = row_diff(
                                left,
                                right,
                                &self.left.schema,
                                self.key_columns,
                                &self.ignore,
                            ) {
                                records.push(record);
                            }
                            li += 1;
                            ri += 1;
                        }
                        Ordering::Less => {
                            records.push(self.orphan(NOTE_ONLY_LEFT, Some(left), None));
                            li += 1;
                        }
                        Ordering::Greater => {
                            records.push(self.orphan(NOTE_ONLY_RIGHT, None, Some(right)));
                            ri += 1;
                        }
                    }
                }
            }
        }
        records
    }

    /// Record for a key present on one side only: key-column values with
    /// the missing side null.
    fn orphan(&self, note: &str, left: Option<&Row>, right: Option<&Row>) -> DiffRecord {
        let mut record = DiffRecord::new(note);
        for key in self.key_columns {
            let lv = left.and_then(|r| r.get(key)).cloned().unwrap_or(Value::Null);
            let rv = right.and_then(|r| r.get(key)).cloned().unwrap_or(Value::Null);
            record.push(key.clone(), lv, rv);
        }
        record
    }
}

/// Convenience wrapper: validate, join, return records.
pub fn diff_tables(
    left: &Table,
    right: &Table,
    key_columns: &[String],
    ignore_columns: &[String],
    limit: Option<usize>,
) -> Result<Vec<DiffRecord>> {
    Ok(Differ::new(left, right, key_columns, ignore_columns, limit)?.diff())
}
