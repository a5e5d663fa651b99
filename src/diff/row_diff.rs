//! Field-level comparison of two rows sharing a key

use rustc_hash::FxHashSet;

use crate::filter::ColumnFilter;
use crate::model::{Row, Value};

use super::{DiffRecord, NOTE_ROW_DIFFERS};

/// Compare two rows known to share a composite key.
///
/// Columns present in either row are compared by canonical text form,
/// skipping ignore-pattern matches. Returns `None` when nothing differs.
/// Otherwise the key columns are force-included for traceability and the
/// record lists columns in the left schema's order; a differing column the
/// left schema does not know is appended afterwards in discovery order.
pub(super) fn row_diff(
    left: &Row,
    right: &Row,
    left_schema: &[String],
    key_columns: &[String],
    ignore: &ColumnFilter,
) -> Option<DiffRecord> {
    let mut compare: Vec<&str> = Vec::new();
    let mut seen: FxHashSet<&str> = FxHashSet::default();
    for column in left.columns().chain(right.columns()) {
        if ignore.keep(column) && seen.insert(column) {
            compare.push(column);
        }
    }

    let mut diffs: Vec<(&str, Value, Value)> = Vec::new();
    let mut diff_columns: FxHashSet<&str> = FxHashSet::default();
    for column in compare {
        let lv = left.get(column);
        let rv = right.get(column);
        let lt = lv.map(Value::to_text).unwrap_or_default();
        let rt = rv.map(Value::to_text).unwrap_or_default();
        if lt != rt {
            diffs.push((
                column,
                lv.cloned().unwrap_or(Value::Null),
                rv.cloned().unwrap_or(Value::Null),
            ));
            diff_columns.insert(column);
        }
    }

    if diffs.is_empty() {
        return None;
    }

    // key values ride along even when identical
    for key in key_columns {
        if diff_columns.insert(key.as_str()) {
            diffs.push((
                key,
                left.get(key).cloned().unwrap_or(Value::Null),
                right.get(key).cloned().unwrap_or(Value::Null),
            ));
        }
    }

    let mut record = DiffRecord::new(NOTE_ROW_DIFFERS);
    let mut emitted: FxHashSet<&str> = FxHashSet::default();
    for column in left_schema {
        if diff_columns.contains(column.as_str()) {
            if let Some((name, lv, rv)) = diffs.iter().find(|(name, _, _)| *name == column.as_str()) {
                record.push(*name, lv.clone(), rv.clone());
                emitted.insert(*name);
            }
        }
    }
    for (name, lv, rv) in &diffs {
        if !emitted.contains(name) {
            record.push(*name, lv.clone(), rv.clone());
        }
    }
    Some(record)
}
