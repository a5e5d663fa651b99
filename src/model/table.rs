//! Table and Row data structures

use indexmap::IndexMap;
use serde::Serialize;

use super::value::Value;

/// A row: an ordered mapping from column name to value.
///
/// Rows produced by the loader carry exactly the columns of their table's
/// schema, except where a degraded column left trailing cells absent.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Row {
    values: IndexMap<String, Value>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: impl Into<String>, value: Value) {
        self.values.insert(column.into(), value);
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.values.contains_key(column)
    }

    /// Column names present in this row, in insertion order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(|k| k.as_str())
    }

    /// Concatenate the canonical text forms of the named columns, in order.
    ///
    /// There is no separator between components and an absent column
    /// contributes nothing, so distinct value combinations can collide
    /// (`"a","bc"` vs `"ab","c"`). Key columns should be chosen to avoid
    /// that in practice.
    pub fn composite_key(&self, columns: &[String]) -> String {
        let mut key = String::new();
        for column in columns {
            if let Some(value) = self.values.get(column) {
                key.push_str(&value.to_text());
            }
        }
        key
    }
}

impl FromIterator<(String, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// An in-memory table: an ordered schema plus an ordered sequence of rows.
///
/// Tables are built once by the loader and, apart from [`Table::sort`], read
/// only from then on.
#[derive(Debug, Default)]
pub struct Table {
    /// Column names, defining iteration and output order.
    pub schema: Vec<String>,
    /// Rows in load (or post-sort) order.
    pub rows: Vec<Row>,
    /// Row count declared by the source, before any row limit.
    pub total_rows: u64,
}

impl Table {
    pub fn new(schema: Vec<String>) -> Self {
        Self {
            schema,
            rows: Vec::new(),
            total_rows: 0,
        }
    }

    pub fn push_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.schema.len()
    }

    /// Sort rows ascending by their composite key over `columns`.
    ///
    /// The sort is stable: rows with tied keys keep their relative order,
    /// which the differ relies on for deterministic output. An empty column
    /// list is a no-op.
    pub fn sort(&mut self, columns: &[String]) {
        if columns.is_empty() {
            return;
        }
        self.rows
            .sort_by_cached_key(|row| row.composite_key(columns));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, Value)]) -> Row {
        pairs
            .iter()
            .map(|(c, v)| (c.to_string(), v.clone()))
            .collect()
    }

    fn keys(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_composite_key_concatenates_without_separator() {
        let r = row(&[("a", Value::Int(1)), ("b", Value::Text("x".into()))]);
        assert_eq!(r.composite_key(&keys(&["a", "b"])), "1x");
        assert_eq!(r.composite_key(&keys(&["b", "a"])), "x1");
    }

    #[test]
    fn test_composite_key_skips_absent_columns() {
        let r = row(&[("a", Value::Int(1))]);
        assert_eq!(r.composite_key(&keys(&["missing", "a"])), "1");
        assert_eq!(r.composite_key(&keys(&[])), "");
    }

    #[test]
    fn test_null_contributes_empty_string() {
        let r = row(&[("a", Value::Null), ("b", Value::Int(7))]);
        assert_eq!(r.composite_key(&keys(&["a", "b"])), "7");
    }

    #[test]
    fn test_sort_is_stable() {
        let mut table = Table::new(vec!["k".to_string(), "pos".to_string()]);
        table.push_row(row(&[("k", Value::Int(2)), ("pos", Value::Int(0))]));
        table.push_row(row(&[("k", Value::Int(1)), ("pos", Value::Int(1))]));
        table.push_row(row(&[("k", Value::Int(1)), ("pos", Value::Int(2))]));
        table.push_row(row(&[("k", Value::Int(2)), ("pos", Value::Int(3))]));

        table.sort(&keys(&["k"]));

        let order: Vec<_> = table
            .rows
            .iter()
            .map(|r| r.get("pos").unwrap().to_text())
            .collect();
        assert_eq!(order, vec!["1", "2", "0", "3"]);
    }

    #[test]
    fn test_sort_without_columns_is_noop() {
        let mut table = Table::new(vec!["k".to_string()]);
        table.push_row(row(&[("k", Value::Int(2))]));
        table.push_row(row(&[("k", Value::Int(1))]));

        table.sort(&[]);

        assert_eq!(table.rows[0].get("k"), Some(&Value::Int(2)));
    }
}
