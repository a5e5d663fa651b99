//! End-to-end: write parquet fixtures, load, sort, diff

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use pqdiff::decode::{load, ColumnSource, ParquetSource};
use pqdiff::diff::{diff_tables, NOTE_ONLY_LEFT, NOTE_ROW_DIFFERS};
use pqdiff::filter::ColumnFilter;
use pqdiff::model::Value;

fn write_fixture(path: &Path, ids: Vec<&str>, amounts: Vec<i64>, scores: Vec<f64>) {
    let schema = Arc::new(Schema::new(vec![
        Field::new("MessageId", DataType::Utf8, false),
        Field::new("Amount", DataType::Int64, false),
        Field::new("Score", DataType::Float64, false),
    ]));
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(ids)) as ArrayRef,
            Arc::new(Int64Array::from(amounts)) as ArrayRef,
            Arc::new(Float64Array::from(scores)) as ArrayRef,
        ],
    )
    .unwrap();
    let file = File::create(path).unwrap();
    let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();
}

#[test]
fn load_reads_schema_and_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.parquet");
    write_fixture(&path, vec!["a", "b"], vec![1, 2], vec![1.5, 2.5]);

    let mut source = ParquetSource::open(&path).unwrap();
    assert_eq!(source.row_count(), 2);

    let table = load(&mut source, &ColumnFilter::default(), None);
    assert_eq!(table.schema, vec!["MessageId", "Amount", "Score"]);
    assert_eq!(table.row_count(), 2);
    assert_eq!(table.rows[0].get("MessageId"), Some(&Value::Text("a".into())));
    assert_eq!(table.rows[1].get("Amount"), Some(&Value::Int(2)));
    assert_eq!(table.rows[1].get("Score"), Some(&Value::Float(2.5)));
}

#[test]
fn load_respects_filter_and_row_limit() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.parquet");
    write_fixture(&path, vec!["a", "b", "c"], vec![1, 2, 3], vec![0.0, 0.0, 0.0]);

    let mut source = ParquetSource::open(&path).unwrap();
    let filter = ColumnFilter::new(&[], &["Score".to_string()]);
    let table = load(&mut source, &filter, Some(2));

    assert_eq!(table.schema, vec!["MessageId", "Amount"]);
    assert_eq!(table.row_count(), 2);
    assert_eq!(table.total_rows, 3);
}

#[test]
fn diff_finds_orphans_and_changed_rows() {
    let dir = tempfile::tempdir().unwrap();
    let left_path = dir.path().join("left.parquet");
    let right_path = dir.path().join("right.parquet");
    // unsorted on purpose; the pipeline sorts by key before diffing
    write_fixture(&left_path, vec!["m2", "m1"], vec![20, 10], vec![2.5, 1.5]);
    write_fixture(&right_path, vec!["m3", "m1"], vec![30, 10], vec![3.5, 1.75]);

    let keys = vec!["MessageId".to_string()];
    let mut left = {
        let mut source = ParquetSource::open(&left_path).unwrap();
        load(&mut source, &ColumnFilter::default(), None)
    };
    let mut right = {
        let mut source = ParquetSource::open(&right_path).unwrap();
        load(&mut source, &ColumnFilter::default(), None)
    };
    left.sort(&keys);
    right.sort(&keys);

    let records = diff_tables(&left, &right, &keys, &[], None).unwrap();

    assert_eq!(records.len(), 3);
    // m1 differs in Score only; the float fraction must survive
    assert_eq!(records[0].note, NOTE_ROW_DIFFERS);
    assert_eq!(records[0].columns, vec!["MessageId", "Score"]);
    assert_eq!(records[0].left[1], Value::Float(1.5));
    assert_eq!(records[0].right[1], Value::Float(1.75));
    // m2 only on the left, m3 only on the right
    assert_eq!(records[1].note, NOTE_ONLY_LEFT);
    assert_eq!(records[1].left, vec![Value::Text("m2".into())]);
    assert_eq!(records[2].right, vec![Value::Text("m3".into())]);
}
