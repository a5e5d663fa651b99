//! Parquet-backed column source

use std::fs::File;
use std::path::{Path, PathBuf};

use arrow::array::{
    Array, ArrayRef, BinaryArray, BooleanArray, FixedSizeBinaryArray, Float32Array, Float64Array,
    Int16Array, Int32Array, Int64Array, Int8Array, LargeBinaryArray, LargeStringArray,
    StringArray, UInt16Array, UInt32Array, UInt64Array, UInt8Array,
};
use arrow::datatypes::DataType as ArrowType;
use parquet::arrow::arrow_reader::{
    ArrowReaderMetadata, ArrowReaderOptions, ParquetRecordBatchReaderBuilder,
};
use parquet::arrow::ProjectionMask;

use crate::error::{Error, Result};
use crate::model::Value;

use super::{ColumnInfo, ColumnSource};

/// Column source over a local parquet file.
///
/// Opening reads only the footer metadata; column data is read on demand,
/// one projected column at a time.
pub struct ParquetSource {
    path: PathBuf,
    metadata: ArrowReaderMetadata,
}

impl ParquetSource {
    /// Open a parquet file and read its footer. Fails fatally if the file
    /// or its metadata cannot be read.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|source| Error::Open {
            path: path.clone(),
            source,
        })?;
        let metadata = ArrowReaderMetadata::load(&file, ArrowReaderOptions::new())
            .map_err(Error::Metadata)?;
        Ok(Self { path, metadata })
    }
}

impl ColumnSource for ParquetSource {
    fn columns(&self) -> Vec<ColumnInfo> {
        self.metadata
            .schema()
            .fields()
            .iter()
            .map(|field| ColumnInfo {
                name: field.name().clone(),
                nested: is_nested(field.data_type()),
            })
            .collect()
    }

    fn row_count(&self) -> u64 {
        self.metadata.metadata().file_metadata().num_rows() as u64
    }

    fn read_column(&mut self, column: &str, limit: usize) -> Result<Vec<Value>> {
        let index = self
            .metadata
            .schema()
            .fields()
            .iter()
            .position(|field| field.name() == column)
            .ok_or_else(|| Error::UnknownColumn(column.to_string()))?;

        let file = File::open(&self.path).map_err(|source| Error::Open {
            path: self.path.clone(),
            source,
        })?;
        let builder = ParquetRecordBatchReaderBuilder::new_with_metadata(file, self.metadata.clone());
        let mask = ProjectionMask::roots(builder.parquet_schema(), [index]);
        let reader = builder
            .with_projection(mask)
            .with_limit(limit)
            .build()
            .map_err(|err| column_error(column, err))?;

        let mut values = Vec::new();
        for batch in reader {
            let batch = batch.map_err(|err| column_error(column, err))?;
            let array = batch.column(0);
            for i in 0..batch.num_rows() {
                if values.len() >= limit {
                    break;
                }
                values.push(decode_value(array, i));
            }
        }
        Ok(values)
    }
}

fn column_error(column: &str, err: impl std::fmt::Display) -> Error {
    Error::Column {
        column: column.to_string(),
        message: err.to_string(),
    }
}

fn is_nested(data_type: &ArrowType) -> bool {
    matches!(
        data_type,
        ArrowType::Struct(_)
            | ArrowType::List(_)
            | ArrowType::LargeList(_)
            | ArrowType::FixedSizeList(_, _)
            | ArrowType::Map(_, _)
            | ArrowType::Union(_, _)
    )
}

fn decode_value(array: &ArrayRef, row: usize) -> Value {
    if array.is_null(row) {
        return Value::Null;
    }

    match array.data_type() {
        ArrowType::Boolean => {
            let arr = array.as_any().downcast_ref::<BooleanArray>().unwrap();
            Value::Bool(arr.value(row))
        }
        ArrowType::Int8 => {
            let arr = array.as_any().downcast_ref::<Int8Array>().unwrap();
            Value::Int(arr.value(row) as i64)
        }
        ArrowType::Int16 => {
            let arr = array.as_any().downcast_ref::<Int16Array>().unwrap();
            Value::Int(arr.value(row) as i64)
        }
        ArrowType::Int32 => {
            let arr = array.as_any().downcast_ref::<Int32Array>().unwrap();
            Value::Int(arr.value(row) as i64)
        }
        ArrowType::Int64 => {
            let arr = array.as_any().downcast_ref::<Int64Array>().unwrap();
            Value::Int(arr.value(row))
        }
        ArrowType::UInt8 => {
            let arr = array.as_any().downcast_ref::<UInt8Array>().unwrap();
            Value::Int(arr.value(row) as i64)
        }
        ArrowType::UInt16 => {
            let arr = array.as_any().downcast_ref::<UInt16Array>().unwrap();
            Value::Int(arr.value(row) as i64)
        }
        ArrowType::UInt32 => {
            let arr = array.as_any().downcast_ref::<UInt32Array>().unwrap();
            Value::Int(arr.value(row) as i64)
        }
        ArrowType::UInt64 => {
            let arr = array.as_any().downcast_ref::<UInt64Array>().unwrap();
            Value::Int(arr.value(row) as i64)
        }
        ArrowType::Float32 => {
            let arr = array.as_any().downcast_ref::<Float32Array>().unwrap();
            Value::Float(arr.value(row) as f64)
        }
        ArrowType::Float64 => {
            let arr = array.as_any().downcast_ref::<Float64Array>().unwrap();
            Value::Float(arr.value(row))
        }
        ArrowType::Utf8 => {
            let arr = array.as_any().downcast_ref::<StringArray>().unwrap();
            Value::Text(arr.value(row).to_string())
        }
        ArrowType::LargeUtf8 => {
            let arr = array.as_any().downcast_ref::<LargeStringArray>().unwrap();
            Value::Text(arr.value(row).to_string())
        }
        ArrowType::Binary => {
            let arr = array.as_any().downcast_ref::<BinaryArray>().unwrap();
            Value::Binary(arr.value(row).to_vec())
        }
        ArrowType::LargeBinary => {
            let arr = array.as_any().downcast_ref::<LargeBinaryArray>().unwrap();
            Value::Binary(arr.value(row).to_vec())
        }
        ArrowType::FixedSizeBinary(_) => {
            let arr = array.as_any().downcast_ref::<FixedSizeBinaryArray>().unwrap();
            Value::Binary(arr.value(row).to_vec())
        }
        _ => {
            // timestamps, decimals, dictionaries: fall back to arrow's
            // string rendering
            let formatter = arrow::util::display::ArrayFormatter::try_new(
                array.as_ref(),
                &arrow::util::display::FormatOptions::default(),
            );
            match formatter {
                Ok(fmt) => Value::Text(fmt.value(row).to_string()),
                Err(_) => Value::Null,
            }
        }
    }
}
