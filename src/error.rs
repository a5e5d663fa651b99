//! Error taxonomy for loading and diffing

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the library.
///
/// Load failures that make a whole file unusable (`Open`, `Metadata`) are
/// fatal and abort the operation. A single unreadable column is *not* an
/// error at this level: the loader logs it and drops the column.
#[derive(Debug, Error)]
pub enum Error {
    /// The file could not be opened at all.
    #[error("cannot open {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file footer or schema metadata could not be read.
    #[error("cannot read parquet metadata")]
    Metadata(#[source] parquet::errors::ParquetError),

    /// A column's values could not be decoded. Soft: callers skip the
    /// column and continue.
    #[error("cannot read column {column}: {message}")]
    Column { column: String, message: String },

    /// A column name was requested that the source does not declare.
    #[error("no such column: {0}")]
    UnknownColumn(String),

    /// A diff was requested without any key columns.
    #[error("diff requires at least one key column")]
    NoKeyColumns,
}

pub type Result<T> = std::result::Result<T, Error>;
