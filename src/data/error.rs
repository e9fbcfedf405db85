use std::path::PathBuf;

use thiserror::Error;

/// Failures while reading the source tables. All of them are fatal at
/// start-up; query time never produces one.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("cannot open {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV in {path}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("cannot read parquet file {path}")]
    Parquet {
        path: PathBuf,
        #[source]
        source: parquet::errors::ParquetError,
    },

    #[error("cannot decode record batch from {path}")]
    Arrow {
        path: PathBuf,
        #[source]
        source: arrow::error::ArrowError,
    },

    #[error("{path}, row {row}: column '{column}' has non-numeric value '{value}'")]
    InvalidNumber {
        path: PathBuf,
        /// 1-based. For CSV this is the file line, counting the header.
        row: usize,
        column: String,
        value: String,
    },

    #[error("{path}: column '{column}' has unsupported type {data_type}")]
    UnsupportedColumn {
        path: PathBuf,
        column: String,
        data_type: String,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),
}
