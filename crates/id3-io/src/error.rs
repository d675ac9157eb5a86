//! I/O error types for id3-io.

use std::path::PathBuf;

/// Errors from opening and parsing record and schema files.
///
/// Malformed data rows are not errors: they are skipped and reported in
/// [`Dataset::skipped`](crate::Dataset::skipped).
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when the input file does not exist or is unreadable.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when reading the CSV stream fails at the I/O level.
    #[error("CSV read error in {path} at byte offset {offset}")]
    CsvParse {
        /// Path to the CSV file.
        path: PathBuf,
        /// Byte offset where the error occurred.
        offset: u64,
        /// Underlying CSV error.
        source: csv::Error,
    },

    /// Returned when the file has no header row.
    #[error("missing header row in {path}")]
    EmptyHeader {
        /// Path to the CSV file.
        path: PathBuf,
    },

    /// Returned when a header column names no schema attribute.
    #[error("unknown column \"{column}\" in {path}")]
    UnknownColumn {
        /// Path to the CSV file.
        path: PathBuf,
        /// The lower-cased column name.
        column: String,
    },

    /// Returned when a header names the same attribute twice.
    #[error("column \"{column}\" appears twice in {path}")]
    DuplicateColumn {
        /// Path to the CSV file.
        path: PathBuf,
        /// The lower-cased column name.
        column: String,
    },

    /// Returned when a schema attribute has no column in the header.
    #[error("no column for attribute \"{attribute}\" in {path}")]
    MissingColumn {
        /// Path to the CSV file.
        path: PathBuf,
        /// The schema attribute without a column.
        attribute: String,
    },

    /// Returned when a schema file is not valid JSON or fails schema validation.
    #[error("invalid schema file {path}")]
    SchemaParse {
        /// Path to the schema file.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
}
