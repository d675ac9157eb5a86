//! File loading for the id3 classifier: CSV records and JSON schemas.

mod error;
mod reader;
mod schema_reader;

pub use error::IoError;
pub use reader::{Dataset, RecordReader, SkipReason, SkippedRow};
pub use schema_reader::SchemaReader;
