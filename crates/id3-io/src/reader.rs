//! Schema-aware CSV record reader.

use std::io::Read;
use std::path::{Path, PathBuf};

use id3_tree::{AttributeIndex, AttributeSchema, Label, RawValue, Record};
use tracing::{debug, info, instrument, warn};

use crate::IoError;

/// Why a data row was dropped.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SkipReason {
    /// The row has a different number of columns than the header.
    #[error("expected {expected} columns, got {got}")]
    ColumnCount {
        /// Column count of the header.
        expected: usize,
        /// Column count of the row.
        got: usize,
    },

    /// A continuous field does not parse as a number.
    #[error("column \"{column}\": \"{raw}\" is not a number")]
    NotANumber {
        /// Attribute name of the field.
        column: String,
        /// The raw field.
        raw: String,
    },

    /// A continuous field parses to NaN or infinity.
    #[error("column \"{column}\": \"{raw}\" is not finite")]
    NonFinite {
        /// Attribute name of the field.
        column: String,
        /// The raw field.
        raw: String,
    },

    /// The CSV parser rejected the row.
    #[error("unreadable row: {message}")]
    Unreadable {
        /// Parser message.
        message: String,
    },
}

/// A data row that was dropped while loading.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    /// One-based line number in the file (0 when unknown).
    pub line: u64,
    /// Why the row was dropped.
    pub reason: SkipReason,
}

/// Records loaded from a CSV file, plus the rows that were dropped.
#[derive(Debug, Default)]
pub struct Dataset {
    records: Vec<Record>,
    skipped: Vec<SkippedRow>,
}

impl Dataset {
    /// A dataset with no records, used in place of a file that failed to load.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Return the loaded records in file order.
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Return the rows that were dropped, in file order.
    #[must_use]
    pub fn skipped(&self) -> &[SkippedRow] {
        &self.skipped
    }

    /// Return the number of loaded records.
    #[must_use]
    pub fn n_records(&self) -> usize {
        self.records.len()
    }

    /// Consume the dataset and return its records.
    #[must_use]
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}

/// Reads labeled records from a CSV file according to an [`AttributeSchema`].
///
/// Expected CSV format:
/// - Header row required; names are matched case-insensitively against the
///   schema's attribute names, in any order
/// - The last column is the label
/// - Every schema attribute appears exactly once
///
/// Rows with the wrong column count, or with a continuous field that is not
/// a finite number, are skipped and logged instead of failing the load.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::CsvParse`] | I/O failure while streaming the file |
/// | [`IoError::EmptyHeader`] | No header row |
/// | [`IoError::UnknownColumn`] | Header column names no attribute |
/// | [`IoError::DuplicateColumn`] | Attribute named twice |
/// | [`IoError::MissingColumn`] | Attribute has no column |
pub struct RecordReader<'a> {
    path: PathBuf,
    schema: &'a AttributeSchema,
}

impl<'a> RecordReader<'a> {
    /// Create a new reader for the given CSV file path.
    pub fn new(path: &Path, schema: &'a AttributeSchema) -> Self {
        Self {
            path: path.to_path_buf(),
            schema,
        }
    }

    /// Read the CSV file, returning a [`Dataset`].
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read(&self) -> Result<Dataset, IoError> {
        let file = std::fs::File::open(&self.path).map_err(|e| IoError::FileNotFound {
            path: self.path.clone(),
            source: e,
        })?;
        self.read_from(file)
    }

    fn read_from(&self, source: impl Read) -> Result<Dataset, IoError> {
        // flexible(true) lets rows of the wrong width through so they can be
        // skipped individually.
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(source);

        let header = rdr.headers().map_err(|e| self.csv_error(e))?.clone();
        if header.is_empty() {
            return Err(IoError::EmptyHeader {
                path: self.path.clone(),
            });
        }
        let columns = self.map_columns(&header)?;
        let expected_cols = header.len();
        debug!(expected_cols, "read CSV header");

        let mut records = Vec::new();
        let mut skipped = Vec::new();
        let mut foreign_labels = 0usize;
        let mut clamped_values = 0usize;

        for result in rdr.records() {
            let row = match result {
                Ok(row) => row,
                Err(e) if e.is_io_error() => return Err(self.csv_error(e)),
                Err(e) => {
                    let line = e.position().map_or(0, |p| p.line());
                    skip_row(&mut skipped, line, SkipReason::Unreadable {
                        message: e.to_string(),
                    });
                    continue;
                }
            };
            let line = row.position().map_or(0, |p| p.line());

            if row.len() != expected_cols {
                skip_row(&mut skipped, line, SkipReason::ColumnCount {
                    expected: expected_cols,
                    got: row.len(),
                });
                continue;
            }

            match self.parse_row(&row, &columns) {
                Ok(record) => {
                    let label = record.label();
                    if !label.as_str().is_empty() && !self.schema.knows_label(label) {
                        foreign_labels += 1;
                    }
                    clamped_values += record
                        .values()
                        .iter()
                        .filter(|v| matches!(v, RawValue::Number(x) if !(0.0..=1.0).contains(x)))
                        .count();
                    records.push(record);
                }
                Err(reason) => skip_row(&mut skipped, line, reason),
            }
        }

        if foreign_labels > 0 {
            warn!(
                foreign_labels,
                "records carry labels outside the schema alphabet"
            );
        }
        if clamped_values > 0 {
            warn!(
                clamped_values,
                "continuous values outside [0, 1] will be clamped into the edge quartiles"
            );
        }

        info!(
            n_records = records.len(),
            n_skipped = skipped.len(),
            "records loaded"
        );

        Ok(Dataset { records, skipped })
    }

    /// Map each non-label header column to its schema attribute.
    fn map_columns(&self, header: &csv::StringRecord) -> Result<Vec<AttributeIndex>, IoError> {
        let n_features = header.len() - 1;
        let mut columns = Vec::with_capacity(n_features);
        for name in header.iter().take(n_features) {
            let column = name.to_lowercase();
            let index = self
                .schema
                .indices()
                .find(|&i| self.schema.attribute(i).name().to_lowercase() == column)
                .ok_or_else(|| IoError::UnknownColumn {
                    path: self.path.clone(),
                    column: column.clone(),
                })?;
            if columns.contains(&index) {
                return Err(IoError::DuplicateColumn {
                    path: self.path.clone(),
                    column,
                });
            }
            columns.push(index);
        }

        if let Some(missing) = self.schema.indices().find(|i| !columns.contains(i)) {
            return Err(IoError::MissingColumn {
                path: self.path.clone(),
                attribute: self.schema.attribute(missing).name().to_string(),
            });
        }
        Ok(columns)
    }

    fn parse_row(
        &self,
        row: &csv::StringRecord,
        columns: &[AttributeIndex],
    ) -> Result<Record, SkipReason> {
        let mut values: Vec<Option<RawValue>> = vec![None; self.schema.n_attributes()];
        for (raw, &index) in row.iter().zip(columns) {
            let attribute = self.schema.attribute(index);
            let value = if attribute.is_continuous() {
                let number: f64 = raw.parse().map_err(|_| SkipReason::NotANumber {
                    column: attribute.name().to_string(),
                    raw: raw.to_string(),
                })?;
                if !number.is_finite() {
                    return Err(SkipReason::NonFinite {
                        column: attribute.name().to_string(),
                        raw: raw.to_string(),
                    });
                }
                RawValue::Number(number)
            } else {
                RawValue::Category(raw.to_string())
            };
            values[index.index()] = Some(value);
        }

        // map_columns guarantees every attribute has exactly one column
        let values: Vec<RawValue> = values.into_iter().flatten().collect();
        let label = row.get(columns.len()).unwrap_or("");
        Ok(Record::new(values, Label::new(label)))
    }

    fn csv_error(&self, e: csv::Error) -> IoError {
        IoError::CsvParse {
            path: self.path.clone(),
            offset: e.position().map_or(0, |p| p.byte()),
            source: e,
        }
    }
}

fn skip_row(skipped: &mut Vec<SkippedRow>, line: u64, reason: SkipReason) {
    warn!(line, %reason, "row discarded");
    skipped.push(SkippedRow { line, reason });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f.flush().unwrap();
        f
    }

    const CUSTOMER_HEADER: &str = "Type,LifeStyle,Vacation,eCredit,Salary,Property,label\n";

    #[test]
    fn read_valid_customers() {
        let csv = format!(
            "{CUSTOMER_HEADER}student,spend<<saving,0.1,0.2,0.3,0.4,C1\ndoctor,spend>saving,0.9,0.8,0.7,0.6,C5\n"
        );
        let f = write_csv(&csv);
        let schema = AttributeSchema::customer();
        let ds = RecordReader::new(f.path(), &schema).read().unwrap();
        assert_eq!(ds.n_records(), 2);
        assert!(ds.skipped().is_empty());
        let first = &ds.records()[0];
        assert_eq!(first.values()[0], RawValue::category("student"));
        assert_eq!(first.values()[2], RawValue::number(0.1));
        assert_eq!(first.label().as_str(), "C1");
    }

    #[test]
    fn columns_may_be_reordered() {
        let csv = "salary,TYPE,property,lifestyle,ecredit,vacation,class\n0.3,engineer,0.4,spend>saving,0.2,0.1,C2\n";
        let f = write_csv(csv);
        let schema = AttributeSchema::customer();
        let ds = RecordReader::new(f.path(), &schema).read().unwrap();
        let record = &ds.records()[0];
        assert_eq!(record.values()[0], RawValue::category("engineer"));
        assert_eq!(record.values()[2], RawValue::number(0.1));
        assert_eq!(record.values()[4], RawValue::number(0.3));
    }

    #[test]
    fn malformed_rows_are_skipped() {
        let csv = format!(
            "{CUSTOMER_HEADER}student,spend<<saving,0.1,0.2,0.3,0.4,C1\nstudent,spend<<saving,0.1,0.2,C1\nstudent,spend<<saving,abc,0.2,0.3,0.4,C1\nstudent,spend<<saving,NaN,0.2,0.3,0.4,C1\nlibrarian,spend>>saving,0.5,0.5,0.5,0.5,C3\n"
        );
        let f = write_csv(&csv);
        let schema = AttributeSchema::customer();
        let ds = RecordReader::new(f.path(), &schema).read().unwrap();
        assert_eq!(ds.n_records(), 2);
        assert_eq!(ds.skipped().len(), 3);
        assert_eq!(ds.skipped()[0].line, 3);
        assert!(matches!(
            ds.skipped()[0].reason,
            SkipReason::ColumnCount { expected: 7, got: 5 }
        ));
        assert!(matches!(ds.skipped()[1].reason, SkipReason::NotANumber { .. }));
        assert!(matches!(ds.skipped()[2].reason, SkipReason::NonFinite { .. }));
    }

    #[test]
    fn unknown_column_error() {
        let csv = "type,lifestyle,vacation,ecredit,salary,height,label\n";
        let f = write_csv(csv);
        let schema = AttributeSchema::customer();
        let err = RecordReader::new(f.path(), &schema).read().unwrap_err();
        assert!(matches!(err, IoError::UnknownColumn { column, .. } if column == "height"));
    }

    #[test]
    fn missing_and_duplicate_columns() {
        let schema = AttributeSchema::customer();

        let f = write_csv("type,lifestyle,vacation,ecredit,salary,label\n");
        let err = RecordReader::new(f.path(), &schema).read().unwrap_err();
        assert!(matches!(err, IoError::MissingColumn { attribute, .. } if attribute == "property"));

        let f = write_csv("type,type,vacation,ecredit,salary,property,label\n");
        let err = RecordReader::new(f.path(), &schema).read().unwrap_err();
        assert!(matches!(err, IoError::DuplicateColumn { .. }));
    }

    #[test]
    fn empty_file_has_no_header() {
        let f = write_csv("");
        let schema = AttributeSchema::customer();
        let err = RecordReader::new(f.path(), &schema).read().unwrap_err();
        assert!(matches!(err, IoError::EmptyHeader { .. }));
    }

    #[test]
    fn missing_file_error() {
        let schema = AttributeSchema::customer();
        let err = RecordReader::new(Path::new("/nonexistent/train.csv"), &schema)
            .read()
            .unwrap_err();
        assert!(matches!(err, IoError::FileNotFound { .. }));
    }

    #[test]
    fn unknown_categories_are_kept_for_discretization() {
        let csv = format!("{CUSTOMER_HEADER}pilot,spend<<saving,0.1,0.2,0.3,0.4,C9\n");
        let f = write_csv(&csv);
        let schema = AttributeSchema::customer();
        let ds = RecordReader::new(f.path(), &schema).read().unwrap();
        assert_eq!(ds.n_records(), 1);
        assert_eq!(ds.records()[0].values()[0], RawValue::category("pilot"));
    }
}
