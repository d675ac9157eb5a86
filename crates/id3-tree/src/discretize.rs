//! Discretization of raw attribute values into bins.
//!
//! Categorical attributes get one bin per category ordinal. Continuous
//! attributes get four fixed quartile buckets keyed by their upper edge.
//! Values outside [0, 1] are clamped into the first or last quartile.

use std::fmt;

use crate::error::TreeError;
use crate::record::{RawValue, Record};
use crate::schema::{Attribute, AttributeIndex, AttributeKind, AttributeSchema};

/// A quartile bucket of a continuous attribute.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
    serde::Serialize, serde::Deserialize,
)]
pub enum Quartile {
    /// `v <= 0.25`
    Q1,
    /// `0.25 < v <= 0.5`
    Q2,
    /// `0.5 < v <= 0.75`
    Q3,
    /// `v > 0.75`
    Q4,
}

impl Quartile {
    /// All quartiles in ascending order.
    pub const ALL: [Quartile; 4] = [Quartile::Q1, Quartile::Q2, Quartile::Q3, Quartile::Q4];

    /// Quantize a value. Finite values below 0 land in `Q1`, above 1 in `Q4`.
    #[must_use]
    pub fn of(value: f64) -> Self {
        if value <= 0.25 {
            Quartile::Q1
        } else if value <= 0.5 {
            Quartile::Q2
        } else if value <= 0.75 {
            Quartile::Q3
        } else {
            Quartile::Q4
        }
    }

    /// Return the upper edge of the bucket.
    #[must_use]
    pub fn upper_edge(self) -> f64 {
        match self {
            Quartile::Q1 => 0.25,
            Quartile::Q2 => 0.5,
            Quartile::Q3 => 0.75,
            Quartile::Q4 => 1.0,
        }
    }
}

/// A discretized attribute value, used as the edge key between tree nodes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
    serde::Serialize, serde::Deserialize,
)]
pub enum Bin {
    /// Ordinal of a category.
    Category(usize),
    /// Quartile bucket of a continuous value.
    Quartile(Quartile),
}

impl Bin {
    /// Return the canonical floating label of the bin: the category ordinal,
    /// or the quartile's upper edge.
    #[must_use]
    pub fn value(self) -> f64 {
        match self {
            Bin::Category(ordinal) => ordinal as f64,
            Bin::Quartile(q) => q.upper_edge(),
        }
    }
}

impl fmt::Display for Bin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bin::Category(ordinal) => write!(f, "{ordinal}"),
            Bin::Quartile(q) => write!(f, "{:.2}", q.upper_edge()),
        }
    }
}

/// Return every possible bin of `attribute`, in ascending order.
#[must_use]
pub fn possible_bins(attribute: &Attribute) -> Vec<Bin> {
    match attribute.kind() {
        AttributeKind::Categorical { categories } => {
            (0..categories.len()).map(Bin::Category).collect()
        }
        AttributeKind::Continuous => Quartile::ALL.into_iter().map(Bin::Quartile).collect(),
    }
}

/// Map a raw value of `attribute` to its bin.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`TreeError::UnknownCategory`] | categorical value absent from the ordinal table |
/// | [`TreeError::NonFiniteValue`] | continuous value is NaN or infinite |
/// | [`TreeError::KindMismatch`] | value kind does not match the attribute kind |
pub fn bin_of(attribute: &Attribute, raw: &RawValue) -> Result<Bin, TreeError> {
    match (attribute.kind(), raw) {
        (AttributeKind::Categorical { .. }, RawValue::Category(value)) => attribute
            .ordinal(value)
            .map(Bin::Category)
            .ok_or_else(|| TreeError::UnknownCategory {
                attribute: attribute.name().to_string(),
                value: value.clone(),
            }),
        (AttributeKind::Continuous, RawValue::Number(value)) => {
            if !value.is_finite() {
                return Err(TreeError::NonFiniteValue {
                    attribute: attribute.name().to_string(),
                    value: *value,
                });
            }
            Ok(Bin::Quartile(Quartile::of(*value)))
        }
        (AttributeKind::Categorical { .. }, RawValue::Number(_)) => Err(TreeError::KindMismatch {
            attribute: attribute.name().to_string(),
            expected: "categorical",
        }),
        (AttributeKind::Continuous, RawValue::Category(_)) => Err(TreeError::KindMismatch {
            attribute: attribute.name().to_string(),
            expected: "continuous",
        }),
    }
}

/// Discretize a record's value for the attribute at `index`.
///
/// # Errors
///
/// Returns [`TreeError::MissingValue`] when the record has no value at
/// `index`, otherwise any error of [`bin_of`].
pub fn record_bin(
    schema: &AttributeSchema,
    index: AttributeIndex,
    record: &Record,
) -> Result<Bin, TreeError> {
    let attribute = schema.attribute(index);
    let raw = record.value(index).ok_or_else(|| TreeError::MissingValue {
        attribute: attribute.name().to_string(),
    })?;
    bin_of(attribute, raw)
}

/// Split `records` into one bucket per possible bin of the attribute,
/// in [`possible_bins`] order.
///
/// The buckets form a total, non-overlapping partition of `records`.
///
/// # Errors
///
/// Fails on the first record that cannot be discretized.
pub fn partition<'a>(
    schema: &AttributeSchema,
    index: AttributeIndex,
    records: &[&'a Record],
) -> Result<Vec<Vec<&'a Record>>, TreeError> {
    let bins = possible_bins(schema.attribute(index));
    let mut buckets: Vec<Vec<&Record>> = vec![Vec::new(); bins.len()];
    for &record in records {
        let position = match record_bin(schema, index, record)? {
            Bin::Category(ordinal) => ordinal,
            Bin::Quartile(q) => q as usize,
        };
        buckets[position].push(record);
    }
    Ok(buckets)
}
