use std::fmt;

use crate::schema::AttributeIndex;

/// A class label token.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash,
    serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct Label(String);

impl Label {
    /// Create a label from any string-like value.
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Return the label as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Label {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

impl From<String> for Label {
    fn from(label: String) -> Self {
        Self(label)
    }
}

/// A raw attribute value as read from the data source.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// A category string for a categorical attribute.
    Category(String),
    /// A numeric value for a continuous attribute.
    Number(f64),
}

impl RawValue {
    /// Shorthand for [`RawValue::Category`].
    pub fn category(value: impl Into<String>) -> Self {
        Self::Category(value.into())
    }

    /// Shorthand for [`RawValue::Number`].
    pub fn number(value: f64) -> Self {
        Self::Number(value)
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Category(s) => f.write_str(s),
            RawValue::Number(v) => write!(f, "{v}"),
        }
    }
}

/// A labeled record: one raw value per schema attribute, in schema order.
///
/// Records are immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    values: Vec<RawValue>,
    label: Label,
}

impl Record {
    /// Create a record from values in schema declaration order and a label.
    pub fn new(values: Vec<RawValue>, label: impl Into<Label>) -> Self {
        Self {
            values,
            label: label.into(),
        }
    }

    /// Return the raw value for the given attribute, if present.
    #[must_use]
    pub fn value(&self, attribute: AttributeIndex) -> Option<&RawValue> {
        self.values.get(attribute.index())
    }

    /// Return all raw values in schema order.
    #[must_use]
    pub fn values(&self) -> &[RawValue] {
        &self.values
    }

    /// Return the class label.
    #[must_use]
    pub fn label(&self) -> &Label {
        &self.label
    }
}
