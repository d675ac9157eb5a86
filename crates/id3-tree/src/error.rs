/// Errors from schema construction, discretization, tree building, and evaluation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TreeError {
    /// Returned when a schema declares no attributes.
    #[error("schema must declare at least one attribute")]
    NoAttributes,

    /// Returned when a schema declares an empty label alphabet.
    #[error("schema must declare at least one label")]
    NoLabels,

    /// Returned when two attributes share a name.
    #[error("duplicate attribute name \"{name}\"")]
    DuplicateAttribute {
        /// The repeated attribute name.
        name: String,
    },

    /// Returned when a categorical attribute has no categories.
    #[error("categorical attribute \"{attribute}\" has no categories")]
    EmptyCategories {
        /// Name of the offending attribute.
        attribute: String,
    },

    /// Returned when a categorical attribute lists the same category twice.
    #[error("categorical attribute \"{attribute}\" lists category \"{category}\" twice")]
    DuplicateCategory {
        /// Name of the offending attribute.
        attribute: String,
        /// The repeated category.
        category: String,
    },

    /// Returned when the label alphabet lists the same label twice.
    #[error("label \"{label}\" appears twice in the alphabet")]
    DuplicateLabel {
        /// The repeated label.
        label: String,
    },

    /// Returned when a categorical value is absent from the attribute's ordinal table.
    #[error("unknown category \"{value}\" for attribute \"{attribute}\"")]
    UnknownCategory {
        /// Name of the attribute being discretized.
        attribute: String,
        /// The unmapped raw value.
        value: String,
    },

    /// Returned when a continuous value is NaN or infinite.
    #[error("non-finite value {value} for attribute \"{attribute}\"")]
    NonFiniteValue {
        /// Name of the attribute being discretized.
        attribute: String,
        /// The offending value.
        value: f64,
    },

    /// Returned when a raw value's kind does not match the attribute kind.
    #[error("attribute \"{attribute}\" expects a {expected} value")]
    KindMismatch {
        /// Name of the attribute being discretized.
        attribute: String,
        /// Human-readable expected kind ("categorical" or "continuous").
        expected: &'static str,
    },

    /// Returned when a record carries fewer values than the schema has attributes.
    #[error("record has no value for attribute \"{attribute}\"")]
    MissingValue {
        /// Name of the attribute without a value.
        attribute: String,
    },

    /// Returned when a candidate attribute index lies outside the schema.
    #[error("attribute index {index} out of range for a schema with {n_attributes} attributes")]
    UnknownAttribute {
        /// The out-of-range index.
        index: usize,
        /// Number of attributes in the schema.
        n_attributes: usize,
    },

    /// Returned when the build runs out of attributes and no label can be derived.
    #[error("no attributes left and no label available at a node with {n_samples} records")]
    Exhausted {
        /// Number of records that reached the node.
        n_samples: usize,
    },

    /// Returned when the purity threshold is outside (0.0, 1.0).
    #[error("purity threshold must be in (0.0, 1.0), got {threshold}")]
    InvalidPurityThreshold {
        /// The invalid threshold value provided.
        threshold: f64,
    },

    /// Returned when the fold count is zero.
    #[error("folds must be at least 1, got {folds}")]
    InvalidFoldCount {
        /// The invalid fold count provided.
        folds: usize,
    },
}
