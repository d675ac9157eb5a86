//! Attribute schemas: the static domain description every other component consumes.

use std::collections::HashSet;
use std::fmt;

use crate::error::TreeError;
use crate::record::Label;

/// Zero-based position of an attribute in its schema's declaration order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
    serde::Serialize, serde::Deserialize,
)]
pub struct AttributeIndex(usize);

impl AttributeIndex {
    /// Create a new attribute index from a zero-based schema position.
    #[must_use]
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Return the zero-based schema position.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for AttributeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The value domain of an attribute.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AttributeKind {
    /// A fixed set of category strings; a category's position is its ordinal.
    Categorical {
        /// Categories in ordinal order.
        categories: Vec<String>,
    },
    /// A numeric value pre-normalized into [0, 1], discretized into quartiles.
    Continuous,
}

/// A named attribute and its domain.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct Attribute {
    name: String,
    #[serde(flatten)]
    kind: AttributeKind,
}

impl Attribute {
    /// Create a categorical attribute with categories in ordinal order.
    pub fn categorical<S: Into<String>>(
        name: impl Into<String>,
        categories: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: AttributeKind::Categorical {
                categories: categories.into_iter().map(Into::into).collect(),
            },
        }
    }

    /// Create a continuous attribute.
    pub fn continuous(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: AttributeKind::Continuous,
        }
    }

    /// Return the attribute name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return the attribute kind.
    #[must_use]
    pub fn kind(&self) -> &AttributeKind {
        &self.kind
    }

    /// Return the ordinal of `category`, if it is part of this attribute's domain.
    ///
    /// Always `None` for continuous attributes.
    #[must_use]
    pub fn ordinal(&self, category: &str) -> Option<usize> {
        match &self.kind {
            AttributeKind::Categorical { categories } => {
                categories.iter().position(|c| c == category)
            }
            AttributeKind::Continuous => None,
        }
    }

    /// Return `true` for continuous attributes.
    #[must_use]
    pub fn is_continuous(&self) -> bool {
        matches!(self.kind, AttributeKind::Continuous)
    }
}

#[derive(serde::Deserialize)]
struct SchemaDef {
    attributes: Vec<Attribute>,
    labels: Vec<Label>,
}

impl TryFrom<SchemaDef> for AttributeSchema {
    type Error = TreeError;

    fn try_from(def: SchemaDef) -> Result<Self, Self::Error> {
        AttributeSchema::new(def.attributes, def.labels)
    }
}

/// An ordered set of attributes together with the fixed label alphabet.
///
/// Attribute declaration order is significant: it is the candidate order
/// used to break information-gain ties.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(try_from = "SchemaDef")]
pub struct AttributeSchema {
    attributes: Vec<Attribute>,
    labels: Vec<Label>,
}

impl AttributeSchema {
    /// Build a validated schema.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`TreeError::NoAttributes`] | `attributes` is empty |
    /// | [`TreeError::NoLabels`] | `labels` is empty |
    /// | [`TreeError::DuplicateAttribute`] | two attributes share a name |
    /// | [`TreeError::EmptyCategories`] | a categorical attribute has no categories |
    /// | [`TreeError::DuplicateCategory`] | a category is listed twice |
    /// | [`TreeError::DuplicateLabel`] | a label is listed twice |
    pub fn new(attributes: Vec<Attribute>, labels: Vec<Label>) -> Result<Self, TreeError> {
        if attributes.is_empty() {
            return Err(TreeError::NoAttributes);
        }
        if labels.is_empty() {
            return Err(TreeError::NoLabels);
        }

        let mut names = HashSet::new();
        for attribute in &attributes {
            if !names.insert(attribute.name.as_str()) {
                return Err(TreeError::DuplicateAttribute {
                    name: attribute.name.clone(),
                });
            }
            if let AttributeKind::Categorical { categories } = &attribute.kind {
                if categories.is_empty() {
                    return Err(TreeError::EmptyCategories {
                        attribute: attribute.name.clone(),
                    });
                }
                let mut seen = HashSet::new();
                for category in categories {
                    if !seen.insert(category.as_str()) {
                        return Err(TreeError::DuplicateCategory {
                            attribute: attribute.name.clone(),
                            category: category.clone(),
                        });
                    }
                }
            }
        }

        let mut seen = HashSet::new();
        for label in &labels {
            if !seen.insert(label.as_str()) {
                return Err(TreeError::DuplicateLabel {
                    label: label.as_str().to_string(),
                });
            }
        }

        Ok(Self { attributes, labels })
    }

    /// The customer classification domain: five customer classes `C1`..`C5`.
    #[must_use]
    pub fn customer() -> Self {
        Self {
            attributes: vec![
                Attribute::categorical(
                    "type",
                    ["student", "engineer", "librarian", "professor", "doctor"],
                ),
                Attribute::categorical(
                    "lifestyle",
                    ["spend>saving", "spend<saving", "spend>>saving", "spend<<saving"],
                ),
                Attribute::continuous("vacation"),
                Attribute::continuous("ecredit"),
                Attribute::continuous("salary"),
                Attribute::continuous("property"),
            ],
            labels: ["C1", "C2", "C3", "C4", "C5"].into_iter().map(Label::from).collect(),
        }
    }

    /// The product outcome domain: binary labels `1` and `0`.
    #[must_use]
    pub fn product() -> Self {
        Self {
            attributes: vec![
                Attribute::categorical("type", ["Fund", "Loan", "Mortgage", "CD", "Bank_Account"]),
                Attribute::categorical(
                    "customer",
                    ["Student", "Business", "Professional", "Doctor", "Other"],
                ),
                Attribute::continuous("monthly_fee"),
                Attribute::continuous("advertisement_budget"),
                Attribute::categorical("size", ["Small", "Medium", "Large"]),
                Attribute::categorical("promotion", ["Full", "Web", "Web&Email", "None"]),
                Attribute::continuous("interest_rate"),
                Attribute::continuous("period"),
            ],
            labels: ["1", "0"].into_iter().map(Label::from).collect(),
        }
    }

    /// Return the attributes in declaration order.
    #[must_use]
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Return the attribute at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` does not belong to this schema.
    #[must_use]
    pub fn attribute(&self, index: AttributeIndex) -> &Attribute {
        &self.attributes[index.index()]
    }

    /// Return the number of attributes.
    #[must_use]
    pub fn n_attributes(&self) -> usize {
        self.attributes.len()
    }

    /// Look up an attribute by name.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<AttributeIndex> {
        self.attributes
            .iter()
            .position(|a| a.name == name)
            .map(AttributeIndex::new)
    }

    /// Iterate over attribute indices in declaration order.
    pub fn indices(&self) -> impl Iterator<Item = AttributeIndex> + '_ {
        (0..self.attributes.len()).map(AttributeIndex::new)
    }

    /// Return the fixed label alphabet.
    #[must_use]
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Return `true` if `label` belongs to the alphabet.
    #[must_use]
    pub fn knows_label(&self, label: &Label) -> bool {
        self.labels.contains(label)
    }
}
