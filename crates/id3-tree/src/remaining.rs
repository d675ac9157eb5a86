use crate::schema::{AttributeIndex, AttributeSchema};

/// The attributes still eligible for splitting during one tree build.
///
/// # Exhaustion is global to a build
///
/// One `RemainingAttributes` is threaded by `&mut` through every recursive
/// call of a single build. When a node splits on an attribute, that
/// attribute is removed here and becomes unavailable to *every* node built
/// afterwards, including sibling subtrees, not just the chosen subtree.
/// Cloning the set per branch would change which trees get built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemainingAttributes {
    order: Vec<AttributeIndex>,
}

impl RemainingAttributes {
    /// Every attribute of `schema`, in declaration order.
    #[must_use]
    pub fn all(schema: &AttributeSchema) -> Self {
        Self {
            order: schema.indices().collect(),
        }
    }

    /// A custom candidate set; iteration order is the order given.
    ///
    /// Duplicates are dropped, keeping the first occurrence.
    pub fn from_indices(indices: impl IntoIterator<Item = AttributeIndex>) -> Self {
        let mut order = Vec::new();
        for index in indices {
            if !order.contains(&index) {
                order.push(index);
            }
        }
        Self { order }
    }

    /// Remove `attribute`. Returns `false` if it was not present.
    pub fn remove(&mut self, attribute: AttributeIndex) -> bool {
        match self.order.iter().position(|&a| a == attribute) {
            Some(pos) => {
                self.order.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Return `true` if `attribute` is still eligible.
    #[must_use]
    pub fn contains(&self, attribute: AttributeIndex) -> bool {
        self.order.contains(&attribute)
    }

    /// Return the remaining attributes in candidate order.
    #[must_use]
    pub fn as_slice(&self) -> &[AttributeIndex] {
        &self.order
    }

    /// Return the number of remaining attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Return `true` when no attribute remains.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_follows_declaration_order() {
        let schema = AttributeSchema::customer();
        let remaining = RemainingAttributes::all(&schema);
        assert_eq!(remaining.len(), 6);
        assert_eq!(remaining.as_slice()[0], AttributeIndex::new(0));
        assert_eq!(remaining.as_slice()[5], AttributeIndex::new(5));
    }

    #[test]
    fn remove_preserves_order() {
        let mut remaining = RemainingAttributes::from_indices(
            [3, 1, 2].into_iter().map(AttributeIndex::new),
        );
        assert!(remaining.remove(AttributeIndex::new(1)));
        assert!(!remaining.remove(AttributeIndex::new(1)));
        assert_eq!(
            remaining.as_slice(),
            &[AttributeIndex::new(3), AttributeIndex::new(2)]
        );
        assert!(!remaining.contains(AttributeIndex::new(1)));
    }

    #[test]
    fn duplicates_dropped() {
        let remaining = RemainingAttributes::from_indices(
            [0, 0, 1].into_iter().map(AttributeIndex::new),
        );
        assert_eq!(remaining.len(), 2);
        assert!(!remaining.is_empty());
    }
}
