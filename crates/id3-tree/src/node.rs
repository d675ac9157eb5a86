use std::collections::BTreeMap;
use std::fmt;

use crate::discretize::Bin;
use crate::record::Label;
use crate::schema::AttributeIndex;

/// Index into a `Vec<Node>` arena, identifying a specific node in a decision tree.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
    serde::Serialize, serde::Deserialize,
)]
pub struct NodeIndex(usize);

impl NodeIndex {
    /// Create a new node index from a zero-based arena position.
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Return the zero-based arena index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A node in a decision tree arena.
///
/// Children are referenced by [`NodeIndex`]. A split node keeps one entry
/// per possible bin of its attribute; `None` marks a bin for which the
/// build produced no node.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// An interior split node.
    Split {
        /// Attribute the records were partitioned on.
        attribute: AttributeIndex,
        /// Majority label of the training records that reached this node.
        fallback: Label,
        /// Child per bin, in bin order.
        children: BTreeMap<Bin, Option<NodeIndex>>,
        /// Number of training records that reached this node.
        n_samples: usize,
        /// Information gain of the chosen attribute at this node.
        gain: f64,
    },
    /// A terminal leaf node.
    Leaf {
        /// Predicted label.
        label: Label,
        /// Number of training records in this leaf.
        n_samples: usize,
    },
}

impl Node {
    /// Return the number of training records that reached this node.
    #[must_use]
    pub fn n_samples(&self) -> usize {
        match self {
            Node::Split { n_samples, .. } | Node::Leaf { n_samples, .. } => *n_samples,
        }
    }

    /// Return `true` if this node is a leaf.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    /// Return the label a prediction falls back to at this node: the leaf
    /// label, or the split's majority label.
    #[must_use]
    pub fn label(&self) -> &Label {
        match self {
            Node::Split { fallback, .. } => fallback,
            Node::Leaf { label, .. } => label,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_index_roundtrip() {
        let ni = NodeIndex::new(42);
        assert_eq!(ni.index(), 42);
        assert_eq!(format!("{ni}"), "42");
    }

    #[test]
    fn node_index_ordering() {
        assert!(NodeIndex::new(10) < NodeIndex::new(20));
    }

    fn make_leaf() -> Node {
        Node::Leaf {
            label: Label::from("C2"),
            n_samples: 10,
        }
    }

    fn make_split() -> Node {
        let children = [(Bin::Category(0), Some(NodeIndex::new(1))), (Bin::Category(1), None)]
            .into_iter()
            .collect();
        Node::Split {
            attribute: AttributeIndex::new(2),
            fallback: Label::from("C1"),
            children,
            n_samples: 20,
            gain: 0.3,
        }
    }

    #[test]
    fn leaf_accessors() {
        let leaf = make_leaf();
        assert!(leaf.is_leaf());
        assert_eq!(leaf.n_samples(), 10);
        assert_eq!(leaf.label().as_str(), "C2");
    }

    #[test]
    fn split_accessors() {
        let split = make_split();
        assert!(!split.is_leaf());
        assert_eq!(split.n_samples(), 20);
        assert_eq!(split.label().as_str(), "C1");
    }
}
