use std::collections::{BTreeMap, VecDeque};
use std::fmt;

use tracing::{debug, instrument};

use crate::discretize::{Bin, partition, possible_bins};
use crate::entropy::{best_attribute, dominant_label, majority_label};
use crate::error::TreeError;
use crate::node::{Node, NodeIndex};
use crate::record::{Label, Record};
use crate::remaining::RemainingAttributes;
use crate::schema::{AttributeIndex, AttributeKind, AttributeSchema};

/// Configuration for ID3 tree induction.
///
/// Construct via [`Id3Config::new`], then chain `with_*` methods.
///
/// # Defaults
///
/// | Parameter          | Default |
/// |--------------------|---------|
/// | `purity_threshold` | 0.7     |
#[derive(Debug, Clone)]
pub struct Id3Config {
    pub(crate) purity_threshold: f64,
}

impl Id3Config {
    /// Create a new config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            purity_threshold: 0.7,
        }
    }

    /// Set the impurity-tolerance threshold.
    ///
    /// A node becomes a leaf once a single label holds strictly more than
    /// this fraction of its records.
    #[must_use]
    pub fn with_purity_threshold(mut self, purity_threshold: f64) -> Self {
        self.purity_threshold = purity_threshold;
        self
    }

    /// Return the impurity-tolerance threshold.
    #[must_use]
    pub fn purity_threshold(&self) -> f64 {
        self.purity_threshold
    }

    /// Build a tree from `records` with every schema attribute as a candidate.
    ///
    /// # Errors
    ///
    /// See [`Id3Config::train`].
    pub fn fit(
        &self,
        schema: &AttributeSchema,
        records: &[Record],
    ) -> Result<DecisionTree, TreeError> {
        let mut remaining = RemainingAttributes::all(schema);
        self.train(schema, records, &mut remaining)
    }

    /// Build a tree from `records`, drawing split attributes from `remaining`.
    ///
    /// Each chosen attribute is removed from `remaining` for the rest of
    /// the build (see [`RemainingAttributes`]); on return it holds the
    /// attributes that were never chosen. An empty `records` yields a tree
    /// without a root.
    ///
    /// # Errors
    ///
    /// | Variant | When |
    /// |---|---|
    /// | [`TreeError::InvalidPurityThreshold`] | threshold outside (0.0, 1.0) |
    /// | [`TreeError::UnknownAttribute`] | `remaining` holds an index outside `schema` |
    /// | [`TreeError::UnknownCategory`] | a record holds an unmapped category |
    /// | [`TreeError::NonFiniteValue`] | a record holds NaN or infinity |
    /// | [`TreeError::KindMismatch`] | a value's kind does not match its attribute |
    /// | [`TreeError::MissingValue`] | a record is shorter than the schema |
    /// | [`TreeError::Exhausted`] | attributes ran out and no label could be derived |
    #[instrument(skip_all, fields(n_records = records.len(), n_candidates = remaining.len()))]
    pub fn train(
        &self,
        schema: &AttributeSchema,
        records: &[Record],
        remaining: &mut RemainingAttributes,
    ) -> Result<DecisionTree, TreeError> {
        // `count > 1.0 * n` can never hold, so 1.0 is excluded
        if !(self.purity_threshold > 0.0 && self.purity_threshold < 1.0) {
            return Err(TreeError::InvalidPurityThreshold {
                threshold: self.purity_threshold,
            });
        }
        let n_attributes = schema.n_attributes();
        if let Some(bad) = remaining.as_slice().iter().find(|a| a.index() >= n_attributes) {
            return Err(TreeError::UnknownAttribute {
                index: bad.index(),
                n_attributes,
            });
        }

        let refs: Vec<&Record> = records.iter().collect();
        let mut arena: Vec<Node> = Vec::new();
        let root = build_tree(schema, &refs, remaining, self, 0, &mut arena)?;

        debug!(
            n_nodes = arena.len(),
            unused_attributes = remaining.len(),
            "decision tree built"
        );

        Ok(DecisionTree {
            schema: schema.clone(),
            nodes: arena,
            root,
        })
    }
}

impl Default for Id3Config {
    fn default() -> Self {
        Self::new()
    }
}

/// Recursively build the arena-based decision tree.
///
/// Returns the [`NodeIndex`] of the node just created in `arena`, or
/// `None` when `records` is empty.
fn build_tree(
    schema: &AttributeSchema,
    records: &[&Record],
    remaining: &mut RemainingAttributes,
    config: &Id3Config,
    depth: usize,
    arena: &mut Vec<Node>,
) -> Result<Option<NodeIndex>, TreeError> {
    let n_samples = records.len();
    if n_samples == 0 {
        return Ok(None);
    }

    let push_leaf = |arena: &mut Vec<Node>, label: &Label| {
        let idx = arena.len();
        arena.push(Node::Leaf {
            label: label.clone(),
            n_samples,
        });
        Some(NodeIndex::new(idx))
    };

    if let Some(label) = dominant_label(records, config.purity_threshold) {
        return Ok(push_leaf(arena, label));
    }

    let chosen = best_attribute(schema, records, remaining.as_slice())?;
    let Some(majority) = majority_label(records) else {
        // guard: non-empty records always yield a majority label
        return Err(TreeError::Exhausted { n_samples });
    };
    let Some((attribute, gain)) = chosen else {
        return Ok(push_leaf(arena, majority));
    };
    let fallback = majority.clone();

    debug!(
        attribute = schema.attribute(attribute).name(),
        gain,
        n_samples,
        depth,
        "split chosen"
    );

    // Visible to every node built after this one, siblings included.
    remaining.remove(attribute);

    let bins = possible_bins(schema.attribute(attribute));
    let buckets = partition(schema, attribute, records)?;

    // Arena pattern: reserve index, recurse, then overwrite with the split.
    let node_idx = arena.len();
    arena.push(Node::Leaf {
        label: fallback.clone(),
        n_samples,
    });

    let mut children = BTreeMap::new();
    for (bin, bucket) in bins.into_iter().zip(&buckets) {
        let child = build_tree(schema, bucket, remaining, config, depth + 1, arena)?;
        children.insert(bin, child);
    }

    arena[node_idx] = Node::Split {
        attribute,
        fallback,
        children,
        n_samples,
        gain,
    };

    Ok(Some(NodeIndex::new(node_idx)))
}

/// A fitted ID3 decision tree.
///
/// Stored as an arena-based `Vec<Node>` with index references. The tree
/// keeps a copy of the schema it was trained with so records can be
/// discretized at prediction time. It is never mutated after the build.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionTree {
    pub(crate) schema: AttributeSchema,
    pub(crate) nodes: Vec<Node>,
    pub(crate) root: Option<NodeIndex>,
}

impl DecisionTree {
    /// Return the schema the tree was trained with.
    #[must_use]
    pub fn schema(&self) -> &AttributeSchema {
        &self.schema
    }

    /// Return the root node index; `None` when trained on no records.
    #[must_use]
    pub fn root(&self) -> Option<NodeIndex> {
        self.root
    }

    /// Return the node at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` does not belong to this tree.
    #[must_use]
    pub fn node(&self, index: NodeIndex) -> &Node {
        &self.nodes[index.index()]
    }

    /// Return the total number of nodes in the tree (both splits and leaves).
    #[must_use]
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Return the number of leaf nodes.
    #[must_use]
    pub fn n_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Return the attributes split on, in build order.
    #[must_use]
    pub fn split_attributes(&self) -> Vec<AttributeIndex> {
        self.nodes
            .iter()
            .filter_map(|n| match n {
                Node::Split { attribute, .. } => Some(*attribute),
                Node::Leaf { .. } => None,
            })
            .collect()
    }

    /// Return the maximum depth of the tree.
    ///
    /// A tree without a root, or with a single leaf, has depth 0.
    #[must_use]
    pub fn depth(&self) -> usize {
        let Some(root) = self.root else {
            return 0;
        };

        let mut max_depth = 0usize;
        let mut queue = VecDeque::new();
        queue.push_back((root, 0usize));

        while let Some((idx, d)) = queue.pop_front() {
            max_depth = max_depth.max(d);
            if let Node::Split { children, .. } = self.node(idx) {
                for child in children.values().flatten() {
                    queue.push_back((*child, d + 1));
                }
            }
        }

        max_depth
    }

    fn render(&self, f: &mut fmt::Formatter<'_>, idx: NodeIndex, indent: usize) -> fmt::Result {
        match self.node(idx) {
            Node::Leaf { label, n_samples } => {
                writeln!(f, "{label} ({n_samples})")
            }
            Node::Split {
                attribute,
                fallback,
                children,
                n_samples,
                ..
            } => {
                let attr = self.schema.attribute(*attribute);
                writeln!(f, "{} [fallback {fallback}] ({n_samples})", attr.name())?;
                for (bin, child) in children {
                    write!(f, "{:width$}", "", width = (indent + 1) * 2)?;
                    match attr.kind() {
                        AttributeKind::Categorical { categories } => {
                            let Bin::Category(ordinal) = bin else {
                                return Err(fmt::Error);
                            };
                            write!(f, "= {}: ", categories[*ordinal])?;
                        }
                        AttributeKind::Continuous => write!(f, "<= {bin}: ")?,
                    }
                    match child {
                        Some(child) => self.render(f, *child, indent + 1)?,
                        None => writeln!(f, "-")?,
                    }
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for DecisionTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.root {
            Some(root) => self.render(f, root, 0),
            None => writeln!(f, "(empty tree)"),
        }
    }
}
