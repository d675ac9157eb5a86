//! ID3 decision tree induction: train, predict, evaluate.
//!
//! Attributes are described by an [`AttributeSchema`] and discretized into
//! fixed [`Bin`]s (category ordinals or quartile buckets). Trees are grown
//! top-down by information gain, pruned once a label dominates a node, and
//! answer predictions through unseen branches with the majority label
//! recorded at each split.

mod discretize;
mod entropy;
mod error;
mod eval;
mod node;
mod predict;
mod record;
mod remaining;
mod schema;
mod tree;

pub use discretize::{Bin, Quartile, bin_of, partition, possible_bins, record_bin};
pub use entropy::{EMPTY_ENTROPY, best_attribute, entropy, information_gain};
pub use error::TreeError;
pub use eval::{SubsampleValidation, ValidationResult};
pub use node::{Node, NodeIndex};
pub use record::{Label, RawValue, Record};
pub use remaining::RemainingAttributes;
pub use schema::{Attribute, AttributeIndex, AttributeKind, AttributeSchema};
pub use tree::{DecisionTree, Id3Config};
