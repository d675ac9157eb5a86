//! Prediction by tree traversal with majority-label backoff.

use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::discretize::record_bin;
use crate::error::TreeError;
use crate::node::{Node, NodeIndex};
use crate::record::{Label, Record};
use crate::tree::DecisionTree;

impl DecisionTree {
    /// Predict the label of a single record.
    ///
    /// Descends by discretizing the record's value for each split attribute.
    /// When the matching child is missing, or yields no prediction, the
    /// split's fallback label is returned instead. `Ok(None)` only occurs for
    /// a tree without a root.
    ///
    /// # Errors
    ///
    /// Any discretization error for a value the traversal needs:
    /// [`TreeError::UnknownCategory`], [`TreeError::NonFiniteValue`],
    /// [`TreeError::KindMismatch`], or [`TreeError::MissingValue`].
    pub fn predict(&self, record: &Record) -> Result<Option<&Label>, TreeError> {
        self.predict_from(self.root, record)
    }

    fn predict_from(
        &self,
        node: Option<NodeIndex>,
        record: &Record,
    ) -> Result<Option<&Label>, TreeError> {
        let Some(idx) = node else {
            return Ok(None);
        };
        match self.node(idx) {
            Node::Leaf { label, .. } => Ok(Some(label)),
            Node::Split {
                attribute,
                fallback,
                children,
                ..
            } => {
                let bin = record_bin(&self.schema, *attribute, record)?;
                let child = children.get(&bin).copied().flatten();
                Ok(Some(self.predict_from(child, record)?.unwrap_or(fallback)))
            }
        }
    }

    /// Predict labels for a batch of records in parallel, preserving order.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered by [`DecisionTree::predict`].
    pub fn predict_batch(&self, records: &[Record]) -> Result<Vec<Option<&Label>>, TreeError> {
        records
            .into_par_iter()
            .map(|record| self.predict(record))
            .collect()
    }
}
