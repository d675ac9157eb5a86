use std::collections::BTreeMap;

use crate::discretize::partition;
use crate::error::TreeError;
use crate::record::{Label, Record};
use crate::schema::{AttributeIndex, AttributeSchema};

/// Entropy reported for an empty record set.
///
/// A deliberately large "maximal impurity" marker. In [`information_gain`]
/// it is only ever multiplied by the zero weight of an empty partition.
pub const EMPTY_ENTROPY: f64 = 9999.0;

/// Compute the label entropy of `records` over the fixed `alphabet`.
///
/// `Σ p·ln(1/p)` with `p = count / records.len()`; labels with zero count
/// contribute 0. Records whose label is outside the alphabet still count
/// towards `records.len()` but add no probability mass.
///
/// Returns [`EMPTY_ENTROPY`] when `records` is empty.
#[must_use]
pub fn entropy(records: &[&Record], alphabet: &[Label]) -> f64 {
    if records.is_empty() {
        return EMPTY_ENTROPY;
    }
    let mut counts = vec![0usize; alphabet.len()];
    for record in records {
        if let Some(pos) = alphabet.iter().position(|l| l == record.label()) {
            counts[pos] += 1;
        }
    }
    let n = records.len() as f64;
    counts
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / n;
            p * (1.0 / p).ln()
        })
        .sum()
}

/// Compute the information gain of splitting `records` on `attribute`.
///
/// Every possible bin contributes `(|bin| / |records|) · entropy(bin)`,
/// empty bins included. An empty record set has zero gain.
///
/// # Errors
///
/// Fails when a record cannot be discretized for `attribute`.
pub fn information_gain(
    schema: &AttributeSchema,
    records: &[&Record],
    attribute: AttributeIndex,
) -> Result<f64, TreeError> {
    if records.is_empty() {
        return Ok(0.0);
    }
    let alphabet = schema.labels();
    let buckets = partition(schema, attribute, records)?;
    let n = records.len() as f64;
    let mut gain = entropy(records, alphabet);
    for bucket in &buckets {
        gain -= (bucket.len() as f64 / n) * entropy(bucket, alphabet);
    }
    Ok(gain)
}

/// Pick the candidate with the strictly highest information gain.
///
/// Ties go to the candidate that appears first in `candidates`. Returns
/// `None` when `candidates` is empty.
///
/// # Errors
///
/// Fails when a record cannot be discretized for some candidate.
pub fn best_attribute(
    schema: &AttributeSchema,
    records: &[&Record],
    candidates: &[AttributeIndex],
) -> Result<Option<(AttributeIndex, f64)>, TreeError> {
    let mut best: Option<(AttributeIndex, f64)> = None;
    for &candidate in candidates {
        let gain = information_gain(schema, records, candidate)?;
        match best {
            Some((_, best_gain)) if gain <= best_gain => {}
            _ => best = Some((candidate, gain)),
        }
    }
    Ok(best)
}

/// Occurrence count of every label in `records`, in lexical label order.
pub(crate) fn label_counts<'a>(records: &[&'a Record]) -> BTreeMap<&'a Label, usize> {
    let mut counts = BTreeMap::new();
    for record in records {
        *counts.entry(record.label()).or_insert(0) += 1;
    }
    counts
}

/// The most frequent label; ties go to the lexically smallest label.
pub(crate) fn majority_label<'a>(records: &[&'a Record]) -> Option<&'a Label> {
    let mut best: Option<(&Label, usize)> = None;
    for (label, count) in label_counts(records) {
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((label, count)),
        }
    }
    best.map(|(label, _)| label)
}

/// The first label, in lexical order, held by more than `threshold` of `records`.
pub(crate) fn dominant_label<'a>(records: &[&'a Record], threshold: f64) -> Option<&'a Label> {
    let limit = threshold * records.len() as f64;
    label_counts(records)
        .into_iter()
        .find(|&(_, count)| count as f64 > limit)
        .map(|(label, _)| label)
}
