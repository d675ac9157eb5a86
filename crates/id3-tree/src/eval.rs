//! Repeated random sub-sampling accuracy scoring for a trained tree.

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use tracing::{info, instrument, warn};

use crate::error::TreeError;
use crate::record::Record;
use crate::tree::DecisionTree;

/// Sub-sampling validation configuration.
///
/// Construct via [`SubsampleValidation::new`], then chain `with_seed` if a
/// reproducible shuffle is wanted. Without a seed the shuffle is seeded from
/// OS entropy.
#[derive(Debug, Clone)]
pub struct SubsampleValidation {
    folds: usize,
    seed: Option<u64>,
}

/// Results of sub-sampling validation.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ValidationResult {
    /// Accuracy percentage (0..=100) for each fold.
    pub fold_accuracies: Vec<f64>,
    /// Mean accuracy percentage across folds.
    pub mean_accuracy: f64,
    /// Standard deviation of fold accuracies.
    pub std_accuracy: f64,
    /// Number of records scored per fold.
    pub validation_size: usize,
    /// Number of folds.
    pub folds: usize,
}

impl SubsampleValidation {
    /// Create a new validation config with the given number of folds.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidFoldCount`] if `folds` is zero.
    pub fn new(folds: usize) -> Result<Self, TreeError> {
        if folds == 0 {
            return Err(TreeError::InvalidFoldCount { folds });
        }
        Ok(Self { folds, seed: None })
    }

    /// Set the random seed for the shuffles. `None` draws from OS entropy.
    #[must_use]
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Score `tree` against `records`.
    ///
    /// Each fold reshuffles a working copy of `records` and scores the first
    /// `records.len() / folds` of them. A record without a prediction counts
    /// as a miss. A fold with nothing to score has accuracy 0.
    ///
    /// # Errors
    ///
    /// Returns the first prediction error, e.g. [`TreeError::UnknownCategory`].
    #[instrument(skip_all, fields(folds = self.folds, n_records = records.len()))]
    pub fn evaluate(
        &self,
        tree: &DecisionTree,
        records: &[Record],
    ) -> Result<ValidationResult, TreeError> {
        let mut rng = match self.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        let validation_size = records.len() / self.folds;
        if validation_size == 0 {
            warn!(
                n_records = records.len(),
                folds = self.folds,
                "too few records to fill a validation slice"
            );
        }

        let mut working: Vec<&Record> = records.iter().collect();
        let mut fold_accuracies = Vec::with_capacity(self.folds);

        for fold in 1..=self.folds {
            working.shuffle(&mut rng);
            let slice = &working[..validation_size];

            let correct = slice
                .par_iter()
                .map(|record| {
                    tree.predict(record)
                        .map(|predicted| predicted == Some(record.label()))
                })
                .collect::<Result<Vec<bool>, TreeError>>()?
                .into_iter()
                .filter(|&hit| hit)
                .count();

            let accuracy = if slice.is_empty() {
                0.0
            } else {
                correct as f64 / slice.len() as f64 * 100.0
            };
            fold_accuracies.push(accuracy);

            info!(fold, accuracy, "fold scored");
        }

        let mean_accuracy = fold_accuracies.iter().sum::<f64>() / self.folds as f64;
        let std_accuracy = {
            let variance = fold_accuracies
                .iter()
                .map(|&a| (a - mean_accuracy).powi(2))
                .sum::<f64>()
                / self.folds as f64;
            variance.sqrt()
        };

        info!(mean_accuracy, std_accuracy, "sub-sampling validation complete");

        Ok(ValidationResult {
            fold_accuracies,
            mean_accuracy,
            std_accuracy,
            validation_size,
            folds: self.folds,
        })
    }
}
