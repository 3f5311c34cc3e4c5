//! Class-label entropy and the information gain of a threshold split.

use crate::data::dataset::{Dataset, RealNumber};
use crate::error::{Result, TreeError};

/// Counts how many of the rows in `indices` carry each class.
pub fn class_counts<XT: RealNumber>(dataset: &Dataset<XT>, indices: &[usize]) -> Vec<usize> {
    let mut counts = vec![0; dataset.classes().len()];
    for &row in indices {
        counts[dataset.y()[row]] += 1;
    }
    counts
}

/// Shannon entropy in bits of a class distribution given as counts.
///
/// Counts are visited in class-set order; empty classes contribute nothing and
/// an all-zero distribution has entropy 0.
pub fn entropy_of_counts(counts: &[usize]) -> f64 {
    let total = counts.iter().sum::<usize>();
    if total == 0 {
        return 0.0;
    }

    counts
        .iter()
        .map(|&count| count as f64 / total as f64)
        .filter(|&p| p > 0.0)
        .fold(0.0, |acc, p| acc - p * p.log2())
}

/// Entropy of the class labels of the rows in `indices`.
pub fn entropy<XT: RealNumber>(dataset: &Dataset<XT>, indices: &[usize]) -> f64 {
    entropy_of_counts(&class_counts(dataset, indices))
}

/// Entropy reduction obtained by sending rows with
/// `x[feature_index] < threshold` to one side and the rest to the other.
///
/// # Errors
///
/// Returns `EmptyDataset` if `indices` is empty.
pub fn information_gain<XT: RealNumber>(
    dataset: &Dataset<XT>,
    indices: &[usize],
    feature_index: usize,
    threshold: XT,
) -> Result<f64> {
    if indices.is_empty() {
        return Err(TreeError::EmptyDataset);
    }

    let (lower, upper) = dataset.split_on_threshold(indices, feature_index, threshold);
    let total = indices.len() as f64;
    let weight_lower = lower.len() as f64 / total;
    let weight_upper = upper.len() as f64 / total;

    Ok(entropy(dataset, indices)
        - weight_lower * entropy(dataset, &lower)
        - weight_upper * entropy(dataset, &upper))
}
