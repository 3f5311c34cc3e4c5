//! Search for the threshold split with the highest information gain.

use crate::data::dataset::{Dataset, RealNumber};
use crate::error::Result;
use crate::trees::entropy::information_gain;
use rayon::prelude::*;

/// An attribute that may be split on, together with its candidate thresholds.
#[derive(Clone, Debug)]
pub struct SplitCandidate<'a, XT: RealNumber> {
    pub feature_index: usize,
    pub thresholds: &'a [XT],
}

/// The chosen split of a node.
#[derive(Clone, Debug, PartialEq)]
pub struct SplitData<XT: RealNumber> {
    pub feature_index: usize,
    pub threshold: XT,
    pub information_gain: f64,
}

/// Returns the (attribute, threshold) pair with the largest information gain
/// over the rows in `indices`, or `None` if no candidate reaches a gain of 0.
///
/// Candidates are ranked in the order given, thresholds in domain order, and a
/// candidate whose gain equals the best seen so far replaces it, so the last
/// enumerated maximum wins. Attributes are scored in parallel and their winners
/// folded back in order, which gives the same answer as a sequential scan.
///
/// # Errors
///
/// Returns `EmptyDataset` if `indices` is empty and there is any threshold to
/// evaluate.
pub fn best_split<XT: RealNumber>(
    dataset: &Dataset<XT>,
    indices: &[usize],
    candidates: &[SplitCandidate<'_, XT>],
) -> Result<Option<SplitData<XT>>> {
    let per_attribute = candidates
        .par_iter()
        .map(|candidate| best_threshold(dataset, indices, candidate))
        .collect::<Result<Vec<_>>>()?;

    Ok(per_attribute
        .into_iter()
        .flatten()
        .fold(None, |best: Option<SplitData<XT>>, split| match best {
            Some(best) if split.information_gain < best.information_gain => Some(best),
            _ => Some(split),
        }))
}

fn best_threshold<XT: RealNumber>(
    dataset: &Dataset<XT>,
    indices: &[usize],
    candidate: &SplitCandidate<'_, XT>,
) -> Result<Option<SplitData<XT>>> {
    let mut best_split = None;
    let mut best_information_gain = 0.0;

    for &threshold in candidate.thresholds {
        let gain = information_gain(dataset, indices, candidate.feature_index, threshold)?;

        if gain >= best_information_gain {
            best_information_gain = gain;
            best_split = Some(SplitData {
                feature_index: candidate.feature_index,
                threshold,
                information_gain: gain,
            });
        }
    }

    Ok(best_split)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dataset::ClassSet;
    use approx::assert_relative_eq;

    fn two_class_dataset() -> Dataset<f64> {
        Dataset::from_rows(
            vec!["x", "y"],
            ClassSet::new(["A", "B"]),
            &[
                vec![1.0, 5.0],
                vec![2.0, 5.0],
                vec![10.0, 5.0],
                vec![11.0, 5.0],
            ],
            &["A", "A", "B", "B"],
        )
        .unwrap()
    }

    #[test]
    fn test_best_split_picks_maximal_gain() {
        let dataset = two_class_dataset();
        let domain = [1.0, 2.0, 10.0, 11.0];
        let candidates = [SplitCandidate {
            feature_index: 0,
            thresholds: &domain,
        }];

        let split = best_split(&dataset, &[0, 1, 2, 3], &candidates)
            .unwrap()
            .unwrap();
        assert_eq!(split.feature_index, 0);
        assert_eq!(split.threshold, 10.0);
        assert_relative_eq!(split.information_gain, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_best_split_later_threshold_wins_tie() {
        let dataset = two_class_dataset();
        // Both 3.0 and 10.0 separate the classes perfectly.
        let domain = [3.0, 10.0];
        let candidates = [SplitCandidate {
            feature_index: 0,
            thresholds: &domain,
        }];

        let split = best_split(&dataset, &[0, 1, 2, 3], &candidates)
            .unwrap()
            .unwrap();
        assert_eq!(split.threshold, 10.0);
    }

    #[test]
    fn test_best_split_later_attribute_wins_tie() {
        let dataset = Dataset::from_rows(
            vec!["x", "z"],
            ClassSet::new(["A", "B"]),
            &[vec![1.0, 1.0], vec![2.0, 2.0]],
            &["A", "B"],
        )
        .unwrap();
        let domain = [2.0];
        let candidates = [
            SplitCandidate {
                feature_index: 0,
                thresholds: &domain,
            },
            SplitCandidate {
                feature_index: 1,
                thresholds: &domain,
            },
        ];

        let split = best_split(&dataset, &[0, 1], &candidates).unwrap().unwrap();
        assert_eq!(split.feature_index, 1);
    }

    #[test]
    fn test_best_split_zero_gain_keeps_last_candidate() {
        let dataset = two_class_dataset();
        let domain = [5.0, 6.0];
        let candidates = [SplitCandidate {
            feature_index: 1,
            thresholds: &domain,
        }];

        let split = best_split(&dataset, &[0, 1, 2, 3], &candidates)
            .unwrap()
            .unwrap();
        assert_eq!(split.information_gain, 0.0);
        assert_eq!(split.threshold, 6.0);
    }

    #[test]
    fn test_best_split_without_candidates() {
        let dataset = two_class_dataset();
        assert_eq!(best_split(&dataset, &[0, 1, 2, 3], &[]).unwrap(), None);
    }
}
