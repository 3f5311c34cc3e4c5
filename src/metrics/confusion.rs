use nalgebra::{DMatrix, DVector};

use crate::error::{Result, TreeError};

type ConfusionMatrix = DMatrix<usize>;

pub trait ClassificationMetrics {
    /// Computes the confusion matrix based on the true labels and predicted labels.
    ///
    /// # Arguments
    ///
    /// * `y_true` - The true class indices.
    /// * `y_pred` - The predicted class indices.
    /// * `num_classes` - The size of the class set; rows are true classes,
    ///   columns predicted ones.
    ///
    /// # Returns
    ///
    /// The confusion matrix as a `Result` containing a `ConfusionMatrix` or an error.
    fn confusion_matrix(
        &self,
        y_true: &DVector<usize>,
        y_pred: &DVector<usize>,
        num_classes: usize,
    ) -> Result<ConfusionMatrix> {
        if y_true.len() != y_pred.len() {
            return Err(TreeError::ShapeMismatch(
                "Predictions and labels are of different sizes.".into(),
            ));
        }
        if let Some(class) = y_true.iter().chain(y_pred.iter()).find(|&&c| c >= num_classes) {
            return Err(TreeError::UnknownClass(format!("#{class}")));
        }

        let mut matrix = DMatrix::zeros(num_classes, num_classes);

        for (&y_t, &y_p) in y_true.iter().zip(y_pred.iter()) {
            matrix[(y_t, y_p)] += 1;
        }

        Ok(matrix)
    }

    /// Computes the share of correctly predicted labels.
    ///
    /// # Errors
    ///
    /// Fails when the vectors differ in length or are empty.
    fn accuracy(&self, y_true: &DVector<usize>, y_pred: &DVector<usize>) -> Result<f64> {
        if y_true.len() != y_pred.len() {
            return Err(TreeError::ShapeMismatch(
                "Predictions and labels are of different sizes.".into(),
            ));
        }
        if y_true.is_empty() {
            return Err(TreeError::EmptyDataset);
        }

        let correct = y_true
            .iter()
            .zip(y_pred.iter())
            .filter(|(t, p)| t == p)
            .count();

        Ok(correct as f64 / y_true.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::DVector;

    struct MockClassifier;

    impl ClassificationMetrics for MockClassifier {}

    #[test]
    fn test_confusion_matrix() {
        let classifier = MockClassifier;

        let y_true = DVector::from_vec(vec![1, 0, 1, 0, 1]);
        let y_pred = DVector::from_vec(vec![1, 1, 0, 0, 1]);

        let result = classifier.confusion_matrix(&y_true, &y_pred, 2).unwrap();

        let expected = DMatrix::from_row_slice(2, 2, &[1, 1, 1, 2]);

        assert_eq!(result, expected);
    }

    #[test]
    fn test_confusion_matrix_unseen_class_row() {
        let classifier = MockClassifier;

        let y_true = DVector::from_vec(vec![0, 0]);
        let y_pred = DVector::from_vec(vec![0, 2]);

        let result = classifier.confusion_matrix(&y_true, &y_pred, 3).unwrap();

        assert_eq!(result.row(1).sum(), 0);
        assert_eq!(result[(0, 2)], 1);
    }

    #[test]
    fn test_confusion_matrix_different_sizes() {
        let classifier = MockClassifier;

        let y_true = DVector::from_vec(vec![1, 0, 1]);
        let y_pred = DVector::from_vec(vec![1, 1, 0, 0, 1]);

        let result = classifier.confusion_matrix(&y_true, &y_pred, 2);

        assert!(result.is_err());
    }

    #[test]
    fn test_confusion_matrix_class_out_of_range() {
        let classifier = MockClassifier;

        let y_true = DVector::from_vec(vec![0, 3]);
        let y_pred = DVector::from_vec(vec![0, 1]);

        let result = classifier.confusion_matrix(&y_true, &y_pred, 2);

        assert!(matches!(result, Err(TreeError::UnknownClass(_))));
    }

    #[test]
    fn test_confusion_matrix_multiclass() {
        let classifier = MockClassifier;

        let y_true = DVector::from_vec(vec![0, 1, 2, 1, 0, 2]);
        let y_pred = DVector::from_vec(vec![0, 2, 1, 1, 0, 2]);

        let result = classifier.confusion_matrix(&y_true, &y_pred, 3).unwrap();
        let expected = DMatrix::from_vec(3, 3, vec![2, 0, 0, 0, 1, 1, 0, 1, 1]);

        assert_eq!(result, expected);
    }

    #[test]
    fn test_accuracy() {
        let classifier = MockClassifier;

        let y_true = DVector::from_vec(vec![1, 0, 1, 0, 1]);
        let y_pred = DVector::from_vec(vec![1, 1, 0, 0, 1]);

        let result = classifier.accuracy(&y_true, &y_pred).unwrap();

        let expected = 0.6;

        assert_eq!(result, expected);
    }

    #[test]
    fn test_accuracy_perfect_classification() {
        let classifier = MockClassifier;

        let y_true = DVector::from_vec(vec![1, 0, 1, 0, 1]);
        let y_pred = DVector::from_vec(vec![1, 0, 1, 0, 1]);

        let result = classifier.accuracy(&y_true, &y_pred).unwrap();
        let expected = 1.0;

        assert_eq!(result, expected);
    }

    #[test]
    fn test_accuracy_empty() {
        let classifier = MockClassifier;

        let empty = DVector::<usize>::from_vec(vec![]);

        assert!(classifier.accuracy(&empty, &empty).is_err());
    }
}
