/// Confusion matrix and accuracy of class predictions
pub mod confusion;
