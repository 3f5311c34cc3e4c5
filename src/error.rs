//! Error types shared by the dataset utilities and the decision tree.

use thiserror::Error;

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TreeError>;

/// Errors produced while loading data, building a tree or predicting with it.
#[derive(Error, Debug)]
pub enum TreeError {
    /// A tree was requested for (or a gain computed over) zero records.
    #[error("Cannot build a decision tree from an empty dataset.")]
    EmptyDataset,

    /// A sample handed to the predictor lacks the attribute a node splits on.
    #[error("Sample is missing attribute '{attribute}' required by the split at depth {depth}.")]
    MissingAttribute { attribute: String, depth: u16 },

    /// The stopping criteria are out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The attribute list names a column the dataset does not have.
    #[error("Unknown attribute '{0}'.")]
    UnknownAttribute(String),

    /// No candidate thresholds were supplied for a splitting attribute.
    #[error("No attribute domain given for '{0}'.")]
    MissingDomain(String),

    /// A class label outside of the fixed class set.
    #[error("Unknown class label '{0}'.")]
    UnknownClass(String),

    /// Features, labels and attribute names disagree in size.
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    /// `predict`, `merge_leaves` or `dump` was called before `fit`.
    #[error("Tree wasn't built yet.")]
    NotFitted,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid numeric value: {0}")]
    ParseFloat(#[from] std::num::ParseFloatError),
}
