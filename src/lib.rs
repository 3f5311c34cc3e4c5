//! # Rusty-id3
//!
//! `rusty-id3` builds binary decision tree classifiers over numeric attributes.
//! Each node is split on the attribute/threshold pair with the highest
//! information gain (entropy reduction), sibling leaves that agree are merged
//! afterwards, and the tree then classifies unseen samples.
//!
//! ## Getting Started
//!
//! To use `rusty-id3`, add the following to your `Cargo.toml` file:
//!
//! ```toml
//! [dependencies]
//! rusty-id3 = "*"
//! ```
//!
//! ## Example Usage
//!
//! ```rust
//! use rusty_id3::data::dataset::{ClassSet, Dataset, Sample};
//! use rusty_id3::trees::classifier::DecisionTreeClassifier;
//!
//! let dataset = Dataset::from_rows(
//!     vec!["x"],
//!     ClassSet::new(["A", "B"]),
//!     &[vec![1.0], vec![2.0], vec![10.0], vec![11.0]],
//!     &["A", "A", "B", "B"],
//! )
//! .unwrap();
//!
//! let mut model = DecisionTreeClassifier::with_params(Some(2), Some(3)).unwrap();
//! model.fit(&dataset).unwrap();
//! model.merge_leaves().unwrap();
//!
//! let sample = Sample::from([("x".to_string(), 10.5)]);
//! assert_eq!(model.predict(&sample).unwrap(), "B");
//! ```

/// Dataset and data loading utilities
pub mod data;
/// Error type
pub mod error;
/// Functions for evaluating model performance
pub mod metrics;
/// Decision trees
pub mod trees;

pub use error::{Result, TreeError};
