/// Decision tree classifier: building, leaf merging, prediction and rendering
pub mod classifier;
/// Entropy and information gain
pub mod entropy;
/// Decision tree nodes
pub mod node;
/// Stopping criteria
pub mod params;
/// Best split search
pub mod split;
