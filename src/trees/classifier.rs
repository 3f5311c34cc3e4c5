//! Decision Tree Classifier
use super::{
    entropy::class_counts,
    node::{NodeKind, TreeNode},
    params::TreeParams,
    split::{best_split, SplitCandidate},
};
use crate::{
    data::dataset::{AttributeDomains, ClassSet, Dataset, RealNumber, Sample},
    error::{Result, TreeError},
    metrics::confusion::ClassificationMetrics,
};
use log::{debug, info};
use nalgebra::DVector;
use std::fmt;

/// One node of a fitted tree, flattened for renderers and inspection.
///
/// Ids are assigned in pre-order, so the root is `0` and a split's left child
/// is always `id + 1`.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeSummary<XT: RealNumber> {
    pub id: usize,
    pub depth: u16,
    pub samples: usize,
    pub kind: SummaryKind<XT>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SummaryKind<XT: RealNumber> {
    Leaf {
        prediction: String,
    },
    Split {
        attribute: String,
        threshold: XT,
        left: usize,
        right: usize,
    },
}

/// Decision Tree Classifier
///
/// Grows a binary tree whose splits maximize information gain, in the manner of
/// ID3 extended to numeric thresholds.
#[derive(Clone, Debug)]
pub struct DecisionTreeClassifier<XT: RealNumber> {
    root: Option<Box<TreeNode<XT>>>,
    tree_params: TreeParams,
    classes: ClassSet,
}

impl<XT: RealNumber> Default for DecisionTreeClassifier<XT> {
    fn default() -> Self {
        Self::new()
    }
}

impl<XT: RealNumber> ClassificationMetrics for DecisionTreeClassifier<XT> {}

impl<XT: RealNumber> DecisionTreeClassifier<XT> {
    /// Creates a new instance of the decision tree classifier with default parameters.
    pub fn new() -> Self {
        Self {
            root: None,
            tree_params: TreeParams::new(),
            classes: ClassSet::new(Vec::<String>::new()),
        }
    }

    /// Creates a new instance of the decision tree classifier with custom parameters.
    ///
    /// # Arguments
    ///
    /// * `min_samples_split` - The minimum number of samples a node needs to be split.
    /// * `max_depth` - The maximum depth of the tree.
    ///
    /// # Errors
    ///
    /// This method will return an error if the minimum number of samples to split is 0.
    pub fn with_params(min_samples_split: Option<u16>, max_depth: Option<u16>) -> Result<Self> {
        let mut tree = Self::new();

        tree.set_min_samples_split(
            min_samples_split.unwrap_or(TreeParams::DEFAULT_MIN_SAMPLES_SPLIT),
        )?;
        tree.set_max_depth(max_depth.unwrap_or(TreeParams::DEFAULT_MAX_DEPTH))?;
        Ok(tree)
    }

    /// Creates a classifier from a set of parameters. `TreeParams` can only be
    /// built through its validating constructors and setters.
    pub fn from_params(tree_params: TreeParams) -> Self {
        Self {
            tree_params,
            ..Self::new()
        }
    }

    pub fn set_min_samples_split(&mut self, min_samples_split: u16) -> Result<()> {
        self.tree_params.set_min_samples_split(min_samples_split)
    }

    pub fn set_max_depth(&mut self, max_depth: u16) -> Result<()> {
        self.tree_params.set_max_depth(max_depth)
    }

    pub fn min_samples_split(&self) -> u16 {
        self.tree_params.min_samples_split()
    }

    pub fn max_depth(&self) -> u16 {
        self.tree_params.max_depth()
    }

    pub fn params(&self) -> &TreeParams {
        &self.tree_params
    }

    /// The fitted root node, if any.
    pub fn root(&self) -> Option<&TreeNode<XT>> {
        self.root.as_deref()
    }

    /// The class set of the dataset the tree was fitted on.
    pub fn classes(&self) -> &ClassSet {
        &self.classes
    }

    /// Builds the tree using every attribute of `dataset` and the attribute
    /// domains observed in it.
    ///
    /// # Errors
    ///
    /// This method will return an error if the dataset is empty.
    pub fn fit(&mut self, dataset: &Dataset<XT>) -> Result<String> {
        let attributes = dataset
            .attributes()
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>();
        let domains = dataset.attribute_domains();
        self.fit_with_domains(dataset, &attributes, &domains)
    }

    /// Builds the tree from a dataset.
    ///
    /// # Arguments
    ///
    /// * `dataset` - The labeled training records.
    /// * `attributes` - The attributes that may be split on, in search order.
    /// * `domains` - Candidate thresholds for each of `attributes`.
    ///
    /// # Returns
    ///
    /// A string indicating that the tree was built successfully.
    ///
    /// # Errors
    ///
    /// Returns `EmptyDataset` for a dataset without records, `UnknownAttribute`
    /// if an attribute is not a column of `dataset` and `MissingDomain` if
    /// `domains` has no entry for it. On error no tree is kept.
    pub fn fit_with_domains(
        &mut self,
        dataset: &Dataset<XT>,
        attributes: &[&str],
        domains: &AttributeDomains<XT>,
    ) -> Result<String> {
        self.root = None;
        if !dataset.is_not_empty() {
            return Err(TreeError::EmptyDataset);
        }

        let candidates = attributes
            .iter()
            .map(|&attribute| {
                let feature_index = dataset
                    .column_index(attribute)
                    .ok_or_else(|| TreeError::UnknownAttribute(attribute.to_string()))?;
                let thresholds = domains
                    .get(attribute)
                    .ok_or_else(|| TreeError::MissingDomain(attribute.to_string()))?;
                Ok::<_, TreeError>(SplitCandidate {
                    feature_index,
                    thresholds,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let root = self.build_tree(dataset, &candidates, (0..dataset.nrows()).collect(), 0)?;
        info!(
            "Built decision tree on {} samples: {} nodes, {} leaves, depth {}.",
            dataset.nrows(),
            root.num_nodes(),
            root.num_leaves(),
            root.max_depth()
        );

        self.classes = dataset.classes().clone();
        self.root = Some(Box::new(root));
        Ok("Finished building the tree.".into())
    }

    fn build_tree(
        &self,
        dataset: &Dataset<XT>,
        candidates: &[SplitCandidate<'_, XT>],
        samples: Vec<usize>,
        depth: u16,
    ) -> Result<TreeNode<XT>> {
        let counts = class_counts(dataset, &samples);
        let num_classes = counts.iter().filter(|&&count| count > 0).count();

        if self.tree_params.allows_split(depth, samples.len(), num_classes) {
            if let Some(split) = best_split(dataset, &samples, candidates)? {
                if split.information_gain > 0.0 {
                    let attribute = dataset.attributes()[split.feature_index].clone();
                    let (lower, upper) =
                        dataset.split_on_threshold(&samples, split.feature_index, split.threshold);
                    debug!(
                        "depth {}: split {} samples on {} < {} (gain {:.4}) into {} / {}",
                        depth,
                        samples.len(),
                        attribute,
                        split.threshold,
                        split.information_gain,
                        lower.len(),
                        upper.len()
                    );

                    let left = self.build_tree(dataset, candidates, lower, depth + 1)?;
                    let right = self.build_tree(dataset, candidates, upper, depth + 1)?;
                    return Ok(TreeNode::internal(
                        depth,
                        samples,
                        attribute,
                        split.threshold,
                        left,
                        right,
                    ));
                }
            }
        }

        let prediction = majority_class(&counts);
        debug!(
            "depth {}: leaf with {} samples predicts {}",
            depth,
            samples.len(),
            dataset.classes().label(prediction).unwrap_or("?")
        );
        Ok(TreeNode::leaf(depth, samples, prediction))
    }

    /// Collapses sibling leaves that predict the same class into their parent.
    ///
    /// This removes redundant structure only; predictions are unchanged.
    ///
    /// # Returns
    ///
    /// The number of internal nodes turned into leaves.
    ///
    /// # Errors
    ///
    /// This method will return an error if the tree wasn't built yet.
    pub fn merge_leaves(&mut self) -> Result<usize> {
        let root = self.root.as_mut().ok_or(TreeError::NotFitted)?;
        let merged = root.merge_leaves();
        info!(
            "Merged {} redundant splits, {} leaves remain.",
            merged,
            root.num_leaves()
        );
        Ok(merged)
    }

    /// Predicts the class label of a single sample.
    ///
    /// # Errors
    ///
    /// Returns `NotFitted` if the tree wasn't built yet and `MissingAttribute`
    /// if the sample lacks an attribute the tree splits on along its path.
    pub fn predict(&self, sample: &Sample<XT>) -> Result<&str> {
        let class = self.predict_class(sample)?;
        Ok(self.class_label(class))
    }

    /// Same as [`predict`](Self::predict) but returns the class index.
    pub fn predict_class(&self, sample: &Sample<XT>) -> Result<usize> {
        self.root.as_ref().ok_or(TreeError::NotFitted)?.predict(sample)
    }

    /// Predicts the class index of every record of `dataset`.
    ///
    /// Attributes are matched by name, so the columns may be in any order.
    ///
    /// # Errors
    ///
    /// This method will return an error if the tree wasn't built yet or a split
    /// attribute is not a column of `dataset`.
    pub fn predict_dataset(&self, dataset: &Dataset<XT>) -> Result<DVector<usize>> {
        let root = self.root.as_ref().ok_or(TreeError::NotFitted)?;
        let predictions = (0..dataset.nrows())
            .map(|row| root.predict_row(dataset, row))
            .collect::<Result<Vec<_>>>()?;

        Ok(DVector::from_vec(predictions))
    }

    /// Flattens the tree into one summary per node, in pre-order.
    ///
    /// # Errors
    ///
    /// This method will return an error if the tree wasn't built yet.
    pub fn dump(&self) -> Result<Vec<NodeSummary<XT>>> {
        let root = self.root.as_ref().ok_or(TreeError::NotFitted)?;
        let mut summaries = Vec::with_capacity(root.num_nodes());
        self.summarize(root, &mut summaries);
        Ok(summaries)
    }

    fn summarize(&self, node: &TreeNode<XT>, summaries: &mut Vec<NodeSummary<XT>>) {
        let id = summaries.len();
        match &node.kind {
            NodeKind::Leaf { prediction } => summaries.push(NodeSummary {
                id,
                depth: node.depth,
                samples: node.samples.len(),
                kind: SummaryKind::Leaf {
                    prediction: self.class_label(*prediction).to_string(),
                },
            }),
            NodeKind::Internal {
                attribute,
                threshold,
                left,
                right,
            } => {
                summaries.push(NodeSummary {
                    id,
                    depth: node.depth,
                    samples: node.samples.len(),
                    kind: SummaryKind::Split {
                        attribute: attribute.clone(),
                        threshold: *threshold,
                        left: id + 1,
                        right: id + 1 + left.num_nodes(),
                    },
                });
                self.summarize(left, summaries);
                self.summarize(right, summaries);
            }
        }
    }

    fn class_label(&self, class: usize) -> &str {
        self.classes.label(class).unwrap_or("?")
    }

    fn render(&self, node: &TreeNode<XT>, prefix: &str, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let indent = "\t".repeat(usize::from(node.depth));
        match &node.kind {
            NodeKind::Leaf { prediction } => {
                writeln!(f, "{indent}{prefix}{}", self.class_label(*prediction))
            }
            NodeKind::Internal {
                attribute,
                threshold,
                left,
                right,
            } => {
                writeln!(f, "{indent}{prefix}{attribute}<{threshold:?}?")?;
                self.render(left, "[True] ", f)?;
                self.render(right, "[False] ", f)
            }
        }
    }
}

/// Picks the majority class, walking classes in order and letting a class take
/// the lead whenever its count is at least the current leader's.
fn majority_class(counts: &[usize]) -> usize {
    let mut dominant_class = 0;
    let mut dominant_count = counts.first().copied().unwrap_or(0);

    for (class, &count) in counts.iter().enumerate().skip(1) {
        if count >= dominant_count {
            dominant_class = class;
            dominant_count = count;
        }
    }
    dominant_class
}

impl<XT: RealNumber> fmt::Display for DecisionTreeClassifier<XT> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "----------------")?;
        writeln!(f, "DECISION TREE")?;
        match &self.root {
            Some(root) => self.render(root, "", f)?,
            None => writeln!(f, "(not fitted)")?,
        }
        write!(f, "----------------")
    }
}
