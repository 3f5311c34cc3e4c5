use crate::data::dataset::{Dataset, RealNumber, Sample};
use crate::error::{Result, TreeError};

/// What a node does with a record: answer directly, or route it on.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind<XT: RealNumber> {
    /// Predicts the class with the given index.
    Leaf { prediction: usize },
    /// Sends records with `attribute < threshold` left and the rest right.
    Internal {
        attribute: String,
        threshold: XT,
        left: Box<TreeNode<XT>>,
        right: Box<TreeNode<XT>>,
    },
}

/// Decision tree node
#[derive(Clone, Debug, PartialEq)]
pub struct TreeNode<XT: RealNumber> {
    pub depth: u16,
    /// Rows of the training dataset that reached this node.
    pub samples: Vec<usize>,
    pub kind: NodeKind<XT>,
}

impl<XT: RealNumber> TreeNode<XT> {
    pub fn leaf(depth: u16, samples: Vec<usize>, prediction: usize) -> Self {
        Self {
            depth,
            samples,
            kind: NodeKind::Leaf { prediction },
        }
    }

    pub fn internal(
        depth: u16,
        samples: Vec<usize>,
        attribute: String,
        threshold: XT,
        left: TreeNode<XT>,
        right: TreeNode<XT>,
    ) -> Self {
        Self {
            depth,
            samples,
            kind: NodeKind::Internal {
                attribute,
                threshold,
                left: Box::new(left),
                right: Box::new(right),
            },
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf { .. })
    }

    /// The predicted class index, if this is a leaf.
    pub fn prediction(&self) -> Option<usize> {
        match self.kind {
            NodeKind::Leaf { prediction } => Some(prediction),
            NodeKind::Internal { .. } => None,
        }
    }

    pub fn num_nodes(&self) -> usize {
        match &self.kind {
            NodeKind::Leaf { .. } => 1,
            NodeKind::Internal { left, right, .. } => 1 + left.num_nodes() + right.num_nodes(),
        }
    }

    pub fn num_leaves(&self) -> usize {
        match &self.kind {
            NodeKind::Leaf { .. } => 1,
            NodeKind::Internal { left, right, .. } => left.num_leaves() + right.num_leaves(),
        }
    }

    /// Depth of the deepest node of this subtree.
    pub fn max_depth(&self) -> u16 {
        match &self.kind {
            NodeKind::Leaf { .. } => self.depth,
            NodeKind::Internal { left, right, .. } => left.max_depth().max(right.max_depth()),
        }
    }

    /// Collapses every internal node whose two children are leaves with the same
    /// prediction into a leaf, children first. Returns the number of collapsed
    /// nodes.
    pub fn merge_leaves(&mut self) -> usize {
        let (merged, shared) = match &mut self.kind {
            NodeKind::Leaf { .. } => return 0,
            NodeKind::Internal { left, right, .. } => {
                let merged = left.merge_leaves() + right.merge_leaves();
                let shared = match (left.prediction(), right.prediction()) {
                    (Some(l), Some(r)) if l == r => Some(l),
                    _ => None,
                };
                (merged, shared)
            }
        };

        match shared {
            Some(prediction) => {
                self.kind = NodeKind::Leaf { prediction };
                merged + 1
            }
            None => merged,
        }
    }

    /// Walks down to a leaf, reading split attributes from `sample`.
    pub fn predict(&self, sample: &Sample<XT>) -> Result<usize> {
        self.descend(|attribute| sample.get(attribute).copied())
    }

    /// Walks down to a leaf for `row` of `dataset`, looking attributes up by
    /// name.
    pub fn predict_row(&self, dataset: &Dataset<XT>, row: usize) -> Result<usize> {
        self.descend(|attribute| {
            dataset
                .column_index(attribute)
                .map(|col| dataset.x()[(row, col)])
        })
    }

    fn descend<F>(&self, value_of: F) -> Result<usize>
    where
        F: Fn(&str) -> Option<XT>,
    {
        let mut node = self;
        loop {
            match &node.kind {
                NodeKind::Leaf { prediction } => return Ok(*prediction),
                NodeKind::Internal {
                    attribute,
                    threshold,
                    left,
                    right,
                } => {
                    let value = value_of(attribute.as_str()).ok_or_else(|| {
                        TreeError::MissingAttribute {
                            attribute: attribute.clone(),
                            depth: node.depth,
                        }
                    })?;
                    node = if value < *threshold { &**left } else { &**right };
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stump(left: usize, right: usize) -> TreeNode<f64> {
        TreeNode::internal(
            0,
            vec![0, 1],
            "x".to_string(),
            5.0,
            TreeNode::leaf(1, vec![0], left),
            TreeNode::leaf(1, vec![1], right),
        )
    }

    #[test]
    fn test_leaf() {
        let leaf = TreeNode::<f64>::leaf(2, vec![3, 4], 1);
        assert!(leaf.is_leaf());
        assert_eq!(leaf.prediction(), Some(1));
        assert_eq!(leaf.num_nodes(), 1);
        assert_eq!(leaf.max_depth(), 2);
    }

    #[test]
    fn test_predict_routes_on_threshold() {
        let node = stump(0, 1);
        let below = Sample::from([("x".to_string(), 4.9)]);
        let at = Sample::from([("x".to_string(), 5.0)]);
        assert_eq!(node.predict(&below).unwrap(), 0);
        assert_eq!(node.predict(&at).unwrap(), 1);
    }

    #[test]
    fn test_predict_missing_attribute() {
        let node = stump(0, 1);
        let sample = Sample::from([("y".to_string(), 1.0)]);
        match node.predict(&sample) {
            Err(TreeError::MissingAttribute { attribute, depth }) => {
                assert_eq!(attribute, "x");
                assert_eq!(depth, 0);
            }
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn test_merge_leaves_same_prediction() {
        let mut node = stump(1, 1);
        assert_eq!(node.merge_leaves(), 1);
        assert!(node.is_leaf());
        assert_eq!(node.prediction(), Some(1));
        assert_eq!(node.samples, vec![0, 1]);
    }

    #[test]
    fn test_merge_leaves_different_predictions() {
        let mut node = stump(0, 1);
        assert_eq!(node.merge_leaves(), 0);
        assert!(!node.is_leaf());
        assert_eq!(node.num_leaves(), 2);
    }

    #[test]
    fn test_merge_leaves_cascades_upwards() {
        let mut node = TreeNode::internal(
            0,
            vec![0, 1, 2],
            "x".to_string(),
            5.0,
            TreeNode::internal(
                1,
                vec![0, 1],
                "x".to_string(),
                2.0,
                TreeNode::leaf(2, vec![0], 2),
                TreeNode::leaf(2, vec![1], 2),
            ),
            TreeNode::leaf(1, vec![2], 2),
        );
        assert_eq!(node.merge_leaves(), 2);
        assert_eq!(node.prediction(), Some(2));
    }
}
