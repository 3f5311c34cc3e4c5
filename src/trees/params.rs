use crate::error::{Result, TreeError};

/// Stopping criteria of the tree builder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeParams {
    min_samples_split: u16,
    max_depth: u16,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeParams {
    pub const DEFAULT_MIN_SAMPLES_SPLIT: u16 = 4;
    pub const DEFAULT_MAX_DEPTH: u16 = 3;

    pub fn new() -> Self {
        Self {
            min_samples_split: Self::DEFAULT_MIN_SAMPLES_SPLIT,
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }

    /// Validates raw, possibly user supplied, integers.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if `min_samples_split` is not positive or
    /// `max_depth` is negative, or if either doesn't fit in a `u16`.
    pub fn try_new(min_samples_split: i64, max_depth: i64) -> Result<Self> {
        let min_samples_split = u16::try_from(min_samples_split).map_err(|_| {
            TreeError::InvalidConfiguration(format!(
                "The minimum number of samples to split must be between 1 and {}, got {}.",
                u16::MAX,
                min_samples_split
            ))
        })?;
        let max_depth = u16::try_from(max_depth).map_err(|_| {
            TreeError::InvalidConfiguration(format!(
                "The maximum depth must be between 0 and {}, got {}.",
                u16::MAX,
                max_depth
            ))
        })?;

        let mut params = Self::new();
        params.set_min_samples_split(min_samples_split)?;
        params.set_max_depth(max_depth)?;
        Ok(params)
    }

    pub fn set_min_samples_split(&mut self, min_samples_split: u16) -> Result<()> {
        if min_samples_split < 1 {
            return Err(TreeError::InvalidConfiguration(
                "The minimum number of samples to split must be greater than 0.".into(),
            ));
        }
        self.min_samples_split = min_samples_split;
        Ok(())
    }

    pub fn set_max_depth(&mut self, max_depth: u16) -> Result<()> {
        self.max_depth = max_depth;
        Ok(())
    }

    pub fn min_samples_split(&self) -> u16 {
        self.min_samples_split
    }

    pub fn max_depth(&self) -> u16 {
        self.max_depth
    }

    /// Whether a node at `depth` holding `num_samples` records of
    /// `num_classes` distinct classes may still be split.
    pub fn allows_split(&self, depth: u16, num_samples: usize, num_classes: usize) -> bool {
        depth < self.max_depth
            && num_samples >= usize::from(self.min_samples_split)
            && num_classes > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = TreeParams::default();
        assert_eq!(params.min_samples_split(), 4);
        assert_eq!(params.max_depth(), 3);
    }

    #[test]
    fn test_set_min_samples_split_rejects_zero() {
        let mut params = TreeParams::new();
        assert!(params.set_min_samples_split(0).is_err());
        assert_eq!(params.min_samples_split(), 4);
        assert!(params.set_min_samples_split(1).is_ok());
        assert_eq!(params.min_samples_split(), 1);
    }

    #[test]
    fn test_try_new() {
        let params = TreeParams::try_new(2, 0).unwrap();
        assert_eq!(params.min_samples_split(), 2);
        assert_eq!(params.max_depth(), 0);
    }

    #[test]
    fn test_try_new_rejects_out_of_range() {
        assert!(matches!(
            TreeParams::try_new(0, 3),
            Err(TreeError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            TreeParams::try_new(-4, 3),
            Err(TreeError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            TreeParams::try_new(4, -1),
            Err(TreeError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_allows_split() {
        let params = TreeParams::new();
        assert!(params.allows_split(0, 4, 2));
        assert!(!params.allows_split(3, 100, 3));
        assert!(!params.allows_split(0, 3, 3));
        assert!(!params.allows_split(0, 100, 1));
    }
}
