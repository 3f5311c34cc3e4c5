use crate::error::{Result, TreeError};
use nalgebra::{DMatrix, DVector};
use num_traits::{Float, FromPrimitive, Num, ToPrimitive};
use rand::seq::SliceRandom;
use rand::{rngs::StdRng, SeedableRng};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt::{self, Display};
use std::fmt::{Debug, Formatter};
use std::ops::{AddAssign, DivAssign, MulAssign, SubAssign};

pub trait DataValue:
    Debug
    + Clone
    + Copy
    + Num
    + FromPrimitive
    + ToPrimitive
    + AddAssign
    + SubAssign
    + MulAssign
    + DivAssign
    + Send
    + Sync
    + Display
    + 'static
{
}

impl<T> DataValue for T where
    T: Debug
        + Clone
        + Copy
        + Num
        + FromPrimitive
        + ToPrimitive
        + AddAssign
        + SubAssign
        + MulAssign
        + DivAssign
        + Send
        + Sync
        + Display
        + 'static
{
}

pub trait Number: DataValue + PartialOrd {}
impl<T> Number for T where T: DataValue + PartialOrd {}

pub trait RealNumber: Number + Float {}
impl<T> RealNumber for T where T: Number + Float {}

/// A single record keyed by attribute name, as handed to the predictor.
pub type Sample<XT> = HashMap<String, XT>;

/// The fixed, ordered set of class labels a dataset may carry.
///
/// The order is significant: majority voting at the leaves walks the classes in
/// this order and lets later classes win ties.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassSet {
    labels: Vec<String>,
}

impl ClassSet {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }

    /// The three species of the iris flower dataset.
    pub fn iris() -> Self {
        Self::new(["Iris-setosa", "Iris-versicolor", "Iris-virginica"])
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    pub fn label(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

/// Candidate split thresholds per attribute.
///
/// Every pool is kept sorted ascending without duplicates, so the split search
/// enumerates thresholds in a stable order.
#[derive(Clone, Debug, PartialEq)]
pub struct AttributeDomains<XT: RealNumber> {
    domains: HashMap<String, Vec<XT>>,
}

impl<XT: RealNumber> Default for AttributeDomains<XT> {
    fn default() -> Self {
        Self::new()
    }
}

impl<XT: RealNumber> AttributeDomains<XT> {
    pub fn new() -> Self {
        Self {
            domains: HashMap::new(),
        }
    }

    pub fn insert(&mut self, attribute: impl Into<String>, mut values: Vec<XT>) {
        values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        values.dedup();
        self.domains.insert(attribute.into(), values);
    }

    pub fn get(&self, attribute: &str) -> Option<&[XT]> {
        self.domains.get(attribute).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}

/// Labeled records: one row of `x` per record, one column per attribute, and the
/// class of each record in `y` as an index into the class set.
///
/// Both are read-only once constructed, so every label stays a valid class index.
#[derive(Clone)]
pub struct Dataset<XT: RealNumber> {
    x: DMatrix<XT>,
    y: DVector<usize>,
    attributes: Vec<String>,
    classes: ClassSet,
}

impl<XT: RealNumber> Debug for Dataset<XT> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Dataset {{\n    attributes: {:?},\n    x: [\n", self.attributes)?;

        for i in 0..self.x.nrows() {
            write!(f, "        [")?;
            for j in 0..self.x.ncols() {
                write!(f, "{:?}, ", self.x[(i, j)])?;
            }
            writeln!(f, "],")?;
        }

        write!(f, "    ],\n    y: [")?;
        for i in 0..self.y.len() {
            write!(f, "{:?}, ", self.class_label(i))?;
        }
        write!(f, "]\n}}")
    }
}

impl<XT: RealNumber> Dataset<XT> {
    /// Creates a dataset, checking that features, labels and names line up.
    ///
    /// # Errors
    ///
    /// Returns `ShapeMismatch` when the number of rows of `x` differs from the
    /// length of `y` or the number of columns differs from the number of
    /// attribute names, and `UnknownClass` when a label index falls outside of
    /// `classes`.
    pub fn new<S: Into<String>>(
        x: DMatrix<XT>,
        y: DVector<usize>,
        attributes: Vec<S>,
        classes: ClassSet,
    ) -> Result<Self> {
        let attributes: Vec<String> = attributes.into_iter().map(Into::into).collect();
        if x.nrows() != y.len() {
            return Err(TreeError::ShapeMismatch(format!(
                "{} feature rows but {} labels",
                x.nrows(),
                y.len()
            )));
        }
        if x.ncols() != attributes.len() {
            return Err(TreeError::ShapeMismatch(format!(
                "{} feature columns but {} attribute names",
                x.ncols(),
                attributes.len()
            )));
        }
        if let Some(bad) = y.iter().find(|&&label| label >= classes.len()) {
            return Err(TreeError::UnknownClass(format!("#{bad}")));
        }

        Ok(Self {
            x,
            y,
            attributes,
            classes,
        })
    }

    /// Creates a dataset from feature rows and textual class labels.
    pub fn from_rows<S: Into<String>>(
        attributes: Vec<S>,
        classes: ClassSet,
        rows: &[Vec<XT>],
        labels: &[&str],
    ) -> Result<Self> {
        let attributes: Vec<String> = attributes.into_iter().map(Into::into).collect();
        if let Some(row) = rows.iter().find(|row| row.len() != attributes.len()) {
            return Err(TreeError::ShapeMismatch(format!(
                "row of {} values for {} attributes",
                row.len(),
                attributes.len()
            )));
        }

        let y = labels
            .iter()
            .map(|&label| {
                classes
                    .index_of(label)
                    .ok_or_else(|| TreeError::UnknownClass(label.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;
        let x = DMatrix::from_row_slice(rows.len(), attributes.len(), &rows.concat());

        Self::new(x, DVector::from_vec(y), attributes, classes)
    }

    pub fn is_not_empty(&self) -> bool {
        !self.y.is_empty()
    }

    pub fn x(&self) -> &DMatrix<XT> {
        &self.x
    }

    pub fn y(&self) -> &DVector<usize> {
        &self.y
    }

    pub fn nrows(&self) -> usize {
        self.x.nrows()
    }

    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    pub fn classes(&self) -> &ClassSet {
        &self.classes
    }

    pub fn column_index(&self, attribute: &str) -> Option<usize> {
        self.attributes.iter().position(|a| a == attribute)
    }

    pub fn class_label(&self, row: usize) -> &str {
        &self.classes.labels()[self.y[row]]
    }

    /// Returns the record at `row` keyed by attribute name.
    pub fn record(&self, row: usize) -> Sample<XT> {
        self.attributes
            .iter()
            .enumerate()
            .map(|(col, name)| (name.clone(), self.x[(row, col)]))
            .collect()
    }

    /// Collects the distinct observed values of every attribute.
    pub fn attribute_domains(&self) -> AttributeDomains<XT> {
        let mut domains = AttributeDomains::new();
        for (col, name) in self.attributes.iter().enumerate() {
            domains.insert(name.clone(), self.x.column(col).iter().cloned().collect());
        }
        domains
    }

    /// Partitions the rows in `indices` into those whose value in
    /// `feature_index` is below `threshold` and the rest.
    pub fn split_on_threshold(
        &self,
        indices: &[usize],
        feature_index: usize,
        threshold: XT,
    ) -> (Vec<usize>, Vec<usize>) {
        indices
            .iter()
            .partition(|&&row| self.x[(row, feature_index)] < threshold)
    }

    /// Returns a new dataset holding only the given rows, in the given order.
    pub fn select(&self, indices: &[usize]) -> Self {
        Self {
            x: self.x.select_rows(indices),
            y: DVector::from_iterator(indices.len(), indices.iter().map(|&i| self.y[i])),
            attributes: self.attributes.clone(),
            classes: self.classes.clone(),
        }
    }

    /// Shuffles the rows and holds out `floor(nrows * test_size)` of them as the
    /// test part; the remaining rows form the training part.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if `test_size` is outside of `0.0..=1.0`.
    pub fn train_test_split(&self, test_size: f64, seed: Option<u64>) -> Result<(Self, Self)> {
        if !(0.0..=1.0).contains(&test_size) {
            return Err(TreeError::InvalidConfiguration(
                "Test size should be between 0.0 and 1.0".into(),
            ));
        }
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut indices = (0..self.nrows()).collect::<Vec<_>>();
        indices.shuffle(&mut rng);
        let test_size = (self.nrows() as f64 * test_size).floor() as usize;
        let (train_indices, test_indices) = indices.split_at(self.nrows() - test_size);

        Ok((self.select(train_indices), self.select(test_indices)))
    }
}
