use crate::data::dataset::{ClassSet, Dataset};
use crate::error::{Result, TreeError};
use csv::{ReaderBuilder, Trim};
use nalgebra::{DMatrix, DVector};
use std::io::Read;
use std::path::Path;

/// Reads a CSV file with a header row into a dataset.
///
/// Every column except `label_column` is parsed as a numeric attribute named
/// after its header; `label_column` holds the class of each record and must be
/// one of `classes`.
///
/// # Errors
///
/// Fails if the file can't be read, a value isn't a number, the label column
/// is absent or a label is not part of `classes`.
pub fn read_csv<P: AsRef<Path>>(
    file_path: P,
    label_column: &str,
    classes: &ClassSet,
) -> Result<Dataset<f64>> {
    let reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_path(file_path)?;
    collect_records(reader, label_column, classes)
}

/// Same as [`read_csv`] but reads from any `io::Read` source.
pub fn read_csv_from<R: Read>(
    source: R,
    label_column: &str,
    classes: &ClassSet,
) -> Result<Dataset<f64>> {
    let reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(source);
    collect_records(reader, label_column, classes)
}

fn collect_records<R: Read>(
    mut reader: csv::Reader<R>,
    label_column: &str,
    classes: &ClassSet,
) -> Result<Dataset<f64>> {
    let headers = reader.headers()?.clone();
    let label_index = headers
        .iter()
        .position(|h| h == label_column)
        .ok_or_else(|| TreeError::UnknownAttribute(label_column.to_string()))?;
    let attributes = headers
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != label_index)
        .map(|(_, h)| h.to_string())
        .collect::<Vec<_>>();

    let mut features = Vec::new();
    let mut labels = Vec::new();

    for result in reader.records() {
        let record = result?;
        let mut feature_row = Vec::with_capacity(attributes.len());

        for (i, field) in record.iter().enumerate() {
            if i == label_index {
                let label = classes
                    .index_of(field)
                    .ok_or_else(|| TreeError::UnknownClass(field.to_string()))?;
                labels.push(label);
            } else {
                feature_row.push(field.parse::<f64>()?);
            }
        }

        features.push(feature_row);
    }

    let nrows = features.len();
    let x = DMatrix::from_row_slice(nrows, attributes.len(), &features.concat());
    Dataset::new(x, DVector::from_vec(labels), attributes, classes.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    const IRIS_SNIPPET: &str = "\
sepal_length,sepal_width,petal_length,petal_width,species
5.1,3.5,1.4,0.2,Iris-setosa
7.0,3.2,4.7,1.4,Iris-versicolor
6.3,3.3,6.0,2.5,Iris-virginica
";

    #[test]
    fn test_read_csv_from() {
        let dataset = read_csv_from(IRIS_SNIPPET.as_bytes(), "species", &ClassSet::iris()).unwrap();

        assert_eq!(dataset.nrows(), 3);
        assert_eq!(
            dataset.attributes(),
            &["sepal_length", "sepal_width", "petal_length", "petal_width"]
        );
        assert_eq!(dataset.x()[(1, 2)], 4.7);
        assert_eq!(dataset.class_label(2), "Iris-virginica");
    }

    #[test]
    fn test_read_csv_from_missing_label_column() {
        let result = read_csv_from(IRIS_SNIPPET.as_bytes(), "class", &ClassSet::iris());
        assert!(matches!(result, Err(TreeError::UnknownAttribute(_))));
    }

    #[test]
    fn test_read_csv_from_unknown_class() {
        let data = "x,species\n1.0,Iris-unknown\n";
        let result = read_csv_from(data.as_bytes(), "species", &ClassSet::iris());
        assert!(matches!(result, Err(TreeError::UnknownClass(_))));
    }

    #[test]
    fn test_read_csv_from_bad_number() {
        let data = "x,species\nabc,Iris-setosa\n";
        let result = read_csv_from(data.as_bytes(), "species", &ClassSet::iris());
        assert!(matches!(result, Err(TreeError::ParseFloat(_))));
    }

    #[test]
    fn test_read_csv_from_header_only() {
        let data = "x,species\n";
        let dataset = read_csv_from(data.as_bytes(), "species", &ClassSet::iris()).unwrap();
        assert!(!dataset.is_not_empty());
    }

    #[test]
    fn test_read_csv_missing_file() {
        let result = read_csv("does/not/exist.csv", "species", &ClassSet::iris());
        assert!(result.is_err());
    }
}
