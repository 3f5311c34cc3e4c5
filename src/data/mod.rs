/// Labeled records, class sets and attribute domains
pub mod dataset;
/// Loading datasets from CSV files
pub mod reader;
