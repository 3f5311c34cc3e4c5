use clap::Parser;
use rusty_id3::data::dataset::ClassSet;
use rusty_id3::data::reader::read_csv;
use rusty_id3::metrics::confusion::ClassificationMetrics;
use rusty_id3::trees::classifier::DecisionTreeClassifier;
use rusty_id3::trees::params::TreeParams;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

/// Train a decision tree on the iris dataset and report its test accuracy.
#[derive(Parser, Debug)]
#[command(name = "iris")]
#[command(version)]
struct Cli {
    /// CSV file with a header row and a `species` column
    #[arg(default_value = "IRIS.csv")]
    dataset: PathBuf,

    /// Name of the class label column
    #[arg(long, default_value = "species")]
    label: String,

    /// Minimum number of samples a node needs to be split
    #[arg(long, default_value_t = 4, allow_negative_numbers = true)]
    min_samples: i64,

    /// Maximum depth of the tree
    #[arg(long, default_value_t = 3, allow_negative_numbers = true)]
    max_depth: i64,

    /// Share of the records held out for testing
    #[arg(long, default_value_t = 0.25)]
    test_size: f64,

    /// Random seed of the train/test split
    #[arg(long)]
    seed: Option<u64>,

    /// Keep sibling leaves that predict the same class
    #[arg(long)]
    no_merge: bool,
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let params = TreeParams::try_new(cli.min_samples, cli.max_depth)?;
    let classes = ClassSet::iris();

    let dataset = read_csv(&cli.dataset, &cli.label, &classes)?;
    if !dataset.is_not_empty() {
        return Err("dataset is empty!".into());
    }

    let (train_dataset, test_dataset) = dataset.train_test_split(cli.test_size, cli.seed)?;
    println!("dataset size: {}", dataset.nrows());
    println!("training set size: {}", train_dataset.nrows());
    println!("test set size: {}", test_dataset.nrows());

    let mut classifier = DecisionTreeClassifier::from_params(params);
    classifier.fit(&train_dataset)?;
    if !cli.no_merge {
        classifier.merge_leaves()?;
    }

    println!("{}", classifier);

    if test_dataset.is_not_empty() {
        let predictions = classifier.predict_dataset(&test_dataset)?;
        let accuracy = classifier.accuracy(test_dataset.y(), &predictions)?;
        let confusion =
            classifier.confusion_matrix(test_dataset.y(), &predictions, classes.len())?;
        println!("accuracy on test set: {:.2}%", accuracy * 100.0);
        println!("confusion matrix (rows: {:?}):{}", classes.labels(), confusion);
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
