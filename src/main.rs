use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use tracing::{error, info};

use id3_io::{Dataset, RecordReader, SchemaReader};
use id3_tree::{
    AttributeSchema, DecisionTree, Id3Config, Record, SubsampleValidation, TreeError,
    ValidationResult,
};

#[derive(Parser)]
#[command(name = "id3")]
#[command(about = "Train an ID3 decision tree, score it by sub-sampling, and label a test set")]
#[command(version)]
struct Cli {
    /// Path to the labeled training CSV file
    train: PathBuf,

    /// Path to the test CSV file to label
    test: PathBuf,

    /// Built-in attribute schema to use
    #[arg(long, value_enum, default_value_t = Domain::Customer)]
    domain: Domain,

    /// JSON schema file (overrides --domain)
    #[arg(long)]
    schema: Option<PathBuf>,

    /// Number of validation folds (defaults to 10 for customer, 5 for product)
    #[arg(long)]
    folds: Option<usize>,

    /// RNG seed for the validation shuffles (OS entropy if not set)
    #[arg(long)]
    seed: Option<u64>,

    /// Fraction of a node's records one label needs to make it a leaf
    #[arg(long, default_value_t = 0.7)]
    purity_threshold: f64,

    /// Print the trained tree after training
    #[arg(long)]
    show_tree: bool,

    /// Print a single JSON report instead of the text report
    #[arg(long)]
    json: bool,

    /// Enable verbose (debug-level) logging
    #[arg(long)]
    verbose: bool,

    /// Suppress all logging except errors
    #[arg(long)]
    quiet: bool,

    /// Number of threads for parallel prediction (defaults to all cores)
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Domain {
    /// Customer class C1..C5 from type, lifestyle, vacation, ecredit, salary, property
    Customer,
    /// Product outcome 1/0 from service, customer, fees, size, promotion, rate, period
    Product,
}

impl Domain {
    fn schema(self) -> AttributeSchema {
        match self {
            Domain::Customer => AttributeSchema::customer(),
            Domain::Product => AttributeSchema::product(),
        }
    }

    fn default_folds(self) -> usize {
        match self {
            Domain::Customer => 10,
            Domain::Product => 5,
        }
    }
}

// --- JSON stdout output structs ---

#[derive(Serialize)]
struct ReportOutput<'a> {
    train: DatasetOutput,
    test: DatasetOutput,
    tree: TreeOutput,
    validation: &'a ValidationResult,
    predictions: Vec<String>,
}

#[derive(Serialize)]
struct DatasetOutput {
    path: String,
    n_records: usize,
    n_skipped: usize,
}

#[derive(Serialize)]
struct TreeOutput {
    n_nodes: usize,
    n_leaves: usize,
    depth: usize,
    split_attributes: Vec<String>,
}

impl DatasetOutput {
    fn new(path: &Path, dataset: &Dataset) -> Self {
        Self {
            path: path.display().to_string(),
            n_records: dataset.n_records(),
            n_skipped: dataset.skipped().len(),
        }
    }
}

impl TreeOutput {
    fn new(tree: &DecisionTree) -> Self {
        Self {
            n_nodes: tree.n_nodes(),
            n_leaves: tree.n_leaves(),
            depth: tree.depth(),
            split_attributes: tree
                .split_attributes()
                .into_iter()
                .map(|i| tree.schema().attribute(i).name().to_string())
                .collect(),
        }
    }
}

/// Load a record file, falling back to an empty dataset if it cannot be read.
fn load_or_empty(path: &Path, schema: &AttributeSchema, role: &str) -> (Dataset, bool) {
    match RecordReader::new(path, schema).read() {
        Ok(dataset) => (dataset, true),
        Err(e) => {
            error!(role, path = %path.display(), error = %e, "failed to load records, continuing with none");
            (Dataset::empty(), false)
        }
    }
}

/// Label each test record, writing "unknown" where the tree has no answer.
///
/// A record the tree cannot discretize (e.g. an unknown category) fails the
/// whole batch.
fn label_test_set(tree: &DecisionTree, records: &[Record]) -> Result<Vec<String>, TreeError> {
    Ok(tree
        .predict_batch(records)?
        .into_iter()
        .map(|p| p.map_or_else(|| "unknown".to_string(), ToString::to_string))
        .collect())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Configure Rayon thread pool
    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure thread pool")?;
        info!(threads, "thread pool configured");
    }

    let schema = match &cli.schema {
        Some(path) => SchemaReader::new(path)
            .read()
            .context("failed to read schema file")?,
        None => cli.domain.schema(),
    };
    let folds = cli.folds.unwrap_or(cli.domain.default_folds());

    // Train
    let (train, _) = load_or_empty(&cli.train, &schema, "training");
    let config = Id3Config::new().with_purity_threshold(cli.purity_threshold);
    let tree = config
        .fit(&schema, train.records())
        .context("failed to train decision tree")?;
    info!(
        purity_threshold = config.purity_threshold(),
        n_nodes = tree.n_nodes(),
        n_leaves = tree.n_leaves(),
        depth = tree.depth(),
        "tree trained"
    );

    if !cli.json {
        println!("Training successfully completed");
        if cli.show_tree {
            print!("{tree}");
        }
    }

    // Validate
    let validation = SubsampleValidation::new(folds)
        .context("invalid fold count")?
        .with_seed(cli.seed)
        .evaluate(&tree, train.records())
        .context("sub-sampling validation failed")?;

    if !cli.json {
        for (i, accuracy) in validation.fold_accuracies.iter().enumerate() {
            println!("Accuracy for fold {} : {accuracy:.2}", i + 1);
        }
        println!("Cross-validation accuracy: {:.2}", validation.mean_accuracy);
        println!();
    }

    // Predict
    let (test, test_loaded) = load_or_empty(&cli.test, &schema, "test");
    let predictions =
        label_test_set(&tree, test.records()).context("failed to label test set")?;

    if cli.json {
        let output = ReportOutput {
            train: DatasetOutput::new(&cli.train, &train),
            test: DatasetOutput::new(&cli.test, &test),
            tree: TreeOutput::new(&tree),
            validation: &validation,
            predictions,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        if test_loaded {
            println!("Successfully loaded test data");
        }
        println!("Output class labels for the test set:");
        for label in &predictions {
            println!("{label}");
        }
    }

    Ok(())
}
