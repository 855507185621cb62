use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use metrictree::{
    Centering, DataSet, DistanceMetric, MeanCenter, MetricTree, MetricTreeError, RepresentativeCenter, TreeConfig,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};

/// Build a ball tree over a JSON file of points and query it.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON array of coordinate arrays, e.g. [[0,0],[1,2]]
    #[arg(long)]
    input: PathBuf,

    /// TOML tree configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// euclidean, manhattan or chebyshev
    #[arg(long, default_value = "euclidean")]
    metric: DistanceMetric,

    /// Use representatives instead of subtree means as ball centers
    #[arg(long)]
    uncentered: bool,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print tree statistics
    Stats,
    /// k nearest neighbors of a point
    Knn {
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        query: Vec<f64>,
        /// Defaults to `default_k` from the configuration
        #[arg(long)]
        k: Option<usize>,
    },
    /// Every point strictly inside a sphere
    Sphere {
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        center: Vec<f64>,
        #[arg(long)]
        radius: f64,
    },
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt().with_max_level(level).with_writer(std::io::stderr).init();
}

fn check_dimension(query: &[f64], data: &DataSet<Vec<f64>>) -> metrictree::Result<()> {
    match data.dimension() {
        Some(dimension) if dimension != query.len() => Err(MetricTreeError::InvalidInput {
            message: format!("query has {} coordinates, points have {}", query.len(), dimension),
        }),
        _ => Ok(()),
    }
}

fn run<C: Centering<Vec<f64>>>(
    cli: &Cli,
    config: TreeConfig,
    data: Arc<DataSet<Vec<f64>>>,
) -> metrictree::Result<serde_json::Value> {
    let mut tree = MetricTree::<Vec<f64>, DistanceMetric, C>::with_config(cli.metric, config);
    tree.set_data_set(Arc::clone(&data));
    tree.build()?;

    let output = match &cli.command {
        Commands::Stats => serde_json::to_value(tree.statistics()?)?,
        Commands::Knn { query, k } => {
            check_dimension(query, &data)?;
            let k = k.unwrap_or(tree.config().default_k);
            serde_json::to_value(tree.knn_query(query, k)?)?
        }
        Commands::Sphere { center, radius } => {
            check_dimension(center, &data)?;
            serde_json::to_value(tree.sphere_query(center, *radius)?)?
        }
    };
    Ok(output)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = TreeConfig::load_or_default(cli.config.as_deref()).context("Failed to load configuration")?;
    let data = Arc::new(
        DataSet::from_json_file(&cli.input)
            .with_context(|| format!("Failed to read points from '{}'", cli.input.display()))?,
    );
    info!(points = data.len(), metric = cli.metric.as_str(), "loaded input");

    let result = if cli.uncentered {
        run::<RepresentativeCenter>(&cli, config, data)
    } else {
        run::<MeanCenter>(&cli, config, data)
    };
    let output = result.context("Query failed")?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
