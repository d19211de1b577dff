use anyhow::Result;
use clap::{Parser, ValueEnum};

use email_graph_bootstrap::bootstrap::{ClusterInput, FeatureInit};
use email_graph_bootstrap::config::PipelineConfig;
use email_graph_bootstrap::{export, pipeline, storage};

#[derive(Parser, Debug)]
#[clap(
    name = "email-graph-bootstrap",
    about = "Graph construction and pseudo-label bootstrapping for email communication networks"
)]
struct Cli {
    /// Path to the tab-separated sender/receiver edge list
    #[clap(long)]
    input: String,

    /// Output directory for dataset artifacts
    #[clap(long, default_value = "dataset_out")]
    output_dir: String,

    /// Number of pseudo-label clusters
    #[clap(long, default_value = "4")]
    clusters: usize,

    /// Random seed for feature generation and clustering
    #[clap(long, default_value = "42")]
    seed: u64,

    /// Feature initialization strategy
    #[clap(long, value_enum, default_value_t = FeatureInitArg::Random)]
    feature_init: FeatureInitArg,

    /// Feature dimension (random initialization only)
    #[clap(long, default_value = "64")]
    feature_dim: usize,

    /// Matrix the pseudo-label clustering partitions
    #[clap(long, value_enum, default_value_t = ClusterInputArg::Features)]
    cluster_input: ClusterInputArg,

    /// Skip GraphML export
    #[clap(long)]
    skip_export: bool,

    /// Number of worker threads (0 = use all available cores)
    #[clap(long, default_value = "0")]
    threads: usize,

    /// Verbose logging
    #[clap(long, short)]
    verbose: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum FeatureInitArg {
    Identity,
    Random,
    ClusterOneHot,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum ClusterInputArg {
    Features,
    Adjacency,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Cli::parse();

    // Configure logging
    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp_millis()
        .init();

    // Set number of threads
    let num_threads = if args.threads > 0 {
        args.threads
    } else {
        num_cpus::get()
    };

    log::info!("Using {} worker threads", num_threads);
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()?;

    log::info!("Starting graph bootstrap pipeline");
    log::info!("Input: {}", args.input);
    log::info!("Output: {}", args.output_dir);

    // Create output directory
    std::fs::create_dir_all(&args.output_dir)?;

    let feature_init = match args.feature_init {
        FeatureInitArg::Identity => FeatureInit::Identity,
        FeatureInitArg::Random => FeatureInit::RandomNormal {
            dim: args.feature_dim,
        },
        FeatureInitArg::ClusterOneHot => FeatureInit::ClusterOneHot,
    };

    let mut cluster_input = match args.cluster_input {
        ClusterInputArg::Features => ClusterInput::Features,
        ClusterInputArg::Adjacency => ClusterInput::Adjacency,
    };

    // One-hot cluster features only exist after clustering runs, so that
    // variant always clusters the adjacency rows.
    if feature_init == FeatureInit::ClusterOneHot && cluster_input == ClusterInput::Features {
        log::warn!("--feature-init cluster-one-hot clusters adjacency rows; ignoring --cluster-input features");
        cluster_input = ClusterInput::Adjacency;
    }

    let config = PipelineConfig {
        input: args.input.into(),
        clusters: args.clusters,
        seed: args.seed,
        feature_init,
        cluster_input,
    };

    // 1-4. Ingest, index, assemble, bootstrap
    let dataset = pipeline::run(&config)?;

    log::info!(
        "Dataset ready: {} nodes ({} senders, {} receivers), {} directed entries, {} clusters, {} rows rejected",
        dataset.graph.node_count,
        dataset.graph.sender_count,
        dataset.graph.receiver_count(),
        dataset.graph.edge_index.len(),
        dataset.cluster_count(),
        dataset.rejected_rows
    );

    // 5. Save artifacts
    storage::save_dataset(&dataset, &args.output_dir)?;

    // 6. Export GraphML if requested
    if !args.skip_export {
        export::export_graphml(&dataset, &args.output_dir)?;
    }

    log::info!("Bootstrap complete. Artifacts saved to {}", args.output_dir);

    Ok(())
}
