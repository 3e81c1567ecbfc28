use anyhow::Result;
use clap::Parser;

use gefura::{data, storage, BrokerageConfig, Direction, Measure, OverlapStrategy};

#[derive(Parser, Debug)]
#[clap(
    name = "gefura",
    about = "Group brokerage (gefura) centrality of nodes in a grouped graph"
)]
struct Cli {
    /// Path to edge list Parquet file (string columns `source` and `target`)
    #[clap(long)]
    edges: String,

    /// Path to groups JSON file (array of arrays of node ids)
    #[clap(long)]
    groups: String,

    /// Brokerage measure: global, local or external
    #[clap(long, default_value = "global")]
    measure: Measure,

    /// Edge weight column; hop counts when omitted
    #[clap(long)]
    weight: Option<String>,

    /// Treat edges as directed
    #[clap(long)]
    directed: bool,

    /// Skip normalization to [0, 1]
    #[clap(long)]
    unnormalized: bool,

    /// Path direction for local scores on directed graphs: in, out or all
    #[clap(long, default_value = "out")]
    direction: Direction,

    /// Treatment of overlapping groups: decouple or direct
    #[clap(long, default_value = "decouple")]
    overlap: OverlapStrategy,

    /// Maximum number of hops per shortest path (unweighted only)
    #[clap(long)]
    max_path_length: Option<usize>,

    /// Output directory for results
    #[clap(long, default_value = "brokerage_results")]
    output_dir: String,

    /// Number of worker threads (0 = use all available cores)
    #[clap(long, default_value = "0")]
    threads: usize,

    /// Verbose logging
    #[clap(long, short)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Cli::parse();

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp_millis()
        .init();

    let num_threads = if args.threads > 0 {
        args.threads
    } else {
        num_cpus::get()
    };

    log::info!("Using {} worker threads", num_threads);
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()?;

    log::info!("Starting {} brokerage analysis", args.measure);
    log::info!("Edges: {}", args.edges);
    log::info!("Groups: {}", args.groups);
    log::info!("Output: {}", args.output_dir);

    let mut config = BrokerageConfig::new(
        args.weight.clone(),
        !args.unnormalized,
        args.direction,
        args.overlap,
    );
    if let Some(hops) = args.max_path_length {
        config = config.with_max_path_length(hops);
    }

    // 1. Load data
    let graph = data::load_edge_list(&args.edges, args.directed, args.weight.as_deref())?;
    let groups = data::load_groups(&args.groups)?;

    // 2. Score
    let scores = gefura::score(&graph, &groups, args.measure, &config)?;

    // 3. Save results
    storage::save_results(
        &scores,
        &graph,
        &groups,
        args.measure,
        &config,
        &args.output_dir,
    )?;

    log::info!("Analysis complete. Results saved to {}", args.output_dir);

    Ok(())
}
