use anyhow::Result;
use clap::Parser;

use eq_decluster::cluster::metrics::assignment_stats;
use eq_decluster::cluster::prune::prune;
use eq_decluster::config::MetricParams;
use eq_decluster::cutoff::estimate_cutoff;
use eq_decluster::data::catalog::load_catalog;
use eq_decluster::storage;
use eq_decluster::tree::builder::build_forest;

#[derive(Parser, Debug)]
#[clap(
    name = "eq-decluster",
    about = "Nearest-neighbor declustering of event catalogs"
)]
struct Cli {
    /// Path to input catalog CSV (time, x, y[, z], magnitude)
    #[clap(long)]
    input: String,

    /// Output directory for results
    #[clap(long, default_value = "decluster_results")]
    output_dir: String,

    /// Cutoff distance separating clustered from background links;
    /// estimated from the catalog when omitted
    #[clap(long)]
    cutoff: Option<f64>,

    /// Gutenberg-Richter b-value used by the proximity metric
    #[clap(long, default_value = "1.0")]
    b_value: f64,

    /// Fractal dimension of the epicenter distribution
    #[clap(long, default_value = "1.6")]
    fractal_dim: f64,

    /// Fraction of the magnitude weight on the rescaled time term
    #[clap(long, default_value = "0.5")]
    mag_split: f64,

    /// Number of worker threads (0 = use all available cores)
    #[clap(long, default_value = "0")]
    threads: usize,

    /// Verbose logging
    #[clap(long, short)]
    verbose: bool,
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
        // If threads = 0, use all available cores
        num_cpus::get()
    };

    log::info!("Using {} worker threads", num_threads);
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()?;

    log::info!("Starting catalog declustering");
    log::info!("Input: {}", args.input);
    log::info!("Output: {}", args.output_dir);

    // Create output directory
    std::fs::create_dir_all(&args.output_dir)?;

    let params = MetricParams::new(args.b_value, args.fractal_dim, args.mag_split);

    // 1. Load the catalog
    let catalog = load_catalog(&args.input)?;

    // 2. Link every event to its nearest causal predecessor
    let forest = build_forest(&catalog, &params);

    // 3. Pick the cutoff: caller-supplied, or split from the distance
    //    distribution
    let cutoff = match args.cutoff {
        Some(value) => {
            log::info!("Using supplied cutoff {:.3e}", value);
            value
        }
        None => {
            let estimate = estimate_cutoff(&forest)?;
            log::info!(
                "Estimated cutoff {:.3e} between modes at 10^{:.2} and 10^{:.2}",
                estimate.cutoff,
                estimate.modes.0,
                estimate.modes.1
            );
            estimate.cutoff
        }
    };

    // 4. Prune and label clusters
    let assignment = prune(&catalog, &forest, cutoff)?;

    let stats = assignment_stats(&assignment);
    log::info!(
        "Found {} clusters ({} background events, largest cluster {})",
        stats.cluster_count,
        stats.background_count,
        stats.largest_cluster_size
    );

    // 5. Save results
    storage::save_results(&catalog, &forest, &assignment, &args.output_dir)?;

    log::info!("Declustering complete. Results saved to {}", args.output_dir);

    Ok(())
}
