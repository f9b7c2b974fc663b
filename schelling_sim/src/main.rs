//! Schelling Simulator CLI
//!
//! Run the segregation model with custom parameters or named scenarios.

use clap::Parser;
use schelling_sim::scenarios::ScenarioId;
use schelling_sim::{FinishedRun, ScenarioResult, ScenarioRunner, SimConfig, SimExport};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Schelling segregation model simulator
#[derive(Parser, Debug)]
#[command(name = "schelling-sim")]
#[command(about = "Run Schelling's residential segregation model", long_about = None)]
struct Args {
    /// Master seed for determinism (0 = random from time)
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Grid side length
    #[arg(short, long, default_value = "50")]
    grid_size: usize,

    /// Number of type A agents
    #[arg(short = 'a', long, default_value = "1000")]
    type_a: usize,

    /// Number of type B agents
    #[arg(short = 'b', long, default_value = "1000")]
    type_b: usize,

    /// Similarity threshold in [0, 1]
    #[arg(short, long, default_value = "0.3")]
    threshold: f64,

    /// Maximum number of steps per run
    #[arg(long, default_value = "100")]
    steps: usize,

    /// Scenario to run (custom, sparse_convergence, mild_preference, strong_preference, dense_city, all)
    #[arg(short = 'S', long, default_value = "custom")]
    scenario: String,

    /// Number of consecutive seeds to run
    #[arg(long, default_value = "1")]
    seeds: usize,

    /// Verbose output (per-step metrics)
    #[arg(short, long)]
    verbose: bool,

    /// JSON summary on stdout
    #[arg(long)]
    json: bool,

    /// Export the metrics series and final grid to a JSON file
    #[arg(long)]
    export: Option<String>,

    /// Print the final grid
    #[arg(long)]
    render: bool,
}

/// What a single run executes.
#[derive(Debug, Clone, Copy)]
enum Target {
    Custom,
    Preset(ScenarioId),
}

fn main() {
    let args = Args::parse();

    // Initialize logging
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    if !args.json {
        info!("Schelling Simulator v{}", env!("CARGO_PKG_VERSION"));
        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    }

    let targets: Vec<Target> = match args.scenario.as_str() {
        "custom" => vec![Target::Custom],
        "all" => ScenarioId::all().into_iter().map(Target::Preset).collect(),
        name => match name.parse::<ScenarioId>() {
            Ok(scenario) => vec![Target::Preset(scenario)],
            Err(e) => {
                eprintln!("Error: {}", e);
                eprintln!("Available scenarios: custom, sparse_convergence, mild_preference, strong_preference, dense_city, all");
                std::process::exit(1);
            }
        },
    };

    if args.export.is_some() && (targets.len() > 1 || args.seeds > 1) {
        eprintln!("Error: --export only supports a single run, not 'all' or --seeds > 1");
        std::process::exit(1);
    }

    // Determine base seed
    let base_seed = if args.seed == 0 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(42)
    } else {
        args.seed
    };

    let mut all_results: Vec<ScenarioResult> = Vec::new();
    let mut failed_count = 0;

    for seed_offset in 0..args.seeds {
        let seed = base_seed.wrapping_add(seed_offset as u64);
        let runner = ScenarioRunner::new(seed);

        for target in &targets {
            let (result, finished) = match target {
                Target::Custom => {
                    let config = SimConfig::default()
                        .with_seed(seed)
                        .with_grid_size(args.grid_size)
                        .with_counts(args.type_a, args.type_b)
                        .with_threshold(args.threshold)
                        .with_max_steps(args.steps);
                    runner.run_config(config)
                }
                Target::Preset(scenario) => runner.run_with_history(*scenario),
            };

            if let Some(finished) = &finished {
                publish(&args, &result, finished);
            }

            if !args.json {
                if result.passed {
                    info!("✓ {} (seed={}) PASSED", result.scenario, seed);
                } else {
                    error!(
                        "✗ {} (seed={}) FAILED: {}",
                        result.scenario,
                        seed,
                        result.failure_reason.as_deref().unwrap_or("unknown")
                    );
                }
            }

            if !result.passed {
                failed_count += 1;
            }
            all_results.push(result);
        }
    }

    let total = all_results.len();
    let passed = total - failed_count;

    if args.json {
        let summary = serde_json::json!({
            "total": total,
            "passed": passed,
            "failed": failed_count,
            "results": all_results,
        });
        match serde_json::to_string_pretty(&summary) {
            Ok(text) => println!("{}", text),
            Err(e) => error!("Failed to encode summary: {}", e),
        }
    } else {
        info!("");
        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        if failed_count == 0 {
            info!("✅ All {} runs passed!", total);
        } else {
            error!("❌ {}/{} runs failed!", failed_count, total);
            for result in all_results.iter().filter(|r| !r.passed) {
                error!(
                    "  - {} seed={}: {}",
                    result.scenario,
                    result.seed,
                    result.failure_reason.as_deref().unwrap_or("unknown")
                );
            }
        }
    }

    // Exit with proper code for CI
    if failed_count > 0 {
        std::process::exit(1);
    }
}

/// Renders and/or exports a finished run as requested on the command line.
fn publish(args: &Args, result: &ScenarioResult, (world, history): &FinishedRun) {
    if args.render {
        println!("{}", world.grid());
    }

    if let Some(path) = &args.export {
        let export = SimExport::from_run(&result.scenario, world, history, result.passed);
        match export.write_to_file(path) {
            Ok(()) => info!("Exported {} frames to {}", export.frames.len(), path),
            Err(e) => error!("Failed to write export: {}", e),
        }
    }
}
