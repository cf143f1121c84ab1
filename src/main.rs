//! Tractshift - Entry Point
//!
//! Builds a synthetic grid world, runs the neighborhood-change model to
//! termination or the step cap, and prints an end-of-run summary. An
//! optional JSON snapshot captures full per-region / per-household state
//! for external plotting.

use std::path::PathBuf;

use clap::Parser;

use tractshift::core::config::ModelConfig;
use tractshift::core::error::Result;
use tractshift::model::Model;
use tractshift::model::RegionSeed;
use tractshift::space::geometry::grid_of_squares;

#[derive(Parser, Debug)]
#[command(name = "tractshift", about = "Neighborhood change simulation")]
struct Args {
    /// Maximum number of steps to run
    #[arg(long, default_value_t = 200)]
    steps: u64,

    /// Grid width in regions
    #[arg(long, default_value_t = 8)]
    width: u32,

    /// Grid height in regions
    #[arg(long, default_value_t = 8)]
    height: u32,

    /// Households created per region (overrides config)
    #[arg(long)]
    households: Option<u32>,

    /// RNG seed (overrides config)
    #[arg(long)]
    seed: Option<u64>,

    /// TOML config file; missing keys fall back to defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write a JSON snapshot of final state to this path
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("tractshift=info")
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ModelConfig::from_toml_file(path)?,
        None => ModelConfig::default(),
    };
    if let Some(households) = args.households {
        config.households_per_region = households;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    let seeds: Vec<RegionSeed> = grid_of_squares(args.width, args.height)
        .into_iter()
        .map(|(id, boundary)| RegionSeed {
            id,
            boundary,
            households: config.households_per_region,
        })
        .collect();

    println!("Tractshift neighborhood simulation");
    println!("==================================");
    println!("Regions: {}x{} grid", args.width, args.height);
    println!(
        "Households: {} per region, {} total",
        config.households_per_region,
        config.households_per_region as usize * seeds.len()
    );
    println!("Seed: {}", config.seed);
    println!();

    let start = std::time::Instant::now();
    let mut model = Model::new(config, seeds)?;

    while model.running() && model.step_count() < args.steps {
        let metrics = *model.step()?;
        if metrics.step % 10 == 0 || !model.running() {
            tracing::info!(
                step = metrics.step,
                happy = metrics.happy,
                unhappy = metrics.unhappy,
                displaced = metrics.displaced,
                moves = metrics.total_moves,
                renovations = metrics.total_renovations,
            );
        }
    }
    let elapsed = start.elapsed();

    let metrics = model.metrics();
    println!("Finished at step {}", metrics.step);
    if !model.running() {
        println!("Terminated: every household happy");
    } else {
        println!("Stopped at the step cap");
    }
    println!("Happy:                  {}", metrics.happy);
    println!("Unhappy:                {}", metrics.unhappy);
    println!("Displaced:              {}", metrics.displaced);
    println!("Total moves:            {}", metrics.total_moves);
    println!("Displacement attempts:  {}", metrics.total_displacement_attempts);
    println!("Renovations:            {}", metrics.total_renovations);
    println!("Wall time: {:.2}ms", elapsed.as_secs_f64() * 1000.0);

    if let Some(path) = args.out {
        let json = model.snapshot().to_json()?;
        std::fs::write(&path, json)?;
        println!("Snapshot written to {}", path.display());
    }

    Ok(())
}
