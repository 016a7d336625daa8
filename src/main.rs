//! Evolution CLI - Search for seed patterns from a JSON configuration.

use std::fs;
use std::path::PathBuf;

use conway_evolve::{
    compute::evolution::{EvolutionEngine, FitnessMetric},
    schema::EvolutionConfig,
};

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <config.json> [seed] [metric]", args[0]);
        eprintln!();
        eprintln!("Evolve Game of Life seed patterns from a JSON configuration.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  config.json  Path to evolution configuration file");
        eprintln!("  seed         RNG seed (default: 0)");
        eprintln!("  metric       'survival' or 'drift' (default: survival)");
        eprintln!();
        eprintln!("An example configuration is printed with --example.");
        std::process::exit(1);
    }

    if args[1] == "--example" {
        print_example_config();
        return;
    }

    let config_path = PathBuf::from(&args[1]);
    let seed: u64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(0);
    let metric = match args.get(3).map(String::as_str) {
        None | Some("survival") => FitnessMetric::SurvivalRatio,
        Some("drift") => FitnessMetric::ComDisplacement,
        Some(other) => {
            eprintln!("Unknown metric '{}', expected 'survival' or 'drift'", other);
            std::process::exit(1);
        }
    };

    // Load configuration
    let config_str = fs::read_to_string(&config_path).unwrap_or_else(|e| {
        eprintln!("Error reading config file: {}", e);
        std::process::exit(1);
    });

    let config: EvolutionConfig = serde_json::from_str(&config_str).unwrap_or_else(|e| {
        eprintln!("Error parsing config: {}", e);
        std::process::exit(1);
    });

    println!("Game of Life Evolution");
    println!("======================");
    println!(
        "Grid: {}x{}, candidate side: {}",
        config.rows, config.cols, config.genome_side
    );
    println!(
        "Population: {}, generations: {}",
        config.population_size, config.generations
    );
    println!(
        "Rates: mutation {:.2}, crossover {:.2}, elitism {:.2}",
        config.mutation_rate, config.crossover_rate, config.elitism_fraction
    );
    println!("Steps per evaluation: {}", config.steps_per_evaluation);
    println!("Seed: {}, metric: {:?}", seed, metric);
    println!();

    let mut engine = EvolutionEngine::new(config, metric, seed).unwrap_or_else(|e| {
        eprintln!("Invalid configuration: {}", e);
        std::process::exit(1);
    });

    println!("Running evolution...");
    let result = engine
        .run_with_callback(|summary| {
            println!(
                "  Generation {}: best={:.4}, mean={:.4}, diversity={:.1}",
                summary.generation, summary.best, summary.mean, summary.diversity
            );
        })
        .unwrap_or_else(|e| {
            eprintln!("Evolution failed: {}", e);
            std::process::exit(1);
        });

    println!();
    println!("Best fitness: {:.4}", result.best.fitness);
    println!("Best pattern:");
    print!("{}", result.best.genome);
    println!();
    println!(
        "Evaluations: {} in {:.2}s",
        result.stats.total_evaluations, result.stats.elapsed_seconds
    );
}

fn print_example_config() {
    let config = EvolutionConfig::default();
    println!("Example configuration (config.json):");
    println!("{}", serde_json::to_string_pretty(&config).unwrap());
}
