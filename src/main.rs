//! EVONET - CLI Entry Point
//!
//! Evolves seek-task controllers and inspects saved populations.

use clap::{Parser, Subcommand};
use evonet::checkpoint::{Checkpoint, CheckpointManager};
use evonet::tasks::{SeekTask, INPUTS, OUTPUTS};
use evonet::{benchmark, Config, Population};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "evonet")]
#[command(version)]
#[command(about = "Neuroevolution of growable recurrent networks")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a new evolution
    Run {
        /// Configuration file (YAML)
        #[arg(short, long, default_value = "config.yaml")]
        config: PathBuf,

        /// Number of rounds to evaluate
        #[arg(short, long, default_value = "200")]
        rounds: u64,

        /// Output directory for checkpoints
        #[arg(short, long, default_value = "output")]
        output: PathBuf,

        /// Random seed for reproducibility
        #[arg(long)]
        seed: Option<u64>,

        /// Quiet mode (minimal output)
        #[arg(short, long)]
        quiet: bool,
    },

    /// Resume evolution from checkpoint
    Resume {
        /// Checkpoint file to resume from
        #[arg(short, long)]
        checkpoint: PathBuf,

        /// Number of additional rounds
        #[arg(short, long, default_value = "200")]
        rounds: u64,

        /// Output directory
        #[arg(short, long, default_value = "output")]
        output: PathBuf,
    },

    /// Run performance benchmark
    Benchmark {
        /// Number of rounds
        #[arg(short, long, default_value = "20")]
        rounds: u64,

        /// Population size
        #[arg(short, long, default_value = "200")]
        population: usize,
    },

    /// Generate default configuration file
    Init {
        /// Output path
        #[arg(short, long, default_value = "config.yaml")]
        output: PathBuf,
    },

    /// Analyze a checkpoint file
    Analyze {
        /// Checkpoint file
        checkpoint: PathBuf,

        /// Print the network of the individual at this rank as graphviz
        #[arg(long)]
        dot: Option<usize>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            rounds,
            output,
            seed,
            quiet,
        } => run_evolution(config, rounds, output, seed, quiet),

        Commands::Resume {
            checkpoint,
            rounds,
            output,
        } => resume_evolution(checkpoint, rounds, output),

        Commands::Benchmark { rounds, population } => {
            init_logging("warn");
            run_benchmark(rounds, population)
        }

        Commands::Init { output } => generate_config(output),

        Commands::Analyze { checkpoint, dot } => analyze_checkpoint(checkpoint, dot),
    }
}

/// RUST_LOG overrides the given default level
fn init_logging(default_level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();
}

fn run_evolution(
    config_path: PathBuf,
    rounds: u64,
    output: PathBuf,
    seed: Option<u64>,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = if config_path.exists() {
        println!("Loading config from: {:?}", config_path);
        Config::from_file(&config_path)?
    } else {
        println!("Using default configuration");
        Config::default()
    };
    if seed.is_some() {
        config.population.seed = seed;
    }
    config.validate()?;
    init_logging(if quiet { "warn" } else { &config.logging.log_level });

    std::fs::create_dir_all(&output)?;

    let task = SeekTask::new(&config.task);
    let mut population = Population::new(config.clone(), INPUTS, OUTPUTS);

    println!("Starting evolution");
    println!("  Population: {}", population.size());
    println!("  Seed: {}", population.seed());
    println!("  Ticks per round: {}", config.task.ticks_per_round);
    println!("  Rounds: {}", rounds);
    println!();

    let mut checkpoint_mgr = CheckpointManager::new(
        output.to_string_lossy().to_string(),
        config.logging.checkpoint_interval,
        10, // Keep last 10 checkpoints
    );

    let start = Instant::now();
    for _ in 0..rounds {
        population.run_round(&task);

        if checkpoint_mgr.should_save(population.round) {
            match checkpoint_mgr.save(&population.create_checkpoint()) {
                Ok(path) => {
                    if !quiet {
                        println!("  Checkpoint saved: {}", path);
                    }
                }
                Err(e) => eprintln!("  Checkpoint error: {}", e),
            }
            if let Err(e) = checkpoint_mgr.save_history(&population.history) {
                eprintln!("  Fitness history error: {}", e);
            }
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("=== Evolution Complete ===");
    println!("Time: {:.2}s", elapsed.as_secs_f64());
    println!("Rounds: {}", population.round);
    println!("Speed: {:.2} rounds/s", rounds as f64 / elapsed.as_secs_f64());
    println!("Generation: {}", population.generation());
    println!("Max fitness: {:.2}", population.mutator.max_fitness);

    save_outputs(&population, &output)
}

fn resume_evolution(
    checkpoint_path: PathBuf,
    rounds: u64,
    output: PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Loading checkpoint: {:?}", checkpoint_path);

    let checkpoint = Checkpoint::load(&checkpoint_path)?;
    let mut population = Population::from_checkpoint(checkpoint);
    init_logging(&population.config.logging.log_level);
    let task = SeekTask::new(&population.config.task);

    println!("Resumed at round {}", population.round);
    println!("Generation: {}", population.generation());
    println!("Running {} additional rounds", rounds);
    println!();

    std::fs::create_dir_all(&output)?;

    let mut checkpoint_mgr = CheckpointManager::new(
        output.to_string_lossy().to_string(),
        population.config.logging.checkpoint_interval,
        10,
    );

    let start = Instant::now();
    for _ in 0..rounds {
        population.run_round(&task);

        if checkpoint_mgr.should_save(population.round) {
            if let Ok(path) = checkpoint_mgr.save(&population.create_checkpoint()) {
                println!("  Checkpoint: {}", path);
            }
            if let Err(e) = checkpoint_mgr.save_history(&population.history) {
                eprintln!("  Fitness history error: {}", e);
            }
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("=== Resume Complete ===");
    println!("Time: {:.2}s", elapsed.as_secs_f64());
    println!("Final round: {}", population.round);
    println!("Generation: {}", population.generation());

    save_outputs(&population, &output)
}

fn save_outputs(population: &Population, output: &std::path::Path) -> Result<(), Box<dyn std::error::Error>> {
    let final_path = output.join("checkpoint_final.bin");
    population.create_checkpoint().save(&final_path)?;
    println!("Final checkpoint: {:?}", final_path);

    let history_path = output.join("fitness_history.json");
    population.history.save(&history_path.to_string_lossy())?;
    let csv_path = output.join("fitness.csv");
    population.history.save_csv(&csv_path.to_string_lossy())?;
    println!("Fitness history: {:?}, {:?}", history_path, csv_path);

    Ok(())
}

fn run_benchmark(rounds: u64, population: usize) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== EVONET Benchmark ===");
    println!("Rounds: {}", rounds);
    println!("Population: {}", population);
    println!();

    let result = benchmark(rounds, population);
    println!("{}", result);

    Ok(())
}

fn generate_config(output: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::default();
    config.save(&output)?;
    println!("Configuration saved to: {:?}", output);
    Ok(())
}

fn analyze_checkpoint(checkpoint_path: PathBuf, dot: Option<usize>) -> Result<(), Box<dyn std::error::Error>> {
    let checkpoint = Checkpoint::load(&checkpoint_path)?;

    if let Some(rank) = dot {
        let individual = checkpoint
            .individuals
            .get(rank)
            .ok_or_else(|| format!("no individual at rank {}", rank))?;
        print!("{}", individual.network.to_dot());
        return Ok(());
    }

    println!("=== Checkpoint Analysis ===");
    println!("File: {:?}", checkpoint_path);
    println!();

    let individuals = &checkpoint.individuals;
    println!("Round: {}", checkpoint.round);
    println!("Generation: {}", checkpoint.mutator.current_generation);
    println!("Max fitness: {:.2}", checkpoint.mutator.max_fitness);
    println!("Next evolution id: {}", checkpoint.mutator.evolution_ids.peek_next());
    println!("Population: {}", individuals.len());
    println!(
        "Survivors: {}",
        individuals.iter().filter(|i| i.survivor_from_last).count()
    );

    if !individuals.is_empty() {
        let n = individuals.len() as f32;
        let avg_hidden: f32 = individuals.iter().map(|i| i.network.hidden_count() as f32).sum::<f32>() / n;
        let max_hidden = individuals.iter().map(|i| i.network.hidden_count()).max().unwrap_or(0);
        let avg_synapses: f32 = individuals.iter().map(|i| i.network.synapse_count() as f32).sum::<f32>() / n;

        println!();
        println!("Average hidden neurons: {:.2}", avg_hidden);
        println!("Max hidden neurons: {}", max_hidden);
        println!("Average synapses: {:.1}", avg_synapses);

        // Activation usage across all neurons
        use evonet::neural::ActivationMethod;
        use std::collections::HashMap;
        let mut activations: HashMap<ActivationMethod, usize> = HashMap::new();
        for individual in individuals {
            for neuron in &individual.network.neurons {
                *activations.entry(neuron.activation_method).or_insert(0) += 1;
            }
        }
        println!();
        for method in ActivationMethod::ALL {
            println!("{:>8}: {}", method, activations.get(&method).copied().unwrap_or(0));
        }
    }

    println!();
    println!(
        "Checkpoint size: {:.2} MB",
        checkpoint.size_bytes() as f64 / 1_000_000.0
    );

    Ok(())
}
