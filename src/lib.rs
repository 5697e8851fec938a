//! # EVONET
//!
//! Neuroevolution engine for small, growable recurrent networks that drive
//! simulated agents.
//!
//! ## Features
//!
//! - **Growable**: hidden neurons are appended at runtime, each tagged with a
//!   lineage-stable evolution id
//! - **Recurrent**: one propagation step per tick, so any cycle simply adds a
//!   tick of latency
//! - **NEAT-style crossover**: genes are matched by identity, not position
//! - **Parallel**: rounds are evaluated on all CPU cores via Rayon
//! - **Reproducible**: seeded random number generation
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use evonet::{Config, Population};
//! use evonet::tasks::{SeekTask, INPUTS, OUTPUTS};
//!
//! let config = Config::default();
//! let task = SeekTask::new(&config.task);
//! let mut population = Population::new(config, INPUTS, OUTPUTS);
//!
//! population.run(&task, 50);
//!
//! println!("Generation: {}", population.generation());
//! println!("Best fitness: {:.2}", population.best_fitness());
//! ```
//!
//! ## Driving a network by hand
//!
//! ```rust
//! use evonet::neural::{Network, NeuronId};
//!
//! let mut net = Network::new(2, 1);
//! net.create_synapse(NeuronId(0), NeuronId(2)).weight = 0.5;
//!
//! net.set_inputs(&[1.0, 0.0]);
//! net.update();
//! net.update();
//!
//! let mut out = [0.0];
//! net.read_outputs(&mut out);
//! assert!((out[0] - 0.6225).abs() < 1e-3);
//! ```

pub mod checkpoint;
pub mod config;
pub mod environment;
pub mod evolution;
pub mod neural;
pub mod population;
pub mod stats;
pub mod tasks;

// Re-export main types
pub use config::{Config, MutatorSettings};
pub use environment::Environment;
pub use evolution::{Individual, Mutator, RoundOutcome};
pub use population::Population;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run a quick benchmark on the built-in seek task
pub fn benchmark(rounds: u64, population_size: usize) -> BenchmarkResult {
    use std::time::Instant;

    let mut config = Config::default();
    config.population.size = population_size;
    config.mutator.round_survivors = config.mutator.round_survivors.min(population_size).max(1);

    let task = tasks::SeekTask::new(&config.task);
    let mut population = Population::new_with_seed(config, tasks::INPUTS, tasks::OUTPUTS, 42);

    let start = Instant::now();
    population.run(&task, rounds);
    let elapsed = start.elapsed();

    let max_hidden_neurons = population
        .individuals
        .iter()
        .map(|i| i.network.hidden_count())
        .max()
        .unwrap_or(0);

    BenchmarkResult {
        rounds,
        population: population_size,
        elapsed_secs: elapsed.as_secs_f64(),
        rounds_per_second: rounds as f64 / elapsed.as_secs_f64(),
        generation: population.generation(),
        best_fitness: population.best_fitness(),
        max_hidden_neurons,
    }
}

/// Benchmark result
#[derive(Debug, Clone)]
pub struct BenchmarkResult {
    pub rounds: u64,
    pub population: usize,
    pub elapsed_secs: f64,
    pub rounds_per_second: f64,
    pub generation: u64,
    pub best_fitness: f32,
    pub max_hidden_neurons: usize,
}

impl std::fmt::Display for BenchmarkResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Benchmark Results ===")?;
        writeln!(f, "Rounds: {}", self.rounds)?;
        writeln!(f, "Population: {}", self.population)?;
        writeln!(f, "Time: {:.3}s", self.elapsed_secs)?;
        writeln!(f, "Speed: {:.2} rounds/s", self.rounds_per_second)?;
        writeln!(f, "Generation: {}", self.generation)?;
        writeln!(f, "Best fitness: {:.2}", self.best_fitness)?;
        writeln!(f, "Max hidden neurons: {}", self.max_hidden_neurons)?;
        Ok(())
    }
}
