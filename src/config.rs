//! Configuration system for evolution runs.
//!
//! Supports YAML configuration files with sensible defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub population: PopulationConfig,
    #[serde(default)]
    pub mutator: MutatorSettings,
    #[serde(default)]
    pub selection: SelectionConfig,
    #[serde(default)]
    pub task: TaskConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Population configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulationConfig {
    /// Number of individuals, constant for the whole run
    pub size: usize,
    /// Random seed (random if absent)
    pub seed: Option<u64>,
}

/// Tunable knobs of the mutation, crossover and selection operators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MutatorSettings {
    /// Std dev of the initial bias draw
    pub bias_initial_std_dev: f32,
    /// Std dev of a soft bias step
    pub bias_mutation_factor: f32,
    /// Chance to keep performing soft bias steps
    pub bias_mutation_chance: f32,
    /// Std dev of a hard bias step
    pub bias_hard_mutation_factor: f32,
    /// Chance to keep performing hard bias steps
    pub bias_hard_mutation_chance: f32,

    /// Std dev of the initial weight draw
    pub weight_initial_std_dev: f32,
    /// Std dev of a soft weight step
    pub weight_mutation_factor: f32,
    /// Chance to keep performing soft weight steps
    pub weight_mutation_chance: f32,
    /// Std dev of a hard weight step
    pub weight_hard_mutation_factor: f32,
    /// Chance to keep performing hard weight steps
    pub weight_hard_mutation_chance: f32,

    /// Chance to keep reassigning activation methods
    pub activation_mutation_chance: f32,

    /// Chance to keep creating neurons
    pub neuron_creation_chance: f32,
    /// Upper bound of extra synapses drawn for a new neuron
    pub max_extra_synapses: u32,

    /// Share of the child's synapses that try to import a weight
    pub max_imported_synapses_factor: f32,
    /// Chance to attempt hybridization on a crossover
    pub hybridization_chance: f32,
    /// Hybridization is skipped above this divergence
    pub max_hybridization_divergence_factor: f32,

    /// Individuals kept unchanged when a generation advances
    pub round_survivors: usize,
}

/// Generation advancement configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Best fitness must beat the historical max by this much to advance
    pub fitness_evolution_threshold: f32,
}

/// Built-in seek task configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskConfig {
    /// Network updates per evaluation round
    pub ticks_per_round: u32,
    /// Targets on the ring
    pub checkpoint_count: usize,
    /// Ring radius
    pub arena_radius: f32,
}

/// Logging and checkpoint configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Rounds between checkpoints
    pub checkpoint_interval: u64,
    /// Rounds between stats logging
    pub stats_interval: u64,
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            size: 100,
            seed: None,
        }
    }
}

impl Default for MutatorSettings {
    fn default() -> Self {
        Self {
            bias_initial_std_dev: 0.05,
            bias_mutation_factor: 0.07,
            bias_mutation_chance: 0.7,
            bias_hard_mutation_factor: 0.2,
            bias_hard_mutation_chance: 0.2,

            weight_initial_std_dev: 0.05,
            weight_mutation_factor: 0.07,
            weight_mutation_chance: 0.7,
            weight_hard_mutation_factor: 0.2,
            weight_hard_mutation_chance: 0.2,

            activation_mutation_chance: 0.3,

            neuron_creation_chance: 0.1,
            max_extra_synapses: 10,

            max_imported_synapses_factor: 0.2,
            hybridization_chance: 0.2,
            max_hybridization_divergence_factor: 2.0,

            round_survivors: 20,
        }
    }
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            fitness_evolution_threshold: 4.0,
        }
    }
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            ticks_per_round: 600,
            checkpoint_count: 6,
            arena_radius: 50.0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            checkpoint_interval: 50,
            stats_interval: 1,
            log_level: "info".to_string(),
        }
    }
}

impl MutatorSettings {
    /// Reject values that would make an operator misbehave.
    ///
    /// The mutation loops repeat while a coin flip succeeds, so their chances
    /// must stay strictly below 1.
    pub fn validate(&self) -> Result<(), String> {
        let loop_chances = [
            ("bias_mutation_chance", self.bias_mutation_chance),
            ("bias_hard_mutation_chance", self.bias_hard_mutation_chance),
            ("weight_mutation_chance", self.weight_mutation_chance),
            ("weight_hard_mutation_chance", self.weight_hard_mutation_chance),
            ("activation_mutation_chance", self.activation_mutation_chance),
            ("neuron_creation_chance", self.neuron_creation_chance),
        ];
        for (name, chance) in loop_chances {
            if !(0.0..1.0).contains(&chance) {
                return Err(format!("{} must be in [0, 1), got {}", name, chance));
            }
        }

        if !(0.0..=1.0).contains(&self.hybridization_chance) {
            return Err(format!(
                "hybridization_chance must be in [0, 1], got {}",
                self.hybridization_chance
            ));
        }

        let magnitudes = [
            ("bias_initial_std_dev", self.bias_initial_std_dev),
            ("bias_mutation_factor", self.bias_mutation_factor),
            ("bias_hard_mutation_factor", self.bias_hard_mutation_factor),
            ("weight_initial_std_dev", self.weight_initial_std_dev),
            ("weight_mutation_factor", self.weight_mutation_factor),
            ("weight_hard_mutation_factor", self.weight_hard_mutation_factor),
            ("max_imported_synapses_factor", self.max_imported_synapses_factor),
            (
                "max_hybridization_divergence_factor",
                self.max_hybridization_divergence_factor,
            ),
        ];
        for (name, value) in magnitudes {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{} must be finite and >= 0, got {}", name, value));
            }
        }

        if self.round_survivors == 0 {
            return Err("round_survivors must be > 0".to_string());
        }

        Ok(())
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        self.mutator.validate()?;

        if self.population.size == 0 {
            return Err("population size must be > 0".to_string());
        }
        if self.mutator.round_survivors > self.population.size {
            return Err("round_survivors cannot exceed population size".to_string());
        }
        if !self.selection.fitness_evolution_threshold.is_finite() {
            return Err("fitness_evolution_threshold must be finite".to_string());
        }
        if self.task.checkpoint_count == 0 {
            return Err("checkpoint_count must be > 0".to_string());
        }
        if self.task.arena_radius <= 0.0 {
            return Err("arena_radius must be > 0".to_string());
        }
        if self.logging.checkpoint_interval == 0 || self.logging.stats_interval == 0 {
            return Err("logging intervals must be > 0".to_string());
        }
        Ok(())
    }
}
