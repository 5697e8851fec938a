//! Statistics tracking across evaluation rounds.

use crate::evolution::{Individual, Mutator};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Statistics snapshot for one round
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RoundStats {
    /// Round index (0-based)
    pub round: u64,
    /// Generation after selection
    pub generation: u64,
    /// Best fitness this round
    pub top_fitness: f32,
    /// Mean fitness this round
    pub mean_fitness: f32,
    /// Historical max that advanced a generation
    pub max_fitness: f32,
    /// Individuals flagged survivor
    pub survivors: usize,
    /// Mean hidden neurons per network
    pub mean_hidden_neurons: f32,
    /// Largest hidden region
    pub max_hidden_neurons: usize,
    /// Mean synapses per network
    pub mean_synapses: f32,
}

impl RoundStats {
    /// Compute stats from the population as ranked by the last selection
    pub fn collect(round: u64, individuals: &[Individual], mutator: &Mutator) -> Self {
        let mut stats = Self {
            round,
            generation: mutator.current_generation,
            max_fitness: mutator.max_fitness,
            ..Self::default()
        };

        if individuals.is_empty() {
            return stats;
        }

        let n = individuals.len() as f32;
        stats.top_fitness = individuals
            .iter()
            .map(|i| i.last_fitness)
            .fold(f32::NEG_INFINITY, f32::max);
        stats.mean_fitness = individuals.iter().map(|i| i.last_fitness).sum::<f32>() / n;
        stats.survivors = individuals.iter().filter(|i| i.survivor_from_last).count();
        stats.mean_hidden_neurons =
            individuals.iter().map(|i| i.network.hidden_count() as f32).sum::<f32>() / n;
        stats.max_hidden_neurons = individuals
            .iter()
            .map(|i| i.network.hidden_count())
            .max()
            .unwrap_or(0);
        stats.mean_synapses =
            individuals.iter().map(|i| i.network.synapse_count() as f32).sum::<f32>() / n;

        stats
    }

    /// Generate summary string
    pub fn summary(&self) -> String {
        format!(
            "Round {:>5} | Gen {:>4} | Top {:>7.2} | Mean {:>7.2} | Max {:>7.2} | Hidden {:.1}/{} | Synapses {:.1}",
            self.round,
            self.generation,
            self.top_fitness,
            self.mean_fitness,
            self.max_fitness,
            self.mean_hidden_neurons,
            self.max_hidden_neurons,
            self.mean_synapses
        )
    }
}

/// History of round statistics
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FitnessHistory {
    pub snapshots: Vec<RoundStats>,
}

impl FitnessHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, stats: RoundStats) {
        self.snapshots.push(stats);
    }

    pub fn latest(&self) -> Option<&RoundStats> {
        self.snapshots.last()
    }

    /// Best fitness per round
    pub fn top_fitness_series(&self) -> Vec<(u64, f32)> {
        self.snapshots
            .iter()
            .map(|s| (s.round, s.top_fitness))
            .collect()
    }

    /// Rounds at which a generation advanced
    pub fn generation_series(&self) -> Vec<(u64, u64)> {
        self.snapshots
            .iter()
            .map(|s| (s.round, s.generation))
            .collect()
    }

    /// Save to JSON file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let json = serde_json::to_string(self)?;
        std::fs::write(path, json)
    }

    /// Load from JSON file
    pub fn load(path: &str) -> std::io::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    /// Render as CSV with a header row
    pub fn to_csv(&self) -> String {
        let mut csv = String::from(
            "round,generation,top_fitness,mean_fitness,max_fitness,survivors,mean_hidden_neurons,max_hidden_neurons,mean_synapses\n",
        );
        for s in &self.snapshots {
            let _ = writeln!(
                csv,
                "{},{},{},{},{},{},{},{},{}",
                s.round,
                s.generation,
                s.top_fitness,
                s.mean_fitness,
                s.max_fitness,
                s.survivors,
                s.mean_hidden_neurons,
                s.max_hidden_neurons,
                s.mean_synapses
            );
        }
        csv
    }

    pub fn save_csv(&self, path: &str) -> std::io::Result<()> {
        std::fs::write(path, self.to_csv())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::neural::Network;

    fn population() -> Vec<Individual> {
        (0..4)
            .map(|i| {
                let mut individual = Individual::new(i, Network::fully_connected(2, 2));
                individual.last_fitness = i as f32 * 2.0;
                individual.survivor_from_last = i < 2;
                individual
            })
            .collect()
    }

    #[test]
    fn test_round_stats() {
        let mut mutator = Mutator::default();
        mutator.current_generation = 3;
        mutator.max_fitness = 6.0;

        let stats = RoundStats::collect(9, &population(), &mutator);

        assert_eq!(stats.round, 9);
        assert_eq!(stats.generation, 3);
        assert_eq!(stats.top_fitness, 6.0);
        assert_eq!(stats.mean_fitness, 3.0);
        assert_eq!(stats.survivors, 2);
        assert_eq!(stats.mean_synapses, 4.0);
        assert_eq!(stats.max_hidden_neurons, 0);
        assert!(stats.summary().contains("Gen    3"));
    }

    #[test]
    fn test_history() {
        let mutator = Mutator::default();
        let mut history = FitnessHistory::new();
        for round in 0..3 {
            history.record(RoundStats::collect(round, &population(), &mutator));
        }

        assert_eq!(history.snapshots.len(), 3);
        assert_eq!(history.latest().map(|s| s.round), Some(2));
        assert_eq!(history.top_fitness_series()[1], (1, 6.0));

        let csv = history.to_csv();
        assert_eq!(csv.lines().count(), 4);
        assert!(csv.starts_with("round,generation"));
    }

    #[test]
    fn test_history_json_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        let path = path.to_str().unwrap();

        let mut history = FitnessHistory::new();
        history.record(RoundStats::collect(0, &population(), &Mutator::default()));
        history.save(path).unwrap();

        assert_eq!(FitnessHistory::load(path).unwrap(), history);
    }
}
