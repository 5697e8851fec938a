//! Evolution state and round-based selection.

use crate::config::{Config, MutatorSettings};
use crate::neural::{EvolutionIdAllocator, Network};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One member of the population: a network bound to an agent slot
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Individual {
    /// Agent this network drives
    pub agent_id: u32,
    pub network: Network,
    /// Carried unchanged into the next round
    pub survivor_from_last: bool,
    /// Fitness of the last evaluated round
    pub last_fitness: f32,
}

impl Individual {
    pub fn new(agent_id: u32, network: Network) -> Self {
        Self {
            agent_id,
            network,
            survivor_from_last: false,
            last_fitness: 0.0,
        }
    }
}

/// Owns the operator settings and every counter that must survive a restart.
///
/// No evolution state lives outside this struct, so restoring it (plus the
/// RNG seed) reproduces the same future.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Mutator {
    pub settings: MutatorSettings,
    /// Best fitness that advanced a generation
    pub max_fitness: f32,
    pub fitness_evolution_threshold: f32,
    pub current_generation: u64,
    pub evolution_ids: EvolutionIdAllocator,
}

/// What a call to [`Mutator::darwin`] did
#[derive(Clone, Debug, PartialEq)]
pub struct RoundOutcome {
    pub top_fitness: f32,
    pub generation_advanced: bool,
    pub generation: u64,
    /// Individuals whose network was replaced
    pub bred: usize,
}

impl Default for Mutator {
    fn default() -> Self {
        Self::new(MutatorSettings::default())
    }
}

impl Mutator {
    pub fn new(settings: MutatorSettings) -> Self {
        Self {
            settings,
            max_fitness: 0.0,
            fitness_evolution_threshold: 4.0,
            current_generation: 0,
            evolution_ids: EvolutionIdAllocator::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            fitness_evolution_threshold: config.selection.fitness_evolution_threshold,
            ..Self::new(config.mutator.clone())
        }
    }

    /// Rank the population and breed replacements for non-survivors.
    ///
    /// Individuals are reordered best first. When the best fitness beats the
    /// historical max by the threshold, a generation advances and the top
    /// `round_survivors` become the survivors. Otherwise survivor flags are
    /// left as they were, even though ranks may have shifted. Every
    /// non-survivor is then replaced by a mutated crossover of two networks
    /// drawn from the top `round_survivors` positions.
    pub fn darwin<F, R>(&mut self, individuals: &mut [Individual], fitness: F, rng: &mut R) -> RoundOutcome
    where
        F: Fn(&Individual) -> f32,
        R: Rng + ?Sized,
    {
        if individuals.is_empty() {
            return RoundOutcome {
                top_fitness: 0.0,
                generation_advanced: false,
                generation: self.current_generation,
                bred: 0,
            };
        }

        individuals.sort_by(|a, b| fitness(b).partial_cmp(&fitness(a)).unwrap_or(Ordering::Equal));

        let top_fitness = fitness(&individuals[0]);
        let survivors = self.settings.round_survivors.clamp(1, individuals.len());

        let generation_advanced = top_fitness >= self.max_fitness + self.fitness_evolution_threshold;
        if generation_advanced {
            log::info!(
                "entering generation {}: fitness {:.1} exceeds old max {:.1}",
                self.current_generation + 1,
                top_fitness,
                self.max_fitness
            );

            self.max_fitness = top_fitness;
            self.current_generation += 1;

            for (rank, individual) in individuals.iter_mut().enumerate() {
                individual.survivor_from_last = rank < survivors;
            }
        } else {
            log::info!(
                "did not enter new generation: fitness {:.1} does not exceed old max {:.1}",
                top_fitness,
                self.max_fitness
            );
        }

        let mut bred = 0;
        for i in 0..individuals.len() {
            if individuals[i].survivor_from_last {
                continue;
            }

            // self-pairing allowed
            let first = rng.gen_range(0..survivors);
            let second = rng.gen_range(0..survivors);

            let mut child = self.cross(&individuals[first].network, &individuals[second].network, rng);
            self.mutate(&mut child, rng);
            individuals[i].network = child;
            bred += 1;
        }

        log::debug!("bred {} individuals from {} survivors", bred, survivors);

        RoundOutcome {
            top_fitness,
            generation_advanced,
            generation: self.current_generation,
            bred,
        }
    }
}
