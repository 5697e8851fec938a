//! Population driver - evaluation rounds and selection.

use crate::checkpoint::Checkpoint;
use crate::config::Config;
use crate::environment::Environment;
use crate::evolution::{Individual, Mutator, RoundOutcome};
use crate::neural::Network;
use crate::stats::{FitnessHistory, RoundStats};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

/// A population of networks evolving against an environment
pub struct Population {
    pub individuals: Vec<Individual>,
    pub mutator: Mutator,
    pub config: Config,

    /// Rounds evaluated so far
    pub round: u64,
    pub history: FitnessHistory,

    // Random number generator (seeded for reproducibility)
    rng: ChaCha8Rng,
    seed: u64,
}

impl Population {
    /// Create a population with the given configuration and network shape
    pub fn new(config: Config, input_count: usize, output_count: usize) -> Self {
        let seed = config.population.seed.unwrap_or_else(|| rand::thread_rng().gen());
        Self::new_with_seed(config, input_count, output_count, seed)
    }

    /// Create a population with a specific seed for reproducibility
    pub fn new_with_seed(config: Config, input_count: usize, output_count: usize, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mutator = Mutator::from_config(&config);

        let individuals = (0..config.population.size as u32)
            .map(|agent_id| {
                let mut network = Network::fully_connected(input_count, output_count);
                mutator.randomize_network(&mut network, &mut rng);
                Individual::new(agent_id, network)
            })
            .collect();

        log::info!(
            "Population created: size={}, inputs={}, outputs={}, seed={}",
            config.population.size,
            input_count,
            output_count,
            seed
        );

        Self {
            individuals,
            mutator,
            config,
            round: 0,
            history: FitnessHistory::new(),
            rng,
            seed,
        }
    }

    /// Restore a population from a checkpoint.
    ///
    /// The generator resumes from its saved position, so the restored
    /// population evolves exactly as the uninterrupted one would have.
    pub fn from_checkpoint(checkpoint: Checkpoint) -> Self {
        Self {
            individuals: checkpoint.individuals,
            mutator: checkpoint.mutator,
            config: checkpoint.config,
            round: checkpoint.round,
            history: checkpoint.history,
            rng: checkpoint.rng,
            seed: checkpoint.random_seed,
        }
    }

    pub fn create_checkpoint(&self) -> Checkpoint {
        Checkpoint::new(
            self.round,
            self.config.clone(),
            self.individuals.clone(),
            self.mutator.clone(),
            self.history.clone(),
            self.seed,
            self.rng.clone(),
        )
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn size(&self) -> usize {
        self.individuals.len()
    }

    /// Evaluate every individual for one round.
    ///
    /// Individuals run in parallel, one task each. No randomness is drawn
    /// here, so results do not depend on thread scheduling.
    pub fn evaluate<E: Environment>(&mut self, env: &E) {
        let ticks = self.config.task.ticks_per_round;
        let (n_in, n_out) = (env.input_count(), env.output_count());

        self.individuals.par_iter_mut().for_each(|individual| {
            let network = &mut individual.network;
            debug_assert_eq!(network.input_count(), n_in);
            debug_assert_eq!(network.output_count(), n_out);

            network.reset_values();
            let mut agent = env.spawn(individual.agent_id);
            let mut inputs = vec![0.0; n_in];
            let mut outputs = vec![0.0; n_out];

            for _ in 0..ticks {
                if env.is_done(&agent) {
                    break;
                }
                env.sense(&agent, &mut inputs);
                network.set_inputs(&inputs);
                network.update();
                network.read_outputs(&mut outputs);
                env.act(&mut agent, &outputs);
            }

            individual.last_fitness = env.fitness(&agent);
        });
    }

    /// Run selection on the fitness of the last evaluation
    pub fn evolve(&mut self) -> RoundOutcome {
        let outcome = self
            .mutator
            .darwin(&mut self.individuals, |i| i.last_fitness, &mut self.rng);

        let stats = RoundStats::collect(self.round, &self.individuals, &self.mutator);
        if self.round % self.config.logging.stats_interval == 0 {
            log::info!("{}", stats.summary());
        }
        self.history.record(stats);
        self.round += 1;

        outcome
    }

    /// Evaluate then select
    pub fn run_round<E: Environment>(&mut self, env: &E) -> RoundOutcome {
        self.evaluate(env);
        self.evolve()
    }

    /// Run multiple rounds
    pub fn run<E: Environment>(&mut self, env: &E, rounds: u64) {
        for _ in 0..rounds {
            self.run_round(env);
        }
    }

    /// Best fitness of the last evaluated round
    pub fn best_fitness(&self) -> f32 {
        self.individuals
            .iter()
            .map(|i| i.last_fitness)
            .fold(f32::NEG_INFINITY, f32::max)
    }

    pub fn generation(&self) -> u64 {
        self.mutator.current_generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::{SeekTask, INPUTS, OUTPUTS};

    fn test_config() -> Config {
        let mut config = Config::default();
        config.population.size = 12;
        config.mutator.round_survivors = 4;
        config.task.ticks_per_round = 120;
        config
    }

    #[test]
    fn test_new_population() {
        let population = Population::new_with_seed(test_config(), INPUTS, OUTPUTS, 1);

        assert_eq!(population.size(), 12);
        assert_eq!(population.seed(), 1);
        for (i, individual) in population.individuals.iter().enumerate() {
            assert_eq!(individual.agent_id, i as u32);
            assert_eq!(individual.network.synapse_count(), INPUTS * OUTPUTS);
            assert!(!individual.survivor_from_last);
        }
    }

    #[test]
    fn test_config_seed_is_used() {
        let mut config = test_config();
        config.population.seed = Some(77);
        let population = Population::new(config, INPUTS, OUTPUTS);
        assert_eq!(population.seed(), 77);
    }

    #[test]
    fn test_evaluate_sets_fitness() {
        let config = test_config();
        let task = SeekTask::new(&config.task);
        let mut population = Population::new_with_seed(config, INPUTS, OUTPUTS, 2);

        population.evaluate(&task);

        assert!(population.individuals.iter().all(|i| i.last_fitness >= 0.0));
        assert!(population.individuals.iter().all(|i| i.last_fitness.is_finite()));
    }

    #[test]
    fn test_evaluation_is_repeatable() {
        let config = test_config();
        let task = SeekTask::new(&config.task);
        let mut population = Population::new_with_seed(config, INPUTS, OUTPUTS, 3);

        population.evaluate(&task);
        let first: Vec<f32> = population.individuals.iter().map(|i| i.last_fitness).collect();
        population.evaluate(&task);
        let second: Vec<f32> = population.individuals.iter().map(|i| i.last_fitness).collect();

        assert_eq!(first, second);
    }

    #[test]
    fn test_run_rounds() {
        let config = test_config();
        let task = SeekTask::new(&config.task);
        let mut population = Population::new_with_seed(config, INPUTS, OUTPUTS, 4);

        population.run(&task, 5);

        assert_eq!(population.round, 5);
        assert_eq!(population.history.snapshots.len(), 5);
        assert_eq!(population.size(), 12);
        assert!(population.individuals.iter().all(|i| i.network.is_valid()));
    }
}
