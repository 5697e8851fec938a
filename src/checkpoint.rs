//! Checkpoint system for saving and loading evolution state.

use crate::config::Config;
use crate::evolution::{Individual, Mutator};
use crate::stats::FitnessHistory;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

const MAGIC: &[u8; 4] = b"EVNT";

/// Complete evolution state for checkpointing
#[derive(Clone, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Version for compatibility checking
    pub version: u32,
    /// Rounds evaluated so far
    pub round: u64,
    /// Configuration
    pub config: Config,
    /// All individuals, including their networks
    pub individuals: Vec<Individual>,
    /// Operator settings, counters and evolution id allocator
    pub mutator: Mutator,
    /// Per-round statistics
    pub history: FitnessHistory,
    /// Seed the run was started with
    pub random_seed: u64,
    /// Generator state at the time of the snapshot
    pub rng: ChaCha8Rng,
}

impl Checkpoint {
    /// Current checkpoint version
    pub const VERSION: u32 = 2;

    pub fn new(
        round: u64,
        config: Config,
        individuals: Vec<Individual>,
        mutator: Mutator,
        history: FitnessHistory,
        random_seed: u64,
        rng: ChaCha8Rng,
    ) -> Self {
        Self {
            version: Self::VERSION,
            round,
            config,
            individuals,
            mutator,
            history,
            random_seed,
            rng,
        }
    }

    /// Save checkpoint to binary file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), CheckpointError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        writer.write_all(MAGIC)?;
        let encoded = bincode::serialize(self)?;
        writer.write_all(&encoded)?;
        writer.flush()?;

        Ok(())
    }

    /// Load checkpoint from binary file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CheckpointError> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);

        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;
        if &magic != MAGIC {
            return Err(CheckpointError::InvalidFormat("Invalid magic bytes".to_string()));
        }

        let mut buffer = Vec::new();
        reader.read_to_end(&mut buffer)?;
        let checkpoint: Checkpoint = bincode::deserialize(&buffer)?;

        if checkpoint.version != Self::VERSION {
            return Err(CheckpointError::VersionMismatch {
                expected: Self::VERSION,
                found: checkpoint.version,
            });
        }

        checkpoint.config.validate().map_err(CheckpointError::InvalidFormat)?;

        if let Some(bad) = checkpoint.individuals.iter().find(|i| !i.network.is_valid()) {
            return Err(CheckpointError::InvalidFormat(format!(
                "network of agent {} is structurally invalid",
                bad.agent_id
            )));
        }

        Ok(checkpoint)
    }

    /// Get approximate size in bytes
    pub fn size_bytes(&self) -> usize {
        bincode::serialized_size(self).unwrap_or(0) as usize
    }
}

/// Errors that can occur during checkpoint operations
#[derive(Debug)]
pub enum CheckpointError {
    Io(std::io::Error),
    Serialization(bincode::Error),
    InvalidFormat(String),
    VersionMismatch { expected: u32, found: u32 },
}

impl std::fmt::Display for CheckpointError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO error: {}", e),
            Self::Serialization(e) => write!(f, "Serialization error: {}", e),
            Self::InvalidFormat(msg) => write!(f, "Invalid format: {}", msg),
            Self::VersionMismatch { expected, found } => {
                write!(f, "Version mismatch: expected {}, found {}", expected, found)
            }
        }
    }
}

impl std::error::Error for CheckpointError {}

impl From<std::io::Error> for CheckpointError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<bincode::Error> for CheckpointError {
    fn from(e: bincode::Error) -> Self {
        Self::Serialization(e)
    }
}

/// Checkpoint manager for automatic saving
pub struct CheckpointManager {
    /// Base directory for checkpoints
    pub base_dir: String,
    /// Rounds between checkpoints
    pub interval: u64,
    /// Maximum checkpoints to keep
    pub max_checkpoints: usize,
    /// Round of the last checkpoint
    last_checkpoint: u64,
}

impl CheckpointManager {
    pub fn new(base_dir: String, interval: u64, max_checkpoints: usize) -> Self {
        if let Err(e) = std::fs::create_dir_all(&base_dir) {
            log::warn!("Could not create checkpoint directory {}: {}", base_dir, e);
        }

        Self {
            base_dir,
            interval,
            max_checkpoints,
            last_checkpoint: 0,
        }
    }

    /// Check if a checkpoint should be saved
    pub fn should_save(&self, round: u64) -> bool {
        round > 0 && round % self.interval == 0 && round != self.last_checkpoint
    }

    pub fn checkpoint_path(&self, round: u64) -> String {
        format!("{}/checkpoint_{:08}.bin", self.base_dir, round)
    }

    /// Save checkpoint and drop the oldest ones beyond the limit
    pub fn save(&mut self, checkpoint: &Checkpoint) -> Result<String, CheckpointError> {
        let path = self.checkpoint_path(checkpoint.round);
        checkpoint.save(&path)?;
        self.last_checkpoint = checkpoint.round;

        self.cleanup()?;

        Ok(path)
    }

    fn rotating_checkpoints(&self) -> std::io::Result<Vec<std::fs::DirEntry>> {
        Ok(std::fs::read_dir(&self.base_dir)?
            .filter_map(|entry| entry.ok())
            .filter(|entry| {
                let name = entry.file_name();
                let name = name.to_string_lossy();
                name.starts_with("checkpoint_") && name != "checkpoint_final.bin"
            })
            .collect())
    }

    fn cleanup(&self) -> Result<(), CheckpointError> {
        let mut checkpoints = self.rotating_checkpoints()?;

        if checkpoints.len() > self.max_checkpoints {
            // zero-padded round in the name sorts chronologically
            checkpoints.sort_by_key(|e| e.file_name());

            let to_remove = checkpoints.len() - self.max_checkpoints;
            for entry in checkpoints.into_iter().take(to_remove) {
                std::fs::remove_file(entry.path())?;
            }
        }

        Ok(())
    }

    /// Write the fitness history next to the checkpoints as `fitness.csv`
    pub fn save_history(&self, history: &FitnessHistory) -> Result<String, CheckpointError> {
        let path = format!("{}/fitness.csv", self.base_dir);
        history.save_csv(&path)?;
        Ok(path)
    }

    /// Find latest checkpoint in directory
    pub fn find_latest(&self) -> Option<String> {
        self.rotating_checkpoints()
            .ok()?
            .into_iter()
            .max_by_key(|e| e.file_name())
            .map(|e| e.path().to_string_lossy().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::neural::{NeuronId, Network};
    use crate::stats::RoundStats;
    use rand::{Rng, SeedableRng};

    fn create_test_checkpoint(round: u64) -> Checkpoint {
        let config = Config::default();
        let mut mutator = Mutator::from_config(&config);
        mutator.evolution_ids.allocate();
        mutator.current_generation = 4;

        let mut network = Network::fully_connected(3, 2);
        network.synapses[2].weight = 0.125;

        Checkpoint::new(
            round,
            config,
            vec![Individual::new(0, network)],
            mutator,
            FitnessHistory::new(),
            12345,
            ChaCha8Rng::seed_from_u64(12345),
        )
    }

    #[test]
    fn test_checkpoint_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test_checkpoint.bin");

        let checkpoint = create_test_checkpoint(1000);
        checkpoint.save(&path).unwrap();
        let loaded = Checkpoint::load(&path).unwrap();

        assert_eq!(loaded.round, checkpoint.round);
        assert_eq!(loaded.individuals, checkpoint.individuals);
        assert_eq!(loaded.mutator, checkpoint.mutator);
        assert_eq!(loaded.random_seed, checkpoint.random_seed);
    }

    #[test]
    fn test_rng_position_survives_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rng.bin");

        let mut checkpoint = create_test_checkpoint(3);
        for _ in 0..17 {
            checkpoint.rng.gen::<u64>();
        }
        checkpoint.save(&path).unwrap();
        let mut loaded = Checkpoint::load(&path).unwrap();

        let expected: Vec<u64> = (0..8).map(|_| checkpoint.rng.gen()).collect();
        let restored: Vec<u64> = (0..8).map(|_| loaded.rng.gen()).collect();
        assert_eq!(expected, restored);
    }

    #[test]
    fn test_rejects_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad_config.bin");

        let mut checkpoint = create_test_checkpoint(1);
        checkpoint.config.logging.stats_interval = 0;
        checkpoint.save(&path).unwrap();

        assert!(matches!(
            Checkpoint::load(&path),
            Err(CheckpointError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_rejects_bad_magic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.bin");
        std::fs::write(&path, b"NOPE and some more bytes").unwrap();

        assert!(matches!(
            Checkpoint::load(&path),
            Err(CheckpointError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_rejects_invalid_network() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.bin");

        let mut checkpoint = create_test_checkpoint(1);
        checkpoint.individuals[0].network.synapses[0].target = NeuronId(500);
        checkpoint.save(&path).unwrap();

        assert!(matches!(
            Checkpoint::load(&path),
            Err(CheckpointError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_checkpoint_size() {
        let checkpoint = create_test_checkpoint(1);
        let size = checkpoint.size_bytes();

        assert!(size > 0);
        assert!(size < 100_000);
    }

    #[test]
    fn test_manager_rotation() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().to_string_lossy().to_string();
        let mut manager = CheckpointManager::new(base, 10, 2);

        assert!(!manager.should_save(0));
        assert!(!manager.should_save(5));
        assert!(manager.should_save(10));

        for round in [10, 20, 30] {
            manager.save(&create_test_checkpoint(round)).unwrap();
        }
        assert!(!manager.should_save(30));

        let remaining = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(remaining, 2);
        assert_eq!(manager.find_latest(), Some(manager.checkpoint_path(30)));
    }

    #[test]
    fn test_history_written_beside_checkpoints() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().to_string_lossy().to_string();
        let mut manager = CheckpointManager::new(base, 10, 1);

        let mut history = FitnessHistory::new();
        for round in 0..3 {
            history.record(RoundStats {
                round,
                top_fitness: round as f32,
                ..RoundStats::default()
            });
        }

        let path = manager.save_history(&history).unwrap();
        manager.save(&create_test_checkpoint(10)).unwrap();
        manager.save(&create_test_checkpoint(20)).unwrap();

        // rotation never touches the history file
        let csv = std::fs::read_to_string(&path).unwrap();
        assert_eq!(csv.lines().count(), 4);
        assert_eq!(manager.find_latest(), Some(manager.checkpoint_path(20)));
    }
}
