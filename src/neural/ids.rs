//! Identifiers for neurons and synapses.
//!
//! A [`NeuronId`] is a position inside one [`Network`](super::Network) and is
//! meaningless elsewhere. An [`EvolutionId`] is assigned once when a neuron is
//! born and travels with every copy of it, so two networks can agree on which
//! neurons are "the same gene".

use serde::{Deserialize, Serialize};
use std::fmt;

/// Evolution ids at or below this value belong to the fixed input/output slots.
pub const RESERVED_EVOLUTION_IDS: u32 = 10_000;

/// Lineage-stable neuron identity, compared by value across networks
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EvolutionId(pub u32);

impl fmt::Display for EvolutionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Index of a neuron within a single network
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NeuronId(pub usize);

/// Index of a synapse within a single network
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SynapseId(pub usize);

/// Monotonic source of fresh evolution ids.
///
/// Owned by the [`Mutator`](crate::evolution::Mutator) and only touched from
/// the single-threaded selection phase.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvolutionIdAllocator {
    /// Last id handed out
    current: u32,
}

impl Default for EvolutionIdAllocator {
    fn default() -> Self {
        Self {
            current: RESERVED_EVOLUTION_IDS,
        }
    }
}

impl EvolutionIdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out the next unused id. Ids are never reused.
    pub fn allocate(&mut self) -> EvolutionId {
        self.current = self
            .current
            .checked_add(1)
            .expect("evolution id space exhausted");
        EvolutionId(self.current)
    }

    /// The id the next call to [`allocate`](Self::allocate) will return
    pub fn peek_next(&self) -> EvolutionId {
        EvolutionId(self.current.saturating_add(1))
    }
}
