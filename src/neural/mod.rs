//! Growable recurrent networks and the operators that evolve them.
//!
//! - Arena of neurons addressed by [`NeuronId`], with lineage-stable [`EvolutionId`]s
//! - Flat synapse list, single-step two-pass propagation
//! - Parameter and structural mutations
//! - Identity-matched crossover with conditional hybridization

mod activation;
mod crossover;
mod ids;
mod mutations;
mod network;
mod neuron;

pub use activation::ActivationMethod;
pub use crossover::divergence_factor;
pub use ids::{EvolutionId, EvolutionIdAllocator, NeuronId, SynapseId, RESERVED_EVOLUTION_IDS};
pub use network::{Layer, Network, NeuronPosition};
pub use neuron::{Neuron, Synapse};
