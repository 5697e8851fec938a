//! Neurons and synapses.

use super::activation::ActivationMethod;
use super::ids::{EvolutionId, NeuronId};
use serde::{Deserialize, Serialize};

/// A single neuron.
///
/// Only the genetic part (`evolution_id`, `bias`, `activation_method`) is
/// persisted. `value` and `partial_activation` are runtime state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Neuron {
    pub evolution_id: EvolutionId,
    pub bias: f32,
    pub activation_method: ActivationMethod,
    /// Output of the last compute pass
    #[serde(skip)]
    pub value: f32,
    /// Accumulator consumed by the next compute pass
    #[serde(skip)]
    pub partial_activation: f32,
}

impl Neuron {
    pub fn new(evolution_id: EvolutionId) -> Self {
        Self {
            evolution_id,
            bias: 0.0,
            activation_method: ActivationMethod::default(),
            value: 0.0,
            partial_activation: 0.0,
        }
    }

    /// Copy of the genetic part with cleared runtime state
    pub fn clone_gene(&self) -> Self {
        Self {
            value: 0.0,
            partial_activation: 0.0,
            ..self.clone()
        }
    }

    #[inline]
    pub fn compute_value(&mut self) {
        self.value = self.activation_method.apply(self.partial_activation + self.bias);
    }
}

/// Weighted, directed connection between two neurons of the same network
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Synapse {
    pub source: NeuronId,
    pub target: NeuronId,
    pub weight: f32,
}

impl Synapse {
    pub fn new(source: NeuronId, target: NeuronId) -> Self {
        Self {
            source,
            target,
            weight: 0.0,
        }
    }

    #[inline]
    pub fn connects(&self, source: NeuronId, target: NeuronId) -> bool {
        self.source == source && self.target == target
    }
}
