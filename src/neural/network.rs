//! Network structure and forward propagation.

use super::ids::{EvolutionId, NeuronId, SynapseId, RESERVED_EVOLUTION_IDS};
use super::neuron::{Neuron, Synapse};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Region of the neuron arena a neuron lives in
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Layer {
    Input,
    Hidden,
    Output,
}

/// Layer and index within that layer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NeuronPosition {
    pub layer: Layer,
    pub index: usize,
}

/// Recurrent network with a growable hidden region.
///
/// Neurons are laid out as `[inputs | outputs | hidden]`. Inputs and outputs
/// are fixed at construction; hidden neurons are only ever appended.
/// Synapses live in one flat list and refer to neurons by [`NeuronId`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Network {
    input_count: usize,
    output_count: usize,
    pub neurons: Vec<Neuron>,
    pub synapses: Vec<Synapse>,
}

impl Network {
    /// Create the fixed input and output neurons, without synapses.
    ///
    /// Slot `i` gets evolution id `i + 1`, so the same sensor or actuator
    /// carries the same identity in every network of a population.
    ///
    /// Panics unless there is at least one input and one output: growth
    /// always wires a new neuron to both layers.
    pub fn new(input_count: usize, output_count: usize) -> Self {
        assert!(
            input_count > 0 && output_count > 0,
            "a network needs at least one input and one output, got {} inputs and {} outputs",
            input_count,
            output_count
        );
        let fixed = input_count + output_count;
        assert!(
            fixed < RESERVED_EVOLUTION_IDS as usize,
            "{} fixed neurons overflow the reserved evolution id block",
            fixed
        );

        let neurons = (1..=fixed as u32)
            .map(|id| Neuron::new(EvolutionId(id)))
            .collect();

        Self {
            input_count,
            output_count,
            neurons,
            synapses: Vec::new(),
        }
    }

    /// Create a network with one zero-weight synapse from every input to every output
    pub fn fully_connected(input_count: usize, output_count: usize) -> Self {
        let mut net = Self::new(input_count, output_count);
        net.synapses.reserve(input_count * output_count);

        for input in 0..input_count {
            for output in input_count..input_count + output_count {
                net.create_synapse(NeuronId(input), NeuronId(output));
            }
        }

        net
    }

    #[inline]
    pub fn input_count(&self) -> usize {
        self.input_count
    }

    #[inline]
    pub fn output_count(&self) -> usize {
        self.output_count
    }

    #[inline]
    pub fn neuron_count(&self) -> usize {
        self.neurons.len()
    }

    #[inline]
    pub fn synapse_count(&self) -> usize {
        self.synapses.len()
    }

    /// Number of hidden neurons (complexity metric)
    #[inline]
    pub fn hidden_count(&self) -> usize {
        self.neurons.len() - self.input_count - self.output_count
    }

    pub fn inputs(&self) -> &[Neuron] {
        &self.neurons[..self.input_count]
    }

    pub fn outputs(&self) -> &[Neuron] {
        &self.neurons[self.input_count..self.input_count + self.output_count]
    }

    pub fn hidden(&self) -> &[Neuron] {
        &self.neurons[self.input_count + self.output_count..]
    }

    pub fn inputs_mut(&mut self) -> &mut [Neuron] {
        &mut self.neurons[..self.input_count]
    }

    /// Range of neuron ids belonging to the hidden region
    pub fn hidden_ids(&self) -> impl Iterator<Item = NeuronId> {
        (self.input_count + self.output_count..self.neurons.len()).map(NeuronId)
    }

    #[inline]
    pub fn neuron(&self, id: NeuronId) -> &Neuron {
        &self.neurons[id.0]
    }

    #[inline]
    pub fn neuron_mut(&mut self, id: NeuronId) -> &mut Neuron {
        &mut self.neurons[id.0]
    }

    #[inline]
    pub fn synapse(&self, id: SynapseId) -> &Synapse {
        &self.synapses[id.0]
    }

    #[inline]
    pub fn synapse_mut(&mut self, id: SynapseId) -> &mut Synapse {
        &mut self.synapses[id.0]
    }

    /// Write sensor readings into the input neurons
    pub fn set_inputs(&mut self, values: &[f32]) {
        debug_assert_eq!(values.len(), self.input_count);

        for (neuron, &v) in self.inputs_mut().iter_mut().zip(values) {
            neuron.value = v;
            neuron.partial_activation = v;
        }
    }

    /// Copy output neuron values into `out`
    pub fn read_outputs(&self, out: &mut [f32]) {
        debug_assert_eq!(out.len(), self.output_count);

        for (slot, neuron) in out.iter_mut().zip(self.outputs()) {
            *slot = neuron.value;
        }
    }

    /// Perform exactly one propagation step.
    ///
    /// Every neuron first computes its value from the accumulator filled by
    /// the previous step, then every synapse feeds the accumulators for the
    /// next one. Any synapse, including a loop, therefore delivers its signal
    /// one call later. The two passes must not be merged.
    pub fn update(&mut self) {
        let input_count = self.input_count;

        for (i, neuron) in self.neurons.iter_mut().enumerate() {
            if i < input_count {
                // sensors: the caller owns the accumulator
                neuron.value = neuron.partial_activation;
            } else {
                neuron.compute_value();
                neuron.partial_activation = 0.0;
            }
        }

        for synapse in &self.synapses {
            let signal = self.neurons[synapse.source.0].value * synapse.weight;
            self.neurons[synapse.target.0].partial_activation += signal;
        }

        let outputs = input_count..input_count + self.output_count;
        for neuron in &mut self.neurons[outputs] {
            neuron.value = neuron.value.clamp(0.0, 1.0);
        }
    }

    /// Zero all runtime state so a new round starts without recurrent memory
    pub fn reset_values(&mut self) {
        for neuron in &mut self.neurons {
            neuron.value = 0.0;
            neuron.partial_activation = 0.0;
        }
    }

    /// Locate a neuron by layer. Panics on an out-of-range id.
    pub fn neuron_position(&self, id: NeuronId) -> NeuronPosition {
        assert!(id.0 < self.neurons.len(), "neuron {:?} out of range", id);

        let outputs_end = self.input_count + self.output_count;
        if id.0 < self.input_count {
            NeuronPosition {
                layer: Layer::Input,
                index: id.0,
            }
        } else if id.0 < outputs_end {
            NeuronPosition {
                layer: Layer::Output,
                index: id.0 - self.input_count,
            }
        } else {
            NeuronPosition {
                layer: Layer::Hidden,
                index: id.0 - outputs_end,
            }
        }
    }

    /// Append a hidden neuron and return its id
    pub fn push_neuron(&mut self, neuron: Neuron) -> NeuronId {
        self.neurons.push(neuron);
        NeuronId(self.neurons.len() - 1)
    }

    /// Append a synapse. Duplicates are allowed.
    pub fn create_synapse(&mut self, from: NeuronId, to: NeuronId) -> &mut Synapse {
        assert!(
            from.0 < self.neurons.len() && to.0 < self.neurons.len(),
            "synapse {:?} -> {:?} references a missing neuron ({} neurons)",
            from,
            to,
            self.neurons.len()
        );

        self.synapses.push(Synapse::new(from, to));
        let last = self.synapses.len() - 1;
        &mut self.synapses[last]
    }

    /// Linear search for a synapse with the given endpoints
    pub fn get_synapse(&self, from: NeuronId, to: NeuronId) -> Option<SynapseId> {
        self.synapses
            .iter()
            .position(|s| s.connects(from, to))
            .map(SynapseId)
    }

    pub fn get_or_create_synapse(&mut self, from: NeuronId, to: NeuronId) -> &mut Synapse {
        match self.get_synapse(from, to) {
            Some(id) => &mut self.synapses[id.0],
            None => self.create_synapse(from, to),
        }
    }

    /// Resolve an evolution id, returning `NeuronId(neuron_count)` when absent
    pub fn get_neuron_id(&self, evolution_id: EvolutionId) -> NeuronId {
        self.find_neuron(evolution_id)
            .unwrap_or(NeuronId(self.neurons.len()))
    }

    pub fn find_neuron(&self, evolution_id: EvolutionId) -> Option<NeuronId> {
        self.neurons
            .iter()
            .position(|n| n.evolution_id == evolution_id)
            .map(NeuronId)
    }

    #[inline]
    pub fn contains(&self, evolution_id: EvolutionId) -> bool {
        self.neurons.iter().any(|n| n.evolution_id == evolution_id)
    }

    /// Uniformly random neuron
    pub fn random_neuron<R: Rng + ?Sized>(&self, rng: &mut R) -> NeuronId {
        NeuronId(rng.gen_range(0..self.neurons.len()))
    }

    /// Uniformly random synapse, `None` if there are none
    pub fn random_synapse<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<SynapseId> {
        if self.synapses.is_empty() {
            None
        } else {
            Some(SynapseId(rng.gen_range(0..self.synapses.len())))
        }
    }

    /// Number of synapses targeting / leaving `id`
    pub fn degree(&self, id: NeuronId) -> (usize, usize) {
        self.synapses.iter().fold((0, 0), |(inc, out), s| {
            (
                inc + usize::from(s.target == id),
                out + usize::from(s.source == id),
            )
        })
    }

    /// Check structural validity: fixed layers intact and every synapse
    /// endpoint refers to a real neuron
    pub fn is_valid(&self) -> bool {
        let n = self.neurons.len();
        if n < self.input_count + self.output_count {
            return false;
        }
        self.synapses.iter().all(|s| s.source.0 < n && s.target.0 < n)
    }

    /// Render as a graphviz digraph
    pub fn to_dot(&self) -> String {
        let mut out = String::from("digraph G {\n");

        for (i, neuron) in self.neurons.iter().enumerate() {
            let shape = match self.neuron_position(NeuronId(i)).layer {
                Layer::Input => "invhouse",
                Layer::Hidden => "ellipse",
                Layer::Output => "house",
            };
            let _ = writeln!(
                out,
                "  n{} [shape={}, label=\"{}\\n{:.2} {}\"];",
                i, shape, neuron.evolution_id, neuron.bias, neuron.activation_method
            );
        }

        for synapse in &self.synapses {
            let _ = writeln!(
                out,
                "  n{} -> n{} [label=\"{:.2}\"];",
                synapse.source.0, synapse.target.0, synapse.weight
            );
        }

        out.push_str("}\n");
        out
    }
}
