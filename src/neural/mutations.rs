//! Parameter and structural mutations.

use super::activation::ActivationMethod;
use super::ids::NeuronId;
use super::network::{Layer, Network};
use super::neuron::{Neuron, Synapse};
use crate::evolution::Mutator;
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Draw from `Normal(mean, std_dev)`; a degenerate distribution yields `mean`
#[inline]
fn gauss<R: Rng + ?Sized>(rng: &mut R, mean: f32, std_dev: f32) -> f32 {
    Normal::new(mean, std_dev).map_or(mean, |normal| normal.sample(rng))
}

impl Mutator {
    /// Reinitialize every bias and weight
    pub fn randomize_network<R: Rng + ?Sized>(&self, network: &mut Network, rng: &mut R) {
        for neuron in &mut network.neurons {
            self.randomize_neuron(neuron, rng);
        }
        for synapse in &mut network.synapses {
            self.randomize_synapse(synapse, rng);
        }
    }

    pub fn randomize_neuron<R: Rng + ?Sized>(&self, neuron: &mut Neuron, rng: &mut R) {
        neuron.bias = gauss(rng, 0.0, self.settings.bias_initial_std_dev);
        neuron.activation_method = ActivationMethod::LeakyRelu;
    }

    pub fn randomize_synapse<R: Rng + ?Sized>(&self, synapse: &mut Synapse, rng: &mut R) {
        synapse.weight = gauss(rng, 0.0, self.settings.weight_initial_std_dev);
    }

    /// Weighted pick: 60% sigmoid, 30% leaky ReLU, 10% sin
    pub fn random_activation_method<R: Rng + ?Sized>(rng: &mut R) -> ActivationMethod {
        let x: f64 = rng.gen();
        if x < 0.6 {
            ActivationMethod::Sigmoid
        } else if x < 0.9 {
            ActivationMethod::LeakyRelu
        } else {
            ActivationMethod::Sin
        }
    }

    /// Apply all mutations according to settings.
    ///
    /// Each category repeats while its coin flip succeeds, hitting a freshly
    /// drawn neuron or synapse every time. Order: soft bias, hard bias, soft
    /// weight, hard weight, activation, neuron creation.
    pub fn mutate<R: Rng + ?Sized>(&mut self, network: &mut Network, rng: &mut R) {
        let s = &self.settings;

        while rng.gen_bool(f64::from(s.bias_mutation_chance)) {
            let neuron = network.random_neuron(rng);
            let n = network.neuron_mut(neuron);
            n.bias = gauss(rng, n.bias, s.bias_mutation_factor);
        }

        while rng.gen_bool(f64::from(s.bias_hard_mutation_chance)) {
            let neuron = network.random_neuron(rng);
            let n = network.neuron_mut(neuron);
            n.bias = gauss(rng, n.bias, s.bias_hard_mutation_factor);
        }

        while rng.gen_bool(f64::from(s.weight_mutation_chance)) {
            if let Some(id) = network.random_synapse(rng) {
                let synapse = network.synapse_mut(id);
                synapse.weight = gauss(rng, synapse.weight, s.weight_mutation_factor);
            }
        }

        while rng.gen_bool(f64::from(s.weight_hard_mutation_chance)) {
            if let Some(id) = network.random_synapse(rng) {
                let synapse = network.synapse_mut(id);
                synapse.weight = gauss(rng, synapse.weight, s.weight_hard_mutation_factor);
            }
        }

        while rng.gen_bool(f64::from(s.activation_mutation_chance)) {
            let neuron = network.random_neuron(rng);
            network.neuron_mut(neuron).activation_method = Self::random_activation_method(rng);
        }

        while rng.gen_bool(f64::from(self.settings.neuron_creation_chance)) {
            self.create_random_neuron(network, rng);
        }
    }

    /// Grow the network by one hidden neuron.
    ///
    /// The neuron gets a fresh evolution id and up to `max_extra_synapses`
    /// connections to pre-existing neurons: inputs only feed it, outputs only
    /// receive from it, hidden neurons pick a side by coin flip. It always ends
    /// up with at least one incoming and one outgoing synapse.
    pub fn create_random_neuron<R: Rng + ?Sized>(&mut self, network: &mut Network, rng: &mut R) -> NeuronId {
        let mut neuron = Neuron::new(self.evolution_ids.allocate());
        self.randomize_neuron(&mut neuron, rng);
        let created = network.push_neuron(neuron);

        let mut incoming = 0usize;
        let mut outgoing = 0usize;

        let extra_synapses = rng.gen_range(0..=self.settings.max_extra_synapses);
        for _ in 0..extra_synapses {
            // the new neuron is the last one, so this excludes it
            let other = NeuronId(rng.gen_range(0..created.0));

            let is_target = match network.neuron_position(other).layer {
                Layer::Input => false,
                Layer::Hidden => rng.gen_bool(0.5),
                Layer::Output => true,
            };

            let synapse = if is_target {
                outgoing += 1;
                network.get_or_create_synapse(created, other)
            } else {
                incoming += 1;
                network.get_or_create_synapse(other, created)
            };
            self.randomize_synapse(synapse, rng);
        }

        // these edges cannot exist yet, so no lookup is needed
        if incoming == 0 {
            let input = NeuronId(rng.gen_range(0..network.input_count()));
            let synapse = network.create_synapse(input, created);
            self.randomize_synapse(synapse, rng);
        }

        if outgoing == 0 {
            let first_output = network.input_count();
            let output = NeuronId(rng.gen_range(first_output..first_output + network.output_count()));
            let synapse = network.create_synapse(created, output);
            self.randomize_synapse(synapse, rng);
        }

        created
    }
}
