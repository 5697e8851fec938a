//! Identity-matched crossover between networks.

use super::ids::NeuronId;
use super::network::Network;
use crate::evolution::Mutator;
use rand::Rng;
use std::collections::HashSet;

/// Count of hidden neurons in `a` whose evolution id appears nowhere in `b`.
///
/// Asymmetric: it measures how much of `a`'s private structure is foreign to `b`.
pub fn divergence_factor(a: &Network, b: &Network) -> usize {
    a.hidden()
        .iter()
        .filter(|neuron| !b.contains(neuron.evolution_id))
        .count()
}

impl Mutator {
    /// Breed a child from `a` and `b`. Neither parent is modified.
    ///
    /// The child starts as a copy of `a`. Some of its synapses then take the
    /// weight of the synapse in `b` joining the same two genes. Occasionally,
    /// when the parents are close enough, `b`'s hidden neurons missing from
    /// the child are imported along with every synapse of `b` touching them.
    pub fn cross<R: Rng + ?Sized>(&self, a: &Network, b: &Network, rng: &mut R) -> Network {
        assert!(a.is_valid() && b.is_valid(), "crossover parent is structurally invalid");

        let mut child = a.clone();

        let imported_synapses =
            (a.synapse_count() as f32 * self.settings.max_imported_synapses_factor).round() as usize;
        for _ in 0..imported_synapses {
            let Some(id) = child.random_synapse(rng) else {
                break;
            };

            let synapse = child.synapse(id);
            let source = child.neuron(synapse.source).evolution_id;
            let target = child.neuron(synapse.target).evolution_id;

            let matching = b
                .find_neuron(source)
                .zip(b.find_neuron(target))
                .and_then(|(from, to)| b.get_synapse(from, to));

            if let Some(b_synapse) = matching {
                child.synapse_mut(id).weight = b.synapse(b_synapse).weight;
            }
        }

        if rng.gen_bool(f64::from(self.settings.hybridization_chance))
            && divergence_factor(&child, b) as f32 <= self.settings.max_hybridization_divergence_factor
        {
            hybridize(&mut child, b);
        }

        assert!(child.is_valid(), "crossover produced an invalid network");
        child
    }
}

/// Import `b`'s hidden neurons absent from `child`, then the synapses of `b`
/// touching any of them
fn hybridize(child: &mut Network, b: &Network) {
    let mut imported = HashSet::new();

    for id in b.hidden_ids() {
        let foreign = b.neuron(id);
        if !child.contains(foreign.evolution_id) {
            child.push_neuron(foreign.clone_gene());
            imported.insert(id);
        }
    }

    if imported.is_empty() {
        return;
    }

    let mut cloned = 0;
    for synapse in &b.synapses {
        if !imported.contains(&synapse.source) && !imported.contains(&synapse.target) {
            continue;
        }

        let from = translate(child, b, synapse.source);
        let to = translate(child, b, synapse.target);
        child.create_synapse(from, to).weight = synapse.weight;
        cloned += 1;
    }

    log::debug!(
        "hybridization imported {} neurons and {} synapses",
        imported.len(),
        cloned
    );
}

/// Map a neuron of `b` to the neuron of `child` carrying the same gene
fn translate(child: &Network, b: &Network, id: NeuronId) -> NeuronId {
    let evolution_id = b.neuron(id).evolution_id;
    child
        .find_neuron(evolution_id)
        .unwrap_or_else(|| panic!("gene {} missing from hybridized child", evolution_id))
}
